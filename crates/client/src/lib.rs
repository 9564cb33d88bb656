//! Client: one controller wiring input, session state, the data gateway,
//! rendering and the observation panel.
//!
//! # Invariants
//! - All session state lives in one [`Controller`]; there are no globals.
//! - Map and panel are always drawn from the same applied view frame.
//! - A failed update never clears what is on screen.

mod controller;
mod error;
mod options;

pub use controller::{Controller, Response};
pub use error::{ClientError, InitError};
pub use options::ClientOptions;
