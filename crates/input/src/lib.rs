//! Input: keyboard and pointer events mapped to session actions.
//!
//! # Invariants
//! - Every input source produces the same [`Action`] values.
//! - A single action moves the player at most one cell.

pub mod action;
pub mod keymap;
pub mod pointer;

pub use action::Action;
pub use keymap::{UnboundKey, action_for_key, direction_for_key, parse_moves};
pub use pointer::{click_step, hover_cell};
