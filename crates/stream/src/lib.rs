//! Data access: the gateway abstraction, a fixture-backed gateway, sequenced
//! view requests and the caches that hold their results.
//!
//! # Invariants
//! - A view frame pairs terrain and observations from the same request.
//! - Only the most recently issued request, fetched for the player's current
//!   position, ever replaces the frame.
//! - God-mode datasets are fetched at most once per session.

pub mod cache;
pub mod fixture;
pub mod gateway;
pub mod request;

pub use cache::{ApplyOutcome, CacheStats, GodModeCache, ViewFrame, ViewportCache};
pub use fixture::{FixtureError, FixtureGateway, WorldFixture};
pub use gateway::{DataGateway, GatewayError};
pub use request::{FetchedView, ViewRequest};
