//! Observation panel and god-mode legends as typed view models.
//!
//! # Invariants
//! - The panel never renders empty: missing data yields placeholders.
//! - View models are derived from one observation batch and never mutate it.

pub mod legend;
pub mod panel;

pub use legend::{CorridorLegend, LegendEntry, PredatorNotice, predator_notices};
pub use panel::{
    Badge, LocationSection, NoteLine, ObservationPanel, PanelMode, PanelView, SignGroup,
    SignSection, SpeciesCard, SpeciesSection,
};
