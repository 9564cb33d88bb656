//! Observation panel: the latest batch as grouped, typed sections.
//!
//! Grouping and filtering happen here; presentation is left to whoever
//! consumes [`PanelView`]. The `Display` impls give a plain-text rendition.

use fieldwalk_common::{
    ObservationBatch, Rgb, SignObservation, SpeciesId, SpeciesObservation, TerrainRef,
    WorldPosition, humanize,
};
use std::fmt;

pub const NO_LOCATION: &str = "Waiting for the first observation...";
pub const NO_SIGNS: &str = "No tracks or signs visible...";
pub const NO_SPECIES: &str = "No notable species observed here. Keep exploring...";

/// How many species the unfocused panel lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMode {
    /// The first `n` species, then a count of the rest.
    Capped(usize),
    All,
}

impl Default for PanelMode {
    fn default() -> Self {
        PanelMode::Capped(3)
    }
}

/// Colored label with a text color that stays readable on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub background: Rgb,
    pub text: Rgb,
}

impl Badge {
    pub fn terrain(terrain: &TerrainRef) -> Self {
        Self {
            label: humanize(&terrain.name),
            background: terrain.color,
            text: terrain.color.contrast_text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSection {
    pub position: WorldPosition,
    pub terrain: Badge,
    /// Corridors the player stands in, humanized.
    pub corridors: Vec<String>,
    pub visible_terrains: Vec<Badge>,
    pub time_of_day: Option<String>,
    pub season: Option<String>,
}

/// All sightings of one sign type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignGroup {
    pub kind: String,
    pub glyph: String,
    pub color: Rgb,
    pub description: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignSection {
    Placeholder(&'static str),
    Groups(Vec<SignGroup>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteLine {
    pub label: &'static str,
    pub text: String,
}

/// One species as shown in the panel. Summary cards leave `photo_url` and
/// `notes` empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesCard {
    pub id: SpeciesId,
    pub common_name: String,
    pub latin_name: Option<String>,
    pub category: String,
    pub count: usize,
    /// Only set when the state is worth calling out (above 1).
    pub state: Option<u32>,
    pub photo_url: Option<String>,
    pub notes: Vec<NoteLine>,
}

impl SpeciesCard {
    pub fn summary(species: &SpeciesObservation) -> Self {
        Self {
            id: species.id.clone(),
            common_name: species.common_name.clone(),
            latin_name: Some(species.latin_name.trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            category: humanize(species.category.as_str()),
            count: species.count,
            state: (species.state > 1).then_some(species.state),
            photo_url: None,
            notes: Vec::new(),
        }
    }

    pub fn detailed(species: &SpeciesObservation) -> Self {
        Self {
            photo_url: species.photo_url.clone().filter(|u| !u.trim().is_empty()),
            notes: species
                .notes
                .entries()
                .map(|(label, text)| NoteLine {
                    label,
                    text: text.to_string(),
                })
                .collect(),
            ..Self::summary(species)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeciesSection {
    Placeholder(&'static str),
    /// Capped list; `more` species were left out.
    Summary { cards: Vec<SpeciesCard>, more: usize },
    All(Vec<SpeciesCard>),
    Focused(SpeciesCard),
}

/// Everything the panel shows for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub location: Option<LocationSection>,
    pub signs: SignSection,
    pub species: SpeciesSection,
}

impl PanelView {
    /// Species ids in the order they are listed.
    pub fn species_ids(&self) -> Vec<&SpeciesId> {
        match &self.species {
            SpeciesSection::Placeholder(_) => Vec::new(),
            SpeciesSection::Summary { cards, .. } | SpeciesSection::All(cards) => {
                cards.iter().map(|c| &c.id).collect()
            }
            SpeciesSection::Focused(card) => vec![&card.id],
        }
    }
}

/// Turns observation batches into [`PanelView`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObservationPanel {
    mode: PanelMode,
}

impl ObservationPanel {
    pub fn new(mode: PanelMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    /// Render `batch`, showing only `focus` if it names a species in it.
    ///
    /// A missing batch yields placeholders everywhere; an unknown focus id
    /// falls back to the unfocused listing.
    pub fn render(
        &self,
        batch: Option<&ObservationBatch>,
        focus: Option<&SpeciesId>,
    ) -> PanelView {
        let Some(batch) = batch else {
            return PanelView {
                location: None,
                signs: SignSection::Placeholder(NO_SIGNS),
                species: SpeciesSection::Placeholder(NO_SPECIES),
            };
        };
        PanelView {
            location: Some(Self::location(batch)),
            signs: Self::signs(&batch.signs),
            species: self.species(&batch.observations, focus),
        }
    }

    fn location(batch: &ObservationBatch) -> LocationSection {
        LocationSection {
            position: batch.location,
            terrain: Badge::terrain(&batch.current_terrain),
            corridors: batch.corridors.iter().map(|c| humanize(c)).collect(),
            visible_terrains: batch.visible_terrains.iter().map(Badge::terrain).collect(),
            time_of_day: batch.time_of_day.clone(),
            season: batch.season.clone(),
        }
    }

    /// Group by type in first-seen order; the first sighting represents the
    /// group.
    fn signs(signs: &[SignObservation]) -> SignSection {
        if signs.is_empty() {
            return SignSection::Placeholder(NO_SIGNS);
        }
        let mut groups: Vec<SignGroup> = Vec::new();
        for sign in signs {
            match groups.iter_mut().find(|g| g.kind == sign.kind) {
                Some(group) => group.count += 1,
                None => groups.push(SignGroup {
                    kind: sign.kind.clone(),
                    glyph: sign.glyph.clone(),
                    color: sign.color,
                    description: sign.description.clone(),
                    count: 1,
                }),
            }
        }
        SignSection::Groups(groups)
    }

    fn species(
        &self,
        species: &[SpeciesObservation],
        focus: Option<&SpeciesId>,
    ) -> SpeciesSection {
        if species.is_empty() {
            return SpeciesSection::Placeholder(NO_SPECIES);
        }
        if let Some(focused) = focus.and_then(|id| species.iter().find(|s| &s.id == id)) {
            return SpeciesSection::Focused(SpeciesCard::detailed(focused));
        }
        if let Some(id) = focus {
            tracing::debug!(%id, "focus not in batch, showing all species");
        }
        match self.mode {
            PanelMode::All => {
                SpeciesSection::All(species.iter().map(SpeciesCard::detailed).collect())
            }
            PanelMode::Capped(cap) => SpeciesSection::Summary {
                cards: species.iter().take(cap).map(SpeciesCard::summary).collect(),
                more: species.len().saturating_sub(cap),
            },
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.label)
    }
}

impl fmt::Display for SpeciesCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.common_name)?;
        if let Some(latin) = &self.latin_name {
            write!(f, " ({latin})")?;
        }
        write!(f, " [{}]", self.category)?;
        if self.count > 1 {
            write!(f, " x{}", self.count)?;
        }
        if let Some(state) = self.state {
            write!(f, " state: {state}")?;
        }
        if let Some(url) = &self.photo_url {
            write!(f, "\n    photo: {url}")?;
        }
        for note in &self.notes {
            write!(f, "\n    {}: {}", note.label, note.text)?;
        }
        Ok(())
    }
}

impl fmt::Display for PanelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => {
                writeln!(f, "Grid: {}", loc.position)?;
                writeln!(f, "Terrain: {}", loc.terrain.label)?;
                if !loc.corridors.is_empty() {
                    writeln!(f, "In corridor: {}", loc.corridors.join(", "))?;
                }
                if let Some(time) = &loc.time_of_day {
                    match &loc.season {
                        Some(season) => writeln!(f, "Time: {time}, {season}")?,
                        None => writeln!(f, "Time: {time}")?,
                    }
                }
                let badges: Vec<String> =
                    loc.visible_terrains.iter().map(|b| b.to_string()).collect();
                writeln!(f, "Visible terrain: {}", badges.join(" "))?;
            }
            None => writeln!(f, "{NO_LOCATION}")?,
        }

        writeln!(f, "\nSigns:")?;
        match &self.signs {
            SignSection::Placeholder(msg) => writeln!(f, "  {msg}")?,
            SignSection::Groups(groups) => {
                for g in groups {
                    writeln!(f, "  {} {} (x{})", g.glyph, g.description, g.count)?;
                }
            }
        }

        writeln!(f, "\nSpecies:")?;
        match &self.species {
            SpeciesSection::Placeholder(msg) => writeln!(f, "  {msg}")?,
            SpeciesSection::Focused(card) => writeln!(f, "  {card}")?,
            SpeciesSection::All(cards) => {
                for card in cards {
                    writeln!(f, "  {card}")?;
                }
            }
            SpeciesSection::Summary { cards, more } => {
                for card in cards {
                    writeln!(f, "  {card}")?;
                }
                if *more > 0 {
                    writeln!(f, "  +{more} more")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwalk_common::{SensoryNotes, SpeciesCategory};

    fn sign(kind: &str, glyph: &str, x: i32) -> SignObservation {
        SignObservation {
            kind: kind.into(),
            x,
            y: 0,
            glyph: glyph.into(),
            color: Rgb::new(0xa1, 0x62, 0x07),
            description: format!("{kind} here"),
        }
    }

    fn species(id: &str, category: SpeciesCategory) -> SpeciesObservation {
        SpeciesObservation {
            id: id.into(),
            category,
            common_name: id.to_uppercase(),
            latin_name: String::new(),
            count: 1,
            state: 1,
            photo_url: None,
            notes: SensoryNotes {
                visual: Some("Tall".into()),
                smell: Some("  ".into()),
                ..SensoryNotes::default()
            },
            locations: None,
        }
    }

    fn batch(
        signs: Vec<SignObservation>,
        observations: Vec<SpeciesObservation>,
    ) -> ObservationBatch {
        ObservationBatch {
            location: WorldPosition::new(12, 7),
            current_terrain: TerrainRef {
                id: 2,
                name: "deep_water".into(),
                color: Rgb::new(0x1e, 0x3a, 0x8a),
            },
            visible_terrains: vec![
                TerrainRef {
                    id: 2,
                    name: "deep_water".into(),
                    color: Rgb::new(0x1e, 0x3a, 0x8a),
                },
                TerrainRef {
                    id: 0,
                    name: "grassland".into(),
                    color: Rgb::new(0x86, 0xef, 0xac),
                },
            ],
            signs,
            observations,
            corridors: vec!["north_east_route".into()],
            time_of_day: Some("dusk".into()),
            season: None,
        }
    }

    #[test]
    fn signs_grouped_by_type_with_counts() {
        let b = batch(
            vec![sign("track", "T", 1), sign("track", "t", 2), sign("scat", "s", 3)],
            vec![],
        );
        let view = ObservationPanel::default().render(Some(&b), None);
        let SignSection::Groups(groups) = view.signs else {
            panic!("expected groups");
        };
        let counts: Vec<(&str, usize)> =
            groups.iter().map(|g| (g.kind.as_str(), g.count)).collect();
        assert_eq!(counts, vec![("track", 2), ("scat", 1)]);
        assert_eq!(groups[0].glyph, "T");
    }

    #[test]
    fn capped_summary_counts_the_rest() {
        let b = batch(
            vec![],
            ["a", "b", "c", "d", "e"]
                .into_iter()
                .map(|id| species(id, SpeciesCategory::Plant))
                .collect(),
        );
        let view = ObservationPanel::default().render(Some(&b), None);
        match &view.species {
            SpeciesSection::Summary { cards, more } => {
                assert_eq!(cards.len(), 3);
                assert_eq!(*more, 2);
                assert!(cards[0].notes.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(view.to_string().contains("+2 more"));

        let all = ObservationPanel::new(PanelMode::All).render(Some(&b), None);
        assert_eq!(all.species_ids().len(), 5);
    }

    #[test]
    fn focus_shows_one_species_in_detail() {
        let mut deer = species("deer", SpeciesCategory::LargeHerbivore);
        deer.state = 3;
        deer.latin_name = "Cervus elaphus".into();
        let b = batch(vec![], vec![species("oak", SpeciesCategory::Tree), deer]);
        let view = ObservationPanel::default().render(Some(&b), Some(&"deer".into()));

        let SpeciesSection::Focused(card) = &view.species else {
            panic!("expected focus");
        };
        assert_eq!(card.common_name, "DEER");
        assert_eq!(card.latin_name.as_deref(), Some("Cervus elaphus"));
        assert_eq!(card.category, "large herbivore");
        assert_eq!(card.state, Some(3));
        // Blank smell note is omitted.
        assert_eq!(
            card.notes,
            vec![NoteLine {
                label: "Visual",
                text: "Tall".into()
            }]
        );
    }

    #[test]
    fn unknown_focus_falls_back_to_listing() {
        let b = batch(vec![], vec![species("oak", SpeciesCategory::Tree)]);
        let view = ObservationPanel::default().render(Some(&b), Some(&"wolf".into()));
        assert!(matches!(view.species, SpeciesSection::Summary { more: 0, .. }));
    }

    #[test]
    fn empty_sections_show_placeholders() {
        let view = ObservationPanel::default().render(Some(&batch(vec![], vec![])), None);
        assert_eq!(view.signs, SignSection::Placeholder(NO_SIGNS));
        assert_eq!(view.species, SpeciesSection::Placeholder(NO_SPECIES));

        let nothing = ObservationPanel::default().render(None, None);
        assert!(nothing.location.is_none());
        let text = nothing.to_string();
        assert!(text.contains(NO_LOCATION));
        assert!(text.contains(NO_SPECIES));
    }

    #[test]
    fn location_badges_and_corridors() {
        let view = ObservationPanel::default().render(Some(&batch(vec![], vec![])), None);
        let loc = view.location.as_ref().unwrap();
        assert_eq!(loc.terrain.label, "deep water");
        assert_eq!(loc.terrain.text, Rgb::WHITE);
        assert_eq!(loc.visible_terrains[1].text, Rgb::BLACK);
        assert_eq!(loc.corridors, vec!["north east route".to_string()]);

        let text = view.to_string();
        assert!(text.contains("Grid: [12, 7]"));
        assert!(text.contains("In corridor: north east route"));
        assert!(text.contains("Visible terrain: [deep water] [grassland]"));
    }

    #[test]
    fn species_ids_deserialized_from_numbers_can_be_focused() {
        let raw = r#"{"id": 17, "category": "predator", "common_name": "Wolf"}"#;
        let wolf: SpeciesObservation = serde_json::from_str(raw).unwrap();
        let b = batch(vec![], vec![wolf]);
        let view = ObservationPanel::default().render(Some(&b), Some(&SpeciesId("17".into())));
        assert!(matches!(view.species, SpeciesSection::Focused(_)));
    }
}
