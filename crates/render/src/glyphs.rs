use fieldwalk_common::{Rgb, SpeciesCategory};

/// Map symbol for a species category.
pub fn species_symbol(category: SpeciesCategory) -> &'static str {
    match category {
        SpeciesCategory::Tree => "🌳",
        SpeciesCategory::Shrub => "🌿",
        SpeciesCategory::Plant => "🌱",
        SpeciesCategory::LargeHerbivore => "🦌",
        SpeciesCategory::MediumHerbivore => "🦫",
        SpeciesCategory::Predator => "🐺",
        SpeciesCategory::Aquatic => "🐟",
        SpeciesCategory::Other => "?",
    }
}

/// Single-cell stand-in for terminals without emoji.
pub fn species_letter(category: SpeciesCategory) -> char {
    match category {
        SpeciesCategory::Tree => 'T',
        SpeciesCategory::Shrub => 'S',
        SpeciesCategory::Plant => 'P',
        SpeciesCategory::LargeHerbivore => 'H',
        SpeciesCategory::MediumHerbivore => 'M',
        SpeciesCategory::Predator => 'X',
        SpeciesCategory::Aquatic => 'F',
        SpeciesCategory::Other => '?',
    }
}

/// Pip color used when the symbol is rasterised without a font.
pub fn species_tint(category: SpeciesCategory) -> Rgb {
    match category {
        SpeciesCategory::Tree => Rgb::new(0x15, 0x80, 0x3d),
        SpeciesCategory::Shrub => Rgb::new(0x65, 0xa3, 0x0d),
        SpeciesCategory::Plant => Rgb::new(0xbe, 0xf2, 0x64),
        SpeciesCategory::LargeHerbivore => Rgb::new(0x92, 0x40, 0x0e),
        SpeciesCategory::MediumHerbivore => Rgb::new(0xd9, 0x77, 0x06),
        SpeciesCategory::Predator => Rgb::new(0xf8, 0xfa, 0xfc),
        SpeciesCategory::Aquatic => Rgb::new(0x38, 0xbd, 0xf8),
        SpeciesCategory::Other => Rgb::FALLBACK,
    }
}

/// First character of a glyph string, `?` if it is empty.
pub fn first_char(glyph: &str) -> char {
    glyph.chars().next().unwrap_or('?')
}
