use egui::Color32;
use serde::{Deserialize, Deserializer};

/// Semantic color roles shared by every palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteRole {
    /// Convolution / pooling body fill.
    Main,
    /// Wireframe outlines.
    Edge,
    /// Input layer fill.
    Input,
    /// Dense layer fill.
    Dense,
    /// Fill for activations and unrecognized types.
    Other,
    /// Tooltip and label background.
    White,
    /// Connector arrows (edge accent).
    Accent,
}

/// A fixed role-to-color mapping. Every palette defines the full role set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub main: Color32,
    pub edge: Color32,
    pub input: Color32,
    pub dense: Color32,
    pub other: Color32,
    pub white: Color32,
    pub accent: Color32,
}

impl Palette {
    pub fn color(&self, role: PaletteRole) -> Color32 {
        match role {
            PaletteRole::Main => self.main,
            PaletteRole::Edge => self.edge,
            PaletteRole::Input => self.input,
            PaletteRole::Dense => self.dense,
            PaletteRole::Other => self.other,
            PaletteRole::White => self.white,
            PaletteRole::Accent => self.accent,
        }
    }
}

/// Identifier for one of the five built-in palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteName {
    #[default]
    Default,
    Dark,
    Tailwind,
    Neon,
    Natural,
}

impl PaletteName {
    pub const ALL: [PaletteName; 5] = [
        PaletteName::Default,
        PaletteName::Dark,
        PaletteName::Tailwind,
        PaletteName::Neon,
        PaletteName::Natural,
    ];

    /// Lenient parse: unrecognized names fall back to the default palette.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => PaletteName::Dark,
            "tailwind" => PaletteName::Tailwind,
            "neon" => PaletteName::Neon,
            "natural" => PaletteName::Natural,
            _ => PaletteName::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaletteName::Default => "default",
            PaletteName::Dark => "dark",
            PaletteName::Tailwind => "tailwind",
            PaletteName::Neon => "neon",
            PaletteName::Natural => "natural",
        }
    }
}

impl<'de> Deserialize<'de> for PaletteName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(PaletteName::parse(&name))
    }
}

const DEFAULT_PALETTE: Palette = Palette {
    main: Color32::from_rgb(0x4f, 0x86, 0xc6),
    edge: Color32::from_rgb(0x11, 0x11, 0x11),
    input: Color32::from_rgb(0x6f, 0xb3, 0x6f),
    dense: Color32::from_rgb(0xe8, 0xa3, 0x3d),
    other: Color32::from_rgb(0x9b, 0x9b, 0x9b),
    white: Color32::from_rgb(0xff, 0xff, 0xff),
    accent: Color32::from_rgb(0x44, 0x44, 0x44),
};

const DARK_PALETTE: Palette = Palette {
    main: Color32::from_rgb(0x3a, 0x4a, 0x6b),
    edge: Color32::from_rgb(0xd0, 0xd0, 0xd0),
    input: Color32::from_rgb(0x3f, 0x5e, 0x3f),
    dense: Color32::from_rgb(0x8a, 0x62, 0x2c),
    other: Color32::from_rgb(0x4a, 0x4a, 0x4a),
    white: Color32::from_rgb(0xe8, 0xe8, 0xe8),
    accent: Color32::from_rgb(0xb0, 0xb0, 0xb0),
};

const TAILWIND_PALETTE: Palette = Palette {
    main: Color32::from_rgb(0x0e, 0xa5, 0xe9),
    edge: Color32::from_rgb(0x0f, 0x17, 0x2a),
    input: Color32::from_rgb(0x10, 0xb9, 0x81),
    dense: Color32::from_rgb(0xf5, 0x9e, 0x0b),
    other: Color32::from_rgb(0x94, 0xa3, 0xb8),
    white: Color32::from_rgb(0xf8, 0xfa, 0xfc),
    accent: Color32::from_rgb(0x63, 0x66, 0xf1),
};

const NEON_PALETTE: Palette = Palette {
    main: Color32::from_rgb(0x00, 0xe5, 0xff),
    edge: Color32::from_rgb(0x0a, 0x0a, 0x14),
    input: Color32::from_rgb(0x39, 0xff, 0x14),
    dense: Color32::from_rgb(0xff, 0x2b, 0xd6),
    other: Color32::from_rgb(0xff, 0xe7, 0x00),
    white: Color32::from_rgb(0xf4, 0xf4, 0xff),
    accent: Color32::from_rgb(0xff, 0x6e, 0x27),
};

const NATURAL_PALETTE: Palette = Palette {
    main: Color32::from_rgb(0x7a, 0x9e, 0x7e),
    edge: Color32::from_rgb(0x3b, 0x2f, 0x2f),
    input: Color32::from_rgb(0xa3, 0xb8, 0x6c),
    dense: Color32::from_rgb(0xc8, 0x8a, 0x4b),
    other: Color32::from_rgb(0xb5, 0xa8, 0x9a),
    white: Color32::from_rgb(0xfa, 0xf6, 0xef),
    accent: Color32::from_rgb(0x6b, 0x4f, 0x36),
};

/// Resolve a palette identifier to its fixed role-to-color table.
pub fn resolve_palette(name: PaletteName) -> Palette {
    match name {
        PaletteName::Default => DEFAULT_PALETTE,
        PaletteName::Dark => DARK_PALETTE,
        PaletteName::Tailwind => TAILWIND_PALETTE,
        PaletteName::Neon => NEON_PALETTE,
        PaletteName::Natural => NATURAL_PALETTE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_resolves_to_default_colors() {
        let fallback = resolve_palette(PaletteName::parse("unknown"));
        assert_eq!(fallback, resolve_palette(PaletteName::Default));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(PaletteName::parse("Tailwind"), PaletteName::Tailwind);
        assert_eq!(PaletteName::parse(" NEON "), PaletteName::Neon);
    }

    #[test]
    fn palettes_are_distinct() {
        let mut mains: Vec<Color32> = PaletteName::ALL
            .iter()
            .map(|name| resolve_palette(*name).main)
            .collect();
        mains.dedup();
        assert_eq!(mains.len(), PaletteName::ALL.len());
    }

    #[test]
    fn every_role_is_reachable() {
        let palette = resolve_palette(PaletteName::Default);
        for role in [
            PaletteRole::Main,
            PaletteRole::Edge,
            PaletteRole::Input,
            PaletteRole::Dense,
            PaletteRole::Other,
            PaletteRole::White,
            PaletteRole::Accent,
        ] {
            let _ = palette.color(role);
        }
    }
}
