use serde::Deserialize;

use crate::palette::PaletteName;

/// One layer of the parsed model, as delivered by the backend parsing
/// service. The engine only interprets `layer_type` and `output_shape`;
/// `name` is display-only.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LayerDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub layer_type: String,
    pub output_shape: String,
}

impl LayerDescriptor {
    pub fn new(name: &str, layer_type: &str, output_shape: &str) -> Self {
        Self {
            name: name.to_string(),
            layer_type: layer_type.to_string(),
            output_shape: output_shape.to_string(),
        }
    }
}

/// Inbound contract from the backend:
/// `{model_name, total_params, layers: [{name, type, output_shape}]}`.
#[derive(Debug, Deserialize, Clone)]
pub struct ModelGraph {
    pub model_name: String,
    pub total_params: u64,
    pub layers: Vec<LayerDescriptor>,
}

/// Display settings passed by value into every (re)build. Never mutated by
/// the layout engine.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    pub show_layer_names: bool,
    pub show_layer_dimensions: bool,
    pub color_palette: PaletteName,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_layer_names: true,
            show_layer_dimensions: true,
            color_palette: PaletteName::Default,
        }
    }
}
