//! Interactive 3D diagram of a machine-learning model's layer graph: layer
//! descriptors plus display settings in, a positioned and labeled scene
//! assembly out, with orbit controls and click-to-inspect tooltips on top.

pub mod app;
pub mod error;
pub mod fetch;
pub mod interact;
pub mod layout;
pub mod model;
pub mod palette;
pub mod policy;
pub mod render;
pub mod scene;
pub mod shape;

pub use app::{AppConfig, VizApp};
pub use layout::{SceneAssembly, build_assembly};
pub use model::{DisplaySettings, LayerDescriptor, ModelGraph};
pub use palette::{Palette, PaletteName, resolve_palette};
pub use policy::{LayerKind, LayerPolicy, policy_for};
pub use shape::{Dimensions, MAX_EXTENT, extract_dimensions};
