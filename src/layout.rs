use std::collections::HashMap;

use egui::Color32;
use glam::Vec3;
use tracing::debug;

use crate::model::{DisplaySettings, LayerDescriptor};
use crate::palette::{PaletteRole, resolve_palette};
use crate::policy::policy_for;
use crate::shape::extract_dimensions;

/// Base gap between consecutive visible layers along the layout axis.
pub const LAYER_SPACING: f32 = 20.0;

const LABEL_PAD: f32 = 6.0;
const NAME_LABEL_LIFT: f32 = 14.0;
const TOOLTIP_LIFT: f32 = 20.0;

/// A colored box primitive for one visible layer. The wireframe outline is
/// derived from the same geometry at draw time and stroked with `edge`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerBox {
    pub center: Vec3,
    pub size: Vec3,
    pub fill: Color32,
    pub edge: Color32,
}

impl LayerBox {
    pub fn min(&self) -> Vec3 {
        self.center - self.size * 0.5
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.size * 0.5
    }

    fn corners(&self) -> [Vec3; 8] {
        let lo = self.min();
        let hi = self.max();
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
        ]
    }
}

/// Directional indicator from the trailing face of one visible layer to the
/// leading face of the next.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub from: Vec3,
    pub to: Vec3,
    pub color: Color32,
}

/// Screen-space text anchored at a world position.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelAnchor {
    pub position: Vec3,
    pub text: String,
    pub color: Color32,
}

/// Hidden-by-default inspection label attached to one box.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub position: Vec3,
    pub lines: Vec<String>,
    pub background: Color32,
    pub foreground: Color32,
    pub visible: bool,
}

/// Typed back-reference from a box to its descriptor and tooltip, looked up
/// by the interaction layer instead of ad hoc fields on the primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxBinding {
    pub layer_index: usize,
    pub tooltip: usize,
}

/// Axis-aligned bounds of the assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const ZERO: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    fn union_box(&mut self, layer_box: &LayerBox) {
        self.min = self.min.min(layer_box.min());
        self.max = self.max.max(layer_box.max());
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// The complete set of primitives for one model at one settings
/// configuration, centered on the origin. Owned geometry is released through
/// [`SceneAssembly::dispose`]; the render loop only ever swaps whole
/// assemblies, never mutates one in place (tooltip visibility aside).
#[derive(Debug, Default, Clone)]
pub struct SceneAssembly {
    pub boxes: Vec<LayerBox>,
    pub connectors: Vec<Connector>,
    pub size_labels: Vec<LabelAnchor>,
    pub name_labels: Vec<LabelAnchor>,
    pub tooltips: Vec<Tooltip>,
    bindings: HashMap<usize, BoxBinding>,
    corners: Vec<[Vec3; 8]>,
    bounds: Aabb,
    disposed: bool,
}

impl SceneAssembly {
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn binding(&self, box_index: usize) -> Option<BoxBinding> {
        self.bindings.get(&box_index).copied()
    }

    /// Tessellated corner buffer for one box, kept alongside the primitives
    /// so the draw pass never re-derives geometry per frame.
    pub fn box_corners(&self, box_index: usize) -> Option<&[Vec3; 8]> {
        self.corners.get(box_index)
    }

    /// Release all owned geometry. Idempotent; used by both the
    /// settings-driven rebuild and teardown.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        debug!(boxes = self.boxes.len(), "disposing scene assembly");
        self.boxes.clear();
        self.connectors.clear();
        self.size_labels.clear();
        self.name_labels.clear();
        self.tooltips.clear();
        self.bindings.clear();
        self.corners.clear();
        self.bounds = Aabb::ZERO;
        self.disposed = true;
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Build the positioned, styled, labeled assembly for `layers` under
/// `settings`. Pure: identical inputs always yield identical primitive
/// counts, positions and colors. An empty layer list yields an empty
/// origin-centered assembly, not an error.
pub fn build_assembly(layers: &[LayerDescriptor], settings: &DisplaySettings) -> SceneAssembly {
    let palette = resolve_palette(settings.color_palette);
    let mut assembly = SceneAssembly::default();

    let mut cursor = 0.0f32;
    // Trailing face x of the previous visible layer, if any.
    let mut prev_trailing: Option<f32> = None;

    for (layer_index, layer) in layers.iter().enumerate() {
        let policy = policy_for(&layer.layer_type);
        if policy.skip {
            continue;
        }

        let mut dims = extract_dimensions(&layer.output_shape);
        if policy.swap_width_depth {
            dims = dims.swapped();
        }

        // The first visible layer takes no leading gap and no arrow.
        let gap = if prev_trailing.is_some() {
            LAYER_SPACING + policy.extra_spacing
        } else {
            0.0
        };
        cursor += gap;
        let leading = cursor;
        let center = Vec3::new(cursor + dims.width * 0.5, 0.0, 0.0);
        cursor += dims.width;

        assembly.boxes.push(LayerBox {
            center,
            size: Vec3::new(dims.width, dims.height, dims.depth),
            fill: palette.color(policy.fill_role),
            edge: palette.color(policy.edge_role),
        });
        let box_index = assembly.boxes.len() - 1;

        if let Some(trailing) = prev_trailing {
            assembly.connectors.push(Connector {
                from: Vec3::new(trailing, 0.0, 0.0),
                to: Vec3::new(leading, 0.0, 0.0),
                color: palette.color(PaletteRole::Accent),
            });
        }

        let half = Vec3::new(dims.width, dims.height, dims.depth) * 0.5;
        if settings.show_layer_dimensions {
            let edge_color = palette.color(policy.edge_role);
            let width_label = LabelAnchor {
                position: center + Vec3::new(0.0, -half.y - LABEL_PAD, half.z),
                text: format_extent(dims.width),
                color: edge_color,
            };
            if policy.swap_width_depth {
                // After the swap only the layout-axis extent is meaningful.
                assembly.size_labels.push(width_label);
            } else {
                assembly.size_labels.push(width_label);
                assembly.size_labels.push(LabelAnchor {
                    position: center + Vec3::new(half.x + LABEL_PAD, 0.0, half.z),
                    text: format_extent(dims.height),
                    color: edge_color,
                });
                assembly.size_labels.push(LabelAnchor {
                    position: center + Vec3::new(0.0, half.y + LABEL_PAD, 0.0),
                    text: format_extent(dims.depth),
                    color: edge_color,
                });
            }
        }

        if settings.show_layer_names && policy.name_label {
            // Centered over the gap preceding this layer, or over the layer
            // itself when there is no gap.
            let anchor_x = if gap > 0.0 {
                leading - gap * 0.5
            } else {
                center.x
            };
            assembly.name_labels.push(LabelAnchor {
                position: Vec3::new(anchor_x, half.y + NAME_LABEL_LIFT, 0.0),
                text: layer.layer_type.clone(),
                color: palette.color(PaletteRole::Accent),
            });
        }

        let tooltip_index = assembly.tooltips.len();
        assembly.tooltips.push(Tooltip {
            position: center + Vec3::new(0.0, half.y + TOOLTIP_LIFT, 0.0),
            lines: vec![
                format!("Layer: {}", layer.layer_type),
                format!("Shape: {}", layer.output_shape),
            ],
            background: palette.color(PaletteRole::White),
            foreground: palette.color(PaletteRole::Edge),
            visible: false,
        });
        assembly.bindings.insert(
            box_index,
            BoxBinding {
                layer_index,
                tooltip: tooltip_index,
            },
        );

        prev_trailing = Some(cursor);
    }

    recenter(&mut assembly);
    assembly.corners = assembly.boxes.iter().map(LayerBox::corners).collect();

    debug!(
        boxes = assembly.boxes.len(),
        connectors = assembly.connectors.len(),
        palette = settings.color_palette.as_str(),
        "built scene assembly"
    );
    assembly
}

/// Translate the whole assembly so its bounding-box center sits on the
/// origin. Runs exactly once per build, after all primitives are placed.
fn recenter(assembly: &mut SceneAssembly) {
    if assembly.boxes.is_empty() {
        assembly.bounds = Aabb::ZERO;
        return;
    }
    let first = &assembly.boxes[0];
    let mut bounds = Aabb {
        min: first.min(),
        max: first.max(),
    };
    for layer_box in &assembly.boxes[1..] {
        bounds.union_box(layer_box);
    }
    let offset = -bounds.center();

    for layer_box in &mut assembly.boxes {
        layer_box.center += offset;
    }
    for connector in &mut assembly.connectors {
        connector.from += offset;
        connector.to += offset;
    }
    for label in assembly
        .size_labels
        .iter_mut()
        .chain(assembly.name_labels.iter_mut())
    {
        label.position += offset;
    }
    for tooltip in &mut assembly.tooltips {
        tooltip.position += offset;
    }
    assembly.bounds = Aabb {
        min: bounds.min + offset,
        max: bounds.max + offset,
    };
}

fn format_extent(value: f32) -> String {
    format!("{}", value.round() as i64)
}
