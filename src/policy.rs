use crate::palette::PaletteRole;

/// Widened gap inserted before input and dense layers to visually separate
/// them from convolutional blocks.
pub const EXTRA_SPACING: f32 = 30.0;

/// Recognized layer categories, matched case-insensitively on the type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Input,
    Convolution,
    Pooling,
    Dense,
    Activation,
    Flatten,
    Other,
}

impl LayerKind {
    pub fn from_type(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        if tag.contains("input") {
            LayerKind::Input
        } else if tag.contains("conv") {
            LayerKind::Convolution
        } else if tag.contains("pool") {
            LayerKind::Pooling
        } else if tag.contains("dense") || tag.contains("linear") {
            LayerKind::Dense
        } else if tag.contains("flatten") {
            LayerKind::Flatten
        } else if tag.contains("activation")
            || tag.contains("relu")
            || tag.contains("softmax")
            || tag.contains("sigmoid")
        {
            LayerKind::Activation
        } else {
            LayerKind::Other
        }
    }
}

/// Per-type drawing rules resolved before any geometry is emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerPolicy {
    pub fill_role: PaletteRole,
    pub edge_role: PaletteRole,
    pub extra_spacing: f32,
    pub swap_width_depth: bool,
    pub name_label: bool,
    pub skip: bool,
}

impl LayerPolicy {
    const fn drawn(fill_role: PaletteRole) -> Self {
        Self {
            fill_role,
            edge_role: PaletteRole::Edge,
            extra_spacing: 0.0,
            swap_width_depth: false,
            name_label: true,
            skip: false,
        }
    }
}

/// Table-driven policy lookup. Unrecognized types degrade to the "other"
/// role instead of failing.
pub fn policy_for(layer_type: &str) -> LayerPolicy {
    match LayerKind::from_type(layer_type) {
        // Input name is redundant with the surrounding context.
        LayerKind::Input => LayerPolicy {
            extra_spacing: EXTRA_SPACING,
            name_label: false,
            ..LayerPolicy::drawn(PaletteRole::Input)
        },
        LayerKind::Convolution | LayerKind::Pooling => LayerPolicy::drawn(PaletteRole::Main),
        // The output dimension of a dense layer reads best off the layout
        // axis, so width and depth trade places.
        LayerKind::Dense => LayerPolicy {
            extra_spacing: EXTRA_SPACING,
            swap_width_depth: true,
            ..LayerPolicy::drawn(PaletteRole::Dense)
        },
        LayerKind::Activation => LayerPolicy::drawn(PaletteRole::Other),
        LayerKind::Flatten => LayerPolicy {
            skip: true,
            ..LayerPolicy::drawn(PaletteRole::Other)
        },
        LayerKind::Other => LayerPolicy::drawn(PaletteRole::Other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keras_type_tags_classify() {
        assert_eq!(LayerKind::from_type("InputLayer"), LayerKind::Input);
        assert_eq!(LayerKind::from_type("Conv2D"), LayerKind::Convolution);
        assert_eq!(LayerKind::from_type("MaxPooling2D"), LayerKind::Pooling);
        assert_eq!(LayerKind::from_type("Dense"), LayerKind::Dense);
        assert_eq!(LayerKind::from_type("Flatten"), LayerKind::Flatten);
        assert_eq!(LayerKind::from_type("Activation"), LayerKind::Activation);
        assert_eq!(LayerKind::from_type("Dropout"), LayerKind::Other);
    }

    #[test]
    fn flatten_is_skipped_entirely() {
        assert!(policy_for("Flatten").skip);
        assert!(!policy_for("Conv2D").skip);
    }

    #[test]
    fn dense_swaps_and_keeps_its_name() {
        let policy = policy_for("Dense");
        assert!(policy.swap_width_depth);
        assert!(policy.name_label);
        assert_eq!(policy.extra_spacing, EXTRA_SPACING);
        assert_eq!(policy.fill_role, PaletteRole::Dense);
    }

    #[test]
    fn input_hides_its_own_name() {
        let policy = policy_for("InputLayer");
        assert!(!policy.name_label);
        assert_eq!(policy.extra_spacing, EXTRA_SPACING);
        assert_eq!(policy.fill_role, PaletteRole::Input);
    }

    #[test]
    fn unknown_type_falls_back_to_other() {
        let policy = policy_for("SpatialPyramidWhatever");
        assert!(!policy.skip);
        assert_eq!(policy.fill_role, PaletteRole::Other);
    }
}
