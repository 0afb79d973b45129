/// Largest extent any single axis may have, matching the clamp applied to
/// oversized tensor dimensions so huge layers stay on screen.
pub const MAX_EXTENT: f32 = 250.0;

/// Box extents derived from an `output_shape` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Dimensions {
    pub const UNIT: Self = Self {
        width: 1.0,
        height: 1.0,
        depth: 1.0,
    };

    /// Width/depth exchange requested by dense-style layers.
    pub fn swapped(self) -> Self {
        Self {
            width: self.depth,
            height: self.height,
            depth: self.width,
        }
    }
}

/// Best-effort extraction of up to three dimensions from a free-form shape
/// string such as `"(None, 28, 28, 1)"`.
///
/// The last three maximal digit runs map, in order, to width, height and
/// depth (last run lands on the depth axis). Missing runs default to 1 and
/// every value is clamped to `[1, MAX_EXTENT]`. Total over all inputs: a
/// string without digits yields the unit box.
pub fn extract_dimensions(shape_text: &str) -> Dimensions {
    let mut runs: Vec<f32> = Vec::new();
    let mut current = String::new();
    for ch in shape_text.chars() {
        if ch.is_ascii_digit() {
            current.push(ch);
        } else if !current.is_empty() {
            runs.push(parse_run(&current));
            current.clear();
        }
    }
    if !current.is_empty() {
        runs.push(parse_run(&current));
    }

    let start = runs.len().saturating_sub(3);
    let tail = &runs[start..];
    let mut axes = [1.0f32; 3];
    // Right-align the tail so the last run always lands on depth.
    let offset = 3 - tail.len();
    for (i, value) in tail.iter().enumerate() {
        axes[offset + i] = clamp_extent(*value);
    }

    Dimensions {
        width: axes[0],
        height: axes[1],
        depth: axes[2],
    }
}

fn parse_run(digits: &str) -> f32 {
    digits.parse::<f32>().unwrap_or(MAX_EXTENT)
}

fn clamp_extent(value: f32) -> f32 {
    value.clamp(1.0, MAX_EXTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keras_tuple_maps_last_run_to_depth() {
        let dims = extract_dimensions("(None, 26, 26, 32)");
        assert_eq!(
            dims,
            Dimensions {
                width: 26.0,
                height: 26.0,
                depth: 32.0
            }
        );
    }

    #[test]
    fn leading_runs_beyond_three_are_ignored() {
        let dims = extract_dimensions("(8, 64, 26, 26, 32)");
        assert_eq!(
            dims,
            Dimensions {
                width: 26.0,
                height: 26.0,
                depth: 32.0
            }
        );
    }

    #[test]
    fn short_shapes_default_missing_axes_to_one() {
        let dims = extract_dimensions("(None, 10)");
        assert_eq!(
            dims,
            Dimensions {
                width: 1.0,
                height: 1.0,
                depth: 10.0
            }
        );
    }

    #[test]
    fn no_digits_yields_unit_box() {
        assert_eq!(extract_dimensions(""), Dimensions::UNIT);
        assert_eq!(extract_dimensions("(None, ?, ?)"), Dimensions::UNIT);
    }

    #[test]
    fn values_clamp_into_bounds() {
        let dims = extract_dimensions("(None, 0, 21632)");
        assert_eq!(dims.height, 1.0);
        assert_eq!(dims.depth, MAX_EXTENT);
        // Absurdly long digit runs still clamp instead of failing.
        let dims = extract_dimensions("(None, 123456789012345678901234567890)");
        assert_eq!(dims.depth, MAX_EXTENT);
    }

    #[test]
    fn swap_exchanges_width_and_depth_only() {
        let dims = Dimensions {
            width: 1.0,
            height: 2.0,
            depth: 10.0,
        };
        assert_eq!(
            dims.swapped(),
            Dimensions {
                width: 10.0,
                height: 2.0,
                depth: 1.0
            }
        );
    }
}
