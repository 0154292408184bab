// ============================================================================
// MEASUREMENT & GEOMETRY
// ============================================================================

use serde::Deserialize;

/// Side length of the widget when the host imposes no exact size, in dp.
pub const DEFAULT_SIZE_DP: f32 = 200.0;

/// Size constraint handed down by the host for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureSpec {
    Exactly(u32),
    AtMost(u32),
    Unspecified,
}

impl MeasureSpec {
    pub fn resolve(self, default_size: u32) -> u32 {
        match self {
            MeasureSpec::Exactly(size) => size,
            MeasureSpec::AtMost(size) => default_size.min(size),
            MeasureSpec::Unspecified => default_size,
        }
    }
}

/// Padding around the drawing area, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Padding {
    pub const fn uniform(value: u32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }

    pub const fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    pub const fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

/// Resolves the measured size for both axes independently.
pub fn measure(
    width_spec: MeasureSpec,
    height_spec: MeasureSpec,
    padding: Padding,
    density: f32,
) -> (u32, u32) {
    let default_value = (DEFAULT_SIZE_DP * density) as u32;
    (
        width_spec.resolve(default_value + padding.horizontal()),
        height_spec.resolve(default_value + padding.vertical()),
    )
}

/// Center and radii derived from the measured bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub center_x: f32,
    pub center_y: f32,
    pub outer_radius: f32,
    pub inner_radius: f32,
}

impl Geometry {
    pub fn from_size(width: u32, height: u32, padding: Padding, outside_stroke_width: f32) -> Self {
        let center_x = (width as f32 + padding.left as f32 - padding.right as f32) / 2.0;
        let center_y = (height as f32 + padding.top as f32 - padding.bottom as f32) / 2.0;
        let outer_radius = (width as f32
            - padding.left as f32
            - padding.right as f32
            - outside_stroke_width)
            / 2.0;
        Self {
            width,
            height,
            center_x,
            center_y,
            outer_radius,
            inner_radius: outer_radius / 3.0,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.center_x, self.center_y)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_constraint_wins() {
        assert_eq!(MeasureSpec::Exactly(50).resolve(200), 50);
        assert_eq!(MeasureSpec::Exactly(500).resolve(200), 500);
    }

    #[test]
    fn at_most_caps_the_default() {
        assert_eq!(MeasureSpec::AtMost(120).resolve(200), 120);
        assert_eq!(MeasureSpec::AtMost(900).resolve(200), 200);
    }

    #[test]
    fn axes_resolve_independently_and_include_padding() {
        let padding = Padding {
            left: 10,
            top: 4,
            right: 6,
            bottom: 0,
        };
        let (w, h) = measure(MeasureSpec::Unspecified, MeasureSpec::AtMost(150), padding, 2.0);
        assert_eq!(w, 416);
        assert_eq!(h, 150);
    }

    #[test]
    fn geometry_follows_padding_and_stroke() {
        let padding = Padding {
            left: 20,
            top: 10,
            right: 0,
            bottom: 30,
        };
        let g = Geometry::from_size(300, 300, padding, 8.0);
        assert_eq!(g.center(), (160.0, 140.0));
        assert_eq!(g.outer_radius, 136.0);
        assert_eq!(g.inner_radius, g.outer_radius / 3.0);
    }
}
