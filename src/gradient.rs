// ============================================================================
// SWEEP GRADIENTS
// ============================================================================

use std::f32::consts::TAU;

use crate::config::Color;

/// Rotation about a pivot, used as a gradient's local transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
    pub pivot_x: f32,
    pub pivot_y: f32,
}

impl Rotation {
    pub const fn new(degrees: f32, pivot_x: f32, pivot_y: f32) -> Self {
        Self {
            degrees,
            pivot_x,
            pivot_y,
        }
    }

    /// Maps a device point back into the untransformed frame.
    pub fn invert(&self, x: f32, y: f32) -> (f32, f32) {
        let (sin, cos) = (-self.degrees.to_radians()).sin_cos();
        let (dx, dy) = (x - self.pivot_x, y - self.pivot_y);
        (
            self.pivot_x + dx * cos - dy * sin,
            self.pivot_y + dx * sin + dy * cos,
        )
    }
}

/// Angular gradient around a center. Angle zero points along +x and grows
/// clockwise in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepGradient {
    center_x: f32,
    center_y: f32,
    colors: Vec<Color>,
    local: Option<Rotation>,
}

impl SweepGradient {
    pub fn new(center_x: f32, center_y: f32, colors: Vec<Color>) -> Self {
        Self {
            center_x,
            center_y,
            colors,
            local: None,
        }
    }

    pub fn set_local_rotation(&mut self, rotation: Rotation) {
        self.local = Some(rotation);
    }

    pub fn local_rotation(&self) -> Option<Rotation> {
        self.local
    }

    pub fn center(&self) -> (f32, f32) {
        (self.center_x, self.center_y)
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn color_at(&self, x: f32, y: f32) -> Color {
        let (x, y) = match self.local {
            Some(rotation) => rotation.invert(x, y),
            None => (x, y),
        };
        let angle = (y - self.center_y).atan2(x - self.center_x).rem_euclid(TAU);
        self.sample(angle / TAU)
    }

    /// Stops are spread evenly over the full turn.
    fn position(&self, index: usize) -> f32 {
        index as f32 / (self.colors.len() - 1) as f32
    }

    fn sample(&self, t: f32) -> Color {
        match self.colors.as_slice() {
            [] => Color::TRANSPARENT,
            [only] => *only,
            colors => {
                if t <= self.position(0) {
                    return colors[0];
                }
                for i in 1..colors.len() {
                    let (start, end) = (self.position(i - 1), self.position(i));
                    if t <= end {
                        let span = end - start;
                        let local = if span > 0.0 { (t - start) / span } else { 1.0 };
                        return colors[i - 1].lerp(colors[i], local);
                    }
                }
                colors[colors.len() - 1]
            }
        }
    }
}

/// Cached gradient tagged with the input generation it was built from.
#[derive(Debug, Clone, Default)]
pub struct GradientSlot {
    cached: Option<(u64, SweepGradient)>,
}

impl GradientSlot {
    pub fn get_or_build(
        &mut self,
        generation: u64,
        build: impl FnOnce() -> SweepGradient,
    ) -> &mut SweepGradient {
        if !matches!(&self.cached, Some((built, _)) if *built == generation) {
            tracing::debug!(generation, "rebuilding sweep gradient");
            self.cached = None;
        }
        &mut self.cached.get_or_insert_with(|| (generation, build())).1
    }

    pub fn generation(&self) -> Option<u64> {
        self.cached.as_ref().map(|(generation, _)| *generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(0xff, 0x00, 0x00);

    #[test]
    fn two_stop_gradient_runs_around_the_circle() {
        let gradient = SweepGradient::new(10.0, 10.0, vec![Color::TRANSPARENT, RED]);
        // Just below the +x axis.
        assert_eq!(gradient.color_at(20.0, 10.0).a, 0);
        // Opposite side is halfway.
        let half = gradient.color_at(0.0, 10.0);
        assert!((126..=129).contains(&half.a), "alpha {}", half.a);
        // Just above the +x axis wraps to the last stop.
        let end = gradient.color_at(20.0, 9.99);
        assert!(end.a > 250);
        assert_eq!(end.r, 0xff);
    }

    #[test]
    fn rotation_turns_the_gradient_clockwise() {
        let mut gradient = SweepGradient::new(10.0, 10.0, vec![Color::TRANSPARENT, RED]);
        gradient.set_local_rotation(Rotation::new(90.0, 10.0, 10.0));
        // The gradient now starts pointing straight down.
        assert!(gradient.color_at(9.0, 20.0).a < 10);
        assert!(gradient.color_at(11.0, 20.0).a > 240);
        // Straight right is three quarters around.
        let c = gradient.color_at(20.0, 10.0);
        assert!((189..=193).contains(&c.a), "alpha {}", c.a);
    }

    #[test]
    fn three_stop_sweep_is_transparent_for_the_first_half() {
        let gradient = SweepGradient::new(
            0.0,
            0.0,
            vec![Color::TRANSPARENT, Color::TRANSPARENT, RED],
        );
        assert_eq!(gradient.color_at(-5.0, 0.1).a, 0);
        assert!(gradient.color_at(5.0, -0.1).a > 250);
    }

    #[test]
    fn degenerate_stop_lists() {
        assert_eq!(SweepGradient::new(0.0, 0.0, vec![]).color_at(1.0, 1.0), Color::TRANSPARENT);
        assert_eq!(SweepGradient::new(0.0, 0.0, vec![RED]).color_at(1.0, 1.0), RED);
    }

    #[test]
    fn stops_are_evenly_spaced() {
        let green = Color::new(0x00, 0xff, 0x00);
        let gradient = SweepGradient::new(0.0, 0.0, vec![RED, green, RED]);
        // Half way round sits exactly on the middle stop.
        assert_eq!(gradient.color_at(-5.0, 0.0), green);
    }

    #[test]
    fn slot_rebuilds_only_when_generation_moves() {
        let mut slot = GradientSlot::default();
        let mut builds = 0;
        slot.get_or_build(1, || {
            builds += 1;
            SweepGradient::new(0.0, 0.0, vec![RED])
        });
        slot.get_or_build(1, || {
            builds += 1;
            SweepGradient::new(0.0, 0.0, vec![RED])
        });
        assert_eq!(builds, 1);
        let rebuilt = slot.get_or_build(2, || {
            builds += 1;
            SweepGradient::new(5.0, 5.0, vec![RED])
        });
        assert_eq!(rebuilt.center(), (5.0, 5.0));
        assert_eq!(builds, 2);
        assert_eq!(slot.generation(), Some(2));
    }
}
