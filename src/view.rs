// ============================================================================
// RADAR VIEW
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bon::Builder;
use tracing::{debug, trace, warn};

use crate::animation::{Clock, Easing, ScanScheduler, SystemClock, ValueAnimator};
use crate::config::{Color, RadarConfig};
use crate::error::RadarError;
use crate::format::{format_value, DEFAULT_FORMAT};
use crate::gradient::{GradientSlot, Rotation, SweepGradient};
use crate::layout::{measure, Geometry, MeasureSpec, Padding};
use crate::render::{DrawCommand, Paint, Scene};

/// Upper bound on scan steps replayed by a single `tick`.
const MAX_CATCH_UP_STEPS: u32 = 360;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Radar,
    Score,
}

/// Arguments of a score display. Unset fields take the view's current
/// duration, format and animation flag.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ScoreOptions {
    #[builder(default = 0.0)]
    pub from: f32,
    pub to: f32,
    pub duration_ms: Option<u64>,
    pub format: Option<String>,
    pub animate: Option<bool>,
}

/// Lookup of localized strings by numeric id.
pub trait StringResources {
    fn string(&self, id: u32) -> Option<String>;
}

impl StringResources for HashMap<u32, String> {
    fn string(&self, id: u32) -> Option<String> {
        self.get(&id).cloned()
    }
}

#[derive(Debug, Clone)]
struct ScoreAnimation {
    animator: ValueAnimator,
    format: String,
}

/// Radar sweep / score gauge widget state.
#[derive(Debug)]
pub struct RadarView {
    mode: DisplayMode,
    scanning: bool,
    rotation: i32,

    density: f32,
    padding: Padding,
    geometry: Geometry,

    inside_stroke_width: f32,
    outside_stroke_width: f32,
    line_stroke_width: f32,

    circle_color: Color,
    line_color: Color,
    side_color: Color,
    outside_background_color: Color,
    inside_background_color: Color,
    text_color: Color,
    label_text_color: Color,

    text_size: f32,
    label_text_size: f32,
    text_offset_y: f32,
    label_text_offset_y: f32,

    circle_colors: Option<Vec<Color>>,
    scan_colors: Option<Vec<Color>>,
    circle_gradient: GradientSlot,
    scan_gradient: GradientSlot,
    gradient_generation: u64,

    value: f32,
    text: Option<String>,
    label_text: Option<String>,
    format: String,

    duration: Duration,
    easing: Easing,
    animation: Option<ScoreAnimation>,
    scan: ScanScheduler,

    show_line: bool,
    show_label: bool,
    show_text: bool,
    show_animation: bool,

    invalidated: bool,
    clock: Arc<dyn Clock>,
}

impl RadarView {
    pub fn new(config: &RadarConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &RadarConfig, clock: Arc<dyn Clock>) -> Self {
        let outside_stroke_width = config.dp(config.outside_stroke_width_dp);
        let mut view = Self {
            mode: DisplayMode::Score,
            scanning: false,
            rotation: config.rotation.rem_euclid(360),
            density: config.density,
            padding: config.padding,
            geometry: Geometry::from_size(0, 0, config.padding, outside_stroke_width),
            inside_stroke_width: config.dp(config.inside_stroke_width_dp),
            outside_stroke_width,
            line_stroke_width: config.dp(config.line_stroke_width_dp),
            circle_color: config.circle_color,
            line_color: config.line_color,
            side_color: config.side_color,
            outside_background_color: config.outside_background_color,
            inside_background_color: config.inside_background_color,
            text_color: config.text_color,
            label_text_color: config.label_text_color.unwrap_or(config.text_color),
            text_size: config.sp(config.text_size_sp),
            label_text_size: config.sp(config.label_text_size_sp),
            text_offset_y: config.dp(config.text_offset_y_dp),
            label_text_offset_y: config.dp(config.label_text_offset_y_dp),
            circle_colors: None,
            scan_colors: None,
            circle_gradient: GradientSlot::default(),
            scan_gradient: GradientSlot::default(),
            gradient_generation: 0,
            value: 0.0,
            text: config.text.clone(),
            label_text: config.label_text.clone(),
            format: normalize_format(config.format.as_deref()),
            duration: Duration::from_millis(config.duration_ms),
            easing: config.easing,
            animation: None,
            scan: ScanScheduler::new(Duration::from_millis(config.scan_time_ms)),
            show_line: config.show_line,
            show_label: config.show_label,
            show_text: config.show_text,
            show_animation: config.show_animation,
            invalidated: true,
            clock,
        };
        view.on_measure(MeasureSpec::Unspecified, MeasureSpec::Unspecified);
        view
    }

    // ------------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------------

    /// Resolves the view size for the given constraints and recomputes the
    /// center and radii from it.
    pub fn on_measure(&mut self, width_spec: MeasureSpec, height_spec: MeasureSpec) -> (u32, u32) {
        let (width, height) = measure(width_spec, height_spec, self.padding, self.density);
        self.apply_size(width, height);
        (width, height)
    }

    pub fn on_size_changed(&mut self, width: u32, height: u32) {
        self.on_measure(MeasureSpec::Exactly(width), MeasureSpec::Exactly(height));
    }

    fn apply_size(&mut self, width: u32, height: u32) {
        let geometry = Geometry::from_size(width, height, self.padding, self.outside_stroke_width);
        if geometry.center() != self.geometry.center() {
            self.gradient_generation += 1;
        }
        if geometry != self.geometry {
            self.geometry = geometry;
            self.invalidate();
        }
    }

    fn relayout(&mut self) {
        let (width, height) = self.geometry.size();
        self.apply_size(width, height);
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    // ------------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------------

    /// Builds the scene for the current mode.
    pub fn draw(&mut self) -> Scene {
        let mut scene = Scene::new();
        match self.mode {
            DisplayMode::Radar => self.draw_radar(&mut scene),
            DisplayMode::Score => self.draw_score(&mut scene),
        }
        scene
    }

    fn draw_radar(&mut self, scene: &mut Scene) {
        let (cx, cy) = self.geometry.center();
        let outer_radius = self.geometry.outer_radius;
        let inner_radius = self.geometry.inner_radius;

        if self.show_line {
            let line_radius = outer_radius - self.outside_stroke_width / 2.0;
            for degrees in [0.0f32, 90.0, 45.0, 135.0] {
                let (sin, cos) = degrees.to_radians().sin_cos();
                let (dx, dy) = (line_radius * cos, line_radius * sin);
                scene.add_command(DrawCommand::Line {
                    x0: cx + dx,
                    y0: cy + dy,
                    x1: cx - dx,
                    y1: cy - dy,
                    width: self.line_stroke_width,
                    color: self.line_color,
                });
            }
        }

        let rotation = Rotation::new(self.rotation as f32, cx, cy);

        let circle_paint = self.circle_paint(rotation);
        for radius in [inner_radius, inner_radius * 2.0] {
            scene.add_command(DrawCommand::StrokeCircle {
                cx,
                cy,
                radius,
                width: self.inside_stroke_width,
                paint: circle_paint.clone(),
            });
        }
        scene.add_command(DrawCommand::StrokeCircle {
            cx,
            cy,
            radius: outer_radius,
            width: self.outside_stroke_width,
            paint: circle_paint,
        });

        let scan_paint = self.scan_paint(rotation);
        scene.add_command(DrawCommand::FillCircle {
            cx,
            cy,
            radius: outer_radius + self.outside_stroke_width / 2.0,
            paint: scan_paint,
        });
    }

    fn circle_paint(&mut self, rotation: Rotation) -> Paint {
        let (cx, cy) = self.geometry.center();
        let generation = self.gradient_generation;
        let colors = self
            .circle_colors
            .clone()
            .unwrap_or_else(|| vec![Color::TRANSPARENT, self.circle_color]);
        let gradient = self
            .circle_gradient
            .get_or_build(generation, || SweepGradient::new(cx, cy, colors));
        gradient.set_local_rotation(rotation);
        Paint::Sweep(gradient.clone())
    }

    fn scan_paint(&mut self, rotation: Rotation) -> Paint {
        let (cx, cy) = self.geometry.center();
        let generation = self.gradient_generation;
        let colors = self.scan_colors.clone().unwrap_or_else(|| {
            vec![Color::TRANSPARENT, Color::TRANSPARENT, self.circle_color]
        });
        let gradient = self
            .scan_gradient
            .get_or_build(generation, || SweepGradient::new(cx, cy, colors));
        gradient.set_local_rotation(rotation);
        Paint::Sweep(gradient.clone())
    }

    fn draw_score(&self, scene: &mut Scene) {
        let (cx, cy) = self.geometry.center();
        let outer_radius = self.geometry.outer_radius;

        scene.add_command(DrawCommand::StrokeCircle {
            cx,
            cy,
            radius: outer_radius,
            width: self.inside_stroke_width,
            paint: Paint::Solid(self.side_color),
        });
        scene.add_command(DrawCommand::FillCircle {
            cx,
            cy,
            radius: outer_radius,
            paint: Paint::Solid(self.outside_background_color),
        });
        scene.add_command(DrawCommand::FillCircle {
            cx,
            cy,
            radius: self.geometry.inner_radius * 2.0,
            paint: Paint::Solid(self.inside_background_color),
        });

        if let Some(label) = self.label_text.as_deref().filter(|s| self.show_label && !s.is_empty()) {
            scene.add_command(DrawCommand::Text {
                x: cx,
                y: cy + self.label_text_offset_y,
                text: label.to_string(),
                size: self.label_text_size,
                color: self.label_text_color,
                bold: false,
            });
        }

        if let Some(text) = self.text.as_deref().filter(|s| self.show_text && !s.is_empty()) {
            scene.add_command(DrawCommand::Text {
                x: cx,
                y: cy + self.text_offset_y,
                text: text.to_string(),
                size: self.text_size,
                color: self.text_color,
                bold: true,
            });
        }
    }

    // ------------------------------------------------------------------------
    // Invalidation & frame tick
    // ------------------------------------------------------------------------

    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    /// Returns whether a redraw was requested since the last call, clearing it.
    pub fn take_invalidation(&mut self) -> bool {
        std::mem::take(&mut self.invalidated)
    }

    /// Fires due scan steps and samples the running score animation.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.advance_scan(now);
        self.advance_animation(now);
    }

    fn advance_scan(&mut self, now: Instant) {
        let mut steps = 0;
        while steps < MAX_CATCH_UP_STEPS {
            let Some(due) = self.scan.take_due(now) else {
                break;
            };
            self.rotation = (self.rotation + 1) % 360;
            steps += 1;
            if self.scanning {
                self.scan.arm(due);
            }
        }
        if steps > 0 {
            trace!(steps, rotation = self.rotation, "scan advanced");
            self.invalidate();
        }
    }

    fn advance_animation(&mut self, now: Instant) {
        let Some(animation) = &self.animation else {
            return;
        };
        let (value, finished) = animation.animator.sample(now);
        let format = animation.format.clone();
        if finished {
            self.animation = None;
            debug!(value, "score animation finished");
        }
        self.set_value_text(value, Some(format.as_str()));
    }

    // ------------------------------------------------------------------------
    // Radar scanning
    // ------------------------------------------------------------------------

    pub fn start(&mut self) {
        self.mode = DisplayMode::Radar;
        self.scanning = true;
        let now = self.clock.now();
        self.scan.arm(now);
        self.invalidate();
        debug!(rotation = self.rotation, "radar scan started");
    }

    pub fn start_with_colors(&mut self, colors: &[Color]) {
        self.set_scan_colors(colors);
        self.start();
    }

    /// Stops scanning and cancels the pending step.
    pub fn stop(&mut self) {
        self.scanning = false;
        self.scan.cancel();
        debug!(rotation = self.rotation, "radar scan stopped");
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    // ------------------------------------------------------------------------
    // Score display
    // ------------------------------------------------------------------------

    /// Switches to score mode and shows `options.to`, animating from
    /// `options.from` when enabled. Replaces any animation in flight.
    pub fn show_score(&mut self, options: ScoreOptions) {
        self.mode = DisplayMode::Score;
        if let Some(duration_ms) = options.duration_ms {
            self.duration = Duration::from_millis(duration_ms);
        }
        if let Some(format) = options.format.as_deref() {
            self.format = normalize_format(Some(format));
        }
        if let Some(animate) = options.animate {
            self.show_animation = animate;
        }
        let format = self.format.clone();

        if self.show_animation {
            let animator = ValueAnimator::new(
                options.from,
                options.to,
                self.duration,
                self.easing,
                self.clock.now(),
            );
            if let Some(previous) = &self.animation {
                debug!(previous_target = previous.animator.target(), "restarting score animation");
            }
            debug!(from = options.from, to = options.to, duration = ?self.duration, "score animation started");
            self.animation = Some(ScoreAnimation { animator, format });
            self.advance_animation(self.clock.now());
        } else {
            self.animation = None;
            self.set_value_text(options.to, Some(format.as_str()));
        }
    }

    pub fn show_score_value(&mut self, to: f32) {
        self.show_score(ScoreOptions::builder().to(to).build());
    }

    pub fn show_score_with_duration(&mut self, to: f32, duration_ms: u64) {
        self.show_score_range(0.0, to, duration_ms);
    }

    pub fn show_score_range(&mut self, from: f32, to: f32, duration_ms: u64) {
        self.show_score(
            ScoreOptions::builder()
                .from(from)
                .to(to)
                .duration_ms(duration_ms)
                .build(),
        );
    }

    pub fn show_score_animated(&mut self, from: f32, to: f32, duration_ms: u64, animate: bool) {
        self.show_score(
            ScoreOptions::builder()
                .from(from)
                .to(to)
                .duration_ms(duration_ms)
                .animate(animate)
                .build(),
        );
    }

    /// A `None` or empty `format` selects the default.
    pub fn show_score_formatted(
        &mut self,
        from: f32,
        to: f32,
        duration_ms: u64,
        format: Option<&str>,
        animate: bool,
    ) {
        self.show_score(ScoreOptions {
            from,
            to,
            duration_ms: Some(duration_ms),
            format: Some(format.unwrap_or_default().to_string()),
            animate: Some(animate),
        });
    }

    pub fn show_text(&mut self, text: impl Into<String>) {
        self.mode = DisplayMode::Score;
        self.set_text(text);
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Formats `value`, falling back to the default pattern when `format` is
    /// absent, empty or malformed.
    pub fn format_text(value: f32, format: Option<&str>) -> String {
        let pattern = normalize_format(format);
        match format_value(&pattern, value) {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, pattern = %pattern, "invalid score format, using default");
                format_value(DEFAULT_FORMAT, value).unwrap_or_else(|_| value.to_string())
            }
        }
    }

    // ------------------------------------------------------------------------
    // Text content
    // ------------------------------------------------------------------------

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
        self.invalidate_if_score();
    }

    /// Sets the value and its formatted text.
    pub fn set_value_text(&mut self, value: f32, format: Option<&str>) {
        self.value = value;
        self.format = normalize_format(format);
        self.text = Some(Self::format_text(value, Some(self.format.as_str())));
        self.invalidate_if_score();
    }

    pub fn set_text_res(&mut self, resources: &impl StringResources, id: u32) -> Result<(), RadarError> {
        let text = resources.string(id).ok_or(RadarError::MissingResource(id))?;
        self.set_text(text);
        Ok(())
    }

    pub fn set_label_text(&mut self, text: impl Into<String>) {
        self.label_text = Some(text.into());
        self.invalidate_if_score();
    }

    pub fn set_label_text_res(
        &mut self,
        resources: &impl StringResources,
        id: u32,
    ) -> Result<(), RadarError> {
        let text = resources.string(id).ok_or(RadarError::MissingResource(id))?;
        self.set_label_text(text);
        Ok(())
    }

    fn invalidate_if_score(&mut self) {
        if self.mode == DisplayMode::Score {
            self.invalidate();
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn label_text(&self) -> Option<&str> {
        self.label_text.as_deref()
    }

    // ------------------------------------------------------------------------
    // Gradients
    // ------------------------------------------------------------------------

    /// Replaces the sweep wedge color stops.
    pub fn set_scan_colors(&mut self, colors: &[Color]) {
        self.scan_colors = Some(colors.to_vec());
        self.invalidate_gradients();
    }

    /// Replaces the ring color stops.
    pub fn set_circle_colors(&mut self, colors: &[Color]) {
        self.circle_colors = Some(colors.to_vec());
        self.invalidate_gradients();
    }

    /// Drops explicit color stops so both gradients follow `circle_color`.
    pub fn reset_gradient_colors(&mut self) {
        self.scan_colors = None;
        self.circle_colors = None;
        self.invalidate_gradients();
    }

    /// Forces both gradients to be rebuilt on the next draw.
    pub fn invalidate_gradients(&mut self) {
        self.gradient_generation += 1;
        self.invalidate();
    }

    pub fn scan_colors(&self) -> Vec<Color> {
        self.scan_colors
            .clone()
            .unwrap_or_else(|| vec![Color::TRANSPARENT, Color::TRANSPARENT, self.circle_color])
    }

    pub fn circle_colors(&self) -> Vec<Color> {
        self.circle_colors
            .clone()
            .unwrap_or_else(|| vec![Color::TRANSPARENT, self.circle_color])
    }

    // ------------------------------------------------------------------------
    // Mode
    // ------------------------------------------------------------------------

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_radar(&self) -> bool {
        self.mode == DisplayMode::Radar
    }

    pub fn set_radar(&mut self, radar: bool) {
        self.mode = if radar {
            DisplayMode::Radar
        } else {
            DisplayMode::Score
        };
        self.invalidate();
    }

    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, degrees: i32) {
        self.rotation = degrees.rem_euclid(360);
        self.invalidate();
    }

    // ------------------------------------------------------------------------
    // Style accessors
    // ------------------------------------------------------------------------

    pub fn inside_stroke_width(&self) -> f32 {
        self.inside_stroke_width
    }

    pub fn set_inside_stroke_width(&mut self, width: f32) {
        self.inside_stroke_width = width;
        self.invalidate();
    }

    pub fn outside_stroke_width(&self) -> f32 {
        self.outside_stroke_width
    }

    /// Also shrinks or grows the radii.
    pub fn set_outside_stroke_width(&mut self, width: f32) {
        self.outside_stroke_width = width;
        self.relayout();
        self.invalidate();
    }

    pub fn line_stroke_width(&self) -> f32 {
        self.line_stroke_width
    }

    pub fn set_line_stroke_width(&mut self, width: f32) {
        self.line_stroke_width = width;
        self.invalidate();
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
        self.relayout();
    }

    pub fn circle_color(&self) -> Color {
        self.circle_color
    }

    pub fn set_circle_color(&mut self, color: Color) {
        self.circle_color = color;
        self.invalidate_gradients();
    }

    pub fn line_color(&self) -> Color {
        self.line_color
    }

    pub fn set_line_color(&mut self, color: Color) {
        self.line_color = color;
        self.invalidate();
    }

    pub fn side_color(&self) -> Color {
        self.side_color
    }

    pub fn set_side_color(&mut self, color: Color) {
        self.side_color = color;
        self.invalidate();
    }

    pub fn outside_color(&self) -> Color {
        self.outside_background_color
    }

    pub fn set_outside_color(&mut self, color: Color) {
        self.outside_background_color = color;
        self.invalidate();
    }

    pub fn inside_color(&self) -> Color {
        self.inside_background_color
    }

    pub fn set_inside_color(&mut self, color: Color) {
        self.inside_background_color = color;
        self.invalidate();
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
        self.invalidate();
    }

    pub fn label_text_color(&self) -> Color {
        self.label_text_color
    }

    pub fn set_label_text_color(&mut self, color: Color) {
        self.label_text_color = color;
        self.invalidate();
    }

    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    pub fn set_text_size(&mut self, size: f32) {
        self.text_size = size;
        self.invalidate();
    }

    pub fn label_text_size(&self) -> f32 {
        self.label_text_size
    }

    pub fn set_label_text_size(&mut self, size: f32) {
        self.label_text_size = size;
        self.invalidate();
    }

    pub fn text_offset_y(&self) -> f32 {
        self.text_offset_y
    }

    pub fn set_text_offset_y(&mut self, offset: f32) {
        self.text_offset_y = offset;
        self.invalidate();
    }

    pub fn label_text_offset_y(&self) -> f32 {
        self.label_text_offset_y
    }

    pub fn set_label_text_offset_y(&mut self, offset: f32) {
        self.label_text_offset_y = offset;
        self.invalidate();
    }

    pub fn show_line(&self) -> bool {
        self.show_line
    }

    pub fn set_show_line(&mut self, show: bool) {
        self.show_line = show;
        self.invalidate();
    }

    pub fn show_label(&self) -> bool {
        self.show_label
    }

    pub fn set_show_label(&mut self, show: bool) {
        self.show_label = show;
        self.invalidate();
    }

    pub fn show_text_enabled(&self) -> bool {
        self.show_text
    }

    pub fn set_show_text(&mut self, show: bool) {
        self.show_text = show;
        self.invalidate();
    }

    pub fn show_animation(&self) -> bool {
        self.show_animation
    }

    pub fn set_show_animation(&mut self, show: bool) {
        self.show_animation = show;
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn scan_interval(&self) -> Duration {
        self.scan.interval()
    }

    pub fn set_scan_interval(&mut self, interval: Duration) {
        self.scan.set_interval(interval);
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn set_format(&mut self, format: Option<&str>) {
        self.format = normalize_format(format);
    }
}

fn normalize_format(format: Option<&str>) -> String {
    match format {
        Some(f) if !f.is_empty() => f.to_string(),
        _ => DEFAULT_FORMAT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ManualClock;

    fn view() -> (RadarView, ManualClock) {
        let clock = ManualClock::new();
        let view = RadarView::with_clock(&RadarConfig::default(), Arc::new(clock.clone()));
        (view, clock)
    }

    #[test]
    fn starts_in_score_mode_with_default_geometry() {
        let (view, _) = view();
        assert_eq!(view.mode(), DisplayMode::Score);
        let g = view.geometry();
        assert_eq!(g.size(), (200, 200));
        assert_eq!(g.outer_radius, 96.0);
        assert_eq!(g.center(), (100.0, 100.0));
        assert_eq!(view.format(), DEFAULT_FORMAT);
    }

    #[test]
    fn format_text_falls_back_on_bad_patterns() {
        assert_eq!(RadarView::format_text(98.0, None), "98");
        assert_eq!(RadarView::format_text(98.0, Some("")), "98");
        assert_eq!(RadarView::format_text(98.0, Some("%q")), "98");
        assert_eq!(RadarView::format_text(98.0, Some("%.1f%%")), "98.0%");
    }

    #[test]
    fn center_move_invalidates_cached_gradients() {
        let (mut view, _) = view();
        view.start();
        view.draw();
        let before = view.gradient_generation;
        view.on_size_changed(200, 200);
        assert_eq!(view.gradient_generation, before);
        view.on_size_changed(300, 300);
        assert!(view.gradient_generation > before);
    }

    #[test]
    fn outside_stroke_width_changes_the_radii() {
        let (mut view, _) = view();
        view.set_outside_stroke_width(20.0);
        assert_eq!(view.geometry().outer_radius, 90.0);
        assert_eq!(view.geometry().inner_radius, 30.0);
    }

    #[test]
    fn padding_shifts_the_center_and_shrinks_the_radius() {
        let (mut view, _) = view();
        view.set_padding(Padding::uniform(10));
        let g = view.geometry();
        assert_eq!(g.center(), (100.0, 100.0));
        assert_eq!(g.outer_radius, 86.0);
        assert_eq!(view.on_measure(MeasureSpec::Unspecified, MeasureSpec::Unspecified), (220, 220));
    }

    #[test]
    fn text_setters_only_invalidate_in_score_mode() {
        let (mut view, _) = view();
        view.start();
        view.take_invalidation();
        view.set_label_text("Scanning");
        assert!(!view.is_invalidated());
        view.set_radar(false);
        view.take_invalidation();
        view.set_label_text("Score");
        assert!(view.take_invalidation());
    }
}
