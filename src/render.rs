// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::gradient::SweepGradient;

/// What a shape is filled or stroked with.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Sweep(SweepGradient),
}

impl Paint {
    fn color_at(&self, x: f32, y: f32) -> Color {
        match self {
            Paint::Solid(color) => *color,
            Paint::Sweep(gradient) => gradient.color_at(x, y),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        width: f32,
        color: Color,
    },
    StrokeCircle {
        cx: f32,
        cy: f32,
        radius: f32,
        width: f32,
        paint: Paint,
    },
    FillCircle {
        cx: f32,
        cy: f32,
        radius: f32,
        paint: Paint,
    },
    /// Horizontally centered on `x`; `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        text: String,
        size: f32,
        color: Color,
        bold: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn render(&self, canvas: &mut Canvas, font: Option<&Font<'static>>) {
        let mut warned_font = false;
        for command in &self.commands {
            match command {
                DrawCommand::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    width,
                    color,
                } => draw_line_aa(canvas, *x0, *y0, *x1, *y1, *width, *color),
                DrawCommand::StrokeCircle {
                    cx,
                    cy,
                    radius,
                    width,
                    paint,
                } => stroke_circle(canvas, *cx, *cy, *radius, *width, paint),
                DrawCommand::FillCircle {
                    cx,
                    cy,
                    radius,
                    paint,
                } => fill_circle(canvas, *cx, *cy, *radius, paint),
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    size,
                    color,
                    bold,
                } => match font {
                    Some(font) => draw_text(canvas, font, *x, *y, text, *size, *color, *bold),
                    None if !warned_font => {
                        tracing::trace!(%text, "skipping text without a font");
                        warned_font = true;
                    }
                    None => {}
                },
            }
        }
    }
}

// ============================================================================
// CORE DATA TYPES
// ============================================================================

/// RGBA8 frame buffer view.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        self.frame
            .get(idx..idx + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Source-over blend of `color` scaled by `coverage`.
    fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let alpha = coverage.clamp(0.0, 1.0) * color.a as f32 / 255.0;
        if alpha <= 0.0 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let mix = |src: u8, dst: u8| (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round() as u8;
        dst[0] = mix(color.r, dst[0]);
        dst[1] = mix(color.g, dst[1]);
        dst[2] = mix(color.b, dst[2]);
        dst[3] = 0xff;
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn draw_line_aa(canvas: &mut Canvas, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Color) {
    let half = (width / 2.0).max(0.5);
    let min_x = (x0.min(x1) - half).floor() as i32 - 1;
    let max_x = (x0.max(x1) + half).ceil() as i32 + 1;
    let min_y = (y0.min(y1) - half).floor() as i32 - 1;
    let max_y = (y0.max(y1) + half).ceil() as i32 + 1;
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len_sq = dx * dx + dy * dy;
    // Hairlines keep full coverage but shrink in opacity.
    let opacity = width.clamp(0.0, 1.0).max(0.25);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let t = if len_sq > 0.0 {
                (((px - x0) * dx + (py - y0) * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dist = ((x0 + t * dx - px).powi(2) + (y0 + t * dy - py).powi(2)).sqrt();
            let aa = (half + 0.5 - dist).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.blend(x, y, color, aa * opacity);
            }
        }
    }
}

fn stroke_circle(canvas: &mut Canvas, cx: f32, cy: f32, radius: f32, width: f32, paint: &Paint) {
    let half = width / 2.0;
    let reach = radius + half + 1.0;
    for y in (cy - reach).floor() as i32..=(cy + reach).ceil() as i32 {
        for x in (cx - reach).floor() as i32..=(cx + reach).ceil() as i32 {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let dist = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
            let aa = (half + 0.5 - (dist - radius).abs()).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.blend(x, y, paint.color_at(px, py), aa);
            }
        }
    }
}

fn fill_circle(canvas: &mut Canvas, cx: f32, cy: f32, radius: f32, paint: &Paint) {
    let reach = radius + 1.0;
    for y in (cy - reach).floor() as i32..=(cy + reach).ceil() as i32 {
        for x in (cx - reach).floor() as i32..=(cx + reach).ceil() as i32 {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let dist = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
            let aa = (radius + 0.5 - dist).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.blend(x, y, paint.color_at(px, py), aa);
            }
        }
    }
}

fn text_width(font: &Font, text: &str, scale: Scale) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

fn draw_text(
    canvas: &mut Canvas,
    font: &Font,
    x: f32,
    baseline: f32,
    text: &str,
    size: f32,
    color: Color,
    bold: bool,
) {
    let scale = Scale::uniform(size);
    let start_x = x - text_width(font, text, scale) / 2.0;
    let glyphs: Vec<PositionedGlyph> = font.layout(text, scale, point(start_x, baseline)).collect();
    // Fake bold: a second pass shifted by one pixel.
    let passes: &[i32] = if bold { &[0, 1] } else { &[0] };
    for shift in passes {
        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    canvas.blend(bb.min.x + gx as i32 + shift, bb.min.y + gy as i32, color, v);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(0xff, 0x00, 0x00);

    fn frame(size: usize) -> Vec<u8> {
        vec![0xff; size * size * 4]
    }

    #[test]
    fn fill_circle_covers_the_center_only() {
        let mut buf = frame(20);
        let mut canvas = Canvas::new(&mut buf, 20, 20);
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::FillCircle {
            cx: 10.0,
            cy: 10.0,
            radius: 5.0,
            paint: Paint::Solid(RED),
        });
        scene.render(&mut canvas, None);
        assert_eq!(canvas.pixel(10, 10), Some([0xff, 0x00, 0x00, 0xff]));
        assert_eq!(canvas.pixel(0, 0), Some([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn stroke_circle_leaves_the_middle_untouched() {
        let mut buf = frame(40);
        let mut canvas = Canvas::new(&mut buf, 40, 40);
        stroke_circle(&mut canvas, 20.0, 20.0, 12.0, 3.0, &Paint::Solid(RED));
        assert_eq!(canvas.pixel(20, 20), Some([0xff, 0xff, 0xff, 0xff]));
        assert_eq!(canvas.pixel(31, 19), Some([0xff, 0x00, 0x00, 0xff]));
    }

    #[test]
    fn transparent_paint_is_a_no_op() {
        let mut buf = frame(10);
        let mut canvas = Canvas::new(&mut buf, 10, 10);
        fill_circle(&mut canvas, 5.0, 5.0, 4.0, &Paint::Solid(Color::TRANSPARENT));
        assert!(buf.iter().all(|b| *b == 0xff));
    }

    #[test]
    fn shapes_are_clipped_to_the_canvas() {
        let mut buf = frame(8);
        let mut canvas = Canvas::new(&mut buf, 8, 8);
        assert_eq!((canvas.width(), canvas.height()), (8, 8));
        draw_line_aa(&mut canvas, -20.0, 4.0, 30.0, 4.0, 2.0, RED);
        fill_circle(&mut canvas, 0.0, 0.0, 50.0, &Paint::Solid(RED));
        assert_eq!(canvas.pixel(7, 7), Some([0xff, 0x00, 0x00, 0xff]));
        assert_eq!(canvas.pixel(8, 0), None);
    }

    #[test]
    fn text_without_a_font_is_skipped() {
        let mut buf = frame(10);
        let mut canvas = Canvas::new(&mut buf, 10, 10);
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Text {
            x: 5.0,
            y: 5.0,
            text: "98".to_string(),
            size: 12.0,
            color: RED,
            bold: true,
        });
        scene.render(&mut canvas, None);
        assert!(buf.iter().all(|b| *b == 0xff));
    }
}
