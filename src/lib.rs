// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod animation;
pub mod config;
pub mod error;
pub mod format;
pub mod gradient;
pub mod layout;
pub mod render;
pub mod view;

// External crate imports
use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, error, info, warn};

// Standard library imports
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

pub use animation::{Clock, Easing, ManualClock, SystemClock};
pub use config::{Color, ColorParseError, ConfigError, RadarConfig};
pub use error::RadarError;
pub use format::{format_value, FormatError, DEFAULT_FORMAT};
pub use layout::{Geometry, MeasureSpec, Padding};
pub use render::{Canvas, DrawCommand, Paint, Scene};
pub use view::{DisplayMode, RadarView, ScoreOptions, StringResources};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Command enum for driving a radar window from another thread.
#[derive(Debug, Clone, PartialEq)]
pub enum RadarCommand {
    Start,
    StartWithColors(Vec<Color>),
    Stop,
    ShowScore(ScoreOptions),
    ShowText(String),
    SetLabelText(String),
    SetScanColors(Vec<Color>),
    SetCircleColors(Vec<Color>),
    ResetGradientColors,
    SetRadar(bool),
}

impl RadarCommand {
    pub fn apply(self, view: &mut RadarView) {
        match self {
            RadarCommand::Start => view.start(),
            RadarCommand::StartWithColors(colors) => view.start_with_colors(&colors),
            RadarCommand::Stop => view.stop(),
            RadarCommand::ShowScore(options) => view.show_score(options),
            RadarCommand::ShowText(text) => view.show_text(text),
            RadarCommand::SetLabelText(text) => view.set_label_text(text),
            RadarCommand::SetScanColors(colors) => view.set_scan_colors(&colors),
            RadarCommand::SetCircleColors(colors) => view.set_circle_colors(&colors),
            RadarCommand::ResetGradientColors => view.reset_gradient_colors(),
            RadarCommand::SetRadar(radar) => view.set_radar(radar),
        }
    }
}

/// A radar view hosted in its own window.
#[derive(Debug)]
pub struct RadarWindow {
    config: RadarConfig,
    view: RadarView,
}

impl RadarWindow {
    pub fn new(config: RadarConfig) -> Self {
        let view = RadarView::new(&config);
        Self { config, view }
    }

    pub fn view(&self) -> &RadarView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut RadarView {
        &mut self.view
    }

    pub fn show(self) -> Result<(), RadarError> {
        self.run_window(None)
    }

    pub fn show_with_commands(self, receiver: Receiver<RadarCommand>) -> Result<(), RadarError> {
        self.run_window(Some(receiver))
    }

    fn run_window(self, receiver: Option<Receiver<RadarCommand>>) -> Result<(), RadarError> {
        let RadarWindow { config, mut view } = self;
        let font = config.load_font()?;
        let (width, height) = view.geometry().size();

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(width, height))
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        view.on_size_changed(size.width, size.height);
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let background = config.background_color;
        let frame_duration = Duration::from_secs_f64(1.0 / config.max_framerate);
        let mut last_frame = Instant::now();
        info!(width = size.width, height = size.height, title = %config.title, "radar window opened");

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        debug!("radar window closed");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if new_size.width == 0 || new_size.height == 0 {
                            return;
                        }
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                            warn!(%err, "failed to resize pixel buffer");
                        }
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            warn!(%err, "failed to resize surface");
                        }
                        view.on_size_changed(new_size.width, new_size.height);
                    }
                    WindowEvent::RedrawRequested => {
                        let scene = view.draw();
                        let frame = pixels.frame_mut();
                        let mut canvas = Canvas::new(frame, fb_width, fb_height);
                        canvas.clear(background);
                        scene.render(&mut canvas, font.as_ref());
                        if let Err(err) = pixels.render() {
                            error!(%err, "failed to present frame");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        if let Some(ref receiver) = receiver {
                            while let Ok(command) = receiver.try_recv() {
                                command.apply(&mut view);
                            }
                        }
                        view.tick();
                        if view.take_invalidation() {
                            window_clone.request_redraw();
                        }
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn commands_drive_the_view() {
        let clock = ManualClock::new();
        let mut view = RadarView::with_clock(&RadarConfig::default(), Arc::new(clock.clone()));

        RadarCommand::StartWithColors(vec![Color::TRANSPARENT, Color::WHITE]).apply(&mut view);
        assert!(view.is_scanning());
        assert_eq!(view.scan_colors(), vec![Color::TRANSPARENT, Color::WHITE]);

        RadarCommand::ShowScore(ScoreOptions::builder().to(12.0).animate(false).build())
            .apply(&mut view);
        assert_eq!(view.mode(), DisplayMode::Score);
        assert_eq!(view.text(), Some("12"));

        RadarCommand::Stop.apply(&mut view);
        assert!(!view.is_scanning());

        RadarCommand::ResetGradientColors.apply(&mut view);
        assert_eq!(view.scan_colors().len(), 3);
    }
}
