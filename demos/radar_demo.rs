use radarview::{Color, RadarCommand, RadarConfig, RadarWindow, ScoreOptions};
use rand::Rng;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RadarConfig::builder()
        .title("Radar demo".to_string())
        .maybe_font_path(std::env::var_os("RADAR_FONT").map(PathBuf::from))
        .label_text("SCORE".to_string())
        .build();
    let circle_color = config.circle_color;
    let window = RadarWindow::new(config);

    let (sender, receiver) = mpsc::channel();

    // Reads one command per line: radar, score, style, stop.
    thread::spawn(move || {
        let mut rng = rand::rng();
        let mut full_sweep = false;
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let command = match line.trim() {
                "radar" | "r" => RadarCommand::Start,
                "stop" => RadarCommand::Stop,
                "score" | "s" => RadarCommand::ShowScore(
                    ScoreOptions::builder()
                        .to(rng.random_range(60.0..100.0f32).round())
                        .build(),
                ),
                "style" | "t" => {
                    full_sweep = !full_sweep;
                    if full_sweep {
                        RadarCommand::SetScanColors(vec![Color::TRANSPARENT, circle_color])
                    } else {
                        RadarCommand::SetScanColors(vec![
                            Color::TRANSPARENT,
                            Color::TRANSPARENT,
                            circle_color,
                        ])
                    }
                }
                other => {
                    eprintln!("unknown command {other:?}; try radar, score, style or stop");
                    continue;
                }
            };
            if sender.send(command).is_err() {
                break;
            }
        }
    });

    println!("Type radar, score, style or stop and press enter.");
    window.show_with_commands(receiver)?;
    Ok(())
}
