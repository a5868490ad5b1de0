//! xrgallery - gaze/pinch content gallery for immersive sessions
//!
//! Headless demo driver: builds the session, runs a bounded frame loop
//! with optionally scripted pinch gestures, then disposes.

mod config;
mod input;
mod session;

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{info, warn};
use xrgallery_assets::{catalog_from_file, default_catalog};
use xrgallery_core::Hand;

use config::GalleryConfig;
use input::{InputBridge, PinchEvent, PinchPhase};
use session::GallerySession;

/// Options parsed from the command line.
struct CliOptions {
    config_path: Option<String>,
    catalog_path: Option<String>,
    frames: u64,
    /// Scripted pinches: (frame, hand, panel index).
    pinches: Vec<(u64, Hand, usize)>,
}

impl CliOptions {
    fn parse(mut args: impl Iterator<Item = String>) -> Self {
        let mut options = CliOptions {
            config_path: None,
            catalog_path: None,
            frames: 120,
            pinches: Vec::new(),
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => options.config_path = args.next(),
                "--catalog" => options.catalog_path = args.next(),
                "--frames" => {
                    if let Some(value) = args.next().and_then(|v| v.parse().ok()) {
                        options.frames = value;
                    } else {
                        warn!("--frames expects a number");
                    }
                }
                "--pinch" => match args.next().map(|v| parse_pinch(&v)) {
                    Some(Some(pinch)) => options.pinches.push(pinch),
                    _ => warn!("--pinch expects FRAME:HAND:PANEL (e.g. 30:right:1)"),
                },
                other => warn!("ignoring unknown argument {other:?}"),
            }
        }
        options
    }
}

fn parse_pinch(value: &str) -> Option<(u64, Hand, usize)> {
    let mut parts = value.split(':');
    let frame = parts.next()?.parse().ok()?;
    let hand = Hand::parse(parts.next()?)?;
    let panel = parts.next()?.parse().ok()?;
    Some((frame, hand, panel))
}

fn main() -> Result<()> {
    // WARN by default; override via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting xrgallery v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(std::env::args().skip(1));
    let config = match cli.config_path.as_deref() {
        Some(path) => GalleryConfig::load_from_path(Path::new(path)),
        None => GalleryConfig::load(),
    };

    let catalog_path = cli.catalog_path.clone().or(config.catalog_path.clone());
    let items = match catalog_path.as_deref() {
        Some(path) => match catalog_from_file(Path::new(path)) {
            Ok(items) => items,
            Err(err) => {
                warn!(%path, %err, "catalog load failed, using built-in demo catalog");
                default_catalog()
            }
        },
        None => default_catalog(),
    };

    let mut input = InputBridge::new();
    let mut session = GallerySession::create(&config, &items, &mut input)?;
    info!(
        panels = session.panels().len(),
        objects = session.registry().len(),
        "session ready"
    );

    let frame_time = Duration::from_millis(16);
    for frame in 0..cli.frames {
        for &(at, hand, panel) in &cli.pinches {
            if at != frame {
                continue;
            }
            match session.aim_at_panel(panel) {
                Some(pose) => {
                    input.emit(PinchEvent {
                        hand,
                        phase: PinchPhase::Start(pose),
                    });
                    input.emit(PinchEvent {
                        hand,
                        phase: PinchPhase::End,
                    });
                }
                None => warn!(panel, "scripted pinch targets a missing panel"),
            }
        }
        session.run_frame(Instant::now());
        std::thread::sleep(frame_time);
    }

    session.dispose(&mut input);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pinch_argument() {
        assert_eq!(parse_pinch("30:right:1"), Some((30, Hand::Right, 1)));
        assert_eq!(parse_pinch("0:l:2"), Some((0, Hand::Left, 2)));
        assert_eq!(parse_pinch("30:right"), None);
        assert_eq!(parse_pinch("x:right:1"), None);
    }

    #[test]
    fn test_cli_defaults() {
        let options = CliOptions::parse(std::iter::empty());
        assert_eq!(options.frames, 120);
        assert!(options.pinches.is_empty());
    }

    #[test]
    fn test_cli_parse_flags() {
        let args = ["--frames", "10", "--pinch", "3:left:0", "--catalog", "c.json"]
            .into_iter()
            .map(String::from);
        let options = CliOptions::parse(args);
        assert_eq!(options.frames, 10);
        assert_eq!(options.pinches, vec![(3, Hand::Left, 0)]);
        assert_eq!(options.catalog_path.as_deref(), Some("c.json"));
    }
}
