//! Start-up configuration, read from `PINCH_*` environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `PINCH_CAMERA` | `0` | camera index |
//! | `PINCH_WIDTH` / `PINCH_HEIGHT` | `640` / `480` | requested capture size |
//! | `PINCH_MIRROR` | `true` | flip the feed like a mirror |
//! | `PINCH_THRESHOLD` | `0.05` | pinch distance cutoff |
//! | `PINCH_SMOOTHING` | `0.5` | cursor smoothing alpha |
//! | `PINCH_COLOR` | `ff3b6b` | stroke color |
//! | `PINCH_SIZE` | `6` | stroke width in pixels |
//! | `PINCH_TRACKER` | unset | detector command; unset uses the mouse |
//! | `PINCH_EXPORT` | `pinch-drawing.png` | where `S` saves |
//!
//! Values that don't parse fall back to the default with a warning.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::error::Error;
use crate::session::DrawSettings;
use crate::types::Color;

pub const DEFAULT_EXPORT_PATH: &str = "pinch-drawing.png";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub camera_index: u32,
    pub width: u32,
    pub height: u32,
    pub mirror: bool,
    pub draw: DrawSettings,
    pub tracker_command: Option<String>,
    pub export_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            width: 640,
            height: 480,
            mirror: true,
            draw: DrawSettings::default(),
            tracker_command: None,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let color = match lookup("PINCH_COLOR") {
            Some(raw) => Color::from_hex(&raw).unwrap_or_else(|| {
                warn!(key = "PINCH_COLOR", value = %raw, "unparsable value, using default");
                d.draw.color
            }),
            None => d.draw.color,
        };

        let draw = DrawSettings {
            threshold: parse_or(&lookup, "PINCH_THRESHOLD", d.draw.threshold),
            alpha: parse_or(&lookup, "PINCH_SMOOTHING", d.draw.alpha),
            color,
            width: parse_or(&lookup, "PINCH_SIZE", d.draw.width),
        }
        .sanitized();

        Self {
            camera_index: parse_or(&lookup, "PINCH_CAMERA", d.camera_index),
            width: parse_or(&lookup, "PINCH_WIDTH", d.width),
            height: parse_or(&lookup, "PINCH_HEIGHT", d.height),
            mirror: parse_or(&lookup, "PINCH_MIRROR", d.mirror),
            draw,
            tracker_command: lookup("PINCH_TRACKER").filter(|c| !c.trim().is_empty()),
            export_path: lookup("PINCH_EXPORT").map(PathBuf::from).unwrap_or(d.export_path),
        }
    }

    /// Reject settings the camera or window can't work with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "capture size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.export_path.as_os_str().is_empty() {
            return Err(Error::Config("PINCH_EXPORT is empty".into()));
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!(key, value = %raw, "unparsable value, using default");
            default
        }),
    }
}
