use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use chaosfield_core::{Attractor, NewtonParams, Viewport, ZoomMode};
use chaosfield_render::{DensityScale, GridMode};

// ---------------------------------------------------------------------------
// Newton basin settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewtonSettings {
    /// Coefficients, highest degree first.
    #[serde(default = "default_polynomial")]
    pub polynomial: Vec<f64>,
    #[serde(default = "default_resolution")]
    pub resolution: usize,
    #[serde(default)]
    pub grid_mode: GridMode,
    #[serde(default)]
    pub newton: NewtonParams,
    /// Region for still renders. When absent, one is derived from the roots.
    #[serde(default)]
    pub viewport: Option<Viewport>,
    #[serde(default = "default_newton_palette")]
    pub palette: String,
    #[serde(default = "default_true")]
    pub brightness: bool,
}

fn default_polynomial() -> Vec<f64> {
    vec![1.0, 0.0, 0.0, 1.0, -1.0, 1.0]
}
fn default_resolution() -> usize {
    1000
}
fn default_newton_palette() -> String {
    "cubehelix".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for NewtonSettings {
    fn default() -> Self {
        Self {
            polynomial: default_polynomial(),
            resolution: default_resolution(),
            grid_mode: GridMode::default(),
            newton: NewtonParams::default(),
            viewport: None,
            palette: default_newton_palette(),
            brightness: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Zoom animation settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomSettings {
    #[serde(default = "default_zoom_start")]
    pub start: Viewport,
    #[serde(default = "default_zoom_end")]
    pub end: Viewport,
    #[serde(default = "default_frames")]
    pub frames: usize,
    #[serde(default)]
    pub mode: ZoomMode,
    #[serde(default = "default_zoom_prefix")]
    pub prefix: String,
}

fn default_zoom_start() -> Viewport {
    Viewport {
        x: (-1.5, 1.5),
        y: (-1.5, 1.5),
    }
}
fn default_zoom_end() -> Viewport {
    Viewport {
        x: (-1.009290, -1.009265),
        y: (0.147300, 0.147325),
    }
}
fn default_frames() -> usize {
    100
}
fn default_zoom_prefix() -> String {
    "zoom".to_string()
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            start: default_zoom_start(),
            end: default_zoom_end(),
            frames: default_frames(),
            mode: ZoomMode::default(),
            prefix: default_zoom_prefix(),
        }
    }
}

// ---------------------------------------------------------------------------
// Attractor settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractorSettings {
    #[serde(default = "Attractor::fractal_dream_preset")]
    pub attractor: Attractor,
    #[serde(default = "default_seed_point")]
    pub seed_point: (f64, f64),
    #[serde(default = "default_points")]
    pub points: usize,
    #[serde(default = "default_canvas_size")]
    pub width: u32,
    #[serde(default = "default_canvas_size")]
    pub height: u32,
    #[serde(default = "default_attractor_palette")]
    pub palette: String,
    #[serde(default)]
    pub scale: DensityScale,
    #[serde(default = "default_background")]
    pub background: [u8; 3],
}

fn default_seed_point() -> (f64, f64) {
    Attractor::DEFAULT_SEED
}
fn default_points() -> usize {
    10_000_000
}
fn default_canvas_size() -> u32 {
    1000
}
fn default_attractor_palette() -> String {
    "bmy".to_string()
}
/// Gainsboro.
fn default_background() -> [u8; 3] {
    [220, 220, 220]
}

impl Default for AttractorSettings {
    fn default() -> Self {
        Self {
            attractor: Attractor::fractal_dream_preset(),
            seed_point: default_seed_point(),
            points: default_points(),
            width: default_canvas_size(),
            height: default_canvas_size(),
            palette: default_attractor_palette(),
            scale: DensityScale::default(),
            background: default_background(),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level settings
// ---------------------------------------------------------------------------

/// Everything a run needs. Loaded from JSON; every field has a default so
/// partial files are fine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Output directory. When empty, an `images/` folder next to the
    /// executable is used.
    #[serde(default)]
    pub output_dir: String,
    #[serde(default)]
    pub newton: NewtonSettings,
    #[serde(default)]
    pub zoom: ZoomSettings,
    #[serde(default)]
    pub attractor: AttractorSettings,
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<Settings>(&json) {
                    Ok(settings) => {
                        info!("Loaded settings from {}", path.display());
                        return settings;
                    }
                    Err(e) => {
                        error!("Failed to parse settings: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read settings file: {e}");
                }
            }
        } else {
            debug!("No settings file at {}", path.display());
        }
        Self::default()
    }

    /// Write settings as pretty JSON.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, json)?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    pub fn output_dir(&self) -> PathBuf {
        if self.output_dir.is_empty() {
            crate::app_dir::images_directory()
        } else {
            PathBuf::from(&self.output_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_gallery_setup() {
        let s = Settings::default();
        assert_eq!(s.newton.polynomial, vec![1.0, 0.0, 0.0, 1.0, -1.0, 1.0]);
        assert_eq!(s.newton.newton.steps, 20);
        assert_eq!(s.zoom.mode, ZoomMode::Geometric);
        assert_eq!(s.zoom.start.x, (-1.5, 1.5));
        assert_eq!(s.attractor.attractor, Attractor::fractal_dream_preset());
        assert_eq!(s.attractor.seed_point, (0.1, 0.1));
    }

    #[test]
    fn empty_json_gives_defaults() {
        let s: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let json = r#"{
            "output_dir": "renders",
            "newton": { "resolution": 64, "newton": { "steps": 5 } },
            "attractor": { "attractor": { "kind": "ikeda", "u": 0.9 }, "scale": "linear" }
        }"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.output_dir(), PathBuf::from("renders"));
        assert_eq!(s.newton.resolution, 64);
        assert_eq!(s.newton.newton.steps, 5);
        assert_eq!(s.newton.palette, "cubehelix");
        assert_eq!(s.attractor.attractor, Attractor::Ikeda { u: 0.9 });
        assert_eq!(s.attractor.scale, DensityScale::Linear);
        assert_eq!(s.zoom, ZoomSettings::default());
    }

    #[test]
    fn invalid_values_rejected() {
        let bad = r#"{ "zoom": { "start": { "x": [1.0, 1.0], "y": [0.0, 1.0] } } }"#;
        assert!(serde_json::from_str::<Settings>(bad).is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("chaosfield_settings_{}", std::process::id()));
        let path = dir.join("settings.json");
        let mut s = Settings::default();
        s.zoom.frames = 12;
        s.newton.viewport = Some(Viewport::square((-2.0, 2.0)).unwrap());
        s.save(&path).unwrap();
        let loaded = Settings::load(&path);
        assert_eq!(loaded.zoom.frames, 12);
        assert_eq!(loaded.newton.viewport, s.newton.viewport);
        assert_eq!(loaded.newton.polynomial, s.newton.polynomial);
        assert_eq!(loaded.attractor.background, [220, 220, 220]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unreadable_file_falls_back() {
        let dir = std::env::temp_dir().join(format!("chaosfield_bad_settings_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        assert_eq!(Settings::load(&dir.join("missing.json")), Settings::default());
        let _ = fs::remove_dir_all(&dir);
    }
}
