use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::Result;

pub const CONFIG_FILE_NAME: &str = ".cea_analyzer_config.json";

// ---------------------------------------------------------------------------
// Heat-map interpolation kernels
// ---------------------------------------------------------------------------

/// Interpolation kernel used when rendering sensitivity heat maps.
/// Unknown names read back as `Nearest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    None,
    #[default]
    Nearest,
    Bilinear,
    Bicubic,
    Spline16,
    Spline36,
    Hanning,
    Hamming,
    Hermite,
    Kaiser,
    Quadric,
    Catrom,
    Gaussian,
    Bessel,
    Mitchell,
    Sinc,
    Lanczos,
    Antialiased,
}

impl Interpolation {
    pub const ALL: [Interpolation; 18] = [
        Interpolation::None,
        Interpolation::Nearest,
        Interpolation::Bilinear,
        Interpolation::Bicubic,
        Interpolation::Spline16,
        Interpolation::Spline36,
        Interpolation::Hanning,
        Interpolation::Hamming,
        Interpolation::Hermite,
        Interpolation::Kaiser,
        Interpolation::Quadric,
        Interpolation::Catrom,
        Interpolation::Gaussian,
        Interpolation::Bessel,
        Interpolation::Mitchell,
        Interpolation::Sinc,
        Interpolation::Lanczos,
        Interpolation::Antialiased,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Interpolation::None => "none",
            Interpolation::Nearest => "nearest",
            Interpolation::Bilinear => "bilinear",
            Interpolation::Bicubic => "bicubic",
            Interpolation::Spline16 => "spline16",
            Interpolation::Spline36 => "spline36",
            Interpolation::Hanning => "hanning",
            Interpolation::Hamming => "hamming",
            Interpolation::Hermite => "hermite",
            Interpolation::Kaiser => "kaiser",
            Interpolation::Quadric => "quadric",
            Interpolation::Catrom => "catrom",
            Interpolation::Gaussian => "gaussian",
            Interpolation::Bessel => "bessel",
            Interpolation::Mitchell => "mitchell",
            Interpolation::Sinc => "sinc",
            Interpolation::Lanczos => "lanczos",
            Interpolation::Antialiased => "antialiased",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl<'de> Deserialize<'de> for Interpolation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .and_then(Interpolation::from_name)
            .unwrap_or_else(|| {
                warn!(%value, "unknown heatmap_interp, using \"nearest\"");
                Interpolation::Nearest
            }))
    }
}

// ---------------------------------------------------------------------------
// Persisted settings
// ---------------------------------------------------------------------------

/// User settings, stored as JSON. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub heatmap_interp: Interpolation,
    /// Shown in the optimisation summary only.
    pub regression_degree: u32,
    pub pdf_report_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            heatmap_interp: Interpolation::Nearest,
            regression_degree: 2,
            pdf_report_title: "CEA Analysis Report".into(),
        }
    }
}

impl Config {
    /// Write the settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// `~/.cea_analyzer_config.json`, if a home directory is known.
pub fn default_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(CONFIG_FILE_NAME))
}

/// Load settings from `path`. A missing or unreadable file is replaced by
/// the defaults, which are written back to `path`.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        let loaded = fs::read_to_string(path)
            .map_err(crate::error::CeaError::from)
            .and_then(|s| serde_json::from_str::<Config>(&s).map_err(Into::into));
        match loaded {
            Ok(cfg) => return Ok(cfg),
            Err(e) => warn!(path = %path.display(), error = %e, "resetting unreadable config"),
        }
    }
    let cfg = Config::default();
    cfg.save(path)?;
    Ok(cfg)
}

/// Load settings from the per-user default location.
pub fn load() -> Result<Config> {
    match default_path() {
        Some(path) => load_or_default(&path),
        None => {
            warn!("no home directory, using built-in config defaults");
            Ok(Config::default())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
