use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Settings file looked up in the install root.
pub const SETTINGS_FILE: &str = "dashboard.json";

/// Optional startup settings. Every field has a default, so a partial (or
/// absent) settings file is fine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Where the batch job's tables live. Relative paths are resolved
    /// against the install root.
    pub output_dir: PathBuf,
    pub top_genres: usize,
    pub top_users: usize,
    pub top_movies: usize,
    pub rating_bins: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            top_genres: 10,
            top_users: 10,
            top_movies: 20,
            rating_bins: 10,
        }
    }
}

impl DashboardConfig {
    /// Load `dashboard.json` from `root` if present, otherwise defaults.
    /// The output directory of the result is absolute (joined onto `root`).
    pub fn load_from(root: &Path) -> Result<Self> {
        let path = root.join(SETTINGS_FILE);
        let mut cfg = if path.is_file() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let cfg: DashboardConfig = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            log::info!("Loaded settings from {}", path.display());
            cfg
        } else {
            DashboardConfig::default()
        };
        cfg.output_dir = root.join(&cfg.output_dir);
        Ok(cfg)
    }

    /// Settings for the running executable.
    pub fn load() -> Result<Self> {
        Self::load_from(&install_root()?)
    }
}

/// Parent of the parent of the running executable.
///
/// For `target/release/film-dashboard` this is `target/`, so the default
/// output directory is `target/output`.
pub fn install_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("locating the running executable")?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .with_context(|| format!("{} has no grandparent directory", exe.display()))
}
