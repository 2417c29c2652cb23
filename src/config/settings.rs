use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_color() -> String {
    "#6366F1".to_string()
}
fn default_palette() -> Vec<String> {
    [
        "#0D9488", "#8B5CF6", "#EC4899", "#F59E0B", "#10B981", "#3B82F6", "#EF4444", "#6366F1",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_window_days() -> i64 {
    30
}
fn default_top_habits() -> usize {
    5
}
fn default_tick_rate_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitsConfig {
    /// Color assigned when `add` is given no --color flag.
    #[serde(default = "default_color")]
    pub default_color: String,
    /// Preset colors cycled through for successive habits.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

impl Default for HabitsConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            palette: default_palette(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Rolling window for `report` when --days is not given.
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    /// How many habits the report and dashboard rank.
    #[serde(default = "default_top_habits")]
    pub top_habits: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            top_habits: default_top_habits(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub habits: HabitsConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub tui: TuiConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "cadence").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("cadence.db"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(&path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Pick a color for the nth habit: cycle the palette, fall back to the
    /// default when the palette is emptied out in config.
    pub fn color_for_index(&self, index: usize) -> String {
        if self.habits.palette.is_empty() {
            self.habits.default_color.clone()
        } else {
            self.habits.palette[index % self.habits.palette.len()].clone()
        }
    }
}
