//! Configuration loading and management.

use std::path::{Path, PathBuf};

use camp_core::{DEFAULT_BUFFER_MINUTES, SchedulerConfig};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum gap in minutes between two sessions on the same day.
    pub buffer_minutes: u32,
    /// Leave joint activities out of each child's own list when rendering.
    pub hide_joint_in_child_lists: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            buffer_minutes: DEFAULT_BUFFER_MINUTES,
            hide_joint_in_child_lists: true,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // CAMP_BUFFER_MINUTES, CAMP_HIDE_JOINT_IN_CHILD_LISTS
        figment = figment.merge(Env::prefixed("CAMP_"));

        figment.extract()
    }

    pub const fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            buffer_minutes: self.buffer_minutes,
        }
    }
}

/// Returns the platform-specific config directory for camp.
///
/// On Linux: `~/.config/camp`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("camp"))
}
