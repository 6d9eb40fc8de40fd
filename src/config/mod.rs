pub mod actions;
mod defaults;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

use std::time::Duration;

pub use actions::*;
use keybindings::KeybindingsConfig;
pub use loader::load;
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

const DEFAULT_EDITOR: &str = "vi";
const DEFAULT_PAGER: &str = "less";
const DEFAULT_FINDER_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

/// Programs used to open detail content outside the TUI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalConfig {
    pub editor: Option<String>,
    pub pager: Option<String>,
}

impl ExternalConfig {
    pub fn editor_command(&self) -> String {
        resolve_program(self.editor.as_deref(), "EDITOR", DEFAULT_EDITOR)
    }

    pub fn pager_command(&self) -> String {
        resolve_program(self.pager.as_deref(), "PAGER", DEFAULT_PAGER)
    }
}

fn resolve_program(configured: Option<&str>, env_var: &str, fallback: &str) -> String {
    configured
        .map(str::to_string)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| std::env::var(env_var).ok().filter(|s| !s.trim().is_empty()))
        .unwrap_or_else(|| fallback.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Upper bound for a single category lookup. Zero disables the timeout.
    pub timeout_secs: u64,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_FINDER_TIMEOUT_SECS,
        }
    }
}

impl FinderConfig {
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AliyunConfig {
    /// Name or path of the Alibaba Cloud CLI binary.
    pub binary: String,
}

impl Default for AliyunConfig {
    fn default() -> Self {
        Self {
            binary: "aliyun".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
    #[serde(default)]
    pub external: ExternalConfig,
    #[serde(default)]
    pub finder: FinderConfig,
    #[serde(default)]
    pub aliyun: AliyunConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [finder]
            timeout_secs = 0

            [keybindings.detail]
            edit = "E"
            "#,
        )
        .unwrap();

        assert_eq!(config.finder.timeout(), None);
        assert_eq!(config.keybindings.detail.edit.display(), "E");
        assert_eq!(config.keybindings.detail.yank.display(), "y");
        assert_eq!(config.aliyun.binary, "aliyun");
        assert_eq!(config.theme.name, "Catppuccin Mocha");
    }

    #[test]
    fn test_configured_editor_wins() {
        let external = ExternalConfig {
            editor: Some("nvim -R".to_string()),
            pager: None,
        };
        assert_eq!(external.editor_command(), "nvim -R");
    }

    #[test]
    fn test_blank_program_falls_back() {
        assert_eq!(resolve_program(Some("  "), "LAZYALIYUN_UNSET_VAR", "vi"), "vi");
    }
}
