use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::eyre;
use serde::Deserialize;
use tracing::{debug, info};

const DEFAULT_REGION: &str = "cn-hangzhou";

/// One entry of `profiles` in the Alibaba Cloud CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CliProfile {
    pub name: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub region_id: String,
}

impl CliProfile {
    pub fn region(&self) -> &str {
        if self.region_id.is_empty() {
            DEFAULT_REGION
        } else {
            &self.region_id
        }
    }
}

/// Profiles known to the Alibaba Cloud CLI, read from `~/.aliyun/config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub current: String,
    #[serde(default)]
    pub profiles: Vec<CliProfile>,
}

impl CliConfig {
    pub fn profile(&self, name: &str) -> Option<&CliProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// The profile marked current, or the first one when that name is stale.
    pub fn current_profile(&self) -> Option<&CliProfile> {
        self.profile(&self.current).or_else(|| self.profiles.first())
    }

    pub fn profile_names(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.name.clone()).collect()
    }
}

pub fn cli_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".aliyun").join("config.json"))
}

/// Load the CLI profiles. Having none at all is a startup error.
pub fn load_cli_config() -> color_eyre::Result<CliConfig> {
    let path = cli_config_path().ok_or_else(|| eyre!("Could not determine home directory"))?;
    load_cli_config_from(&path)
}

pub fn load_cli_config_from(path: &Path) -> color_eyre::Result<CliConfig> {
    debug!(path = %path.display(), "Reading Alibaba Cloud CLI configuration");

    let content = fs::read_to_string(path).map_err(|e| {
        eyre!(
            "Could not read {}: {e}. Run `aliyun configure` to create a profile",
            path.display()
        )
    })?;
    let config: CliConfig = serde_json::from_str(&content)?;

    if config.profiles.is_empty() {
        return Err(eyre!(
            "No profiles found in {}. Run `aliyun configure` to create one",
            path.display()
        ));
    }

    info!(
        count = config.profiles.len(),
        current = %config.current,
        "Discovered Alibaba Cloud CLI profiles"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_loads_profiles() {
        let (_dir, path) = write_config(
            r#"{
                "current": "prod",
                "profiles": [
                    {"name": "default", "mode": "AK", "region_id": "cn-hangzhou", "access_key_id": "x"},
                    {"name": "prod", "mode": "StsToken", "region_id": "cn-shanghai"}
                ],
                "meta_path": ""
            }"#,
        );
        let config = load_cli_config_from(&path).unwrap();
        assert_eq!(config.current_profile().unwrap().name, "prod");
        assert_eq!(config.profile("default").unwrap().region(), "cn-hangzhou");
        assert_eq!(config.profile_names(), vec!["default", "prod"]);
    }

    #[test]
    fn test_stale_current_falls_back_to_first() {
        let (_dir, path) = write_config(
            r#"{"current": "gone", "profiles": [{"name": "default", "region_id": ""}]}"#,
        );
        let config = load_cli_config_from(&path).unwrap();
        let profile = config.current_profile().unwrap();
        assert_eq!(profile.name, "default");
        assert_eq!(profile.region(), DEFAULT_REGION);
    }

    #[test]
    fn test_no_profiles_is_an_error() {
        let (_dir, path) = write_config(r#"{"current": "", "profiles": []}"#);
        assert!(load_cli_config_from(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_cli_config_from(&dir.path().join("config.json")).is_err());
    }
}
