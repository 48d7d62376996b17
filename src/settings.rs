use std::env;
use std::path::PathBuf;

use crate::accounts::load::file::FileAccountsLoader;

pub mod defaults {
    pub const PROFILE: &str = "default";
    pub const REGION: &str = "eu-west-1";
}

mod vars {
    pub const PROFILE: &str = "AWS_PROFILE";
    pub const REGION: &str = "AWS_REGION";
    pub const CONFIG: &str = "NEOTK_CONFIG";
}

/// Process-level settings, read once from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub profile: String,
    pub region: String,
    pub config_path: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Settings {
        Settings::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Settings {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Settings {
            profile: non_empty(vars::PROFILE).unwrap_or_else(|| defaults::PROFILE.to_string()),
            region: non_empty(vars::REGION).unwrap_or_else(|| defaults::REGION.to_string()),
            config_path: non_empty(vars::CONFIG).map(PathBuf::from),
        }
    }

    /// An explicit `NEOTK_CONFIG` must exist; the default location may not.
    pub fn accounts_loader(&self) -> FileAccountsLoader {
        match self.config_path.as_ref() {
            Some(path) => FileAccountsLoader::required(path),
            None => FileAccountsLoader::optional(default_config_path()),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("neotk")
        .join("accounts.toml")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn falls_back_to_defaults() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.profile, "default");
        assert_eq!(settings.region, "eu-west-1");
        assert_eq!(settings.config_path, None);
        assert!(settings
            .accounts_loader()
            .path()
            .ends_with("neotk/accounts.toml"));
    }

    #[test]
    fn reads_overrides() {
        let vars = HashMap::from([
            ("AWS_PROFILE", "ops"),
            ("AWS_REGION", "us-east-1"),
            ("NEOTK_CONFIG", "/etc/neotk.toml"),
        ]);
        let settings = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(settings.profile, "ops");
        assert_eq!(settings.region, "us-east-1");
        assert_eq!(settings.accounts_loader().path(), PathBuf::from("/etc/neotk.toml"));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let settings = Settings::from_lookup(|_| Some(String::new()));
        assert_eq!(settings.profile, "default");
    }
}
