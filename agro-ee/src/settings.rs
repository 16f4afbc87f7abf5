//! Runtime configuration read from the process environment.
//!
//! | variable                       | meaning                                          |
//! |--------------------------------|--------------------------------------------------|
//! | `EE_PROJECT`                   | Cloud project billed for Earth Engine calls      |
//! | `EE_API_URL`                   | REST base URL                                    |
//! | `AGRO_ENV`                     | `development` enables local user credentials     |
//! | `EE_SERVICE_ACCOUNT_KEY`       | service-account key JSON, inline                 |
//! | `EE_SERVICE_ACCOUNT_KEY_FILE`  | path to a service-account key JSON file          |
//! | `EE_CREDENTIALS_FILE`          | override for the local user credentials path     |
//! | `EE_STATES_ASSET`              | override for the states table                    |
//! | `EE_MUNICIPALITIES_ASSET`      | override for the municipalities table            |

use crate::region::RegionCatalog;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://earthengine.googleapis.com/v1";

/// Where the process runs; only development may fall back to local user credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub project: String,
    pub api_url: String,
    pub environment: Environment,
    pub service_account_key: Option<String>,
    pub service_account_key_file: Option<PathBuf>,
    pub user_credentials_file: Option<PathBuf>,
    pub catalog: RegionCatalog,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            environment: Environment::default(),
            service_account_key: None,
            service_account_key_file: None,
            user_credentials_file: None,
            catalog: RegionCatalog::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut catalog = RegionCatalog::default();
        if let Some(asset) = get("EE_STATES_ASSET") {
            catalog.states_asset = asset;
        }
        if let Some(asset) = get("EE_MUNICIPALITIES_ASSET") {
            catalog.municipalities_asset = asset;
        }
        Self {
            project: get("EE_PROJECT").unwrap_or_default(),
            api_url: get("EE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            environment: get("AGRO_ENV")
                .map(|v| Environment::parse(&v))
                .unwrap_or_default(),
            service_account_key: get("EE_SERVICE_ACCOUNT_KEY"),
            service_account_key_file: get("EE_SERVICE_ACCOUNT_KEY_FILE").map(PathBuf::from),
            user_credentials_file: get("EE_CREDENTIALS_FILE")
                .map(PathBuf::from)
                .or_else(|| {
                    get("HOME").map(|home| {
                        PathBuf::from(home)
                            .join(".config")
                            .join("earthengine")
                            .join("credentials")
                    })
                }),
            catalog,
        }
    }

    pub fn with_project(mut self, project: &str) -> Self {
        self.project = project.to_string();
        self
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let s = settings(&[]);
        assert_eq!(s.api_url, DEFAULT_API_URL);
        assert_eq!(s.environment, Environment::Production);
        assert!(s.service_account_key.is_none());
        assert!(s.user_credentials_file.is_none());
        assert_eq!(s.catalog, RegionCatalog::default());
    }

    #[test]
    fn reads_project_and_environment() {
        let s = settings(&[
            ("EE_PROJECT", "agro-dashboard"),
            ("AGRO_ENV", "Development"),
            ("HOME", "/home/ana"),
        ]);
        assert_eq!(s.project, "agro-dashboard");
        assert!(s.is_development());
        assert_eq!(
            s.user_credentials_file,
            Some(PathBuf::from("/home/ana/.config/earthengine/credentials"))
        );
    }

    #[test]
    fn blank_values_are_unset_and_assets_overridable() {
        let s = settings(&[
            ("EE_SERVICE_ACCOUNT_KEY", "  "),
            ("EE_STATES_ASSET", "users/me/states"),
        ]);
        assert!(s.service_account_key.is_none());
        assert_eq!(s.catalog.states_asset, "users/me/states");
        assert_eq!(s.catalog.state_name_field, "NM_UF");
    }
}
