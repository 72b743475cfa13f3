// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::session::policy::Policy;

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "cramdeck.toml";

pub const DEFAULT_PORT: u16 = 8000;

const ENV_API_URL: &str = "CRAMDECK_API_URL";
const ENV_TOKEN: &str = "CRAMDECK_TOKEN";

/// The contents of the configuration file. Every key is optional.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_url: Option<String>,
    token: Option<String>,
    port: Option<u16>,
    open_browser: Option<bool>,
    #[serde(default)]
    policy: Policy,
}

/// Effective settings, after the file, the environment, and command-line
/// flags have been applied.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the flashcard backend.
    pub api_url: String,
    /// Bearer credential for the backend.
    pub token: Option<String>,
    /// Port the drill server listens on.
    pub port: u16,
    pub open_browser: bool,
    pub policy: Policy,
}

impl Config {
    /// Load the configuration from `path`, or from [`DEFAULT_CONFIG_FILE`]
    /// if it exists, then apply the environment.
    pub fn load(path: Option<&Path>) -> Fallible<Self> {
        let file = match path {
            Some(path) => {
                if !path.exists() {
                    return fail(format!("config file {} does not exist.", path.display()));
                }
                Some(path.to_path_buf())
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                path.exists().then_some(path)
            }
        };
        let file: ConfigFile = match file {
            Some(path) => {
                log::debug!("Loading configuration from {}.", path.display());
                toml::from_str(&read_to_string(&path)?)?
            }
            None => {
                log::debug!("No configuration file, using defaults.");
                ConfigFile::default()
            }
        };
        let config = Self::from_file(file, |key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Fallible<Self> {
        let api_url = match env(ENV_API_URL).or(file.api_url) {
            Some(url) => url,
            None => {
                return fail(format!(
                    "no API URL configured: set `api_url` in {DEFAULT_CONFIG_FILE} or {ENV_API_URL}."
                ));
            }
        };
        Ok(Self {
            api_url,
            token: env(ENV_TOKEN).or(file.token),
            port: file.port.unwrap_or(DEFAULT_PORT),
            open_browser: file.open_browser.unwrap_or(true),
            policy: file.policy,
        })
    }

    pub fn validate(&self) -> Fallible<()> {
        let url = self.api_url.trim();
        if url.is_empty() {
            return fail("api_url must not be empty.");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return fail("api_url must start with http:// or https://.");
        }
        self.policy.validate()
    }

    /// The token with all but its last four characters hidden.
    pub fn redacted_token(&self) -> String {
        match &self.token {
            None => "(none)".to_string(),
            Some(token) => {
                let chars: Vec<char> = token.chars().collect();
                if chars.len() <= 4 {
                    "****".to_string()
                } else {
                    let tail: String = chars[chars.len() - 4..].iter().collect();
                    format!("****{tail}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_full_file() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cramdeck.toml");
        write(
            &path,
            r#"
api_url = "https://api.example.com"
token = "secret-token"
port = 9000
open_browser = false

[policy]
max_reviews = 3
reinforce_chance = 0.5
shuffle_ties = false
seed = 42
"#,
        )?;
        let file: ConfigFile = toml::from_str(&read_to_string(&path)?)?;
        let config = Config::from_file(file, no_env)?;
        config.validate()?;
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.token.as_deref(), Some("secret-token"));
        assert_eq!(config.port, 9000);
        assert!(!config.open_browser);
        assert_eq!(config.policy.max_reviews, 3);
        assert_eq!(config.policy.reinforce_chance, 0.5);
        assert!(!config.policy.shuffle_ties);
        assert_eq!(config.policy.seed, Some(42));
        Ok(())
    }

    #[test]
    fn test_defaults() -> Fallible<()> {
        let file: ConfigFile = toml::from_str(r#"api_url = "http://localhost:5000""#)?;
        let config = Config::from_file(file, no_env)?;
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.open_browser);
        assert_eq!(config.token, None);
        assert_eq!(config.policy, Policy::default());
        Ok(())
    }

    #[test]
    fn test_env_overrides_file() -> Fallible<()> {
        let file: ConfigFile =
            toml::from_str("api_url = \"http://file\"\ntoken = \"file-token\"")?;
        let env = |key: &str| match key {
            "CRAMDECK_API_URL" => Some("http://env".to_string()),
            "CRAMDECK_TOKEN" => Some("env-token".to_string()),
            _ => None,
        };
        let config = Config::from_file(file, env)?;
        assert_eq!(config.api_url, "http://env");
        assert_eq!(config.token.as_deref(), Some("env-token"));
        Ok(())
    }

    #[test]
    fn test_missing_api_url() {
        let result = Config::from_file(ConfigFile::default(), no_env);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result: Result<ConfigFile, _> = toml::from_str("api_uri = \"http://x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_policy() -> Fallible<()> {
        let file: ConfigFile =
            toml::from_str("api_url = \"http://x\"\n[policy]\nreinforce_chance = 2.0")?;
        let config = Config::from_file(file, no_env)?;
        assert!(config.validate().is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_url_scheme() -> Fallible<()> {
        let file: ConfigFile = toml::from_str("api_url = \"localhost:8000\"")?;
        let config = Config::from_file(file, no_env)?;
        assert!(config.validate().is_err());
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Some(Path::new("./derpherp.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_path() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("custom.toml");
        write(&path, "api_url = \"http://localhost:1\"\n")?;
        let config = Config::load(Some(&path))?;
        assert_eq!(config.port, DEFAULT_PORT);
        Ok(())
    }

    #[test]
    fn test_redacted_token() {
        let mut config = Config {
            api_url: "http://x".to_string(),
            token: None,
            port: DEFAULT_PORT,
            open_browser: false,
            policy: Policy::default(),
        };
        assert_eq!(config.redacted_token(), "(none)");
        config.token = Some("abc".to_string());
        assert_eq!(config.redacted_token(), "****");
        config.token = Some("abcdefgh".to_string());
        assert_eq!(config.redacted_token(), "****efgh");
    }
}
