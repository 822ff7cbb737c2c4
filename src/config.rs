use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LinkerError, Result};

pub const INPUT_GITHUB_TOKEN: &str = "github-token";
pub const INPUT_ISSUE_BASE_URL: &str = "issue-base-url";
pub const INPUT_ISSUE_PREFIX: &str = "issue-prefix";
pub const INPUT_API_URL: &str = "api-url";

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    pub issue_prefix: String,
    pub issue_base_url: String,
    #[serde(default)]
    pub github_token: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
}

// Keeps the token out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("issue_prefix", &self.issue_prefix)
            .field("issue_base_url", &self.issue_base_url)
            .field("github_token", &self.github_token.as_ref().map(|_| "***"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Environment variable the Actions runner uses for an input,
/// e.g. `issue-base-url` -> `INPUT_ISSUE-BASE-URL`.
pub fn input_env_key(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

impl Config {
    /// Reads action inputs from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_inputs(|key| std::env::var(key).ok())
    }

    /// Reads action inputs through `lookup`, which maps an environment
    /// variable name to its value.
    pub fn from_inputs<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let input = |name: &str| {
            lookup(&input_env_key(name))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |name: &str| {
            input(name).ok_or_else(|| LinkerError::MissingInput(name.to_string()))
        };

        let config = Config {
            issue_base_url: required(INPUT_ISSUE_BASE_URL)?,
            issue_prefix: required(INPUT_ISSUE_PREFIX)?,
            github_token: input(INPUT_GITHUB_TOKEN)
                .or_else(|| lookup("GITHUB_TOKEN").filter(|v| !v.is_empty())),
            api_url: input(INPUT_API_URL)
                .or_else(|| lookup("GITHUB_API_URL").filter(|v| !v.is_empty())),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LinkerError::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.issue_prefix.is_empty() {
            return Err(LinkerError::Config("issue_prefix must not be empty".into()));
        }
        if self.issue_base_url.is_empty() {
            return Err(LinkerError::Config(
                "issue_base_url must not be empty".into(),
            ));
        }
        if !self.issue_base_url.starts_with("http://")
            && !self.issue_base_url.starts_with("https://")
        {
            return Err(LinkerError::Config(format!(
                "issue_base_url must be an http(s) URL: {}",
                self.issue_base_url
            )));
        }
        Ok(())
    }
}
