use octocrab::Octocrab;
use tracing::info;

use crate::config::Config;
use crate::error::{LinkerError, Result};

pub const STATUS_OK: u16 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub owner: String,
    pub repo: String,
    pub pull_number: u64,
    pub body: String,
}

/// Writes a pull request body back to the remote, returning the HTTP status.
pub trait PullRequestWriter {
    async fn update_body(&self, request: &UpdateRequest) -> Result<u16>;
}

pub struct GitHubClient {
    octocrab: Octocrab,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Octocrab::builder();

        if let Some(token) = &config.github_token {
            builder = builder.personal_token(token.clone());
        } else {
            info!("no github token configured, using anonymous client");
        }

        if let Some(api_url) = &config.api_url {
            builder = builder
                .base_uri(api_url.as_str())
                .map_err(|e| LinkerError::GitHub(format!("invalid api url {api_url}: {e}")))?;
        }

        let octocrab = builder
            .build()
            .map_err(|e| LinkerError::GitHub(format!("failed to build octocrab: {e}")))?;

        Ok(Self { octocrab })
    }
}

impl PullRequestWriter for GitHubClient {
    async fn update_body(&self, request: &UpdateRequest) -> Result<u16> {
        info!(
            "updating body of {}/{}#{}",
            request.owner, request.repo, request.pull_number
        );

        let result = self
            .octocrab
            .pulls(&request.owner, &request.repo)
            .update(request.pull_number)
            .body(&request.body)
            .send()
            .await;

        match result {
            Ok(_) => Ok(STATUS_OK),
            Err(octocrab::Error::GitHub { source, .. }) => Ok(source.status_code.as_u16()),
            Err(e) => Err(e.into()),
        }
    }
}
