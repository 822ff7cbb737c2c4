use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{LinkerError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
  #[serde(default)]
  pub pull_request: Option<PullRequest>,
  #[serde(default)]
  pub repository: Option<Repository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
  pub number: u64,
  #[serde(default)]
  pub body: Option<String>,
  pub head: Head,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Head {
  #[serde(rename = "ref")]
  pub ref_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
  pub name: String,
  pub owner: Owner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
  pub login: String,
}

/// The pull request that triggered the run, with its repository resolved.
#[derive(Debug, Clone)]
pub struct PullRequestContext {
  pub owner: String,
  pub repo: String,
  pub number: u64,
  pub branch: String,
  pub body: Option<String>,
}

impl PullRequestContext {
  /// Loads the payload at `GITHUB_EVENT_PATH`; the repository comes from
  /// `GITHUB_REPOSITORY` when set.
  pub fn from_env() -> Result<Self> {
    let path = std::env::var("GITHUB_EVENT_PATH")
      .map_err(|_| LinkerError::Event("GITHUB_EVENT_PATH not set".into()))?;
    let repository = std::env::var("GITHUB_REPOSITORY").ok();
    Self::load(Path::new(&path), repository.as_deref())
  }

  pub fn load(path: &Path, repository: Option<&str>) -> Result<Self> {
    debug!("reading event payload from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    let payload: EventPayload = serde_json::from_str(&content)?;
    Self::from_payload(payload, repository)
  }

  pub fn from_payload(payload: EventPayload, repository: Option<&str>) -> Result<Self> {
    let pr = payload
      .pull_request
      .ok_or(LinkerError::MissingPullRequest)?;

    let (owner, repo) = match repository.and_then(|r| r.split_once('/')) {
      Some((owner, repo)) => (owner.to_string(), repo.to_string()),
      None => {
        let repository = payload.repository.ok_or_else(|| {
          LinkerError::Event("repository not found in GITHUB_REPOSITORY or payload".into())
        })?;
        (repository.owner.login, repository.name)
      }
    };

    Ok(Self {
      owner,
      repo,
      number: pr.number,
      branch: pr.head.ref_name,
      body: pr.body,
    })
  }

  pub fn full_repo(&self) -> String {
    format!("{}/{}", self.owner, self.repo)
  }
}

impl std::fmt::Display for PullRequestContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}#{} ({})", self.full_repo(), self.number, self.branch)
  }
}
