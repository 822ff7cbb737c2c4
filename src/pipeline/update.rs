use chrono::Local;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::Result;
use crate::github::actions;
use crate::github::client::{PullRequestWriter, UpdateRequest, STATUS_OK};
use crate::github::event::PullRequestContext;
use crate::link::{body, branch};

pub const UPDATE_FAILED_MESSAGE: &str = "Updating pull request has failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
  /// The pull request has no body; nothing to link into.
  NoBody,
  /// The body has no marker region.
  Unchanged,
  /// The new body was printed instead of written.
  DryRun,
  Updated,
  /// The remote answered with a non-success status.
  Rejected(u16),
  /// The request itself failed.
  Failed(String),
}

impl UpdateStatus {
  pub fn is_soft_failure(&self) -> bool {
    matches!(self, UpdateStatus::Rejected(_) | UpdateStatus::Failed(_))
  }
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
  pub issue_keys: Vec<String>,
  pub status: UpdateStatus,
  /// Completion time, the value of the `time` output.
  pub time: String,
}

pub fn completion_time() -> String {
  Local::now().format("%H:%M:%S GMT%z").to_string()
}

/// Links the issues named by the pull request's branch into its body and
/// writes the body back. A rejected write is reported but does not fail the
/// run.
pub async fn run<W: PullRequestWriter>(
  config: &Config,
  pr: &PullRequestContext,
  writer: &W,
  dry_run: bool,
) -> Result<RunOutcome> {
  info!("linking issues for {pr}");
  debug!("current body: {:?}", pr.body);

  let issue_keys = branch::extract_issue_keys(&pr.branch, &config.issue_prefix);
  info!(
    "found {} issue key(s) in branch {}: {issue_keys:?}",
    issue_keys.len(),
    pr.branch
  );

  let linked = body::link(pr.body.as_deref(), &issue_keys, &config.issue_base_url);
  let issue_keys: Vec<String> = issue_keys.into_iter().map(String::from).collect();

  let status = match linked {
    None => {
      info!("{pr} has no body, skipping update");
      UpdateStatus::NoBody
    }
    Some(linked) if !linked.is_changed() => {
      info!("no marker region in body of {pr}, skipping update");
      UpdateStatus::Unchanged
    }
    Some(linked) => {
      debug!("new body: {:?}", linked.text);
      info!("replaced {} marker region(s)", linked.regions);

      if dry_run {
        println!("{}", linked.text);
        UpdateStatus::DryRun
      } else {
        let request = UpdateRequest {
          owner: pr.owner.clone(),
          repo: pr.repo.clone(),
          pull_number: pr.number,
          body: linked.text,
        };
        write(writer, &request).await
      }
    }
  };

  Ok(RunOutcome {
    issue_keys,
    status,
    time: completion_time(),
  })
}

async fn write<W: PullRequestWriter>(writer: &W, request: &UpdateRequest) -> UpdateStatus {
  match writer.update_body(request).await {
    Ok(STATUS_OK) => {
      info!(
        "updated {}/{}#{}",
        request.owner, request.repo, request.pull_number
      );
      UpdateStatus::Updated
    }
    Ok(code) => {
      error!("{UPDATE_FAILED_MESSAGE}: status {code}");
      actions::error(UPDATE_FAILED_MESSAGE);
      UpdateStatus::Rejected(code)
    }
    Err(e) => {
      error!("{UPDATE_FAILED_MESSAGE}: {e}");
      actions::error(UPDATE_FAILED_MESSAGE);
      UpdateStatus::Failed(e.to_string())
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;
  use crate::error::LinkerError;
  use crate::link::body::{END_MARKER, START_MARKER};

  struct FakeWriter {
    response: std::result::Result<u16, String>,
    requests: Mutex<Vec<UpdateRequest>>,
  }

  impl FakeWriter {
    fn responding(status: u16) -> Self {
      Self {
        response: Ok(status),
        requests: Mutex::new(Vec::new()),
      }
    }

    fn failing(message: &str) -> Self {
      Self {
        response: Err(message.to_string()),
        requests: Mutex::new(Vec::new()),
      }
    }

    fn requests(&self) -> Vec<UpdateRequest> {
      self.requests.lock().unwrap().clone()
    }
  }

  impl PullRequestWriter for FakeWriter {
    async fn update_body(&self, request: &UpdateRequest) -> Result<u16> {
      self.requests.lock().unwrap().push(request.clone());
      self
        .response
        .clone()
        .map_err(LinkerError::GitHub)
    }
  }

  fn config() -> Config {
    Config {
      issue_prefix: "PROJ-".into(),
      issue_base_url: "https://issues.example.com/browse".into(),
      github_token: None,
      api_url: None,
    }
  }

  fn pr(branch: &str, body: Option<&str>) -> PullRequestContext {
    PullRequestContext {
      owner: "acme".into(),
      repo: "widgets".into(),
      number: 42,
      branch: branch.into(),
      body: body.map(String::from),
    }
  }

  fn marked_body() -> String {
    format!("Summary\n{START_MARKER}\nplaceholder\n{END_MARKER}\nFooter")
  }

  #[test]
  fn test_completion_time_format() {
    let time = completion_time();
    let shape = regex::Regex::new(r"^\d{2}:\d{2}:\d{2} GMT[+-]\d{4}$").unwrap();
    assert!(shape.is_match(&time), "unexpected time output: {time}");
    assert!(chrono::NaiveTime::parse_from_str(&time[..8], "%H:%M:%S").is_ok());
  }

  #[tokio::test]
  async fn test_links_issue_and_writes_body() {
    let body = marked_body();
    let writer = FakeWriter::responding(200);

    let outcome = run(&config(), &pr("feature/x/ABC/PROJ-42", Some(body.as_str())), &writer, false)
      .await
      .unwrap();

    assert_eq!(outcome.status, UpdateStatus::Updated);
    assert_eq!(outcome.issue_keys, vec!["PROJ-42"]);
    assert!(!outcome.time.is_empty());

    let requests = writer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
      requests[0],
      UpdateRequest {
        owner: "acme".into(),
        repo: "widgets".into(),
        pull_number: 42,
        body: "Summary\nhttps://issues.example.com/browse/PROJ-42\nFooter".into(),
      }
    );
  }

  #[tokio::test]
  async fn test_absent_body_skips_write() {
    let writer = FakeWriter::responding(200);

    let outcome = run(&config(), &pr("feature/x/PROJ-1", None), &writer, false)
      .await
      .unwrap();

    assert_eq!(outcome.status, UpdateStatus::NoBody);
    assert!(writer.requests().is_empty());
  }

  #[tokio::test]
  async fn test_body_without_markers_skips_write() {
    let writer = FakeWriter::responding(200);

    let outcome = run(&config(), &pr("feature/x/PROJ-1", Some("plain")), &writer, false)
      .await
      .unwrap();

    assert_eq!(outcome.status, UpdateStatus::Unchanged);
    assert!(writer.requests().is_empty());
  }

  #[tokio::test]
  async fn test_rejected_write_is_soft_failure() {
    let body = marked_body();
    let writer = FakeWriter::responding(422);

    let outcome = run(&config(), &pr("feature/x/PROJ-1", Some(body.as_str())), &writer, false)
      .await
      .unwrap();

    assert_eq!(outcome.status, UpdateStatus::Rejected(422));
    assert!(outcome.status.is_soft_failure());
    assert!(!outcome.time.is_empty());
  }

  #[tokio::test]
  async fn test_transport_error_is_soft_failure() {
    let body = marked_body();
    let writer = FakeWriter::failing("connection reset");

    let outcome = run(&config(), &pr("feature/x/PROJ-1", Some(body.as_str())), &writer, false)
      .await
      .unwrap();

    assert!(matches!(
      outcome.status,
      UpdateStatus::Failed(ref msg) if msg.contains("connection reset")
    ));
  }

  #[tokio::test]
  async fn test_dry_run_does_not_write() {
    let body = marked_body();
    let writer = FakeWriter::responding(200);

    let outcome = run(&config(), &pr("feature/x/PROJ-1", Some(body.as_str())), &writer, true)
      .await
      .unwrap();

    assert_eq!(outcome.status, UpdateStatus::DryRun);
    assert!(writer.requests().is_empty());
  }

  #[tokio::test]
  async fn test_short_branch_clears_region() {
    let body = marked_body();
    let writer = FakeWriter::responding(200);

    let outcome = run(&config(), &pr("feature/PROJ-1", Some(body.as_str())), &writer, false)
      .await
      .unwrap();

    assert!(outcome.issue_keys.is_empty());
    assert_eq!(writer.requests()[0].body, "Summary\n\nFooter");
  }
}
