mod config;
mod error;
mod github;
mod link;
mod pipeline;

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::github::actions;
use crate::github::client::GitHubClient;
use crate::github::event::PullRequestContext;
use crate::link::{body, branch};

#[derive(Parser)]
#[command(
  name = "pr-issue-linker",
  about = "Links issue-tracker tickets named in a branch into the pull request body"
)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Update the triggering pull request (GitHub Actions entry point)
  Run {
    /// Print the new body instead of writing it
    #[arg(long)]
    dry_run: bool,
  },
  /// Show what would be linked for a branch and body, without network access
  Preview {
    /// Source branch name, e.g. feature/login/PROJ-42
    #[arg(short, long)]
    branch: String,
    /// File holding the body; stdin when omitted
    #[arg(long)]
    body_file: Option<PathBuf>,
    /// YAML config file; action inputs from the environment when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .init();

  let cli = Cli::parse();

  if let Err(e) = run(cli).await {
    error!("{e}");
    actions::set_failed(&e.to_string());
    std::process::exit(1);
  }
}

async fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Run { dry_run } => cmd_run(dry_run).await,
    Commands::Preview {
      branch,
      body_file,
      config,
    } => cmd_preview(&branch, body_file.as_deref(), config.as_deref()),
  }
}

async fn cmd_run(dry_run: bool) -> Result<()> {
  let pr = PullRequestContext::from_env()?;
  let config = Config::from_env()?;
  let client = GitHubClient::new(&config)?;

  let outcome = pipeline::update::run(&config, &pr, &client, dry_run).await?;

  let keys = outcome.issue_keys.join(", ");
  if outcome.status.is_soft_failure() {
    warn!("run finished with a failed update: {:?} (issues: {keys})", outcome.status);
  } else {
    info!("run finished: {:?} (issues: {keys})", outcome.status);
  }

  actions::set_output("time", &outcome.time)?;
  Ok(())
}

fn cmd_preview(
  branch_name: &str,
  body_file: Option<&std::path::Path>,
  config_path: Option<&std::path::Path>,
) -> Result<()> {
  let config = match config_path {
    Some(path) => Config::load(path)?,
    None => Config::from_env()?,
  };

  let body_text = match body_file {
    Some(path) => std::fs::read_to_string(path)?,
    None => {
      let mut buf = String::new();
      std::io::stdin().read_to_string(&mut buf)?;
      buf
    }
  };

  let issue_keys = branch::extract_issue_keys(branch_name, &config.issue_prefix);
  println!("Issues:  {}", issue_keys.join(", "));
  println!("Links:");
  for key in &issue_keys {
    println!("  {}", branch::issue_link(&config.issue_base_url, key));
  }

  if let Some(linked) = body::link(Some(body_text.as_str()), &issue_keys, &config.issue_base_url) {
    println!("Regions: {}", linked.regions);
    println!();
    println!("{}", linked.text);
  }

  Ok(())
}
