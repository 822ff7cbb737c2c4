use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::link::branch::issue_link;

pub const START_MARKER: &str = "[//]: # (autolink_jira_issues_start)";
pub const END_MARKER: &str = "[//]: # (autolink_jira_issues_end)";

/// From the start marker line through the nearest end marker line, inclusive.
/// Each marker must sit alone on its line; the line break after the end marker
/// is kept. Spaces and tabs around `#` and inside the parentheses are optional.
static MARKER_REGION: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(concat!(
    r"(?mR)^[ \t]*\[//\]:[ \t]*#[ \t]*\([ \t]*autolink_jira_issues_start[ \t]*\)[ \t]*$",
    r"(?s:.*?)",
    r"^[ \t]*\[//\]:[ \t]*#[ \t]*\([ \t]*autolink_jira_issues_end[ \t]*\)[ \t]*$",
  ))
  .expect("marker pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedBody {
  pub text: String,
  /// Number of marker regions replaced.
  pub regions: usize,
}

impl LinkedBody {
  pub fn is_changed(&self) -> bool {
    self.regions > 0
  }
}

/// Renders issue links, one per line, in the given order.
pub fn render_links<S: AsRef<str>>(issue_keys: &[S], issue_base_url: &str) -> String {
  issue_keys
    .iter()
    .map(|key| issue_link(issue_base_url, key.as_ref()))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Replaces every marker region in `body` with the rendered links.
///
/// Returns `None` when there is no body. Text outside the regions is kept
/// byte-for-byte; a body without markers comes back unchanged.
pub fn link<S: AsRef<str>>(
  body: Option<&str>,
  issue_keys: &[S],
  issue_base_url: &str,
) -> Option<LinkedBody> {
  let body = body?;

  let regions = MARKER_REGION.find_iter(body).count();
  if regions == 0 {
    return Some(LinkedBody {
      text: body.to_string(),
      regions,
    });
  }

  let links = render_links(issue_keys, issue_base_url);
  let text = MARKER_REGION
    .replace_all(body, NoExpand(&links))
    .into_owned();

  Some(LinkedBody { text, regions })
}
