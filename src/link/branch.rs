/// Segments before this index are the branch `type` and `description`.
const FIRST_ISSUE_SEGMENT: usize = 2;

/// Extracts issue keys from a `type/description/KEY-1[/KEY-2...]` branch name.
///
/// Only segments after the description are scanned; a segment is kept when it
/// starts with `prefix` (case-sensitive). Order follows the branch name.
pub fn extract_issue_keys<'a>(branch_name: &'a str, prefix: &str) -> Vec<&'a str> {
  branch_name
    .split('/')
    .skip(FIRST_ISSUE_SEGMENT)
    .filter(|segment| segment.starts_with(prefix))
    .collect()
}

pub fn issue_link(issue_base_url: &str, issue_key: &str) -> String {
  format!("{issue_base_url}/{issue_key}")
}
