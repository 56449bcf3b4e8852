use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One page of results from the issue search API (`/search/issues`),
/// filtered to pull requests by the caller's query.
#[derive(Debug, Clone, Deserialize)]
pub struct PrSearchResponse {
    /// Server-side total across all pages; `items` holds at most one page.
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<PrItem>,
}

/// A pull request as returned by the issue search API.
#[derive(Debug, Clone, Deserialize)]
pub struct PrItem {
    pub number: u64,
    pub title: String,
    /// "open" or "closed". Merged PRs report "closed" here; merge status
    /// lives in `pull_request.merged_at`.
    pub state: String,
    pub html_url: String,
    /// API URL of the owning repository, e.g.
    /// "https://api.github.com/repos/rust-lang/rust".
    pub repository_url: String,
    pub created_at: DateTime<Utc>,
    pub user: PrAuthor,
    /// Present on PR-typed search results; absent on plain issues.
    pub pull_request: Option<PrRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrAuthor {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrRef {
    /// Non-null only when the PR was merged. A closed PR with a null
    /// merge timestamp was closed without merging.
    pub merged_at: Option<DateTime<Utc>>,
}

/// A repository from the user repository list API (`/users/{user}/repos`).
#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub name: String,
    pub full_name: String,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub language: Option<String>,
    pub description: Option<String>,
    pub html_url: String,
    /// Null for repositories that have never been pushed to.
    pub pushed_at: Option<DateTime<Utc>>,
}

/// A commit from the repository commit list API. Only the count of
/// entries is consumed downstream, so the sha alone is modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitEntry {
    #[allow(dead_code)] // Identifies the commit in the payload; only counts are consumed
    pub sha: String,
}
