pub mod types;

pub use types::{CommitEntry, PrSearchResponse, Repo};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

const USER_AGENT: &str = "statcard";

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("Failed to fetch {context}: {status}")]
    Status {
        context: &'static str,
        status: StatusCode,
    },

    #[error("GitHub API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Thin client over the public GitHub REST API.
///
/// All reads are unauthenticated single-page requests (`per_page=100`)
/// against the public endpoints, so they run under unauthenticated rate
/// limits. There is deliberately no retry, backoff, or rate-limit
/// detection: a non-2xx response fails the call with the HTTP status
/// embedded in the error.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
}

impl GithubClient {
    /// Build a client against the given API base URL (trailing slashes
    /// are stripped). Pass `config.github.api_base()` outside of tests.
    pub fn new(base_url: &str) -> Self {
        GithubClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// PRs authored by `username`, most recently updated first.
    #[instrument(skip(self))]
    pub async fn search_author_prs(&self, username: &str) -> Result<PrSearchResponse, GithubError> {
        let url = format!(
            "{}/search/issues?q=author:{}+type:pr&sort=updated&order=desc&per_page=100",
            self.base_url, username
        );
        self.get_json(&url, "PR data").await
    }

    /// Repositories visible under `username`, in API-returned order.
    #[instrument(skip(self))]
    pub async fn list_repos(&self, username: &str) -> Result<Vec<Repo>, GithubError> {
        let url = format!("{}/users/{}/repos?per_page=100", self.base_url, username);
        self.get_json(&url, "repositories").await
    }

    /// Commits authored by `username` within one of their repositories.
    #[instrument(skip(self))]
    pub async fn list_commits(
        &self,
        username: &str,
        repo: &str,
    ) -> Result<Vec<CommitEntry>, GithubError> {
        let url = format!(
            "{}/repos/{}/{}/commits?author={}&per_page=100",
            self.base_url, username, repo, username
        );
        self.get_json(&url, "commits").await
    }

    /// PRs within an organization, regardless of author. The search API
    /// has no org+author combinator in this query form, so callers filter
    /// the result to the active username locally.
    #[instrument(skip(self))]
    pub async fn search_org_prs(&self, org: &str) -> Result<PrSearchResponse, GithubError> {
        let url = format!(
            "{}/search/issues?q=org:{}+type:pr&sort=asc&per_page=100",
            self.base_url, org
        );
        self.get_json(&url, "organization data").await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        context: &'static str,
    ) -> Result<T, GithubError> {
        debug!(url, "issuing GitHub API request");
        let response = self
            .http
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::Status { context, status });
        }

        let body = response.json::<T>().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pr_item(number: u64, state: &str, merged: bool) -> serde_json::Value {
        json!({
            "number": number,
            "title": format!("PR #{number}"),
            "state": state,
            "html_url": format!("https://github.com/acme/widget/pull/{number}"),
            "repository_url": "https://api.github.com/repos/acme/widget",
            "created_at": "2024-03-01T12:00:00Z",
            "user": { "login": "octocat" },
            "pull_request": { "merged_at": if merged { json!("2024-03-02T08:30:00Z") } else { json!(null) } }
        })
    }

    #[tokio::test]
    async fn test_search_author_prs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("q", "author:octocat type:pr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 1,
                "items": [pr_item(1, "open", false)]
            })))
            .mount(&server)
            .await;

        let client = GithubClient::new(&server.uri());
        let result = client.search_author_prs("octocat").await.unwrap();
        assert_eq!(result.total_count, 1);
        assert_eq!(result.items[0].state, "open");
    }

    #[tokio::test]
    async fn test_list_repos() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "name": "widget",
                "full_name": "octocat/widget",
                "stargazers_count": 12,
                "forks_count": 3,
                "language": "Rust",
                "description": "a widget",
                "html_url": "https://github.com/octocat/widget",
                "pushed_at": "2024-05-01T00:00:00Z"
            }])))
            .mount(&server)
            .await;

        let client = GithubClient::new(&server.uri());
        let repos = client.list_repos("octocat").await.unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].full_name, "octocat/widget");
    }

    #[tokio::test]
    async fn test_list_commits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/widget/commits"))
            .and(query_param("author", "octocat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "sha": "a1" }, { "sha": "b2" }])),
            )
            .mount(&server)
            .await;

        let client = GithubClient::new(&server.uri());
        let commits = client.list_commits("octocat", "widget").await.unwrap();
        assert_eq!(commits.len(), 2);
    }

    #[tokio::test]
    async fn test_non_2xx_surfaces_status_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = GithubClient::new(&server.uri());
        let error = client.search_author_prs("octocat").await.unwrap_err();
        match error {
            GithubError::Status { context, status } => {
                assert_eq!(context, "PR data");
                assert_eq!(status, StatusCode::FORBIDDEN);
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert!(error.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = GithubClient::new(&format!("{}/", server.uri()));
        let repos = client.list_repos("octocat").await.unwrap();
        assert!(repos.is_empty());
    }
}
