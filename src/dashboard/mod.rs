use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::github::types::{CommitEntry, PrSearchResponse, Repo};
use crate::github::{GithubClient, GithubError};
use crate::stats;
use crate::stats::{OrgPrSet, StatsSnapshot};

/// In-flight status of one logical fetch operation.
///
/// The primary user fetch and the organization search each carry their
/// own tag, so a failure or spinner in one never bleeds into the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OpState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl OpState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, OpState::Loaded)
    }

    /// The failure message, if this operation failed.
    pub fn failure(&self) -> Option<&str> {
        match self {
            OpState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Holds the active username and everything fetched or derived for it,
/// and orchestrates the fetch-then-aggregate flow.
///
/// The primary sequence is PR search → repository list → commit fan-out.
/// The first two are strictly ordered; a failure leaves the fields filled
/// so far in place (there is no all-or-nothing contract). The commit
/// fetches are mutually independent and run concurrently, bounded by the
/// size of the recency subset; a single repository failing is skipped,
/// never fatal.
#[derive(Debug, Default)]
pub struct Dashboard {
    username: Option<String>,
    pr_data: Option<PrSearchResponse>,
    repos: Vec<Repo>,
    commits: BTreeMap<String, Vec<CommitEntry>>,
    total_commits: usize,
    org_prs: OrgPrSet,
    primary: OpState,
    org: OpState,
}

impl Dashboard {
    /// Fetch and aggregate everything for a new username.
    ///
    /// All derived state, including results from a previous user and any
    /// organization matches, is cleared before the first request goes
    /// out, so a failed or slow fetch can never show another user's data.
    /// Blank input is ignored.
    #[instrument(skip(self, client))]
    pub async fn submit_username(
        &mut self,
        client: &GithubClient,
        username: &str,
    ) -> Result<(), GithubError> {
        let username = username.trim();
        if username.is_empty() {
            return Ok(());
        }

        self.reset();
        self.primary = OpState::Loading;

        info!("fetching pull requests");
        let pr_data = match client.search_author_prs(username).await {
            Ok(data) => data,
            Err(error) => return Err(self.fail_primary(error)),
        };
        debug!(total = pr_data.total_count, "received PR search results");
        self.pr_data = Some(pr_data);

        info!("fetching repositories");
        let repos = match client.list_repos(username).await {
            Ok(repos) => repos,
            Err(error) => return Err(self.fail_primary(error)),
        };
        debug!(count = repos.len(), "received repository list");
        self.repos = repos;

        let recent = stats::recent_repos(&self.repos, stats::DASHBOARD_REPO_LIMIT);
        info!(repos = recent.len(), "fetching commit history");
        let fetches = recent.iter().map(|repo| {
            let name = repo.name.clone();
            async move {
                let outcome = client.list_commits(username, &name).await;
                (name, outcome)
            }
        });
        for (name, outcome) in futures::future::join_all(fetches).await {
            match outcome {
                Ok(entries) => {
                    self.total_commits += entries.len();
                    self.commits.insert(name, entries);
                }
                // One repository failing must not sink the other fetches.
                Err(error) => warn!(repo = %name, %error, "skipping commit history"),
            }
        }

        self.username = Some(username.to_string());
        self.primary = OpState::Loaded;
        Ok(())
    }

    /// Search an organization's PRs and keep the ones authored by the
    /// active username. Only meaningful once a user is loaded; leaves the
    /// primary dashboard state untouched either way. An organization
    /// already queried is a no-op.
    #[instrument(skip(self, client))]
    pub async fn submit_org(
        &mut self,
        client: &GithubClient,
        org: &str,
    ) -> Result<(), GithubError> {
        let org = org.trim();
        if org.is_empty() || !self.primary.is_loaded() {
            return Ok(());
        }
        let Some(username) = self.username.clone() else {
            return Ok(());
        };
        if self.org_prs.contains(org) {
            debug!(org, "organization already queried");
            return Ok(());
        }

        self.org = OpState::Loading;
        info!("fetching organization pull requests");
        let data = match client.search_org_prs(org).await {
            Ok(data) => data,
            Err(error) => {
                self.org = OpState::Failed(error.to_string());
                return Err(error);
            }
        };

        let matched = stats::matching_prs(&data, &username);
        debug!(org, matched = matched.len(), "filtered organization PRs to active user");
        self.org_prs.insert(org, matched);
        self.org = OpState::Loaded;
        Ok(())
    }

    fn fail_primary(&mut self, error: GithubError) -> GithubError {
        self.primary = OpState::Failed(error.to_string());
        error
    }

    fn reset(&mut self) {
        self.username = None;
        self.pr_data = None;
        self.repos.clear();
        self.commits.clear();
        self.total_commits = 0;
        self.org_prs = OrgPrSet::default();
        self.primary = OpState::Idle;
        self.org = OpState::Idle;
    }

    /// Package the current state as the shareable card view model.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            username: self.username.clone().unwrap_or_default(),
            pr_stats: stats::pr_stats(self.pr_data.as_ref()),
            commit_stats: stats::commit_stats(&self.commits),
            org_stats: self.org_prs.totals(),
            top_repos: stats::top_repos(&self.repos, stats::CARD_REPO_LIMIT),
            generated_at: Utc::now(),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn pr_data(&self) -> Option<&PrSearchResponse> {
        self.pr_data.as_ref()
    }

    pub fn repos(&self) -> &[Repo] {
        &self.repos
    }

    pub fn commits(&self) -> &BTreeMap<String, Vec<CommitEntry>> {
        &self.commits
    }

    pub fn total_commits(&self) -> usize {
        self.total_commits
    }

    pub fn org_prs(&self) -> &OrgPrSet {
        &self.org_prs
    }

    pub fn primary_state(&self) -> &OpState {
        &self.primary
    }

    pub fn org_state(&self) -> &OpState {
        &self.org
    }
}
