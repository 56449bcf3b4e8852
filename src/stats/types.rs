use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::github::types::PrItem;

/// Pull request breakdown for one user.
///
/// `closed_prs` includes merged PRs; `merged_prs` is the subset of closed
/// PRs carrying a merge timestamp, never an exclusive third category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrStats {
    pub total_prs: u64,
    pub open_prs: u64,
    pub closed_prs: u64,
    pub merged_prs: u64,
    /// Repository full name → number of the user's PRs targeting it.
    pub repo_map: BTreeMap<String, u64>,
}

/// Display-only projection of a repository for card rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoCard {
    pub name: String,
    pub stars: u64,
    pub forks: u64,
    pub language: Option<String>,
    pub description: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoCommitCount {
    pub repo: String,
    pub count: usize,
}

/// Commit tallies over the fetched repository subset.
///
/// Only the most recently pushed-to repositories are fetched, so `total`
/// is a documented undercount of the user's true commit total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitStats {
    pub total: usize,
    /// Per-repository counts, sorted descending by count.
    pub per_repo: Vec<RepoCommitCount>,
}

/// Totals over all organization searches run for the active user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrgStats {
    pub total_prs: usize,
    pub org_count: usize,
}

/// Accumulated organization search results for the active user.
///
/// Append-only: re-querying an organization already present is a no-op,
/// so earlier matches are never replaced by a later search.
#[derive(Debug, Clone, Default)]
pub struct OrgPrSet {
    matches: BTreeMap<String, Vec<PrItem>>,
}

impl OrgPrSet {
    pub fn contains(&self, org: &str) -> bool {
        self.matches.contains_key(org)
    }

    /// Record the matched PRs for an organization. Returns false (and
    /// keeps the existing entry) if the organization was already recorded.
    pub fn insert(&mut self, org: &str, prs: Vec<PrItem>) -> bool {
        if self.matches.contains_key(org) {
            return false;
        }
        self.matches.insert(org.to_string(), prs);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PrItem])> {
        self.matches.iter().map(|(org, prs)| (org.as_str(), prs.as_slice()))
    }

    pub fn totals(&self) -> OrgStats {
        OrgStats {
            total_prs: self.matches.values().map(Vec::len).sum(),
            org_count: self.matches.len(),
        }
    }
}

/// The shareable view model: everything a stat card needs, packaged for
/// persistence. Immutable once written to the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub username: String,
    pub pr_stats: PrStats,
    pub commit_stats: CommitStats,
    pub org_stats: OrgStats,
    pub top_repos: Vec<RepoCard>,
    pub generated_at: DateTime<Utc>,
}

impl StatsSnapshot {
    /// An all-zero snapshot. Card rendering must tolerate this shape,
    /// since a shared view may render before remote data arrives.
    pub fn empty(username: &str) -> StatsSnapshot {
        StatsSnapshot {
            username: username.to_string(),
            pr_stats: PrStats::default(),
            commit_stats: CommitStats::default(),
            org_stats: OrgStats::default(),
            top_repos: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    pub fn profile_url(&self) -> String {
        format!("https://github.com/{}", self.username)
    }

    pub fn avatar_url(&self) -> String {
        format!("https://avatars.githubusercontent.com/{}", self.username)
    }
}
