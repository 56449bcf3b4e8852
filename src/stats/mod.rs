pub mod types;

pub use types::{CommitStats, OrgPrSet, OrgStats, PrStats, RepoCard, RepoCommitCount, StatsSnapshot};

use std::collections::BTreeMap;

use crate::github::types::{CommitEntry, PrItem, PrSearchResponse, Repo};

/// How many repositories the dashboard shows and fetches commits for.
pub const DASHBOARD_REPO_LIMIT: usize = 5;
/// How many repositories the shareable card shows.
pub const CARD_REPO_LIMIT: usize = 3;
/// How many repositories the PR leaderboard shows.
pub const PR_LEADER_LIMIT: usize = 3;

/// Partition a PR search result into open/closed/merged counts and a
/// per-repository tally. An absent or empty result yields the zero-valued
/// struct rather than an error.
pub fn pr_stats(data: Option<&PrSearchResponse>) -> PrStats {
    let Some(data) = data else {
        return PrStats::default();
    };
    if data.items.is_empty() {
        return PrStats::default();
    }

    let mut stats = PrStats {
        total_prs: data.total_count,
        ..PrStats::default()
    };

    for pr in &data.items {
        if pr.state == "open" {
            stats.open_prs += 1;
        } else {
            stats.closed_prs += 1;
            let merged = pr
                .pull_request
                .as_ref()
                .is_some_and(|r| r.merged_at.is_some());
            if merged {
                stats.merged_prs += 1;
            }
        }

        *stats.repo_map.entry(repo_key(&pr.repository_url)).or_insert(0) += 1;
    }

    stats
}

/// Repository full name, taken as the path suffix after "/repos/" in the
/// repository API URL. Falls back to the whole URL if the marker is absent.
fn repo_key(repository_url: &str) -> String {
    repository_url
        .split_once("/repos/")
        .map_or(repository_url, |(_, name)| name)
        .to_string()
}

/// The repo_map entries with the most PRs, descending, truncated to `n`.
/// Ties keep the map's name order; no further tie-break is defined.
pub fn pr_repo_leaders(stats: &PrStats, n: usize) -> Vec<(String, u64)> {
    let mut leaders: Vec<(String, u64)> = stats
        .repo_map
        .iter()
        .map(|(repo, count)| (repo.clone(), *count))
        .collect();
    leaders.sort_by(|a, b| b.1.cmp(&a.1));
    leaders.truncate(n);
    leaders
}

/// The first `n` repositories in API-returned order, projected down to
/// the fields the cards display. Deliberately not re-sorted by any metric.
pub fn top_repos(repos: &[Repo], n: usize) -> Vec<RepoCard> {
    repos
        .iter()
        .take(n)
        .map(|repo| RepoCard {
            name: repo.full_name.clone(),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            language: repo.language.clone(),
            description: repo.description.clone(),
            url: repo.html_url.clone(),
        })
        .collect()
}

/// The `n` repositories most recently pushed to, ties broken by input
/// order. This bounds the commit fan-out; never-pushed repos sort last.
pub fn recent_repos(repos: &[Repo], n: usize) -> Vec<Repo> {
    let mut sorted: Vec<&Repo> = repos.iter().collect();
    sorted.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at));
    sorted.into_iter().take(n).cloned().collect()
}

/// Per-repository commit counts sorted descending, plus the grand total
/// across only the fetched repositories.
pub fn commit_stats(commits: &BTreeMap<String, Vec<CommitEntry>>) -> CommitStats {
    let mut per_repo: Vec<RepoCommitCount> = commits
        .iter()
        .map(|(repo, entries)| RepoCommitCount {
            repo: repo.clone(),
            count: entries.len(),
        })
        .collect();
    per_repo.sort_by(|a, b| b.count.cmp(&a.count));

    CommitStats {
        total: per_repo.iter().map(|c| c.count).sum(),
        per_repo,
    }
}

/// PRs from an organization search authored by the active username.
/// The comparison is case-sensitive, matching the login exactly as the
/// API reports it.
pub fn matching_prs(data: &PrSearchResponse, username: &str) -> Vec<PrItem> {
    data.items
        .iter()
        .filter(|pr| pr.user.login == username)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::{PrAuthor, PrRef};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    pub fn pr(state: &str, merged: bool, repo: &str, author: &str) -> PrItem {
        PrItem {
            number: 1,
            title: "a change".to_string(),
            state: state.to_string(),
            html_url: format!("https://github.com/{repo}/pull/1"),
            repository_url: format!("https://api.github.com/repos/{repo}"),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            user: PrAuthor {
                login: author.to_string(),
            },
            pull_request: Some(PrRef {
                merged_at: merged.then(|| Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap()),
            }),
        }
    }

    pub fn repo(name: &str, pushed_day: Option<u32>) -> Repo {
        Repo {
            name: name.to_string(),
            full_name: format!("octocat/{name}"),
            stargazers_count: 0,
            forks_count: 0,
            language: None,
            description: None,
            html_url: format!("https://github.com/octocat/{name}"),
            pushed_at: pushed_day.map(|d| Utc.with_ymd_and_hms(2024, 5, d, 0, 0, 0).unwrap()),
        }
    }

    fn search(total: u64, items: Vec<PrItem>) -> PrSearchResponse {
        PrSearchResponse {
            total_count: total,
            items,
        }
    }

    #[test]
    fn test_pr_stats_octocat_scenario() {
        // Two open, one closed-and-merged.
        let data = search(
            3,
            vec![
                pr("open", false, "acme/widget", "octocat"),
                pr("open", false, "acme/gadget", "octocat"),
                pr("closed", true, "acme/widget", "octocat"),
            ],
        );
        let stats = pr_stats(Some(&data));
        assert_eq!(stats.total_prs, 3);
        assert_eq!(stats.open_prs, 2);
        assert_eq!(stats.closed_prs, 1);
        assert_eq!(stats.merged_prs, 1);
    }

    #[test]
    fn test_pr_stats_open_closed_partition() {
        let data = search(
            4,
            vec![
                pr("open", false, "a/x", "octocat"),
                pr("closed", false, "a/x", "octocat"),
                pr("closed", true, "a/y", "octocat"),
                pr("closed", true, "a/y", "octocat"),
            ],
        );
        let stats = pr_stats(Some(&data));
        assert_eq!(stats.open_prs + stats.closed_prs, stats.total_prs);
        assert!(stats.merged_prs <= stats.closed_prs);
        // Closed-but-unmerged counts toward closed only.
        assert_eq!(stats.closed_prs, 3);
        assert_eq!(stats.merged_prs, 2);
    }

    #[test]
    fn test_pr_stats_empty_input_is_zero_valued() {
        assert_eq!(pr_stats(None), PrStats::default());
        assert_eq!(pr_stats(Some(&search(0, vec![]))), PrStats::default());
    }

    #[test]
    fn test_repo_map_sums_to_item_count() {
        let data = search(
            5,
            vec![
                pr("open", false, "a/x", "octocat"),
                pr("open", false, "a/x", "octocat"),
                pr("open", false, "a/y", "octocat"),
                pr("closed", true, "b/z", "octocat"),
                pr("closed", false, "a/y", "octocat"),
            ],
        );
        let stats = pr_stats(Some(&data));
        let total: u64 = stats.repo_map.values().sum();
        assert_eq!(total, 5);
        assert_eq!(stats.repo_map["a/x"], 2);
        assert_eq!(stats.repo_map["b/z"], 1);
    }

    #[test]
    fn test_repo_key_extraction() {
        assert_eq!(
            repo_key("https://api.github.com/repos/rust-lang/rust"),
            "rust-lang/rust"
        );
        assert_eq!(repo_key("garbage"), "garbage");
    }

    #[test]
    fn test_pr_repo_leaders_sorted_and_truncated() {
        let data = search(
            6,
            vec![
                pr("open", false, "a/x", "o"),
                pr("open", false, "a/x", "o"),
                pr("open", false, "a/x", "o"),
                pr("open", false, "a/y", "o"),
                pr("open", false, "a/y", "o"),
                pr("open", false, "a/z", "o"),
            ],
        );
        let stats = pr_stats(Some(&data));
        let leaders = pr_repo_leaders(&stats, 2);
        assert_eq!(leaders, vec![("a/x".to_string(), 3), ("a/y".to_string(), 2)]);
    }

    #[test]
    fn test_top_repos_keeps_api_order() {
        let repos = vec![repo("older", Some(1)), repo("newer", Some(20))];
        let cards = top_repos(&repos, 5);
        assert_eq!(cards.len(), 2);
        // API order, not recency order.
        assert_eq!(cards[0].name, "octocat/older");
        assert!(cards[0].language.is_none());
    }

    #[test]
    fn test_top_repos_empty_input() {
        assert!(top_repos(&[], CARD_REPO_LIMIT).is_empty());
    }

    #[test]
    fn test_recent_repos_picks_greatest_push_timestamps() {
        let repos = vec![
            repo("a", Some(1)),
            repo("b", Some(25)),
            repo("c", None),
            repo("d", Some(10)),
            repo("e", Some(20)),
            repo("f", Some(5)),
            repo("g", Some(15)),
        ];
        let recent = recent_repos(&repos, DASHBOARD_REPO_LIMIT);
        let names: Vec<&str> = recent.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "e", "g", "d", "f"]);
    }

    #[test]
    fn test_recent_repos_ties_keep_input_order() {
        let repos = vec![
            repo("first", Some(10)),
            repo("second", Some(10)),
            repo("third", Some(10)),
        ];
        let recent = recent_repos(&repos, 2);
        let names: Vec<&str> = recent.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_recent_repos_fewer_than_limit() {
        let repos = vec![repo("only", Some(1))];
        assert_eq!(recent_repos(&repos, DASHBOARD_REPO_LIMIT).len(), 1);
    }

    #[test]
    fn test_commit_stats_sorted_descending() {
        let mut commits = BTreeMap::new();
        commits.insert(
            "widget".to_string(),
            vec![CommitEntry { sha: "a".into() }, CommitEntry { sha: "b".into() }],
        );
        commits.insert("gadget".to_string(), vec![CommitEntry { sha: "c".into() }]);
        commits.insert(
            "gizmo".to_string(),
            vec![
                CommitEntry { sha: "d".into() },
                CommitEntry { sha: "e".into() },
                CommitEntry { sha: "f".into() },
            ],
        );

        let stats = commit_stats(&commits);
        assert_eq!(stats.total, 6);
        let order: Vec<&str> = stats.per_repo.iter().map(|c| c.repo.as_str()).collect();
        assert_eq!(order, vec!["gizmo", "widget", "gadget"]);
    }

    #[test]
    fn test_commit_stats_empty() {
        let stats = commit_stats(&BTreeMap::new());
        assert_eq!(stats.total, 0);
        assert!(stats.per_repo.is_empty());
    }

    #[test]
    fn test_matching_prs_is_case_sensitive() {
        let data = search(
            3,
            vec![
                pr("open", false, "org/a", "octocat"),
                pr("open", false, "org/b", "Octocat"),
                pr("open", false, "org/c", "someone-else"),
            ],
        );
        let matched = matching_prs(&data, "octocat");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].user.login, "octocat");
    }
}
