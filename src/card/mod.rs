pub mod png;

pub use png::export_png;

use colored::Colorize;
use std::path::PathBuf;

use crate::dashboard::Dashboard;
use crate::stats;
use crate::stats::StatsSnapshot;

/// Default export file name, derived from the username.
pub fn default_card_path(username: &str) -> PathBuf {
    PathBuf::from(format!("{username}-github-stats.png"))
}

/// Print the stat card to the terminal.
///
/// Fixed layout: header with profile link, three metric tiles, optional
/// repository list. Must tolerate an all-zero snapshot without panicking,
/// since a shared view may be rendered before remote data arrives.
pub fn render_card(snapshot: &StatsSnapshot) {
    println!();
    println!("═══ {} ═══", snapshot.username.bold());
    println!("{}", snapshot.profile_url().dimmed());
    println!();

    println!(
        "  {}  {} total — {} merged • {} open",
        "Pull Requests".purple().bold(),
        snapshot.pr_stats.total_prs,
        snapshot.pr_stats.merged_prs,
        snapshot.pr_stats.open_prs
    );
    println!(
        "  {}  {}+ from top {} recent repositories",
        "Commits".blue().bold(),
        snapshot.commit_stats.total,
        stats::DASHBOARD_REPO_LIMIT
    );
    println!(
        "  {}  {} PRs across {} orgs",
        "Open Source".cyan().bold(),
        snapshot.org_stats.total_prs,
        snapshot.org_stats.org_count
    );

    if !snapshot.top_repos.is_empty() {
        println!();
        println!("  {}", "Top Repositories".green().bold());
        for repo in &snapshot.top_repos {
            println!("    {}  ★ {}  ⑂ {}", repo.name, repo.stars, repo.forks);
        }
    }

    println!();
    println!(
        "{}",
        format!("Generated on {}", snapshot.generated_at.format("%Y-%m-%d")).dimmed()
    );
    println!();
}

/// Print the full dashboard view for the current state: PR activity,
/// commit activity, repositories, and any organization results.
pub fn render_dashboard(dash: &Dashboard) {
    let Some(username) = dash.username() else {
        if let Some(message) = dash.primary_state().failure() {
            println!("{} {}", "error:".red().bold(), message);
        } else {
            println!("No user loaded.");
        }
        return;
    };

    println!();
    println!("═══ GitHub User Dashboard ═══");
    println!("User: {}", username.bold());
    println!();

    let pr_stats = stats::pr_stats(dash.pr_data());
    println!("═══ {} ═══", "Pull Request Activity".purple().bold());
    println!(
        "  Total: {}   Merged: {}   Open: {}   Closed: {}",
        pr_stats.total_prs, pr_stats.merged_prs, pr_stats.open_prs, pr_stats.closed_prs
    );
    let leaders = stats::pr_repo_leaders(&pr_stats, stats::PR_LEADER_LIMIT);
    if !leaders.is_empty() {
        println!("  Top repositories by PRs:");
        for (repo, count) in leaders {
            println!("    {repo} — {count} PRs");
        }
    }
    println!();

    let commit_stats = stats::commit_stats(dash.commits());
    println!("═══ {} ═══", "Commit Activity".blue().bold());
    println!(
        "  Total: {}+ (from top {} recent repositories)",
        commit_stats.total,
        stats::DASHBOARD_REPO_LIMIT
    );
    for entry in &commit_stats.per_repo {
        println!("    {} — {} commits", entry.repo, entry.count);
    }
    println!();

    let repos = stats::top_repos(dash.repos(), stats::DASHBOARD_REPO_LIMIT);
    if !repos.is_empty() {
        println!("═══ {} ═══", "Top Repositories".green().bold());
        for repo in &repos {
            let language = repo
                .language
                .as_deref()
                .map(|l| format!(" ({l})"))
                .unwrap_or_default();
            println!("  {}{}  ★ {}  ⑂ {}", repo.name.bold(), language, repo.stars, repo.forks);
            if let Some(description) = &repo.description {
                println!("    {}", description.dimmed());
            }
        }
        println!();
    }

    render_org_results(dash);
}

fn render_org_results(dash: &Dashboard) {
    if let Some(message) = dash.org_state().failure() {
        println!("{} {}", "organization search failed:".red().bold(), message);
        println!();
        return;
    }
    if dash.org_prs().is_empty() {
        return;
    }

    println!("═══ {} ═══", "Organization PR Results".cyan().bold());
    for (org, prs) in dash.org_prs().iter() {
        println!("  {} — {} matching PRs", org.bold(), prs.len());
        for pr in prs {
            println!("    {}", pr.title);
            println!(
                "      {} • PR #{} • {}",
                repo_of(&pr.repository_url),
                pr.number,
                pr.created_at.format("%Y-%m-%d")
            );
            println!("      {}", pr.html_url.dimmed());
        }
    }
    println!();
}

fn repo_of(repository_url: &str) -> &str {
    repository_url
        .split_once("/repos/")
        .map_or(repository_url, |(_, name)| name)
}
