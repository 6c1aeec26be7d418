use chrono::DateTime;

use crate::analysis::summary::{
    compare_metrics, format_lines_of_code, format_metric, recent_weeks, top_repositories,
    RECENT_WEEKS, TOP_REPOSITORIES,
};
use crate::models::{Leader, ProfileReport};
use crate::session::{Session, Slot};

fn week_label(week: i64) -> String {
    DateTime::from_timestamp(week, 0)
        .map(|d| d.format("%b %-d").to_string())
        .unwrap_or_else(|| week.to_string())
}

pub fn format_text(session: &Session) -> String {
    let mut output = String::new();

    if let Some(error) = session.error() {
        output.push_str(&format!("\n!! Error: {}\n", error));
    }

    let reports = session.reports();
    if let [first, second] = reports.as_slice() {
        output.push_str(&format!(
            "\n=== Comparison: {} vs {} ===\n\n",
            first.profile.login, second.profile.login
        ));
        for metric in compare_metrics(first, second) {
            let marker = match metric.leader {
                Leader::First => "<",
                Leader::Second => ">",
                Leader::Tie => "=",
            };
            output.push_str(&format!(
                "  {:<24} {:>10} {} {:<10}\n",
                metric.metric,
                format_metric(metric.kind, metric.first),
                marker,
                format_metric(metric.kind, metric.second)
            ));
        }
    }

    for report in reports {
        output.push_str(&format_profile_text(report));
    }

    for slot in session.slots() {
        if let Slot::Failed { username, message } = slot {
            output.push_str(&format!("\n{}: {}\n", username, message));
        }
    }

    output
}

fn format_profile_text(report: &ProfileReport) -> String {
    let mut output = String::new();
    let profile = &report.profile;
    let aggregate = &report.aggregate;

    output.push_str(&format!(
        "\n=== Profile Analysis: {} ===\n\n",
        profile.login
    ));
    output.push_str(&format!("Name: {}\n", profile.display_name()));
    output.push_str(&format!("Bio: {}\n", profile.bio_or_default()));
    output.push_str(&format!("URL: {}\n", profile.html_url));
    output.push_str(&format!(
        "Followers: {}  Repositories: {}  Joined: {}\n",
        profile.followers,
        profile.public_repos,
        profile.created_at.format("%Y-%m-%d")
    ));

    output.push_str(&format!("\nTotal Stars: {}\n", aggregate.total_stars));
    output.push_str(&format!(
        "Lines of Code (est.): {}\n",
        format_lines_of_code(aggregate.estimated_lines_of_code)
    ));
    output.push_str(&format!(
        "Longest Streak: {} days\n",
        aggregate.longest_streak
    ));

    let top = top_repositories(&report.repositories, TOP_REPOSITORIES);
    if !top.is_empty() {
        output.push_str("\nTop Repositories:\n");
        for repo in top {
            output.push_str(&format!(
                "  - {} ({} stars, {} forks){}\n",
                repo.name,
                repo.stargazers_count,
                repo.forks_count,
                repo.language
                    .as_ref()
                    .map(|l| format!(" [{}]", l))
                    .unwrap_or_default()
            ));
        }
    }

    if !aggregate.languages.is_empty() {
        output.push_str("\nLanguages:\n");
        for language in &aggregate.languages {
            output.push_str(&format!(
                "  - {}: {:.1}%\n",
                language.language, language.percentage
            ));
        }
    }

    let weeks = recent_weeks(&aggregate.merged_activity, RECENT_WEEKS);
    if !weeks.is_empty() {
        output.push_str("\nWeekly Commits:\n");
        let max = weeks.iter().map(|w| w.total).max().unwrap_or(0).max(1);
        for week in weeks {
            let bar = "#".repeat((week.total as usize * 30).div_ceil(max as usize));
            output.push_str(&format!(
                "  {:<7} {:>4} {}\n",
                week_label(week.week),
                week.total,
                bar
            ));
        }
    }

    if !aggregate.yearly_commits.is_empty() {
        output.push_str("\nCommits per Year:\n");
        for year in &aggregate.yearly_commits {
            output.push_str(&format!("  {}: {}\n", year.year, year.commits));
        }
    }

    output
}

pub fn format_markdown(session: &Session) -> String {
    let mut output = String::new();

    if let Some(error) = session.error() {
        output.push_str(&format!("> **Error:** {}\n\n", error));
    }

    let reports = session.reports();
    if let [first, second] = reports.as_slice() {
        output.push_str(&format!(
            "# Comparison: {} vs {}\n\n",
            first.profile.login, second.profile.login
        ));
        output.push_str(&format!(
            "| Metric | {} | {} |\n|--------|-------|-------|\n",
            first.profile.login, second.profile.login
        ));
        for metric in compare_metrics(first, second) {
            let (a, b) = match metric.leader {
                Leader::First => ("**", ""),
                Leader::Second => ("", "**"),
                Leader::Tie => ("", ""),
            };
            output.push_str(&format!(
                "| {} | {a}{}{a} | {b}{}{b} |\n",
                metric.metric,
                format_metric(metric.kind, metric.first),
                format_metric(metric.kind, metric.second)
            ));
        }
        output.push('\n');
    }

    for report in reports {
        output.push_str(&format_profile_markdown(report));
    }

    output
}

fn format_profile_markdown(report: &ProfileReport) -> String {
    let mut output = String::new();
    let profile = &report.profile;
    let aggregate = &report.aggregate;

    output.push_str(&format!(
        "## [{}]({})\n\n",
        profile.display_name(),
        profile.html_url
    ));
    output.push_str(&format!("> {}\n\n", profile.bio_or_default()));

    output.push_str("| Metric | Value |\n|--------|-------|\n");
    output.push_str(&format!("| Followers | {} |\n", profile.followers));
    output.push_str(&format!("| Repositories | {} |\n", profile.public_repos));
    output.push_str(&format!("| Total Stars | {} |\n", aggregate.total_stars));
    output.push_str(&format!(
        "| Lines of Code (est.) | {} |\n",
        format_lines_of_code(aggregate.estimated_lines_of_code)
    ));
    output.push_str(&format!(
        "| Longest Streak | {} days |\n",
        aggregate.longest_streak
    ));
    output.push_str(&format!(
        "| Joined | {} |\n",
        profile.created_at.format("%Y-%m-%d")
    ));

    let top = top_repositories(&report.repositories, TOP_REPOSITORIES);
    if !top.is_empty() {
        output.push_str("\n### Top Repositories\n\n");
        for repo in top {
            output.push_str(&format!(
                "- [{}]({}) ({} stars) {}\n",
                repo.name,
                repo.html_url,
                repo.stargazers_count,
                repo.description.as_deref().unwrap_or("")
            ));
        }
    }

    if !aggregate.languages.is_empty() {
        output.push_str("\n### Languages\n\n| Language | Share |\n|----------|-------|\n");
        for language in &aggregate.languages {
            output.push_str(&format!(
                "| {} | {:.1}% |\n",
                language.language, language.percentage
            ));
        }
    }

    if !aggregate.yearly_commits.is_empty() {
        output.push_str("\n### Commits per Year\n\n| Year | Commits |\n|------|---------|\n");
        for year in &aggregate.yearly_commits {
            output.push_str(&format!("| {} | {} |\n", year.year, year.commits));
        }
    }

    output.push('\n');
    output
}
