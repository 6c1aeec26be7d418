use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Utc};

use crate::models::{
    AggregateState, LanguageShare, MetricComparison, MetricKind, ProfileReport, Repository,
    WeeklyActivity, YearlyCommits,
};

/// Repository size (KB) is scaled by this to estimate lines of code.
pub const LOC_MULTIPLIER: u64 = 100;
pub const TOP_LANGUAGES: usize = 5;
pub const TOP_REPOSITORIES: usize = 3;
pub const RECENT_WEEKS: usize = 12;

impl AggregateState {
    pub fn derive(repos: &[Repository], merged_activity: Vec<WeeklyActivity>) -> Self {
        Self {
            total_stars: total_stars(repos),
            estimated_lines_of_code: estimated_lines_of_code(repos),
            languages: language_ranking(repos, TOP_LANGUAGES),
            yearly_commits: yearly_commits(&merged_activity),
            longest_streak: longest_streak(&merged_activity),
            merged_activity,
        }
    }
}

pub fn total_stars(repos: &[Repository]) -> u64 {
    repos.iter().map(|r| r.stargazers_count as u64).sum()
}

/// An estimate only: GitHub reports repository size, not line counts.
pub fn estimated_lines_of_code(repos: &[Repository]) -> u64 {
    repos.iter().map(|r| r.size * LOC_MULTIPLIER).sum()
}

/// Languages ranked by summed repository size, largest first.
///
/// Repositories without a detected language are skipped. Percentages are
/// relative to the returned entries.
pub fn language_ranking(repos: &[Repository], limit: usize) -> Vec<LanguageShare> {
    let mut sizes: HashMap<&str, u64> = HashMap::new();
    for repo in repos {
        if let Some(ref language) = repo.language {
            *sizes.entry(language.as_str()).or_insert(0) += repo.size;
        }
    }

    let mut ranked: Vec<(&str, u64)> = sizes.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(limit);

    let total: u64 = ranked.iter().map(|(_, size)| size).sum();

    ranked
        .into_iter()
        .map(|(language, size)| LanguageShare {
            language: language.to_string(),
            size,
            percentage: if total == 0 {
                0.0
            } else {
                size as f32 / total as f32 * 100.0
            },
        })
        .collect()
}

/// Longest run of consecutive days with at least one commit.
pub fn longest_streak(weeks: &[WeeklyActivity]) -> u32 {
    let mut current = 0;
    let mut longest = 0;

    for commits in weeks.iter().flat_map(|w| w.days.iter()) {
        if *commits > 0 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }

    longest
}

/// Commit totals bucketed by the UTC calendar year each week starts in.
pub fn yearly_commits(weeks: &[WeeklyActivity]) -> Vec<YearlyCommits> {
    let mut years: BTreeMap<i32, u64> = BTreeMap::new();

    for week in weeks {
        let Some(start) = DateTime::<Utc>::from_timestamp(week.week, 0) else {
            tracing::debug!("Skipping week with out-of-range timestamp {}", week.week);
            continue;
        };
        *years.entry(start.year()).or_insert(0) += week.total as u64;
    }

    years
        .into_iter()
        .map(|(year, commits)| YearlyCommits { year, commits })
        .collect()
}

pub fn recent_weeks(weeks: &[WeeklyActivity], count: usize) -> &[WeeklyActivity] {
    &weeks[weeks.len().saturating_sub(count)..]
}

pub fn top_repositories(repos: &[Repository], count: usize) -> Vec<&Repository> {
    let mut sorted: Vec<&Repository> = repos.iter().collect();
    sorted.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    sorted.truncate(count);
    sorted
}

/// Formats a count with a K or M suffix once it reaches a thousand.
pub fn format_magnitude(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

pub fn format_lines_of_code(estimated_lines: u64) -> String {
    let scaled = (estimated_lines + LOC_MULTIPLIER / 2) / LOC_MULTIPLIER;
    format_magnitude(scaled)
}

pub fn compare_metrics(first: &ProfileReport, second: &ProfileReport) -> Vec<MetricComparison> {
    vec![
        MetricComparison::new(
            "Total Stars",
            first.aggregate.total_stars,
            second.aggregate.total_stars,
        ),
        MetricComparison::new(
            "Followers",
            first.profile.followers as u64,
            second.profile.followers as u64,
        ),
        MetricComparison::new(
            "Public Repositories",
            first.profile.public_repos as u64,
            second.profile.public_repos as u64,
        ),
        MetricComparison::new(
            "Estimated Lines of Code",
            first.aggregate.estimated_lines_of_code,
            second.aggregate.estimated_lines_of_code,
        )
        .with_kind(MetricKind::LinesOfCode),
    ]
}

pub fn format_metric(kind: MetricKind, value: u64) -> String {
    match kind {
        MetricKind::Count => format_magnitude(value),
        MetricKind::LinesOfCode => format_lines_of_code(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Leader;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn repo(name: &str, language: Option<&str>, size: u64, stars: u32) -> Repository {
        Repository {
            id: 1,
            name: name.to_string(),
            description: None,
            language: language.map(str::to_string),
            stargazers_count: stars,
            forks_count: 0,
            size,
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            default_branch: "main".to_string(),
            html_url: format!("https://github.com/octocat/{}", name),
        }
    }

    #[test]
    fn test_format_magnitude() {
        assert_eq!(format_magnitude(0), "0");
        assert_eq!(format_magnitude(999), "999");
        assert_eq!(format_magnitude(1_000), "1.0K");
        assert_eq!(format_magnitude(12_345), "12.3K");
        assert_eq!(format_magnitude(1_000_000), "1.0M");
        assert_eq!(format_magnitude(2_500_000), "2.5M");
    }

    #[test]
    fn test_format_lines_of_code_applies_multiplier() {
        assert_eq!(format_lines_of_code(999 * LOC_MULTIPLIER), "999");
        assert_eq!(format_lines_of_code(1_000 * LOC_MULTIPLIER), "1.0K");
        assert_eq!(format_lines_of_code(1_000_000 * LOC_MULTIPLIER), "1.0M");
        assert_eq!(format_lines_of_code(149), "1");
    }

    #[test]
    fn test_language_ranking_limits_and_orders() {
        let repos = vec![
            repo("a", Some("Rust"), 500, 0),
            repo("b", Some("Go"), 300, 0),
            repo("c", Some("Rust"), 100, 0),
            repo("d", None, 10_000, 0),
            repo("e", Some("C"), 50, 0),
            repo("f", Some("Zig"), 40, 0),
            repo("g", Some("Lua"), 30, 0),
            repo("h", Some("Nim"), 20, 0),
        ];

        let ranking = language_ranking(&repos, TOP_LANGUAGES);

        assert_eq!(ranking.len(), 5);
        let names: Vec<&str> = ranking.iter().map(|l| l.language.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Go", "C", "Zig", "Lua"]);
        assert_eq!(ranking[0].size, 600);
        assert!(ranking.windows(2).all(|w| w[0].size >= w[1].size));

        let total: f32 = ranking.iter().map(|l| l.percentage).sum();
        assert!((total - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_language_ranking_without_languages_is_empty() {
        let repos = vec![repo("docs", None, 100, 1)];
        assert!(language_ranking(&repos, TOP_LANGUAGES).is_empty());
    }

    #[test]
    fn test_totals() {
        let repos = vec![repo("a", None, 12, 3), repo("b", None, 8, 4)];
        assert_eq!(total_stars(&repos), 7);
        assert_eq!(estimated_lines_of_code(&repos), 2_000);
    }

    #[test]
    fn test_streak_counts_consecutive_days_across_weeks() {
        let mut first = WeeklyActivity::new(0, 3);
        first.days = [0, 0, 0, 0, 1, 1, 1];
        let mut second = WeeklyActivity::new(604_800, 2);
        second.days = [1, 1, 0, 1, 0, 0, 0];

        assert_eq!(longest_streak(&[first, second]), 5);
    }

    #[test]
    fn test_streak_is_zero_for_merged_series() {
        let merged = vec![WeeklyActivity::new(0, 40), WeeklyActivity::new(604_800, 12)];
        assert_eq!(longest_streak(&merged), 0);
    }

    #[test]
    fn test_yearly_commits_bucket_by_week_start() {
        let last_week_2023 = Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap().timestamp();
        let first_week_2024 = Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap().timestamp();

        let years = yearly_commits(&[
            WeeklyActivity::new(first_week_2024, 4),
            WeeklyActivity::new(last_week_2023, 6),
            WeeklyActivity::new(first_week_2024 + 604_800, 1),
        ]);

        assert_eq!(
            years,
            vec![
                YearlyCommits { year: 2023, commits: 6 },
                YearlyCommits { year: 2024, commits: 5 },
            ]
        );
    }

    #[test]
    fn test_recent_weeks_and_top_repositories() {
        let weeks: Vec<WeeklyActivity> = (0..20).map(|i| WeeklyActivity::new(i, 1)).collect();
        let recent = recent_weeks(&weeks, RECENT_WEEKS);
        assert_eq!(recent.len(), 12);
        assert_eq!(recent[0].week, 8);
        assert_eq!(recent_weeks(&weeks[..2], RECENT_WEEKS).len(), 2);

        let repos = vec![repo("a", None, 1, 2), repo("b", None, 1, 9), repo("c", None, 1, 5)];
        let top: Vec<&str> = top_repositories(&repos, 2)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(top, vec!["b", "c"]);
    }

    #[test]
    fn test_metric_comparison_leader() {
        assert_eq!(MetricComparison::new("x", 3, 1).leader, Leader::First);
        assert_eq!(MetricComparison::new("x", 1, 3).leader, Leader::Second);
        assert_eq!(MetricComparison::new("x", 2, 2).leader, Leader::Tie);
    }

    #[test]
    fn test_lines_of_code_metric_is_shown_in_hundreds() {
        let repos = vec![repo("engine", Some("Rust"), 12_000, 0)];
        let report = ProfileReport {
            profile: crate::analysis::pipeline::tests::profile("octocat", 0),
            aggregate: AggregateState::derive(&repos, Vec::new()),
            repositories: repos,
            fetched_at: chrono::Utc::now(),
        };

        let metrics = compare_metrics(&report, &report);
        let loc = metrics.last().unwrap();
        assert_eq!(loc.kind, MetricKind::LinesOfCode);
        assert_eq!(format_metric(loc.kind, loc.first), "12.0K");
        assert_eq!(format_metric(MetricKind::Count, 1_200_000), "1.2M");
    }
}
