use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::activity::WeeklyActivity;
use super::user::{Profile, Repository};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub language: String,
    /// Summed repository size in kilobytes.
    pub size: u64,
    pub percentage: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyCommits {
    pub year: i32,
    pub commits: u64,
}

/// Values derived from the fetched collections. Recomputed on every fetch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateState {
    pub merged_activity: Vec<WeeklyActivity>,
    pub total_stars: u64,
    /// Heuristic estimate from repository sizes, not a line count.
    pub estimated_lines_of_code: u64,
    pub languages: Vec<LanguageShare>,
    pub yearly_commits: Vec<YearlyCommits>,
    pub longest_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    pub profile: Profile,
    pub repositories: Vec<Repository>,
    pub aggregate: AggregateState,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Leader {
    First,
    Second,
    Tie,
}

/// How a compared value is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricKind {
    Count,
    /// Values are the size-scaled estimate and are shown in hundreds.
    LinesOfCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub metric: String,
    pub kind: MetricKind,
    pub first: u64,
    pub second: u64,
    pub leader: Leader,
}

impl MetricComparison {
    pub fn new(metric: &str, first: u64, second: u64) -> Self {
        let leader = match first.cmp(&second) {
            std::cmp::Ordering::Greater => Leader::First,
            std::cmp::Ordering::Less => Leader::Second,
            std::cmp::Ordering::Equal => Leader::Tie,
        };
        Self {
            metric: metric.to_string(),
            kind: MetricKind::Count,
            first,
            second,
            leader,
        }
    }

    pub fn with_kind(mut self, kind: MetricKind) -> Self {
        self.kind = kind;
        self
    }
}
