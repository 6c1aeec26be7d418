use serde::{Deserialize, Serialize};

pub const DAYS_PER_WEEK: usize = 7;

/// One week of commit activity for a repository, as computed by GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyActivity {
    /// Unix epoch seconds at the start of the week.
    pub week: i64,
    pub total: u32,
    #[serde(default = "empty_days")]
    pub days: [u32; DAYS_PER_WEEK],
}

impl WeeklyActivity {
    pub fn new(week: i64, total: u32) -> Self {
        Self {
            week,
            total,
            days: empty_days(),
        }
    }
}

fn empty_days() -> [u32; DAYS_PER_WEEK] {
    [0; DAYS_PER_WEEK]
}
