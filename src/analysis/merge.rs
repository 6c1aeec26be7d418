use std::collections::BTreeMap;

use crate::models::WeeklyActivity;

/// Sums per-repository weekly series into one series, ascending by week.
///
/// Weeks missing from every input are absent from the output. The per-day
/// breakdown is not carried over; merged entries hold a zeroed placeholder.
pub fn merge_commit_activity(series: &[Vec<WeeklyActivity>]) -> Vec<WeeklyActivity> {
    let mut totals: BTreeMap<i64, u32> = BTreeMap::new();

    for weeks in series {
        for week in weeks {
            *totals.entry(week.week).or_insert(0) += week.total;
        }
    }

    totals
        .into_iter()
        .map(|(week, total)| WeeklyActivity::new(week, total))
        .collect()
}
