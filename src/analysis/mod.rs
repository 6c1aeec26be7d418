pub mod merge;
pub mod pipeline;
pub mod summary;

pub use merge::merge_commit_activity;
pub use pipeline::AnalysisPipeline;
pub use summary::{
    compare_metrics, format_lines_of_code, format_magnitude, format_metric, language_ranking, longest_streak,
    recent_weeks, top_repositories, total_stars, yearly_commits,
};
