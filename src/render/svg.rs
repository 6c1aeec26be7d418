use crate::analysis::summary::{
    compare_metrics, format_lines_of_code, format_magnitude, recent_weeks, top_repositories,
    RECENT_WEEKS, TOP_REPOSITORIES,
};
use crate::models::{Leader, MetricComparison, ProfileReport};
use crate::session::Session;

const START_Y: i32 = 34;
const LINE_HEIGHT: i32 = 20;
const LEFT_PADDING: f32 = 20.0;
const COLUMN_GAP: f32 = 30.0;
const RIGHT_PADDING: f32 = 20.0;
const CHAR_WIDTH: f32 = 9.6;
const MIN_ROW_CHARS: usize = 36;
const CHART_HEIGHT: f32 = 60.0;
const LANGUAGE_BAR_HEIGHT: f32 = 10.0;

/// Fill colours for the ranked languages, in rank order.
pub const LANGUAGE_COLORS: [u32; 5] = [0x60a5fa, 0x34d399, 0xf87171, 0xfbbf24, 0xa78bfa];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

pub struct ThemeColors {
    pub bg: &'static str,
    pub text: &'static str,
    pub key: &'static str,
    pub value: &'static str,
    pub cc: &'static str,
    pub lead: &'static str,
    pub trail: &'static str,
}

impl Theme {
    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Dark => ThemeColors {
                bg: "#1a1d24",
                text: "#e5e7eb",
                key: "#60a5fa",
                value: "#f3f4f6",
                cc: "#6b7280",
                lead: "#4ade80",
                trail: "#f87171",
            },
            Theme::Light => ThemeColors {
                bg: "#ffffff",
                text: "#24292f",
                key: "#0366d6",
                value: "#24292f",
                cc: "#6a737d",
                lead: "#1a7f37",
                trail: "#cf222e",
            },
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Key, dot leader and value padded to `align_width` characters.
pub fn build_stat_row(key: &str, value: &str, align_width: usize) -> (String, String, String) {
    let key_part = format!("{key}: ");
    let base_len = key_part.chars().count() + value.chars().count();
    let available = align_width.saturating_sub(base_len);

    let dots = match available {
        0 => "".to_string(),
        1 => " ".to_string(),
        2 => ". ".to_string(),
        n => ".".repeat(n),
    };

    (key_part, dots, value.to_string())
}

fn build_header_line(label: &str, align_width: usize) -> String {
    let base = format!("{label} ");
    let dash_count = align_width.saturating_sub(base.chars().count());
    format!("{base}{}", "-".repeat(dash_count))
}

enum Line {
    Header(String),
    Blank,
    Stat {
        key: String,
        value: String,
        class: &'static str,
    },
}

fn stat(key: &str, value: String) -> Line {
    Line::Stat {
        key: key.to_string(),
        value,
        class: "value",
    }
}

fn metric_class(metric: Option<&MetricComparison>, index: usize) -> &'static str {
    match metric.map(|m| m.leader) {
        Some(Leader::First) if index == 0 => "lead",
        Some(Leader::Second) if index == 1 => "lead",
        Some(Leader::First) | Some(Leader::Second) => "trail",
        _ => "value",
    }
}

fn profile_lines(report: &ProfileReport, index: usize, metrics: &[MetricComparison]) -> Vec<Line> {
    let profile = &report.profile;
    let aggregate = &report.aggregate;

    let mut lines = vec![
        Line::Header(format!("{}@github", profile.login)),
        stat("Name", profile.display_name().to_string()),
        stat("Bio", profile.bio_or_default().to_string()),
        stat("Joined", profile.created_at.format("%Y-%m-%d").to_string()),
        Line::Blank,
        Line::Header("- Stats".to_string()),
    ];

    let values = [
        ("Stars", aggregate.total_stars.to_string()),
        ("Followers", profile.followers.to_string()),
        ("Repos", profile.public_repos.to_string()),
        (
            "LoC (est.)",
            format_lines_of_code(aggregate.estimated_lines_of_code),
        ),
    ];
    for (i, (key, value)) in values.into_iter().enumerate() {
        lines.push(Line::Stat {
            key: key.to_string(),
            value,
            class: metric_class(metrics.get(i), index),
        });
    }
    lines.push(stat("Streak", format!("{} days", aggregate.longest_streak)));

    let top = top_repositories(&report.repositories, TOP_REPOSITORIES);
    if !top.is_empty() {
        lines.push(Line::Blank);
        lines.push(Line::Header("- Top Repositories".to_string()));
        for repo in top {
            lines.push(stat(&repo.name, format!("{} stars", repo.stargazers_count)));
        }
    }

    if !aggregate.languages.is_empty() {
        lines.push(Line::Blank);
        lines.push(Line::Header("- Languages".to_string()));
        for language in &aggregate.languages {
            lines.push(stat(
                &language.language,
                format!("{:.1}%", language.percentage),
            ));
        }
    }

    if !aggregate.yearly_commits.is_empty() {
        lines.push(Line::Blank);
        lines.push(Line::Header("- Commits".to_string()));
        for year in &aggregate.yearly_commits {
            lines.push(stat(&year.year.to_string(), format_magnitude(year.commits)));
        }
    }

    lines
}

fn line_width(line: &Line) -> usize {
    match line {
        Line::Header(text) => text.chars().count() + 4,
        Line::Blank => 0,
        Line::Stat { key, value, .. } => key.chars().count() + 2 + value.chars().count(),
    }
}

fn render_column(report: &ProfileReport, index: usize, metrics: &[MetricComparison], x: f32) -> (String, f32, f32) {
    let lines = profile_lines(report, index, metrics);
    let align_width = lines
        .iter()
        .map(line_width)
        .max()
        .unwrap_or(0)
        .max(MIN_ROW_CHARS);

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let y = START_Y + (i as i32) * LINE_HEIGHT;
        match line {
            Line::Blank => {}
            Line::Header(label) => {
                out.push_str(&format!(
                    r#"<tspan x="{x}" y="{y}">{}</tspan>
"#,
                    escape_xml(&build_header_line(label, align_width))
                ));
            }
            Line::Stat { key, value, class } => {
                let (k, d, v) = build_stat_row(key, value, align_width);
                out.push_str(&format!(
                    r#"<tspan x="{x}" y="{y}" class="key">{}</tspan><tspan class="cc">{}</tspan><tspan class="{class}">{}</tspan>
"#,
                    escape_xml(&k),
                    escape_xml(&d),
                    escape_xml(&v)
                ));
            }
        }
    }

    let width = align_width as f32 * CHAR_WIDTH;
    let height = START_Y as f32 + lines.len() as f32 * LINE_HEIGHT as f32;
    (out, width, height)
}

/// Weekly commit bars for the last twelve weeks, drawn under a column.
fn render_weekly_chart(report: &ProfileReport, x: f32, y: f32, width: f32) -> String {
    let weeks = recent_weeks(&report.aggregate.merged_activity, RECENT_WEEKS);
    if weeks.is_empty() {
        return String::new();
    }

    let max = weeks.iter().map(|w| w.total).max().unwrap_or(0).max(1) as f32;
    let slot = width / weeks.len() as f32;
    let mut out = String::new();
    for (i, week) in weeks.iter().enumerate() {
        let h = week.total as f32 / max * CHART_HEIGHT;
        out.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" rx="2"/>
"#,
            x + i as f32 * slot + slot * 0.15,
            y + CHART_HEIGHT - h,
            slot * 0.7,
            h,
            hex(LANGUAGE_COLORS[0])
        ));
    }
    out
}

/// One segment per ranked language, sized by its share.
fn render_language_bar(report: &ProfileReport, x: f32, y: f32, width: f32) -> String {
    let mut out = String::new();
    let mut offset = x;
    for (language, color) in report.aggregate.languages.iter().zip(LANGUAGE_COLORS) {
        let w = width * language.percentage / 100.0;
        out.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{LANGUAGE_BAR_HEIGHT}" fill="{}"/>
"#,
            offset,
            y,
            w,
            hex(color)
        ));
        offset += w;
    }
    out
}

fn hex(color: u32) -> String {
    format!("#{:06x}", color)
}

/// Renders every loaded profile in `session` as a side-by-side SVG card.
pub fn generate_svg(session: &Session, theme: Theme) -> String {
    let colors = theme.colors();
    let reports = session.reports();

    let metrics = match reports.as_slice() {
        [first, second] => compare_metrics(first, second),
        _ => Vec::new(),
    };

    let mut columns = String::new();
    let mut charts = String::new();
    let mut x = LEFT_PADDING;
    let mut text_height: f32 = START_Y as f32;
    let mut column_widths = Vec::new();

    for (index, report) in reports.iter().enumerate() {
        let (tspans, w, h) = render_column(report, index, &metrics, x);
        columns.push_str(&tspans);
        column_widths.push((x, w));
        text_height = text_height.max(h);
        x += w + COLUMN_GAP;
    }

    for (report, (cx, w)) in reports.iter().zip(&column_widths) {
        charts.push_str(&render_weekly_chart(report, *cx, text_height + 10.0, *w));
        charts.push_str(&render_language_bar(
            report,
            *cx,
            text_height + CHART_HEIGHT + 22.0,
            *w,
        ));
    }

    let w = (x - COLUMN_GAP + RIGHT_PADDING).max(LEFT_PADDING + RIGHT_PADDING);
    let h = text_height + CHART_HEIGHT + LANGUAGE_BAR_HEIGHT + 52.0;
    let alert = session
        .error()
        .map(|e| {
            format!(
                r#"<text x="{LEFT_PADDING}" y="{:.1}" fill="{}">{}</text>
"#,
                h - 8.0,
                colors.trail,
                escape_xml(e)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<?xml version='1.0' encoding='UTF-8'?>
<svg xmlns="http://www.w3.org/2000/svg"
     width="{w}px" height="{h}px"
     font-family="ConsolasFallback,Consolas,monospace"
     font-size="16px">

<style>
.key   {{ fill: {key}; }}
.value {{ fill: {value}; }}
.cc    {{ fill: {cc}; }}
.lead  {{ fill: {lead}; }}
.trail {{ fill: {trail}; }}
</style>

<rect width="{w}px" height="{h}px" fill="{bg}" rx="15"/>

<text fill="{text}" xml:space="preserve">
{columns}
</text>

{charts}
{alert}
</svg>
"#,
        key = colors.key,
        value = colors.value,
        cc = colors.cc,
        lead = colors.lead,
        trail = colors.trail,
        bg = colors.bg,
        text = colors.text,
    )
}
