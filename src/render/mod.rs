pub mod svg;
pub mod text;

pub use svg::{generate_svg, Theme};
pub use text::{format_markdown, format_text};
