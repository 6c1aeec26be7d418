use std::sync::Arc;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use gitprofile::capture;
use gitprofile::render::{self, Theme};
use gitprofile::{Analyzer, CaptureConfig, Config, GitHubClient, Mode, Phase, PipelineConfig, Session};

#[derive(Parser, Debug)]
#[command(name = "gitprofile")]
#[command(version = "0.1.0")]
#[command(about = "Analyze or compare GitHub profiles and export a shareable report card")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a single GitHub profile
    Analyze {
        /// GitHub username to analyze
        username: String,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Compare two GitHub profiles side by side
    Compare {
        /// First GitHub username
        first: String,

        /// Second GitHub username
        second: String,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(ClapArgs, Debug)]
struct OutputArgs {
    /// Report format printed once the analysis settles
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Also write an SVG card next to the PNG
    #[arg(long)]
    svg: bool,

    /// Colour theme for the SVG card
    #[arg(long, value_enum, default_value_t = ThemeArg::Dark)]
    theme: ThemeArg,

    /// Copy the captured PNG to the clipboard
    #[arg(long)]
    copy: bool,

    /// Skip rasterizing the report
    #[arg(long)]
    no_capture: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Markdown,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("gitprofile=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let (mode, args) = match cli.command {
        Command::Analyze { username, output } => (Mode::Analyze { username }, output),
        Command::Compare {
            first,
            second,
            output,
        } => (Mode::Compare { first, second }, output),
    };

    if mode.usernames().iter().any(|u| u.trim().is_empty()) {
        anyhow::bail!("usernames must not be empty");
    }

    let github = GitHubClient::from_config(&config)?;
    let capture = CaptureConfig {
        enabled: !args.no_capture,
        copy_to_clipboard: args.copy,
        ..CaptureConfig::from(&config)
    };
    let analyzer = Analyzer::new(Arc::new(github), PipelineConfig::from(&config), capture)
        .with_progress(true);

    let session = analyzer.run(mode.clone()).await;

    output_session(&session, &args)?;

    if args.svg && !session.reports().is_empty() {
        let svg = render::generate_svg(&session, args.theme.into());
        let path = capture::export_svg(
            &svg,
            &config.output_dir,
            &mode.export_filename().replace(".png", ".svg"),
        )?;
        tracing::info!("SVG written to: {}", path.display());
    }

    if let Some(artifact) = session.capture() {
        eprintln!(
            "Saved {} ({}x{}){}",
            artifact.path.display(),
            artifact.width,
            artifact.height,
            if artifact.copied { ", copied to clipboard" } else { "" }
        );
    }

    if session.phase() == Phase::Error {
        std::process::exit(1);
    }

    Ok(())
}

fn output_session(session: &Session, args: &OutputArgs) -> anyhow::Result<()> {
    let output = match args.format {
        Format::Json => serde_json::to_string_pretty(session)?,
        Format::Markdown => render::format_markdown(session),
        Format::Text => render::format_text(session),
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}
