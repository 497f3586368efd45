use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use recent_rhythms::{
    cli::{self, ExportFormat},
    config, logging,
    theme::Theme,
    types::Limit,
    utils, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name = "rhythms",
  bin_name = "rhythms",
  about = env!("CARGO_PKG_DESCRIPTION"),
  styles = styles(),
)]
struct Cli {
    /// Show debug logs on stderr
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Show whether a valid token is cached
    Status,

    /// Forget the cached token
    Logout,

    /// List recently played tracks
    Recent(RecentOptions),

    /// Listening statistics and charts
    Stats(StatsOptions),

    /// Export track data or a summary report
    Export(ExportOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct RecentOptions {
    /// Number of recent tracks (1-50)
    #[clap(long, default_value = "10", value_parser = utils::parse_limit)]
    pub limit: Limit,
}

#[derive(Parser, Debug, Clone)]
pub struct StatsOptions {
    /// Number of recent tracks (1-50)
    #[clap(long, default_value = "50", value_parser = utils::parse_limit)]
    pub limit: Limit,

    /// Chart colour theme
    #[clap(long, value_enum, default_value_t = Theme::Default)]
    pub theme: Theme,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportOptions {
    /// Number of recent tracks (1-50)
    #[clap(long, default_value = "10", value_parser = utils::parse_limit)]
    pub limit: Limit,

    /// Output format
    #[clap(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// Output file, defaults to a name derived from the format
    #[clap(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file. Err: {}", e);
    }

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Status => cli::status().await,
        Command::Logout => cli::logout().await,
        Command::Recent(opt) => cli::recent(opt.limit).await,
        Command::Stats(opt) => cli::stats(opt.limit, opt.theme).await,
        Command::Export(opt) => cli::export(opt.limit, opt.format, opt.output).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
