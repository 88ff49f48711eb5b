use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kana_core::trace_init::{self, TraceGuard, TraceSink};

use kana_cli::commands::compose_ops::{self, ComposeOptions};
use kana_cli::commands::config_ops;

#[derive(Parser)]
#[command(name = "kanatool", about = "Kana composer diagnostics")]
struct Cli {
    /// Log composer decisions to stderr; needs the `trace` feature (RUST_LOG overrides the filter)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Write JSON-lines traces to `kana-trace.jsonl` in this directory; needs the `trace` feature
    #[arg(long, global = true, value_name = "DIR")]
    trace_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Type keys into a composer and show the preedit, queries and transliterations
    Compose {
        /// Keys to type; `{!}` stops and `{<}` rewinds a toggle cycle
        keys: String,
        /// Built-in table (romaji, twelve_key) or a table TOML file
        #[arg(long)]
        table: Option<String>,
        /// Settings TOML file (defaults to the embedded settings)
        #[arg(long)]
        settings: Option<String>,
        /// Input mode to start in (hiragana, full_katakana, half_ascii, ...)
        #[arg(long)]
        mode: Option<String>,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Built-in conversion tables
    Table {
        #[command(subcommand)]
        action: TableAction,
    },
    /// Composer settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum TableAction {
    /// Print a built-in table as TOML
    Export {
        #[arg(default_value = "romaji")]
        name: String,
    },
    /// Check a table TOML file
    Validate { file: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the default settings TOML
    Export,
    /// Check a settings TOML file
    Validate { file: String },
}

fn init_logging(cli: &Cli) -> TraceGuard {
    match (&cli.trace_dir, cli.verbose) {
        (Some(dir), _) => trace_init::init_tracing(TraceSink::JsonLines(dir)),
        (None, true) => trace_init::init_tracing(TraceSink::Stderr),
        (None, false) => TraceGuard::default(),
    }
}

fn main() {
    let cli = Cli::parse();
    let _trace = init_logging(&cli);

    match cli.command {
        Command::Compose {
            keys,
            table,
            settings,
            mode,
            json,
        } => {
            let opts = ComposeOptions {
                table: table.as_deref(),
                settings: settings.as_deref(),
                mode: mode.as_deref(),
                json,
            };
            compose_ops::compose_cmd(&keys, &opts);
        }
        Command::Table { action } => match action {
            TableAction::Export { name } => config_ops::table_export(&name),
            TableAction::Validate { file } => config_ops::table_validate(&file),
        },
        Command::Config { action } => match action {
            ConfigAction::Export => config_ops::settings_export(),
            ConfigAction::Validate { file } => config_ops::settings_validate(&file),
        },
    }
}
