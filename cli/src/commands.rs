pub mod audit;
pub mod inputs;
pub mod plan;
pub mod run;
pub mod sweep;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use keyprobe_common::config::{Config, DEFAULT_CONCURRENCY, DEFAULT_ERROR_BUDGET};
use keyprobe_common::network::target::ServiceKind;

#[derive(Parser)]
#[command(name = "keyprobe", version)]
#[command(about = "Concurrent auditor for remote login services.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Less output; repeat for even less
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// More log output; repeat for trace level
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Do not print the banner
    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate inputs and preview the credential trial order
    #[command(alias = "p")]
    Plan {
        #[command(flatten)]
        targets: TargetArgs,
        #[command(flatten)]
        credentials: CredentialArgs,
        /// Number of trials to preview
        #[arg(long, default_value_t = 10)]
        preview: usize,
    },
    /// Try the credential matrix against every reachable target
    #[command(alias = "a")]
    Audit {
        #[command(flatten)]
        targets: TargetArgs,
        #[command(flatten)]
        credentials: CredentialArgs,
        #[command(flatten)]
        run: RunArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Check which targets accept connections
    #[command(alias = "s")]
    Sweep {
        #[command(flatten)]
        targets: TargetArgs,
        #[command(flatten)]
        run: RunArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Newline-delimited host list (hosts, host:port, ranges, CIDR blocks)
    #[arg(short = 'T', long)]
    pub targets: Option<PathBuf>,

    /// Service assumed for entries without a scheme
    #[arg(short = 'S', long, default_value = "ssh")]
    pub service: ServiceKind,

    #[command(flatten)]
    pub search: SearchArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// JSON-lines export of search index results
    #[arg(long)]
    pub hits: Option<PathBuf>,

    /// Free-text query matched against product and metadata
    #[arg(long, default_value = "")]
    pub query: String,

    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub product: Option<String>,

    /// Only keep index results seen on this port
    #[arg(long = "index-port")]
    pub port: Option<u16>,

    #[arg(long, default_value_t = 100)]
    pub limit: usize,
}

#[derive(Args, Debug, Clone)]
pub struct CredentialArgs {
    /// Newline-delimited usernames, tried in file order
    #[arg(short = 'U', long)]
    pub users: PathBuf,

    /// Newline-delimited passwords, tried in file order for every username
    #[arg(short = 'P', long)]
    pub passwords: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Number of targets probed at the same time
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Seconds allowed for every connect and every attempt
    #[arg(short, long, default_value = "5", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Consecutive failed attempts before a target is abandoned
    #[arg(long, default_value_t = DEFAULT_ERROR_BUDGET)]
    pub max_errors: u32,

    /// Press 'q' to stop dispatching new targets
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Directory receiving credentials.csv and summary.json
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Run configuration for commands without run arguments.
    pub fn base_config(&self) -> Config {
        Config {
            quiet: self.quiet,
            no_banner: self.no_banner,
            ..Config::default()
        }
    }
}

impl RunArgs {
    pub fn to_config(&self, base: Config) -> Config {
        Config {
            concurrency: self.concurrency,
            timeout: self.timeout,
            max_consecutive_errors: self.max_errors,
            interactive: self.interactive,
            ..base
        }
    }
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("invalid timeout '{s}': {e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid timeout '{s}': {e}"))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
