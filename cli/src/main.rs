mod commands;
mod output;
mod terminal;

use commands::{CommandLine, Commands, audit, plan, sweep};
use keyprobe_common::warn;
use keyprobe_core::network::NoAuthenticator;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);
    print::banner(commands.no_banner, commands.quiet);

    let cfg = commands.base_config();
    let result = match &commands.command {
        Commands::Plan {
            targets,
            credentials,
            preview,
        } => plan::plan(targets, credentials, *preview, cfg).await,
        Commands::Audit {
            targets,
            credentials,
            run,
            output,
        } => {
            warn!("No login backend is built in; every credential attempt will fail");
            audit::audit(targets, credentials, run, output, cfg, NoAuthenticator).await
        }
        Commands::Sweep { targets, run, output } => sweep::sweep(targets, run, output, cfg).await,
    };
    print::end_of_program();
    result
}
