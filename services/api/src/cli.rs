use crate::demo::{run_demo, run_payout_quote, DemoArgs, PayoutArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use venueperks::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "VenuePerks Loyalty Service",
    about = "Serve and exercise the progressive payout tier engine from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Price a single receipt against a ladder without starting the server
    Payout(PayoutArgs),
    /// Run an end-to-end CLI demo covering tier progression and payouts
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Payout(args) => run_payout_quote(args),
        Command::Demo(args) => run_demo(args),
    }
}
