use crate::server;
use clap::{Args, Parser, Subcommand};
use udyam::error::AppError;
use udyam::registration::form_schema;

#[derive(Parser, Debug)]
#[command(
    name = "Udyam Registration Service",
    about = "Run the two-step Aadhaar/PAN registration backend",
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
    /// Print the two-step form schema as JSON and exit
    Schema,
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
        Command::Schema => print_schema(),
    }
}

fn print_schema() -> Result<(), AppError> {
    let schema = form_schema();
    let rendered =
        serde_json::to_string_pretty(&schema).map_err(|err| AppError::Io(err.into()))?;
    println!("{rendered}");
    Ok(())
}
