use std::path::PathBuf;

use crate::inspect::{print_fixtures, print_schema, validate_document};
use crate::server;
use clap::{Args, Parser, Subcommand};
use depot_lifecycle::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Depot Life Cycle",
    about = "Run the depot lifecycle API and inspect its data contract from the command line",
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
    /// Print the example parties, release and redelivery as JSON
    Fixtures,
    /// Print the OpenAPI document, or one component schema
    Schema(SchemaArgs),
    /// Check a JSON document against a component schema
    Validate(ValidateArgs),
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

#[derive(Args, Debug)]
pub(crate) struct SchemaArgs {
    /// Component name such as `GateCreateRequest`; omit for the whole document
    pub(crate) name: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Component schema the document must satisfy
    #[arg(long)]
    pub(crate) schema: String,
    /// Path to the JSON document
    pub(crate) file: PathBuf,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Fixtures => print_fixtures(),
        Command::Schema(args) => print_schema(args.name.as_deref()),
        Command::Validate(args) => validate_document(&args.schema, &args.file),
    }
}
