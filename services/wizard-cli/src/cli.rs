use crate::demo::{run_demo, DemoArgs};
use crate::draft::{clear_draft, show_draft, ShowArgs};
use clap::{Parser, Subcommand};
use tenant_portal::config::AppConfig;
use tenant_portal::error::AppError;
use tenant_portal::telemetry;
use tenant_portal::wizard::{DraftCodec, FileDraftStorage};

#[derive(Parser, Debug)]
#[command(
    name = "Tenant Application Wizard",
    about = "Walk, inspect, and reset tenant application drafts from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk the application wizard with sample answers, resuming any saved draft
    Demo(DemoArgs),
    /// Inspect or discard the saved application draft
    Draft {
        #[command(subcommand)]
        command: DraftCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DraftCommand {
    /// Print a summary of the saved draft
    Show(ShowArgs),
    /// Delete the saved draft
    Clear,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let storage = FileDraftStorage::new(&config.drafts.directory, config.drafts.quota_bytes);
    let codec = DraftCodec::with_key(storage, config.drafts.storage_key.clone());

    match cli.command {
        Command::Demo(args) => run_demo(codec, args).await,
        Command::Draft {
            command: DraftCommand::Show(args),
        } => show_draft(&codec, args),
        Command::Draft {
            command: DraftCommand::Clear,
        } => clear_draft(&codec),
    }
}
