use clap::Parser;
use std::process::ExitCode;
use temple_donations::args::{Args, Command};
use temple_donations::{commands, Config, Result};
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().donations_home().path();

    if let Command::Init(init_args) = args.command() {
        commands::init(home, init_args.edit_validation())
            .await?
            .print();
        return Ok(());
    }

    let config = Config::load(home).await?;
    let db = config.db().clone();
    let result = match args.command() {
        Command::Init(_) => Ok(()),
        Command::Add(add_args) => commands::add(config, add_args.clone())
            .await
            .map(|out| out.print()),
        Command::QuickAdd => commands::quick_add(config).await.map(|out| out.print()),
        Command::List => commands::list(config).await.map(|out| out.print()),
        Command::Show(show_args) => commands::show(config, show_args.clone())
            .await
            .map(|out| out.print()),
        Command::Edit(edit_args) => commands::edit(config, edit_args.clone())
            .await
            .map(|out| out.print()),
        Command::Delete(delete_args) => commands::delete(config, delete_args.clone())
            .await
            .map(|out| out.print()),
    };

    // Let SQLite finish its writes before the process exits.
    db.close().await;
    result
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "{}={},{}={}",
            env!("CARGO_CRATE_NAME"),
            level,
            "temple_donations",
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
