#![deny(warnings)]

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;

use cascadeui::{
    app::App,
    infrastructure::{cli::Cli, config::Config},
    utils::{initialize_logging, initialize_panic_handler},
};

async fn tokio_main() -> Result<()> {
    initialize_logging()?;

    initialize_panic_handler()?;

    let args = <Cli as Parser>::parse();

    // Load configuration (file-based), then apply CLI overrides
    let mut config = Config::new()?;
    if let Some(history) = args.history {
        config.store.history_limit = history;
    }

    let app = App::new(config, args.user_id, args.pages);
    let state = app.run().await?;
    info!("demo finished with {} action(s) in history", app.store.history().len());

    println!(
        "{} session(s), {} live view(s), {} component(s) with interactions, {} action(s) recorded",
        state.sessions.len(),
        state.views.len(),
        state.components.len(),
        app.store.history().len()
    );
    if args.dump_state {
        println!("{}", serde_json::to_string_pretty(&state)?);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = tokio_main().await {
        eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
        Err(e)
    } else {
        Ok(())
    }
}
