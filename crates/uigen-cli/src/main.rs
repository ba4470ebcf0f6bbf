//! uigen command-line interface

mod cli;
mod commands;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::command().get_matches();
    let Some((name, args)) = matches.subcommand() else {
        return Ok(());
    };

    init_tracing(args.get_flag("json-logs"));

    let succeeded = commands::dispatch(name, args).await?;
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
