mod app;
mod client;
mod config;
mod docker;
mod inventory;
mod logging;
mod notify;
mod runtime;
mod server;
#[cfg(test)]
mod testing;
mod translator;

use std::process::exit;

use clap::Parser;
use log::{error, info};

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"), long_about = None)]
struct Args {
    /// Location of configuration file
    #[arg(short, long, value_name = "/path/to/config.yaml")]
    config: Option<String>,

    /// Enable debug output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Send GET /<PATH> to the running daemon instead of starting one
    #[arg(value_name = "PATH")]
    path: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = logging::setup_logger(logging::level_from_verbosity(args.verbose)) {
        eprintln!("Failed to initialize logger: {e}. ");
        exit(1);
    }

    let config = match &args.config {
        Some(path) => config::Config::new(path),
        None => Ok(config::Config::default()),
    };

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse configuration file: {e}. ");
            exit(1);
        },
    };

    if let Some(path) = args.path {
        match client::request_daemon(config.listen, &path, config.timeout).await {
            Ok((uri, status)) => println!("Request sent {uri} StatusCode: {}", status.as_u16()),
            // informational only, the exit status stays zero
            Err(e) => println!("Error on request {path}: {e}"),
        }
        return;
    }

    info!("Started {} version {}. ", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received SIGINT, shutting down. ");
        exit(0);
    }) {
        error!("Failed to set SIGINT handler: {e}. ");
        exit(1);
    }

    let app = match app::App::new(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Program failed: {e}. ");
            exit(1);
        },
    };

    if let Err(e) = app.start().await {
        eprintln!("Program failed: {e}. ");
        exit(1);
    }
}
