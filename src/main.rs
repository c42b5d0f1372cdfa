// src/main.rs
use std::process::exit;
use clap::Parser;
use tracing::{error, Level};

use threatscope::cli::{App, Args};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging; stdout stays free for results
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let app = App::new(args);

    match app.run().await {
        Ok(true) => {}
        Ok(false) => exit(1),
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    }
}
