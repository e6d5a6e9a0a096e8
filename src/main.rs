//! emergency-nearby CLI entry point
//!
//! Nearby hospitals and embassies - CLI + web API

use emergency_nearby::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
