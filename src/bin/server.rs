//! Room-based chat server binary.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! ```

use clap::Parser;

use chat_rooms_rs::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "server", about = "Room-based realtime chat server")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger("debug");

    let args = Args::parse();
    tracing::info!("Starting chat server...");

    // Run the server
    if let Err(e) = chat_rooms_rs::run_server(&args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
