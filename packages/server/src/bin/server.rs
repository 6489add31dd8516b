//! FlashChat real-time chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin flashchat-server -- --jwt-secret dev-secret
//! cargo run --bin flashchat-server -- --host 0.0.0.0 --port 3000 --fixtures seed.json
//! cargo run --bin flashchat-server -- --jwt-secret dev-secret --issue-token 1
//! cargo run --bin flashchat-server -- --jwt-secret dev-secret --issue-token 1 --token-ttl 3600
//! ```

use std::path::PathBuf;

use clap::Parser;
use flashchat_server::{
    bootstrap::{self, AppConfig},
    domain::UserId,
    infrastructure::identity::DEFAULT_TOKEN_TTL_SECS,
};
use flashchat_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "flashchat-server")]
#[command(about = "Real-time chat server with rooms, presence and fan-out", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Secret used to verify (and issue) HS256 tokens
    #[arg(long, env = "FLASHCHAT_JWT_SECRET")]
    jwt_secret: String,

    /// Node id on the fan-out transport (random if omitted)
    #[arg(long)]
    node_id: Option<String>,

    /// JSON file with users and rooms to seed (demo data if omitted)
    #[arg(long)]
    fixtures: Option<PathBuf>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Lifetime in seconds of tokens printed by --issue-token
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TOKEN_TTL_SECS)]
    token_ttl: u64,

    /// Print a signed token for the given user id and exit
    #[arg(long, value_name = "USER_ID")]
    issue_token: Option<i64>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = AppConfig {
        jwt_secret: args.jwt_secret,
        node_id: args.node_id,
        fixtures: args.fixtures,
        token_ttl_secs: args.token_ttl,
    };
    let app = match bootstrap::build(&config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(user_id) = args.issue_token {
        let token = UserId::new(user_id)
            .map_err(|e| e.to_string())
            .and_then(|user_id| app.identity.issue_token(user_id).map_err(|e| e.to_string()));
        match token {
            Ok(token) => println!("{token}"),
            Err(e) => {
                tracing::error!("Failed to issue token: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = app.server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
