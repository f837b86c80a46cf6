//! The Members Only web server.

use std::{
    env,
    net::SocketAddr,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use members_only::{AppState, SQLiteUserStore, build_router, graceful_shutdown, initialize_db};

/// The web server for members_only.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// Directory containing the gated download file.
    #[arg(long, default_value = "assets")]
    assets_dir: PathBuf,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    // Without a configured secret the cookie key is regenerated on start-up,
    // which logs every user out when the server restarts.
    let secret = env::var("SECRET").ok();
    if secret.is_none() {
        tracing::info!(
            "The environment variable 'SECRET' is not set, sessions will not survive a restart."
        );
    }

    let connection =
        Connection::open(&args.db_path).expect("Could not open the application database.");
    initialize_db(&connection).expect("Could not initialize the application database.");

    let user_store = SQLiteUserStore::new(Arc::new(Mutex::new(connection)));
    let state = AppState::new(secret.as_deref(), user_store, args.assets_dir);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http().make_span_with(|req: &Request| {
        let method = req.method();
        let uri = req.uri();

        let matched_path = req
            .extensions()
            .get::<MatchedPath>()
            .map(|matched_path| matched_path.as_str());

        // Request bodies are not logged: log-in and register forms carry
        // plaintext passwords.
        tracing::debug_span!("request", %method, %uri, matched_path)
    });

    router.layer(tracing_layer)
}
