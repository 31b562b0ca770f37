use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{LaunchProfile, Settings};
use crate::domain::errors::ServerError;
use crate::domain::ports::DatabaseLifecycle;
use crate::frameworks::db::MongoDatabase;
use crate::interface_adapters::routes;
use crate::interface_adapters::state::AppState;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Primary entry point: bind address from settings, reload tied to debug.
pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = Settings::from_env();
    let profile = LaunchProfile::from_settings(&settings);
    serve(settings, profile).await;
}

// Alternate entry point: the launcher supplies a fixed profile.
pub async fn run_with_profile(profile: LaunchProfile) {
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = Settings::from_env();
    serve(settings, profile).await;
}

async fn serve(settings: Settings, profile: LaunchProfile) {
    tracing::info!(
        app_name = %settings.app_name,
        version = %settings.version,
        environment = %profile.environment,
        reload = profile.reload,
        "starting"
    );

    let addr = match profile.socket_addr() {
        Ok(addr) => addr,
        Err(err) => {
            tracing::error!(host = %profile.host, ?err, "invalid bind host");
            return; // Abort startup on an unusable profile.
        }
    };

    let mut db = match MongoDatabase::open(&settings.database_url, &settings.database_name).await
    {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(error = %err, "failed to open document store handle");
            return;
        }
    };

    let state = AppState {
        db: db.handle(),
        settings: Arc::new(settings),
    };
    let app = routes::app(state);

    // Bind TCP listener with error handling.
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%addr, error = %err, "failed to bind");
            return;
        }
    };

    if let Err(err) = serve_until(&mut db, listener, app, shutdown_signal()).await {
        match err {
            ServerError::DatabaseConnect(detail) => {
                tracing::error!(%detail, "failed to connect to document store");
            }
            ServerError::Serve(err) => tracing::error!(error = %err, "server error"),
        }
    }
}

// Scoped resource acquisition around the serve loop: connect once before the
// listener reports ready, close once after the loop ends. Close runs even
// when the serve step fails partway; a failed connect is fail-fast and skips
// close because nothing was opened.
pub async fn serve_until<D, F>(
    db: &mut D,
    listener: TcpListener,
    app: Router,
    shutdown: F,
) -> Result<(), ServerError>
where
    D: DatabaseLifecycle,
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("connecting to document store...");
    db.connect().await.map_err(ServerError::DatabaseConnect)?;
    tracing::info!("document store connected");

    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "listening");
    }

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    tracing::info!("closing document store connection...");
    match db.close().await {
        Ok(()) => tracing::info!("document store connection closed"),
        Err(err) => tracing::warn!(%err, "failed to close document store cleanly"),
    }

    served.map_err(ServerError::Serve)
}

// Resolves when the process is asked to stop (ctrl-c or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(?err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(?err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::routing::get;

    // Recording lifecycle fake so tests can count the two transitions.
    struct RecordingDatabase {
        connect_calls: usize,
        close_calls: usize,
        fail_connect: bool,
    }

    impl RecordingDatabase {
        fn new() -> Self {
            RecordingDatabase {
                connect_calls: 0,
                close_calls: 0,
                fail_connect: false,
            }
        }
    }

    #[async_trait]
    impl DatabaseLifecycle for RecordingDatabase {
        async fn connect(&mut self) -> Result<(), String> {
            self.connect_calls += 1;
            if self.fail_connect {
                return Err("connect refused".to_string());
            }
            Ok(())
        }

        async fn close(&mut self) -> Result<(), String> {
            self.close_calls += 1;
            Ok(())
        }
    }

    fn test_app() -> Router {
        Router::new().route("/", get(|| async { "ok" }))
    }

    async fn ephemeral_listener() -> TcpListener {
        TcpListener::bind("127.0.0.1:0")
            .await
            .expect("expected ephemeral listener to bind")
    }

    #[tokio::test]
    async fn when_the_server_runs_to_shutdown_then_connect_and_close_each_happen_once() {
        let mut db = RecordingDatabase::new();
        let listener = ephemeral_listener().await;

        // Immediately-ready shutdown future: the serve loop drains and exits.
        serve_until(&mut db, listener, test_app(), async {})
            .await
            .expect("expected clean shutdown");

        assert_eq!(db.connect_calls, 1);
        assert_eq!(db.close_calls, 1);
    }

    #[tokio::test]
    async fn when_connect_fails_then_startup_is_fail_fast_and_close_is_skipped() {
        let mut db = RecordingDatabase::new();
        db.fail_connect = true;
        let listener = ephemeral_listener().await;

        let result = serve_until(&mut db, listener, test_app(), async {}).await;

        match result {
            Err(ServerError::DatabaseConnect(detail)) => {
                assert_eq!(detail, "connect refused");
            }
            other => panic!("expected connect failure, got {other:?}"),
        }
        assert_eq!(db.connect_calls, 1);
        assert_eq!(db.close_calls, 0);
    }

    #[tokio::test]
    async fn when_the_server_is_shut_down_by_a_signal_then_requests_served_before_it_succeed() {
        let listener = ephemeral_listener().await;
        let addr = listener.local_addr().expect("expected local addr");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let shutdown = async move {
            let _ = shutdown_rx.await;
        };

        let server = tokio::spawn(async move {
            let mut db = RecordingDatabase::new();
            let result = serve_until(&mut db, listener, test_app(), shutdown).await;
            (result.is_ok(), db.connect_calls, db.close_calls)
        });

        // Drive one request through the running server, then signal stop.
        let mut stream = tokio::net::TcpStream::connect(addr)
            .await
            .expect("expected connection to the test server");
        tokio::io::AsyncWriteExt::write_all(
            &mut stream,
            b"GET / HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n",
        )
        .await
        .expect("expected request write");
        let mut response = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut stream, &mut response)
            .await
            .expect("expected response read");
        assert!(response.starts_with(b"HTTP/1.1 200"));

        shutdown_tx.send(()).expect("expected shutdown signal to send");

        let (clean, connects, closes) = server.await.expect("expected server task to join");
        assert!(clean);
        assert_eq!(connects, 1);
        assert_eq!(closes, 1);
    }
}
