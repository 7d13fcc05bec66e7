//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo; one task per connection.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::db::{DocumentStore, SqliteStore};
use crate::logging::ActivityLogger;
use crate::routes::{self, response};
use crate::types::Result;

/// Shared application state
pub struct AppState {
    /// Relational item store
    pub sqlite: SqliteStore,
    /// Document store holding items and the activity log
    pub documents: Arc<dyn DocumentStore>,
    /// Activity logger writing into `documents`
    pub activity: ActivityLogger,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(sqlite: SqliteStore, documents: Arc<dyn DocumentStore>) -> Self {
        let activity = ActivityLogger::new(Arc::clone(&documents));
        Self {
            sqlite,
            documents,
            activity,
            started_at: Instant::now(),
        }
    }
}

/// Bind `addr` and serve until Ctrl-C
pub async fn run(addr: SocketAddr, state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;

    info!("itemway listening on {}", listener.local_addr()?);

    serve(listener, state, shutdown_signal()).await
}

/// How long open connections get to finish after shutdown is requested
const CONNECTION_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Serve connections from `listener` until `shutdown` resolves
///
/// On shutdown the accept loop stops, idle keep-alive connections are
/// closed and in-flight requests get `CONNECTION_DRAIN_TIMEOUT` to finish
/// before their connections are aborted.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let (close_tx, close_rx) = watch::channel(());
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    let state = Arc::clone(&state);
                    let mut close_rx = close_rx.clone();
                    connections.spawn(async move {
                        let io = TokioIo::new(stream);

                        let service = service_fn(move |req| {
                            let state = Arc::clone(&state);
                            async move { handle_request(state, addr, req).await }
                        });

                        let conn = http1::Builder::new().serve_connection(io, service);
                        tokio::pin!(conn);

                        let mut closing = false;
                        loop {
                            tokio::select! {
                                result = conn.as_mut() => {
                                    if let Err(err) = result {
                                        warn!("Error serving connection from {}: {:?}", addr, err);
                                    }
                                    break;
                                }
                                _ = close_rx.changed(), if !closing => {
                                    closing = true;
                                    conn.as_mut().graceful_shutdown();
                                }
                            }
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {:?}", e);
                }
            },
            Some(joined) = connections.join_next(), if !connections.is_empty() => {
                if let Err(e) = joined {
                    error!("Connection task failed: {}", e);
                }
            }
            _ = &mut shutdown => {
                info!(
                    open_connections = connections.len(),
                    "Shutdown signal received, no longer accepting connections"
                );
                break;
            }
        }
    }

    let _ = close_tx.send(());

    let drained = tokio::time::timeout(CONNECTION_DRAIN_TIMEOUT, async {
        while connections.join_next().await.is_some() {}
    })
    .await;

    if drained.is_err() {
        warn!(
            remaining = connections.len(),
            "Connections still open after {:?}, aborting",
            CONNECTION_DRAIN_TIMEOUT
        );
        connections.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    let result = match (method, path.as_str()) {
        // CORS preflight
        (Method::OPTIONS, _) => Ok(response::preflight()),

        (Method::GET, "/health") => Ok(routes::health_check(&state).await),

        // Relational store
        (Method::POST, "/sqlite/items") => routes::sqlite::create_item(&state, req).await,
        (Method::GET, "/sqlite/items") => routes::sqlite::list_items(&state).await,

        // Document store
        (Method::POST, "/mongo/items") => routes::mongo::create_item(&state, req).await,
        (Method::GET, "/mongo/items") => routes::mongo::list_items(&state).await,
        (m, p) if p.starts_with("/mongo/items/") => match p.strip_prefix("/mongo/items/") {
            Some(id) if !id.is_empty() && m == Method::GET => {
                routes::mongo::get_item(&state, id).await
            }
            Some(id) if !id.is_empty() => Ok(response::method_not_allowed()),
            _ => Ok(response::not_found_path(&path)),
        },

        // Activity log
        (Method::GET, "/logs") => routes::list_logs(&state).await,

        (_, "/sqlite/items") | (_, "/mongo/items") | (_, "/logs") | (_, "/health") => {
            Ok(response::method_not_allowed())
        }

        _ => Ok(response::not_found_path(&path)),
    };

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            if e.status_code().is_server_error() {
                error!(path = %path, error = %e, "Request failed");
            } else {
                warn!(path = %path, error = %e, "Request rejected");
            }
            response::error_response(&e)
        }
    };

    Ok(response::with_cors(response))
}
