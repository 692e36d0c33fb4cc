//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::cache::{self, FragmentCache, FragmentCacheConfig};
use crate::config::Args;
use crate::recap::RecapService;
use crate::routes;
use crate::sources::{ProfileApiClient, ProfileApiConfig, SnapshotClient};
use crate::types::Result;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Rendered fragment cache, shared with the recap service
    pub cache: Arc<FragmentCache>,
    /// Fragment builder
    pub recap: RecapService,
    /// Startup instant, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Wire up clients, cache and service from parsed arguments.
    pub fn new(args: Args) -> Result<Self> {
        let cache = Arc::new(FragmentCache::new(FragmentCacheConfig {
            ttl: args.cache_ttl(),
            sweep_interval: args.cache_sweep_interval(),
        }));

        let snapshots = SnapshotClient::new(args.snapshot_base_url.clone(), args.request_timeout())?;
        let profiles = ProfileApiClient::new(ProfileApiConfig {
            base_url: args.api_base_url.clone(),
            timeout: args.request_timeout(),
            batch_size: args.activity_batch_size,
            batch_delay: args.activity_batch_delay(),
            max_items: args.max_items,
        })?;

        let recap = RecapService::new(snapshots, profiles, Arc::clone(&cache), args.section_items);

        Ok(Self {
            args,
            cache,
            recap,
            started_at: Instant::now(),
        })
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Gazette listening on {} as node {}",
        state.args.listen, state.args.node_id
    );

    // Startup sweep, then the periodic cleanup task
    let removed = state.cache.sweep();
    if removed > 0 {
        info!(removed, "startup sweep evicted expired fragments");
    }
    cache::spawn_sweep_task(Arc::clone(&state.cache));
    info!(
        "Fragment cache enabled (ttl {}s, sweep every {}s)",
        state.args.cache_ttl_secs, state.args.cache_sweep_secs
    );

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    info!("[{}] {} {}", addr, method, path);

    let response = match (method, path.as_str()) {
        // Liveness probe
        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            routes::health_check(Arc::clone(&state))
        }

        // Version info for deployment verification
        (Method::GET, "/version") => routes::version_info(),

        // All recap sections plus the date line
        (Method::GET, "/recap") => routes::handle_recap_index(Arc::clone(&state)).await,

        // One recap section fragment
        (Method::GET, p) if p.starts_with("/recap/") => {
            let section = &p["/recap/".len()..];
            routes::handle_recap_section(Arc::clone(&state), section).await
        }

        // Ranking table, sortable via ?sort=&dir=
        (Method::GET, "/table") => {
            routes::handle_table(Arc::clone(&state), query.as_deref()).await
        }

        // Name search over the ranking
        (Method::GET, "/table/search") => {
            routes::handle_search(Arc::clone(&state), query.as_deref()).await
        }

        // Missing-interaction list for one ranked user
        (Method::GET, p) if p.starts_with("/table/missing/") => {
            let rank = &p["/table/missing/".len()..];
            routes::handle_missing_reviews(Arc::clone(&state), rank).await
        }

        // Roster members without profile ids
        (Method::GET, "/roster/missing-ids") => {
            routes::handle_missing_ids(Arc::clone(&state)).await
        }

        // CORS preflight
        (Method::OPTIONS, _) => routes::preflight_response(),

        _ => routes::not_found_response(&path),
    };

    Ok(response)
}
