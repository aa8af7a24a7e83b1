//! Preview server.
//!
//! Serves the serving root over plain HTTP while the actor system keeps
//! `index.html` current.
//!
//! ```text
//! bind() ──> PreviewServer ──run(coordinator)──> request loop (rayon pool)
//!                                  └──────────> actor thread (tokio)
//! ```

mod banner;
mod lifecycle;
mod path;
mod response;

pub use banner::{open_browser, print_banner};
pub use path::resolve_path;

use crate::{actor::Coordinator, core::register_server, log};
use anyhow::{Context, Result};
use crossbeam::channel;
use std::{
    error::Error as StdError,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};
use thiserror::Error;
use tiny_http::{Request, Server};

/// Worker threads answering HTTP requests.
const REQUEST_THREADS: usize = 4;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("cannot bind preview server on {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: Box<dyn StdError + Send + Sync + 'static>,
    },
}

/// What a request handler needs to know.
#[derive(Debug, Clone)]
pub struct ServeContext {
    pub serve_root: PathBuf,
    pub ws_port: u16,
}

/// Bound server ready to accept requests.
pub struct PreviewServer {
    server: Arc<Server>,
    addr: SocketAddr,
    context: Arc<ServeContext>,
}

/// Bind the HTTP server. A taken port is an error; no other port is tried.
pub fn bind(interface: IpAddr, port: u16, context: ServeContext) -> Result<PreviewServer, ServeError> {
    let requested = SocketAddr::new(interface, port);
    let server = Server::http(requested).map_err(|source| ServeError::Bind {
        addr: requested,
        source,
    })?;
    let addr = server
        .server_addr()
        .to_ip()
        .unwrap_or(requested);

    Ok(PreviewServer {
        server: Arc::new(server),
        addr,
        context: Arc::new(context),
    })
}

impl PreviewServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Browser-facing URL; wildcard interfaces are shown as loopback.
    pub fn url(&self) -> String {
        let host = if self.addr.ip().is_unspecified() {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.addr.ip()
        };
        format!("http://{}", SocketAddr::new(host, self.addr.port()))
    }

    /// Run the actor system and serve requests until Ctrl+C (blocking).
    pub fn run(self, coordinator: Coordinator) -> Result<()> {
        let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
        register_server(Arc::clone(&self.server), shutdown_tx);

        let actors = lifecycle::spawn_actors(coordinator.with_shutdown_signal(shutdown_rx));
        let served = run_request_loop(&self.server, &self.context);
        lifecycle::wait_for_shutdown(actors);
        served
    }
}

fn run_request_loop(server: &Server, context: &Arc<ServeContext>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("cannot create request pool")?;

    for request in server.incoming_requests() {
        let context = Arc::clone(context);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &context) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

fn handle_request(request: Request, context: &ServeContext) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }
    if !response::is_allowed_method(&request) {
        return response::respond_method_not_allowed(request);
    }

    match resolve_path(request.url(), &context.serve_root) {
        Some(path) => response::respond_file(request, &path, context.ws_port),
        None => response::respond_not_found(request),
    }
}
