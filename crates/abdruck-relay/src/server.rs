// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Relay HTTP server lifecycle.
//
// The server binds a TCP listener, serves the proxy router from a spawned
// task, and shuts down gracefully on signal.  It is stateless across
// requests: each relay call owns its own outbound connection and there is
// no cache and no cross-request coordination.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use abdruck_core::error::{AbdruckError, Result};
use abdruck_core::types::ServerStatus;

use crate::proxy::{ProxyState, router};

/// Default port for the relay server.
const DEFAULT_PORT: u16 = 3002;

/// Embedded relay HTTP server.
pub struct RelayServer {
    /// The address to bind.  Port 0 requests an ephemeral port.
    bind_addr: SocketAddr,
    /// Current lifecycle state of the server.
    status: ServerStatus,
    /// Notification handle used to signal a graceful shutdown.
    shutdown_signal: Arc<Notify>,
    /// Handle to the Tokio task running the server.
    task_handle: Option<JoinHandle<()>>,
    /// The actually bound address once running.
    local_addr: Option<SocketAddr>,
}

impl RelayServer {
    /// Create a new server bound to `0.0.0.0` on the given port.
    ///
    /// The server is created in `Stopped` state.  Call [`RelayServer::start`]
    /// to begin accepting connections.
    pub fn new(port: Option<u16>) -> Self {
        Self::with_bind_addr(([0, 0, 0, 0], port.unwrap_or(DEFAULT_PORT)).into())
    }

    /// Create a new server for an explicit bind address.
    pub fn with_bind_addr(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            status: ServerStatus::Stopped,
            shutdown_signal: Arc::new(Notify::new()),
            task_handle: None,
            local_addr: None,
        }
    }

    /// Return the current server status.
    pub fn status(&self) -> ServerStatus {
        self.status
    }

    /// Return the bound address, once the server is running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Start the relay server.
    ///
    /// Binds the listener and spawns a Tokio task serving the proxy router.
    /// Returns the bound address (useful with port 0).
    ///
    /// # Errors
    ///
    /// Returns an error if the port is already in use or the listener cannot
    /// be created.
    pub async fn start(&mut self, state: ProxyState) -> Result<SocketAddr> {
        if self.status == ServerStatus::Running {
            debug!(addr = ?self.local_addr, "relay server already running");
            return self
                .local_addr
                .ok_or_else(|| AbdruckError::RelayServer("running without an address".into()));
        }

        self.status = ServerStatus::Starting;

        let listener = TcpListener::bind(self.bind_addr).await.map_err(|e| {
            self.status = ServerStatus::Error;
            AbdruckError::RelayServer(format!("bind {}: {e}", self.bind_addr))
        })?;
        let addr = listener
            .local_addr()
            .map_err(|e| AbdruckError::RelayServer(format!("local_addr: {e}")))?;

        info!(addr = %addr, "relay server listening");

        let app = router(state);
        let shutdown = Arc::clone(&self.shutdown_signal);

        let handle = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                shutdown.notified().await;
            });
            if let Err(e) = serve.await {
                error!(error = %e, "relay server exited with error");
            }
        });

        self.task_handle = Some(handle);
        self.local_addr = Some(addr);
        self.status = ServerStatus::Running;
        Ok(addr)
    }

    /// Gracefully stop the server.
    ///
    /// Signals the serve task to exit and awaits its completion.  Requests
    /// that are mid-stream are allowed to finish.
    pub async fn stop(&mut self) -> Result<()> {
        if self.status != ServerStatus::Running {
            return Ok(());
        }

        info!(addr = ?self.local_addr, "stopping relay server");

        self.shutdown_signal.notify_one();

        if let Some(handle) = self.task_handle.take() {
            handle
                .await
                .map_err(|e| AbdruckError::RelayServer(format!("task join: {e}")))?;
        }

        self.status = ServerStatus::Stopped;
        self.local_addr = None;
        info!("relay server stopped");
        Ok(())
    }
}
