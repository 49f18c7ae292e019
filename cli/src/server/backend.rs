//! # Hosting Backends
//!
//! File: cli/src/server/backend.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! The same router can be hosted three ways, selected with `--server`:
//!
//! | Backend      | Runtime                     | Bind                         | Shutdown          |
//! |--------------|-----------------------------|------------------------------|-------------------|
//! | `dev`        | current-thread              | next free port on conflict   | Ctrl+C / SIGTERM  |
//! | `production` | multi-thread, `workers` set | strict                       | Ctrl+C / SIGTERM  |
//! | `compat`     | multi-thread, default size  | blocking `std::net` bind     | Ctrl+C            |
//!
//! Each backend owns its Tokio runtime, which is why the binary's `main` is
//! synchronous. Request handling lives entirely in the router; backends only
//! decide how sockets are bound and when to stop.
//!
use super::utils::{ctrl_c_signal, find_available_port, get_local_ip, shutdown_signal};
use crate::core::config::ServerSettings;
use crate::core::error::{ChatbotError, Result};
use anyhow::{anyhow, Context};
use axum::Router;
use serde::Deserialize;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::runtime::{Builder, Runtime};
use tracing::{info, warn};

/// Ports tried by the development backend before giving up.
const DEV_PORT_ATTEMPTS: u8 = 10;

/// Which hosting backend to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    /// Single-threaded, port fallback. Local use only.
    Dev,
    /// Multi-threaded with a configurable worker pool.
    #[default]
    Production,
    /// Multi-threaded with a plain blocking bind.
    Compat,
}

impl ServerKind {
    pub fn name(self) -> &'static str {
        match self {
            ServerKind::Dev => "dev",
            ServerKind::Production => "production",
            ServerKind::Compat => "compat",
        }
    }
}

/// # Hosting Strategy (`Backend`)
///
/// Runs `app` until a shutdown signal arrives. Blocks the calling thread.
pub trait Backend {
    fn kind(&self) -> ServerKind;

    fn run(&self, app: Router, settings: &ServerSettings) -> Result<()>;
}

/// Returns the backend implementation for `kind`.
pub fn backend_for(kind: ServerKind) -> Box<dyn Backend> {
    match kind {
        ServerKind::Dev => Box::new(DevBackend),
        ServerKind::Production => Box::new(ProductionBackend),
        ServerKind::Compat => Box::new(CompatBackend),
    }
}

pub struct DevBackend;

impl Backend for DevBackend {
    fn kind(&self) -> ServerKind {
        ServerKind::Dev
    }

    /// Serves on a current-thread runtime, moving to the next free port when
    /// the configured one is taken.
    ///
    /// ## Arguments
    ///
    /// * `app` - The fully built router.
    /// * `settings` - Host, port and the (ignored) worker count.
    ///
    /// ## Returns
    ///
    /// * `Result<()>` - `Ok(())` after a clean shutdown. An error when the
    ///   runtime cannot start or no port in the attempt window is free.
    fn run(&self, app: Router, settings: &ServerSettings) -> Result<()> {
        warn!("The dev server is single-threaded and not meant for production use.");
        if settings.workers.is_some() {
            warn!("--workers is ignored by the dev server.");
        }

        // 1. One thread is enough for local use.
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| runtime_error(self.kind(), e))?;

        // 2. Bind (with fallback) and serve inside the runtime.
        runtime.block_on(async {
            let listener =
                find_available_port(settings.host, settings.port, DEV_PORT_ATTEMPTS).await?;
            serve_until(listener, app, self.kind(), shutdown_signal()).await
        })
    }
}

pub struct ProductionBackend;

impl Backend for ProductionBackend {
    fn kind(&self) -> ServerKind {
        ServerKind::Production
    }

    /// Serves on a multi-thread runtime sized by `settings.workers`. The
    /// configured port must be free; there is no fallback.
    ///
    /// ## Returns
    ///
    /// * `Result<()>` - `Ok(())` after Ctrl+C or SIGTERM, or the bind error.
    fn run(&self, app: Router, settings: &ServerSettings) -> Result<()> {
        let runtime = multi_thread_runtime(self.kind(), settings.workers)?;
        let addr = SocketAddr::new(settings.host, settings.port);

        runtime.block_on(async {
            // A busy port is a startup failure here.
            let listener = TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;
            serve_until(listener, app, self.kind(), shutdown_signal()).await
        })
    }
}

pub struct CompatBackend;

impl Backend for CompatBackend {
    fn kind(&self) -> ServerKind {
        ServerKind::Compat
    }

    fn run(&self, app: Router, settings: &ServerSettings) -> Result<()> {
        if settings.workers.is_some() {
            warn!("--workers is ignored by the compat server.");
        }
        let runtime = multi_thread_runtime(self.kind(), None)?;
        // Bind before entering the runtime so bind errors surface synchronously.
        let listener = bind_blocking(SocketAddr::new(settings.host, settings.port))?;

        runtime.block_on(async {
            // `from_std` must run inside a runtime context.
            let listener = TcpListener::from_std(listener)
                .context("Failed to register listener with the async runtime")?;
            serve_until(listener, app, self.kind(), ctrl_c_signal()).await
        })
    }
}

fn runtime_error(kind: ServerKind, e: std::io::Error) -> anyhow::Error {
    anyhow!(ChatbotError::Server(format!(
        "Failed to start the {} runtime: {}",
        kind.name(),
        e
    )))
}

/// Builds a multi-thread runtime with IO and timers enabled.
///
/// ## Arguments
///
/// * `kind` - Used only to name the backend in the error message.
/// * `workers` - Worker thread count. `None` keeps Tokio's default (one per core).
fn multi_thread_runtime(kind: ServerKind, workers: Option<usize>) -> Result<Runtime> {
    let mut builder = Builder::new_multi_thread();
    builder.enable_all();
    if let Some(workers) = workers {
        info!("Using {} worker threads", workers);
        builder.worker_threads(workers);
    }
    builder.build().map_err(|e| runtime_error(kind, e))
}

/// Binds with the standard library and switches the socket to non-blocking
/// mode, as `TcpListener::from_std` requires.
fn bind_blocking(addr: SocketAddr) -> Result<std::net::TcpListener> {
    let listener = std::net::TcpListener::bind(addr)
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;
    listener
        .set_nonblocking(true)
        .context("Failed to make listener non-blocking")?;
    Ok(listener)
}

/// # Serve Until Shutdown (`serve_until`)
///
/// Prints the startup banner, then serves `app` on `listener` until
/// `shutdown` resolves. Shared by every backend.
///
/// ## Arguments
///
/// * `listener` - An already bound listener. Its local address goes in the banner.
/// * `app` - The router to serve.
/// * `kind` - Backend name for the banner and logs.
/// * `shutdown` - Future that triggers graceful shutdown when it completes.
///
/// ## Returns
///
/// * `Result<()>` - `Ok(())` once in-flight requests have drained after shutdown.
pub async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    kind: ServerKind,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    // 1. Report the real address, which differs from the configured one for
    //    port 0 or after dev port fallback.
    let addr = listener
        .local_addr()
        .context("Failed to read the listener's local address")?;
    print_banner(addr, kind);
    info!("Starting {} server on {}", kind.name(), addr);

    // 2. Serve until the shutdown future resolves.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

fn print_banner(addr: SocketAddr, kind: ServerKind) {
    println!("\n=================================================================");
    println!("🎓 NSAKCET chatbot ({} server)", kind.name());
    println!("🌐 Local URL:         http://localhost:{}", addr.port());
    if addr.ip().is_unspecified() {
        let local_ip = get_local_ip();
        if local_ip != "localhost" {
            println!("🔗 Network URL:       http://{}:{}", local_ip, addr.port());
        }
    }
    println!("⚙️  Binding to address: {}", addr);
    println!("=================================================================\n");
    println!("Server starting! Press Ctrl+C to stop.");
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use std::net::{IpAddr, Ipv4Addr};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[test]
    fn test_backend_for_each_kind() {
        for kind in [ServerKind::Dev, ServerKind::Production, ServerKind::Compat] {
            assert_eq!(backend_for(kind).kind(), kind);
        }
    }

    #[test]
    fn test_default_kind_is_production() {
        assert_eq!(ServerKind::default(), ServerKind::Production);
        assert_eq!(ServerKind::default().name(), "production");
    }

    #[test]
    fn test_kind_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            backend: ServerKind,
        }
        let parsed: Wrapper = toml::from_str("backend = \"compat\"").unwrap();
        assert_eq!(parsed.backend, ServerKind::Compat);
    }

    #[test]
    fn test_multi_thread_runtime_with_workers() -> Result<()> {
        let runtime = multi_thread_runtime(ServerKind::Production, Some(2))?;
        let value = runtime.block_on(async { 21 * 2 });
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_bind_blocking_is_non_blocking() -> Result<()> {
        let listener = bind_blocking(SocketAddr::new(LOCALHOST, 0))?;
        // A non-blocking accept with no pending client returns WouldBlock.
        let err = listener.accept().unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::WouldBlock);
        Ok(())
    }

    #[test]
    fn test_bind_blocking_fails_on_busy_port() -> Result<()> {
        let occupied = std::net::TcpListener::bind(SocketAddr::new(LOCALHOST, 0))?;
        let result = bind_blocking(occupied.local_addr()?);
        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_serve_until_answers_then_stops() -> Result<()> {
        let app = Router::new().route("/", get(|| async { "ok" }));
        let listener = TcpListener::bind(SocketAddr::new(LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve_until(listener, app, ServerKind::Dev, async move {
            let _ = stop_rx.await;
        }));

        let mut stream = TcpStream::connect(addr).await?;
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await?;
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await?;
        assert!(raw.starts_with("HTTP/1.1 200"));
        assert!(raw.ends_with("ok"));

        let _ = stop_tx.send(());
        server.await??;
        Ok(())
    }
}
