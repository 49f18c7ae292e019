//! # Server Utilities
//!
//! File: cli/src/server/utils.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! Helpers used by the hosting backends that are not request handling:
//! - Shutdown signal futures (Ctrl+C, SIGTERM)
//! - Port probing with fallback to the next free port
//! - Local network IP detection for the startup banner
//!
use crate::core::error::Result;
use std::net::{IpAddr, SocketAddr, UdpSocket};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Resolves when Ctrl+C is received.
///
/// If the handler cannot be installed the future never resolves, leaving the
/// process to be stopped some other way.
pub async fn ctrl_c_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
        Err(e) => {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// # Handle Shutdown Signal (`shutdown_signal`)
///
/// Resolves on Ctrl+C or, on Unix, SIGTERM. Passed to
/// `axum::serve(..).with_graceful_shutdown` so in-flight requests finish
/// before the process exits.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c_signal() => {},
        _ = terminate => {},
    }
}

/// # Find Available Port (`find_available_port`)
///
/// Tries `start_port`, then the following ports, up to `max_attempts` in
/// total, and returns the first one that binds. The probe listener is
/// returned so the port cannot be taken between probing and serving.
///
/// ## Errors
///
/// Fails when none of the tried ports is free.
pub async fn find_available_port(
    host: IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<TcpListener> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(host, current_port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, bound to available port {}.",
                        start_port, current_port
                    );
                }
                return Ok(listener);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}). Trying next port...",
                    attempt + 1,
                    current_port,
                    host,
                    e
                );
                current_port = match current_port.checked_add(1) {
                    Some(port) => port,
                    None => break,
                };
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        host,
        start_port,
        max_attempts
    )
}

/// # Get Local IP Address (`get_local_ip`)
///
/// Returns the address of the interface the OS would route external traffic
/// through, or `"localhost"` when there is none. Connecting a UDP socket
/// only selects a route; no packet is sent.
pub fn get_local_ip() -> String {
    let detected = UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("8.8.8.8:80")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip());

    match detected {
        Ok(ip) if !ip.is_loopback() && !ip.is_unspecified() => ip.to_string(),
        Ok(_) => "localhost".to_string(),
        Err(e) => {
            warn!("Could not detect local network IP ({}), using 'localhost'", e);
            "localhost".to_string()
        }
    }
}
