//! Vigia Console - camera resource and live telemetry core.
//!
//! This is the backend core of the admin console for a residential
//! access-control system. It arbitrates exclusive use of the single physical
//! camera between the live recognition view and the local recording view,
//! drives the video-recording session state machine, and maintains a
//! self-healing subscription to the recognition service's live event channel.
//!
//! The UI shell, CRUD tables and report exports live elsewhere and talk to
//! this core through the controllers in [`controllers`].

pub mod arbiter;
pub mod capture;
pub mod controllers;
pub mod events;
pub mod remote;
pub mod utils;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging for the host application.
///
/// Call once at startup, before constructing any controller.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vigia_console=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Vigia Console core v{}", env!("CARGO_PKG_VERSION"));
}
