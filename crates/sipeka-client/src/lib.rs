//! # sipeka-client
//!
//! Async client for the SiPeka letter-request service: account and profile
//! calls, dynamic form loading, submission, history, resubmission of
//! rejected requests, letter download and notifications. The `sipeka`
//! binary is a thin command-line front end over [`commands`].

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod state;

pub use api::{ApiClient, Auth};
pub use config::ClientConfig;
pub use error::{AuthFailure, ClientError, Result};
pub use state::AppState;

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Logs go to stderr so stdout stays
/// reserved for command output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sipeka_client=info,sipeka_store=info,warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
