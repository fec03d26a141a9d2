//! Agora Host - wiring for running a governor inside a host process.
//!
//! The host loads a TOML configuration, initializes logging and builds a
//! `Governor` backed by the wall clock that logs its events.

pub mod config;
pub mod telemetry;

use agora_governance::{Governor, SystemClock, TracingSink};
use tracing::info;

pub use config::{HostConfig, LoggingConfig};

/// Governor type used by hosts.
pub type HostGovernor = Governor<SystemClock, TracingSink>;

/// Build a governor from a validated host configuration.
pub fn build_governor(config: &HostConfig) -> anyhow::Result<HostGovernor> {
    config.validate()?;
    let governor = Governor::from_config(&config.governance, SystemClock, TracingSink)?;
    info!(name = %config.name, admin = %governor.admin(), "governor ready");
    Ok(governor)
}
