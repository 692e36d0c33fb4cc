//! Configuration for Gazette
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use uuid::Uuid;

/// Gazette - daily recap fragment service for the Gigachad leaderboard
#[derive(Parser, Debug, Clone)]
#[command(name = "gazette")]
#[command(about = "Serves rendered daily-recap fragments for the Gigachad leaderboard")]
pub struct Args {
    /// Unique node identifier for this gazette instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Base URL for the static JSON snapshots (ranking, activities, invitations, roster)
    #[arg(
        long,
        env = "SNAPSHOT_BASE_URL",
        default_value = "https://raw.githubusercontent.com/guezito-dev/Ethos/main"
    )]
    pub snapshot_base_url: String,

    /// Base URL for the profile directory REST API
    #[arg(long, env = "API_BASE_URL", default_value = "https://api.ethos.network")]
    pub api_base_url: String,

    /// Fragment cache time-to-live in seconds
    #[arg(long, env = "CACHE_TTL_SECS", default_value = "300")]
    pub cache_ttl_secs: u64,

    /// Interval between cache sweeps in seconds
    #[arg(long, env = "CACHE_SWEEP_SECS", default_value = "60")]
    pub cache_sweep_secs: u64,

    /// Number of concurrent per-profile activity fetches per batch
    #[arg(long, env = "ACTIVITY_BATCH_SIZE", default_value = "5")]
    pub activity_batch_size: usize,

    /// Fixed delay between activity fetch batches in milliseconds
    #[arg(long, env = "ACTIVITY_BATCH_DELAY_MS", default_value = "1000")]
    pub activity_batch_delay_ms: u64,

    /// Maximum number of records pulled per activity feed
    #[arg(long, env = "MAX_ITEMS", default_value = "20")]
    pub max_items: usize,

    /// Number of rows rendered per recap section
    #[arg(long, env = "SECTION_ITEMS", default_value = "5")]
    pub section_items: usize,

    /// Outbound request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Fragment cache TTL as a Duration
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Cache sweep interval as a Duration
    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_secs)
    }

    /// Delay between activity fetch batches as a Duration
    pub fn activity_batch_delay(&self) -> Duration {
        Duration::from_millis(self.activity_batch_delay_ms)
    }

    /// Outbound request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.snapshot_base_url.is_empty() {
            return Err("SNAPSHOT_BASE_URL must not be empty".to_string());
        }

        if self.api_base_url.is_empty() {
            return Err("API_BASE_URL must not be empty".to_string());
        }

        if self.cache_ttl_secs == 0 {
            return Err("CACHE_TTL_SECS must be greater than zero".to_string());
        }

        if self.activity_batch_size == 0 {
            return Err("ACTIVITY_BATCH_SIZE must be greater than zero".to_string());
        }

        if self.section_items == 0 {
            return Err("SECTION_ITEMS must be greater than zero".to_string());
        }

        Ok(())
    }
}
