//! Shared helpers for the dungeon server test clients
//!
//! - Minimal `--flag value` argument parsing
//! - Latency recording with percentile summaries

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_URL: &str = "http://localhost:8000";

pub fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

pub fn parse_num_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    parse_str_arg(args, flag).and_then(|v| v.parse().ok())
}

// ============================================================================
// Per-endpoint statistics
// ============================================================================

pub struct EndpointStats {
    pub name: String,
    latencies_us: Mutex<Vec<u64>>,
    success: AtomicU64,
    errors: AtomicU64,
}

impl EndpointStats {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            latencies_us: Mutex::new(Vec::with_capacity(10_000)),
            success: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    pub fn record(&self, duration_us: u64, ok: bool) {
        self.latencies_us.lock().push(duration_us);
        if ok {
            self.success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn success(&self) -> u64 {
        self.success.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    pub fn count(&self) -> u64 {
        self.success() + self.errors()
    }

    /// Latency percentile in milliseconds
    pub fn percentile(&self, p: f64) -> f64 {
        let mut lat = self.latencies_us.lock().clone();
        if lat.is_empty() {
            return 0.0;
        }
        lat.sort_unstable();
        let idx = ((p / 100.0) * lat.len() as f64) as usize;
        let idx = idx.min(lat.len() - 1);
        lat[idx] as f64 / 1000.0
    }
}
