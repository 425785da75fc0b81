use crate::model::DiskUsage;
use std::fmt::Display;
use std::time::{Duration, Instant};
use tracing::error;

/// Value reported when a cached reading was never obtained.
pub trait Unavailable {
    fn unavailable() -> Self;
}

impl Unavailable for String {
    fn unavailable() -> Self {
        "N/A".to_string()
    }
}

impl Unavailable for DiskUsage {
    fn unavailable() -> Self {
        DiskUsage::default()
    }
}

/// Memoizes an expensive reading for `ttl`.
///
/// A failed refresh keeps the previous value and leaves the refresh time untouched, so the
/// next call retries.
#[derive(Debug)]
pub struct TtlCache<T> {
    name: &'static str,
    ttl: Duration,
    value: Option<T>,
    last_refresh: Option<Instant>,
}

impl<T: Clone + Unavailable> TtlCache<T> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            value: None,
            last_refresh: None,
        }
    }

    pub fn get_or_refresh<E, F>(&mut self, fetch: F) -> T
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        self.get_or_refresh_at(Instant::now(), fetch)
    }

    pub fn get_or_refresh_at<E, F>(&mut self, now: Instant, fetch: F) -> T
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        if let (Some(value), false) = (&self.value, self.is_stale(now)) {
            return value.clone();
        }

        match fetch() {
            Ok(value) => {
                self.value = Some(value.clone());
                self.last_refresh = Some(now);
                value
            }
            Err(e) => {
                error!("Error fetching {}: {e}", self.name);
                self.value.clone().unwrap_or_else(T::unavailable)
            }
        }
    }

    fn is_stale(&self, now: Instant) -> bool {
        match self.last_refresh {
            None => true,
            Some(t) => now.saturating_duration_since(t) > self.ttl,
        }
    }
}
