//! Sliding-window admission control for anonymous callers
//!
//! Single-process, best-effort throttle. The shared timestamp map is guarded
//! by a mutex held only for the prune+check+record sequence, so no request
//! ever waits behind another caller's upstream latency.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(60);
const MAX_REQUESTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    Allowed,
    Rejected,
}

/// Per-identity request throttle for unauthenticated callers
pub struct AdmissionController {
    enabled: bool,
    history: Mutex<HashMap<String, Vec<Instant>>>,
}

impl AdmissionController {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            history: Mutex::new(HashMap::new()),
        }
    }

    /// Decide whether an anonymous caller may proceed
    pub fn admit(&self, client: &str) -> AdmissionDecision {
        self.admit_at(client, Instant::now())
    }

    fn admit_at(&self, client: &str, now: Instant) -> AdmissionDecision {
        if !self.enabled {
            return AdmissionDecision::Allowed;
        }

        // A poisoned lock only means another thread panicked mid-update;
        // the timestamp data is still usable.
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);

        // Sweep the whole map, dropping addresses whose window emptied, so
        // one-off callers do not accumulate for the life of the process.
        history.retain(|_, timestamps| {
            timestamps.retain(|t| now.duration_since(*t) < WINDOW);
            !timestamps.is_empty()
        });

        let entries = history.entry(client.to_string()).or_default();

        if entries.len() >= MAX_REQUESTS {
            return AdmissionDecision::Rejected;
        }

        entries.push(now);
        AdmissionDecision::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixth_request_in_window_is_rejected() {
        let controller = AdmissionController::new(true);
        let now = Instant::now();

        for _ in 0..5 {
            assert_eq!(
                controller.admit_at("10.0.0.1", now),
                AdmissionDecision::Allowed
            );
        }
        assert_eq!(
            controller.admit_at("10.0.0.1", now),
            AdmissionDecision::Rejected
        );
    }

    #[test]
    fn window_expiry_frees_capacity() {
        let controller = AdmissionController::new(true);
        let start = Instant::now();

        for _ in 0..5 {
            controller.admit_at("10.0.0.1", start);
        }
        assert_eq!(
            controller.admit_at("10.0.0.1", start),
            AdmissionDecision::Rejected
        );

        let later = start + Duration::from_secs(61);
        assert_eq!(
            controller.admit_at("10.0.0.1", later),
            AdmissionDecision::Allowed
        );
    }

    #[test]
    fn clients_are_throttled_independently() {
        let controller = AdmissionController::new(true);
        let now = Instant::now();

        for _ in 0..5 {
            controller.admit_at("10.0.0.1", now);
        }
        assert_eq!(
            controller.admit_at("10.0.0.1", now),
            AdmissionDecision::Rejected
        );
        assert_eq!(
            controller.admit_at("10.0.0.2", now),
            AdmissionDecision::Allowed
        );
    }

    #[test]
    fn idle_clients_are_evicted_from_the_map() {
        let controller = AdmissionController::new(true);
        let start = Instant::now();

        controller.admit_at("10.0.0.1", start);
        controller.admit_at("10.0.0.2", start);

        let later = start + Duration::from_secs(61);
        controller.admit_at("10.0.0.3", later);

        let history = controller.history.lock().unwrap();
        assert!(!history.contains_key("10.0.0.1"));
        assert!(!history.contains_key("10.0.0.2"));
        assert!(history.contains_key("10.0.0.3"));
    }

    #[test]
    fn disabled_controller_admits_everything() {
        let controller = AdmissionController::new(false);
        let now = Instant::now();

        for _ in 0..20 {
            assert_eq!(
                controller.admit_at("10.0.0.1", now),
                AdmissionDecision::Allowed
            );
        }
    }
}
