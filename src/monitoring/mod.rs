//! Operational monitoring
//!
//! This module provides dependency health aggregation, error classification
//! and recovery, and request metrics, all wired together by
//! [`MonitoringSystem`].

pub mod errors;
pub mod events;
pub mod health;
pub mod requests;
pub mod sink;

mod system;

pub use events::{EventBus, MonitoringEvent};
pub use system::MonitoringSystem;

/// Status bucket label such as `4xx` or `5xx`
pub fn status_bucket(status_code: u16) -> String {
    format!("{}xx", status_code / 100)
}

/// Human readable payload of a caught panic
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bucket() {
        assert_eq!(status_bucket(200), "2xx");
        assert_eq!(status_bucket(404), "4xx");
        assert_eq!(status_bucket(503), "5xx");
    }

    #[test]
    fn test_panic_message() {
        let payload = std::panic::catch_unwind(|| panic!("probe exploded")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "probe exploded");
    }
}
