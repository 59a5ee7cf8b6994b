//! Notification failures.

use crate::cell::subscription::SubscriptionId;

/// Error type a fallible subscriber may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A single subscriber callback failed while receiving a value.
#[derive(Debug, thiserror::Error)]
#[error("subscriber {id} failed: {source}")]
pub struct SubscriberFailure {
    /// Subscription whose callback failed.
    pub id: SubscriptionId,
    #[source]
    pub source: BoxError,
}

/// Returned by `set` when one or more subscribers failed.
///
/// The write itself is always committed; this only reports delivery
/// failures collected after every subscriber has been attempted.
#[derive(Debug, thiserror::Error)]
#[error("{} of {attempted} subscriber deliveries failed", .failures.len())]
pub struct NotifyError {
    /// Number of callback invocations attempted during the write.
    pub attempted: usize,
    /// Failures in delivery order.
    pub failures: Vec<SubscriberFailure>,
}

impl NotifyError {
    /// Ids of the subscriptions that failed, in delivery order.
    pub fn failed_ids(&self) -> Vec<SubscriptionId> {
        self.failures.iter().map(|f| f.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_error_display() {
        let err = NotifyError {
            attempted: 3,
            failures: vec![SubscriberFailure {
                id: SubscriptionId(7),
                source: "boom".into(),
            }],
        };
        assert_eq!(err.to_string(), "1 of 3 subscriber deliveries failed");
        assert_eq!(err.failed_ids(), vec![SubscriptionId(7)]);
        assert_eq!(err.failures[0].to_string(), "subscriber #7 failed: boom");
    }
}
