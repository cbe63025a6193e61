use crate::domain::event::OrderEvent;
use crate::domain::ports::{ObserverError, ObserverRef, OrderObserver};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Proof of a subscription; spend it on `unsubscribe`.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping the handle makes the subscription permanent"]
pub struct SubscriptionHandle {
    id: u64,
}

/// What one `publish` call actually did, per observer.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub delivered: usize,
    /// Observer name paired with the error it signalled.
    pub failures: Vec<(String, ObserverError)>,
}

impl DeliveryReport {
    pub fn all_delivered(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One-to-many fan-out of order events to registered observers.
///
/// Fan-out is registration order. Callbacks run synchronously on the
/// publishing task. A failing observer never blocks delivery to the ones
/// registered after it; the bus records the failure and moves on.
///
/// `publish` iterates a snapshot taken under a read lock: an unsubscribe
/// racing an in-flight publish does not take effect for that publish
/// (last-one-wins snapshot semantics).
#[derive(Default)]
pub struct NotificationBus {
    observers: RwLock<Vec<(u64, ObserverRef)>>,
    next_id: AtomicU64,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, observer: ObserverRef) -> SubscriptionHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.observers.write().await.push((id, observer));
        SubscriptionHandle { id }
    }

    /// Removes the subscription; false when the handle was already spent.
    pub async fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut observers = self.observers.write().await;
        let before = observers.len();
        observers.retain(|(id, _)| *id != handle.id);
        observers.len() < before
    }

    pub async fn publish(&self, event: &OrderEvent) -> DeliveryReport {
        let snapshot: Vec<ObserverRef> = {
            let observers = self.observers.read().await;
            observers.iter().map(|(_, obs)| obs.clone()).collect()
        };

        let mut report = DeliveryReport::default();
        for observer in snapshot {
            match observer.on_event(event) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    tracing::warn!(
                        observer = observer.name(),
                        order_id = %event.order_id,
                        error = %err,
                        "observer failed, continuing fan-out"
                    );
                    report.failures.push((observer.name().to_string(), err));
                }
            }
        }
        report
    }

    pub async fn observer_count(&self) -> usize {
        self.observers.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::EventKind;
    use crate::domain::order::OrderId;
    use crate::domain::ports::OrderObserver;
    use std::sync::Arc;
    use std::sync::Mutex;

    struct Recording {
        name: String,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl OrderObserver for Recording {
        fn name(&self) -> &str {
            &self.name
        }

        fn on_event(&self, _event: &OrderEvent) -> Result<(), ObserverError> {
            self.seen.lock().unwrap().push(self.name.clone());
            Ok(())
        }
    }

    struct Failing;

    impl OrderObserver for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn on_event(&self, _event: &OrderEvent) -> Result<(), ObserverError> {
            Err(ObserverError("boom".to_string()))
        }
    }

    fn event() -> OrderEvent {
        OrderEvent::now(OrderId::new(), EventKind::Created)
    }

    #[tokio::test]
    async fn test_fan_out_in_registration_order() {
        let bus = NotificationBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for name in ["first", "second", "third"] {
            let _ = bus
                .subscribe(Arc::new(Recording {
                    name: name.to_string(),
                    seen: seen.clone(),
                }))
                .await;
        }

        let report = bus.publish(&event()).await;
        assert_eq!(report.delivered, 3);
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_fan_out() {
        let bus = NotificationBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _ = bus
            .subscribe(Arc::new(Recording {
                name: "before".to_string(),
                seen: seen.clone(),
            }))
            .await;
        let _ = bus.subscribe(Arc::new(Failing)).await;
        let _ = bus
            .subscribe(Arc::new(Recording {
                name: "after".to_string(),
                seen: seen.clone(),
            }))
            .await;

        let report = bus.publish(&event()).await;
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "failing");
        // The observer registered after the failing one still ran.
        assert_eq!(*seen.lock().unwrap(), vec!["before", "after"]);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_future_events() {
        let bus = NotificationBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handle = bus
            .subscribe(Arc::new(Recording {
                name: "target".to_string(),
                seen: seen.clone(),
            }))
            .await;

        bus.publish(&event()).await;
        assert!(bus.unsubscribe(handle).await);
        bus.publish(&event()).await;

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(bus.observer_count().await, 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_unknown_handle_is_false() {
        let bus = NotificationBus::new();
        let handle = bus.subscribe(Arc::new(Failing)).await;
        assert!(bus.unsubscribe(handle).await);

        let spent = SubscriptionHandle { id: 0 };
        assert!(!bus.unsubscribe(spent).await);
    }
}
