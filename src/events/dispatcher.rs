//! Thread-safe activation fan-out.
//!
//! The dispatcher delivers every [`ActivationEvent`] to every registered
//! subscriber. Subscribers run on whatever thread raised the activation;
//! for the real hooks that is the OS dispatch path, so subscribers must be
//! quick and hand anything slow off to their own execution context.
//!
//! A subscriber that panics is isolated: the panic is caught, logged, and
//! the remaining subscribers are still notified.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;

use tracing::error;

use super::types::ActivationEvent;

type Subscriber = Box<dyn Fn(ActivationEvent) + Send + Sync>;

/// Subscriber registry for activation events.
///
/// Multiple subscribers can be registered; each notification reaches all
/// of them. The registry is internally synchronized, so subscribing and
/// notifying are safe from any thread.
///
/// # Example
///
/// ```
/// use corolla::events::{ActivationDispatcher, ActivationEvent};
///
/// let dispatcher = ActivationDispatcher::new();
/// dispatcher.subscribe(|event| println!("activated at {},{}", event.x, event.y));
///
/// dispatcher.notify(ActivationEvent { x: 10, y: 20 });
/// ```
pub struct ActivationDispatcher {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl ActivationDispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Register a subscriber. Subscribers cannot be removed; they live as
    /// long as the dispatcher.
    pub fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(ActivationEvent) + Send + Sync + 'static,
    {
        let mut subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        subscribers.push(Box::new(subscriber));
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        match self.subscribers.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Returns true if no subscriber is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to every subscriber.
    ///
    /// A panicking subscriber is caught and logged; delivery continues
    /// with the next one. Returns the number of subscribers that completed
    /// without panicking.
    pub fn notify(&self, event: ActivationEvent) -> usize {
        let subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut delivered = 0;
        for subscriber in subscribers.iter() {
            match catch_unwind(AssertUnwindSafe(|| subscriber(event))) {
                Ok(()) => delivered += 1,
                Err(_) => error!(x = event.x, y = event.y, "activation subscriber panicked"),
            }
        }
        delivered
    }
}

impl Default for ActivationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_new_dispatcher_is_empty() {
        let dispatcher = ActivationDispatcher::new();
        assert!(dispatcher.is_empty());
        assert_eq!(dispatcher.len(), 0);
    }

    #[test]
    fn test_notify_reaches_single_subscriber() {
        let dispatcher = ActivationDispatcher::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let seen_clone = Arc::clone(&seen);
        dispatcher.subscribe(move |event| {
            assert_eq!(event.x, 400);
            assert_eq!(event.y, 300);
            seen_clone.fetch_add(1, Ordering::SeqCst);
        });

        let delivered = dispatcher.notify(ActivationEvent { x: 400, y: 300 });
        assert_eq!(delivered, 1);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_notify_reaches_all_subscribers() {
        let dispatcher = ActivationDispatcher::new();
        let seen = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let seen_clone = Arc::clone(&seen);
            dispatcher.subscribe(move |_| {
                seen_clone.fetch_add(1, Ordering::SeqCst);
            });
        }

        let delivered = dispatcher.notify(ActivationEvent { x: 0, y: 0 });
        assert_eq!(delivered, 3);
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_each_notification_is_delivered_separately() {
        let dispatcher = ActivationDispatcher::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let seen_clone = Arc::clone(&seen);
        dispatcher.subscribe(move |_| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        });

        dispatcher.notify(ActivationEvent { x: 1, y: 1 });
        dispatcher.notify(ActivationEvent { x: 2, y: 2 });

        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_panicking_subscriber_does_not_block_others() {
        let dispatcher = ActivationDispatcher::new();
        let seen = Arc::new(AtomicUsize::new(0));

        dispatcher.subscribe(|_| panic!("subscriber failure"));

        let seen_clone = Arc::clone(&seen);
        dispatcher.subscribe(move |_| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        });

        let delivered = dispatcher.notify(ActivationEvent { x: 5, y: 5 });
        assert_eq!(delivered, 1);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatcher_survives_panicking_subscriber() {
        let dispatcher = ActivationDispatcher::new();
        dispatcher.subscribe(|_| panic!("subscriber failure"));

        dispatcher.notify(ActivationEvent { x: 1, y: 2 });

        // Registry is intact and still accepts notifications.
        assert_eq!(dispatcher.len(), 1);
        dispatcher.notify(ActivationEvent { x: 3, y: 4 });
    }

    #[test]
    fn test_notify_with_no_subscribers_is_a_noop() {
        let dispatcher = ActivationDispatcher::new();
        assert_eq!(dispatcher.notify(ActivationEvent { x: 0, y: 0 }), 0);
    }

    #[test]
    fn test_default_creates_empty_dispatcher() {
        let dispatcher = ActivationDispatcher::default();
        assert!(dispatcher.is_empty());
    }
}
