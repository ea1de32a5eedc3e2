use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Shared<T> {
    state: watch::Sender<T>,
    subscribers: RwLock<Vec<(u64, Subscriber<T>)>>,
    next_id: AtomicU64,
    // Held across mutate + notify so every subscriber sees changes in order.
    write: Mutex<()>,
}

trait Unsubscribe: Send + Sync {
    fn unsubscribe(&self, id: u64);
}

impl<T: Send + Sync> Unsubscribe for Shared<T> {
    fn unsubscribe(&self, id: u64) {
        self.subscribers.write().retain(|(sub_id, _)| *sub_id != id);
    }
}

/// A thread-safe observable store holding an immutable snapshot.
///
/// Every change replaces the snapshot and is pushed to subscribers. Changes
/// that leave the value equal to the previous one are not emitted.
///
/// Subscriber callbacks run on the mutating thread while the store's write
/// lock is held, so a callback must not update or subscribe to the same
/// store.
pub struct Store<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Store<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a new store with the given initial state.
    pub fn new(initial: T) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            shared: Arc::new(Shared {
                state,
                subscribers: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(0),
                write: Mutex::new(()),
            }),
        }
    }

    /// Get a clone of the current state.
    pub fn get(&self) -> T {
        self.shared.state.borrow().clone()
    }

    /// Read state without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let state = self.shared.state.borrow();
        f(&state)
    }

    /// Update the state using a function.
    ///
    /// Returns whether the state changed (and subscribers were notified).
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let _write = self.shared.write.lock();
        let changed = self.shared.state.send_if_modified(|state| {
            let before = state.clone();
            f(state);
            *state != before
        });
        if changed {
            self.notify();
        }
        changed
    }

    /// Replace the state wholesale.
    pub fn set(&self, new_state: T) -> bool {
        self.update(move |state| *state = new_state)
    }

    /// Subscribe to state changes.
    ///
    /// The callback receives the current snapshot immediately, then every
    /// subsequent change in order. It stays registered until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let _write = self.shared.write.lock();
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: Subscriber<T> = Arc::new(callback);

        callback(&self.get());
        self.shared.subscribers.write().push((id, callback));

        let shared: Weak<dyn Unsubscribe> = Arc::downgrade(&self.shared) as Weak<Shared<T>>;
        Subscription { id, shared }
    }

    /// Latest-value receiver for async consumers.
    ///
    /// The receiver always observes the newest snapshot; intermediate values
    /// may be skipped if the consumer falls behind.
    pub fn watch(&self) -> watch::Receiver<T> {
        self.shared.state.subscribe()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.read().len()
    }

    fn notify(&self) {
        let state = self.get();
        let subscribers: Vec<Subscriber<T>> = self
            .shared
            .subscribers
            .read()
            .iter()
            .map(|(_, sub)| Arc::clone(sub))
            .collect();
        for subscriber in subscribers {
            subscriber(&state);
        }
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// RAII guard for a store subscriber. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    shared: Weak<dyn Unsubscribe>,
}

impl Subscription {
    /// Unsubscribe now rather than at end of scope.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.unsubscribe(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Clone, Debug, PartialEq)]
    struct AppState {
        count: i64,
        name: String,
    }

    fn app_store() -> Store<AppState> {
        Store::new(AppState {
            count: 0,
            name: "test".to_string(),
        })
    }

    #[test]
    fn store_get_set() {
        let store = app_store();
        assert_eq!(store.get().count, 0);

        store.set(AppState {
            count: 42,
            name: "updated".to_string(),
        });

        assert_eq!(store.get().count, 42);
        assert_eq!(store.get().name, "updated");
    }

    #[test]
    fn store_update() {
        let store = app_store();
        assert!(store.update(|state| state.count += 10));
        assert_eq!(store.read(|state| state.count), 10);
    }

    #[test]
    fn subscriber_gets_current_value_first() {
        let store = app_store();
        store.update(|state| state.count = 7);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let _sub = store.subscribe(move |state| seen_clone.lock().push(state.count));

        store.update(|state| state.count += 1);
        store.update(|state| state.count += 1);

        assert_eq!(*seen.lock(), vec![7, 8, 9]);
    }

    #[test]
    fn equal_updates_are_not_emitted() {
        let store = app_store();
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();
        let _sub = store.subscribe(move |_state| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(call_count.load(Ordering::SeqCst), 1);

        assert!(!store.update(|state| state.count = 0));
        assert_eq!(call_count.load(Ordering::SeqCst), 1);

        assert!(store.update(|state| state.count = 1));
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let store = app_store();
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();
        let sub = store.subscribe(move |_state| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(store.subscriber_count(), 1);

        drop(sub);
        assert_eq!(store.subscriber_count(), 0);

        store.update(|state| state.count += 1);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscription_outliving_store_is_harmless() {
        let store = app_store();
        let sub = store.subscribe(|_| {});
        drop(store);
        sub.unsubscribe();
    }

    #[test]
    fn watch_sees_latest_value() {
        let store = app_store();
        let mut rx = store.watch();
        assert!(!rx.has_changed().unwrap());

        store.update(|state| state.count = 1);
        store.update(|state| state.count = 2);

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().count, 2);

        let late = store.watch();
        assert_eq!(late.borrow().count, 2);
    }
}
