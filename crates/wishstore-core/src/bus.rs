// ── Scoped event bus ──
//
// Synchronous publish/subscribe keyed by `{app}:{event}` topics. After a
// successful save, dialogs publish the server-returned entity; detail views
// subscribe and rebind. Delivery follows registration order, and handlers
// run outside the registry lock so they may publish or subscribe in turn.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use indexmap::IndexMap;
use tracing::{debug, trace};
use wishstore_api::Entity;

type Handler = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// Application-wide event bus. Cheaply cloneable.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

struct BusInner {
    app_name: String,
    listeners: DashMap<String, IndexMap<u64, Handler>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(BusInner {
                app_name: app_name.into(),
                listeners: DashMap::new(),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.inner.app_name
    }

    /// Topic carrying update events for `T`, e.g. `storeApp:wishlistUpdate`.
    pub fn topic<T: Entity>(&self) -> String {
        format!("{}:{}", self.inner.app_name, T::UPDATE_EVENT)
    }

    /// Register `handler` for update events of `T`.
    ///
    /// The listener stays registered for as long as the returned
    /// [`Subscription`] lives.
    pub fn subscribe<T, F>(&self, handler: F) -> Subscription
    where
        T: Entity,
        F: Fn(&T) + Send + Sync + 'static,
    {
        let topic = self.topic::<T>();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let erased: Handler = Arc::new(move |payload: &dyn Any| {
            if let Some(entity) = payload.downcast_ref::<T>() {
                handler(entity);
            }
        });

        self.inner
            .listeners
            .entry(topic.clone())
            .or_default()
            .insert(id, erased);
        trace!(topic, id, "subscribed");

        Subscription {
            bus: Arc::downgrade(&self.inner),
            topic,
            id,
        }
    }

    /// Deliver `payload` to every listener of `T`'s update topic.
    /// Returns the number of listeners invoked.
    pub fn publish<T: Entity>(&self, payload: &T) -> usize {
        let topic = self.topic::<T>();
        let handlers: Vec<Handler> = self
            .inner
            .listeners
            .get(&topic)
            .map(|set| set.values().cloned().collect())
            .unwrap_or_default();

        debug!(topic, listeners = handlers.len(), "broadcast");
        for handler in &handlers {
            handler(payload);
        }
        handlers.len()
    }

    /// Number of live listeners on `topic`.
    pub fn listener_count(&self, topic: &str) -> usize {
        self.inner.listeners.get(topic).map_or(0, |set| set.len())
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("app_name", &self.inner.app_name)
            .field("topics", &self.inner.listeners.len())
            .finish_non_exhaustive()
    }
}

// ── Subscription ─────────────────────────────────────────────────────

/// Handle to one registered listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    bus: Weak<BusInner>,
    topic: String,
    id: u64,
}

impl Subscription {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Unsubscribe now. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.bus.upgrade() else {
            return;
        };
        if let Some(mut set) = inner.listeners.get_mut(&self.topic) {
            set.shift_remove(&self.id);
        }
        inner
            .listeners
            .remove_if(&self.topic, |_, set| set.is_empty());
        trace!(topic = %self.topic, id = self.id, "unsubscribed");
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("id", &self.id)
            .finish()
    }
}

// ── ViewScope ────────────────────────────────────────────────────────

/// Owns the subscriptions of one view. Destroying the scope (explicitly
/// or by dropping it) removes every listener it registered.
#[derive(Debug, Default)]
pub struct ViewScope {
    subscriptions: Vec<Subscription>,
    destroyed: bool,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&mut self, subscription: Subscription) {
        if self.destroyed {
            return;
        }
        self.subscriptions.push(subscription);
    }

    pub fn destroy(&mut self) {
        self.subscriptions.clear();
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use wishstore_api::{Wish, Wishlist};

    use super::*;

    fn named(name: &str) -> Wishlist {
        let mut wl = Wishlist::blank();
        wl.name = Some(name.into());
        wl
    }

    #[test]
    fn topic_is_app_scoped() {
        let bus = EventBus::new("storeApp");
        assert_eq!(bus.topic::<Wishlist>(), "storeApp:wishlistUpdate");
        assert_eq!(bus.topic::<Wish>(), "storeApp:wishUpdate");
    }

    #[test]
    fn delivery_follows_registration_order() {
        let bus = EventBus::new("storeApp");
        let seen = Arc::new(Mutex::new(Vec::new()));

        let subs: Vec<_> = (0..3)
            .map(|i| {
                let seen = seen.clone();
                bus.subscribe::<Wishlist, _>(move |_| seen.lock().unwrap().push(i))
            })
            .collect();

        assert_eq!(bus.publish(&named("Books")), 3);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
        drop(subs);
    }

    #[test]
    fn dropping_a_handle_removes_only_that_listener() {
        let bus = EventBus::new("storeApp");
        let topic = bus.topic::<Wishlist>();
        let a = bus.subscribe::<Wishlist, _>(|_| {});
        let b = bus.subscribe::<Wishlist, _>(|_| {});
        assert_eq!(bus.listener_count(&topic), 2);

        drop(a);
        assert_eq!(bus.listener_count(&topic), 1);

        b.unsubscribe();
        assert_eq!(bus.listener_count(&topic), 0);
    }

    #[test]
    fn topics_are_independent() {
        let bus = EventBus::new("storeApp");
        let hits = Arc::new(Mutex::new(0));
        let h = hits.clone();
        let _sub = bus.subscribe::<Wish, _>(move |_| *h.lock().unwrap() += 1);

        assert_eq!(bus.publish(&named("Books")), 0);
        assert_eq!(*hits.lock().unwrap(), 0);
    }

    #[test]
    fn handler_may_subscribe_while_delivering() {
        let bus = EventBus::new("storeApp");
        let late = Arc::new(Mutex::new(Vec::new()));
        let bus2 = bus.clone();
        let late2 = late.clone();
        let _sub = bus.subscribe::<Wishlist, _>(move |_| {
            late2.lock().unwrap().push(bus2.subscribe::<Wish, _>(|_| {}));
        });

        bus.publish(&named("Books"));
        assert_eq!(bus.listener_count("storeApp:wishUpdate"), 1);
    }

    #[test]
    fn destroyed_scope_releases_everything() {
        let bus = EventBus::new("storeApp");
        let mut scope = ViewScope::new();
        scope.hold(bus.subscribe::<Wishlist, _>(|_| {}));
        scope.hold(bus.subscribe::<Wish, _>(|_| {}));
        assert_eq!(scope.len(), 2);

        scope.destroy();
        assert!(scope.is_destroyed());
        assert_eq!(bus.listener_count("storeApp:wishlistUpdate"), 0);
        assert_eq!(bus.listener_count("storeApp:wishUpdate"), 0);
    }
}
