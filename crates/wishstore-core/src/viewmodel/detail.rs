// Detail view: one pre-resolved entity plus the state to return to.
//
// The view rebinds whenever its entity's update event is broadcast. The
// subscription belongs to the view's scope and goes away with it.

use std::sync::Arc;

use tokio::sync::watch;
use wishstore_api::Entity;

use crate::bus::{EventBus, ViewScope};
use crate::navigator::PreviousState;

pub struct DetailViewModel<T: Entity> {
    current: Arc<watch::Sender<T>>,
    previous_state: PreviousState,
    scope: ViewScope,
}

impl<T: Entity> DetailViewModel<T> {
    pub fn new(entity: T, previous_state: PreviousState, bus: &EventBus) -> Self {
        let current = Arc::new(watch::Sender::new(entity));
        let mut scope = ViewScope::new();

        let target = Arc::clone(&current);
        scope.hold(bus.subscribe::<T, _>(move |updated| {
            target.send_replace(updated.clone());
        }));

        Self {
            current,
            previous_state,
            scope,
        }
    }

    /// Snapshot of the bound entity.
    pub fn current(&self) -> T {
        self.current.borrow().clone()
    }

    /// Receiver notified on every rebind.
    pub fn watch(&self) -> watch::Receiver<T> {
        self.current.subscribe()
    }

    pub fn previous_state(&self) -> &PreviousState {
        &self.previous_state
    }

    /// Tear down the view's scope, releasing its event subscription.
    pub fn destroy(&mut self) {
        self.scope.destroy();
    }

    pub fn is_destroyed(&self) -> bool {
        self.scope.is_destroyed()
    }
}

impl<T: Entity> std::fmt::Debug for DetailViewModel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailViewModel")
            .field("current", &*self.current.borrow())
            .field("previous_state", &self.previous_state)
            .field("scope", &self.scope)
            .finish()
    }
}
