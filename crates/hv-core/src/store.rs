//! State store with serialized dispatch

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::action::ActionType;
use crate::reducer::Reducer;

/// Trait for components that need to respond to state changes
pub trait StoreSubscriber<S>: Send + Sync {
    /// Called after a transition has been applied
    fn on_state_change(&self, action_type: &'static str, state: &S);
}

/// Holds the current snapshot of a reducer's state
///
/// Dispatches are serialized: at most one transition is in flight at a time,
/// and readers only ever see complete snapshots.
pub struct Store<R: Reducer> {
    reducer: R,
    state: Arc<RwLock<R::State>>,
    dispatch_lock: Mutex<()>,
    subscribers: Arc<RwLock<Vec<Weak<dyn StoreSubscriber<R::State>>>>>,
}

impl<R: Reducer> Store<R> {
    /// Create a new store
    pub fn new(reducer: R, initial: R::State) -> Self {
        Self {
            reducer,
            state: Arc::new(RwLock::new(initial)),
            dispatch_lock: Mutex::new(()),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Get a snapshot of the current state
    pub fn state(&self) -> R::State {
        self.state.read().clone()
    }

    /// The reducer driving this store
    pub fn reducer(&self) -> &R {
        &self.reducer
    }

    /// Apply an action to the current state
    ///
    /// On error the stored state is left untouched and no subscriber is
    /// notified.
    pub fn dispatch(&self, action: R::Action) -> Result<(), R::Error> {
        let guard = self.dispatch_lock.lock();
        let action_type = action.action_type();

        let current = self.state.read().clone();
        let next = match self.reducer.reduce(&current, action) {
            Ok(next) => next,
            Err(err) => {
                warn!(action = action_type, error = %err, "Rejected transition");
                return Err(err);
            }
        };

        *self.state.write() = next.clone();
        drop(guard);

        debug!(action = action_type, "Applied transition");
        self.notify_subscribers(action_type, &next);
        Ok(())
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn StoreSubscriber<R::State>>) {
        let mut subscribers = self.subscribers.write();
        subscribers.push(Arc::downgrade(&subscriber));
    }

    fn notify_subscribers(&self, action_type: &'static str, state: &R::State) {
        let live: Vec<_> = {
            let mut subscribers = self.subscribers.write();

            // Remove any dead weak references
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for subscriber in live {
            subscriber.on_state_change(action_type, state);
        }
    }
}
