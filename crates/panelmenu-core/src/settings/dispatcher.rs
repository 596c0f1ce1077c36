use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, trace};

use panelmenu_types::SettingValue;

use super::keys::{self, Route, UpdateOp};
use super::{SettingsStore, SubscriptionId};

/// A change notification that has been matched to its handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedChange {
    pub key: String,
    pub op: UpdateOp,
}

/// Receiver of routed updates
pub trait UpdateTarget {
    fn apply_update(&mut self, op: UpdateOp, store: &dyn SettingsStore);
}

type Inbox = Rc<RefCell<VecDeque<RoutedChange>>>;

/// Routes preference changes to surface updates through a flat table.
///
/// One subscription is registered per routed key. Store callbacks only
/// enqueue; [`SettingsDispatcher::pump`] delivers each notification to its
/// handler in arrival order. Nothing is coalesced: the same key changing
/// three times runs its handler three times.
///
/// A write to the store has no visible effect until the next pump. Owners
/// that expose the store for direct writes must pump before acting on
/// surface state.
pub struct SettingsDispatcher {
    routes: &'static [Route],
    inbox: Inbox,
    subscriptions: Vec<SubscriptionId>,
}

impl SettingsDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::with_routes(keys::ROUTES)
    }

    #[must_use]
    pub fn with_routes(routes: &'static [Route]) -> Self {
        Self {
            routes,
            inbox: Rc::new(RefCell::new(VecDeque::new())),
            subscriptions: Vec::new(),
        }
    }

    /// Subscribe to every routed key. Calling twice is a no-op.
    pub fn attach(&mut self, store: &mut dyn SettingsStore) {
        if !self.subscriptions.is_empty() {
            return;
        }
        for route in self.routes {
            let inbox = Rc::clone(&self.inbox);
            let op = route.op;
            let id = store.on_change(
                route.key,
                Box::new(move |key: &str, _: Option<&SettingValue>| {
                    trace!("Preference changed: {key} -> {op:?}");
                    inbox.borrow_mut().push_back(RoutedChange {
                        key: key.to_string(),
                        op,
                    });
                }),
            );
            self.subscriptions.push(id);
        }
        debug!("Settings dispatcher subscribed to {} keys", self.subscriptions.len());
    }

    /// Drop every subscription and any undelivered notifications.
    pub fn detach(&mut self, store: &mut dyn SettingsStore) {
        for id in self.subscriptions.drain(..) {
            store.unsubscribe(id);
        }
        self.inbox.borrow_mut().clear();
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    #[must_use]
    pub fn route(&self, key: &str) -> Option<UpdateOp> {
        self.routes.iter().find(|r| r.key == key).map(|r| r.op)
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.inbox.borrow().len()
    }

    /// Deliver every queued notification. Returns how many handlers ran.
    pub fn pump(&self, target: &mut dyn UpdateTarget, store: &dyn SettingsStore) -> usize {
        let mut delivered = 0;
        loop {
            let next = self.inbox.borrow_mut().pop_front();
            let Some(change) = next else {
                break;
            };
            debug!("Applying {:?} for '{}'", change.op, change.key);
            target.apply_update(change.op, store);
            delivered += 1;
        }
        delivered
    }

    /// Take queued notifications without delivering them.
    pub fn drain(&self) -> Vec<RoutedChange> {
        self.inbox.borrow_mut().drain(..).collect()
    }
}

impl Default for SettingsDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
