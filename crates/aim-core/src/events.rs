//! Target-selected event and the observer list that fans it out.
//!
//! Handlers run synchronously, in registration order, on the tick that
//! commits the selection. The list can be changed from inside a handler:
//! while a dispatch is running, subscribe/unsubscribe calls are queued and
//! applied once every handler has seen the event.

use crate::registry::ControllerId;
use glam::Vec3;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Published when a controller commits its crosshair as the new target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSelected {
    pub controller: ControllerId,
    pub position: Vec3,
    /// 1 for the first commit of a controller, then increasing by one.
    pub sequence: u64,
}

pub type TargetHandler = Box<dyn FnMut(&TargetSelected)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

enum Pending {
    Add(SubscriptionId, TargetHandler),
    Remove(SubscriptionId),
}

#[derive(Default)]
struct ObserverList {
    handlers: SmallVec<[(SubscriptionId, TargetHandler); 4]>,
    pending: Vec<Pending>,
    dispatching: bool,
    in_flight: SmallVec<[SubscriptionId; 4]>,
    next_id: u64,
}

impl ObserverList {
    fn is_live(&self, id: SubscriptionId) -> bool {
        let registered = if self.dispatching {
            self.in_flight.contains(&id)
        } else {
            self.handlers.iter().any(|(h, _)| *h == id)
        };
        let mut live = registered;
        for op in &self.pending {
            match op {
                Pending::Add(p, _) if *p == id => live = true,
                Pending::Remove(p) if *p == id => live = false,
                _ => {}
            }
        }
        live
    }

    fn apply_pending(&mut self) {
        for op in std::mem::take(&mut self.pending) {
            match op {
                Pending::Add(id, handler) => self.handlers.push((id, handler)),
                Pending::Remove(id) => self.handlers.retain(|(h, _)| *h != id),
            }
        }
    }
}

/// Shared, clonable handle to a controller's subscriber list.
#[derive(Clone, Default)]
pub struct TargetObservers {
    inner: Rc<RefCell<ObserverList>>,
}

impl TargetObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&TargetSelected) + 'static,
    {
        let mut list = self.inner.borrow_mut();
        list.next_id += 1;
        let id = SubscriptionId(list.next_id);
        let handler: TargetHandler = Box::new(handler);
        if list.dispatching {
            list.pending.push(Pending::Add(id, handler));
        } else {
            list.handlers.push((id, handler));
        }
        id
    }

    /// Remove a handler. Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut list = self.inner.borrow_mut();
        if !list.is_live(id) {
            return false;
        }
        if list.dispatching {
            list.pending.push(Pending::Remove(id));
        } else {
            list.handlers.retain(|(h, _)| *h != id);
        }
        true
    }

    /// Number of live subscriptions, counting queued changes.
    pub fn len(&self) -> usize {
        let list = self.inner.borrow();
        let mut n = if list.dispatching {
            list.in_flight.len()
        } else {
            list.handlers.len()
        };
        for op in &list.pending {
            match op {
                Pending::Add(..) => n += 1,
                Pending::Remove(_) => n = n.saturating_sub(1),
            }
        }
        n
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every handler, including queued ones.
    pub fn clear(&self) {
        let mut list = self.inner.borrow_mut();
        if list.dispatching {
            let ids: SmallVec<[SubscriptionId; 4]> = list.in_flight.clone();
            list.pending.clear();
            list.pending.extend(ids.into_iter().map(Pending::Remove));
        } else {
            list.handlers.clear();
            list.pending.clear();
        }
    }

    /// Invoke every handler with `event`; returns how many ran.
    pub(crate) fn dispatch(&self, event: &TargetSelected) -> usize {
        let mut handlers = {
            let mut list = self.inner.borrow_mut();
            debug_assert!(!list.dispatching, "nested target dispatch");
            list.dispatching = true;
            let ids: SmallVec<[SubscriptionId; 4]> =
                list.handlers.iter().map(|(id, _)| *id).collect();
            list.in_flight = ids;
            std::mem::take(&mut list.handlers)
        };

        for (_, handler) in handlers.iter_mut() {
            handler(event);
        }
        let invoked = handlers.len();

        let mut list = self.inner.borrow_mut();
        list.handlers = handlers;
        list.dispatching = false;
        list.in_flight.clear();
        list.apply_pending();
        invoked
    }
}

impl fmt::Debug for TargetObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetObservers")
            .field("subscribers", &self.len())
            .finish()
    }
}
