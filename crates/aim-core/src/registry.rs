//! Registry of active targeting controllers.
//!
//! Controllers register on activation and are addressed by [`ControllerId`].
//! Registration is held by a [`Registration`] guard owned by the controller, so
//! deactivating or dropping a controller always removes it. One controller may
//! hold the primary slot, which is what code without a specific id asks for.

use crate::controller::{ControllerState, TargetState};
use crate::events::TargetObservers;
use crate::follower::{Tracked, TrackedPoint};
use fnv::FnvHashMap;
use glam::Vec3;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(u32);

impl ControllerId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "controller#{}", self.0)
    }
}

/// Read-only view of a controller, plus access to its subscriber list.
///
/// Reads return `None` once the controller has been deactivated or dropped.
#[derive(Clone)]
pub struct ControllerHandle {
    id: ControllerId,
    state: Weak<RefCell<ControllerState>>,
    observers: TargetObservers,
}

impl ControllerHandle {
    pub(crate) fn new(
        id: ControllerId,
        state: &Rc<RefCell<ControllerState>>,
        observers: TargetObservers,
    ) -> Self {
        Self {
            id,
            state: Rc::downgrade(state),
            observers,
        }
    }

    /// Handle that never resolves; used once the controller has been
    /// deactivated.
    pub(crate) fn detached(id: ControllerId, observers: TargetObservers) -> Self {
        Self {
            id,
            state: Weak::new(),
            observers,
        }
    }

    pub fn id(&self) -> ControllerId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.state.strong_count() > 0
    }

    pub fn crosshair_position(&self) -> Option<Vec3> {
        self.read(|s| s.crosshair)
    }

    pub fn target(&self) -> Option<TargetState> {
        self.read(|s| s.target)
    }

    pub fn zoom(&self) -> Option<f32> {
        self.read(|s| s.zoom)
    }

    pub fn observers(&self) -> &TargetObservers {
        &self.observers
    }

    pub fn track(&self, point: TrackedPoint) -> Tracked {
        Tracked::new(self.clone(), point)
    }

    fn read<T>(&self, f: impl FnOnce(&ControllerState) -> T) -> Option<T> {
        let state = self.state.upgrade()?;
        let guard = state.try_borrow().ok()?;
        Some(f(&guard))
    }
}

impl fmt::Debug for ControllerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

struct Slot {
    generation: u64,
    handle: ControllerHandle,
}

#[derive(Default)]
struct RegistryInner {
    slots: FnvHashMap<ControllerId, Slot>,
    primary: Option<(ControllerId, u64)>,
    next_generation: u64,
}

impl RegistryInner {
    fn release(&mut self, id: ControllerId, generation: u64) -> bool {
        let owned = self
            .slots
            .get(&id)
            .is_some_and(|slot| slot.generation == generation);
        if owned {
            self.slots.remove(&id);
        }
        if self.primary == Some((id, generation)) {
            self.primary = None;
        }
        owned
    }
}

/// Shared registry for one scene or session. Cloning shares the same table.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `handle` under its id. A second live registration for the same
    /// id, or a second primary claim, is reported and then replaces the old one.
    pub(crate) fn register(&self, handle: ControllerHandle, claim_primary: bool) -> Registration {
        let mut inner = self.inner.borrow_mut();
        inner.next_generation += 1;
        let generation = inner.next_generation;
        let id = handle.id();

        if inner.slots.contains_key(&id) {
            log::warn!(
                "[registry] {} is already registered; the new instance replaces it",
                id
            );
        }
        inner.slots.insert(id, Slot { generation, handle });

        if claim_primary {
            if let Some((current, _)) = inner.primary {
                log::warn!(
                    "[registry] more than one primary targeting controller ({} replaces {})",
                    id,
                    current
                );
            }
            inner.primary = Some((id, generation));
        }

        Registration {
            registry: Rc::downgrade(&self.inner),
            id,
            generation,
        }
    }

    pub fn get(&self, id: ControllerId) -> Option<ControllerHandle> {
        self.inner
            .borrow()
            .slots
            .get(&id)
            .map(|slot| slot.handle.clone())
    }

    /// The controller currently holding the primary slot, if any.
    pub fn primary(&self) -> Option<ControllerHandle> {
        let inner = self.inner.borrow();
        let (id, generation) = inner.primary?;
        inner
            .slots
            .get(&id)
            .filter(|slot| slot.generation == generation)
            .map(|slot| slot.handle.clone())
    }

    pub fn contains(&self, id: ControllerId) -> bool {
        self.inner.borrow().slots.contains_key(&id)
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<ControllerId> {
        let mut ids: Vec<_> = self.inner.borrow().slots.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().slots.is_empty()
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("ids", &self.ids())
            .field("primary", &self.primary().map(|h| h.id()))
            .finish()
    }
}

/// Scoped registration; dropping it removes the entry it created.
///
/// An entry that was replaced by a later registration of the same id is left
/// alone.
#[derive(Debug)]
pub struct Registration {
    registry: Weak<RefCell<RegistryInner>>,
    id: ControllerId,
    generation: u64,
}

impl Registration {
    pub fn id(&self) -> ControllerId {
        self.id
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        // Bound first so the borrow ends before `registry` is dropped
        let released = registry
            .try_borrow_mut()
            .map(|mut inner| inner.release(self.id, self.generation));
        match released {
            Ok(true) => {}
            Ok(false) => log::debug!(
                "[registry] {} was replaced before release; leaving newer entry",
                self.id
            ),
            Err(_) => log::error!(
                "[registry] registry busy while releasing {}; entry left behind",
                self.id
            ),
        }
    }
}
