//! Per-tick ordering of controllers and their consumers.
//!
//! Items run in ascending [`Tick::priority`], ties in the order they were
//! added. Controllers use [`CONTROLLER_PRIORITY`] so anything reading their
//! crosshair, target or events in the same tick sees this tick's values.
//!
//! [`CONTROLLER_PRIORITY`]: crate::constants::CONTROLLER_PRIORITY

use crate::constants::DEFAULT_PRIORITY;
use crate::input::InputSnapshot;
use crate::registry::ControllerId;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Input and timing for one tick.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    index: u64,
    dt: Duration,
    shared: InputSnapshot,
    routed: SmallVec<[(ControllerId, InputSnapshot); 2]>,
}

impl Frame {
    pub fn new(index: u64, dt: Duration, shared: InputSnapshot) -> Self {
        Self {
            index,
            dt,
            shared,
            routed: SmallVec::new(),
        }
    }

    /// Give `id` its own snapshot instead of the shared one.
    pub fn route(mut self, id: ControllerId, input: InputSnapshot) -> Self {
        self.routed.retain(|(r, _)| *r != id);
        self.routed.push((id, input));
        self
    }

    pub fn input_for(&self, id: ControllerId) -> &InputSnapshot {
        self.routed
            .iter()
            .find(|(r, _)| *r == id)
            .map(|(_, input)| input)
            .unwrap_or(&self.shared)
    }

    pub fn shared_input(&self) -> &InputSnapshot {
        &self.shared
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn dt(&self) -> Duration {
        self.dt
    }
}

pub trait Tick {
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    fn tick(&mut self, frame: &Frame);
}

impl<T: Tick + ?Sized> Tick for Box<T> {
    fn priority(&self) -> i32 {
        (**self).priority()
    }

    fn tick(&mut self, frame: &Frame) {
        (**self).tick(frame)
    }
}

/// Lets a host keep its own handle to a scheduled item.
impl<T: Tick + ?Sized> Tick for Rc<RefCell<T>> {
    fn priority(&self) -> i32 {
        self.borrow().priority()
    }

    fn tick(&mut self, frame: &Frame) {
        self.borrow_mut().tick(frame)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SystemId(u64);

struct Entry {
    id: SystemId,
    priority: i32,
    item: Box<dyn Tick>,
}

#[derive(Default)]
pub struct FrameSchedule {
    entries: Vec<Entry>,
    next_id: u64,
}

impl FrameSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<T: Tick + 'static>(&mut self, item: T) -> SystemId {
        let priority = item.priority();
        self.add_with_priority(priority, item)
    }

    pub fn add_with_priority<T: Tick + 'static>(&mut self, priority: i32, item: T) -> SystemId {
        self.next_id += 1;
        let id = SystemId(self.next_id);
        self.entries.push(Entry {
            id,
            priority,
            item: Box::new(item),
        });
        // stable: equal priorities keep insertion order
        self.entries.sort_by_key(|e| e.priority);
        id
    }

    pub fn remove(&mut self, id: SystemId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Ids in the order they run.
    pub fn order(&self) -> Vec<SystemId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn run(&mut self, frame: &Frame) {
        for entry in &mut self.entries {
            entry.item.tick(frame);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
