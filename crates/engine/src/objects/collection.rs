use std::cell::RefCell;
use std::collections::{btree_map, BTreeMap, HashMap};
use std::fmt;

use tracing::debug;

use crate::canvas::Canvas;

use super::{Object, ObjectHandle, ObjectId};

/// Set of objects, indexed by tag.
///
/// Every method takes `&self`, so behaviors running inside
/// [`Objects::update`] may add or remove members, themselves included.
/// Each phase walks the members present when the phase began and skips any
/// that were removed since. Objects added during a phase first run in the
/// next phase.
pub struct Objects<C> {
    members: RefCell<Membership<C>>,
}

struct Membership<C> {
    all: BTreeMap<ObjectId, ObjectHandle<C>>,
    tagged: HashMap<String, BTreeMap<ObjectId, ObjectHandle<C>>>,
}

#[derive(Clone, Copy)]
enum Phase {
    Pre,
    Step,
    Post,
}

impl<C> Objects<C> {
    pub fn new() -> Self {
        Self {
            members: RefCell::new(Membership {
                all: BTreeMap::new(),
                tagged: HashMap::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.members.borrow().all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.borrow().all.is_empty()
    }

    /// Returns `false` when the object was already a member.
    pub fn add(&self, handle: ObjectHandle<C>) -> bool {
        let mut members = self.members.borrow_mut();
        let id = handle.id();
        if members.all.contains_key(&id) {
            return false;
        }
        if !handle.tag().is_empty() {
            members
                .tagged
                .entry(handle.tag().to_owned())
                .or_default()
                .insert(id, handle.clone());
        }
        members.all.insert(id, handle);
        true
    }

    /// Wraps `object` in a handle and adds it.
    pub fn spawn(&self, object: Object<C>) -> ObjectHandle<C> {
        let handle = ObjectHandle::new(object);
        self.add(handle.clone());
        handle
    }

    /// Returns `false` when the object was not a member.
    pub fn remove(&self, handle: &ObjectHandle<C>) -> bool {
        self.remove_id(handle.id())
    }

    pub fn remove_id(&self, id: ObjectId) -> bool {
        let mut members = self.members.borrow_mut();
        let Some(handle) = members.all.remove(&id) else {
            return false;
        };
        if let Some(set) = members.tagged.get_mut(handle.tag()) {
            set.remove(&id);
            if set.is_empty() {
                members.tagged.remove(handle.tag());
            }
        }
        true
    }

    pub fn contains(&self, handle: &ObjectHandle<C>) -> bool {
        self.contains_id(handle.id())
    }

    pub fn contains_id(&self, id: ObjectId) -> bool {
        self.members.borrow().all.contains_key(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<ObjectHandle<C>> {
        self.members.borrow().all.get(&id).cloned()
    }

    /// Snapshot of every member.
    pub fn all(&self) -> ObjectSet<C> {
        ObjectSet {
            members: self.members.borrow().all.clone(),
        }
    }

    /// Snapshot of the members carrying `tag`; empty for unknown tags.
    pub fn tagged(&self, tag: &str) -> ObjectSet<C> {
        let members = self.members.borrow();
        ObjectSet {
            members: members.tagged.get(tag).cloned().unwrap_or_default(),
        }
    }

    pub fn clear(&self) {
        let mut members = self.members.borrow_mut();
        members.all.clear();
        members.tagged.clear();
    }

    pub fn update(&self, dt: f64, ctx: &mut C) {
        self.pre_step(dt, ctx);
        self.step(dt, ctx);
        self.post_step(dt, ctx);
    }

    pub fn pre_step(&self, dt: f64, ctx: &mut C) {
        self.run_phase(Phase::Pre, dt, ctx);
    }

    pub fn step(&self, dt: f64, ctx: &mut C) {
        self.run_phase(Phase::Step, dt, ctx);
    }

    pub fn post_step(&self, dt: f64, ctx: &mut C) {
        self.run_phase(Phase::Post, dt, ctx);
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for handle in self.snapshot() {
            match handle.try_borrow() {
                Ok(object) => object.draw(canvas),
                Err(_) => debug!(object = handle.id().get(), "draw_skipped_borrowed_object"),
            }
        }
    }

    fn snapshot(&self) -> Vec<ObjectHandle<C>> {
        self.members.borrow().all.values().cloned().collect()
    }

    fn run_phase(&self, phase: Phase, dt: f64, ctx: &mut C) {
        for handle in self.snapshot() {
            if !self.contains(&handle) {
                continue;
            }
            let Ok(mut object) = handle.try_borrow_mut() else {
                debug!(object = handle.id().get(), "step_skipped_borrowed_object");
                continue;
            };
            match phase {
                Phase::Pre => object.pre_step(dt, ctx),
                Phase::Step => object.step(dt, ctx),
                Phase::Post => object.post_step(dt, ctx),
            }
            debug_assert!(
                object.id() == handle.id() && object.tag() == handle.tag(),
                "object {} was replaced by a behavior",
                handle.id().get()
            );
        }
    }
}

impl<C> Default for Objects<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Objects<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members = self.members.borrow();
        f.debug_struct("Objects")
            .field("len", &members.all.len())
            .field("tags", &members.tagged.len())
            .finish()
    }
}

/// Point-in-time copy of a collection's membership.
pub struct ObjectSet<C> {
    members: BTreeMap<ObjectId, ObjectHandle<C>>,
}

impl<C> ObjectSet<C> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, handle: &ObjectHandle<C>) -> bool {
        self.members.contains_key(&handle.id())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectHandle<C>> + '_ {
        self.members.values()
    }
}

impl<C> Clone for ObjectSet<C> {
    fn clone(&self) -> Self {
        Self {
            members: self.members.clone(),
        }
    }
}

impl<C> Default for ObjectSet<C> {
    fn default() -> Self {
        Self {
            members: BTreeMap::new(),
        }
    }
}

impl<C> fmt::Debug for ObjectSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.members.values()).finish()
    }
}

impl<C> IntoIterator for ObjectSet<C> {
    type Item = ObjectHandle<C>;
    type IntoIter = btree_map::IntoValues<ObjectId, ObjectHandle<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_values()
    }
}
