use std::cell::{BorrowError, BorrowMutError, Ref, RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::canvas::{Canvas, Drawable};
use crate::geom::{collision, fit, Rect, Vec2};

use super::Behaviors;

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an [`Object`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u64);

impl ObjectId {
    fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Axis-aligned game entity. `pos` is the bottom-left corner.
///
/// Behaviors run in three phases per update: `pre_steps`, `steps`, then
/// `post_steps`, each for every object of a collection before the next.
pub struct Object<C> {
    id: ObjectId,
    tag: String,
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    /// Radians, counter-clockwise.
    pub rot: f64,
    /// Added to `rot` when drawing, for art that does not face +x.
    pub rot_normal: f64,
    pub drawable: Option<Rc<dyn Drawable>>,
    pub pre_steps: Behaviors<C>,
    pub steps: Behaviors<C>,
    pub post_steps: Behaviors<C>,
}

impl<C> Object<C> {
    pub fn new() -> Self {
        Self {
            id: ObjectId::next(),
            tag: String::new(),
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rot: 0.0,
            rot_normal: 0.0,
            drawable: None,
            pre_steps: Behaviors::new(),
            steps: Behaviors::new(),
            post_steps: Behaviors::new(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Empty for untagged objects. Fixed at construction so collections can
    /// index by it.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn at(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_rotation(mut self, rot: f64) -> Self {
        self.rot = rot;
        self
    }

    pub fn with_rot_normal(mut self, rot_normal: f64) -> Self {
        self.rot_normal = rot_normal;
        self
    }

    pub fn with_drawable(mut self, drawable: Rc<dyn Drawable>) -> Self {
        self.drawable = Some(drawable);
        self
    }

    pub fn with_pre_steps(mut self, behaviors: Behaviors<C>) -> Self {
        self.pre_steps = behaviors;
        self
    }

    pub fn with_steps(mut self, behaviors: Behaviors<C>) -> Self {
        self.steps = behaviors;
        self
    }

    pub fn with_post_steps(mut self, behaviors: Behaviors<C>) -> Self {
        self.post_steps = behaviors;
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Closed-interval overlap of the unrotated bounds.
    pub fn collides(&self, other: &Object<C>) -> bool {
        collision(self.bounds(), other.bounds())
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    pub fn pre_step(&mut self, dt: f64, ctx: &mut C) {
        let behaviors = self.pre_steps.clone();
        behaviors.execute(self, dt, ctx);
    }

    pub fn step(&mut self, dt: f64, ctx: &mut C) {
        let behaviors = self.steps.clone();
        behaviors.execute(self, dt, ctx);
    }

    pub fn post_step(&mut self, dt: f64, ctx: &mut C) {
        let behaviors = self.post_steps.clone();
        behaviors.execute(self, dt, ctx);
    }

    /// Stretches the drawable over the object's bounds and rotates it about
    /// the center by `rot + rot_normal`. Objects without a drawable are
    /// invisible.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let Some(drawable) = &self.drawable else {
            return;
        };
        let bounds = self.bounds();
        let transform =
            fit(drawable.bounds(), bounds).rotated(bounds.center(), self.rot + self.rot_normal);
        drawable.draw(canvas, transform);
    }
}

impl<C> Default for Object<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Object<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("pos", &self.pos)
            .field("size", &self.size)
            .field("velocity", &self.velocity)
            .field("rot", &self.rot)
            .field("rot_normal", &self.rot_normal)
            .field("drawable", &self.drawable.is_some())
            .field("pre_steps", &self.pre_steps)
            .field("steps", &self.steps)
            .field("post_steps", &self.post_steps)
            .finish()
    }
}

/// Shared reference to an [`Object`]. Equality and hashing follow the
/// object's identity, not its state.
///
/// The id and tag are captured when the handle is created and collections
/// index by them. Mutate the object's fields through the handle, but never
/// replace the object as a whole (`*object = ..`, `mem::swap`): the handle
/// would keep the old identity. Collections check this in debug builds.
pub struct ObjectHandle<C> {
    id: ObjectId,
    tag: Rc<str>,
    cell: Rc<RefCell<Object<C>>>,
}

impl<C> ObjectHandle<C> {
    pub fn new(object: Object<C>) -> Self {
        Self {
            id: object.id,
            tag: Rc::from(object.tag.as_str()),
            cell: Rc::new(RefCell::new(object)),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Panics if the object is mutably borrowed, e.g. from inside one of its
    /// own behaviors.
    pub fn borrow(&self) -> Ref<'_, Object<C>> {
        self.cell.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Object<C>> {
        self.cell.borrow_mut()
    }

    pub fn try_borrow(&self) -> Result<Ref<'_, Object<C>>, BorrowError> {
        self.cell.try_borrow()
    }

    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, Object<C>>, BorrowMutError> {
        self.cell.try_borrow_mut()
    }
}

impl<C> From<Object<C>> for ObjectHandle<C> {
    fn from(object: Object<C>) -> Self {
        Self::new(object)
    }
}

impl<C> Clone for ObjectHandle<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            tag: Rc::clone(&self.tag),
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<C> PartialEq for ObjectHandle<C> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<C> Eq for ObjectHandle<C> {}

impl<C> Hash for ObjectHandle<C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<C> fmt::Debug for ObjectHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .finish()
    }
}
