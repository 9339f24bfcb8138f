use std::fmt;
use std::rc::Rc;

use crate::geom::{collision, Rect};

use super::{Object, ObjectHandle};

/// Per-frame mutation of one object. `ctx` is the scene-owned context passed
/// to every behavior of an update.
pub type Behavior<C> = Rc<dyn Fn(&mut Object<C>, f64, &mut C)>;

/// Reaction of `source` to touching `with`.
pub type Reaction<C> = Rc<dyn Fn(&mut Object<C>, &Object<C>, f64, &mut C)>;

pub fn behavior<C, F>(f: F) -> Behavior<C>
where
    F: Fn(&mut Object<C>, f64, &mut C) + 'static,
{
    Rc::new(f)
}

pub fn reaction<C, F>(f: F) -> Reaction<C>
where
    F: Fn(&mut Object<C>, &Object<C>, f64, &mut C) + 'static,
{
    Rc::new(f)
}

/// Ordered behavior list. Cloning shares the list.
pub struct Behaviors<C> {
    list: Rc<Vec<Behavior<C>>>,
}

impl<C> Behaviors<C> {
    pub fn new() -> Self {
        Self {
            list: Rc::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn push(&mut self, behavior: Behavior<C>) {
        Rc::make_mut(&mut self.list).push(behavior);
    }

    pub fn with(mut self, behavior: Behavior<C>) -> Self {
        self.push(behavior);
        self
    }

    /// Runs every behavior in list order with the same `dt`; each one sees
    /// the mutations of the ones before it.
    pub fn execute(&self, source: &mut Object<C>, dt: f64, ctx: &mut C) {
        for behavior in self.list.iter() {
            behavior(source, dt, ctx);
        }
    }
}

impl<C> Clone for Behaviors<C> {
    fn clone(&self) -> Self {
        Self {
            list: Rc::clone(&self.list),
        }
    }
}

impl<C> Default for Behaviors<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Behaviors<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behaviors")
            .field("len", &self.list.len())
            .finish()
    }
}

impl<C> From<Vec<Behavior<C>>> for Behaviors<C> {
    fn from(list: Vec<Behavior<C>>) -> Self {
        Self {
            list: Rc::new(list),
        }
    }
}

impl<C> FromIterator<Behavior<C>> for Behaviors<C> {
    fn from_iter<I: IntoIterator<Item = Behavior<C>>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// `pos += velocity * dt`
pub fn movement<C>() -> Behavior<C> {
    behavior(|source: &mut Object<C>, dt, _ctx: &mut C| {
        source.pos += source.velocity * dt;
    })
}

/// Points `rot` along the velocity. A zero velocity yields `0.0`.
pub fn face_direction<C>() -> Behavior<C> {
    face_direction_offset(0.0)
}

pub fn face_direction_offset<C>(offset: f64) -> Behavior<C> {
    behavior(move |source: &mut Object<C>, _dt, _ctx: &mut C| {
        source.rot = source.velocity.angle() + offset;
    })
}

/// Runs `then` while `source` touches `other`. Skipped when `other` is the
/// source itself.
pub fn collision_with<C: 'static>(other: ObjectHandle<C>, then: Behavior<C>) -> Behavior<C> {
    behavior(move |source: &mut Object<C>, dt, ctx: &mut C| {
        let Ok(with) = other.try_borrow() else {
            return;
        };
        let touching = collision(source.bounds(), with.bounds());
        drop(with);
        if touching {
            then(source, dt, ctx);
        }
    })
}

/// Runs `reaction(source, other)` while the two touch. Skipped when `other`
/// is the source itself.
pub fn object_collision<C: 'static>(other: ObjectHandle<C>, reaction: Reaction<C>) -> Behavior<C> {
    behavior(move |source: &mut Object<C>, dt, ctx: &mut C| {
        let Ok(with) = other.try_borrow() else {
            return;
        };
        if collision(source.bounds(), with.bounds()) {
            reaction(source, &with, dt, ctx);
        }
    })
}

/// Runs `then` while `source` touches the rectangle reported by `area`.
pub fn area_collision<C, F>(area: F, then: Behavior<C>) -> Behavior<C>
where
    C: 'static,
    F: Fn(&C) -> Rect + 'static,
{
    behavior(move |source: &mut Object<C>, dt, ctx: &mut C| {
        if collision(source.bounds(), area(ctx)) {
            then(source, dt, ctx);
        }
    })
}

/// Keeps `source` inside the rectangle reported by `limits`. On each axis
/// that pokes out, the velocity component is negated, `rot` follows the new
/// heading and the position is snapped back onto the boundary.
pub fn reflect_within<C, F>(limits: F) -> Behavior<C>
where
    F: Fn(&C) -> Rect + 'static,
{
    behavior(move |source: &mut Object<C>, _dt, ctx: &mut C| {
        let limits = limits(ctx);
        let bounds = source.bounds();
        let mut reflected = false;

        if bounds.min.x < limits.min.x {
            source.velocity.x = -source.velocity.x;
            source.pos.x = limits.min.x;
            reflected = true;
        } else if bounds.max.x > limits.max.x {
            source.velocity.x = -source.velocity.x;
            source.pos.x = limits.max.x - source.size.x;
            reflected = true;
        }

        if bounds.min.y < limits.min.y {
            source.velocity.y = -source.velocity.y;
            source.pos.y = limits.min.y;
            reflected = true;
        } else if bounds.max.y > limits.max.y {
            source.velocity.y = -source.velocity.y;
            source.pos.y = limits.max.y - source.size.y;
            reflected = true;
        }

        if reflected {
            source.rot = source.velocity.angle();
        }
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::geom::vec2;

    const EPSILON: f64 = 1e-12;

    fn square(x: f64, y: f64, size: f64) -> Object<()> {
        Object::new().at(vec2(x, y)).with_size(vec2(size, size))
    }

    #[test]
    fn execute_runs_in_order_and_observes_prior_mutation() {
        let inc = behavior(|source: &mut Object<Vec<f64>>, _dt, seen: &mut Vec<f64>| {
            source.pos.x += 1.0;
            seen.push(source.pos.x);
        });
        let behaviors = Behaviors::from(vec![inc.clone(), inc]);
        let mut object = Object::new();
        let mut seen = Vec::new();

        behaviors.execute(&mut object, 0.5, &mut seen);

        assert_eq!(seen, vec![1.0, 2.0]);
        assert_eq!(object.pos.x, 2.0);
    }

    #[test]
    fn every_behavior_gets_the_same_dt() {
        let record = behavior(|_source: &mut Object<Vec<f64>>, dt, seen: &mut Vec<f64>| {
            seen.push(dt);
        });
        let behaviors: Behaviors<Vec<f64>> = [record.clone(), record.clone(), record]
            .into_iter()
            .collect();
        let mut seen = Vec::new();

        behaviors.execute(&mut Object::new(), 0.25, &mut seen);

        assert_eq!(seen, vec![0.25; 3]);
    }

    #[test]
    fn empty_behaviors_are_a_no_op() {
        let mut object = square(1.0, 2.0, 3.0);
        Behaviors::new().execute(&mut object, 1.0, &mut ());
        assert_eq!(object.pos, vec2(1.0, 2.0));
    }

    #[test]
    fn push_on_a_shared_list_does_not_affect_the_clone() {
        let mut first: Behaviors<()> = Behaviors::new().with(movement());
        let second = first.clone();
        first.push(face_direction());
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn movement_integrates_velocity() {
        let mut object = square(0.0, 0.0, 10.0).with_velocity(vec2(10.0, 10.0));
        movement()(&mut object, 1.0, &mut ());
        assert_eq!(object.pos, vec2(10.0, 10.0));

        let mut object = square(10.0, 10.0, 1.0).with_velocity(vec2(10.0, -4.0));
        movement()(&mut object, 0.5, &mut ());
        assert_eq!(object.pos, vec2(15.0, 8.0));
    }

    #[test]
    fn face_direction_follows_velocity() {
        let mut object = Object::<()>::new().with_velocity(vec2(1.0, 1.0));
        face_direction()(&mut object, 1.0, &mut ());
        assert!((object.rot - 1.0f64.atan2(1.0)).abs() < EPSILON);
    }

    #[test]
    fn face_direction_with_zero_velocity_is_zero() {
        let mut object = Object::<()>::new().with_rotation(2.0);
        face_direction()(&mut object, 1.0, &mut ());
        assert_eq!(object.rot, 0.0);
    }

    #[test]
    fn face_direction_offset_adds_offset() {
        let mut object = Object::<()>::new().with_velocity(vec2(0.0, 3.0));
        face_direction_offset(0.5)(&mut object, 1.0, &mut ());
        assert!((object.rot - (std::f64::consts::FRAC_PI_2 + 0.5)).abs() < EPSILON);
    }

    #[test]
    fn collision_with_runs_only_when_touching() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let then = behavior(move |_source: &mut Object<()>, _dt, _ctx: &mut ()| {
            counter.set(counter.get() + 1);
        });
        let other = ObjectHandle::new(square(10.0, 0.0, 10.0));
        let check = collision_with(other, then);

        let mut touching = square(0.0, 0.0, 10.0);
        check(&mut touching, 1.0, &mut ());
        let mut apart = square(-30.0, 0.0, 10.0);
        check(&mut apart, 1.0, &mut ());

        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn collision_with_itself_is_skipped() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let handle = ObjectHandle::new(square(0.0, 0.0, 10.0));
        let check = collision_with(
            handle.clone(),
            behavior(move |_source: &mut Object<()>, _dt, _ctx: &mut ()| {
                counter.set(counter.get() + 1);
            }),
        );

        check(&mut *handle.borrow_mut(), 1.0, &mut ());

        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn object_collision_passes_both_objects() {
        let other = ObjectHandle::new(square(5.0, 5.0, 10.0).with_velocity(vec2(3.0, 0.0)));
        let bounce = object_collision(
            other,
            reaction(|source: &mut Object<()>, with: &Object<()>, _dt, _ctx: &mut ()| {
                source.velocity = with.velocity;
            }),
        );
        let mut object = square(0.0, 0.0, 10.0);

        bounce(&mut object, 1.0, &mut ());

        assert_eq!(object.velocity, vec2(3.0, 0.0));
    }

    #[test]
    fn area_collision_reads_area_from_context() {
        let mark = behavior(|source: &mut Object<Rect>, _dt, _area: &mut Rect| {
            source.rot = 1.0;
        });
        let check = area_collision(|area: &Rect| *area, mark);
        let mut area = Rect::new(0.0, 0.0, 100.0, 100.0);

        let mut inside = Object::new().at(vec2(50.0, 50.0)).with_size(vec2(1.0, 1.0));
        check(&mut inside, 1.0, &mut area);
        let mut outside = Object::new().at(vec2(500.0, 50.0)).with_size(vec2(1.0, 1.0));
        check(&mut outside, 1.0, &mut area);

        assert_eq!(inside.rot, 1.0);
        assert_eq!(outside.rot, 0.0);
    }

    #[test]
    fn reflect_within_negates_and_snaps_each_axis() {
        let limits = Rect::new(0.0, 0.0, 100.0, 100.0);
        let reflect = reflect_within(move |_: &()| limits);

        let mut object = square(95.0, -3.0, 10.0).with_velocity(vec2(4.0, -2.0));
        reflect(&mut object, 1.0, &mut ());

        assert_eq!(object.velocity, vec2(-4.0, 2.0));
        assert_eq!(object.pos, vec2(90.0, 0.0));
        assert!((object.rot - vec2(-4.0, 2.0).angle()).abs() < EPSILON);
    }

    #[test]
    fn reflect_within_leaves_inside_objects_alone() {
        let limits = Rect::new(0.0, 0.0, 100.0, 100.0);
        let reflect = reflect_within(move |_: &()| limits);

        let mut object = square(0.0, 90.0, 10.0)
            .with_velocity(vec2(-1.0, 1.0))
            .with_rotation(0.3);
        reflect(&mut object, 1.0, &mut ());

        assert_eq!(object.velocity, vec2(-1.0, 1.0));
        assert_eq!(object.pos, vec2(0.0, 90.0));
        assert_eq!(object.rot, 0.3);
    }
}
