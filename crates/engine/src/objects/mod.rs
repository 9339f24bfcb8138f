//! Game objects, their behaviors, and the collections that update and draw them.

mod behavior;
mod collection;
mod layers;
mod object;

pub use behavior::{
    area_collision, behavior, collision_with, face_direction, face_direction_offset, movement,
    object_collision, reaction, reflect_within, Behavior, Behaviors, Reaction,
};
pub use collection::{ObjectSet, Objects};
pub use layers::{Layers, TagIter};
pub use object::{Object, ObjectHandle, ObjectId};
