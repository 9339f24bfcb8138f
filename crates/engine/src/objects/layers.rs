use std::collections::btree_map;
use std::fmt;
use std::ops::Index;

use crate::canvas::Canvas;

use super::{ObjectHandle, ObjectId, ObjectSet, Objects};

/// Fixed stack of collections. Index 0 updates and draws first, so higher
/// layers render on top.
pub struct Layers<C> {
    layers: Vec<Objects<C>>,
}

impl<C> Layers<C> {
    pub fn new(count: usize) -> Self {
        Self {
            layers: (0..count).map(|_| Objects::new()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Objects<C>> {
        self.layers.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Objects<C>> {
        self.layers.iter()
    }

    pub fn update(&self, dt: f64, ctx: &mut C) {
        for layer in &self.layers {
            layer.update(dt, ctx);
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for layer in &self.layers {
            layer.draw(canvas);
        }
    }

    /// Every object tagged `tag`, layer by layer in index order. Each layer
    /// is read when the iterator reaches it.
    pub fn tagged<'a>(&'a self, tag: &'a str) -> TagIter<'a, C> {
        TagIter {
            layers: self.layers.iter(),
            tag,
            current: ObjectSet::default().into_iter(),
        }
    }

    /// Empties every layer; the layer count is unchanged.
    pub fn clear(&self) {
        for layer in &self.layers {
            layer.clear();
        }
    }
}

impl<C> Index<usize> for Layers<C> {
    type Output = Objects<C>;

    fn index(&self, index: usize) -> &Objects<C> {
        &self.layers[index]
    }
}

impl<C> fmt::Debug for Layers<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.layers).finish()
    }
}

pub struct TagIter<'a, C> {
    layers: std::slice::Iter<'a, Objects<C>>,
    tag: &'a str,
    current: btree_map::IntoValues<ObjectId, ObjectHandle<C>>,
}

impl<C> Iterator for TagIter<'_, C> {
    type Item = ObjectHandle<C>;

    fn next(&mut self) -> Option<ObjectHandle<C>> {
        loop {
            if let Some(handle) = self.current.next() {
                return Some(handle);
            }
            let layer = self.layers.next()?;
            self.current = layer.tagged(self.tag).into_iter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Color, ShapeDrawable};
    use crate::geom::vec2;
    use crate::objects::{behavior, Behaviors, Object};
    use crate::testing::RecordingCanvas;
    use std::rc::Rc;

    #[test]
    fn new_creates_empty_layers() {
        let layers = Layers::<()>::new(3);
        assert_eq!(layers.len(), 3);
        assert!(layers.iter().all(Objects::is_empty));
        assert!(layers.get(3).is_none());
        assert!(Layers::<()>::new(0).is_empty());
    }

    #[test]
    fn update_runs_layers_in_index_order() {
        let layers = Layers::<Vec<usize>>::new(3);
        for index in [2, 0, 1] {
            layers[index].spawn(Object::new().with_steps(Behaviors::new().with(behavior(
                move |_source: &mut Object<Vec<usize>>, _dt, seen: &mut Vec<usize>| {
                    seen.push(index);
                },
            ))));
        }
        let mut seen = Vec::new();

        layers.update(1.0, &mut seen);

        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn draw_renders_lower_layers_first() {
        let layers = Layers::<()>::new(2);
        let colors = [Color::rgb(1, 0, 0), Color::rgb(0, 1, 0)];
        for (index, color) in colors.into_iter().enumerate().rev() {
            layers[index].spawn(
                Object::new()
                    .with_size(vec2(1.0, 1.0))
                    .with_drawable(Rc::new(ShapeDrawable::filled(color))),
            );
        }
        let mut canvas = RecordingCanvas::new(10.0, 10.0);

        layers.draw(&mut canvas);

        let drawn: Vec<_> = canvas.polygons.iter().map(|(_, color)| *color).collect();
        assert_eq!(drawn, colors.to_vec());
    }

    #[test]
    fn tagged_visits_layers_in_order() {
        let layers = Layers::<()>::new(3);
        let top = layers[2].spawn(Object::new().with_tag("enemy"));
        let bottom = layers[0].spawn(Object::new().with_tag("enemy"));
        layers[1].spawn(Object::new().with_tag("wall"));

        let found: Vec<_> = layers.tagged("enemy").collect();

        assert_eq!(found, vec![bottom, top]);
    }

    #[test]
    fn tagged_iterators_are_independent() {
        let layers = Layers::<()>::new(2);
        layers[0].spawn(Object::new().with_tag("coin"));
        layers[1].spawn(Object::new().with_tag("coin"));

        let mut first = layers.tagged("coin");
        assert!(first.next().is_some());

        assert_eq!(layers.tagged("coin").count(), 2);
        assert_eq!(first.count(), 1);
    }

    #[test]
    fn unknown_tag_yields_nothing() {
        let layers = Layers::<()>::new(2);
        layers[0].spawn(Object::new());
        assert_eq!(layers.tagged("ghost").count(), 0);
    }

    #[test]
    fn clear_keeps_layer_count() {
        let layers = Layers::<()>::new(2);
        layers[1].spawn(Object::new());
        layers.clear();
        assert_eq!(layers.len(), 2);
        assert!(layers[1].is_empty());
    }
}
