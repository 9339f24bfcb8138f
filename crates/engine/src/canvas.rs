use serde::{Deserialize, Serialize};

use crate::geom::{Affine, Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    u8::MAX
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Drawing surface in world units, origin bottom-left, y up.
pub trait Canvas {
    fn bounds(&self) -> Rect;

    fn clear(&mut self, color: Color);

    /// Fills a convex polygon given in drawing order.
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_polygon(&rect_corners(rect, Affine::IDENTITY), color);
    }
}

/// Anything an object can render. `bounds` is the drawable's own extent;
/// `draw` receives the transform from that extent onto the canvas.
pub trait Drawable {
    fn bounds(&self) -> Rect;

    fn draw(&self, canvas: &mut dyn Canvas, transform: Affine);
}

/// Solid rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDrawable {
    bounds: Rect,
    color: Color,
}

impl ShapeDrawable {
    pub fn new(bounds: Rect, color: Color) -> Self {
        Self { bounds, color }
    }

    /// Unit square, enough for objects that only need a color.
    pub fn filled(color: Color) -> Self {
        Self::new(Rect::new(0.0, 0.0, 1.0, 1.0), color)
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl Drawable for ShapeDrawable {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn draw(&self, canvas: &mut dyn Canvas, transform: Affine) {
        canvas.fill_polygon(&rect_corners(self.bounds, transform), self.color);
    }
}

/// Corners counter-clockwise starting at `min`.
pub fn rect_corners(rect: Rect, transform: Affine) -> [Vec2; 4] {
    [
        rect.min,
        Vec2 {
            x: rect.max.x,
            y: rect.min.y,
        },
        rect.max,
        Vec2 {
            x: rect.min.x,
            y: rect.max.y,
        },
    ]
    .map(|corner| transform.project(corner))
}
