use std::f64::consts::PI;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

pub const fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2 { x, y }
}

impl Vec2 {
    pub const ZERO: Vec2 = vec2(0.0, 0.0);

    pub fn len(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Angle from the positive x axis in radians. The zero vector reports `0.0`.
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn scaled(self, factor: f64) -> Vec2 {
        vec2(self.x * factor, self.y * factor)
    }

    pub fn scaled_xy(self, factor: Vec2) -> Vec2 {
        vec2(self.x * factor.x, self.y * factor.y)
    }

    pub fn rotated(self, angle: f64) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        vec2(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Vector of length `len` pointing along `angle`.
    pub fn from_polar(len: f64, angle: f64) -> Vec2 {
        vec2(len, 0.0).rotated(angle)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        vec2(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        vec2(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        self.scaled(rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        vec2(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle spanning `min..=max`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min: vec2(min_x, min_y),
            max: vec2(max_x, max_y),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Rectangle of the given size centered on `center`.
    pub fn sized(center: Vec2, size: Vec2) -> Self {
        let half = size.scaled(0.5);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn w(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn h(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.w(), self.h())
    }

    pub fn center(&self) -> Vec2 {
        vec2(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// `(x_min, x_max, y_min, y_max)`
    pub fn limits(&self) -> (f64, f64, f64, f64) {
        (self.min.x, self.max.x, self.min.y, self.max.y)
    }

    /// `(x, y, w, h)`
    pub fn shape(&self) -> (f64, f64, f64, f64) {
        (self.min.x, self.min.y, self.w(), self.h())
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Scales width and height by `factor` around the center.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::sized(self.center(), self.size().scaled(factor))
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        collision(*self, *other)
    }
}

/// Closed-interval rectangle intersection: touching edges collide.
pub fn collision(a: Rect, b: Rect) -> bool {
    if a.min.x > b.max.x || b.min.x > a.max.x {
        return false;
    }
    if a.min.y > b.max.y || b.min.y > a.max.y {
        return false;
    }
    true
}

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Affine transform stored as the 2x3 matrix `[a c e; b d f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    m: [f64; 6],
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        m: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    /// Applies `next` after `self`.
    pub fn then(self, next: Affine) -> Affine {
        let [a1, b1, c1, d1, e1, f1] = self.m;
        let [a2, b2, c2, d2, e2, f2] = next.m;
        Affine {
            m: [
                a2 * a1 + c2 * b1,
                b2 * a1 + d2 * b1,
                a2 * c1 + c2 * d1,
                b2 * c1 + d2 * d1,
                a2 * e1 + c2 * f1 + e2,
                b2 * e1 + d2 * f1 + f2,
            ],
        }
    }

    pub fn moved(self, delta: Vec2) -> Affine {
        self.then(Affine {
            m: [1.0, 0.0, 0.0, 1.0, delta.x, delta.y],
        })
    }

    pub fn scaled_xy(self, around: Vec2, scale: Vec2) -> Affine {
        self.moved(-around)
            .then(Affine {
                m: [scale.x, 0.0, 0.0, scale.y, 0.0, 0.0],
            })
            .moved(around)
    }

    pub fn rotated(self, around: Vec2, angle: f64) -> Affine {
        let (sin, cos) = angle.sin_cos();
        self.moved(-around)
            .then(Affine {
                m: [cos, sin, -sin, cos, 0.0, 0.0],
            })
            .moved(around)
    }

    pub fn project(&self, point: Vec2) -> Vec2 {
        let [a, b, c, d, e, f] = self.m;
        vec2(a * point.x + c * point.y + e, b * point.x + d * point.y + f)
    }
}

/// Transform mapping `source` onto `dest`, stretching each axis independently.
/// A degenerate source axis maps with a scale of zero.
pub fn fit(source: Rect, dest: Rect) -> Affine {
    let scale = vec2(
        axis_scale(dest.w(), source.w()),
        axis_scale(dest.h(), source.h()),
    );
    Affine::IDENTITY
        .moved(-source.min)
        .scaled_xy(Vec2::ZERO, scale)
        .moved(dest.min)
}

/// Like [`fit`], then shifted by the destination center. Maps center-origin
/// art onto a bottom-left-origin surface.
pub fn fit_at_zero(source: Rect, dest: Rect) -> Affine {
    fit(source, dest).moved(dest.center())
}

fn axis_scale(dest: f64, source: f64) -> f64 {
    if source == 0.0 {
        0.0
    } else {
        dest / source
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_vec_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual.x - expected.x).abs() < EPSILON && (actual.y - expected.y).abs() < EPSILON,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn collision_is_symmetric() {
        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(5.0, 5.0, 15.0, 15.0),
            Rect::new(10.0, 0.0, 20.0, 10.0),
            Rect::new(30.0, 30.0, 40.0, 40.0),
            Rect::new(-5.0, 2.0, 1.0, 3.0),
        ];
        for a in rects {
            for b in rects {
                assert_eq!(collision(a, b), collision(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn touching_edges_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        let c = Rect::new(0.0, 10.0, 10.0, 20.0);
        assert!(collision(a, b));
        assert!(collision(a, c));
    }

    #[test]
    fn separated_rects_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!collision(a, Rect::new(10.5, 0.0, 20.0, 10.0)));
        assert!(!collision(a, Rect::new(0.0, -20.0, 10.0, -0.5)));
    }

    #[test]
    fn zero_vector_angle_is_zero() {
        assert_eq!(Vec2::ZERO.angle(), 0.0);
        assert!((vec2(1.0, 1.0).angle() - 1.0f64.atan2(1.0)).abs() < EPSILON);
    }

    #[test]
    fn degree_conversions_round_trip() {
        assert!((deg_to_rad(180.0) - PI).abs() < EPSILON);
        assert!((rad_to_deg(FRAC_PI_2) - 90.0).abs() < EPSILON);
    }

    #[test]
    fn sized_and_scaled_rects_keep_center() {
        let rect = Rect::sized(vec2(5.0, 5.0), vec2(4.0, 2.0));
        assert_eq!(rect, Rect::new(3.0, 4.0, 7.0, 6.0));

        let doubled = rect.scaled(2.0);
        assert_eq!(doubled.center(), rect.center());
        assert_eq!(doubled.size(), vec2(8.0, 4.0));
        assert_eq!(rect.shape(), (3.0, 4.0, 4.0, 2.0));
        assert_eq!(rect.limits(), (3.0, 7.0, 4.0, 6.0));
    }

    #[test]
    fn fit_maps_source_corners_onto_dest() {
        let source = Rect::new(0.0, 0.0, 10.0, 10.0);
        let dest = Rect::new(100.0, 50.0, 120.0, 55.0);
        let transform = fit(source, dest);
        assert_vec_close(transform.project(source.min), dest.min);
        assert_vec_close(transform.project(source.max), dest.max);
    }

    #[test]
    fn rotation_about_point_keeps_pivot_fixed() {
        let pivot = vec2(3.0, 4.0);
        let transform = Affine::IDENTITY.rotated(pivot, 1.234);
        assert_vec_close(transform.project(pivot), pivot);
        assert_vec_close(
            Affine::IDENTITY
                .rotated(Vec2::ZERO, FRAC_PI_2)
                .project(vec2(1.0, 0.0)),
            vec2(0.0, 1.0),
        );
    }

    #[test]
    fn fit_with_degenerate_source_does_not_produce_nan() {
        let transform = fit(Rect::new(0.0, 0.0, 0.0, 10.0), Rect::new(0.0, 0.0, 5.0, 5.0));
        let projected = transform.project(vec2(0.0, 10.0));
        assert!(projected.x.is_finite());
        assert!(projected.y.is_finite());
    }
}
