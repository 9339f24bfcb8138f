use crate::canvas::Color;
use crate::geom::Vec2;

/// RGBA8 frame buffer of `width * height` pixels, row 0 at the top.
/// Drawing coordinates are y-up with the origin at the bottom-left corner.
pub(crate) struct FrameView<'a> {
    pub(crate) frame: &'a mut [u8],
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl FrameView<'_> {
    pub(crate) fn clear(&mut self, color: Color) {
        let rgba = color.to_rgba();
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    /// Scanline fill sampling pixel centers; even-odd rule.
    pub(crate) fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 || color.a == 0 {
            return;
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return;
        }

        let (min_y, max_y) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let first_row = first_covered(min_y).max(0);
        let end_row = first_covered(max_y).min(self.height as i64);

        let mut crossings = Vec::with_capacity(points.len());
        for row in first_row..end_row {
            let center_y = row as f64 + 0.5;
            crossings.clear();
            for (index, a) in points.iter().enumerate() {
                let b = points[(index + 1) % points.len()];
                let spans =
                    (a.y <= center_y && center_y < b.y) || (b.y <= center_y && center_y < a.y);
                if spans {
                    crossings.push(a.x + (center_y - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(f64::total_cmp);

            let buffer_row = self.height as i64 - 1 - row;
            for pair in crossings.chunks_exact(2) {
                let first_col = first_covered(pair[0]).max(0);
                let end_col = first_covered(pair[1]).min(self.width as i64);
                for col in first_col..end_col {
                    blend_pixel_rgba_clipped(
                        self.frame,
                        self.width as usize,
                        col,
                        buffer_row,
                        color,
                    );
                }
            }
        }
    }
}

/// First pixel index whose center lies at or past `edge`.
fn first_covered(edge: f64) -> i64 {
    (edge - 0.5).ceil() as i64
}

fn blend_pixel_rgba_clipped(frame: &mut [u8], width: usize, x: i64, y: i64, color: Color) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= width {
        return;
    }
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }
    let pixel = &mut frame[byte_offset..end];
    if color.a == u8::MAX {
        pixel.copy_from_slice(&color.to_rgba());
        return;
    }
    let alpha = color.a as u32;
    let inverse = u8::MAX as u32 - alpha;
    let source = color.to_rgba();
    for channel in 0..3 {
        let blended = source[channel] as u32 * alpha + pixel[channel] as u32 * inverse;
        pixel[channel] = (blended / 255) as u8;
    }
    pixel[3] = (alpha + pixel[3] as u32 * inverse / 255) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::vec2;

    const RED: Color = Color::rgb(255, 0, 0);

    fn frame(width: u32, height: u32) -> Vec<u8> {
        vec![0; (width * height * 4) as usize]
    }

    fn pixel(frame: &[u8], width: u32, x: u32, row: u32) -> [u8; 4] {
        let offset = ((row * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    fn covered(frame: &[u8]) -> usize {
        frame.chunks_exact(4).filter(|p| p[3] != 0).count()
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut buffer = frame(3, 2);
        FrameView {
            frame: &mut buffer,
            width: 3,
            height: 2,
        }
        .clear(Color::rgb(1, 2, 3));
        assert!(buffer.chunks_exact(4).all(|p| p == [1, 2, 3, 255]));
    }

    #[test]
    fn rectangle_fills_bottom_rows_first() {
        let mut buffer = frame(4, 4);
        let mut view = FrameView {
            frame: &mut buffer,
            width: 4,
            height: 4,
        };

        view.fill_polygon(
            &[vec2(0.0, 0.0), vec2(2.0, 0.0), vec2(2.0, 1.0), vec2(0.0, 1.0)],
            RED,
        );

        assert_eq!(covered(&buffer), 2);
        assert_eq!(pixel(&buffer, 4, 0, 3), [255, 0, 0, 255]);
        assert_eq!(pixel(&buffer, 4, 1, 3), [255, 0, 0, 255]);
        assert_eq!(pixel(&buffer, 4, 2, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn triangle_covers_half_the_square() {
        let mut buffer = frame(10, 10);
        let mut view = FrameView {
            frame: &mut buffer,
            width: 10,
            height: 10,
        };

        view.fill_polygon(&[vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(0.0, 10.0)], RED);

        let count = covered(&buffer);
        assert!((40..=60).contains(&count), "covered {count}");
    }

    #[test]
    fn offscreen_and_degenerate_polygons_are_clipped() {
        let mut buffer = frame(4, 4);
        let mut view = FrameView {
            frame: &mut buffer,
            width: 4,
            height: 4,
        };

        view.fill_polygon(
            &[vec2(-10.0, -10.0), vec2(100.0, -10.0), vec2(100.0, 100.0), vec2(-10.0, 100.0)],
            RED,
        );
        view.fill_polygon(&[vec2(0.0, 0.0), vec2(1.0, 1.0)], Color::WHITE);
        view.fill_polygon(
            &[vec2(f64::NAN, 0.0), vec2(1.0, 0.0), vec2(1.0, 1.0)],
            Color::WHITE,
        );

        assert_eq!(covered(&buffer), 16);
        assert!(buffer.chunks_exact(4).all(|p| p == [255, 0, 0, 255]));
    }

    #[test]
    fn translucent_fill_blends_with_existing_pixels() {
        let mut buffer = frame(1, 1);
        let mut view = FrameView {
            frame: &mut buffer,
            width: 1,
            height: 1,
        };
        view.clear(Color::BLACK);

        view.fill_polygon(
            &[vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(1.0, 1.0), vec2(0.0, 1.0)],
            Color::rgba(255, 255, 255, 128),
        );

        let blended = pixel(&buffer, 1, 0, 0);
        assert_eq!(blended[0], 128);
        assert_eq!(blended[3], 255);
    }
}
