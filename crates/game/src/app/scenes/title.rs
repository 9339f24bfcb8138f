use std::rc::Rc;

use worldorder::objects::behavior;
use worldorder::{
    vec2, Behaviors, Button, Canvas, Color, Input, Object, Objects, Rect, Scene, SceneResult,
    ShapeDrawable,
};

use super::Transition;

const GRID_DIVISIONS: u32 = 19;
const DOT_SIZE: f64 = 6.0;
const DOT_SPIN_PER_SECOND: f64 = 0.8;
const SCORE_PIP: f64 = 8.0;
const SCORE_PIP_GAP: f64 = 4.0;
const MAX_SCORE_PIPS: u32 = 40;
const PAD: f64 = 10.0;

const LAST_SCORE_COLOR: Color = Color::rgb(0xf2, 0xf2, 0xf2);
const BEST_SCORE_COLOR: Color = Color::rgb(0xf2, 0xb1, 0x34);
const BANNER_COLOR: Color = Color::rgba(0x5e, 0xc4, 0xe8, 0xc0);

/// Enter starts the game, Space opens the swarm, Escape quits.
pub(crate) struct TitleScene {
    bounds: Rect,
    last_score: Option<u32>,
    best_score: u32,
    backdrop: Objects<()>,
}

impl TitleScene {
    pub(crate) fn new(bounds: Rect, last_score: Option<u32>, best_score: u32) -> Self {
        Self {
            bounds,
            last_score,
            best_score,
            backdrop: backdrop(bounds),
        }
    }

    fn draw_pips(&self, canvas: &mut dyn Canvas, row: u32, count: u32, color: Color) {
        let top = self.bounds.max.y - PAD - f64::from(row) * (SCORE_PIP + SCORE_PIP_GAP);
        for index in 0..count.min(MAX_SCORE_PIPS) {
            let x = self.bounds.min.x + PAD + f64::from(index) * (SCORE_PIP + SCORE_PIP_GAP);
            canvas.fill_rect(Rect::new(x, top - SCORE_PIP, x + SCORE_PIP, top), color);
        }
    }
}

impl Scene<Transition> for TitleScene {
    fn update(&mut self, dt: f64, input: &dyn Input) -> SceneResult<Transition> {
        if input.just_pressed(Button::Escape) {
            return SceneResult::App(Transition::Quit);
        }
        if input.just_pressed(Button::Enter) {
            return SceneResult::App(Transition::Play);
        }
        if input.just_pressed(Button::Space) {
            return SceneResult::App(Transition::Swarm);
        }

        self.backdrop.update(dt, &mut ());
        SceneResult::Continue
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        self.backdrop.draw(canvas);

        let banner = Rect::sized(
            self.bounds.center(),
            vec2(self.bounds.w() * 0.6, self.bounds.h() * 0.15),
        );
        canvas.fill_rect(banner, BANNER_COLOR);

        if let Some(score) = self.last_score {
            self.draw_pips(canvas, 0, score, LAST_SCORE_COLOR);
            self.draw_pips(canvas, 1, self.best_score, BEST_SCORE_COLOR);
        }
    }
}

/// Faint grid of slowly spinning dots shading from black to red and green
/// across the canvas.
fn backdrop(bounds: Rect) -> Objects<()> {
    let dots = Objects::new();
    let spin = Behaviors::new().with(behavior(|dot: &mut Object<()>, dt, _ctx: &mut ()| {
        dot.rot += DOT_SPIN_PER_SECOND * dt;
    }));
    let (x, y, w, h) = bounds.shape();
    let div = f64::from(GRID_DIVISIONS);

    for i in 0..=GRID_DIVISIONS {
        for j in 0..=GRID_DIVISIONS {
            let (fi, fj) = (f64::from(i) / div, f64::from(j) / div);
            let color = Color::rgba((fi * 255.0) as u8, (fj * 255.0) as u8, 0, 64);
            let center = vec2(x + fi * w, y + fj * h);
            dots.spawn(
                Object::new()
                    .at(center - vec2(DOT_SIZE, DOT_SIZE).scaled(0.5))
                    .with_size(vec2(DOT_SIZE, DOT_SIZE))
                    .with_drawable(Rc::new(ShapeDrawable::filled(color)))
                    .with_steps(spin.clone()),
            );
        }
    }
    dots
}
