use std::f64::consts::TAU;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::Rng;
use serde::Deserialize;
use worldorder::objects::{behavior, face_direction, reflect_within, Behaviors};
use worldorder::{
    collision, deg_to_rad, vec2, Behavior, Button, Canvas, Color, Drawable, Input, Object,
    Objects, Rect, Scene, SceneResult, ShapeDrawable, Vec2,
};

use super::Transition;

const SHIP_TAG: &str = "ship";
const SHIP_PALETTE: [Color; 4] = [
    Color::rgb(0x5e, 0xc4, 0xe8),
    Color::rgb(0xf2, 0xb1, 0x34),
    Color::rgb(0xe2, 0x4c, 0x6b),
    Color::rgb(0x9b, 0xe3, 0x6d),
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SwarmConfig {
    pub(crate) ships: usize,
    pub(crate) size_min: f64,
    pub(crate) size_max: f64,
    pub(crate) speed_min: f64,
    pub(crate) speed_max: f64,
    /// Share of ships that bounce off the edges; the rest fly off and are removed.
    pub(crate) reflect_chance: f64,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            ships: 100,
            size_min: 5.0,
            size_max: 12.0,
            speed_min: 10.0,
            speed_max: 150.0,
            reflect_chance: 0.5,
        }
    }
}

impl SwarmConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if !(self.size_min > 0.0 && self.size_min <= self.size_max) {
            return Err(format!(
                "swarm ship size range {}..{} is invalid",
                self.size_min, self.size_max
            ));
        }
        if !(self.speed_min >= 0.0 && self.speed_min <= self.speed_max) {
            return Err(format!(
                "swarm ship speed range {}..{} is invalid",
                self.speed_min, self.speed_max
            ));
        }
        if !(0.0..=1.0).contains(&self.reflect_chance) {
            return Err(format!(
                "swarm reflect_chance {} is outside 0..1",
                self.reflect_chance
            ));
        }
        Ok(())
    }
}

/// Steering mode for the current frame, read from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Steer {
    Cruise,
    /// Every ship turns to 45 degrees and holds still.
    Align,
    /// Every ship turns a full circle per second in place.
    Spin,
}

impl Steer {
    fn from_input(input: &dyn Input) -> Self {
        if input.pressed(Button::KeyA) {
            Steer::Align
        } else if input.pressed(Button::Space) {
            Steer::Spin
        } else {
            Steer::Cruise
        }
    }
}

struct SwarmCtx {
    ships: Rc<Objects<SwarmCtx>>,
    bounds: Rect,
    steer: Steer,
}

/// Ships launched from the center in random directions, steered with A and
/// Space. Escape returns to the title.
pub(crate) struct SwarmScene {
    ctx: SwarmCtx,
    config: SwarmConfig,
    rng: StdRng,
    palette: Vec<Rc<dyn Drawable>>,
}

impl SwarmScene {
    pub(crate) fn new(bounds: Rect, config: SwarmConfig, rng: StdRng) -> Self {
        let palette = SHIP_PALETTE
            .iter()
            .map(|color| Rc::new(ShapeDrawable::filled(*color)) as Rc<dyn Drawable>)
            .collect();
        Self {
            ctx: SwarmCtx {
                ships: Rc::new(Objects::new()),
                bounds,
                steer: Steer::Cruise,
            },
            config,
            rng,
            palette,
        }
    }

    fn spawn_ship(&mut self) {
        let size = between(&mut self.rng, self.config.size_min, self.config.size_max);
        let speed = between(&mut self.rng, self.config.speed_min, self.config.speed_max);
        let heading = self.rng.random_range(0.0..TAU);
        let drawable = Rc::clone(&self.palette[self.rng.random_range(0..self.palette.len())]);

        let on_border = if self.rng.random::<f64>() < self.config.reflect_chance {
            reflect_within(|ctx: &SwarmCtx| ctx.bounds)
        } else {
            remove_out_of_bounds()
        };

        let ship = Object::new()
            .with_tag(SHIP_TAG)
            .at(self.ctx.bounds.center() - vec2(size, size).scaled(0.5))
            .with_size(vec2(size, size))
            .with_velocity(Vec2::from_polar(speed, heading))
            .with_rot_normal(deg_to_rad(-45.0))
            .with_drawable(drawable)
            .with_steps(Behaviors::new().with(ship_input()))
            .with_post_steps(Behaviors::from(vec![face_direction(), on_border]));
        self.ctx.ships.spawn(ship);
    }
}

impl Scene<Transition> for SwarmScene {
    fn update(&mut self, dt: f64, input: &dyn Input) -> SceneResult<Transition> {
        if input.just_pressed(Button::Escape) {
            return SceneResult::App(Transition::Title);
        }

        self.ctx.steer = Steer::from_input(input);
        if self.ctx.ships.len() < self.config.ships {
            self.spawn_ship();
        }

        let ships = Rc::clone(&self.ctx.ships);
        ships.update(dt, &mut self.ctx);
        SceneResult::Continue
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        self.ctx.ships.draw(canvas);
    }
}

fn ship_input() -> Behavior<SwarmCtx> {
    behavior(|ship: &mut Object<SwarmCtx>, dt, ctx: &mut SwarmCtx| {
        let speed = ship.velocity.len();
        match ctx.steer {
            Steer::Align => ship.velocity = Vec2::from_polar(speed, deg_to_rad(45.0)),
            Steer::Spin => {
                let heading = ship.velocity.angle() + TAU * dt;
                ship.velocity = Vec2::from_polar(speed, heading);
            }
            Steer::Cruise => ship.move_by(ship.velocity * dt),
        }
    })
}

fn remove_out_of_bounds() -> Behavior<SwarmCtx> {
    behavior(|ship: &mut Object<SwarmCtx>, _dt, ctx: &mut SwarmCtx| {
        if !collision(ship.bounds(), ctx.bounds) {
            ctx.ships.remove_id(ship.id());
        }
    })
}

fn between(rng: &mut StdRng, min: f64, max: f64) -> f64 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}
