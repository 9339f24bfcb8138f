use std::rc::Rc;

use rand::rngs::StdRng;
use rand::Rng;
use worldorder::objects::{
    behavior, face_direction, movement, object_collision, reaction, reflect_within,
};
use worldorder::{
    vec2, Behavior, Behaviors, Button, Canvas, Color, Input, Layers, Object, ObjectHandle, Rect,
    Scene, SceneResult, ShapeDrawable, Vec2,
};

use super::Transition;

const LAYER_BACKDROP: usize = 0;
const LAYER_FALLING: usize = 1;
const LAYER_PLAYER: usize = 2;
const LAYER_COUNT: usize = 3;

const TAG_PLAYER: &str = "player";
const TAG_HAZARD: &str = "hazard";
const TAG_COIN: &str = "coin";
const TAG_STAR: &str = "star";

const PLAYER_SIZE: f64 = 24.0;
const PLAYER_SPEED: f64 = 260.0;
const HAZARD_SIZE: f64 = 18.0;
const COIN_SIZE: f64 = 12.0;
const COIN_CHANCE: f64 = 0.3;
const FALL_SPEED: f64 = 90.0;
const FALL_SPEEDUP_PER_SECOND: f64 = 4.0;
const DRIFT_SPEED: f64 = 40.0;
const SPAWN_INTERVAL: f64 = 0.6;
const STAR_COUNT: usize = 30;
const STAR_SIZE: f64 = 2.0;
const STAR_SPEED: f64 = 25.0;
const PAD: f64 = 10.0;
const SCORE_PIP: f64 = 6.0;

const PLAYER_COLOR: Color = Color::rgb(0xe2, 0x4c, 0x6b);
const HAZARD_COLOR: Color = Color::rgb(0xd0, 0xd0, 0xd0);
const COIN_COLOR: Color = Color::rgb(0xf2, 0xb1, 0x34);
const STAR_COLOR: Color = Color::rgba(0xff, 0xff, 0xff, 0x60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Falling {
    Hazard,
    Coin,
}

struct PlayCtx {
    layers: Rc<Layers<PlayCtx>>,
    bounds: Rect,
    /// -1 left, 0 idle, 1 right.
    steer: f64,
    score: u32,
    hit: bool,
}

/// Dodge the falling blocks and catch coins. Arrows or A/D steer, Escape
/// gives up.
pub(crate) struct PlayScene {
    ctx: PlayCtx,
    rng: StdRng,
    player: ObjectHandle<PlayCtx>,
    spawn_timer: f64,
    elapsed: f64,
}

impl PlayScene {
    pub(crate) fn new(bounds: Rect, mut rng: StdRng) -> Self {
        let layers = Rc::new(Layers::new(LAYER_COUNT));

        for _ in 0..STAR_COUNT {
            let pos = vec2(
                rng.random_range(bounds.min.x..bounds.max.x),
                rng.random_range(bounds.min.y..bounds.max.y),
            );
            layers[LAYER_BACKDROP].spawn(star(pos));
        }

        let player = layers[LAYER_PLAYER].spawn(player_object(bounds));

        Self {
            ctx: PlayCtx {
                layers,
                bounds,
                steer: 0.0,
                score: 0,
                hit: false,
            },
            rng,
            player,
            spawn_timer: SPAWN_INTERVAL,
            elapsed: 0.0,
        }
    }

    fn spawn_random(&mut self) {
        let kind = if self.rng.random::<f64>() < COIN_CHANCE {
            Falling::Coin
        } else {
            Falling::Hazard
        };
        let size = match kind {
            Falling::Hazard => HAZARD_SIZE,
            Falling::Coin => COIN_SIZE,
        };
        let bounds = self.ctx.bounds;
        let pos = vec2(
            self.rng.random_range(bounds.min.x..(bounds.max.x - size).max(bounds.min.x + 1.0)),
            bounds.max.y,
        );
        let velocity = vec2(
            self.rng.random_range(-DRIFT_SPEED..=DRIFT_SPEED),
            -(FALL_SPEED + FALL_SPEEDUP_PER_SECOND * self.elapsed),
        );
        self.spawn_falling(kind, pos, velocity);
    }

    fn spawn_falling(&self, kind: Falling, pos: Vec2, velocity: Vec2) -> ObjectHandle<PlayCtx> {
        let object = match kind {
            Falling::Hazard => Object::new()
                .with_tag(TAG_HAZARD)
                .with_size(vec2(HAZARD_SIZE, HAZARD_SIZE))
                .with_drawable(Rc::new(ShapeDrawable::filled(HAZARD_COLOR)))
                .with_post_steps(Behaviors::from(vec![
                    object_collision(
                        self.player.clone(),
                        reaction(|_hazard, _player, _dt, ctx: &mut PlayCtx| ctx.hit = true),
                    ),
                    face_direction(),
                    reflect_within(|ctx: &PlayCtx| side_walls(ctx.bounds)),
                    remove_below(),
                ])),
            Falling::Coin => Object::new()
                .with_tag(TAG_COIN)
                .with_size(vec2(COIN_SIZE, COIN_SIZE))
                .with_drawable(Rc::new(ShapeDrawable::filled(COIN_COLOR)))
                .with_post_steps(Behaviors::new().with(remove_below())),
        };
        self.ctx.layers[LAYER_FALLING].spawn(
            object
                .at(pos)
                .with_velocity(velocity)
                .with_steps(Behaviors::new().with(movement())),
        )
    }
}

impl Scene<Transition> for PlayScene {
    fn update(&mut self, dt: f64, input: &dyn Input) -> SceneResult<Transition> {
        if input.just_pressed(Button::Escape) {
            return SceneResult::App(Transition::Title);
        }

        self.ctx.steer = steer_from(input);
        self.elapsed += dt;
        self.spawn_timer -= dt;
        if self.spawn_timer <= 0.0 {
            self.spawn_random();
            self.spawn_timer += SPAWN_INTERVAL;
        }

        let layers = Rc::clone(&self.ctx.layers);
        layers.update(dt, &mut self.ctx);

        if self.ctx.hit {
            return SceneResult::App(Transition::GameOver {
                score: self.ctx.score,
            });
        }
        SceneResult::Continue
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        self.ctx.layers.draw(canvas);

        let top = self.ctx.bounds.max.y - PAD;
        for index in 0..self.ctx.score {
            let x = self.ctx.bounds.min.x + PAD + f64::from(index) * SCORE_PIP * 1.5;
            canvas.fill_rect(Rect::new(x, top - SCORE_PIP, x + SCORE_PIP, top), COIN_COLOR);
        }
    }
}

fn steer_from(input: &dyn Input) -> f64 {
    let left = input.pressed(Button::ArrowLeft) || input.pressed(Button::KeyA);
    let right = input.pressed(Button::ArrowRight) || input.pressed(Button::KeyD);
    match (left, right) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

/// The play area stretched far past the top and bottom, so only the side
/// walls reflect.
fn side_walls(bounds: Rect) -> Rect {
    Rect::new(
        bounds.min.x,
        bounds.min.y - bounds.h() * 4.0,
        bounds.max.x,
        bounds.max.y + bounds.h() * 4.0,
    )
}

fn player_object(bounds: Rect) -> Object<PlayCtx> {
    Object::new()
        .with_tag(TAG_PLAYER)
        .at(vec2(
            bounds.center().x - PLAYER_SIZE * 0.5,
            bounds.min.y + PAD,
        ))
        .with_size(vec2(PLAYER_SIZE, PLAYER_SIZE))
        .with_drawable(Rc::new(ShapeDrawable::filled(PLAYER_COLOR)))
        .with_steps(Behaviors::from(vec![player_steer(), movement(), keep_inside()]))
        .with_post_steps(Behaviors::new().with(collect_coins()))
}

fn player_steer() -> Behavior<PlayCtx> {
    behavior(|player: &mut Object<PlayCtx>, _dt, ctx: &mut PlayCtx| {
        player.velocity = vec2(ctx.steer * PLAYER_SPEED, 0.0);
    })
}

fn keep_inside() -> Behavior<PlayCtx> {
    behavior(|player: &mut Object<PlayCtx>, _dt, ctx: &mut PlayCtx| {
        let max_x = (ctx.bounds.max.x - player.size.x).max(ctx.bounds.min.x);
        player.pos.x = player.pos.x.clamp(ctx.bounds.min.x, max_x);
    })
}

fn collect_coins() -> Behavior<PlayCtx> {
    behavior(|player: &mut Object<PlayCtx>, _dt, ctx: &mut PlayCtx| {
        let layers = Rc::clone(&ctx.layers);
        let caught: Vec<_> = layers
            .tagged(TAG_COIN)
            .filter(|coin| coin.try_borrow().is_ok_and(|coin| player.collides(&coin)))
            .collect();
        for coin in caught {
            if layers[LAYER_FALLING].remove(&coin) {
                ctx.score += 1;
            }
        }
    })
}

fn remove_below() -> Behavior<PlayCtx> {
    behavior(|object: &mut Object<PlayCtx>, _dt, ctx: &mut PlayCtx| {
        if object.bounds().max.y < ctx.bounds.min.y {
            ctx.layers[LAYER_FALLING].remove_id(object.id());
        }
    })
}

fn star(pos: Vec2) -> Object<PlayCtx> {
    Object::new()
        .with_tag(TAG_STAR)
        .at(pos)
        .with_size(vec2(STAR_SIZE, STAR_SIZE))
        .with_velocity(vec2(0.0, -STAR_SPEED))
        .with_drawable(Rc::new(ShapeDrawable::filled(STAR_COLOR)))
        .with_steps(Behaviors::from(vec![
            movement(),
            behavior(|star: &mut Object<PlayCtx>, _dt, ctx: &mut PlayCtx| {
                if star.pos.y + star.size.y < ctx.bounds.min.y {
                    star.pos.y = ctx.bounds.max.y;
                }
            }),
        ]))
}
