//! Demo scenes and the transition table between them.

mod play;
mod swarm;
mod title;

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};
use worldorder::{Canvas, SceneError, SceneRegistry, SceneResult};

pub(crate) use play::PlayScene;
pub(crate) use swarm::{SwarmConfig, SwarmScene};
pub(crate) use title::TitleScene;

pub(crate) const SCENE_TITLE: &str = "title";
pub(crate) const SCENE_PLAY: &str = "play";
pub(crate) const SCENE_SWARM: &str = "swarm";

/// Codes the demo scenes hand back to the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    Title,
    Play,
    Swarm,
    GameOver { score: u32 },
    Quit,
}

/// State that outlives a single scene run.
#[derive(Debug)]
pub(crate) struct Session {
    rng: StdRng,
    last_score: Option<u32>,
    best_score: u32,
}

impl Session {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            last_score: None,
            best_score: 0,
        }
    }

    /// Independent generator for one scene run, derived from the session seed.
    pub(crate) fn scene_rng(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.rng.random())
    }

    pub(crate) fn last_score(&self) -> Option<u32> {
        self.last_score
    }

    pub(crate) fn best_score(&self) -> u32 {
        self.best_score
    }

    pub(crate) fn record_score(&mut self, score: u32) {
        self.last_score = Some(score);
        self.best_score = self.best_score.max(score);
    }
}

pub(crate) type SharedSession = Rc<RefCell<Session>>;

pub(crate) fn build_registry(
    session: &SharedSession,
    swarm: SwarmConfig,
) -> SceneRegistry<Transition> {
    let title_session = Rc::clone(session);
    let play_session = Rc::clone(session);
    let swarm_session = Rc::clone(session);

    SceneRegistry::new()
        .with(SCENE_TITLE, move |canvas: &mut dyn Canvas| {
            let session = title_session.borrow();
            Ok(TitleScene::new(
                canvas.bounds(),
                session.last_score(),
                session.best_score(),
            ))
        })
        .with(SCENE_PLAY, move |canvas: &mut dyn Canvas| {
            let rng = play_session.borrow_mut().scene_rng();
            Ok(PlayScene::new(canvas.bounds(), rng))
        })
        .with(SCENE_SWARM, move |canvas: &mut dyn Canvas| {
            swarm.validate().map_err(SceneError::msg)?;
            let rng = swarm_session.borrow_mut().scene_rng();
            Ok(SwarmScene::new(canvas.bounds(), swarm.clone(), rng))
        })
}

/// Next scene after `from` finished with `result`, `None` to stop. A failed
/// scene falls back to the title, unless the title itself failed.
pub(crate) fn route(
    session: &SharedSession,
    from: &str,
    result: SceneResult<Transition>,
) -> Option<String> {
    match result {
        SceneResult::App(transition) => follow(session, transition),
        SceneResult::Error if from != SCENE_TITLE => {
            warn!(scene = from, "scene_failed_returning_to_title");
            Some(SCENE_TITLE.to_string())
        }
        _ => None,
    }
}

fn follow(session: &SharedSession, transition: Transition) -> Option<String> {
    let next = match transition {
        Transition::Title => SCENE_TITLE,
        Transition::Play => SCENE_PLAY,
        Transition::Swarm => SCENE_SWARM,
        Transition::GameOver { score } => {
            let mut session = session.borrow_mut();
            session.record_score(score);
            info!(score, best = session.best_score(), "game_over");
            SCENE_TITLE
        }
        Transition::Quit => return None,
    };
    Some(next.to_string())
}
