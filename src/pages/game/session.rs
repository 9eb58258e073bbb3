use std::{collections::VecDeque, sync::Arc};

use rand::{rngs::StdRng, SeedableRng};
use strum::Display;
use tracing::{debug, info};

use super::{
    bird::Bird,
    collision,
    ground::Ground,
    pipe::{Pipe, PipeLayout},
};
use crate::{assets::Assets, config::GameConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Obstacle {
    Pipe,
    Ground,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EndReason {
    Collision(Obstacle),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Ended(EndReason),
}

/// Input collected since the previous tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub impulse: bool,
    pub quit: bool,
}

/// One run of the game: bird, pipes, ground and score.
pub struct Session {
    assets: Arc<Assets>,
    layout: PipeLayout,
    pipe_spawn_x: f32,
    ground_y: f32,
    rng: StdRng,
    bird: Bird,
    pipes: VecDeque<Pipe>,
    ground: Ground,
    score: u32,
    frame: u64,
    state: State,
}

impl Session {
    pub fn new(config: &GameConfig, assets: Arc<Assets>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let layout = PipeLayout {
            gap: config.pipe_gap,
            min_height: config.pipe_min_height,
            max_height: config.pipe_max_height,
            width: assets.pipe_top.width(),
            segment_height: assets.pipe_top.height(),
            velocity: config.scroll_velocity,
        };
        let ground = Ground::new(config.ground_y, assets.base.width(), config.scroll_velocity);

        let mut session = Session {
            assets,
            layout,
            pipe_spawn_x: config.pipe_spawn_x,
            ground_y: config.ground_y,
            rng,
            bird: Bird::new(config.bird_x, config.bird_y),
            pipes: VecDeque::new(),
            ground,
            score: 0,
            frame: 0,
            state: State::Running,
        };
        session.spawn_pipe(config.first_pipe_x);
        session
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn pipes(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }

    pub fn ground(&self) -> &Ground {
        &self.ground
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    fn spawn_pipe(&mut self, x: f32) {
        let pipe = Pipe::new(x, &self.layout, &mut self.rng);
        debug!(x, height = pipe.height(), "spawned pipe");
        self.pipes.push_back(pipe);
    }

    pub fn quit(&mut self) {
        self.end(EndReason::Quit);
    }

    /// Advances the simulation by one frame. Does nothing once ended.
    pub fn tick(&mut self, controls: Controls) {
        if !self.is_running() {
            return;
        }
        if controls.quit {
            self.quit();
            return;
        }
        if controls.impulse {
            self.bird.jump();
        }

        self.bird.advance();

        // Tests run on the geometry of the frame the player last saw, so every
        // pipe is checked before it moves.
        let pose = self.bird.pose(&self.assets);
        let mut hit = None;
        let mut passed = false;
        let mut expired = Vec::new();
        for (index, pipe) in self.pipes.iter_mut().enumerate() {
            if collision::pipe_collision(&pose, pipe, &self.assets) {
                hit = Some(Obstacle::Pipe);
            }
            if pipe.is_off_screen() {
                expired.push(index);
            }
            if pipe.mark_passed(self.bird.x()) {
                passed = true;
            }
            pipe.advance();
        }

        if passed {
            self.score += 1;
            debug!(score = self.score, "pipe passed");
            self.spawn_pipe(self.pipe_spawn_x);
        }

        if !expired.is_empty() {
            let mut index = 0;
            self.pipes.retain(|_| {
                let keep = !expired.contains(&index);
                index += 1;
                keep
            });
        }

        if hit.is_none() && collision::ground_collision(&self.bird, &self.assets, self.ground_y) {
            hit = Some(Obstacle::Ground);
        }
        self.ground.advance();
        self.bird.animate();
        self.frame += 1;

        if let Some(obstacle) = hit {
            self.end(EndReason::Collision(obstacle));
        }
    }

    fn end(&mut self, reason: EndReason) {
        if self.is_running() {
            info!(%reason, score = self.score, frame = self.frame, "session ended");
            self.state = State::Ended(reason);
        }
    }
}
