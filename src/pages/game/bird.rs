use crate::{
    assets::Assets,
    constants::game::{
        ANIMATION_TIME, GRAVITY, JUMP_BOOST, JUMP_VELOCITY, MAX_ROTATION, MIN_ROTATION, NOSE_DIVE_ROTATION, ROT_VEL,
        TERMINAL_VELOCITY, TILT_HOLD_DISTANCE,
    },
    pages::game::sprite::Sprite,
};

/// Vertical displacement `ticks` frames after an impulse of `velocity`,
/// before the terminal-velocity clamp and the rise boost.
pub fn displacement(velocity: f32, ticks: u32) -> f32 {
    let t = ticks as f32;
    velocity * t + GRAVITY * t * t
}

/// The rotated sprite of the bird and where its top-left corner is drawn.
#[derive(Debug, Clone)]
pub struct Pose {
    pub sprite: Sprite,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone)]
pub struct Bird {
    x: f32,
    y: f32,
    tilt: f32,
    tick_count: u32,
    velocity: f32,
    height: f32,
    last_displacement: f32,
    frame_count: u32,
    frame: usize,
}

impl Bird {
    pub fn new(x: f32, y: f32) -> Self {
        Bird {
            x,
            y,
            tilt: 0.0,
            tick_count: 0,
            velocity: 0.0,
            height: y,
            last_displacement: 0.0,
            frame_count: 0,
            frame: 0,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn last_displacement(&self) -> f32 {
        self.last_displacement
    }

    pub fn jump(&mut self) {
        self.velocity = JUMP_VELOCITY;
        self.tick_count = 0;
        self.height = self.y;
    }

    pub fn advance(&mut self) {
        self.tick_count += 1;

        let mut d = displacement(self.velocity, self.tick_count);
        if d >= TERMINAL_VELOCITY {
            d = TERMINAL_VELOCITY;
        }
        if d < 0.0 {
            d -= JUMP_BOOST;
        }
        self.last_displacement = d;
        self.y += d;

        // Keep the nose up while rising or still above the pre-jump height
        if d < 0.0 || self.y < self.height + TILT_HOLD_DISTANCE {
            if self.tilt < MAX_ROTATION {
                self.tilt = MAX_ROTATION;
            }
        } else if self.tilt > MIN_ROTATION {
            self.tilt = (self.tilt - ROT_VEL).max(MIN_ROTATION);
        }
    }

    /// Steps the wing flap: frames 0, 1, 2, 1, 0 every `ANIMATION_TIME` ticks.
    pub fn animate(&mut self) {
        self.frame_count += 1;

        if self.frame_count < ANIMATION_TIME {
            self.frame = 0;
        } else if self.frame_count < ANIMATION_TIME * 2 {
            self.frame = 1;
        } else if self.frame_count < ANIMATION_TIME * 3 {
            self.frame = 2;
        } else if self.frame_count < ANIMATION_TIME * 4 {
            self.frame = 1;
        } else if self.frame_count == ANIMATION_TIME * 4 + 1 {
            self.frame = 0;
            self.frame_count = 0;
        }

        // No flapping in a nose dive
        if self.tilt <= NOSE_DIVE_ROTATION {
            self.frame = 1;
            self.frame_count = ANIMATION_TIME * 2;
        }
    }

    /// Current frame rotated by the tilt, centered on the unrotated frame.
    pub fn pose(&self, assets: &Assets) -> Pose {
        let frame = assets.bird_frame(self.frame);
        let sprite = frame.rotated(self.tilt);

        let center_x = self.x + frame.width() as f32 / 2.0;
        let center_y = self.y + frame.height() as f32 / 2.0;
        let x = (center_x - sprite.width() as f32 / 2.0).round() as i32;
        let y = (center_y - sprite.height() as f32 / 2.0).round() as i32;

        Pose { sprite, x, y }
    }
}
