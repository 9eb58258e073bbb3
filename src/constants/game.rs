pub const WIN_WIDTH: u32 = 500;
pub const WIN_HEIGHT: u32 = 800;
pub const FPS: f64 = 30.0;

// Bird
pub const JUMP_VELOCITY: f32 = -10.5;
pub const GRAVITY: f32 = 1.5;
pub const TERMINAL_VELOCITY: f32 = 16.0;
pub const JUMP_BOOST: f32 = 2.0;
pub const TILT_HOLD_DISTANCE: f32 = 50.0;
pub const MAX_ROTATION: f32 = 25.0;
pub const MIN_ROTATION: f32 = -90.0;
pub const NOSE_DIVE_ROTATION: f32 = -80.0;
pub const ROT_VEL: f32 = 20.0;
pub const ANIMATION_TIME: u32 = 5;
pub const BIRD_X: f32 = 230.0;
pub const BIRD_Y: f32 = 350.0;

// Pipes and ground share the scroll velocity
pub const SCROLL_VELOCITY: f32 = 5.0;
pub const PIPE_GAP: f32 = 200.0;
pub const PIPE_MIN_HEIGHT: u32 = 50;
pub const PIPE_MAX_HEIGHT: u32 = 450;
pub const PIPE_SPAWN_X: f32 = 600.0;
pub const FIRST_PIPE_X: f32 = 700.0;
pub const GROUND_Y: f32 = 730.0;

// Pixel alpha above which a sprite pixel counts as solid
pub const MASK_ALPHA_THRESHOLD: u8 = 127;
