use std::path::Path;

use color_eyre::eyre::{eyre, Result, WrapErr};
use image::{Rgba, RgbaImage};
use tracing::info;

use crate::pages::game::sprite::Sprite;

const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

const BIRD_BODY: Rgba<u8> = Rgba([245, 200, 66, 255]);
const BIRD_BELLY: Rgba<u8> = Rgba([250, 235, 160, 255]);
const BIRD_WING: Rgba<u8> = Rgba([215, 165, 35, 255]);
const BIRD_EYE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BIRD_PUPIL: Rgba<u8> = Rgba([20, 20, 20, 255]);
const BIRD_BEAK: Rgba<u8> = Rgba([225, 75, 35, 255]);
const OUTLINE: Rgba<u8> = Rgba([40, 30, 20, 255]);

const PIPE_DARK: Rgba<u8> = Rgba([74, 122, 26, 255]);
const PIPE_MID: Rgba<u8> = Rgba([100, 170, 40, 255]);
const PIPE_LIGHT: Rgba<u8> = Rgba([145, 215, 62, 255]);

const GRASS: Rgba<u8> = Rgba([84, 168, 55, 255]);
const GRASS_LIGHT: Rgba<u8> = Rgba([110, 200, 70, 255]);
const DIRT: Rgba<u8> = Rgba([222, 216, 149, 255]);
const DIRT_DARK: Rgba<u8> = Rgba([200, 190, 120, 255]);

const SKY_TOP: Rgba<u8> = Rgba([70, 180, 200, 255]);
const SKY_BOTTOM: Rgba<u8> = Rgba([190, 232, 245, 255]);
const CLOUD: Rgba<u8> = Rgba([235, 248, 250, 255]);
const CITY: Rgba<u8> = Rgba([160, 210, 190, 255]);

const BIRD_FILES: [&str; 3] = ["bird1.png", "bird2.png", "bird3.png"];
const PIPE_FILE: &str = "pipe.png";
const BASE_FILE: &str = "base.png";
const BACKGROUND_FILE: &str = "bg.png";

/// Every bitmap the game draws or collides with, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Assets {
    pub bird: [Sprite; 3],
    pub pipe_top: Sprite,
    pub pipe_bottom: Sprite,
    pub base: Sprite,
    pub background: Sprite,
}

impl Assets {
    /// Procedurally painted sprites, drawn at half size and doubled like the
    /// file based ones.
    pub fn builtin() -> Self {
        let bird = [0, 1, 2].map(|frame| Sprite::new(paint_bird(frame)).scale2x());
        let pipe_bottom = Sprite::new(paint_pipe()).scale2x();
        Assets {
            bird,
            pipe_top: pipe_bottom.flipped_vertical(),
            pipe_bottom,
            base: Sprite::new(paint_base()).scale2x(),
            background: Sprite::new(paint_background()).scale2x(),
        }
    }

    /// Loads the PNG sprite set from `dir`. Every file is required.
    pub fn load(dir: &Path) -> Result<Self> {
        let load = |name: &str| -> Result<Sprite> {
            let path = dir.join(name);
            let image =
                image::open(&path).wrap_err_with(|| format!("failed to load sprite {}", path.display()))?.to_rgba8();
            if image.width() == 0 || image.height() == 0 {
                return Err(eyre!("sprite {} is empty", path.display()));
            }
            Ok(Sprite::new(image).scale2x())
        };

        let [first, second, third] = BIRD_FILES;
        let bird = [load(first)?, load(second)?, load(third)?];
        let pipe_bottom = load(PIPE_FILE)?;
        let assets = Assets {
            bird,
            pipe_top: pipe_bottom.flipped_vertical(),
            pipe_bottom,
            base: load(BASE_FILE)?,
            background: load(BACKGROUND_FILE)?,
        };
        info!(dir = %dir.display(), "loaded sprites");

        Ok(assets)
    }

    pub fn bird_frame(&self, frame: usize) -> &Sprite {
        &self.bird[frame % self.bird.len()]
    }
}

fn inside_ellipse(x: u32, y: u32, cx: f32, cy: f32, rx: f32, ry: f32) -> bool {
    let dx = (x as f32 + 0.5 - cx) / rx;
    let dy = (y as f32 + 0.5 - cy) / ry;
    dx * dx + dy * dy <= 1.0
}

/// 34x24 bird, `frame` picks the wing position (up, level, down).
fn paint_bird(frame: usize) -> RgbaImage {
    let wing_cy = [8.5, 12.0, 15.5][frame.min(2)];

    RgbaImage::from_fn(34, 24, |x, y| {
        if (26..33).contains(&x) && (12..17).contains(&y) {
            return if y == 14 { OUTLINE } else { BIRD_BEAK };
        }
        if inside_ellipse(x, y, 23.0, 8.0, 4.5, 4.5) {
            return if inside_ellipse(x, y, 24.5, 8.5, 1.8, 1.8) { BIRD_PUPIL } else { BIRD_EYE };
        }
        if inside_ellipse(x, y, 9.0, wing_cy, 6.5, 3.5) {
            return BIRD_WING;
        }
        if inside_ellipse(x, y, 16.0, 12.0, 13.0, 10.0) {
            if !inside_ellipse(x, y, 16.0, 12.0, 12.0, 9.0) {
                return OUTLINE;
            }
            return if y > 14 { BIRD_BELLY } else { BIRD_BODY };
        }
        CLEAR
    })
}

fn pipe_shade(x: u32, width: u32) -> Rgba<u8> {
    match x * 8 / width {
        0 => PIPE_DARK,
        1 | 2 => PIPE_MID,
        3 => PIPE_LIGHT,
        4 | 5 => PIPE_MID,
        _ => PIPE_DARK,
    }
}

/// 52x320 pipe with its cap at the top, the shape of a bottom segment.
fn paint_pipe() -> RgbaImage {
    const CAP_HEIGHT: u32 = 13;
    const BODY_INSET: u32 = 2;

    RgbaImage::from_fn(52, 320, |x, y| {
        if y < CAP_HEIGHT {
            if y == 0 || y == CAP_HEIGHT - 1 || x == 0 || x == 51 {
                return OUTLINE;
            }
            return pipe_shade(x, 52);
        }
        if x < BODY_INSET || x >= 52 - BODY_INSET {
            return CLEAR;
        }
        if x == BODY_INSET || x == 51 - BODY_INSET {
            return OUTLINE;
        }
        pipe_shade(x - BODY_INSET, 52 - BODY_INSET * 2)
    })
}

/// 336x112 ground tile; the stripe period divides the width so tiles join.
fn paint_base() -> RgbaImage {
    RgbaImage::from_fn(336, 112, |x, y| match y {
        0 => OUTLINE,
        1..=8 => {
            if (x + y) % 12 < 6 {
                GRASS_LIGHT
            } else {
                GRASS
            }
        },
        9 => GRASS,
        10 => DIRT_DARK,
        _ => {
            if (x + y * 2) % 24 < 3 {
                DIRT_DARK
            } else {
                DIRT
            }
        },
    })
}

fn lerp(a: Rgba<u8>, b: Rgba<u8>, t: f32) -> Rgba<u8> {
    let mix = |i: usize| (a.0[i] as f32 + (b.0[i] as f32 - a.0[i] as f32) * t).round() as u8;
    Rgba([mix(0), mix(1), mix(2), 255])
}

/// 250x400 sky with clouds and a city skyline near the horizon.
fn paint_background() -> RgbaImage {
    RgbaImage::from_fn(250, 400, |x, y| {
        // Blocky skyline, building height changes every 14px
        let building = 30 + (x / 14 * 7919) % 40;
        if y >= 365 - building {
            return CITY;
        }
        let puff = |cx: f32, cy: f32| {
            inside_ellipse(x, y, cx, cy, 22.0, 8.0) || inside_ellipse(x, y, cx + 18.0, cy - 5.0, 16.0, 9.0)
        };
        if puff(40.0, 280.0) || puff(150.0, 300.0) || puff(230.0, 270.0) {
            return CLOUD;
        }
        lerp(SKY_TOP, SKY_BOTTOM, y as f32 / 400.0)
    })
}
