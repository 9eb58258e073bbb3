use image::RgbaImage;

use crate::{
    assets::Assets,
    constants::game::MASK_ALPHA_THRESHOLD,
    pages::game::{
        bird::{Bird, Pose},
        pipe::Pipe,
    },
};

/// Per-pixel opacity of a sprite, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Mask { width, height, bits: vec![false; (width * height) as usize] }
    }

    pub fn from_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let bits = image.pixels().map(|pixel| pixel.0[3] > MASK_ALPHA_THRESHOLD).collect();
        Mask { width, height, bits }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x < self.width && y < self.height {
            self.bits[(y * self.width + x) as usize] = value;
        }
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    /// First pixel, in `self` coordinates, where both masks are opaque when
    /// `other`'s top-left corner sits at `offset` relative to ours.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(u32, u32)> {
        let (dx, dy) = offset;

        let left = dx.max(0);
        let top = dy.max(0);
        let right = (dx + other.width as i32).min(self.width as i32);
        let bottom = (dy + other.height as i32).min(self.height as i32);

        for y in top..bottom {
            for x in left..right {
                let (x, y) = (x as u32, y as u32);
                if self.get(x, y) && other.get((x as i32 - dx) as u32, (y as i32 - dy) as u32) {
                    return Some((x, y));
                }
            }
        }
        None
    }
}

/// Whether the bird's current silhouette touches either segment of `pipe`.
pub fn pipe_collision(pose: &Pose, pipe: &Pipe, assets: &Assets) -> bool {
    let bird_mask = pose.sprite.mask();
    let x = pipe.x().round() as i32 - pose.x;
    let top_offset = (x, pipe.top().round() as i32 - pose.y);
    let bottom_offset = (x, pipe.bottom().round() as i32 - pose.y);

    bird_mask.overlap(assets.pipe_bottom.mask(), bottom_offset).is_some()
        || bird_mask.overlap(assets.pipe_top.mask(), top_offset).is_some()
}

pub fn ground_collision(bird: &Bird, assets: &Assets, ground_y: f32) -> bool {
    bird.y() + assets.bird_frame(bird.frame()).height() as f32 >= ground_y
}

#[cfg(test)]
mod tests {
    use image::Rgba;
    use pretty_assertions::assert_eq;

    use super::*;

    fn filled(width: u32, height: u32) -> Mask {
        let mut mask = Mask::new(width, height);
        for y in 0..height {
            for x in 0..width {
                mask.set(x, y, true);
            }
        }
        mask
    }

    #[test]
    fn test_mask_alpha_threshold() {
        let image = RgbaImage::from_fn(3, 1, |x, _| match x {
            0 => Rgba([255, 255, 255, 0]),
            1 => Rgba([255, 255, 255, 127]),
            _ => Rgba([255, 255, 255, 128]),
        });
        let mask = Mask::from_image(&image);
        assert_eq!((mask.get(0, 0), mask.get(1, 0), mask.get(2, 0)), (false, false, true));
    }

    #[test]
    fn test_full_overlap_at_zero_offset() {
        let bird = filled(68, 48);
        let pipe = filled(104, 640);
        assert_eq!(bird.overlap(&pipe, (0, 0)), Some((0, 0)));
    }

    #[test]
    fn test_disjoint_masks_do_not_overlap() {
        let bird = filled(68, 48);
        let pipe = filled(104, 640);
        assert_eq!(bird.overlap(&pipe, (68, 0)), None);
        assert_eq!(bird.overlap(&pipe, (0, 48)), None);
        assert_eq!(bird.overlap(&pipe, (-104, 0)), None);
        assert_eq!(bird.overlap(&pipe, (0, -640)), None);
    }

    #[test]
    fn test_edge_pixels_touch() {
        let bird = filled(68, 48);
        let pipe = filled(104, 640);
        assert_eq!(bird.overlap(&pipe, (67, 47)), Some((67, 47)));
        assert_eq!(bird.overlap(&pipe, (-103, -639)), Some((0, 0)));
    }

    #[test]
    fn test_transparent_pixels_do_not_collide() {
        // Ring of opaque pixels with a transparent hole in the middle.
        let mut ring = filled(5, 5);
        for y in 1..4 {
            for x in 1..4 {
                ring.set(x, y, false);
            }
        }
        let dot = filled(1, 1);

        assert_eq!(ring.overlap(&dot, (2, 2)), None);
        assert_eq!(ring.overlap(&dot, (0, 2)), Some((0, 2)));
        // Bounding boxes overlap here, the opaque pixels do not.
        let corner = {
            let mut mask = Mask::new(2, 2);
            mask.set(1, 1, true);
            mask
        };
        assert_eq!(filled(2, 2).overlap(&corner, (1, 1)), None);
    }
}
