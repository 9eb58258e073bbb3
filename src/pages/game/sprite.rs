use image::{imageops, Rgba, RgbaImage};

use crate::pages::game::collision::Mask;

/// A bitmap together with its opacity mask.
#[derive(Debug, Clone)]
pub struct Sprite {
    image: RgbaImage,
    mask: Mask,
}

impl Sprite {
    pub fn new(image: RgbaImage) -> Self {
        let mask = Mask::from_image(&image);
        Sprite { image, mask }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn flipped_vertical(&self) -> Sprite {
        Sprite::new(imageops::flip_vertical(&self.image))
    }

    /// Doubles the bitmap with nearest-neighbour sampling.
    pub fn scale2x(&self) -> Sprite {
        let (w, h) = self.image.dimensions();
        Sprite::new(imageops::resize(&self.image, w * 2, h * 2, imageops::FilterType::Nearest))
    }

    /// Rotates counter-clockwise by `degrees` around the bitmap center.
    ///
    /// The result grows to hold the whole rotated bitmap, uncovered pixels are
    /// transparent. Sampling is nearest-neighbour so opaque pixels stay opaque.
    pub fn rotated(&self, degrees: f32) -> Sprite {
        if degrees == 0.0 {
            return self.clone();
        }

        let (w, h) = self.image.dimensions();
        let (sin, cos) = degrees.to_radians().sin_cos();
        // trim float noise so quarter turns keep exact bounds
        let extent = |v: f32| (v - 1e-3).ceil().max(1.0) as u32;
        let out_w = extent(w as f32 * cos.abs() + h as f32 * sin.abs());
        let out_h = extent(w as f32 * sin.abs() + h as f32 * cos.abs());

        let src_cx = w as f32 / 2.0;
        let src_cy = h as f32 / 2.0;
        let dst_cx = out_w as f32 / 2.0;
        let dst_cy = out_h as f32 / 2.0;

        let image = RgbaImage::from_fn(out_w, out_h, |x, y| {
            let dx = x as f32 + 0.5 - dst_cx;
            let dy = y as f32 + 0.5 - dst_cy;
            // y grows downwards, so a visual counter-clockwise turn maps back like this
            let sx = (dx * cos - dy * sin + src_cx).floor();
            let sy = (dx * sin + dy * cos + src_cy).floor();
            if sx >= 0.0 && sy >= 0.0 && (sx as u32) < w && (sy as u32) < h {
                *self.image.get_pixel(sx as u32, sy as u32)
            } else {
                Rgba([0, 0, 0, 0])
            }
        });

        Sprite::new(image)
    }
}
