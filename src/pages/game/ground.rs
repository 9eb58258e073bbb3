/// Two ground tiles scrolling left, each jumping behind the other once it
/// leaves the screen.
#[derive(Debug, Clone)]
pub struct Ground {
    y: f32,
    width: f32,
    velocity: f32,
    x1: f32,
    x2: f32,
}

impl Ground {
    pub fn new(y: f32, width: u32, velocity: f32) -> Self {
        let width = width as f32;
        Ground { y, width, velocity, x1: 0.0, x2: width }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn tiles(&self) -> [f32; 2] {
        [self.x1, self.x2]
    }

    pub fn advance(&mut self) {
        self.x1 -= self.velocity;
        self.x2 -= self.velocity;

        if self.x1 + self.width < 0.0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0.0 {
            self.x2 = self.x1 + self.width;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_tiles_start_contiguous() {
        let ground = Ground::new(730.0, 672, 5.0);
        assert_eq!(ground.tiles(), [0.0, 672.0]);
        assert_eq!(ground.y(), 730.0);
    }

    #[test]
    fn test_wrap_lands_exactly_behind_other_tile() {
        let mut ground = Ground::new(730.0, 672, 5.0);
        let mut wraps = 0;
        for _ in 0..100_000 {
            let [before1, before2] = ground.tiles();
            ground.advance();
            let [x1, x2] = ground.tiles();

            if x1 > before1 {
                wraps += 1;
                assert_eq!(x1, x2 + 672.0);
            }
            if x2 > before2 {
                wraps += 1;
                assert_eq!(x2, x1 + 672.0);
            }
            assert_eq!((x1 - x2).abs(), 672.0);
            assert!(x1.min(x2) <= 0.0 && x1.min(x2) >= -672.0);
        }
        assert!(wraps > 700);
    }

    #[test]
    fn test_wrap_happens_only_after_right_edge_passes_zero() {
        let mut ground = Ground::new(730.0, 10, 5.0);
        ground.advance();
        ground.advance();
        // Right edge of the first tile is exactly at zero: still on screen.
        assert_eq!(ground.tiles(), [-10.0, 0.0]);
        ground.advance();
        assert_eq!(ground.tiles(), [5.0, -5.0]);
    }
}
