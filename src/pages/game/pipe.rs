use rand::Rng;

/// Geometry shared by every pipe of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeLayout {
    pub gap: f32,
    pub min_height: u32,
    pub max_height: u32,
    pub width: u32,
    pub segment_height: u32,
    pub velocity: f32,
}

#[derive(Debug, Clone)]
pub struct Pipe {
    x: f32,
    height: f32,
    top: f32,
    bottom: f32,
    width: u32,
    velocity: f32,
    passed: bool,
}

impl Pipe {
    pub fn new<R: Rng + ?Sized>(x: f32, layout: &PipeLayout, rng: &mut R) -> Self {
        let height = rng.gen_range(layout.min_height..layout.max_height) as f32;
        Self::with_height(x, height, layout)
    }

    pub fn with_height(x: f32, height: f32, layout: &PipeLayout) -> Self {
        Pipe {
            x,
            height,
            top: height - layout.segment_height as f32,
            bottom: height + layout.gap,
            width: layout.width,
            velocity: layout.velocity,
            passed: false,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    /// Gap center, the lower edge of the top segment.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn advance(&mut self) {
        self.x -= self.velocity;
    }

    /// Flags the pipe as passed the first time the bird is past its left edge.
    /// Returns true only on that first call.
    pub fn mark_passed(&mut self, bird_x: f32) -> bool {
        if !self.passed && self.x < bird_x {
            self.passed = true;
            return true;
        }
        false
    }

    pub fn is_off_screen(&self) -> bool {
        self.x + (self.width as f32) < 0.0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn layout() -> PipeLayout {
        PipeLayout { gap: 200.0, min_height: 50, max_height: 450, width: 104, segment_height: 640, velocity: 5.0 }
    }

    #[test]
    fn test_gap_is_structural() {
        let layout = layout();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let pipe = Pipe::new(600.0, &layout, &mut rng);
            assert!((50.0..450.0).contains(&pipe.height()));
            assert_eq!(pipe.bottom() - pipe.top(), 840.0);
            assert_eq!(pipe.top(), pipe.height() - 640.0);
        }
    }

    #[test]
    fn test_advance_uses_layout_velocity() {
        let mut pipe = Pipe::with_height(600.0, 200.0, &layout());
        for frame in 1..=30 {
            pipe.advance();
            assert_eq!(pipe.x(), 600.0 - 5.0 * frame as f32);
        }
    }

    #[test]
    fn test_passed_flips_once() {
        let mut pipe = Pipe::with_height(240.0, 200.0, &layout());
        assert!(!pipe.mark_passed(230.0));
        pipe.advance();
        assert!(!pipe.mark_passed(230.0));
        pipe.advance();
        assert!(!pipe.passed());

        pipe.advance();
        assert!(pipe.mark_passed(230.0));
        assert!(pipe.passed());
        for _ in 0..10 {
            pipe.advance();
            assert!(!pipe.mark_passed(230.0));
        }
    }

    #[test]
    fn test_off_screen_is_strict() {
        let layout = layout();
        let at_edge = Pipe::with_height(-104.0, 200.0, &layout);
        assert!(!at_edge.is_off_screen());

        let past_edge = Pipe::with_height(-105.0, 200.0, &layout);
        assert!(past_edge.is_off_screen());
    }
}
