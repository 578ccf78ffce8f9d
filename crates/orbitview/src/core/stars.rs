use super::rng::Rng;

/// A background star in normalized screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Horizontal position in [0, 1].
    pub x: f32,
    /// Vertical position in [0, 1].
    pub y: f32,
    /// Twinkle rate (radians per second).
    pub pulse: f32,
    pub phase: f32,
}

impl Star {
    /// Brightness at `t` seconds, always within [0.35, 1.0].
    pub fn twinkle(&self, t: f32) -> f32 {
        0.35 + 0.65 * (0.5 + 0.5 * (t * self.pulse + self.phase).sin())
    }
}

/// Immutable star set generated once from a seed.
#[derive(Debug, Clone)]
pub struct StarField {
    stars: Vec<Star>,
}

impl StarField {
    const MIN_PULSE: f32 = 0.6;
    const MAX_PULSE: f32 = 2.6;

    pub fn generate(seed: u64, count: usize) -> Self {
        let mut rng = Rng::new(seed);
        let stars = (0..count)
            .map(|_| Star {
                x: rng.next_f32(),
                y: rng.next_f32(),
                pulse: rng.range_f32(Self::MIN_PULSE, Self::MAX_PULSE),
                phase: rng.range_f32(0.0, std::f32::consts::TAU),
            })
            .collect();
        Self { stars }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}
