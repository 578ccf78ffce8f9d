//! Closed-form orbital motion.
//!
//! Every position is a pure function of elapsed seconds plus fixed per-body
//! constants. Nothing is integrated, so seeking or replaying time is exact.
//! Angles are evaluated in f64 and narrowed to f32 at the final step.

use glam::Vec3;

use crate::api::types::BodyId;
use crate::renderer::color::Color;

/// Circular orbit with a vertical bob, relative to a parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParams {
    /// Orbit radius in world units.
    pub radius: f64,
    /// Angular rate (radians per second).
    pub rate: f64,
    /// Angle at t = 0 (radians).
    pub phase: f64,
    /// Vertical bob amplitude in world units.
    pub bob_amplitude: f64,
    /// Vertical bob rate (radians per second).
    pub bob_rate: f64,
}

impl OrbitParams {
    /// Offset from the parent body at `t` seconds.
    pub fn offset(&self, t: f64) -> Vec3 {
        let angle = self.phase + self.rate * t;
        let bob = (self.bob_rate * t + self.phase).sin() * self.bob_amplitude;
        Vec3::new(
            (angle.cos() * self.radius) as f32,
            bob as f32,
            (angle.sin() * self.radius) as f32,
        )
    }
}

/// Fixed visual properties of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyVisual {
    pub radius: f32,
    pub color: Color,
}

pub const SUN: BodyVisual = BodyVisual { radius: 1.6, color: Color::new(255, 214, 102) };
pub const PLANET_A: BodyVisual = BodyVisual { radius: 0.55, color: Color::new(88, 150, 255) };
pub const PLANET_B: BodyVisual = BodyVisual { radius: 0.85, color: Color::new(224, 120, 72) };
pub const MOON: BodyVisual = BodyVisual { radius: 0.28, color: Color::new(200, 200, 210) };

pub const PLANET_A_ORBIT: OrbitParams = OrbitParams {
    radius: 6.0,
    rate: 0.55,
    phase: 0.0,
    bob_amplitude: 0.35,
    bob_rate: 0.9,
};

pub const PLANET_B_ORBIT: OrbitParams = OrbitParams {
    radius: 10.5,
    rate: 0.28,
    phase: 2.1,
    bob_amplitude: 0.6,
    bob_rate: 0.5,
};

/// Relative to planet B.
pub const MOON_ORBIT: OrbitParams = OrbitParams {
    radius: 1.9,
    rate: 1.6,
    phase: 0.7,
    bob_amplitude: 0.2,
    bob_rate: 1.3,
};

pub fn visual(body: BodyId) -> BodyVisual {
    match body {
        BodyId::Sun => SUN,
        BodyId::PlanetA => PLANET_A,
        BodyId::PlanetB => PLANET_B,
        BodyId::Moon => MOON,
    }
}

/// World positions of all bodies for one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyPositions {
    positions: [Vec3; 4],
}

impl BodyPositions {
    pub fn get(&self, body: BodyId) -> Vec3 {
        self.positions[body.index()]
    }

    pub fn set(&mut self, body: BodyId, pos: Vec3) {
        self.positions[body.index()] = pos;
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, Vec3)> + '_ {
        BodyId::ALL.iter().map(move |&b| (b, self.get(b)))
    }
}

/// Maps elapsed time to body positions.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    sun: Vec3,
    planet_a: OrbitParams,
    planet_b: OrbitParams,
    moon: OrbitParams,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            sun: Vec3::ZERO,
            planet_a: PLANET_A_ORBIT,
            planet_b: PLANET_B_ORBIT,
            moon: MOON_ORBIT,
        }
    }
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions at `t` seconds since start.
    pub fn positions(&self, t: f64) -> BodyPositions {
        let t = if t.is_finite() { t } else { 0.0 };
        let planet_b = self.sun + self.planet_b.offset(t);

        let mut out = BodyPositions::default();
        out.set(BodyId::Sun, self.sun);
        out.set(BodyId::PlanetA, self.sun + self.planet_a.offset(t));
        out.set(BodyId::PlanetB, planet_b);
        out.set(BodyId::Moon, planet_b + self.moon.offset(t));
        out
    }

    /// Orbit ring of `body` around its parent, sampled at `segments` points
    /// (ring lies in the parent's horizontal plane; the vertical bob is omitted).
    /// The sun has no ring.
    pub fn orbit_ring(&self, body: BodyId, positions: &BodyPositions, segments: usize) -> Vec<Vec3> {
        let (center, radius) = match body {
            BodyId::Sun => return Vec::new(),
            BodyId::PlanetA => (self.sun, self.planet_a.radius),
            BodyId::PlanetB => (self.sun, self.planet_b.radius),
            BodyId::Moon => (positions.get(BodyId::PlanetB), self.moon.radius),
        };
        let segments = segments.max(8);
        (0..segments)
            .map(|i| {
                let a = i as f64 / segments as f64 * std::f64::consts::TAU;
                center + Vec3::new((a.cos() * radius) as f32, 0.0, (a.sin() * radius) as f32)
            })
            .collect()
    }
}
