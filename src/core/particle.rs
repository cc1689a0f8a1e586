//! Particle pool for the animated background
//!
//! Every particle follows a closed-form trajectory of its own `phase`.
//! The pool is sampled once and then mutated in place every frame; only
//! `phase` ever changes after construction.

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::instances::InstanceBuffer;

// ============================================================================
// Span / FieldBounds - sampling ranges
// ============================================================================

/// Half-open sampling range `[min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Symmetric span `[-extent, extent)`
    pub const fn symmetric(extent: f32) -> Self {
        Self { min: -extent, max: extent }
    }

    /// Draw a value uniformly from the span. A zero-width span yields `min`.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    /// Whether `value` lies in the span (inclusive of `max` for zero-width spans)
    pub fn contains(&self, value: f32) -> bool {
        if self.max > self.min {
            value >= self.min && value < self.max
        } else {
            value == self.min
        }
    }

    /// Bounds are finite and not inverted
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Sampling ranges for the per-particle trajectory parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldBounds {
    /// Initial phase
    pub phase: Span,
    /// Spatial extent of the trajectory
    pub amplitude: Span,
    /// Phase advance rate (phase grows by `speed / 2` per frame)
    pub speed: Span,
    /// Half-size of the cube the orbit centers are drawn from
    pub origin_extent: f32,
}

impl Default for FieldBounds {
    fn default() -> Self {
        Self {
            phase: Span::new(0.0, 100.0),
            amplitude: Span::new(20.0, 120.0),
            speed: Span::new(0.01, 0.015),
            origin_extent: 50.0,
        }
    }
}

impl FieldBounds {
    pub fn origin(&self) -> Span {
        Span::symmetric(self.origin_extent)
    }
}

/// Upper bound on `FieldConfig::count` (6.4 MB of instance transforms)
pub const MAX_PARTICLES: usize = 100_000;

/// Size and sampling of the particle field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of particles, fixed for the lifetime of a pool. At most [`MAX_PARTICLES`].
    pub count: usize,
    pub bounds: FieldBounds,
    /// Fixed RNG seed; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            bounds: FieldBounds::default(),
            seed: None,
        }
    }
}

// ============================================================================
// Particle
// ============================================================================

/// Trajectory parameters of a single particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Elapsed animation time of this particle (unbounded)
    pub phase: f32,
    /// Scales the spatial extent of the trajectory
    amplitude: f32,
    /// Phase advance rate
    speed: f32,
    /// Center the trajectory orbits
    origin: Vec3,
}

impl Particle {
    pub fn new(phase: f32, amplitude: f32, speed: f32, origin: Vec3) -> Self {
        Self { phase, amplitude, speed, origin }
    }

    fn sample<R: Rng + ?Sized>(bounds: &FieldBounds, rng: &mut R) -> Self {
        let origin_span = bounds.origin();
        Self {
            phase: bounds.phase.sample(rng),
            amplitude: bounds.amplitude.sample(rng),
            speed: bounds.speed.sample(rng),
            origin: Vec3::new(
                origin_span.sample(rng),
                origin_span.sample(rng),
                origin_span.sample(rng),
            ),
        }
    }

    #[inline]
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Advance the particle by one frame.
    #[inline]
    pub fn advance(&mut self) {
        self.phase += self.speed / 2.0;
    }

    /// Position on the trajectory at the current phase.
    ///
    /// A slow orbital term (`phase / 10 * amplitude`) plus a faster
    /// perturbation per axis, so the path never closes into an ellipse.
    #[inline]
    pub fn position(&self) -> Vec3 {
        let p = self.phase;
        let a = self.amplitude;
        let orbit = p / 10.0 * a;
        self.origin
            + Vec3::new(
                orbit.cos() + p.sin() * a / 10.0,
                orbit.sin() + (p * 2.0).cos() * a / 10.0,
                orbit.cos() + (p * 3.0).sin() * a / 10.0,
            )
    }

    /// Uniform scale, also used as the Euler rotation factor (times 5).
    #[inline]
    pub fn pulse(&self) -> f32 {
        self.phase.cos()
    }

    /// Model matrix for the current phase.
    #[inline]
    pub fn transform(&self) -> Mat4 {
        let s = self.pulse();
        let rotation = Quat::from_euler(EulerRot::XYZ, s * 5.0, s * 5.0, s * 5.0);
        Mat4::from_scale_rotation_translation(Vec3::splat(s), rotation, self.position())
    }
}

// ============================================================================
// ParticlePool
// ============================================================================

/// Fixed-size pool of particles. Created once, updated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticlePool {
    particles: Box<[Particle]>,
}

impl ParticlePool {
    /// Sample `count` particles from `bounds`.
    pub fn new<R: Rng + ?Sized>(count: usize, bounds: &FieldBounds, rng: &mut R) -> Self {
        let particles: Box<[Particle]> = (0..count).map(|_| Particle::sample(bounds, rng)).collect();
        debug!(count, "Particle pool sampled");
        Self { particles }
    }

    /// Build the pool described by `config`, seeded if a seed is set.
    pub fn from_config(config: &FieldConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::new(config.count, &config.bounds, &mut rng)
    }

    /// Wrap explicit particles (fixtures, golden frames)
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self { particles: particles.into_boxed_slice() }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Advance every particle one frame and write its transform into the
    /// slot with the same index. The buffer is marked dirty once.
    pub fn update(&mut self, instances: &mut InstanceBuffer) {
        debug_assert_eq!(instances.len(), self.particles.len());
        for (i, particle) in self.particles.iter_mut().enumerate() {
            particle.advance();
            instances.set(i, &particle.transform());
        }
        instances.mark_dirty();
    }
}
