//! Particle field animator
//!
//! Mount-time branch between the animated particle field and a static
//! gradient panel. The branch is fixed for the lifetime of the mount.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use tracing::info;

use super::clock::{FrameClock, FrameSubscription};
use super::instances::{InstanceBuffer, SharedInstances};
use super::particle::{FieldConfig, ParticlePool};

/// Two-stop gradient shown when accelerated rendering is unavailable.
/// Colors are unmultiplied RGBA, drawn from the top-left to the bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GradientSpec {
    pub from: [u8; 4],
    pub to: [u8; 4],
}

impl Default for GradientSpec {
    fn default() -> Self {
        // indigo-900 → purple-900, both at 20% opacity
        Self {
            from: [0x31, 0x2e, 0x81, 51],
            to: [0x58, 0x1c, 0x87, 51],
        }
    }
}

impl GradientSpec {
    /// Color at `t` in [0, 1] along the gradient diagonal
    pub fn at(&self, t: f32) -> [u8; 4] {
        let t = t.clamp(0.0, 1.0);
        let mut out = [0u8; 4];
        for (i, c) in out.iter_mut().enumerate() {
            let a = self.from[i] as f32;
            let b = self.to[i] as f32;
            *c = (a + (b - a) * t).round() as u8;
        }
        out
    }
}

/// Pool and render storage driven by the frame callback
pub struct AnimatedField {
    pool: ParticlePool,
    instances: SharedInstances,
    frames: u64,
}

impl AnimatedField {
    fn step(&mut self) {
        let mut instances = self.instances.lock();
        self.pool.update(&mut instances);
        self.frames += 1;
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// Frames processed since mount
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Result of mounting the animator.
pub enum FieldMount {
    Animated {
        field: Rc<RefCell<AnimatedField>>,
        instances: SharedInstances,
        _subscription: FrameSubscription,
    },
    Static(GradientSpec),
}

/// Entry point for the particle background
pub struct FieldAnimator;

impl FieldAnimator {
    /// Mount the background.
    ///
    /// With `available` set, samples the pool once and registers a single
    /// update callback on `clock`. Otherwise nothing is allocated or
    /// registered and the static gradient is returned.
    pub fn mount(available: bool, config: &FieldConfig, clock: &FrameClock) -> FieldMount {
        if !available {
            info!("Mounting static gradient background");
            return FieldMount::Static(GradientSpec::default());
        }

        let pool = ParticlePool::from_config(config);
        let instances = InstanceBuffer::shared(pool.len());
        let field = Rc::new(RefCell::new(AnimatedField {
            pool,
            instances: instances.clone(),
            frames: 0,
        }));

        let driven = field.clone();
        let subscription = clock.register(move |_tick| driven.borrow_mut().step());

        info!(count = config.count, seeded = config.seed.is_some(), "Mounted animated particle field");

        FieldMount::Animated {
            field,
            instances,
            _subscription: subscription,
        }
    }
}

impl FieldMount {
    pub fn is_animated(&self) -> bool {
        matches!(self, FieldMount::Animated { .. })
    }

    /// Number of allocated particles (0 for the static panel)
    pub fn particle_count(&self) -> usize {
        match self {
            FieldMount::Animated { field, .. } => field.borrow().pool.len(),
            FieldMount::Static(_) => 0,
        }
    }

    pub fn instances(&self) -> Option<&SharedInstances> {
        match self {
            FieldMount::Animated { instances, .. } => Some(instances),
            FieldMount::Static(_) => None,
        }
    }

    pub fn field(&self) -> Option<Ref<'_, AnimatedField>> {
        match self {
            FieldMount::Animated { field, .. } => Some(field.borrow()),
            FieldMount::Static(_) => None,
        }
    }

    pub fn gradient(&self) -> Option<GradientSpec> {
        match self {
            FieldMount::Static(spec) => Some(*spec),
            FieldMount::Animated { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Capability;

    fn config(count: usize) -> FieldConfig {
        FieldConfig {
            count,
            seed: Some(5),
            ..Default::default()
        }
    }

    #[test]
    fn test_static_mount_allocates_and_registers_nothing() {
        let clock = FrameClock::new();
        let mount = FieldAnimator::mount(false, &config(1000), &clock);

        assert!(!mount.is_animated());
        assert_eq!(mount.particle_count(), 0);
        assert!(mount.instances().is_none());
        assert!(clock.is_empty());

        for i in 0..120 {
            clock.tick_at(i as f64 / 60.0);
        }
        assert!(mount.field().is_none());
        assert_eq!(mount.gradient(), Some(GradientSpec::default()));
    }

    #[test]
    fn test_animated_mount_updates_once_per_tick() {
        let clock = FrameClock::new();
        let mount = FieldAnimator::mount(true, &config(64), &clock);
        assert_eq!(mount.particle_count(), 64);
        assert_eq!(clock.len(), 1);

        let initial: Vec<f32> = mount
            .field()
            .map(|f| f.pool().particles().iter().map(|p| p.phase).collect())
            .unwrap_or_default();

        for i in 0..10 {
            clock.tick_at(i as f64 / 60.0);
        }

        let field = mount.field().expect("animated");
        assert_eq!(field.frames(), 10);
        for (p, start) in field.pool().particles().iter().zip(initial) {
            assert!(p.phase > start);
        }
        drop(field);

        let instances = mount.instances().expect("animated").lock();
        assert_eq!(instances.len(), 64);
        assert_eq!(instances.dirty_marks(), 10);
    }

    #[test]
    fn test_pool_is_sampled_once() {
        let clock = FrameClock::new();
        let mount = FieldAnimator::mount(true, &config(16), &clock);
        let expected = ParticlePool::from_config(&config(16));

        clock.tick_at(0.0);
        let field = mount.field().expect("animated");
        for (p, e) in field.pool().particles().iter().zip(expected.particles()) {
            assert_eq!(p.amplitude(), e.amplitude());
            assert_eq!(p.speed(), e.speed());
            assert_eq!(p.origin(), e.origin());
            assert_eq!(p.phase, e.phase + e.speed() / 2.0);
        }
    }

    #[test]
    fn test_teardown_revokes_frame_callback() {
        let clock = FrameClock::new();
        let mount = FieldAnimator::mount(true, &config(8), &clock);
        let instances = mount.instances().cloned().expect("animated");
        clock.tick_at(0.0);

        drop(mount);
        assert!(clock.is_empty());

        let marks = instances.lock().dirty_marks();
        clock.tick_at(0.1);
        clock.tick_at(0.2);
        assert_eq!(instances.lock().dirty_marks(), marks);
    }

    #[test]
    fn test_gradient_endpoints() {
        let g = GradientSpec::default();
        assert_eq!(g.at(0.0), g.from);
        assert_eq!(g.at(1.0), g.to);
        assert_eq!(g.at(-3.0), g.from);
    }

    #[test]
    fn test_panicking_probe_mounts_static_panel() {
        let capability = Capability::probe(|| -> Result<bool, String> { panic!("context lost") });
        assert!(matches!(capability, Capability::ProbeFailed(ref reason) if reason == "context lost"));

        let clock = FrameClock::new();
        let mount = FieldAnimator::mount(capability.is_available(), &config(1000), &clock);

        assert_eq!(mount.gradient(), Some(GradientSpec::default()));
        assert_eq!(mount.particle_count(), 0);
        assert!(clock.is_empty());
        clock.tick_at(0.0);
        assert!(mount.instances().is_none());
    }
}
