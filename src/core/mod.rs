//! Platform-agnostic core - shared between the native and web front ends

pub mod animator;
pub mod capability;
pub mod clock;
pub mod instances;
pub mod particle;

pub use animator::{AnimatedField, FieldAnimator, FieldMount, GradientSpec};
pub use capability::Capability;
pub use clock::{host_seconds, FrameClock, FrameSubscription, FrameTick};
pub use instances::{InstanceBuffer, InstanceRaw, SharedInstances};
pub use particle::{FieldBounds, FieldConfig, Particle, ParticlePool, Span, MAX_PARTICLES};
