//! CPU-side storage for the batched renderable
//!
//! One model matrix per instance, laid out for direct GPU upload.
//! The dirty flag gates the upload so the renderer copies the whole
//! buffer at most once per frame.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use parking_lot::Mutex;
use std::sync::Arc;

/// GPU-ready instance transform (64 bytes, column-major)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl From<&Mat4> for InstanceRaw {
    fn from(m: &Mat4) -> Self {
        Self { model: m.to_cols_array_2d() }
    }
}

/// Instance buffer shared between the frame callback and the paint callback
pub type SharedInstances = Arc<Mutex<InstanceBuffer>>;

/// Fixed-size transform storage for an instanced draw.
#[derive(Debug)]
pub struct InstanceBuffer {
    slots: Box<[InstanceRaw]>,
    dirty: bool,
    /// Monotonic counter: total times the buffer was marked dirty
    dirty_marks: u64,
}

impl InstanceBuffer {
    /// Allocate `len` identity transforms
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![InstanceRaw::from(&Mat4::IDENTITY); len].into_boxed_slice(),
            dirty: false,
            dirty_marks: 0,
        }
    }

    pub fn shared(len: usize) -> SharedInstances {
        Arc::new(Mutex::new(Self::new(len)))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Write the transform of instance `index`. Panics if out of range.
    #[inline]
    pub fn set(&mut self, index: usize, transform: &Mat4) {
        self.slots[index] = InstanceRaw::from(transform);
    }

    /// Read back the transform of instance `index`
    pub fn get(&self, index: usize) -> Mat4 {
        Mat4::from_cols_array_2d(&self.slots[index].model)
    }

    /// Request an upload on the next prepare
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.dirty_marks += 1;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Consume the pending upload request
    #[inline]
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn dirty_marks(&self) -> u64 {
        self.dirty_marks
    }

    /// Raw bytes for `queue.write_buffer`
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_set_and_get_round_trip_slot() {
        let mut buffer = InstanceBuffer::new(3);
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        buffer.set(1, &m);

        assert_eq!(buffer.get(0), Mat4::IDENTITY);
        assert_eq!(buffer.get(1), m);
        assert_eq!(buffer.as_bytes().len(), 3 * 64);
    }

    #[test]
    fn test_dirty_flag_is_consumed() {
        let mut buffer = InstanceBuffer::new(1);
        assert!(!buffer.take_dirty());

        buffer.mark_dirty();
        buffer.mark_dirty();
        assert_eq!(buffer.dirty_marks(), 2);
        assert!(buffer.is_dirty());
        assert!(buffer.take_dirty());
        assert!(!buffer.is_dirty());
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_slot_panics() {
        let mut buffer = InstanceBuffer::new(2);
        buffer.set(2, &Mat4::IDENTITY);
    }
}
