//! Audio output abstraction
//!
//! The web build drives an `<audio>` element through Web Audio; native
//! builds and tests use [`SilentSink`].

use std::cell::{Cell, RefCell};
use thiserror::Error;

/// FFT size of the analyser node (yields half as many frequency bins)
pub const FFT_SIZE: u32 = 64;

/// Number of frequency bins the visualizer samples
pub const FREQUENCY_BINS: usize = (FFT_SIZE / 2) as usize;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("audio playback is not supported on this platform")]
    Unsupported,
    #[error("playback was rejected: {0}")]
    Rejected(String),
    #[error("audio graph could not be created: {0}")]
    Graph(String),
}

/// Output device for the music player.
///
/// All methods take `&self`; sinks hold host handles with their own
/// interior mutability.
pub trait AudioSink {
    /// Lazily build the analyser graph. Called before the first play.
    fn prepare(&self) -> Result<(), PlaybackError>;

    /// Start playback. Asynchronous rejections surface later through
    /// [`AudioSink::take_rejection`].
    fn play(&self) -> Result<(), PlaybackError>;

    fn pause(&self);

    /// Switch the source, keeping the play state untouched
    fn set_source(&self, src: &str);

    /// Playback position in seconds
    fn current_time(&self) -> f64;

    fn seek(&self, time: f64);

    /// Fill `out` with byte frequency magnitudes. Unavailable data is zeroed.
    fn frequency_data(&self, out: &mut [u8]);

    /// Pending asynchronous play rejection, if any
    fn take_rejection(&self) -> Option<PlaybackError>;
}

/// Pending asynchronous play rejection, tagged with the play request it
/// belongs to.
///
/// Every play request or source switch starts a new generation. A rejection
/// from an older generation (e.g. the `AbortError` of a play promise that a
/// source switch interrupted) is dropped, since newer playback may be running.
#[derive(Debug, Default)]
pub struct RejectionSlot {
    generation: Cell<u64>,
    pending: RefCell<Option<PlaybackError>>,
}

impl RejectionSlot {
    /// Start a new generation and return its tag. Pending rejections of
    /// older generations are discarded.
    pub fn begin(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        self.pending.borrow_mut().take();
        next
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Record `error` for `generation`. Returns false if it was superseded.
    pub fn record(&self, generation: u64, error: PlaybackError) -> bool {
        if generation != self.generation.get() {
            return false;
        }
        *self.pending.borrow_mut() = Some(error);
        true
    }

    pub fn take(&self) -> Option<PlaybackError> {
        self.pending.borrow_mut().take()
    }
}

/// Sink with no output. Every play request is refused.
#[derive(Debug, Default)]
pub struct SilentSink {
    position: Cell<f64>,
}

impl AudioSink for SilentSink {
    fn prepare(&self) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn play(&self) -> Result<(), PlaybackError> {
        Err(PlaybackError::Unsupported)
    }

    fn pause(&self) {}

    fn set_source(&self, _src: &str) {
        self.position.set(0.0);
    }

    fn current_time(&self) -> f64 {
        self.position.get()
    }

    fn seek(&self, time: f64) {
        self.position.set(time);
    }

    fn frequency_data(&self, out: &mut [u8]) {
        out.fill(0);
    }

    fn take_rejection(&self) -> Option<PlaybackError> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abort() -> PlaybackError {
        PlaybackError::Rejected("AbortError".into())
    }

    #[test]
    fn test_current_generation_rejection_is_kept() {
        let slot = RejectionSlot::default();
        let play = slot.begin();
        assert!(slot.record(play, abort()));
        assert_eq!(slot.take(), Some(abort()));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_superseded_rejection_is_dropped() {
        let slot = RejectionSlot::default();
        let first = slot.begin();
        // Source switch, then a fresh play request
        slot.begin();
        let second = slot.begin();
        assert_ne!(first, second);

        assert!(!slot.record(first, abort()));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_new_generation_clears_pending() {
        let slot = RejectionSlot::default();
        let play = slot.begin();
        slot.record(play, abort());
        slot.begin();
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_silent_sink_refuses_play() {
        let sink = SilentSink::default();
        assert_eq!(sink.play(), Err(PlaybackError::Unsupported));
        sink.seek(4.0);
        assert_eq!(sink.current_time(), 4.0);
        let mut bins = [7u8; 4];
        sink.frequency_data(&mut bins);
        assert_eq!(bins, [0; 4]);
    }
}
