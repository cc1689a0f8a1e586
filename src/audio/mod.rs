//! Background music player with a frequency visualizer

mod player;
mod playlist;
mod sink;
mod visualizer;
#[cfg(target_arch = "wasm32")]
mod web_sink;

pub use player::MusicPlayer;
pub use playlist::{default_songs, Playlist, Song};
pub use sink::{AudioSink, PlaybackError, RejectionSlot, SilentSink, FFT_SIZE, FREQUENCY_BINS};
pub use visualizer::{Bar, Visualizer};
#[cfg(target_arch = "wasm32")]
pub use web_sink::WebAudioSink;
