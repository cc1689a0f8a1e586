//! Background music player
//!
//! Plays a looped segment of the current song. While playing, a frame
//! callback refreshes the visualizer; pausing (or a rejected play request)
//! revokes it.

use rand::Rng;
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use tracing::{debug, info, warn};

use super::playlist::{Playlist, Song};
use super::sink::AudioSink;
use super::visualizer::Visualizer;
use crate::core::{FrameClock, FrameSubscription};

pub struct MusicPlayer {
    sink: Rc<dyn AudioSink>,
    playlist: Playlist,
    playing: bool,
    clock: FrameClock,
    visualizer: Rc<RefCell<Visualizer>>,
    visualizer_sub: Option<FrameSubscription>,
}

impl MusicPlayer {
    /// Mount on a random song. Returns `None` for an empty song list.
    pub fn with_random_song<R: Rng + ?Sized>(
        sink: Rc<dyn AudioSink>,
        songs: Vec<Song>,
        clock: FrameClock,
        rng: &mut R,
    ) -> Option<Self> {
        if songs.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..songs.len());
        Playlist::new(songs, index).map(|playlist| Self::new(sink, playlist, clock))
    }

    pub fn new(sink: Rc<dyn AudioSink>, playlist: Playlist, clock: FrameClock) -> Self {
        let player = Self {
            sink,
            playlist,
            playing: false,
            clock,
            visualizer: Rc::new(RefCell::new(Visualizer::default())),
            visualizer_sub: None,
        };
        player.load_current();
        info!(song = %player.current_song().name, songs = player.song_count(), "Music player mounted");
        player
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_song(&self) -> &Song {
        self.playlist.current()
    }

    pub fn song_count(&self) -> usize {
        self.playlist.len()
    }

    pub fn visualizer(&self) -> Ref<'_, Visualizer> {
        self.visualizer.borrow()
    }

    /// Whether the visualizer is registered on the frame clock
    pub fn is_visualizing(&self) -> bool {
        self.visualizer_sub.is_some()
    }

    /// Play/pause button
    pub fn toggle(&mut self) {
        if let Err(e) = self.sink.prepare() {
            warn!(error = %e, "Audio graph unavailable, visualizer will stay flat");
        }

        if self.playing {
            self.sink.pause();
            self.stop();
        } else {
            self.start();
        }
    }

    /// Switch to the next song, keeping the play state
    pub fn next_song(&mut self) {
        self.playlist.advance();
        self.load_current();
        debug!(song = %self.current_song().name, "Switched song");

        if self.playing {
            if let Err(e) = self.sink.play() {
                warn!(error = %e, "Play rejected after song switch");
                self.stop();
            }
        }
    }

    /// Loop the segment once playback passes its end
    pub fn on_time_update(&mut self) {
        let song = self.playlist.current();
        if song.past_end(self.sink.current_time()) {
            self.sink.seek(song.start);
        }
    }

    /// Per-frame housekeeping: pending rejections and segment looping
    pub fn poll(&mut self) {
        if let Some(e) = self.sink.take_rejection() {
            warn!(error = %e, "Playback rejected, falling back to paused");
            if self.playing {
                // Keep the element in step with the button
                self.sink.pause();
                self.stop();
            }
        }
        if self.playing {
            self.on_time_update();
        }
    }

    fn load_current(&self) {
        let song = self.playlist.current();
        self.sink.set_source(&song.src);
        self.sink.seek(song.start);
    }

    fn start(&mut self) {
        match self.sink.play() {
            Ok(()) => {
                self.playing = true;
                let sink = self.sink.clone();
                let visualizer = self.visualizer.clone();
                self.visualizer_sub = Some(
                    self.clock
                        .register(move |_tick| visualizer.borrow_mut().sample(sink.as_ref())),
                );
                info!(song = %self.current_song().name, "Playback started");
            }
            Err(e) => {
                warn!(error = %e, "Play request refused");
                self.stop();
            }
        }
    }

    fn stop(&mut self) {
        self.playing = false;
        self.visualizer_sub = None;
        self.visualizer.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::sink::{PlaybackError, RejectionSlot, SilentSink};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::cell::Cell;

    /// Sink that records calls and can be told to refuse playback
    #[derive(Default)]
    struct ScriptedSink {
        time: Cell<f64>,
        refuse: Cell<bool>,
        playing: Cell<bool>,
        source: RefCell<String>,
        rejection: RejectionSlot,
        level: Cell<u8>,
    }

    impl AudioSink for ScriptedSink {
        fn prepare(&self) -> Result<(), PlaybackError> {
            Ok(())
        }
        fn play(&self) -> Result<(), PlaybackError> {
            self.rejection.begin();
            if self.refuse.get() {
                return Err(PlaybackError::Rejected("NotAllowedError".into()));
            }
            self.playing.set(true);
            Ok(())
        }
        fn pause(&self) {
            self.playing.set(false);
        }
        fn set_source(&self, src: &str) {
            self.rejection.begin();
            *self.source.borrow_mut() = src.to_string();
        }
        fn current_time(&self) -> f64 {
            self.time.get()
        }
        fn seek(&self, time: f64) {
            self.time.set(time);
        }
        fn frequency_data(&self, out: &mut [u8]) {
            out.fill(self.level.get());
        }
        fn take_rejection(&self) -> Option<PlaybackError> {
            self.rejection.take()
        }
    }

    fn songs() -> Vec<Song> {
        vec![
            Song { name: "one".into(), src: "one.mp3".into(), start: 8.0, end: 160.0 },
            Song { name: "two".into(), src: "two.mp3".into(), start: 3.0, end: 30.0 },
        ]
    }

    fn player(sink: Rc<ScriptedSink>, clock: &FrameClock) -> MusicPlayer {
        MusicPlayer::new(sink, Playlist::new(songs(), 0).unwrap(), clock.clone())
    }

    #[test]
    fn test_mount_seeks_to_segment_start() {
        let sink = Rc::new(ScriptedSink::default());
        let clock = FrameClock::new();
        let player = player(sink.clone(), &clock);

        assert!(!player.is_playing());
        assert_eq!(sink.current_time(), 8.0);
        assert_eq!(*sink.source.borrow(), "one.mp3");
        assert!(clock.is_empty());
    }

    #[test]
    fn test_random_mount_picks_a_song() {
        let mut rng = SmallRng::seed_from_u64(3);
        let clock = FrameClock::new();
        let player = MusicPlayer::with_random_song(Rc::new(SilentSink::default()), songs(), clock.clone(), &mut rng)
            .unwrap();
        assert!(["one", "two"].contains(&player.current_song().name.as_str()));

        let none = MusicPlayer::with_random_song(Rc::new(SilentSink::default()), Vec::new(), clock, &mut rng);
        assert!(none.is_none());
    }

    #[test]
    fn test_toggle_drives_visualizer_registration() {
        let sink = Rc::new(ScriptedSink::default());
        let clock = FrameClock::new();
        let mut player = player(sink.clone(), &clock);

        player.toggle();
        assert!(player.is_playing());
        assert!(player.is_visualizing());
        assert_eq!(clock.len(), 1);

        sink.level.set(120);
        clock.tick_at(0.0);
        assert!(player.visualizer().bins().iter().all(|&b| b == 120));

        player.toggle();
        assert!(!player.is_playing());
        assert!(!sink.playing.get());
        assert!(clock.is_empty());
        assert!(player.visualizer().bins().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_refused_play_stays_paused() {
        let clock = FrameClock::new();
        let mut player = MusicPlayer::new(
            Rc::new(SilentSink::default()),
            Playlist::new(songs(), 0).unwrap(),
            clock.clone(),
        );
        player.toggle();
        assert!(!player.is_playing());
        assert!(clock.is_empty());
    }

    #[test]
    fn test_async_rejection_falls_back_to_paused() {
        let sink = Rc::new(ScriptedSink::default());
        let clock = FrameClock::new();
        let mut player = player(sink.clone(), &clock);

        player.toggle();
        assert!(player.is_playing());

        sink.rejection
            .record(sink.rejection.generation(), PlaybackError::Rejected("NotAllowedError".into()));
        player.poll();
        assert!(!player.is_playing());
        assert!(!sink.playing.get());
        assert!(clock.is_empty());
    }

    #[test]
    fn test_abort_of_replaced_play_request_keeps_playing() {
        let sink = Rc::new(ScriptedSink::default());
        let clock = FrameClock::new();
        let mut player = player(sink.clone(), &clock);

        player.toggle();
        let first_play = sink.rejection.generation();
        player.next_song();

        // The source switch aborted the first play promise
        assert!(!sink.rejection.record(first_play, PlaybackError::Rejected("AbortError".into())));
        player.poll();

        assert!(player.is_playing());
        assert!(sink.playing.get());
        assert!(player.is_visualizing());
        assert_eq!(clock.len(), 1);
    }

    #[test]
    fn test_segment_loops_at_end() {
        let sink = Rc::new(ScriptedSink::default());
        let clock = FrameClock::new();
        let mut player = player(sink.clone(), &clock);
        player.toggle();

        sink.seek(159.5);
        player.poll();
        assert_eq!(sink.current_time(), 159.5);

        sink.seek(160.0);
        player.poll();
        assert_eq!(sink.current_time(), 8.0);
    }

    #[test]
    fn test_next_song_keeps_playing() {
        let sink = Rc::new(ScriptedSink::default());
        let clock = FrameClock::new();
        let mut player = player(sink.clone(), &clock);
        player.toggle();

        player.next_song();
        assert_eq!(player.current_song().name, "two");
        assert_eq!(*sink.source.borrow(), "two.mp3");
        assert_eq!(sink.current_time(), 3.0);
        assert!(player.is_playing());

        player.next_song();
        assert_eq!(player.current_song().name, "one");
    }

    #[test]
    fn test_next_song_rejection_stops_playback() {
        let sink = Rc::new(ScriptedSink::default());
        let clock = FrameClock::new();
        let mut player = player(sink.clone(), &clock);
        player.toggle();

        sink.refuse.set(true);
        player.next_song();
        assert!(!player.is_playing());
        assert!(!player.is_visualizing());
    }
}
