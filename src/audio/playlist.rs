//! Songs and the looping segment each one plays

use serde::{Deserialize, Serialize};

/// A song with the segment `[start, end)` (seconds) that is played on loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub name: String,
    pub src: String,
    pub start: f64,
    pub end: f64,
}

impl Song {
    /// Whether playback at `time` has run past the segment
    #[inline]
    pub fn past_end(&self, time: f64) -> bool {
        time >= self.end
    }
}

/// Default playlist shipped with the page
pub fn default_songs() -> Vec<Song> {
    vec![Song {
        name: "Beauty & Beat".to_string(),
        src: "assets/beauty-and-a-beat.mp3".to_string(),
        start: 8.0,
        end: 160.0,
    }]
}

/// Non-empty list of songs with a cursor.
#[derive(Clone, Debug)]
pub struct Playlist {
    songs: Vec<Song>,
    index: usize,
}

impl Playlist {
    /// Returns `None` for an empty song list
    pub fn new(songs: Vec<Song>, index: usize) -> Option<Self> {
        if songs.is_empty() {
            return None;
        }
        let index = index % songs.len();
        Some(Self { songs, index })
    }

    pub fn current(&self) -> &Song {
        &self.songs[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Always false for a constructed playlist
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Move to the next song, wrapping around
    pub fn advance(&mut self) -> &Song {
        self.index = (self.index + 1) % self.songs.len();
        &self.songs[self.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(name: &str) -> Song {
        Song {
            name: name.to_string(),
            src: format!("{name}.mp3"),
            start: 1.0,
            end: 2.0,
        }
    }

    #[test]
    fn test_empty_playlist_rejected() {
        assert!(Playlist::new(Vec::new(), 0).is_none());
    }

    #[test]
    fn test_advance_wraps() {
        let mut playlist = Playlist::new(vec![song("a"), song("b"), song("c")], 1).unwrap();
        assert_eq!(playlist.current().name, "b");
        assert_eq!(playlist.advance().name, "c");
        assert_eq!(playlist.advance().name, "a");
        assert_eq!(playlist.index(), 0);
    }

    #[test]
    fn test_start_index_is_wrapped() {
        let playlist = Playlist::new(vec![song("a"), song("b")], 5).unwrap();
        assert_eq!(playlist.index(), 1);
    }

    #[test]
    fn test_past_end() {
        let s = song("a");
        assert!(!s.past_end(1.99));
        assert!(s.past_end(2.0));
    }
}
