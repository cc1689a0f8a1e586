//! Frequency bar visualizer behind the play button

use super::sink::{AudioSink, FREQUENCY_BINS};

/// Horizontal gap between bars, in pixels
const BAR_GAP: f32 = 2.0;

/// One bar in canvas space (origin top-left, y grows downwards)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Opacity in [0, 1]
    pub alpha: f32,
}

/// Latest frequency magnitudes, refreshed once per frame while playing.
#[derive(Debug, Clone)]
pub struct Visualizer {
    bins: [u8; FREQUENCY_BINS],
}

impl Default for Visualizer {
    fn default() -> Self {
        Self { bins: [0; FREQUENCY_BINS] }
    }
}

impl Visualizer {
    /// Pull the current spectrum from `sink` into the bin buffer
    pub fn sample(&mut self, sink: &dyn AudioSink) {
        sink.frequency_data(&mut self.bins);
    }

    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    #[cfg(test)]
    pub(crate) fn set_bins(&mut self, bins: &[u8]) {
        self.bins.copy_from_slice(bins);
    }

    pub fn clear(&mut self) {
        self.bins.fill(0);
    }

    /// Bars laid out left to right across a `width` x `height` canvas.
    ///
    /// Bars are 2.5x the even share of the width, so the high end of the
    /// spectrum runs off the right edge.
    pub fn bars(&self, width: f32, height: f32) -> impl Iterator<Item = Bar> + '_ {
        let bar_width = width / self.bins.len() as f32 * 2.5;
        self.bins.iter().enumerate().map(move |(i, &value)| {
            let bar_height = value as f32 / 2.0;
            Bar {
                x: i as f32 * (bar_width + BAR_GAP),
                y: height - bar_height,
                width: bar_width,
                height: bar_height,
                alpha: (bar_height / 100.0).min(1.0),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_geometry() {
        let mut viz = Visualizer::default();
        let mut bins = [0u8; FREQUENCY_BINS];
        bins[0] = 200;
        bins[1] = 50;
        viz.set_bins(&bins);

        let bars: Vec<Bar> = viz.bars(56.0, 56.0).collect();
        assert_eq!(bars.len(), FREQUENCY_BINS);

        let width = 56.0 / 32.0 * 2.5;
        assert_eq!(bars[0].width, width);
        assert_eq!(bars[0].height, 100.0);
        assert_eq!(bars[0].y, 56.0 - 100.0);
        assert_eq!(bars[0].alpha, 1.0);

        assert_eq!(bars[1].x, width + 2.0);
        assert_eq!(bars[1].height, 25.0);
        assert_eq!(bars[1].alpha, 0.25);

        assert_eq!(bars[2].height, 0.0);
        assert_eq!(bars[2].alpha, 0.0);
    }

    #[test]
    fn test_clear() {
        let mut viz = Visualizer::default();
        viz.set_bins(&[9; FREQUENCY_BINS]);
        viz.clear();
        assert!(viz.bins().iter().all(|&b| b == 0));
    }
}
