//! Web Audio sink: `<audio>` element routed through an analyser node

use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AnalyserNode, AudioContext, AudioContextState, HtmlAudioElement, MediaElementAudioSourceNode};

use super::sink::{AudioSink, PlaybackError, RejectionSlot, FFT_SIZE};

fn js_err(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

/// Analyser graph, created on first play (browsers require a user gesture)
struct AudioGraph {
    context: AudioContext,
    analyser: AnalyserNode,
    #[allow(dead_code)] // Keeps the source node connected
    source: MediaElementAudioSourceNode,
}

pub struct WebAudioSink {
    audio: HtmlAudioElement,
    graph: RefCell<Option<AudioGraph>>,
    rejection: Rc<RejectionSlot>,
}

impl WebAudioSink {
    /// Detached `<audio>` element; the player assigns the source.
    pub fn new() -> Result<Self, PlaybackError> {
        let audio = HtmlAudioElement::new().map_err(|e| PlaybackError::Graph(js_err(e)))?;
        info!("Audio element created");
        Ok(Self {
            audio,
            graph: RefCell::new(None),
            rejection: Rc::new(RejectionSlot::default()),
        })
    }

    fn build_graph(&self) -> Result<AudioGraph, JsValue> {
        let context = AudioContext::new()?;
        let analyser = context.create_analyser()?;
        let source = context.create_media_element_source(&self.audio)?;
        source.connect_with_audio_node(&analyser)?;
        analyser.connect_with_audio_node(&context.destination())?;
        analyser.set_fft_size(FFT_SIZE);
        Ok(AudioGraph { context, analyser, source })
    }

    /// Forward a rejection of the play promise of `generation` into the slot
    fn watch_play(&self, promise: js_sys::Promise, generation: u64) {
        let rejection = self.rejection.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                let reason = js_err(e);
                if rejection.record(generation, PlaybackError::Rejected(reason.clone())) {
                    warn!(reason = %reason, "Play request rejected");
                } else {
                    debug!(generation, reason = %reason, "Ignoring rejection of superseded play request");
                }
            }
        });
    }

    /// A failed resume leaves the element playing with a flat visualizer
    fn watch_resume(promise: js_sys::Promise) {
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                warn!(reason = %js_err(e), "Audio context resume rejected");
            }
        });
    }
}

impl AudioSink for WebAudioSink {
    fn prepare(&self) -> Result<(), PlaybackError> {
        if self.graph.borrow().is_some() {
            return Ok(());
        }
        let graph = self.build_graph().map_err(|e| PlaybackError::Graph(js_err(e)))?;
        debug!(bins = graph.analyser.frequency_bin_count(), "Analyser graph created");
        *self.graph.borrow_mut() = Some(graph);
        Ok(())
    }

    fn play(&self) -> Result<(), PlaybackError> {
        let generation = self.rejection.begin();
        let promise = self
            .audio
            .play()
            .map_err(|e| PlaybackError::Rejected(js_err(e)))?;
        self.watch_play(promise, generation);

        if let Some(graph) = self.graph.borrow().as_ref() {
            if graph.context.state() == AudioContextState::Suspended {
                match graph.context.resume() {
                    Ok(p) => Self::watch_resume(p),
                    Err(e) => warn!(reason = %js_err(e), "Failed to resume audio context"),
                }
            }
        }
        Ok(())
    }

    fn pause(&self) {
        if let Err(e) = self.audio.pause() {
            warn!(reason = %js_err(e), "Failed to pause audio");
        }
    }

    fn set_source(&self, src: &str) {
        // Aborts any pending play promise
        self.rejection.begin();
        self.audio.set_src(src);
    }

    fn current_time(&self) -> f64 {
        self.audio.current_time()
    }

    fn seek(&self, time: f64) {
        self.audio.set_current_time(time);
    }

    fn frequency_data(&self, out: &mut [u8]) {
        match self.graph.borrow().as_ref() {
            Some(graph) => graph.analyser.get_byte_frequency_data(out),
            None => out.fill(0),
        }
    }

    fn take_rejection(&self) -> Option<PlaybackError> {
        self.rejection.take()
    }
}
