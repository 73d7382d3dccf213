//! Audio playback — utterance output via `rodio`.
//!
//! Plays one synthesized WAV buffer at a time. Starting a new buffer or
//! calling [`AudioPlayback::stop`] silences the previous one immediately —
//! the controller relies on this for its no-overlap guarantee.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::error::SpeechError;

/// Callback invoked when playback finishes naturally (the buffer drained).
pub type PlaybackDoneCallback = Box<dyn FnOnce() + Send + 'static>;

/// Audio playback handle for utterance output.
pub struct AudioPlayback {
    /// rodio output stream (must be kept alive).
    _stream: OutputStream,

    /// Handle used to create sinks.
    stream_handle: OutputStreamHandle,

    /// Current playback sink (if any).
    sink: Option<Arc<Sink>>,

    /// Whether playback is in progress. Cleared by `stop()` before the
    /// watcher thread observes the drain, which is how natural completion
    /// is told apart from interruption.
    is_playing: Arc<AtomicBool>,
}

impl AudioPlayback {
    /// Create a new audio playback instance using the default output device.
    pub fn new() -> Result<Self, SpeechError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SpeechError::OutputStreamError(e.to_string()))?;

        tracing::info!("Audio playback initialized on default output device");

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink: None,
            is_playing: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Play one WAV buffer, replacing whatever is currently sounding.
    ///
    /// `on_done` fires only when the buffer drains naturally — an
    /// interrupting [`stop`](Self::stop) (or a subsequent `play`) swallows
    /// it.
    pub fn play(
        &mut self,
        wav: Vec<u8>,
        on_done: Option<PlaybackDoneCallback>,
    ) -> Result<(), SpeechError> {
        // Stop any existing playback first.
        self.stop();

        let source = Decoder::new(Cursor::new(wav))
            .map_err(|e| SpeechError::DecodeError(e.to_string()))?;

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SpeechError::OutputStreamError(e.to_string()))?;
        sink.append(source);

        self.is_playing.store(true, Ordering::SeqCst);
        let sink = Arc::new(sink);
        self.sink = Some(Arc::clone(&sink));

        let is_playing = Arc::clone(&self.is_playing);

        // `sleep_until_end()` blocks until the buffer drains or `stop()`
        // drops the internal sources, so a watcher thread per utterance is
        // cheap and self-terminating.
        std::thread::spawn(move || {
            sink.sleep_until_end();

            // If stop() was called, is_playing is already false and the
            // callback must not fire.
            if !is_playing.swap(false, Ordering::SeqCst) {
                return;
            }

            tracing::debug!("Playback finished naturally");
            if let Some(cb) = on_done {
                cb();
            }
        });

        tracing::debug!("Audio playback started");
        Ok(())
    }

    /// Stop any active playback immediately.
    pub fn stop(&mut self) {
        self.is_playing.store(false, Ordering::SeqCst);
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    /// Check whether audio is currently playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_playing.load(Ordering::SeqCst)
    }
}
