//! `AudioSink` trait abstraction for utterance output.
//!
//! Decouples the playback controller from any specific audio backend. The
//! local adapter routes to rodio via the dedicated audio thread; tests
//! inject a recording fake so no audio hardware is needed.

use std::sync::Arc;

use crate::audio_thread::AudioThreadHandle;
use crate::error::SpeechError;
use crate::playback::PlaybackDoneCallback;

/// Abstraction over the exclusive audio output device.
///
/// Object-safe; all methods take `&self` so the trait is usable as
/// `Arc<dyn AudioSink>` inside the controller.
pub trait AudioSink: Send + Sync {
    /// Play one WAV buffer, replacing any current playback. `on_done` fires
    /// only when the buffer drains naturally.
    fn play(&self, wav: Vec<u8>, on_done: PlaybackDoneCallback) -> Result<(), SpeechError>;

    /// Stop playback immediately.
    fn stop(&self);

    /// Whether audio is currently playing.
    fn is_playing(&self) -> bool;
}

/// Local audio output adapter — delegates to rodio via
/// [`AudioThreadHandle`].
pub struct LocalAudioSink {
    handle: Arc<AudioThreadHandle>,
}

impl LocalAudioSink {
    /// Spawn the audio thread and wrap it.
    pub fn new() -> Result<Self, SpeechError> {
        Ok(Self {
            handle: Arc::new(AudioThreadHandle::spawn()?),
        })
    }
}

impl AudioSink for LocalAudioSink {
    fn play(&self, wav: Vec<u8>, on_done: PlaybackDoneCallback) -> Result<(), SpeechError> {
        self.handle.play(wav, Some(on_done))
    }

    fn stop(&self) {
        self.handle.stop();
    }

    fn is_playing(&self) -> bool {
        self.handle.is_playing()
    }
}
