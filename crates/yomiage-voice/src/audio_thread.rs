//! Dedicated audio output thread — isolates `!Send` audio resources from
//! the async runtime.
//!
//! `rodio::OutputStream` is `!Send` on some platforms. Rather than using
//! `unsafe impl Send/Sync` anywhere, the stream is confined to a single OS
//! thread and every operation routed through an [`AudioCommand`] channel.
//! The public [`AudioThreadHandle`] is the `Send + Sync` proxy the
//! controller holds.

use std::sync::mpsc;
use std::thread;

use crate::error::SpeechError;
use crate::playback::{AudioPlayback, PlaybackDoneCallback};

// ── Commands ───────────────────────────────────────────────────────

/// A command sent from the controller to the audio thread.
enum AudioCommand {
    /// Play a WAV buffer, replacing any current playback.
    Play {
        wav: Vec<u8>,
        on_done: Option<PlaybackDoneCallback>,
        reply: mpsc::Sender<Result<(), SpeechError>>,
    },

    /// Stop any active playback immediately (fire-and-forget).
    Stop,

    /// Query whether audio is currently playing.
    IsPlaying { reply: mpsc::Sender<bool> },

    /// Shut down the audio thread, releasing the output stream.
    Shutdown,
}

// ── Handle (Send + Sync proxy) ─────────────────────────────────────

/// `Send + Sync` handle to the dedicated audio output thread.
///
/// All methods take `&self` — the underlying `mpsc::Sender` supports shared
/// access. Request–reply methods block the caller for microseconds of local
/// channel I/O plus the audio operation itself.
pub struct AudioThreadHandle {
    cmd_tx: mpsc::Sender<AudioCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl AudioThreadHandle {
    /// Spawn the audio thread, initialise the output stream, and return the
    /// handle.
    ///
    /// Errors from [`AudioPlayback::new`] are propagated back via a
    /// one-shot init channel.
    pub fn spawn() -> Result<Self, SpeechError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<AudioCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), SpeechError>>();

        let thread = thread::Builder::new()
            .name("yomiage-audio".into())
            .spawn(move || {
                Self::run(cmd_rx, &init_tx);
            })
            .map_err(|e| {
                SpeechError::OutputStreamError(format!("failed to spawn audio thread: {e}"))
            })?;

        // Wait for the audio thread to finish initialisation.
        init_rx.recv().map_err(|_| SpeechError::AudioThreadDied)??;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    /// Play one WAV buffer, replacing any current playback.
    pub fn play(
        &self,
        wav: Vec<u8>,
        on_done: Option<PlaybackDoneCallback>,
    ) -> Result<(), SpeechError> {
        let (tx, rx) = mpsc::channel();
        self.cmd_tx
            .send(AudioCommand::Play {
                wav,
                on_done,
                reply: tx,
            })
            .map_err(|_| SpeechError::AudioThreadDied)?;
        rx.recv().map_err(|_| SpeechError::AudioThreadDied)?
    }

    /// Stop any active playback immediately (fire-and-forget).
    pub fn stop(&self) {
        let _ = self.cmd_tx.send(AudioCommand::Stop);
    }

    /// Check whether audio is currently playing.
    pub fn is_playing(&self) -> bool {
        let (tx, rx) = mpsc::channel();
        if self.cmd_tx.send(AudioCommand::IsPlaying { reply: tx }).is_err() {
            return false;
        }
        rx.recv().unwrap_or(false)
    }

    // ── Audio thread event loop ────────────────────────────────────

    /// The body of the dedicated audio thread. Owns [`AudioPlayback`] for
    /// its entire lifetime — it never crosses a thread boundary.
    fn run(cmd_rx: mpsc::Receiver<AudioCommand>, init_tx: &mpsc::Sender<Result<(), SpeechError>>) {
        let mut playback = match AudioPlayback::new() {
            Ok(p) => p,
            Err(e) => {
                let _ = init_tx.send(Err(e));
                return;
            }
        };

        // Signal successful init.
        if init_tx.send(Ok(())).is_err() {
            // Caller dropped — nothing to do.
            return;
        }

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                AudioCommand::Play {
                    wav,
                    on_done,
                    reply,
                } => {
                    let _ = reply.send(playback.play(wav, on_done));
                }

                AudioCommand::Stop => {
                    playback.stop();
                }

                AudioCommand::IsPlaying { reply } => {
                    let _ = reply.send(playback.is_playing());
                }

                AudioCommand::Shutdown => break,
            }
        }

        tracing::debug!("Audio thread shutting down");
    }
}

impl Drop for AudioThreadHandle {
    fn drop(&mut self) {
        // Best-effort shutdown — the thread may already be dead.
        let _ = self.cmd_tx.send(AudioCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}
