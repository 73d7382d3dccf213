//! `SpeechService` — the playback controller implementing [`SpeechPort`].
//!
//! One logical voice channel. Requests arrive concurrently from the
//! dialogue hook, the test-speak surface, and the replay trigger; all of
//! them funnel through a single mpsc channel into one worker task, so
//! "cancel old, start new" is atomic with respect to other requests and no
//! request ever observes a half-cancelled predecessor.
//!
//! # Ownership discipline
//!
//! Controller state (active utterance, last-spoken snapshot, replay
//! cooldown) is mutated only inside the worker. Synthesis runs in a spawned
//! task per utterance and reports back through the same channel; the worker
//! alone touches the audio sink, so a stale task can never start audio
//! after its supersessor.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use yomiage_core::AppEvent;
use yomiage_core::ports::{
    AppEventEmitter, ProfileStorePort, ReplayOutcome, SpeechPort, SpeechPortError, SpeechStatus,
    SpeechStatusDto, SubmitOutcome,
};
use yomiage_core::profile::VoiceProfile;
use yomiage_core::request::SpeakRequest;

use crate::engine::{SynthesisEngine, synthesize};
use crate::error::SpeechError;
use crate::sink::AudioSink;

/// Minimum interval between accepted replay triggers, absorbing the
/// input-repeat burst of a held key.
pub const REPLAY_COOLDOWN: Duration = Duration::from_millis(300);

/// How long a spoken utterance shields its duplicates from re-synthesis.
pub const DEDUP_WINDOW: Duration = Duration::from_secs(5);

// ── Commands ───────────────────────────────────────────────────────

/// Everything the worker reacts to: port calls and per-utterance task
/// completions share one ordered stream.
enum Command {
    Speak(SpeakRequest),
    Stop,
    Replay { reply: oneshot::Sender<ReplayOutcome> },
    SynthesisDone { seq: u64, wav: Vec<u8> },
    SynthesisFailed { seq: u64, error: SpeechError },
    PlaybackFinished { seq: u64 },
}

// ── Worker state ───────────────────────────────────────────────────

/// The at-most-one in-flight utterance.
struct ActiveUtterance {
    seq: u64,
    speaker: String,
    cancel: CancellationToken,
    started_at: Instant,
}

/// Snapshot serving the replay operation and the dedup gate.
struct LastSpoken {
    request: SpeakRequest,
    key: String,
    at: Instant,
}

/// Status snapshot shared with [`SpeechService::status`]. Written only by
/// the worker.
#[derive(Debug, Clone)]
struct StatusInner {
    state: SpeechStatus,
    speaker: Option<String>,
    last_error: Option<String>,
}

struct Controller {
    engine: Arc<dyn SynthesisEngine>,
    sink: Arc<dyn AudioSink>,
    profiles: Arc<dyn ProfileStorePort>,
    emitter: Arc<dyn AppEventEmitter>,
    cmd_tx: mpsc::UnboundedSender<Command>,
    status: Arc<Mutex<StatusInner>>,
    dedup_enabled: bool,
    seq: u64,
    active: Option<ActiveUtterance>,
    last_spoken: Option<LastSpoken>,
    last_replay_at: Option<Instant>,
}

impl Controller {
    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<Command>) {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                Command::Speak(request) => self.handle_speak(request),
                Command::Stop => self.handle_stop(),
                Command::Replay { reply } => {
                    let _ = reply.send(self.handle_replay());
                }
                Command::SynthesisDone { seq, wav } => self.handle_synthesis_done(seq, wav),
                Command::SynthesisFailed { seq, error } => {
                    self.handle_synthesis_failed(seq, &error);
                }
                Command::PlaybackFinished { seq } => self.handle_playback_finished(seq),
            }
        }
        debug!("Speech controller shutting down");
    }

    /// Accept a request: dedup-gate it, supersede the active utterance, and
    /// kick off synthesis.
    fn handle_speak(&mut self, request: SpeakRequest) {
        let key = request.dedup_key();

        if self.is_duplicate(&request, &key) {
            debug!(speaker = %request.speaker_name, "Duplicate request suppressed");
            self.emitter.emit(AppEvent::SpeakSuppressed {
                speaker: request.speaker_name,
            });
            return;
        }

        // A new request always wins — cancel before anything else happens.
        self.supersede();

        self.seq += 1;
        let seq = self.seq;
        let cancel = CancellationToken::new();
        let speaker = request.speaker_name.clone();

        let mut profile = self.profiles.resolve(&speaker);
        apply_overrides(&mut profile, &request);

        self.active = Some(ActiveUtterance {
            seq,
            speaker: speaker.clone(),
            cancel: cancel.clone(),
            started_at: Instant::now(),
        });
        self.last_spoken = Some(LastSpoken {
            request: request.clone(),
            key,
            at: Instant::now(),
        });

        {
            let mut status = self.status.lock().unwrap();
            status.state = SpeechStatus::Synthesizing;
            status.speaker = Some(speaker.clone());
        }
        self.emitter.emit(AppEvent::SpeakStarted {
            speaker: speaker.clone(),
        });
        info!(seq, speaker = %speaker, style_id = profile.style_id, "Utterance accepted");

        let engine = Arc::clone(&self.engine);
        let tx = self.cmd_tx.clone();
        let text = request.text;
        tokio::spawn(async move {
            match synthesize(engine.as_ref(), &text, &profile, &cancel).await {
                Ok(wav) => {
                    let _ = tx.send(Command::SynthesisDone { seq, wav });
                }
                Err(SpeechError::Cancelled) => {
                    // Superseded — expected, silent.
                    debug!(seq, "Synthesis cancelled");
                }
                Err(error) => {
                    let _ = tx.send(Command::SynthesisFailed { seq, error });
                }
            }
        });
    }

    /// Dedup gate: only non-interrupt requests without the bypass flag are
    /// eligible, and only against the most recent utterance inside the
    /// window.
    fn is_duplicate(&self, request: &SpeakRequest, key: &str) -> bool {
        if request.interrupt || request.force_bypass_dedup || !self.dedup_enabled {
            return false;
        }
        self.last_spoken
            .as_ref()
            .is_some_and(|last| last.key == key && last.at.elapsed() < DEDUP_WINDOW)
    }

    /// Cancel the active utterance's synthesis and silence the sink. The
    /// cancellation signal is set before this returns, so it is always
    /// observable before any successor's synthesis begins.
    fn supersede(&mut self) {
        if let Some(active) = self.active.take() {
            debug!(
                seq = active.seq,
                speaker = %active.speaker,
                elapsed_ms = active.started_at.elapsed().as_millis() as u64,
                "Superseding active utterance"
            );
            active.cancel.cancel();
        }
        self.sink.stop();
    }

    fn handle_stop(&mut self) {
        self.supersede();
        self.status.lock().unwrap().state = SpeechStatus::Idle;
    }

    fn handle_replay(&mut self) -> ReplayOutcome {
        if self
            .last_replay_at
            .is_some_and(|at| at.elapsed() < REPLAY_COOLDOWN)
        {
            return ReplayOutcome::CoolingDown;
        }

        let Some(mut request) = self.last_spoken.as_ref().map(|l| l.request.clone()) else {
            return ReplayOutcome::NoUtterance;
        };

        self.last_replay_at = Some(Instant::now());
        request.interrupt = true;
        request.force_bypass_dedup = true;
        self.handle_speak(request);
        ReplayOutcome::Accepted
    }

    fn handle_synthesis_done(&mut self, seq: u64, wav: Vec<u8>) {
        if self.active.as_ref().is_none_or(|a| a.seq != seq) {
            debug!(seq, "Discarding stale synthesis result");
            return;
        }

        let tx = self.cmd_tx.clone();
        let on_done = Box::new(move || {
            let _ = tx.send(Command::PlaybackFinished { seq });
        });

        match self.sink.play(wav, on_done) {
            Ok(()) => {
                self.status.lock().unwrap().state = SpeechStatus::Playing;
                debug!(seq, "Playback started");
            }
            Err(error) => {
                let speaker = self.active.take().map_or_else(String::new, |a| a.speaker);
                self.fail(&speaker, &error);
            }
        }
    }

    fn handle_synthesis_failed(&mut self, seq: u64, error: &SpeechError) {
        if self.active.as_ref().is_none_or(|a| a.seq != seq) {
            debug!(seq, error = %error, "Stale synthesis failure ignored");
            return;
        }
        let speaker = self.active.take().map_or_else(String::new, |a| a.speaker);
        self.fail(&speaker, error);
    }

    /// Report an engine/audio failure and return to `Idle`. Never fatal —
    /// the worker keeps accepting requests.
    fn fail(&mut self, speaker: &str, error: &SpeechError) {
        warn!(speaker, error = %error, "Utterance failed");
        {
            let mut status = self.status.lock().unwrap();
            status.state = SpeechStatus::Idle;
            status.last_error = Some(error.to_string());
        }
        self.emitter.emit(AppEvent::SpeakFailed {
            speaker: speaker.to_string(),
            error: error.to_string(),
        });
    }

    fn handle_playback_finished(&mut self, seq: u64) {
        if self.active.as_ref().is_none_or(|a| a.seq != seq) {
            return;
        }
        let active = self.active.take().expect("checked above");
        debug!(
            seq,
            speaker = %active.speaker,
            elapsed_ms = active.started_at.elapsed().as_millis() as u64,
            "Utterance finished"
        );

        // Completion restarts the dedup window.
        if let Some(last) = self.last_spoken.as_mut() {
            last.at = Instant::now();
        }

        {
            let mut status = self.status.lock().unwrap();
            status.state = SpeechStatus::Idle;
            status.last_error = None;
        }
        self.emitter.emit(AppEvent::SpeakFinished {
            speaker: active.speaker,
        });
    }
}

/// Per-request overrides win over the resolved profile.
fn apply_overrides(profile: &mut VoiceProfile, request: &SpeakRequest) {
    if let Some(style) = request.style_override {
        profile.style_id = style;
    }
    if let Some(params) = &request.params_override {
        if let Some(v) = params.speed_scale {
            profile.speed = v;
        }
        if let Some(v) = params.pitch_scale {
            profile.pitch = v;
        }
        if let Some(v) = params.intonation_scale {
            profile.intonation = v;
        }
        if let Some(v) = params.volume_scale {
            profile.volume = v;
        }
    }
}

// ── Service handle ─────────────────────────────────────────────────

/// Handle to the playback controller worker. Cheap to clone; all clones
/// feed the same ordered entry point.
#[derive(Clone)]
pub struct SpeechService {
    cmd_tx: mpsc::UnboundedSender<Command>,
    status: Arc<Mutex<StatusInner>>,
}

impl SpeechService {
    /// Spawn the controller worker. Must be called within a tokio runtime.
    pub fn spawn(
        engine: Arc<dyn SynthesisEngine>,
        sink: Arc<dyn AudioSink>,
        profiles: Arc<dyn ProfileStorePort>,
        emitter: Arc<dyn AppEventEmitter>,
        dedup_enabled: bool,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let status = Arc::new(Mutex::new(StatusInner {
            state: SpeechStatus::Idle,
            speaker: None,
            last_error: None,
        }));

        let controller = Controller {
            engine,
            sink,
            profiles,
            emitter,
            cmd_tx: cmd_tx.clone(),
            status: Arc::clone(&status),
            dedup_enabled,
            seq: 0,
            active: None,
            last_spoken: None,
            last_replay_at: None,
        };
        tokio::spawn(controller.run(cmd_rx));

        Self { cmd_tx, status }
    }

    fn send(&self, cmd: Command) -> Result<(), SpeechPortError> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| SpeechPortError::ControllerGone)
    }
}

#[async_trait]
impl SpeechPort for SpeechService {
    async fn speak(&self, request: SpeakRequest) -> Result<SubmitOutcome, SpeechPortError> {
        if request.text.trim().is_empty() {
            debug!("Empty speak request dropped");
            return Ok(SubmitOutcome::IgnoredEmpty);
        }
        self.send(Command::Speak(request))?;
        Ok(SubmitOutcome::Accepted)
    }

    async fn stop(&self) -> Result<(), SpeechPortError> {
        self.send(Command::Stop)
    }

    async fn replay(&self) -> Result<ReplayOutcome, SpeechPortError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Replay { reply })?;
        rx.await.map_err(|_| SpeechPortError::ControllerGone)
    }

    async fn status(&self) -> Result<SpeechStatusDto, SpeechPortError> {
        let inner = self.status.lock().unwrap().clone();
        Ok(SpeechStatusDto {
            state: inner.state,
            speaker: inner.speaker,
            last_error: inner.last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yomiage_core::profile::VoiceParams;

    fn base_profile() -> VoiceProfile {
        VoiceProfile {
            speaker_name: "default".to_string(),
            engine_speaker_id: 2,
            style_id: 2,
            speed: 1.0,
            pitch: 0.0,
            intonation: 1.0,
            volume: 1.0,
        }
    }

    #[test]
    fn overrides_replace_profile_fields() {
        let mut profile = base_profile();
        let mut request = SpeakRequest::new("default", "text");
        request.style_override = Some(8);
        request.params_override = Some(VoiceParams {
            speed_scale: Some(1.4),
            ..VoiceParams::default()
        });
        apply_overrides(&mut profile, &request);
        assert_eq!(profile.style_id, 8);
        assert!((profile.speed - 1.4).abs() < f32::EPSILON);
        // Untouched fields keep their resolved values.
        assert!((profile.intonation - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn overrides_absent_is_identity() {
        let mut profile = base_profile();
        let request = SpeakRequest::new("default", "text");
        apply_overrides(&mut profile, &request);
        assert_eq!(profile, base_profile());
    }
}
