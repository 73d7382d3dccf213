//! Integration tests for the `SpeechService` playback controller.
//!
//! These tests drive the controller with mock engine/sink/profile backends.
//! No real audio hardware or network access is required — the mocks return
//! canned responses and record everything they are asked to do.
//!
//! # What is tested
//!
//! - A new request cancels in-flight synthesis before its own begins
//!   (the no-overlap law)
//! - A new request stops playing audio before its own starts
//! - Replay with no history is a no-op
//! - A second replay inside the cooldown issues no synthesis call
//! - The dedup gate: suppression, and the interrupt / bypass escapes
//! - Empty input is dropped without reaching the engine
//! - Engine failure returns the controller to idle and keeps it alive

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use yomiage_core::ports::{
    AppEventEmitter, ProfileStorePort, ProfileStoreError, ReplayOutcome, SpeechPort, SpeechStatus,
    SubmitOutcome,
};
use yomiage_core::profile::{CharacterTable, VoiceProfile};
use yomiage_core::request::SpeakRequest;
use yomiage_core::AppEvent;
use yomiage_voice::{AudioQuery, AudioSink, SpeechError, SpeechService, SynthesisEngine};

// ── Mock engine ────────────────────────────────────────────────────

/// One recorded `build_query` entry.
struct BuildCall {
    text: String,
    /// Whether every token handed out before this call was already
    /// cancelled when this call began — the no-overlap assertion.
    prior_all_cancelled: bool,
}

/// A synthesis engine that records calls and returns the utterance text as
/// its "audio" so the sink log can identify what played.
struct MockEngine {
    delay: Duration,
    fail: bool,
    calls: Mutex<Vec<BuildCall>>,
    tokens: Mutex<Vec<CancellationToken>>,
}

impl MockEngine {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail: false,
            calls: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Duration::ZERO)
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SynthesisEngine for MockEngine {
    async fn build_query(
        &self,
        text: &str,
        _profile: &VoiceProfile,
        cancel: &CancellationToken,
    ) -> Result<AudioQuery, SpeechError> {
        let prior_all_cancelled = self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .all(CancellationToken::is_cancelled);
        self.calls.lock().unwrap().push(BuildCall {
            text: text.to_string(),
            prior_all_cancelled,
        });
        self.tokens.lock().unwrap().push(cancel.clone());

        if self.fail {
            return Err(SpeechError::SynthesisFailed("mock engine refusal".into()));
        }
        if !self.delay.is_zero() {
            tokio::select! {
                () = cancel.cancelled() => return Err(SpeechError::Cancelled),
                () = tokio::time::sleep(self.delay) => {}
            }
        }
        Ok(AudioQuery(serde_json::json!({ "text": text })))
    }

    async fn render(
        &self,
        query: &AudioQuery,
        _profile: &VoiceProfile,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, SpeechError> {
        if cancel.is_cancelled() {
            return Err(SpeechError::Cancelled);
        }
        let text = query.0["text"].as_str().unwrap_or_default();
        Ok(text.as_bytes().to_vec())
    }
}

// ── Mock sink ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum SinkOp {
    Play(String),
    Stop,
}

/// An audio sink that records operations. With `auto_complete` the done
/// callback fires as soon as the buffer is "played", simulating a very
/// short utterance.
struct MockSink {
    ops: Mutex<Vec<SinkOp>>,
    auto_complete: bool,
}

impl MockSink {
    fn new(auto_complete: bool) -> Self {
        Self {
            ops: Mutex::new(Vec::new()),
            auto_complete,
        }
    }

    fn ops(&self) -> Vec<SinkOp> {
        self.ops.lock().unwrap().clone()
    }

    fn plays(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                SinkOp::Play(text) => Some(text),
                SinkOp::Stop => None,
            })
            .collect()
    }
}

impl AudioSink for MockSink {
    fn play(
        &self,
        wav: Vec<u8>,
        on_done: Box<dyn FnOnce() + Send + 'static>,
    ) -> Result<(), SpeechError> {
        self.ops
            .lock()
            .unwrap()
            .push(SinkOp::Play(String::from_utf8_lossy(&wav).into_owned()));
        if self.auto_complete {
            on_done();
        }
        Ok(())
    }

    fn stop(&self) {
        self.ops.lock().unwrap().push(SinkOp::Stop);
    }

    fn is_playing(&self) -> bool {
        false
    }
}

// ── Mock profiles and emitter ──────────────────────────────────────

struct MockProfiles(CharacterTable);

impl ProfileStorePort for MockProfiles {
    fn resolve(&self, speaker_name: &str) -> VoiceProfile {
        self.0.resolve(speaker_name)
    }

    fn current_profile(&self) -> String {
        "default".to_string()
    }

    fn list_profiles(&self) -> Result<Vec<String>, ProfileStoreError> {
        Ok(vec!["default".to_string()])
    }

    fn load_profile(&self, _name: &str) -> Result<(), ProfileStoreError> {
        Ok(())
    }
}

#[derive(Default)]
struct RecordingEmitter {
    events: Mutex<Vec<AppEvent>>,
}

impl RecordingEmitter {
    fn events(&self) -> Vec<AppEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AppEventEmitter for RecordingEmitter {
    fn emit(&self, event: AppEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ── Harness ────────────────────────────────────────────────────────

struct Harness {
    service: SpeechService,
    engine: Arc<MockEngine>,
    sink: Arc<MockSink>,
    emitter: Arc<RecordingEmitter>,
}

fn harness(engine: MockEngine, sink: MockSink) -> Harness {
    let engine = Arc::new(engine);
    let sink = Arc::new(sink);
    let emitter = Arc::new(RecordingEmitter::default());
    let profiles = Arc::new(MockProfiles(CharacterTable::default_template()));
    let service = SpeechService::spawn(
        Arc::clone(&engine) as Arc<dyn SynthesisEngine>,
        Arc::clone(&sink) as Arc<dyn AudioSink>,
        profiles,
        Arc::clone(&emitter) as Arc<dyn AppEventEmitter>,
        true,
    );
    Harness {
        service,
        engine,
        sink,
        emitter,
    }
}

/// Poll until `check` passes or a generous timeout elapses.
async fn wait_until(what: &str, mut check: impl FnMut() -> bool) {
    for _ in 0..400 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("timed out waiting for: {what}");
}

fn request(text: &str) -> SpeakRequest {
    SpeakRequest::new("default", text)
}

// ── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn new_request_cancels_inflight_synthesis() {
    let h = harness(MockEngine::new(Duration::from_millis(500)), MockSink::new(true));

    h.service.speak(request("first")).await.expect("speak");
    wait_until("first synthesis to begin", || h.engine.call_count() == 1).await;

    h.service.speak(request("second")).await.expect("speak");
    wait_until("second synthesis to begin", || h.engine.call_count() == 2).await;

    // The first token was cancelled before the second call began.
    let calls = h.engine.calls.lock().unwrap();
    assert!(calls[1].prior_all_cancelled, "first token must be cancelled first");
    assert_eq!(calls[1].text, "second");
    drop(calls);

    // Only the second utterance's audio ever reaches the sink.
    wait_until("second utterance to play", || !h.sink.plays().is_empty()).await;
    assert_eq!(h.sink.plays(), vec!["second".to_string()]);
}

#[tokio::test]
async fn new_request_stops_playing_audio_first() {
    let h = harness(MockEngine::new(Duration::ZERO), MockSink::new(false));

    h.service.speak(request("first")).await.expect("speak");
    wait_until("first utterance to play", || {
        h.sink.plays() == vec!["first".to_string()]
    })
    .await;

    h.service.speak(request("second")).await.expect("speak");
    wait_until("second utterance to play", || h.sink.plays().len() == 2).await;

    let ops = h.sink.ops();
    let first_play = ops.iter().position(|o| *o == SinkOp::Play("first".into()));
    let second_play = ops.iter().position(|o| *o == SinkOp::Play("second".into()));
    let stop_between = ops
        .iter()
        .enumerate()
        .any(|(i, o)| *o == SinkOp::Stop && i > first_play.unwrap() && i < second_play.unwrap());
    assert!(stop_between, "sink must be stopped between the two plays: {ops:?}");

    let mut state = h.service.status().await.expect("status").state;
    for _ in 0..400 {
        if state == SpeechStatus::Playing {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
        state = h.service.status().await.expect("status").state;
    }
    assert_eq!(state, SpeechStatus::Playing);
}

#[tokio::test]
async fn replay_with_no_history_is_noop() {
    let h = harness(MockEngine::new(Duration::ZERO), MockSink::new(true));

    let outcome = h.service.replay().await.expect("replay");
    assert_eq!(outcome, ReplayOutcome::NoUtterance);
    assert_eq!(h.engine.call_count(), 0);
}

#[tokio::test]
async fn second_replay_inside_cooldown_is_rejected() {
    let h = harness(MockEngine::new(Duration::ZERO), MockSink::new(true));

    h.service.speak(request("line")).await.expect("speak");
    wait_until("utterance to finish", || {
        h.emitter
            .events()
            .iter()
            .any(|e| matches!(e, AppEvent::SpeakFinished { .. }))
    })
    .await;

    let first = h.service.replay().await.expect("replay");
    assert_eq!(first, ReplayOutcome::Accepted);

    let second = h.service.replay().await.expect("replay");
    assert_eq!(second, ReplayOutcome::CoolingDown);

    wait_until("replayed utterance to synthesize", || h.engine.call_count() >= 2).await;
    // Original + exactly one replay.
    assert_eq!(h.engine.call_count(), 2);
}

#[tokio::test]
async fn duplicate_request_is_suppressed() {
    let h = harness(MockEngine::new(Duration::ZERO), MockSink::new(true));

    h.service.speak(request("同じ台詞。")).await.expect("speak");
    wait_until("utterance to finish", || {
        h.emitter
            .events()
            .iter()
            .any(|e| matches!(e, AppEvent::SpeakFinished { .. }))
    })
    .await;

    h.service.speak(request("同じ台詞。")).await.expect("speak");
    wait_until("suppression event", || {
        h.emitter
            .events()
            .iter()
            .any(|e| matches!(e, AppEvent::SpeakSuppressed { .. }))
    })
    .await;
    assert_eq!(h.engine.call_count(), 1);
}

#[tokio::test]
async fn interrupt_duplicate_is_not_suppressed() {
    let h = harness(MockEngine::new(Duration::ZERO), MockSink::new(true));

    h.service.speak(request("同じ台詞。")).await.expect("speak");
    wait_until("first synthesis", || h.engine.call_count() == 1).await;

    let mut dup = request("同じ台詞。");
    dup.interrupt = true;
    h.service.speak(dup).await.expect("speak");
    wait_until("duplicate to synthesize", || h.engine.call_count() == 2).await;
}

#[tokio::test]
async fn bypass_flag_defeats_dedup() {
    let h = harness(MockEngine::new(Duration::ZERO), MockSink::new(true));

    h.service.speak(request("同じ台詞。")).await.expect("speak");
    wait_until("first synthesis", || h.engine.call_count() == 1).await;

    let mut dup = request("同じ台詞。");
    dup.force_bypass_dedup = true;
    h.service.speak(dup).await.expect("speak");
    wait_until("duplicate to synthesize", || h.engine.call_count() == 2).await;
}

#[tokio::test]
async fn empty_text_never_reaches_the_engine() {
    let h = harness(MockEngine::new(Duration::ZERO), MockSink::new(true));

    let outcome = h.service.speak(request("   \n  ")).await.expect("speak");
    assert_eq!(outcome, SubmitOutcome::IgnoredEmpty);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(h.engine.call_count(), 0);
}

#[tokio::test]
async fn engine_failure_returns_to_idle_and_controller_survives() {
    let h = harness(MockEngine::failing(), MockSink::new(true));

    h.service.speak(request("落ちる台詞。")).await.expect("speak");
    wait_until("failure to surface", || {
        h.emitter
            .events()
            .iter()
            .any(|e| matches!(e, AppEvent::SpeakFailed { .. }))
    })
    .await;

    let status = h.service.status().await.expect("status");
    assert_eq!(status.state, SpeechStatus::Idle);
    assert!(status.last_error.is_some());

    // The controller keeps accepting requests after a failure.
    let outcome = h.service.speak(request("次の台詞。")).await.expect("speak");
    assert_eq!(outcome, SubmitOutcome::Accepted);
    wait_until("next request to synthesize", || h.engine.call_count() == 2).await;
}

#[tokio::test]
async fn stop_silences_playback_and_idles() {
    let h = harness(MockEngine::new(Duration::ZERO), MockSink::new(false));

    h.service.speak(request("長い台詞。")).await.expect("speak");
    wait_until("utterance to play", || !h.sink.plays().is_empty()).await;

    h.service.stop().await.expect("stop");
    let mut state = h.service.status().await.expect("status").state;
    for _ in 0..400 {
        if state == SpeechStatus::Idle {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
        state = h.service.status().await.expect("status").state;
    }
    assert_eq!(state, SpeechStatus::Idle);
    assert_eq!(h.sink.ops().last(), Some(&SinkOp::Stop));
}
