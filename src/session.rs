/// Playback session controller: owns the actuator and the single
/// "current session" slot.
///
///   Idle → Running → Completed | Cancelled
///
/// Starting a session always cancels the previous one first (hardware stop
/// plus token cancel), so two sessions never overlap. Hardware failures
/// inside a session are logged and end it as Cancelled; they are never
/// retried and never reach the caller.

use crate::actuator::Actuator;
use crate::cancel::CancelToken;
use crate::pattern::Pattern;
use crate::scheduler::{self, SequenceOutcome, Strategy};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::{Duration, sleep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Latest session and its state, as published on the watch channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub id: Option<SessionId>,
    pub state: SessionState,
}

struct ActiveSession {
    id: SessionId,
    strategy: Strategy,
    token: CancelToken,
}

pub struct SessionController {
    actuator: Arc<dyn Actuator>,
    runtime: Handle,
    status: Arc<watch::Sender<SessionStatus>>,
    current: Option<ActiveSession>,
    next_id: u64,
}

impl SessionController {
    pub fn new(actuator: Arc<dyn Actuator>, runtime: Handle) -> Self {
        let (status, _) = watch::channel(SessionStatus { id: None, state: SessionState::Idle });
        Self {
            actuator,
            runtime,
            status: Arc::new(status),
            current: None,
            next_id: 1,
        }
    }

    pub fn actuator(&self) -> &dyn Actuator {
        self.actuator.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    pub fn state(&self) -> SessionState {
        self.status().state
    }

    /// Id of the session occupying the slot, if any.
    pub fn current(&self) -> Option<SessionId> {
        self.current.as_ref().map(|s| s.id)
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Supersede whatever is playing with `pattern`.
    /// Returns `None` when nothing was started (empty pattern or no actuator).
    pub fn start_session(&mut self, pattern: Pattern) -> Option<SessionId> {
        self.cancel();

        if pattern.is_empty() {
            log::debug!("Empty pattern, nothing to play");
            return None;
        }
        let caps = self.actuator.capabilities();
        let Some(strategy) = scheduler::select(caps) else {
            log::debug!("No actuator present, ignoring pattern of {} event(s)", pattern.len());
            return None;
        };

        let id = SessionId(self.next_id);
        self.next_id += 1;
        let token = CancelToken::new();
        self.status.send_replace(SessionStatus { id: Some(id), state: SessionState::Running });
        log::debug!(
            "Session {id} started: {} event(s), {}ms, {strategy:?}",
            pattern.len(),
            pattern.total_duration_ms()
        );

        match strategy {
            Strategy::NativeWaveform => {
                if let Err(e) = scheduler::play_waveform(self.actuator.as_ref(), &pattern) {
                    log::warn!("Session {id}: waveform failed: {e}");
                    abort_after_failure(self.actuator.as_ref(), &self.status, id);
                    return Some(id);
                }
                // No completion signal from hardware; assume done once the
                // waveform's own duration has elapsed.
                let total = Duration::from_millis(pattern.total_duration_ms());
                let status = Arc::clone(&self.status);
                let timer_token = token.clone();
                self.runtime.spawn(async move {
                    tokio::select! {
                        _ = sleep(total) => {
                            timer_token.run_unless_cancelled(|| finish(&status, id, SessionState::Completed));
                        }
                        _ = timer_token.cancelled() => {}
                    }
                });
            }
            Strategy::EmulatedSequence => {
                let actuator = Arc::clone(&self.actuator);
                let status = Arc::clone(&self.status);
                let task_token = token.clone();
                self.runtime.spawn(async move {
                    match scheduler::play_sequence(actuator.as_ref(), &pattern, &task_token).await {
                        SequenceOutcome::Completed => {
                            task_token.run_unless_cancelled(|| finish(&status, id, SessionState::Completed));
                        }
                        SequenceOutcome::Cancelled => {}
                        SequenceOutcome::Failed(e) => {
                            log::warn!("Session {id}: actuation failed: {e}");
                            task_token.run_unless_cancelled(|| abort_after_failure(actuator.as_ref(), &status, id));
                        }
                    }
                });
            }
        }

        self.current = Some(ActiveSession { id, strategy, token });
        Some(id)
    }

    /// Stop the running session, if any. Idempotent.
    ///
    /// Once this returns, no further emulated step of the old session runs.
    /// The hardware stop itself is best-effort.
    pub fn cancel(&mut self) {
        let Some(session) = self.current.take() else {
            return;
        };
        session.token.cancel();

        let status = self.status();
        if status.id != Some(session.id) || status.state != SessionState::Running {
            return;
        }
        if let Err(e) = self.actuator.stop() {
            log::warn!("Session {}: stop failed: {e}", session.id);
        }
        finish(&self.status, session.id, SessionState::Cancelled);
        log::debug!("Session {} cancelled ({:?})", session.id, session.strategy);
    }
}

/// Move session `id` from Running to `state`. Stale sessions are ignored.
fn finish(status: &watch::Sender<SessionStatus>, id: SessionId, state: SessionState) {
    let changed = status.send_if_modified(|s| {
        if s.id == Some(id) && s.state == SessionState::Running {
            s.state = state;
            true
        } else {
            false
        }
    });
    if changed {
        log::debug!("Session {id} {state:?}");
    }
}

fn abort_after_failure(actuator: &dyn Actuator, status: &watch::Sender<SessionStatus>, id: SessionId) {
    if let Err(e) = actuator.stop() {
        log::debug!("Session {id}: stop after failure also failed: {e}");
    }
    finish(status, id, SessionState::Cancelled);
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::testing::{Op, RecordingActuator};
    use crate::capability::ActuatorKind;
    use crate::pattern::HapticEvent;

    fn pattern(events: &[(u64, f64)]) -> Pattern {
        Pattern::new(events.iter().map(|&(d, i)| HapticEvent::new(d, i)).collect())
    }

    fn controller(kind: ActuatorKind) -> (Arc<RecordingActuator>, SessionController) {
        let act = Arc::new(RecordingActuator::new(kind));
        let ctl = SessionController::new(act.clone(), Handle::current());
        (act, ctl)
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_without_session_is_a_noop() {
        let (act, mut ctl) = controller(ActuatorKind::BinaryOnly);
        ctl.cancel();
        ctl.cancel();
        assert_eq!(ctl.state(), SessionState::Idle);
        assert!(act.ops().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn binary_pattern_buzzes_waits_and_completes() {
        let (act, mut ctl) = controller(ActuatorKind::BinaryOnly);
        let id = ctl.start_session(pattern(&[(50, 0.6), (50, 0.0)]));
        assert!(id.is_some());
        assert_eq!(ctl.state(), SessionState::Running);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(act.timeline(), vec![(0, Op::Once(50))]);
        assert_eq!(ctl.status(), SessionStatus { id, state: SessionState::Completed });
    }

    #[tokio::test(start_paused = true)]
    async fn waveform_pattern_is_one_call_and_auto_completes() {
        let (act, mut ctl) = controller(ActuatorKind::WaveformCapable);
        ctl.start_session(pattern(&[(50, 0.6), (50, 0.0)]));
        assert_eq!(
            act.ops(),
            vec![Op::Waveform { timings: vec![50, 50], amplitudes: vec![153, 0] }]
        );
        sleep(Duration::from_millis(99)).await;
        assert_eq!(ctl.state(), SessionState::Running);
        sleep(Duration::from_millis(2)).await;
        assert_eq!(ctl.state(), SessionState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_pattern_or_absent_actuator_does_nothing() {
        let (act, mut ctl) = controller(ActuatorKind::WaveformCapable);
        assert_eq!(ctl.start_session(Pattern::default()), None);

        act.set_kind(ActuatorKind::Absent);
        assert_eq!(ctl.start_session(pattern(&[(50, 0.5)])), None);
        assert!(act.ops().is_empty());
        assert_eq!(ctl.state(), SessionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn new_session_supersedes_old_without_interleaving() {
        let (act, mut ctl) = controller(ActuatorKind::BinaryOnly);
        let a = ctl.start_session(pattern(&[(100, 0.5), (100, 0.0), (100, 0.5)]));
        sleep(Duration::from_millis(50)).await;

        let b = ctl.start_session(pattern(&[(30, 0.9), (30, 0.9)]));
        assert_ne!(a, b);
        assert_eq!(ctl.current(), b);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(
            act.timeline(),
            vec![(0, Op::Once(100)), (50, Op::Stop), (50, Op::Once(30)), (80, Op::Once(30))]
        );
        assert_eq!(ctl.status(), SessionStatus { id: b, state: SessionState::Completed });
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_remaining_steps() {
        let (act, mut ctl) = controller(ActuatorKind::BinaryOnly);
        let mut rx = ctl.subscribe();
        ctl.start_session(pattern(&[(100, 0.5), (100, 0.5)]));
        sleep(Duration::from_millis(20)).await;

        ctl.cancel();
        assert_eq!(ctl.state(), SessionState::Cancelled);
        assert_eq!(rx.borrow_and_update().state, SessionState::Cancelled);
        assert_eq!(ctl.current(), None);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(act.ops(), vec![Op::Once(100), Op::Stop]);
        ctl.cancel();
        assert_eq!(act.ops().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_completion_sends_no_stop() {
        let (act, mut ctl) = controller(ActuatorKind::WaveformCapable);
        ctl.start_session(pattern(&[(10, 0.5)]));
        sleep(Duration::from_millis(50)).await;
        ctl.cancel();
        assert_eq!(ctl.state(), SessionState::Completed);
        assert!(!act.ops().contains(&Op::Stop));
    }

    #[tokio::test(start_paused = true)]
    async fn hardware_failure_becomes_cancelled() {
        let (act, mut ctl) = controller(ActuatorKind::WaveformCapable);
        act.fail_actuation(true);
        let id = ctl.start_session(pattern(&[(10, 0.5)]));
        assert_eq!(ctl.status(), SessionStatus { id, state: SessionState::Cancelled });
        assert_eq!(act.ops(), vec![Op::Stop]);

        act.set_kind(ActuatorKind::BinaryOnly);
        let id = ctl.start_session(pattern(&[(10, 0.5)]));
        sleep(Duration::from_millis(5)).await;
        assert_eq!(ctl.status(), SessionStatus { id, state: SessionState::Cancelled });

        // The next request starts cleanly.
        act.fail_actuation(false);
        let id = ctl.start_session(pattern(&[(10, 0.5)]));
        sleep(Duration::from_millis(20)).await;
        assert_eq!(ctl.status(), SessionStatus { id, state: SessionState::Completed });
    }

    #[tokio::test(start_paused = true)]
    async fn silent_pattern_still_runs_a_session() {
        let (act, mut ctl) = controller(ActuatorKind::BinaryOnly);
        let id = ctl.start_session(pattern(&[(40, 0.0)]));
        assert!(id.is_some());
        sleep(Duration::from_millis(39)).await;
        assert_eq!(ctl.state(), SessionState::Running);
        sleep(Duration::from_millis(2)).await;
        assert_eq!(ctl.state(), SessionState::Completed);
        assert!(act.ops().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn cancel_from_another_thread_leaves_no_step_after_stop() {
        let (act, mut ctl) = controller(ActuatorKind::BinaryOnly);
        ctl.start_session(pattern(&[(5, 0.5); 100]));
        sleep(Duration::from_millis(20)).await;

        ctl.cancel();
        assert_eq!(ctl.state(), SessionState::Cancelled);
        sleep(Duration::from_millis(50)).await;

        let ops = act.ops();
        let stop_at = ops.iter().position(|op| *op == Op::Stop).expect("stop issued");
        assert_eq!(stop_at, ops.len() - 1, "actuation after stop: {ops:?}");
        assert!(ops[..stop_at].iter().all(|op| *op == Op::Once(5)));
    }
}
