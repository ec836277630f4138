//! Execution-phase resolution
//!
//! Takes a wire response and runs it against the carrier in the order the
//! protocol requires: reply, then the global data patch, then the actions.
//! Immediate results are awaited; post-process results run on a spawned
//! task after the turn has been handed back.

use super::session::{CallSession, SessionStore};
use super::traits::{ActionObserver, CallControl, SmsGateway};
use crate::result::{ActionKind, ActionRecord, GlobalStateMerge, ResultError, WireAction, WireResponse};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Why a response was refused before anything ran
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] ResultError),
    #[error("Call {0} has already ended")]
    SessionEnded(String),
}

/// How one action went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    Delivered,
    Failed { error: String },
    /// The call ended before the action started
    Skipped,
}

/// Execution report for a single action
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub call_id: String,
    pub kind: ActionKind,
    /// Index in the response's `actions`; `None` for the reply and the
    /// global data patch
    pub position: Option<usize>,
    pub status: ActionStatus,
    pub finished_at: DateTime<Utc>,
}

/// What the turn looks like once `dispatch` returns
#[derive(Debug)]
pub enum TurnOutcome {
    /// Every action ran before returning
    Completed { reports: Vec<ActionReport> },
    /// Actions ran before returning and a final connect ended the call
    Terminated { reports: Vec<ActionReport> },
    /// Post-process actions are running in the background
    Deferred { handle: JoinHandle<Vec<ActionReport>> },
}

/// A validated wire response, ready to run
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan {
    pub reply: String,
    pub post_process: bool,
    pub patch: GlobalStateMerge,
    pub actions: Vec<ActionRecord>,
}

impl ExecutionPlan {
    pub fn ends_call(&self) -> bool {
        self.actions.iter().any(ActionRecord::ends_call)
    }
}

impl TryFrom<WireResponse> for ExecutionPlan {
    type Error = ResultError;

    /// Re-check a response received over the wire. Payload rules match the
    /// builder, patch keys included; `final` must agree with the actions.
    fn try_from(response: WireResponse) -> Result<Self, Self::Error> {
        let mut patch = GlobalStateMerge::new();
        patch.merge(Value::Object(response.global_data_patch.into_map()))?;

        let actions = response
            .actions
            .into_iter()
            .map(|action| match action {
                WireAction::Say { text } => ActionRecord::speak(text),
                WireAction::SendSms { to, from, body } => ActionRecord::send_sms(to, from, body),
                WireAction::Connect { target, is_final } => ActionRecord::connect(target, is_final),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let terminating = actions.iter().filter(|a| a.ends_call()).count();
        if terminating > 1 {
            return Err(ResultError::chain_state(
                "response contains more than one final connect",
            ));
        }
        if let Some(pos) = actions.iter().position(ActionRecord::ends_call) {
            if pos + 1 != actions.len() {
                return Err(ResultError::chain_state(
                    "final connect must be the last action",
                ));
            }
        }
        if response.is_final != (terminating == 1) {
            return Err(ResultError::chain_state(
                "final flag does not match the actions",
            ));
        }

        Ok(Self {
            reply: response.reply,
            post_process: response.post_process,
            patch,
            actions,
        })
    }
}

#[derive(Clone)]
struct Carrier {
    sms: Arc<dyn SmsGateway>,
    calls: Arc<dyn CallControl>,
    observers: Vec<Arc<dyn ActionObserver>>,
}

/// Runs wire responses for live calls
pub struct ActionExecutor {
    carrier: Carrier,
    sessions: Arc<SessionStore>,
}

impl ActionExecutor {
    pub fn new(
        sms: Arc<dyn SmsGateway>,
        calls: Arc<dyn CallControl>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            carrier: Carrier {
                sms,
                calls,
                observers: Vec::new(),
            },
            sessions,
        }
    }

    /// Register an observer for per-action reports
    pub fn with_observer(mut self, observer: Arc<dyn ActionObserver>) -> Self {
        self.carrier.observers.push(observer);
        self
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Run a response for `call_id` according to its execution phase.
    ///
    /// Validation happens first; an invalid response delivers nothing.
    pub async fn dispatch(
        &self,
        call_id: &str,
        response: WireResponse,
    ) -> Result<TurnOutcome, DispatchError> {
        let plan = ExecutionPlan::try_from(response)?;
        let session = self.sessions.get_or_create(call_id).await;
        if session.is_ended() {
            return Err(DispatchError::SessionEnded(call_id.to_string()));
        }

        let ended = plan.ends_call();
        let mut reports = Vec::new();
        if !plan.reply.is_empty() {
            reports.push(self.carrier.deliver_reply(&session, &plan.reply).await);
        }

        if !plan.patch.is_empty() {
            let patch = ActionRecord::update_global_data(plan.patch);
            reports.push(self.carrier.run_one(&session, None, &patch).await);
        }

        if plan.post_process {
            let carrier = self.carrier.clone();
            let actions = plan.actions;
            tracing::info!(call_id = %call_id, actions = actions.len(), "Deferring post-process actions");
            let handle = tokio::spawn(async move {
                reports.extend(carrier.run_all(&session, &actions).await);
                reports
            });
            return Ok(TurnOutcome::Deferred { handle });
        }

        reports.extend(self.carrier.run_all(&session, &plan.actions).await);
        if ended && session.is_ended() {
            Ok(TurnOutcome::Terminated { reports })
        } else {
            Ok(TurnOutcome::Completed { reports })
        }
    }
}

impl Carrier {
    /// Speak the reply. A failure is reported but does not stop the actions.
    async fn deliver_reply(&self, session: &CallSession, reply: &str) -> ActionReport {
        let status = match self.calls.say(session.call_id(), reply).await {
            Ok(()) => ActionStatus::Delivered,
            Err(e) => {
                tracing::warn!(call_id = %session.call_id(), error = %e, "Reply delivery failed");
                ActionStatus::Failed { error: e.message }
            }
        };
        self.report(session, None, ActionKind::Speak, status)
    }

    /// Run actions in order. Unstarted actions are skipped once the call has
    /// ended; a started action always runs to completion or failure.
    async fn run_all(&self, session: &CallSession, actions: &[ActionRecord]) -> Vec<ActionReport> {
        let mut reports = Vec::with_capacity(actions.len());
        for (position, action) in actions.iter().enumerate() {
            let report = if session.is_ended() {
                let report = self.report(session, Some(position), action.kind(), ActionStatus::Skipped);
                tracing::warn!(call_id = %session.call_id(), action = %action.kind(), position, "Call ended, action skipped");
                report
            } else {
                self.run_one(session, Some(position), action).await
            };
            reports.push(report);
        }
        reports
    }

    async fn run_one(
        &self,
        session: &CallSession,
        position: Option<usize>,
        action: &ActionRecord,
    ) -> ActionReport {
        let call_id = session.call_id();
        let result = match action {
            ActionRecord::Speak { text } => self.calls.say(call_id, text).await,
            ActionRecord::SendSms {
                to_number,
                from_number,
                body,
            } => self.sms.send_sms(call_id, to_number, from_number, body).await,
            ActionRecord::Connect { target, is_final } => {
                self.calls.connect(call_id, target, *is_final).await
            }
            ActionRecord::UpdateGlobalData { patch } => {
                session.apply_patch(patch).await;
                Ok(())
            }
        };

        let status = match result {
            Ok(()) => {
                tracing::info!(call_id = %call_id, action = %action.kind(), ?position, "Action delivered");
                if action.ends_call() {
                    session.end();
                    tracing::info!(call_id = %call_id, "Final connect completed, call ended");
                }
                ActionStatus::Delivered
            }
            Err(e) => {
                tracing::error!(call_id = %call_id, action = %action.kind(), ?position, error = %e, "Action failed");
                ActionStatus::Failed { error: e.message }
            }
        };
        self.report(session, position, action.kind(), status)
    }

    fn report(
        &self,
        session: &CallSession,
        position: Option<usize>,
        kind: ActionKind,
        status: ActionStatus,
    ) -> ActionReport {
        let report = ActionReport {
            call_id: session.call_id().to_string(),
            kind,
            position,
            status,
            finished_at: Utc::now(),
        };
        for observer in &self.observers {
            observer.on_action(&report);
        }
        report
    }
}
