//! Fluent result builder
//!
//! Lifecycle: `Open -> Sealed` via [`ResultBuilder::build`]. While open, a
//! result moves `NotFinal -> Final` when a terminating connect is added.
//! Both transitions are one-way.

use super::wire::WireResponse;
use super::{ActionRecord, GlobalStateMerge, ResultError};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Where a builder is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainState {
    #[default]
    Open,
    /// A terminating connect was added; nothing else may be appended
    Final,
    /// `build()` was called; the builder rejects every mutation
    Sealed,
}

/// Accumulates the reply and actions a function handler returns.
///
/// Every mutating call returns `&mut Self` so calls chain with `?`:
///
/// ```
/// use serde_json::json;
/// use swaig_chain::result::ResultBuilder;
///
/// # fn main() -> Result<(), swaig_chain::result::ResultError> {
/// let mut result = ResultBuilder::new("Transferring you now.");
/// result
///     .mark_post_process()?
///     .merge_global_data(json!({"escalation_reason": "billing"}))?
///     .add_connect("+15551234567", true)?;
/// let sealed = result.build()?;
/// assert!(sealed.is_final());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ResultBuilder {
    reply: String,
    actions: Vec<ActionRecord>,
    global_data: GlobalStateMerge,
    post_process: bool,
    is_final: bool,
    state: ChainState,
}

impl ResultBuilder {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            ..Self::default()
        }
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    pub fn reply(&self) -> &str {
        &self.reply
    }

    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    pub fn set_reply(&mut self, text: impl Into<String>) -> Result<&mut Self, ResultError> {
        self.ensure_appendable("set the reply")?;
        self.reply = text.into();
        Ok(self)
    }

    pub fn add_speak(&mut self, text: impl Into<String>) -> Result<&mut Self, ResultError> {
        self.ensure_appendable("add a say action")?;
        self.actions.push(ActionRecord::speak(text)?);
        Ok(self)
    }

    pub fn add_send_sms(
        &mut self,
        to_number: impl Into<String>,
        from_number: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<&mut Self, ResultError> {
        self.ensure_appendable("add a send_sms action")?;
        self.actions
            .push(ActionRecord::send_sms(to_number, from_number, body)?);
        Ok(self)
    }

    /// Append a connect. `is_final` makes it the call's terminating action.
    pub fn add_connect(
        &mut self,
        target: impl Into<String>,
        is_final: bool,
    ) -> Result<&mut Self, ResultError> {
        self.ensure_appendable("add a connect action")?;
        self.actions.push(ActionRecord::connect(target, is_final)?);
        if is_final {
            self.is_final = true;
            self.state = ChainState::Final;
        }
        Ok(self)
    }

    /// Defer every action until after the reply has been delivered.
    ///
    /// Applies to the whole result, not to individual actions.
    pub fn mark_post_process(&mut self) -> Result<&mut Self, ResultError> {
        self.ensure_open("mark post-process")?;
        self.post_process = true;
        Ok(self)
    }

    pub fn merge_global_data(&mut self, patch: Value) -> Result<&mut Self, ResultError> {
        self.ensure_appendable("update global data")?;
        self.global_data.merge(patch)?;
        Ok(self)
    }

    /// Seal the builder and return an immutable snapshot.
    ///
    /// Can only succeed once; afterwards every call on this builder fails.
    pub fn build(&mut self) -> Result<SealedResult, ResultError> {
        self.ensure_open("build")?;
        self.state = ChainState::Sealed;
        tracing::debug!(
            actions = self.actions.len(),
            post_process = self.post_process,
            is_final = self.is_final,
            "Function result sealed"
        );
        Ok(SealedResult {
            reply: self.reply.clone(),
            actions: self.actions.clone(),
            global_data: self.global_data.clone(),
            post_process: self.post_process,
            is_final: self.is_final,
        })
    }

    fn ensure_open(&self, op: &str) -> Result<(), ResultError> {
        if self.state == ChainState::Sealed {
            return Err(ResultError::chain_state(format!(
                "cannot {op}: result has already been built"
            )));
        }
        Ok(())
    }

    fn ensure_appendable(&self, op: &str) -> Result<(), ResultError> {
        self.ensure_open(op)?;
        if self.state == ChainState::Final {
            return Err(ResultError::chain_state(format!(
                "cannot {op}: result already ends the call"
            )));
        }
        Ok(())
    }
}

/// Immutable snapshot returned by [`ResultBuilder::build`]
#[derive(Debug, Clone, PartialEq)]
pub struct SealedResult {
    reply: String,
    actions: Vec<ActionRecord>,
    global_data: GlobalStateMerge,
    post_process: bool,
    is_final: bool,
}

impl SealedResult {
    pub fn reply(&self) -> &str {
        &self.reply
    }

    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    pub fn global_data(&self) -> &GlobalStateMerge {
        &self.global_data
    }

    pub fn is_post_process(&self) -> bool {
        self.post_process
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Render into the wire schema the host consumes
    pub fn to_wire(&self) -> WireResponse {
        WireResponse::from_sealed(self)
    }

    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self.to_wire())
    }
}

impl Serialize for SealedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}
