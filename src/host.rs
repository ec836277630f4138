//! In-process host for function results
//!
//! Applies global data to per-call sessions and runs actions against a
//! carrier, honoring the execution-phase contract in [`crate::result`].

mod carrier;
mod executor;
mod session;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use carrier::{DryRunCarrier, WebhookCarrier};
pub use executor::{
    ActionExecutor, ActionReport, ActionStatus, DispatchError, ExecutionPlan, TurnOutcome,
};
pub use session::{CallSession, SessionStore};
pub use traits::*;
