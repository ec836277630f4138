//! Function results and the action-chaining protocol
//!
//! A handler builds a [`ResultBuilder`], chains actions onto it, seals it
//! with [`ResultBuilder::build`] and returns the [`SealedResult`]. The host
//! receives the [`WireResponse`] rendering and runs the actions.
//!
//! Host ordering contract for a [`WireResponse`]:
//!
//! 1. `reply` is delivered to the caller first, whatever `post_process` says.
//! 2. `post_process == false`: every action runs in list order before the
//!    turn completes.
//! 3. `post_process == true`: the turn completes right after the reply and
//!    the actions run afterwards, in list order, without blocking the
//!    conversation. A `connect` with `final: true` ends the call once it
//!    completes.
//! 4. `global_data_patch` is applied exactly once, after the reply, and is
//!    visible to every later handler invocation of the same call.
//! 5. A failing action is reported. Nothing is rolled back or retried.

mod action;
mod builder;
mod error;
mod global_data;
mod wire;

#[cfg(test)]
mod proptests;

pub use action::{ActionKind, ActionRecord};
pub use builder::{ChainState, ResultBuilder, SealedResult};
pub use error::ResultError;
pub use global_data::GlobalStateMerge;
pub use wire::{WireAction, WireResponse};
