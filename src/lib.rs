//! Action-chaining function results for voice agents
//!
//! Function handlers describe side effects (SMS, call transfer, shared
//! call state) as an ordered, immutable result. A host delivers the reply
//! and then runs the actions, either before the turn completes or after it
//! (post-process).

pub mod api;
pub mod config;
pub mod host;
pub mod result;
pub mod tools;
