//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `ticket` - Ticket lifecycle, threads, prompt composition and reply parsing

pub mod foundation;
pub mod ticket;
