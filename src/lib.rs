//! Ticket Agent - IT helpdesk assistant backend.
//!
//! Turns free-text support requests into threaded, retrieval-augmented
//! conversations with a language model and returns structured guidance.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
