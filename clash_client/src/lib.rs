//! `clash_client`
//!
//! Host-side pieces around the game core:
//! - Input sources (idle, scripted, autopilot)
//! - Frame clocks
//! - The frame loop, cooperative with a blocking fallback
//! - Session summaries built from game events
//! - Bundle completeness check for packaged builds

pub mod bundle;
pub mod client;
pub mod clock;
pub mod input;
pub mod runner;

pub use client::{GameClient, RunMode, SessionSummary};
