//! Deterministic simulation harness for keytap testing.
//!
//! Stand-ins for the two things the terminal runtime takes from the outside
//! world: time and input bytes. The real [`Listener`](keytap_term::Listener)
//! and [`KeystrokeReader`](keytap_term::KeystrokeReader) threads run unchanged
//! on top of them.
//!
//! - [`ManualClock`]: virtual time that only moves when a test advances it
//! - [`ScriptedSource`]: channel-fed bytes with observable raw-mode state
//! - [`ChaoticSource`]: seeded fault injection around any byte source

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod chaotic_source;
pub mod manual_clock;
pub mod scripted_source;

pub use chaotic_source::{ChaosStats, ChaoticSource};
pub use manual_clock::ManualClock;
pub use scripted_source::{ScriptHandle, ScriptedSource, scripted};
