//! The access gate. This is the single decision point determining
//! pass-through vs. terminal response for every inbound request.

pub mod handler;
pub mod page;
pub mod settings;

pub use handler::{GateContext, GateOutcome, GateSettings, decide, gate};
pub use page::PageRenderer;

// vim: ts=4
