// LeadDesk - core/mod.rs
//
// Core business logic layer: pure, synchronous transforms over a
// request collection already materialised in memory.
// Must NOT depend on: store, platform, or any I/O beyond the Write
// sinks in export.

pub mod export;
pub mod filter;
pub mod grouping;
pub mod model;
pub mod stats;
