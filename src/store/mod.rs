// LeadDesk - store/mod.rs
//
// In-memory collection stores with push-based change subscriptions, plus
// JSON snapshot loading. The stateful layer the pure core is fed from.
// Depends on core (data model) and util only.

pub mod directory;
pub mod requests;
pub mod snapshot;
