// LeadDesk - lib.rs
//
// Library entry point, exposing all modules for integration testing and
// programmatic use.
//
// The CLI surface lives in `main.rs` and is not part of the library.

pub mod core;
pub mod platform;
pub mod store;
pub mod util;
