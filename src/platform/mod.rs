// LeadDesk - platform/mod.rs
//
// Platform integration: directory resolution and configuration loading.

pub mod config;
