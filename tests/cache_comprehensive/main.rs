//! Cache Comprehensive Test Suite
//!
//! End-to-end coverage of normalization, identity reconciliation and the
//! query cache through the public `graphcache` API.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test cache_comprehensive
//!
//! # Run one module
//! cargo test --test cache_comprehensive query_cache_scenarios::
//!
//! # With engine logs
//! RUST_LOG=graphcache=trace cargo test --test cache_comprehensive -- --nocapture
//! ```


mod normalization_invariants;
mod property_tests;
mod reconciliation_tests;
