//! `ClinicLedger` - An offline billing console for a small diagnostic clinic
//!
//! This crate provides the complete billing core for a single-clinic deployment:
//! a JSON document store with debounced auto-save, a priced service catalog,
//! invoice creation with price snapshots, and revenue reporting, fronted by an
//! interactive terminal console.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    // Documentation - missing docs should be added gradually
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,
    clippy::nursery,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_types_passed_by_value,
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Complexity and readability
    clippy::cognitive_complexity,
    clippy::large_enum_variant,
    clippy::match_same_arms,
    clippy::too_many_lines,

    // Style consistency
    clippy::enum_glob_use,
    clippy::inconsistent_struct_constructor,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

// Note: `missing_docs` is set to `warn` instead of `deny` because we want to
// gradually add documentation rather than block compilation

/// Configuration management for the data directory and auto-save timing
pub mod config;
/// Interactive terminal interface - login, menus, and screen flow
pub mod console;
/// Shared handle bundling the document store and the notification channel
pub mod context;
/// Core business logic - framework-agnostic catalog, invoice, account, and reporting operations
pub mod core;
/// Record definitions for the document's users, services, and invoices
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Notification channel carrying operation outcomes to the view
pub mod notify;
/// Document ownership, storage backends, and the auto-save engine
pub mod store;

#[cfg(test)]
pub mod test_utils;
