//! Core module - Contains all framework-agnostic business logic.
//! Operations take the shared context, mutate through the document store's
//! accessors, and report outcomes over the notification channel. Nothing in
//! here knows about the terminal front end.

pub mod account;
pub mod catalog;
pub mod export;
pub mod invoice;
pub mod report;
