//! Entity module - Plain data types stored in the clinic document.
//! Field names serialize in camelCase so documents written by earlier
//! versions of the tool load unchanged.

pub mod invoice;
pub mod service;
pub mod system_info;
pub mod user;

pub use invoice::{Invoice, ServiceLine};
pub use service::Service;
pub use system_info::SystemInfo;
pub use user::{Role, User};
