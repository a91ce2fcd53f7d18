//! Identity management
//!
//! Registration requests, validated identities, and the registry that stores
//! them for login and recipient lookup.

pub mod registry;
pub mod types;

pub use registry::UserRegistry;
pub use types::{Identity, Registration};
