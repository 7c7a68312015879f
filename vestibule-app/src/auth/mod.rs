//! Authentication and Authorization Module
//!
//! The capability registry, the authorization engine over it, password
//! hashing and the credential-validation flow. Decisions are pure and
//! side-effect free; persistence lives in the sibling store modules.

pub mod actor;
pub mod authentication;
pub mod authorization;
pub mod capability;
pub mod password;

pub use actor::Actor;
pub use authentication::Authenticator;
pub use authorization::{can, can_for, filter_output, require, require_for};
pub use capability::Capability;
pub use password::PasswordScheme;
