//! Vestibule Application Layer
//!
//! The session/authorization core behind the web routes:
//!
//! - Capability registry and authorization engine (`auth`)
//! - Credential validation (`auth::authentication`)
//! - User accounts (`user`), sessions (`session`) and activation tokens
//!   (`activation`) backed by the relational store
//! - Outgoing mail interface (`mailer`)
//!
//! All state lives in the backing store; the layer holds no shared mutable
//! state of its own.

pub mod activation;
pub mod auth;
pub mod database;
pub mod mailer;
pub mod session;
pub mod user;

pub use activation::{ActivationFlow, ActivationToken};
pub use auth::{
    can, can_for, filter_output, require, require_for, Actor, Authenticator, Capability,
    PasswordScheme,
};
pub use database::{connect, prepare_database};
pub use mailer::{LogMailer, Mail, Mailer, MemoryMailer};
pub use session::{Session, SessionStore};
pub use user::{NewUser, User, UserStore, UserUpdate};
