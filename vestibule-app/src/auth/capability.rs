//! Capability Registry
//!
//! Static, data-driven mapping from capabilities to the entity fields they
//! may read, plus the default feature sets handed to new, activated and
//! anonymous actors. Pure data, no state, no side effects.

use serde::{Deserialize, Serialize};

/// Specific capabilities that can be granted to actors
///
/// The wire form is `"<verb>:<resource>"`, with an explicit `:others` variant
/// where an action may target an entity other than the actor itself.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    /// Register a new account
    #[serde(rename = "create:user")]
    CreateUser,
    /// Read user profiles
    #[serde(rename = "read:user")]
    ReadUser,
    /// Update the actor's own profile
    #[serde(rename = "update:user")]
    UpdateUser,
    /// Update profiles other than the actor's own
    #[serde(rename = "update:user:others")]
    UpdateUserOthers,
    /// Log in (mint a session)
    #[serde(rename = "create:session")]
    CreateSession,
    /// Read session records
    #[serde(rename = "read:session")]
    ReadSession,
    /// Redeem activation tokens
    #[serde(rename = "read:activation_token")]
    ReadActivationToken,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::CreateUser => write!(f, "create:user"),
            Capability::ReadUser => write!(f, "read:user"),
            Capability::UpdateUser => write!(f, "update:user"),
            Capability::UpdateUserOthers => write!(f, "update:user:others"),
            Capability::CreateSession => write!(f, "create:session"),
            Capability::ReadSession => write!(f, "read:session"),
            Capability::ReadActivationToken => write!(f, "read:activation_token"),
        }
    }
}

impl std::str::FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create:user" => Ok(Capability::CreateUser),
            "read:user" => Ok(Capability::ReadUser),
            "update:user" => Ok(Capability::UpdateUser),
            "update:user:others" => Ok(Capability::UpdateUserOthers),
            "create:session" => Ok(Capability::CreateSession),
            "read:session" => Ok(Capability::ReadSession),
            "read:activation_token" => Ok(Capability::ReadActivationToken),
            _ => Err(format!("Unknown capability: {}", s)),
        }
    }
}

impl Capability {
    /// The `:others` form of this capability, where one exists
    ///
    /// Self targets check the bare capability; any other target requires the
    /// variant returned here. A capability with no variant never applies to
    /// non-self targets.
    pub fn others_variant(&self) -> Option<Capability> {
        match self {
            Capability::UpdateUser => Some(Capability::UpdateUserOthers),
            _ => None,
        }
    }

    /// Entity fields a read capability is allowed to expose
    ///
    /// Non-read capabilities project to nothing. This table is the single
    /// source of truth consulted by output filtering.
    pub fn readable_fields(&self) -> &'static [&'static str] {
        match self {
            Capability::ReadUser => &["id", "username", "features", "created_at", "updated_at"],
            Capability::ReadSession => &["id", "token", "expires_at", "created_at", "updated_at"],
            Capability::ReadActivationToken => {
                &["id", "used_at", "expires_at", "created_at", "updated_at"]
            }
            Capability::CreateUser
            | Capability::UpdateUser
            | Capability::UpdateUserOthers
            | Capability::CreateSession => &[],
        }
    }

    /// Default feature set for a brand-new, unactivated user
    pub fn new_user_features() -> Vec<Capability> {
        vec![Capability::ReadActivationToken]
    }

    /// Features granted when an activation token is redeemed
    pub fn activation_grant() -> Vec<Capability> {
        vec![
            Capability::CreateSession,
            Capability::ReadSession,
            Capability::ReadUser,
            Capability::UpdateUser,
        ]
    }

    /// Feature set of the synthetic anonymous actor
    pub fn anonymous_features() -> Vec<Capability> {
        vec![
            Capability::ReadActivationToken,
            Capability::CreateSession,
            Capability::CreateUser,
        ]
    }
}
