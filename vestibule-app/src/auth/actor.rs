//! Actor identity
//!
//! Any requester, authenticated or anonymous, carrying a feature list. The
//! anonymous actor is synthetic and never persisted.

use super::Capability;

/// The subject of every authorization decision
#[derive(Debug, Clone)]
pub struct Actor {
    /// Persisted user id, absent for the anonymous actor
    pub id: Option<String>,
    /// Username for logging and self-target checks
    pub username: Option<String>,
    /// Granted capabilities, in grant order
    pub features: Vec<Capability>,
}

impl Actor {
    /// The synthetic anonymous requester
    pub fn anonymous() -> Self {
        Self {
            id: None,
            username: None,
            features: Capability::anonymous_features(),
        }
    }

    /// Actor backed by a persisted user
    pub fn registered(id: String, username: String, features: Vec<Capability>) -> Self {
        Self {
            id: Some(id),
            username: Some(username),
            features,
        }
    }

    /// Membership test over the actor's feature list
    pub fn has_feature(&self, capability: Capability) -> bool {
        self.features.contains(&capability)
    }

    pub fn is_anonymous(&self) -> bool {
        self.id.is_none()
    }

    /// Display string for logging
    pub fn display_string(&self) -> String {
        match (&self.username, &self.id) {
            (Some(username), _) => username.clone(),
            (None, Some(id)) => id.clone(),
            (None, None) => "anonymous".to_string(),
        }
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::anonymous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_actor_has_the_fixed_minimal_feature_set() {
        let actor = Actor::anonymous();

        assert!(actor.is_anonymous());
        assert!(actor.has_feature(Capability::ReadActivationToken));
        assert!(actor.has_feature(Capability::CreateSession));
        assert!(actor.has_feature(Capability::CreateUser));
        assert!(!actor.has_feature(Capability::ReadUser));
        assert!(!actor.has_feature(Capability::UpdateUserOthers));
    }

    #[test]
    fn registered_actor_carries_only_its_granted_features() {
        let actor = Actor::registered(
            "u1".to_string(),
            "alice".to_string(),
            vec![Capability::ReadActivationToken],
        );

        assert!(!actor.is_anonymous());
        assert!(actor.has_feature(Capability::ReadActivationToken));
        assert!(!actor.has_feature(Capability::CreateSession));
    }
}
