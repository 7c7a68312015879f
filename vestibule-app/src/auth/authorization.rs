//! Authorization Engine
//!
//! Pure decisions over an actor's feature list, plus the output filter every
//! persisted entity must pass through before leaving the system boundary.
//! Decision functions never error; the route layer turns a negative decision
//! into a Forbidden response.

use super::{Actor, Capability};
use serde::Serialize;
use serde_json::{Map, Value};
use vestibule_core::{VestibuleError, VestibuleResult};

/// Check whether the actor may perform an action on itself or untargeted
pub fn can(actor: &Actor, action: Capability) -> bool {
    actor.has_feature(action)
}

/// Check whether the actor may perform an action against a specific target
///
/// A self target (matching id) checks the bare capability. Any other target
/// requires the explicit `:others` variant; actions without one resolve to
/// false. The anonymous actor is never a self target.
pub fn can_for(actor: &Actor, action: Capability, target_id: &str) -> bool {
    match &actor.id {
        Some(id) if id == target_id => can(actor, action),
        _ => match action.others_variant() {
            Some(variant) => can(actor, variant),
            None => false,
        },
    }
}

/// Require a capability, producing the public Forbidden error on refusal
pub fn require(actor: &Actor, action: Capability) -> VestibuleResult<()> {
    if can(actor, action) {
        return Ok(());
    }

    Err(VestibuleError::forbidden(
        "You do not have permission to perform this action.",
        format!("Check that your user has the \"{}\" feature.", action),
    ))
}

/// Require a capability against a target, distinguishing the `:others` tier
pub fn require_for(actor: &Actor, action: Capability, target_id: &str) -> VestibuleResult<()> {
    if can_for(actor, action, target_id) {
        return Ok(());
    }

    let needed = action.others_variant().unwrap_or(action);
    Err(VestibuleError::forbidden(
        "You do not have permission to perform this action on another user.",
        format!("Check that your user has the \"{}\" feature.", needed),
    ))
}

/// Project an entity down to the fields the given read capability exposes
///
/// The single chokepoint through which persisted entities cross the system
/// boundary. The projection is the registry's field list for the capability,
/// intersected with the fields actually present on the entity. Reading your
/// own user record additionally exposes the email field. The input is never
/// mutated.
pub fn filter_output<T: Serialize>(actor: &Actor, capability: Capability, entity: &T) -> Value {
    let mut fields: Vec<&str> = capability.readable_fields().to_vec();

    let serialized = serde_json::to_value(entity).unwrap_or(Value::Null);
    let Value::Object(map) = serialized else {
        return Value::Object(Map::new());
    };

    if capability == Capability::ReadUser {
        if let (Some(actor_id), Some(Value::String(entity_id))) = (&actor.id, map.get("id")) {
            if actor_id == entity_id {
                fields.push("email");
            }
        }
    }

    let filtered: Map<String, Value> = fields
        .into_iter()
        .filter_map(|field| map.get(field).map(|value| (field.to_string(), value.clone())))
        .collect();

    Value::Object(filtered)
}
