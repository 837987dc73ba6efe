//! Action naming and decoding
//!
//! Actions travel as internally tagged JSON objects (`{"type": "...", ...}`).
//! Decoding checks the tag against the known action set first so that an
//! unrecognized action is reported by name instead of as a generic serde
//! failure.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Trait implemented by every reducer action enum
pub trait ActionType {
    /// Every wire name this action set understands
    const ACTION_TYPES: &'static [&'static str];

    /// Wire name of this action (e.g. `DATE_UNIT_CHANGE`)
    fn action_type(&self) -> &'static str;
}

/// Errors that can occur while decoding an action
#[derive(Error, Debug)]
pub enum ActionDecodeError {
    #[error("action must be a JSON object with a string `type` field")]
    MissingType,

    #[error("unrecognized action type `{0}`")]
    UnknownType(String),

    #[error("malformed `{action_type}` action: {source}")]
    Malformed {
        action_type: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode a single action from its JSON representation
pub fn decode_action<A>(value: Value) -> Result<A, ActionDecodeError>
where
    A: ActionType + DeserializeOwned,
{
    let action_type = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ActionDecodeError::MissingType)?
        .to_string();

    if !A::ACTION_TYPES.contains(&action_type.as_str()) {
        return Err(ActionDecodeError::UnknownType(action_type));
    }

    serde_json::from_value(value).map_err(|source| ActionDecodeError::Malformed {
        action_type,
        source,
    })
}

/// Implement [`ActionType`] for an action enum from a variant → name table
#[macro_export]
macro_rules! impl_action_type {
    ($action:ty { $($variant:ident => $name:literal),* $(,)? }) => {
        impl $crate::ActionType for $action {
            const ACTION_TYPES: &'static [&'static str] = &[$($name),*];

            fn action_type(&self) -> &'static str {
                match self {
                    $(Self::$variant { .. } => $name,)*
                }
            }
        }
    };
}
