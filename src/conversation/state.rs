//! Persisted conversation states.
//!
//! Each identity has at most one active [`FlowState`]; "idle" is the absence
//! of a row. The payload of every variant holds exactly what the next handler
//! needs, so nothing is re-derived between steps.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Active step of a user or administrator flow.
///
/// Serialized adjacently tagged so the tag and payload map onto the
/// `user_states.state` and `user_states.data` columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum FlowState {
    /// Waiting for the question text. `draft_question_id` is set when the
    /// user chose to edit an already staged question.
    #[serde(alias = "waiting_for_question")]
    AwaitingQuestion {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        draft_question_id: Option<i64>,
    },
    /// Question staged; waiting for confirm or edit.
    ConfirmQuestion {
        question_id: i64,
        question_text: String,
    },
    /// Administrator pressed "answer"; waiting for the reply text.
    #[serde(alias = "admin_waiting_response")]
    AwaitingResponse {
        question_id: i64,
        target_user_id: i64,
        question_text: String,
    },
    /// Reply written; waiting for send or edit.
    #[serde(alias = "admin_confirm_response")]
    ConfirmResponse {
        question_id: i64,
        target_user_id: i64,
        question_text: String,
        response_text: String,
    },
}

impl FlowState {
    pub const AWAITING_QUESTION: &'static str = "awaiting_question";
    pub const CONFIRM_QUESTION: &'static str = "confirm_question";
    pub const AWAITING_RESPONSE: &'static str = "awaiting_response";
    pub const CONFIRM_RESPONSE: &'static str = "confirm_response";

    /// Tag stored in the `state` column.
    pub fn tag(&self) -> &'static str {
        match self {
            FlowState::AwaitingQuestion { .. } => Self::AWAITING_QUESTION,
            FlowState::ConfirmQuestion { .. } => Self::CONFIRM_QUESTION,
            FlowState::AwaitingResponse { .. } => Self::AWAITING_RESPONSE,
            FlowState::ConfirmResponse { .. } => Self::CONFIRM_RESPONSE,
        }
    }

    /// Whether `tag` names a state this build understands, including the
    /// tags written by the first version of the bot.
    pub fn is_known_tag(tag: &str) -> bool {
        matches!(
            tag,
            Self::AWAITING_QUESTION
                | Self::CONFIRM_QUESTION
                | Self::AWAITING_RESPONSE
                | Self::CONFIRM_RESPONSE
                | "waiting_for_question"
                | "admin_waiting_response"
                | "admin_confirm_response"
        )
    }

    /// JSON payload stored in the `data` column.
    pub fn payload(&self) -> Result<String, serde_json::Error> {
        let value = serde_json::to_value(self)?;
        let data = value
            .get("data")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        serde_json::to_string(&data)
    }

    /// Rebuilds a state from its stored columns. A missing or empty payload
    /// reads as `{}`.
    pub fn from_parts(tag: &str, payload: Option<&str>) -> Result<Self, serde_json::Error> {
        let data = match payload.map(str::trim) {
            Some(raw) if !raw.is_empty() && raw != "null" => serde_json::from_str(raw)?,
            _ => Value::Object(Map::new()),
        };
        serde_json::from_value(json!({ "state": tag, "data": data }))
    }

    /// Question the state refers to, if any.
    pub fn question_id(&self) -> Option<i64> {
        match self {
            FlowState::AwaitingQuestion { draft_question_id } => *draft_question_id,
            FlowState::ConfirmQuestion { question_id, .. }
            | FlowState::AwaitingResponse { question_id, .. }
            | FlowState::ConfirmResponse { question_id, .. } => Some(*question_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_match_serialized_form() {
        let states = [
            FlowState::AwaitingQuestion { draft_question_id: None },
            FlowState::ConfirmQuestion { question_id: 1, question_text: "q".into() },
            FlowState::AwaitingResponse { question_id: 1, target_user_id: 42, question_text: "q".into() },
            FlowState::ConfirmResponse {
                question_id: 1,
                target_user_id: 42,
                question_text: "q".into(),
                response_text: "r".into(),
            },
        ];

        for state in states {
            let value = serde_json::to_value(&state).expect("serialize");
            assert_eq!(value["state"], state.tag());
            assert!(FlowState::is_known_tag(state.tag()));
        }
    }

    #[test]
    fn test_payload_holds_only_data() {
        let state = FlowState::ConfirmQuestion { question_id: 7, question_text: "Hi".into() };
        let payload: Value = serde_json::from_str(&state.payload().expect("payload")).expect("json");
        assert_eq!(payload, json!({ "question_id": 7, "question_text": "Hi" }));

        let empty = FlowState::AwaitingQuestion { draft_question_id: None };
        assert_eq!(empty.payload().expect("payload"), "{}");
    }

    #[test]
    fn test_from_parts_accepts_missing_payload() {
        assert_eq!(
            FlowState::from_parts("awaiting_question", None).expect("parse"),
            FlowState::AwaitingQuestion { draft_question_id: None }
        );
        assert_eq!(
            FlowState::from_parts("awaiting_question", Some("null")).expect("parse"),
            FlowState::AwaitingQuestion { draft_question_id: None }
        );
    }

    #[test]
    fn test_from_parts_reads_legacy_tags() {
        let state = FlowState::from_parts(
            "admin_waiting_response",
            Some(r#"{"question_id": 3, "target_user_id": 42, "question_text": "Why?"}"#),
        )
        .expect("parse");

        assert_eq!(
            state,
            FlowState::AwaitingResponse { question_id: 3, target_user_id: 42, question_text: "Why?".into() }
        );
        assert_eq!(state.tag(), "awaiting_response");
    }

    #[test]
    fn test_from_parts_rejects_incomplete_payload() {
        assert!(FlowState::from_parts("confirm_question", Some(r#"{"question_id": 3}"#)).is_err());
        assert!(!FlowState::is_known_tag("dancing"));
    }

    #[test]
    fn test_question_id() {
        assert_eq!(FlowState::AwaitingQuestion { draft_question_id: None }.question_id(), None);
        assert_eq!(FlowState::AwaitingQuestion { draft_question_id: Some(4) }.question_id(), Some(4));
        assert_eq!(
            FlowState::ConfirmQuestion { question_id: 9, question_text: String::new() }.question_id(),
            Some(9)
        );
    }
}
