//! Error classifier
//!
//! Turns a structured transport error into a user-facing message, a one-line
//! correction suggestion, a recoverability flag, and a coarse category. Raw
//! transport text (e.g. "INTERNAL SERVER ERROR") is never surfaced verbatim;
//! the classifier re-extracts the authoritative envelope message (defense in
//! depth, the transport already did this once) and falls back to the
//! per-endpoint and generic tables in [`tables`].

pub mod tables;

use serde_json::Value;

use crate::domain::envelope::authoritative_message;
use crate::domain::errors::{ApiError, WorkflowError};
use tables::{
    endpoint_fallback, generic_fallback, AUTHENTICATION_KEYWORDS, NETWORK_KEYWORDS,
    NOT_RECOVERABLE_PHRASES, RECOVERABLE_PHRASES, SERVER_KEYWORDS, SUGGESTION_RULES,
    VALIDATION_KEYWORDS,
};

/// Coarse failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input or business-rule violation
    Validation,
    /// Missing or rejected credentials
    Authentication,
    /// Remote server failure
    Server,
    /// Network-level failure, no response received
    Network,
    /// Nothing matched
    Unknown,
}

/// Whether the failure is worth retrying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recoverability {
    /// Transient; a retry may succeed
    Recoverable,
    /// Deterministic; retrying the same input will fail again
    NotRecoverable,
    /// Unclear; treated as not automatically retryable
    Indeterminate,
}

/// Classified, user-facing form of a remote failure
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedError {
    /// Message safe to show the user
    pub message: String,

    /// One-line correction suggestion, when a known phrase matched
    pub suggestion: Option<String>,

    /// Retry guidance
    pub recoverability: Recoverability,

    /// Coarse category
    pub category: ErrorCategory,
}

impl ClassifiedError {
    /// Re-express this classification as a canonical workflow error
    pub fn into_workflow_error(self) -> WorkflowError {
        WorkflowError::Remote { message: self.message, suggestion: self.suggestion }
    }
}

impl std::fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.suggestion {
            Some(suggestion) => write!(f, "{} {}", self.message, suggestion),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Classify a structured transport error
pub fn classify(error: &ApiError) -> ClassifiedError {
    match error {
        ApiError::Transport { .. } => {
            let message = "No se pudo contactar el servicio remoto. Verifique la conexión.".to_string();
            ClassifiedError {
                suggestion: suggestion_for(&message),
                recoverability: Recoverability::Recoverable,
                category: ErrorCategory::Network,
                message,
            }
        }
        ApiError::Decode { .. } => {
            let message =
                "El servicio remoto devolvió una respuesta inválida. Intente nuevamente.".to_string();
            ClassifiedError {
                suggestion: suggestion_for(&message),
                recoverability: Recoverability::Recoverable,
                category: ErrorCategory::Server,
                message,
            }
        }
        ApiError::Status { status_code, api_message, api_response, endpoint, .. } => {
            let message = extract_message(api_response, *status_code, endpoint, api_message);
            ClassifiedError {
                suggestion: suggestion_for(&message),
                recoverability: recoverability_of(&message),
                category: category_of(&message),
                message,
            }
        }
    }
}

/// Pick the best user-facing message for a failed response
///
/// Priority: envelope message > per-endpoint fallback > generic status
/// fallback > transport-extracted message (which already falls back to the
/// status phrase).
fn extract_message(body: &Value, status: u16, endpoint: &str, transport_message: &str) -> String {
    if let Some(message) = authoritative_message(body) {
        return message;
    }
    if let Some(message) = endpoint_fallback(endpoint, status) {
        return message.to_string();
    }
    if let Some(message) = generic_fallback(status) {
        return message.to_string();
    }
    transport_message.to_string()
}

/// Suggestion heuristic over the known-message table
pub fn suggestion_for(message: &str) -> Option<String> {
    let lowered = message.to_lowercase();
    SUGGESTION_RULES
        .iter()
        .find(|rule| rule.phrases.iter().any(|phrase| lowered.contains(phrase)))
        .map(|rule| rule.suggestion.to_string())
}

/// Recoverability over the known-phrase lists
pub fn recoverability_of(message: &str) -> Recoverability {
    let lowered = message.to_lowercase();
    if NOT_RECOVERABLE_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Recoverability::NotRecoverable;
    }
    if RECOVERABLE_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Recoverability::Recoverable;
    }
    Recoverability::Indeterminate
}

/// Category by keyword matching, authentication keywords first
pub fn category_of(message: &str) -> ErrorCategory {
    let lowered = message.to_lowercase();
    if AUTHENTICATION_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return ErrorCategory::Authentication;
    }
    if VALIDATION_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return ErrorCategory::Validation;
    }
    if SERVER_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return ErrorCategory::Server;
    }
    if NETWORK_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return ErrorCategory::Network;
    }
    ErrorCategory::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::envelope::ApiVerb;
    use serde_json::json;

    fn status_error(status: u16, body: Value, endpoint: &str, transport_message: &str) -> ApiError {
        ApiError::Status {
            status_code: status,
            api_message: transport_message.to_string(),
            api_response: body,
            endpoint: endpoint.to_string(),
            verb: ApiVerb::Create,
            request_data: None,
        }
    }

    #[test]
    fn test_envelope_message_wins_over_status_phrase() {
        // HTTP 500 with a success-shaped envelope: the envelope message is
        // authoritative, never "Internal Server Error".
        let error = status_error(
            500,
            json!({"data": [null], "meta": {"status": "success", "message": "No se pudo crear al tercero"}}),
            "/user",
            "Internal Server Error",
        );
        let classified = classify(&error);
        assert_eq!(classified.message, "No se pudo crear al tercero");
    }

    #[test]
    fn test_endpoint_fallback_when_no_api_message() {
        let error = status_error(500, json!({}), "/user", "Internal Server Error");
        let classified = classify(&error);
        assert_eq!(classified.message, "El servicio de terceros no está disponible en este momento.");
        assert_eq!(classified.category, ErrorCategory::Server);
    }

    #[test]
    fn test_own_fallback_texts_categorize_as_server() {
        // The keyword tables must cover the fallback texts this classifier
        // emits itself, or a bare 500 would classify as Unknown.
        for rule in tables::ENDPOINT_FALLBACKS.iter().filter(|r| r.status == 500) {
            assert_eq!(category_of(rule.message), ErrorCategory::Server, "{}", rule.message);
            assert_eq!(
                recoverability_of(rule.message),
                Recoverability::Recoverable,
                "{}",
                rule.message
            );
        }
    }

    #[test]
    fn test_generic_fallback_for_unmapped_endpoint() {
        let error = status_error(503, json!({}), "/something-else", "Service Unavailable");
        let classified = classify(&error);
        assert_eq!(classified.message, "El servicio remoto no está disponible temporalmente.");
        assert_eq!(classified.recoverability, Recoverability::Recoverable);
    }

    #[test]
    fn test_already_exists_suggestion_and_recoverability() {
        let error = status_error(
            400,
            json!({"meta": {"status": "error", "message": "El tercero ya existe en el sistema"}}),
            "/user",
            "Bad Request",
        );
        let classified = classify(&error);
        assert!(classified.suggestion.as_deref().unwrap().contains("identificación"));
        assert_eq!(classified.recoverability, Recoverability::NotRecoverable);
        assert_eq!(classified.category, ErrorCategory::Validation);
    }

    #[test]
    fn test_date_message_gets_format_suggestion() {
        let classified = classify(&status_error(
            400,
            json!({"message": "La fecha de nacimiento no es válida"}),
            "/user",
            "Bad Request",
        ));
        assert_eq!(classified.suggestion.as_deref(), Some("Use el formato de fecha YYYY-MM-DD."));
    }

    #[test]
    fn test_authentication_category_checked_first() {
        // "no autorizado" also contains no validation keyword traps
        let classified = classify(&status_error(
            401,
            json!({"error": "Usuario no autorizado: token inválido"}),
            "/product",
            "Unauthorized",
        ));
        assert_eq!(classified.category, ErrorCategory::Authentication);
        assert_eq!(classified.recoverability, Recoverability::NotRecoverable);
    }

    #[test]
    fn test_transport_error_is_recoverable_network() {
        let error = ApiError::Transport {
            endpoint: "/user".to_string(),
            message: "connection refused".to_string(),
        };
        let classified = classify(&error);
        assert_eq!(classified.category, ErrorCategory::Network);
        assert_eq!(classified.recoverability, Recoverability::Recoverable);
    }

    #[test]
    fn test_decode_error_is_recoverable_server() {
        let error = ApiError::Decode {
            status_code: 200,
            endpoint: "/product".to_string(),
            message: "Invalid JSON in response: EOF while parsing".to_string(),
        };
        let classified = classify(&error);
        assert_eq!(classified.category, ErrorCategory::Server);
        assert_eq!(classified.recoverability, Recoverability::Recoverable);
        // The parser detail stays internal; the user sees a service message
        assert!(!classified.message.contains("Invalid JSON"));
    }

    #[test]
    fn test_unknown_message_is_indeterminate() {
        let classified = classify(&status_error(
            422,
            json!({"message": "Operación rechazada"}),
            "/product",
            "Unprocessable Entity",
        ));
        assert_eq!(classified.recoverability, Recoverability::Indeterminate);
        assert_eq!(classified.category, ErrorCategory::Unknown);
        assert!(classified.suggestion.is_none());
    }

    #[test]
    fn test_into_workflow_error_keeps_message_and_suggestion() {
        let classified = ClassifiedError {
            message: "El tercero ya existe".to_string(),
            suggestion: Some("Busque por identificación.".to_string()),
            recoverability: Recoverability::NotRecoverable,
            category: ErrorCategory::Validation,
        };
        match classified.into_workflow_error() {
            WorkflowError::Remote { message, suggestion } => {
                assert_eq!(message, "El tercero ya existe");
                assert_eq!(suggestion.as_deref(), Some("Busque por identificación."));
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }
}
