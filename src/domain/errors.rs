//! Domain error types
//!
//! This module defines the error hierarchy for Clinia. All errors are
//! domain-specific and don't expose third-party types: the transport layer
//! maps `reqwest` failures into [`ApiError`], and workflows re-express remote
//! failures through the classifier before they reach a caller.

use serde_json::Value;
use thiserror::Error;

use super::envelope::ApiVerb;

/// Main Clinia error type
///
/// This is the primary error type surfaced at the crate boundary. Workflows
/// and operations return this; callers never need to parse HTTP status codes
/// directly.
#[derive(Debug, Error)]
pub enum CliniaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Structured remote API errors
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Canonical workflow step failures
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Unknown operation name in an operation request
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Operation request is missing a field its schema requires
    #[error("Missing required field '{field}' for operation {operation}")]
    MissingField {
        /// Operation name
        operation: &'static str,
        /// Missing field name
        field: &'static str,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Structured error produced by the API transport
///
/// Created whenever the transport sees a non-2xx/207 HTTP status, or when no
/// response was received at all. Carries enough context for the error
/// classifier and for user-facing messaging.
///
/// The `api_message` is extracted from the response body with the priority
/// `meta.message` > `message` > `error` > raw body text > HTTP status phrase,
/// because the remote API buries its authoritative outcome in the envelope
/// regardless of the HTTP status it answers with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure: no response was received
    #[error("Request to {endpoint} failed: {message}")]
    Transport {
        /// Endpoint path that was being called
        endpoint: String,
        /// Underlying transport failure description
        message: String,
    },

    /// A success status arrived but the body could not be decoded
    #[error("Invalid response from {endpoint} ({status_code}): {message}")]
    Decode {
        /// HTTP status code of the undecodable response
        status_code: u16,
        /// Endpoint path that was called
        endpoint: String,
        /// Decode failure description
        message: String,
    },

    /// The server answered with a non-success HTTP status
    #[error("{verb} {endpoint} returned {status_code}: {api_message}")]
    Status {
        /// HTTP status code of the response
        status_code: u16,
        /// Authoritative message extracted from the response body
        api_message: String,
        /// Raw decoded response body (JSON when decodable, string otherwise)
        api_response: Value,
        /// Endpoint path that was called
        endpoint: String,
        /// Verb used for the call
        verb: ApiVerb,
        /// Original request fields (absent for raw binary bodies)
        request_data: Option<Vec<(String, String)>>,
    },
}

impl ApiError {
    /// Status code of the failure, if a response was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Transport { .. } => None,
            ApiError::Decode { status_code, .. } => Some(*status_code),
            ApiError::Status { status_code, .. } => Some(*status_code),
        }
    }

    /// Endpoint the failing call was addressed to
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Transport { endpoint, .. } => endpoint,
            ApiError::Decode { endpoint, .. } => endpoint,
            ApiError::Status { endpoint, .. } => endpoint,
        }
    }

    /// Message carried by the failure, before classification
    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport { message, .. } => message,
            ApiError::Decode { message, .. } => message,
            ApiError::Status { api_message, .. } => api_message,
        }
    }
}

/// Canonical workflow failure vocabulary
///
/// Workflow steps map heterogeneous failures (local validation, remote error
/// substrings) onto these stable kinds so downstream consumers never see raw
/// transport text.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    /// Date of birth does not match `YYYY-MM-DD` or is not a real date
    #[error("Fecha inválida: {0}. El formato requerido es YYYY-MM-DD")]
    InvalidDate(String),

    /// Patient is under the 18-year minimum
    #[error("El paciente es menor de edad ({age} años); se requieren 18 años cumplidos")]
    Underage {
        /// Age computed at validation time
        age: i32,
    },

    /// Gender is not exactly one of the two valid codes
    #[error("Género inválido: {0}. Los valores válidos son \"m\" y \"f\"")]
    InvalidGender(String),

    /// Identification failed the format check
    #[error("Identificación inválida: {0}. Se requieren al menos 6 caracteres alfanuméricos")]
    InvalidIdentification(String),

    /// Optional email or phone failed its format check
    #[error("Formato inválido para {field}: {value}")]
    InvalidFormat {
        /// Field name (email, phone)
        field: &'static str,
        /// Offending value
        value: String,
    },

    /// A record with this identification already exists
    #[error("Ya existe un tercero con la identificación {0}")]
    AlreadyExists(String),

    /// Strict mode: the duplicate check could not be completed
    #[error("No se pudo verificar si el tercero existe: {0}")]
    ExistenceCheckFailed(String),

    /// Patient creation failed remotely
    #[error("No se pudo crear al tercero: {0}")]
    CreationFailed(String),

    /// Product name is empty or whitespace-only
    #[error("El nombre del producto no puede estar vacío")]
    InvalidProductName,

    /// Product type outside {goods, assets, service}
    #[error("Tipo de producto inválido: {0}. Los valores válidos son goods, assets y service")]
    InvalidProductType(String),

    /// Category outside 1..=6
    #[error("Categoría inválida: {0}. Las categorías válidas son 1 a 6")]
    InvalidCategory(i64),

    /// List price must be strictly positive
    #[error("Precio inválido: {0}. El precio debe ser mayor que cero")]
    InvalidPrice(f64),

    /// Product creation failed remotely (terminal, unlike variant failure)
    #[error("No se pudo crear el producto: {0}")]
    ProductCreationFailed(String),

    /// Remote failure re-expressed through the error classifier
    #[error("{message}")]
    Remote {
        /// User-facing message from the classifier
        message: String,
        /// One-line correction suggestion, when one applies
        suggestion: Option<String>,
    },
}

impl WorkflowError {
    /// Stable kind label for logging and host-side branching
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::InvalidDate(_) => "invalid-date",
            WorkflowError::Underage { .. } => "underage",
            WorkflowError::InvalidGender(_) => "invalid-gender",
            WorkflowError::InvalidIdentification(_) => "invalid-identification",
            WorkflowError::InvalidFormat { .. } => "invalid-format",
            WorkflowError::AlreadyExists(_) => "already-exists",
            WorkflowError::ExistenceCheckFailed(_) => "existence-check-failed",
            WorkflowError::CreationFailed(_) => "creation-failed",
            WorkflowError::InvalidProductName => "invalid-product-name",
            WorkflowError::InvalidProductType(_) => "invalid-product-type",
            WorkflowError::InvalidCategory(_) => "invalid-category",
            WorkflowError::InvalidPrice(_) => "invalid-price",
            WorkflowError::ProductCreationFailed(_) => "product-creation-failed",
            WorkflowError::Remote { .. } => "remote-failure",
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for CliniaError {
    fn from(err: std::io::Error) -> Self {
        CliniaError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CliniaError {
    fn from(err: serde_json::Error) -> Self {
        CliniaError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CliniaError {
    fn from(err: toml::de::Error) -> Self {
        CliniaError::Configuration(format!("TOML parse error: {err}"))
    }
}
