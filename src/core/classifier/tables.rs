//! Known-message tables for the error classifier
//!
//! The remote API reports outcomes as localized human-readable text, so the
//! classifier matches against an explicit, versioned set of known phrases
//! sourced from the API's observed contract. Matching is case-insensitive
//! substring; first match wins, so order the specific phrases before the
//! broad ones.
//!
//! Table version: 2026-07 contract snapshot.

/// A known message pattern with its correction suggestion
pub struct SuggestionRule {
    /// Case-insensitive substrings that select this rule
    pub phrases: &'static [&'static str],
    /// One-line correction suggestion for the user
    pub suggestion: &'static str,
}

/// Suggestion heuristics, ordered most-specific first
pub const SUGGESTION_RULES: &[SuggestionRule] = &[
    SuggestionRule {
        phrases: &["ya existe", "already exists"],
        suggestion: "Busque el registro por identificación en lugar de crearlo de nuevo.",
    },
    SuggestionRule {
        phrases: &["menor de edad", "underage"],
        suggestion: "El tercero debe tener al menos 18 años cumplidos.",
    },
    SuggestionRule {
        phrases: &["fecha", "date"],
        suggestion: "Use el formato de fecha YYYY-MM-DD.",
    },
    SuggestionRule {
        phrases: &["género", "genero", "gender"],
        suggestion: "Los códigos de género válidos son \"m\" y \"f\".",
    },
    SuggestionRule {
        phrases: &["categoría", "categoria", "category"],
        suggestion: "Las categorías válidas son 1 a 6.",
    },
    SuggestionRule {
        phrases: &["tipo de producto", "tipo", "type"],
        suggestion: "Los tipos de producto válidos son goods, assets y service.",
    },
    SuggestionRule {
        phrases: &["no autorizado", "unauthorized", "credencial"],
        suggestion: "Verifique el token de acceso configurado.",
    },
    SuggestionRule {
        phrases: &["error interno", "internal server", "error del servidor", "server error"],
        suggestion: "Intente nuevamente; si el problema persiste, escale al administrador.",
    },
];

/// Phrases that mark a failure as not automatically retryable
pub const NOT_RECOVERABLE_PHRASES: &[&str] = &[
    "ya existe",
    "already exists",
    "menor de edad",
    "underage",
    "fecha inválida",
    "invalid date",
    "género inválido",
    "invalid gender",
    "no autorizado",
    "unauthorized",
];

/// Phrases that mark a failure as transient
pub const RECOVERABLE_PHRASES: &[&str] = &[
    "error del servidor",
    "error interno",
    "server error",
    "timeout",
    "network",
    "temporalmente",
    "temporarily",
    "no está disponible",
    "no esta disponible",
];

/// Keywords selecting the authentication category (checked first)
pub const AUTHENTICATION_KEYWORDS: &[&str] =
    &["no autorizado", "unauthorized", "credencial", "token", "prohibido", "forbidden"];

/// Keywords selecting the validation category
pub const VALIDATION_KEYWORDS: &[&str] = &[
    "inválid",
    "invalid",
    "fecha",
    "género",
    "genero",
    "categoría",
    "categoria",
    "formato",
    "requerido",
    "required",
    "ya existe",
    "already exists",
    "menor de edad",
];

/// Keywords selecting the server category
///
/// Must cover the fallback texts this classifier emits itself, which read
/// "no está disponible".
pub const SERVER_KEYWORDS: &[&str] = &[
    "error interno",
    "internal server",
    "error del servidor",
    "server error",
    "no está disponible",
    "no esta disponible",
];

/// Keywords selecting the network category
pub const NETWORK_KEYWORDS: &[&str] =
    &["network", "timeout", "connection", "conexión", "conexion", "red "];

/// Per-endpoint fallback message for a status code
///
/// Used only when the response carried no API-supplied message at all.
pub struct EndpointFallback {
    /// Endpoint path the rule applies to
    pub endpoint: &'static str,
    /// HTTP status code the rule applies to
    pub status: u16,
    /// User-facing message
    pub message: &'static str,
}

/// Fallback messages for the canonical endpoints at 400/401/500
pub const ENDPOINT_FALLBACKS: &[EndpointFallback] = &[
    EndpointFallback { endpoint: "/user", status: 400, message: "Los datos del tercero no son válidos." },
    EndpointFallback { endpoint: "/user", status: 401, message: "No autorizado para gestionar terceros." },
    EndpointFallback { endpoint: "/user", status: 500, message: "El servicio de terceros no está disponible en este momento." },
    EndpointFallback { endpoint: "/product", status: 400, message: "Los datos del producto no son válidos." },
    EndpointFallback { endpoint: "/product", status: 401, message: "No autorizado para crear productos." },
    EndpointFallback { endpoint: "/product", status: 500, message: "El servicio de productos no está disponible en este momento." },
    EndpointFallback { endpoint: "/product/variant", status: 400, message: "Los datos de la variante no son válidos." },
    EndpointFallback { endpoint: "/product/variant", status: 401, message: "No autorizado para crear variantes." },
    EndpointFallback { endpoint: "/product/variant", status: 500, message: "El servicio de variantes no está disponible en este momento." },
    EndpointFallback { endpoint: "/test-type", status: 400, message: "Los datos del tipo de examen no son válidos." },
    EndpointFallback { endpoint: "/test-type", status: 401, message: "No autorizado para crear tipos de examen." },
    EndpointFallback { endpoint: "/test-type", status: 500, message: "El servicio de tipos de examen no está disponible en este momento." },
    EndpointFallback { endpoint: "/automatized", status: 400, message: "La consulta de tabla no es válida." },
    EndpointFallback { endpoint: "/automatized", status: 401, message: "No autorizado para consultar tablas." },
    EndpointFallback { endpoint: "/automatized", status: 500, message: "El servicio de consulta de tablas no está disponible en este momento." },
    EndpointFallback { endpoint: "/test-products", status: 400, message: "La consulta de productos no es válida." },
    EndpointFallback { endpoint: "/test-products", status: 401, message: "No autorizado para listar productos." },
    EndpointFallback { endpoint: "/test-products", status: 500, message: "El listado de productos no está disponible en este momento." },
];

/// Generic fallback messages by status code
pub const GENERIC_FALLBACKS: &[(u16, &str)] = &[
    (400, "La solicitud no es válida. Revise los datos enviados."),
    (401, "No autorizado. Verifique las credenciales configuradas."),
    (403, "Acceso prohibido para la operación solicitada."),
    (404, "El recurso solicitado no existe."),
    (500, "Error interno del servidor remoto."),
    (502, "El servidor remoto respondió incorrectamente (502)."),
    (503, "El servicio remoto no está disponible temporalmente."),
];

/// Look up the endpoint-specific fallback for a status code
pub fn endpoint_fallback(endpoint: &str, status: u16) -> Option<&'static str> {
    ENDPOINT_FALLBACKS
        .iter()
        .find(|rule| rule.endpoint == endpoint && rule.status == status)
        .map(|rule| rule.message)
}

/// Look up the generic fallback for a status code
pub fn generic_fallback(status: u16) -> Option<&'static str> {
    GENERIC_FALLBACKS
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, message)| *message)
}
