//! Product-with-variant workflow
//!
//! Four steps: validate, create product, create variant (conditional,
//! non-fatal), consolidate. Variant creation is the single exception to
//! fail-fast in this crate: its failure is downgraded to an appended warning
//! and the product is still considered successfully created.

use std::sync::Arc;

use crate::adapters::api::{endpoints, ApiTransport};
use crate::core::classifier::classify;
use crate::domain::envelope::{authoritative_message, ApiResponse, ApiVerb};
use crate::domain::errors::{ApiError, WorkflowError};
use crate::domain::outcome::WorkflowResult;
use crate::domain::product::{ProductDraft, CATEGORY_RANGE};
use crate::domain::result::Result;
use crate::validation;

/// Validate a product draft against the domain rules
///
/// The unit of measure is not validated: it is silently forced to 1 on the
/// wire regardless of input, a business invariant rather than an error.
///
/// # Errors
///
/// Returns the canonical [`WorkflowError`] kind for the first rule violated.
pub fn validate_product(draft: &ProductDraft) -> std::result::Result<(), WorkflowError> {
    if draft.name.trim().is_empty() {
        return Err(WorkflowError::InvalidProductName);
    }
    if !CATEGORY_RANGE.contains(&draft.category) {
        return Err(WorkflowError::InvalidCategory(draft.category));
    }
    if draft.list_price <= 0.0 {
        return Err(WorkflowError::InvalidPrice(draft.list_price));
    }
    Ok(())
}

/// Product creation pipeline with optional variant
pub struct ProductWorkflow {
    transport: Arc<dyn ApiTransport>,
}

impl ProductWorkflow {
    /// Create a workflow over a transport
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Run the full pipeline
    ///
    /// # Errors
    ///
    /// Returns a [`WorkflowError`] (wrapped in the top-level error) when
    /// validation or product creation fails. Variant failure does not error;
    /// it appears as a warning on the successful result.
    pub async fn run(&self, draft: &ProductDraft) -> Result<WorkflowResult> {
        tracing::info!(name = %draft.name, "Starting product workflow");

        validate_product(draft)?;

        let (response, product_warnings) = self.create_product(draft).await?;
        let product_id = validation::extract_primary_id(&response.body);

        let (variant_id, variant_warnings) = self.create_variant(draft, product_id).await;

        let result =
            consolidate(draft, &response, product_id, variant_id, product_warnings, variant_warnings)?;
        tracing::info!(
            product_id = ?result.primary_id,
            variant_id = ?result.secondary_id,
            warning_count = result.warnings.len(),
            "Product workflow completed"
        );
        Ok(result)
    }

    /// Step 2: create the product
    ///
    /// A 207 answer means the product exists but a secondary effect degraded;
    /// the message is matched against known substrings to attach a specific
    /// warning.
    async fn create_product(
        &self,
        draft: &ProductDraft,
    ) -> std::result::Result<(ApiResponse, Vec<String>), WorkflowError> {
        let fields = draft.wire_fields();
        let response = self
            .transport
            .execute(ApiVerb::Create, endpoints::PRODUCT, &fields)
            .await
            .map_err(|error| map_product_failure(&error))?;

        let mut warnings = Vec::new();
        if response.is_partial() {
            warnings.push(partial_success_warning(&response));
        }
        Ok((response, warnings))
    }

    /// Step 3: create the variant; never aborts the pipeline
    async fn create_variant(
        &self,
        draft: &ProductDraft,
        product_id: Option<i64>,
    ) -> (Option<i64>, Vec<String>) {
        let Some(ref variant_code) = draft.variant_code else {
            return (None, Vec::new());
        };

        // Guarded: should not happen when step 2 succeeded
        let Some(product_id) = product_id else {
            return (
                None,
                vec!["No se pudo crear la variante: no hay identificador de producto.".to_string()],
            );
        };

        let fields = draft.variant_wire_fields(product_id, variant_code);
        match self.transport.execute(ApiVerb::Create, endpoints::PRODUCT_VARIANT, &fields).await {
            Ok(response) => (validation::extract_primary_id(&response.body), Vec::new()),
            Err(error) => {
                let classified = classify(&error);
                tracing::warn!(
                    product_id = product_id,
                    variant_code = %variant_code,
                    message = %classified.message,
                    "Variant creation failed; continuing with warning"
                );
                (None, vec![format!("La variante no pudo crearse: {}", classified.message)])
            }
        }
    }
}

/// Pick a warning for a 207 partial-success answer
fn partial_success_warning(response: &ApiResponse) -> String {
    let message = authoritative_message(&response.body).unwrap_or_default();
    let lowered = message.to_lowercase();
    if lowered.contains("template-category") {
        return "El producto se creó, pero la categoría de plantilla no pudo vincularse.".to_string();
    }
    if lowered.contains("precio") {
        return "El producto se creó, pero el precio no pudo aplicarse.".to_string();
    }
    if message.is_empty() {
        return "El producto se creó con advertencias no especificadas.".to_string();
    }
    format!("Advertencia del servicio: {message}")
}

/// Re-wrap a product creation failure, distinguishing bad request from
/// server error
fn map_product_failure(error: &ApiError) -> WorkflowError {
    let classified = classify(error);
    match error.status_code() {
        Some(400) => {
            WorkflowError::ProductCreationFailed(format!("datos inválidos. {}", classified.message))
        }
        Some(code) if code >= 500 => WorkflowError::ProductCreationFailed(format!(
            "error del servidor. {}",
            classified.message
        )),
        None => WorkflowError::ProductCreationFailed(format!(
            "error del servidor. {}",
            classified.message
        )),
        _ => WorkflowError::ProductCreationFailed(classified.message),
    }
}

/// Step 4: consolidate product and variant outcomes into one result
fn consolidate(
    draft: &ProductDraft,
    response: &ApiResponse,
    product_id: Option<i64>,
    variant_id: Option<i64>,
    product_warnings: Vec<String>,
    variant_warnings: Vec<String>,
) -> std::result::Result<WorkflowResult, WorkflowError> {
    // 207 still counts as success for the primary effect
    let created = response.is_partial()
        || response.envelope().map(|env| env.is_success()).unwrap_or(false);
    let Some(product_id) = product_id.filter(|_| created) else {
        let message = authoritative_message(&response.body)
            .unwrap_or_else(|| "el servicio no confirmó la creación".to_string());
        return Err(WorkflowError::ProductCreationFailed(message));
    };

    let mut message = String::from("Producto creado exitosamente");
    if variant_id.is_some() {
        message.push_str(" con variante");
    } else if draft.variant_code.is_some() {
        message.push_str(" (la variante no pudo crearse)");
    }

    let mut result = WorkflowResult::success(message)
        .with_primary_id(product_id)
        .with_warnings(product_warnings)
        .with_warnings(variant_warnings);
    if let Some(id) = variant_id {
        result = result.with_secondary_id(id);
    }
    if let Some(envelope) = response.envelope() {
        result = result.with_payload(envelope.data);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::ProductType;
    use serde_json::json;

    fn draft() -> ProductDraft {
        ProductDraft::new("Equipo de Rayos X", ProductType::Assets, 50_000.0, 2)
    }

    #[test]
    fn test_validate_accepts_well_formed_draft() {
        assert!(validate_product(&draft()).is_ok());
        let small = ProductDraft::new("Paracetamol", ProductType::Goods, 5.5, 4);
        assert!(validate_product(&small).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let mut d = draft();
        d.name = "   ".to_string();
        assert_eq!(validate_product(&d).unwrap_err().kind(), "invalid-product-name");
    }

    #[test]
    fn test_validate_rejects_nonpositive_price() {
        for price in [0.0, -10.0] {
            let mut d = draft();
            d.list_price = price;
            assert_eq!(validate_product(&d).unwrap_err().kind(), "invalid-price");
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_category() {
        for category in [0, 7, -1] {
            let mut d = draft();
            d.category = category;
            assert_eq!(validate_product(&d).unwrap_err().kind(), "invalid-category");
        }
    }

    #[test]
    fn test_partial_success_warning_known_substrings() {
        let response = ApiResponse {
            status: 207,
            body: json!({"meta": {"status": "success", "message": "template-category link failed"}}),
        };
        assert!(partial_success_warning(&response).contains("categoría de plantilla"));

        let response = ApiResponse {
            status: 207,
            body: json!({"meta": {"status": "success", "message": "el precio no pudo registrarse"}}),
        };
        assert!(partial_success_warning(&response).contains("precio"));

        let response = ApiResponse {
            status: 207,
            body: json!({"meta": {"status": "success", "message": "detalle inesperado"}}),
        };
        assert!(partial_success_warning(&response).contains("detalle inesperado"));
    }

    #[test]
    fn test_map_product_failure_distinguishes_bad_request_from_server_error() {
        let bad_request = ApiError::Status {
            status_code: 400,
            api_message: "Bad Request".to_string(),
            api_response: json!({"message": "nombre requerido"}),
            endpoint: "/product".to_string(),
            verb: ApiVerb::Create,
            request_data: None,
        };
        assert!(map_product_failure(&bad_request).to_string().contains("datos inválidos"));

        let server = ApiError::Status {
            status_code: 500,
            api_message: "Internal Server Error".to_string(),
            api_response: json!({}),
            endpoint: "/product".to_string(),
            verb: ApiVerb::Create,
            request_data: None,
        };
        assert!(map_product_failure(&server).to_string().contains("error del servidor"));
    }

    #[test]
    fn test_consolidate_requires_product_id() {
        let response = ApiResponse {
            status: 200,
            body: json!({"data": null, "meta": {"status": "success", "message": ""}}),
        };
        let err = consolidate(&draft(), &response, None, None, vec![], vec![]).unwrap_err();
        assert_eq!(err.kind(), "product-creation-failed");
    }

    #[test]
    fn test_consolidate_message_reflects_variant_outcome() {
        let response = ApiResponse {
            status: 200,
            body: json!({"data": {"id": 890}, "meta": {"status": "success", "message": ""}}),
        };

        // No variant requested
        let result = consolidate(&draft(), &response, Some(890), None, vec![], vec![]).unwrap();
        assert_eq!(result.message, "Producto creado exitosamente");

        // Variant created
        let with_code = draft().with_variant_code("Lote-2024-001");
        let result =
            consolidate(&with_code, &response, Some(890), Some(42), vec![], vec![]).unwrap();
        assert_eq!(result.message, "Producto creado exitosamente con variante");
        assert_eq!(result.secondary_id, Some(42));

        // Variant requested but failed
        let result = consolidate(
            &with_code,
            &response,
            Some(890),
            None,
            vec![],
            vec!["La variante no pudo crearse: timeout".to_string()],
        )
        .unwrap();
        assert!(result.success);
        assert!(result.message.contains("la variante no pudo crearse"));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_consolidate_orders_product_warnings_first() {
        let response = ApiResponse {
            status: 207,
            body: json!({"data": {"id": 890}, "meta": {"status": "success", "message": "precio"}}),
        };
        let result = consolidate(
            &draft().with_variant_code("L1"),
            &response,
            Some(890),
            None,
            vec!["producto: advertencia".to_string()],
            vec!["variante: advertencia".to_string()],
        )
        .unwrap();
        assert_eq!(result.warnings, vec!["producto: advertencia", "variante: advertencia"]);
    }
}
