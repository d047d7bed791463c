//! Named operation dispatch
//!
//! A conversational host hands this module an [`OperationRequest`]: an
//! operation name plus a loose JSON field map. The dispatcher resolves the
//! name, drops fields the target endpoint does not accept, and routes the
//! request either to one of the two multi-step workflows or to a single-call
//! endpoint. Unknown operation names fail before any network traffic.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::adapters::api::{endpoints, ApiTransport};
use crate::config::WorkflowConfig;
use crate::core::classifier::classify;
use crate::core::workflows::{PatientRegistrationWorkflow, ProductWorkflow};
use crate::domain::envelope::{authoritative_message, ApiVerb};
use crate::domain::errors::{CliniaError, WorkflowError};
use crate::domain::outcome::WorkflowResult;
use crate::domain::patient::PatientDraft;
use crate::domain::product::{ProductDraft, ProductFlags, ProductType};
use crate::domain::result::Result;
use crate::validation;

/// Operation request as produced by the conversational layer
///
/// The field map is intentionally loose (`serde_json::Value` per field): the
/// host extracts fields from free-form conversation and this crate is the
/// layer that turns them into typed drafts.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    /// Operation name, e.g. `"create-patient"`
    pub operation: String,

    /// Raw field map extracted from the conversation
    pub fields: Map<String, Value>,
}

impl OperationRequest {
    /// Create a request from a name and a field map
    pub fn new(operation: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self { operation: operation.into(), fields }
    }
}

/// The operations this crate knows how to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Four-step patient registration pipeline
    CreatePatient,
    /// Four-step product creation pipeline with optional variant
    CreateProduct,
    /// Create a laboratory test type
    CreateTestType,
    /// List product templates
    ListProducts,
    /// Read rows of a named table
    ReadTable,
    /// Fetch a patient by identification
    FetchPatient,
    /// Deactivate one or more patients
    DeactivatePatient,
}

impl Operation {
    /// Resolve an operation name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "create-patient" => Some(Operation::CreatePatient),
            "create-product" => Some(Operation::CreateProduct),
            "create-test-type" => Some(Operation::CreateTestType),
            "list-products" => Some(Operation::ListProducts),
            "read-table" => Some(Operation::ReadTable),
            "fetch-patient" => Some(Operation::FetchPatient),
            "deactivate-patient" => Some(Operation::DeactivatePatient),
            _ => None,
        }
    }

    /// Canonical name of the operation
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreatePatient => "create-patient",
            Operation::CreateProduct => "create-product",
            Operation::CreateTestType => "create-test-type",
            Operation::ListProducts => "list-products",
            Operation::ReadTable => "read-table",
            Operation::FetchPatient => "fetch-patient",
            Operation::DeactivatePatient => "deactivate-patient",
        }
    }
}

/// Field schema of a single-call endpoint
///
/// Fields outside `required` + `optional` are dropped before transport; the
/// remote API rejects unexpected form fields on some endpoints.
struct OperationSchema {
    verb: ApiVerb,
    endpoint: &'static str,
    required: &'static [&'static str],
    optional: &'static [&'static str],
    success_message: &'static str,
}

fn schema_of(operation: Operation) -> Option<&'static OperationSchema> {
    match operation {
        Operation::CreateTestType => Some(&OperationSchema {
            verb: ApiVerb::Create,
            endpoint: endpoints::TEST_TYPE,
            required: &["name"],
            optional: &["code", "category_id", "price"],
            success_message: "Tipo de examen creado exitosamente",
        }),
        Operation::ListProducts => Some(&OperationSchema {
            verb: ApiVerb::Read,
            endpoint: endpoints::TEST_PRODUCTS,
            required: &[],
            optional: &[],
            success_message: "Productos consultados exitosamente",
        }),
        Operation::ReadTable => Some(&OperationSchema {
            verb: ApiVerb::Read,
            endpoint: endpoints::AUTOMATIZED,
            required: &["name"],
            optional: &[],
            success_message: "Consulta realizada exitosamente",
        }),
        Operation::FetchPatient => Some(&OperationSchema {
            verb: ApiVerb::Read,
            endpoint: endpoints::USER,
            required: &["identification"],
            optional: &[],
            success_message: "Tercero consultado exitosamente",
        }),
        Operation::DeactivatePatient => Some(&OperationSchema {
            verb: ApiVerb::Delete,
            endpoint: endpoints::USER,
            required: &["ids", "state"],
            optional: &[],
            success_message: "Tercero desactivado exitosamente",
        }),
        Operation::CreatePatient | Operation::CreateProduct => None,
    }
}

/// Routes operation requests to workflows and single-call endpoints
pub struct OperationDispatcher {
    transport: Arc<dyn ApiTransport>,
    patient_workflow: PatientRegistrationWorkflow,
    product_workflow: ProductWorkflow,
}

impl OperationDispatcher {
    /// Create a dispatcher over a transport
    pub fn new(transport: Arc<dyn ApiTransport>, config: &WorkflowConfig) -> Self {
        Self {
            patient_workflow: PatientRegistrationWorkflow::new(Arc::clone(&transport), config),
            product_workflow: ProductWorkflow::new(Arc::clone(&transport)),
            transport,
        }
    }

    /// Execute a named operation
    ///
    /// # Errors
    ///
    /// Returns [`CliniaError::UnknownOperation`] for names outside the known
    /// set, [`CliniaError::MissingField`] when a required field is absent,
    /// and workflow/classified errors as each operation produces them.
    pub async fn dispatch(&self, request: &OperationRequest) -> Result<WorkflowResult> {
        let operation = Operation::parse(&request.operation)
            .ok_or_else(|| CliniaError::UnknownOperation(request.operation.clone()))?;
        tracing::info!(operation = operation.name(), "Dispatching operation");

        match operation {
            Operation::CreatePatient => {
                let draft = patient_draft_from(&request.fields)?;
                self.patient_workflow.run(&draft).await
            }
            Operation::CreateProduct => {
                let draft = product_draft_from(&request.fields)?;
                self.product_workflow.run(&draft).await
            }
            other => {
                // Single-call operations all share the same shape
                let schema = schema_of(other)
                    .ok_or_else(|| CliniaError::UnknownOperation(request.operation.clone()))?;
                self.simple_call(other, schema, &request.fields).await
            }
        }
    }

    /// Execute a single-call operation against its schema
    async fn simple_call(
        &self,
        operation: Operation,
        schema: &OperationSchema,
        fields: &Map<String, Value>,
    ) -> Result<WorkflowResult> {
        let wire_fields = collect_fields(operation, schema, fields)?;

        let dropped: Vec<&str> = fields
            .keys()
            .filter(|key| {
                !schema.required.contains(&key.as_str()) && !schema.optional.contains(&key.as_str())
            })
            .map(String::as_str)
            .collect();
        if !dropped.is_empty() {
            tracing::debug!(operation = operation.name(), ?dropped, "Dropped unknown fields");
        }

        let response = self
            .transport
            .execute(schema.verb, schema.endpoint, &wire_fields)
            .await
            .map_err(|error| CliniaError::Workflow(classify(&error).into_workflow_error()))?;

        let message = authoritative_message(&response.body)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| schema.success_message.to_string());

        let mut result = WorkflowResult::success(message);
        if let Some(id) = validation::extract_primary_id(&response.body) {
            result = result.with_primary_id(id);
        }
        if response.is_partial() {
            result = result.with_warning("La operación se completó parcialmente.");
        }
        match response.envelope() {
            Some(envelope) => Ok(result.with_payload(envelope.data)),
            None => Ok(result.with_payload(response.body)),
        }
    }
}

/// Project the request fields onto a schema, dropping everything else
fn collect_fields(
    operation: Operation,
    schema: &OperationSchema,
    fields: &Map<String, Value>,
) -> Result<Vec<(String, String)>> {
    let mut wire_fields = Vec::new();
    for &key in schema.required {
        let value = fields
            .get(key)
            .and_then(field_text)
            .ok_or(CliniaError::MissingField { operation: operation.name(), field: key })?;
        wire_fields.push((key.to_string(), value));
    }
    for &key in schema.optional {
        if let Some(value) = fields.get(key).and_then(field_text) {
            wire_fields.push((key.to_string(), value));
        }
    }
    Ok(wire_fields)
}

/// Wire text of a loose JSON field value
///
/// `null` counts as absent. Arrays and objects are serialized as JSON text;
/// the deactivation endpoint takes its id list that way.
fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn required_text(
    operation: Operation,
    fields: &Map<String, Value>,
    key: &'static str,
) -> Result<String> {
    fields
        .get(key)
        .and_then(field_text)
        .ok_or(CliniaError::MissingField { operation: operation.name(), field: key })
}

fn optional_text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(field_text).filter(|value| !value.trim().is_empty())
}

fn flag_is_set(fields: &Map<String, Value>, key: &str) -> bool {
    match fields.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}

/// Build a patient draft from a loose field map
fn patient_draft_from(fields: &Map<String, Value>) -> Result<PatientDraft> {
    let operation = Operation::CreatePatient;
    let mut draft = PatientDraft::new(
        required_text(operation, fields, "name")?,
        required_text(operation, fields, "lastname")?,
        required_text(operation, fields, "identification")?,
        required_text(operation, fields, "date_of_birth")?,
        required_text(operation, fields, "gender")?,
    );
    if let Some(email) = optional_text(fields, "email") {
        draft = draft.with_email(email);
    }
    if let Some(phone) = optional_text(fields, "phone") {
        draft = draft.with_phone(phone);
    }
    Ok(draft)
}

/// Build a product draft from a loose field map
///
/// The type must parse exactly; category and price accept both JSON numbers
/// and numeric strings, since conversational extraction produces either.
fn product_draft_from(fields: &Map<String, Value>) -> Result<ProductDraft> {
    let operation = Operation::CreateProduct;

    let type_text = required_text(operation, fields, "type")?;
    let product_type: ProductType = type_text
        .parse()
        .map_err(|value: String| CliniaError::Workflow(WorkflowError::InvalidProductType(value)))?;

    let category_text = required_text(operation, fields, "category")?;
    let category: i64 = category_text.trim().parse().map_err(|_| {
        CliniaError::Serialization(format!("Field 'category' is not a number: {category_text}"))
    })?;

    let price_text = required_text(operation, fields, "price")?;
    let list_price: f64 = price_text.trim().parse().map_err(|_| {
        CliniaError::Serialization(format!("Field 'price' is not a number: {price_text}"))
    })?;

    let flags = ProductFlags {
        medicament: flag_is_set(fields, "medicament"),
        medical_supply: flag_is_set(fields, "medical_supply"),
        vaccine: flag_is_set(fields, "vaccine"),
        bed: flag_is_set(fields, "bed"),
        insurance_plan: flag_is_set(fields, "insurance_plan"),
        prosthesis: flag_is_set(fields, "prosthesis"),
    };

    let mut draft =
        ProductDraft::new(required_text(operation, fields, "name")?, product_type, list_price, category)
            .with_flags(flags);
    if let Some(code) = optional_text(fields, "variant_code") {
        draft = draft.with_variant_code(code);
    }
    Ok(draft)
}
