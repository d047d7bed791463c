//! Patient ("tercero") registration workflow
//!
//! Four strictly sequential steps: validate, check-exists, create, confirm.
//! Any step failing aborts the pipeline; no step is retried. Local validation
//! failures never reach the network.
//!
//! The check-exists step is deliberately permissive toward proceeding: the
//! remote API signals "not found" inconsistently, sometimes as a server
//! error. By default a server error during the check is treated as "patient
//! absent"; `strict_existence_check` turns it into a blocking failure.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::adapters::api::{endpoints, ApiTransport};
use crate::config::WorkflowConfig;
use crate::core::classifier::classify;
use crate::domain::envelope::{ApiResponse, ApiVerb};
use crate::domain::errors::{ApiError, WorkflowError};
use crate::domain::patient::{PatientDraft, VALID_GENDERS};
use crate::domain::result::Result;
use crate::domain::outcome::WorkflowResult;
use crate::validation;

/// Minimum age for patient registration, in whole years
pub const MINIMUM_AGE: i32 = 18;

const NOT_FOUND_PHRASES: &[&str] =
    &["not found", "does not exist", "no existe", "no encontrado", "no se encontró", "no se encontro"];

/// Validate a patient draft against the domain rules
///
/// Checked in order: date format, age, gender, identification, then the
/// optional contact fields. The first violation wins.
///
/// # Errors
///
/// Returns the canonical [`WorkflowError`] kind for the first rule violated.
pub fn validate_patient(draft: &PatientDraft, today: NaiveDate) -> std::result::Result<i32, WorkflowError> {
    let date_of_birth = validation::parse_date(&draft.date_of_birth)
        .ok_or_else(|| WorkflowError::InvalidDate(draft.date_of_birth.clone()))?;

    let age = validation::compute_age(date_of_birth, today);
    if age < MINIMUM_AGE {
        return Err(WorkflowError::Underage { age });
    }

    if !VALID_GENDERS.contains(&draft.gender.as_str()) {
        return Err(WorkflowError::InvalidGender(draft.gender.clone()));
    }

    if !validation::is_valid_identification(&draft.identification) {
        return Err(WorkflowError::InvalidIdentification(draft.identification.clone()));
    }

    if let Some(ref email) = draft.email {
        if !validation::is_valid_email(email) {
            return Err(WorkflowError::InvalidFormat { field: "email", value: email.clone() });
        }
    }
    if let Some(ref phone) = draft.phone {
        if !validation::is_valid_phone(phone) {
            return Err(WorkflowError::InvalidFormat { field: "phone", value: phone.clone() });
        }
    }

    Ok(age)
}

/// Patient registration pipeline
pub struct PatientRegistrationWorkflow {
    transport: Arc<dyn ApiTransport>,
    strict_existence_check: bool,
}

impl PatientRegistrationWorkflow {
    /// Create a workflow over a transport
    pub fn new(transport: Arc<dyn ApiTransport>, config: &WorkflowConfig) -> Self {
        Self { transport, strict_existence_check: config.strict_existence_check }
    }

    /// Run the full pipeline, evaluating age against today's date
    ///
    /// # Errors
    ///
    /// Returns a [`WorkflowError`] (wrapped in the top-level error) for the
    /// first failing step.
    pub async fn run(&self, draft: &PatientDraft) -> Result<WorkflowResult> {
        self.run_at(draft, Utc::now().date_naive()).await
    }

    /// Run the full pipeline, evaluating age against an explicit date
    pub async fn run_at(&self, draft: &PatientDraft, today: NaiveDate) -> Result<WorkflowResult> {
        tracing::info!(
            identification = %draft.identification,
            "Starting patient registration workflow"
        );

        let age = validate_patient(draft, today)?;
        tracing::debug!(age = age, "Patient draft validated");

        self.check_exists(draft).await?;

        let response = self.create(draft, age).await?;

        let result = confirm(&response)?;
        tracing::info!(
            patient_id = ?result.primary_id,
            "Patient registration workflow completed"
        );
        Ok(result)
    }

    /// Step 2: look up the identification to avoid duplicate creation
    async fn check_exists(&self, draft: &PatientDraft) -> std::result::Result<(), WorkflowError> {
        let fields = [("identification".to_string(), draft.identification.clone())];
        match self.transport.execute(ApiVerb::Read, endpoints::USER, &fields).await {
            Ok(response) => {
                let found = response.envelope().map(|env| env.has_data()).unwrap_or(false);
                if found {
                    tracing::info!(
                        identification = %draft.identification,
                        "Patient already exists, aborting registration"
                    );
                    return Err(WorkflowError::AlreadyExists(draft.identification.clone()));
                }
                Ok(())
            }
            Err(error) => self.interpret_lookup_failure(error),
        }
    }

    /// Decide whether a failed lookup blocks the pipeline
    fn interpret_lookup_failure(&self, error: ApiError) -> std::result::Result<(), WorkflowError> {
        let lowered = error.message().to_lowercase();
        if NOT_FOUND_PHRASES.iter().any(|p| lowered.contains(p)) {
            return Ok(());
        }

        let server_side =
            matches!(error, ApiError::Transport { .. } | ApiError::Decode { .. })
                || matches!(&error, ApiError::Status { status_code, .. } if *status_code >= 500);
        if server_side {
            let classified = classify(&error);
            if self.strict_existence_check {
                tracing::warn!(message = %classified.message, "Existence check failed in strict mode");
                return Err(WorkflowError::ExistenceCheckFailed(classified.message));
            }
            tracing::warn!(
                message = %classified.message,
                "Existence check hit a server error; treating patient as absent"
            );
            return Ok(());
        }

        // A client-side rejection (e.g. 401) blocks in both modes
        Err(classify(&error).into_workflow_error())
    }

    /// Step 3: create the record, with the procedense code forced on the wire
    async fn create(
        &self,
        draft: &PatientDraft,
        age: i32,
    ) -> std::result::Result<ApiResponse, WorkflowError> {
        let fields = draft.wire_fields();
        match self.transport.execute(ApiVerb::Create, endpoints::USER, &fields).await {
            Ok(response) => Ok(response),
            Err(error) => Err(map_creation_failure(&error, draft, age)),
        }
    }
}

/// Map a creation failure onto the canonical vocabulary
///
/// Specific substrings in the remote message become stable domain errors so
/// downstream consumers never parse raw transport text.
fn map_creation_failure(error: &ApiError, draft: &PatientDraft, age: i32) -> WorkflowError {
    let classified = classify(error);
    let lowered = classified.message.to_lowercase();

    if lowered.contains("ya existe") || lowered.contains("already exists") {
        return WorkflowError::AlreadyExists(draft.identification.clone());
    }
    if lowered.contains("menor de edad") || lowered.contains("underage") {
        return WorkflowError::Underage { age };
    }
    if lowered.contains("fecha") || lowered.contains("date") {
        return WorkflowError::InvalidDate(draft.date_of_birth.clone());
    }
    WorkflowError::CreationFailed(classified.message)
}

/// Step 4: confirm creation and consolidate the result
fn confirm(response: &ApiResponse) -> std::result::Result<WorkflowResult, WorkflowError> {
    let envelope = response.envelope().ok_or_else(|| {
        WorkflowError::CreationFailed("respuesta inesperada del servicio".to_string())
    })?;

    if !envelope.is_success() {
        let message = if envelope.meta.message.is_empty() {
            "el servicio reportó un error".to_string()
        } else {
            envelope.meta.message.clone()
        };
        return Err(WorkflowError::CreationFailed(message));
    }

    // Identifier lookup order: data.id, data.ids, top-level id
    let primary_id = response
        .body
        .get("data")
        .and_then(|d| d.get("id"))
        .and_then(validation::coerce_id)
        .or_else(|| {
            response
                .body
                .get("data")
                .and_then(|d| d.get("ids"))
                .and_then(validation::coerce_id)
        })
        .or_else(|| response.body.get("id").and_then(validation::coerce_id));

    let mut result = WorkflowResult::success("Tercero registrado exitosamente")
        .with_payload(envelope.data.clone());
    if let Some(id) = primary_id {
        result = result.with_primary_id(id);
    }
    Ok(result)
}
