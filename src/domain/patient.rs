//! Patient ("tercero") domain model
//!
//! The remote system calls a patient record a "tercero" (third-party entity).
//! Every record carries a fixed origin code ("procedense") which is a business
//! invariant of this deployment: it is always "768" and never taken from
//! caller input. The typed draft does not even expose the field, so the
//! invariant cannot be violated by construction.

/// Fixed origin/provenance code stamped on every patient record
pub const PROCEDENSE: &str = "768";

/// Gender codes accepted by the remote API
pub const VALID_GENDERS: [&str; 2] = ["m", "f"];

/// Draft of a patient registration, before validation
///
/// Built from a conversational operation request. Optional contact fields use
/// `with_*` builders so the caller states explicitly which fields are present;
/// absent fields are omitted from the wire entirely.
///
/// # Example
///
/// ```
/// use clinia::domain::PatientDraft;
///
/// let draft = PatientDraft::new("María", "González", "12345678", "1990-03-15", "f")
///     .with_email("maria@example.com");
/// assert!(draft.phone.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PatientDraft {
    /// Given name
    pub name: String,

    /// Family name
    pub lastname: String,

    /// National identification (at least 6 alphanumeric characters)
    pub identification: String,

    /// Date of birth, `YYYY-MM-DD`
    pub date_of_birth: String,

    /// Gender code, exactly "m" or "f"
    pub gender: String,

    /// Contact email (optional)
    pub email: Option<String>,

    /// Contact phone (optional)
    pub phone: Option<String>,
}

impl PatientDraft {
    /// Create a draft with the required fields
    pub fn new(
        name: impl Into<String>,
        lastname: impl Into<String>,
        identification: impl Into<String>,
        date_of_birth: impl Into<String>,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            lastname: lastname.into(),
            identification: identification.into(),
            date_of_birth: date_of_birth.into(),
            gender: gender.into(),
            email: None,
            phone: None,
        }
    }

    /// Set the contact email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the contact phone
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Serialize the draft for the create-patient endpoint
    ///
    /// The procedense code is stamped here unconditionally; optional contact
    /// fields are present only when set.
    pub fn wire_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("name".to_string(), self.name.clone()),
            ("lastname".to_string(), self.lastname.clone()),
            ("identification".to_string(), self.identification.clone()),
            ("date_of_birth".to_string(), self.date_of_birth.clone()),
            ("gender".to_string(), self.gender.clone()),
            ("procedense".to_string(), PROCEDENSE.to_string()),
        ];
        if let Some(ref email) = self.email {
            fields.push(("email".to_string(), email.clone()));
        }
        if let Some(ref phone) = self.phone {
            fields.push(("phone".to_string(), phone.clone()));
        }
        fields
    }
}
