//! Product and variant domain model
//!
//! Products carry a set of optional boolean attribute flags. The remote API
//! treats presence as intent: a flag set to `false` must be omitted from the
//! wire entirely, never sent as `"false"`. The typed flag set makes that
//! contract explicit instead of relying on runtime map merging.

use std::str::FromStr;

/// Unit of measure stamped on every product, regardless of caller input
pub const UNIT_OF_MEASURE: u8 = 1;

/// Valid category range for products
pub const CATEGORY_RANGE: std::ops::RangeInclusive<i64> = 1..=6;

/// Product type accepted by the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductType {
    /// Physical goods
    Goods,
    /// Fixed assets (e.g. equipment)
    Assets,
    /// Services
    Service,
}

impl ProductType {
    /// Wire representation of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Goods => "goods",
            ProductType::Assets => "assets",
            ProductType::Service => "service",
        }
    }
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "goods" => Ok(ProductType::Goods),
            "assets" => Ok(ProductType::Assets),
            "service" => Ok(ProductType::Service),
            other => Err(other.to_string()),
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional boolean attribute flags of a product
///
/// Only flags that are `true` are ever serialized; see [`ProductFlags::enabled`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFlags {
    /// Product is a medicament
    pub medicament: bool,
    /// Product is a medical supply
    pub medical_supply: bool,
    /// Product is a vaccine
    pub vaccine: bool,
    /// Product is a bed
    pub bed: bool,
    /// Product is an insurance plan
    pub insurance_plan: bool,
    /// Product is a prosthesis
    pub prosthesis: bool,
}

impl ProductFlags {
    /// Wire names of the flags that are set
    ///
    /// Flags that are `false` are omitted entirely; the remote API treats
    /// presence as intent.
    pub fn enabled(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        for (on, name) in [
            (self.medicament, "medicament"),
            (self.medical_supply, "medical_supply"),
            (self.vaccine, "vaccine"),
            (self.bed, "bed"),
            (self.insurance_plan, "insurance_plan"),
            (self.prosthesis, "prosthesis"),
        ] {
            if on {
                names.push(name);
            }
        }
        names
    }
}

/// Draft of a product creation, before validation
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    /// Product name (non-empty)
    pub name: String,

    /// Product type
    pub product_type: ProductType,

    /// List price, must be strictly positive
    pub list_price: f64,

    /// Category identifier, 1 through 6
    pub category: i64,

    /// Optional attribute flags
    pub flags: ProductFlags,

    /// Variant code; when present the workflow also creates a variant
    pub variant_code: Option<String>,
}

impl ProductDraft {
    /// Create a draft with the required fields
    pub fn new(
        name: impl Into<String>,
        product_type: ProductType,
        list_price: f64,
        category: i64,
    ) -> Self {
        Self {
            name: name.into(),
            product_type,
            list_price,
            category,
            flags: ProductFlags::default(),
            variant_code: None,
        }
    }

    /// Set the attribute flags
    pub fn with_flags(mut self, flags: ProductFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the variant code
    pub fn with_variant_code(mut self, code: impl Into<String>) -> Self {
        self.variant_code = Some(code.into());
        self
    }

    /// Serialize the draft for the create-product endpoint
    ///
    /// The unit of measure is forced to [`UNIT_OF_MEASURE`] here; only flags
    /// that are `true` appear.
    pub fn wire_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("name".to_string(), self.name.clone()),
            ("type".to_string(), self.product_type.as_str().to_string()),
            ("unit_of_measure".to_string(), UNIT_OF_MEASURE.to_string()),
            ("list_price".to_string(), self.list_price.to_string()),
            ("category_id".to_string(), self.category.to_string()),
        ];
        for flag in self.flags.enabled() {
            fields.push((flag.to_string(), "true".to_string()));
        }
        fields
    }

    /// Serialize the variant creation call for a created product
    ///
    /// Re-sends only the flags that were true on the parent product.
    pub fn variant_wire_fields(&self, product_id: i64, variant_code: &str) -> Vec<(String, String)> {
        let mut fields = vec![
            ("product_id".to_string(), product_id.to_string()),
            ("variant_code".to_string(), variant_code.to_string()),
        ];
        for flag in self.flags.enabled() {
            fields.push((flag.to_string(), "true".to_string()));
        }
        fields
    }
}
