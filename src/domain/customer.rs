use std::fmt;

use async_trait::async_trait;
use derive_more::{Deref, Display, From};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use crate::domain::StoreError;

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, From, Deref, Default,
)]
pub struct CustomerId(u64);

/// Short identifier handed out to humans, distinct from the primary key.
/// Drawn once at construction and never recomputed; collisions between
/// records are possible and tolerated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, From, Deref)]
pub struct PublicId(String);

impl PublicId {
    pub const LEN: usize = 5;

    /// Samples `LEN` characters uniformly from the 62-symbol alphanumeric
    /// alphabet, repetition allowed.
    pub fn generate() -> Self {
        let id = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::LEN)
            .map(char::from)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The client-facing shape of a customer: the fields accepted on create and
/// update, and the fields echoed back by the API. The database id and the
/// public id stay out of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFields {
    pub name: String,
    pub address: String,
    pub province: String,
    pub cif: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

/// Field-presence check applied before any write. Returns one violation per
/// blank field, empty when the candidate is valid.
pub fn validate(fields: &CustomerFields) -> Vec<Violation> {
    [
        ("name", &fields.name),
        ("address", &fields.address),
        ("province", &fields.province),
        ("cif", &fields.cif),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(field, _)| Violation {
        field,
        message: format!("{field} must not be blank"),
    })
    .collect()
}

#[derive(Debug)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl From<Vec<Violation>> for ValidationError {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self
            .violations
            .iter()
            .map(|violation| violation.message.as_str())
            .collect::<Vec<_>>();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// One client record. The database assigns `id` on first save; the public id
/// is fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Customer {
    id: Option<CustomerId>,
    public_id: PublicId,
    fields: CustomerFields,
}

impl Customer {
    pub fn new(fields: CustomerFields) -> Self {
        Self {
            id: None,
            public_id: PublicId::generate(),
            fields,
        }
    }

    /// Rebuilds a record from its stored row.
    pub fn restore(id: CustomerId, public_id: PublicId, fields: CustomerFields) -> Self {
        Self {
            id: Some(id),
            public_id,
            fields,
        }
    }

    pub fn id(&self) -> Option<CustomerId> {
        self.id
    }

    pub fn public_id(&self) -> &PublicId {
        &self.public_id
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn address(&self) -> &str {
        &self.fields.address
    }

    pub fn province(&self) -> &str {
        &self.fields.province
    }

    pub fn cif(&self) -> &str {
        &self.fields.cif
    }

    pub fn set_name(&mut self, name: String) {
        self.fields.name = name;
    }

    pub fn set_address(&mut self, address: String) {
        self.fields.address = address;
    }

    pub fn set_province(&mut self, province: String) {
        self.fields.province = province;
    }

    pub fn set_cif(&mut self, cif: String) {
        self.fields.cif = cif;
    }

    /// Overwrites the four mutable fields in one step. `id` and the public
    /// id are untouched.
    pub fn apply(&mut self, fields: CustomerFields) {
        self.fields = fields;
    }

    pub fn fields(&self) -> CustomerFields {
        self.fields.clone()
    }

    /// Called by the store when the row is first inserted.
    pub fn assign_id(&mut self, id: CustomerId) {
        self.id = Some(id);
    }
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Customer>, StoreError>;
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;
    async fn save(&self, customer: &mut Customer) -> Result<(), StoreError>;
    async fn delete(&self, id: CustomerId) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> CustomerFields {
        CustomerFields {
            name: "Dani".to_owned(),
            address: "c/ Prueba 6".to_owned(),
            province: "Malaga".to_owned(),
            cif: "48965217R".to_owned(),
        }
    }

    #[test]
    fn public_id_is_five_alphanumeric_characters() {
        let id = PublicId::generate();
        assert_eq!(id.as_str().len(), PublicId::LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn valid_fields_produce_no_violations() {
        assert!(validate(&fields()).is_empty());
    }

    #[test]
    fn each_blank_field_is_reported() {
        let blank = CustomerFields {
            name: String::new(),
            address: String::new(),
            province: String::new(),
            cif: String::new(),
        };
        let named = validate(&blank)
            .iter()
            .map(|violation| violation.field)
            .collect::<Vec<_>>();
        assert_eq!(named, ["name", "address", "province", "cif"]);
    }

    #[test]
    fn a_violation_carries_its_field_message() {
        let mut candidate = fields();
        candidate.name = String::new();
        let violations = validate(&candidate);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "name must not be blank");
    }

    #[test]
    fn validation_error_joins_messages() {
        let mut candidate = fields();
        candidate.name = String::new();
        candidate.cif = String::new();
        let error = ValidationError::from(validate(&candidate));
        assert_eq!(
            error.to_string(),
            "name must not be blank; cif must not be blank"
        );
    }

    #[test]
    fn new_customers_have_no_id_until_saved() {
        let customer = Customer::new(fields());
        assert_eq!(customer.id(), None);
        assert_eq!(customer.public_id().as_str().len(), PublicId::LEN);
    }

    #[test]
    fn apply_leaves_id_and_public_id_untouched() {
        let mut customer = Customer::restore(
            CustomerId::from(7),
            PublicId::from("a1B2c".to_owned()),
            fields(),
        );
        let mut updated = fields();
        updated.province = "Sevilla".to_owned();
        customer.apply(updated);
        assert_eq!(customer.id(), Some(CustomerId::from(7)));
        assert_eq!(customer.public_id().as_str(), "a1B2c");
        assert_eq!(customer.province(), "Sevilla");
        assert_eq!(customer.name(), "Dani");
    }

    #[test]
    fn assign_id_marks_the_record_persisted() {
        let mut customer = Customer::new(fields());
        customer.assign_id(CustomerId::from(3));
        assert_eq!(customer.id(), Some(CustomerId::from(3)));
    }
}
