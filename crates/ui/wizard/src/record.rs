//! The enrollment record and its validation schemas.
//!
//! The record is a flat set of string fields. Each wizard screen owns a
//! [`FieldSchema`] describing the fields it edits; the full schema is the
//! concatenation of both and gates the final submit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The flat record the wizard collects. Persisted as JSON under the
/// `form-data` store key, so unknown values degrade to empty fields.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrollmentRecord {
    pub phone: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl EnrollmentRecord {
    /// Current value of a field by key. Unknown keys read as empty.
    pub fn value(&self, key: &str) -> &str {
        match key {
            "phone" => &self.phone,
            "email" => &self.email,
            "first_name" => &self.first_name,
            "last_name" => &self.last_name,
            _ => "",
        }
    }

    /// Set a field by key. Unknown keys are ignored.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match key {
            "phone" => self.phone = value,
            "email" => self.email = value,
            "first_name" => self.first_name = value,
            "last_name" => self.last_name = value,
            _ => {}
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Declarative description of a single form field.
///
/// `validator` receives the current field value and returns
/// `Err(message)` for the inline error display.
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub max_len: Option<usize>,
    validator: Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>,
}

impl Field {
    pub fn new(
        key: &'static str,
        label: &'static str,
        validator: impl Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            label,
            max_len: None,
            validator: Box::new(validator),
        }
    }

    /// Cap the editor input at `n` characters.
    pub fn max_len(mut self, n: usize) -> Self {
        self.max_len = Some(n);
        self
    }

    pub fn validate(&self, value: &str) -> Result<(), String> {
        (self.validator)(value)
    }
}

/// An ordered group of fields belonging to one screen.
pub struct FieldSchema {
    pub title: &'static str,
    pub fields: Vec<Field>,
}

impl FieldSchema {
    pub fn new(title: &'static str, fields: Vec<Field>) -> Self {
        Self { title, fields }
    }

    /// Validate the record against every field, collecting inline messages.
    pub fn validate(&self, record: &EnrollmentRecord) -> BTreeMap<&'static str, String> {
        let mut errors = BTreeMap::new();
        for field in &self.fields {
            if let Err(message) = field.validate(record.value(field.key)) {
                errors.insert(field.key, message);
            }
        }
        errors
    }

    pub fn is_valid(&self, record: &EnrollmentRecord) -> bool {
        self.validate(record).is_empty()
    }
}

/// Fields of the contact data screen.
pub fn contact_schema() -> FieldSchema {
    FieldSchema::new(
        "Contact Data",
        vec![
            Field::new("phone", "Phone", |v| {
                if v.chars().count() == 9 {
                    Ok(())
                } else {
                    Err("Must be exactly 9 characters".into())
                }
            })
            .max_len(9),
            Field::new("email", "Email", |v| {
                if is_email(v) {
                    Ok(())
                } else {
                    Err("Not a valid email address".into())
                }
            }),
        ],
    )
}

/// Fields of the personal data screen.
pub fn personal_schema() -> FieldSchema {
    FieldSchema::new(
        "Personal Data",
        vec![
            Field::new("first_name", "First name", min_len(2)),
            Field::new("last_name", "Last name", min_len(2)),
        ],
    )
}

/// The combined schema gating SUBMIT: every contact and personal field.
pub fn full_schema() -> FieldSchema {
    let mut fields = contact_schema().fields;
    fields.extend(personal_schema().fields);
    FieldSchema::new("Enrollment", fields)
}

fn min_len(n: usize) -> impl Fn(&str) -> Result<(), String> + Send + Sync {
    move |v| {
        if v.chars().count() >= n {
            Ok(())
        } else {
            Err(format!("Must be at least {n} characters"))
        }
    }
}

/// Pragmatic email shape check: one `@`, non-empty local part, domain with
/// an interior dot, no whitespace.
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let (local, domain) = match value.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rfind('.') {
        Some(dot) => dot > 0 && dot < domain.len() - 1,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_record() -> EnrollmentRecord {
        EnrollmentRecord {
            phone: "987654321".into(),
            email: "jane.doe@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        }
    }

    #[test]
    fn phone_must_be_exactly_nine_characters() {
        let schema = contact_schema();
        let mut record = valid_record();

        record.phone = "12345678".into();
        assert!(schema.validate(&record).contains_key("phone"));
        record.phone = "1234567890".into();
        assert!(schema.validate(&record).contains_key("phone"));
        record.phone = "123456789".into();
        assert!(!schema.validate(&record).contains_key("phone"));
    }

    #[test]
    fn email_shape_is_checked() {
        assert!(is_email("jane@example.com"));
        assert!(is_email("jane.doe+tag@mail.example.org"));
        assert!(!is_email(""));
        assert!(!is_email("jane"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("jane@example"));
        assert!(!is_email("jane@.com"));
        assert!(!is_email("jane@example."));
        assert!(!is_email("jane@exa mple.com"));
        assert!(!is_email("jane@@example.com"));
    }

    #[test]
    fn names_need_two_characters() {
        let schema = personal_schema();
        let mut record = valid_record();

        record.first_name = "J".into();
        let errors = schema.validate(&record);
        assert_eq!(errors.get("first_name").unwrap(), "Must be at least 2 characters");
        assert!(!errors.contains_key("last_name"));
    }

    #[test]
    fn full_schema_is_the_conjunction() {
        let mut record = valid_record();
        assert!(full_schema().is_valid(&record));

        record.email = "nope".into();
        assert!(personal_schema().is_valid(&record));
        assert!(!full_schema().is_valid(&record));

        record = valid_record();
        record.last_name.clear();
        assert!(contact_schema().is_valid(&record));
        assert!(!full_schema().is_valid(&record));
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = valid_record();
        let raw = serde_json::to_string(&record).unwrap();
        assert_eq!(serde_json::from_str::<EnrollmentRecord>(&raw).unwrap(), record);
    }

    #[test]
    fn unknown_json_degrades_to_defaults() {
        let record: EnrollmentRecord = serde_json::from_str("{\"bogus\":true}").unwrap();
        assert_eq!(record, EnrollmentRecord::default());
    }

    #[test]
    fn value_accessors_cover_all_fields() {
        let mut record = EnrollmentRecord::default();
        for key in ["phone", "email", "first_name", "last_name"] {
            record.set_value(key, format!("<{key}>"));
            assert_eq!(record.value(key), format!("<{key}>"));
        }
        record.set_value("unknown", "x");
        assert_eq!(record.value("unknown"), "");
    }
}
