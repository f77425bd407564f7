use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::DispatchError, models::validation::validate_phone};

pub const PHONE_FIELD: &str = "phone";
pub const NAME_FIELD: &str = "name";
pub const NOT_AVAILABLE: &str = "N/A";

/// One spreadsheet row: field name to value. Always carries a non-empty
/// `phone`, which is the recipient identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HashMap<String, Value>", into = "HashMap<String, Value>")]
pub struct Contact {
    fields: HashMap<String, Value>,
}

impl Contact {
    pub fn new(fields: HashMap<String, Value>) -> Result<Self, DispatchError> {
        Self::at_row(0, fields)
    }

    /// Same as [`Contact::new`], reporting `row` in the error.
    pub fn at_row(row: usize, fields: HashMap<String, Value>) -> Result<Self, DispatchError> {
        let phone = fields.get(PHONE_FIELD).map(field_to_string);

        match phone {
            None => Err(DispatchError::InvalidContact {
                row,
                reason: format!("missing '{}' field", PHONE_FIELD),
            }),
            Some(phone) => {
                validate_phone(&phone).map_err(|e| DispatchError::InvalidContact {
                    row,
                    reason: e.to_string(),
                })?;
                Ok(Self { fields })
            }
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, DispatchError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::new(fields)
    }

    pub fn phone(&self) -> String {
        self.field(PHONE_FIELD).unwrap_or_default()
    }

    /// Display name for reports, or `N/A` when the contact has none.
    pub fn display_name(&self) -> String {
        self.field(NAME_FIELD)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// Stringified value of `name`, if present.
    pub fn field(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(field_to_string)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// A loaded sheet row: either a contact that can be messaged, or a row that
/// still gets a failed result so the report lines up with the sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum ContactRow {
    Valid(Contact),
    Invalid {
        row: usize,
        name: String,
        error: DispatchError,
    },
}

impl ContactRow {
    pub fn from_fields(row: usize, fields: HashMap<String, Value>) -> Self {
        let name = fields
            .get(NAME_FIELD)
            .map(field_to_string)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        match Contact::at_row(row, fields) {
            Ok(contact) => ContactRow::Valid(contact),
            Err(error) => ContactRow::Invalid { row, name, error },
        }
    }

    pub fn contact(&self) -> Option<&Contact> {
        match self {
            ContactRow::Valid(contact) => Some(contact),
            ContactRow::Invalid { .. } => None,
        }
    }
}

impl From<Contact> for ContactRow {
    fn from(contact: Contact) -> Self {
        ContactRow::Valid(contact)
    }
}

impl TryFrom<HashMap<String, Value>> for Contact {
    type Error = DispatchError;

    fn try_from(fields: HashMap<String, Value>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<Contact> for HashMap<String, Value> {
    fn from(contact: Contact) -> Self {
        contact.fields
    }
}

fn field_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
