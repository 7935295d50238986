use serde::{Deserialize, Serialize};

use brewhouse_core::{Entity, Patch};

/// A customer of the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub phone_number: String,
}

impl Customer {
    pub fn new(name: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            phone_number: phone_number.into(),
        }
    }
}

impl Entity for Customer {
    type Key = i64;

    const NAME: &'static str = "customer";
    const KEY_FIELD: &'static str = "id";

    fn key(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_key(&mut self, key: i64) {
        self.id = Some(key);
    }
}

/// Merge-patch payload for a customer: absent fields leave the stored value
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl Patch<Customer> for CustomerPatch {
    fn key(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn apply_to(&self, target: &mut Customer) {
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
        if let Some(phone_number) = &self.phone_number {
            target.phone_number = phone_number.clone();
        }
    }
}
