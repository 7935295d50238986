use serde::{Deserialize, Serialize};

use brewhouse_core::Entity;

/// A security role, keyed by its name (e.g. `ROLE_ADMIN`).
///
/// The name is caller-supplied and doubles as the identity; there is nothing
/// else to update, so the authority surface has no patch shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    pub name: String,
}

impl Authority {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Entity for Authority {
    type Key = String;

    const NAME: &'static str = "authority";
    const KEY_FIELD: &'static str = "name";

    fn key(&self) -> Option<&String> {
        Some(&self.name)
    }

    fn set_key(&mut self, key: String) {
        self.name = key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_name_is_the_key() {
        let authority = Authority::new("ROLE_USER");
        assert_eq!(authority.key(), Some(&"ROLE_USER".to_string()));
    }

    #[test]
    fn wire_shape_is_a_single_name_field() {
        let authority: Authority = serde_json::from_str(r#"{"name":"ROLE_ADMIN"}"#).unwrap();
        assert_eq!(authority.name, "ROLE_ADMIN");
        assert_eq!(
            serde_json::to_string(&authority).unwrap(),
            r#"{"name":"ROLE_ADMIN"}"#
        );
    }
}
