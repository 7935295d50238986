use serde::{Deserialize, Serialize};

use brewhouse_core::{Entity, Patch};

/// A coffee on the menu.
///
/// `id` is `None` until the store assigns one; it is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coffee {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub price: f64,
}

impl Coffee {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
        }
    }
}

impl Entity for Coffee {
    type Key = i64;

    const NAME: &'static str = "coffee";
    const KEY_FIELD: &'static str = "id";

    fn key(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_key(&mut self, key: i64) {
        self.id = Some(key);
    }
}

/// Merge-patch payload for a coffee: absent fields leave the stored value
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoffeePatch {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl Patch<Coffee> for CoffeePatch {
    fn key(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn apply_to(&self, target: &mut Coffee) {
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
        if let Some(price) = self.price {
            target.price = price;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_overwrites_only_present_fields() {
        let mut coffee = Coffee {
            id: Some(1),
            name: "Espresso".to_string(),
            price: 2.5,
        };

        let patch = CoffeePatch {
            id: Some(1),
            name: Some("Doppio".to_string()),
            price: None,
        };
        patch.apply_to(&mut coffee);

        assert_eq!(coffee.name, "Doppio");
        assert_eq!(coffee.price, 2.5);
        assert_eq!(coffee.id, Some(1));
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut coffee = Coffee {
            id: Some(7),
            name: "Flat White".to_string(),
            price: 3.8,
        };
        let before = coffee.clone();

        let patch = CoffeePatch {
            id: Some(7),
            name: None,
            price: None,
        };
        patch.apply_to(&mut coffee);

        assert_eq!(coffee, before);
    }

    #[test]
    fn patch_never_touches_the_key() {
        let mut coffee = Coffee {
            id: Some(3),
            name: "Latte".to_string(),
            price: 4.0,
        };

        let patch = CoffeePatch {
            id: Some(99),
            name: Some("Mocha".to_string()),
            price: Some(4.5),
        };
        patch.apply_to(&mut coffee);

        assert_eq!(coffee.id, Some(3));
        assert_eq!(coffee.name, "Mocha");
        assert_eq!(coffee.price, 4.5);
    }

    #[test]
    fn wire_shape_round_trips_with_null_id() {
        let coffee: Coffee = serde_json::from_str(r#"{"name":"Cortado","price":3.2}"#).unwrap();
        assert_eq!(coffee.id, None);

        let json = serde_json::to_value(&coffee).unwrap();
        assert!(json["id"].is_null());
        assert_eq!(json["name"], "Cortado");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_coffee() -> impl Strategy<Value = Coffee> {
            ("[A-Za-z ]{1,20}", 0.0f64..100.0).prop_map(|(name, price)| Coffee {
                id: Some(1),
                name,
                price,
            })
        }

        fn arb_patch() -> impl Strategy<Value = CoffeePatch> {
            (
                proptest::option::of("[A-Za-z ]{1,20}".prop_map(String::from)),
                proptest::option::of(0.0f64..100.0),
            )
                .prop_map(|(name, price)| CoffeePatch {
                    id: Some(1),
                    name,
                    price,
                })
        }

        proptest! {
            /// Property: fields absent from the patch keep their stored values,
            /// fields present in the patch end up with the patch values.
            #[test]
            fn merge_patch_law(coffee in arb_coffee(), patch in arb_patch()) {
                let mut merged = coffee.clone();
                patch.apply_to(&mut merged);

                match &patch.name {
                    Some(name) => prop_assert_eq!(&merged.name, name),
                    None => prop_assert_eq!(&merged.name, &coffee.name),
                }
                match patch.price {
                    Some(price) => prop_assert_eq!(merged.price, price),
                    None => prop_assert_eq!(merged.price, coffee.price),
                }
                prop_assert_eq!(merged.id, coffee.id);
            }

            /// Property: applying the same patch twice equals applying it once.
            #[test]
            fn merge_patch_is_idempotent(coffee in arb_coffee(), patch in arb_patch()) {
                let mut once = coffee.clone();
                patch.apply_to(&mut once);

                let mut twice = once.clone();
                patch.apply_to(&mut twice);

                prop_assert_eq!(once, twice);
            }
        }
    }
}
