//! Mock account book entries: postal addresses and phone numbers.
//!
//! These lists live next to the mock profile and have no relation to the
//! catalog or the cart.

use serde::{Deserialize, Serialize};

/// A postal address on the account page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: i64,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    /// "Billing" or "Shipping".
    #[serde(rename = "type")]
    pub kind: String,
}

impl Address {
    /// A blank shipping address.
    #[must_use]
    pub fn blank(id: i64) -> Self {
        Self {
            id,
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            kind: "Shipping".to_owned(),
        }
    }

    #[must_use]
    pub fn patched(mut self, patch: AddressPatch) -> Self {
        if let Some(street) = patch.street {
            self.street = street;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
        if let Some(zip) = patch.zip {
            self.zip = zip;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        self
    }
}

/// Partial address update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddressPatch {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// A phone number on the account page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub id: i64,
    pub phone: String,
    /// "Land", "Mobile", ...
    #[serde(rename = "type")]
    pub kind: String,
}

impl Phone {
    /// A blank mobile number.
    #[must_use]
    pub fn blank(id: i64) -> Self {
        Self {
            id,
            phone: String::new(),
            kind: "Mobile".to_owned(),
        }
    }

    #[must_use]
    pub fn patched(mut self, patch: PhonePatch) -> Self {
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        self
    }
}

/// Partial phone update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PhonePatch {
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Addresses seeded on first visit to the account page.
#[must_use]
pub fn default_addresses() -> Vec<Address> {
    vec![
        Address {
            id: 1,
            street: "340 COMMERCE DRIVE".to_owned(),
            city: "CRYSTAL LAKE".to_owned(),
            state: "Illinois".to_owned(),
            zip: "60014".to_owned(),
            kind: "Billing".to_owned(),
        },
        Address {
            id: 2,
            street: "2125 POINT BLVD".to_owned(),
            city: "ELGIN".to_owned(),
            state: "Illinois".to_owned(),
            zip: "60123-7956".to_owned(),
            kind: "Shipping".to_owned(),
        },
    ]
}

/// Phones seeded on first visit to the account page.
#[must_use]
pub fn default_phones() -> Vec<Phone> {
    vec![Phone {
        id: 1,
        phone: "(847) 697-7643 x811".to_owned(),
        kind: "Land".to_owned(),
    }]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_address_json_uses_type_key() {
        let json = serde_json::to_value(&default_addresses()[0]).unwrap();
        assert_eq!(json["type"], "Billing");
    }

    #[test]
    fn test_address_patch() {
        let address = Address::blank(7).patched(AddressPatch {
            city: Some("ELGIN".to_owned()),
            ..AddressPatch::default()
        });
        assert_eq!(address.city, "ELGIN");
        assert_eq!(address.kind, "Shipping");
        assert_eq!(address.street, "");
    }

    #[test]
    fn test_phone_patch() {
        let phone = default_phones().remove(0).patched(PhonePatch {
            phone: Some("(555) 010-0000".to_owned()),
            kind: None,
        });
        assert_eq!(phone.phone, "(555) 010-0000");
        assert_eq!(phone.kind, "Land");
    }
}
