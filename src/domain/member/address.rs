//! Shipping address value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{check_length, require_text, ValidationError};

/// Postal address a member ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let address = Self {
            street: street.into().trim().to_string(),
            city: city.into().trim().to_string(),
            state: state.into().trim().to_string(),
            postal_code: postal_code.into().trim().to_string(),
            country: country.into().trim().to_string(),
        };

        require_text("street", &address.street, 500)?;
        require_text("city", &address.city, 100)?;
        check_length("state", &address.state, 100)?;
        check_length("postal_code", &address.postal_code, 20)?;
        require_text("country", &address.country, 100)?;

        Ok(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.street, self.city)?;
        match (self.state.is_empty(), self.postal_code.is_empty()) {
            (false, false) => write!(f, ", {} {}", self.state, self.postal_code)?,
            (false, true) => write!(f, ", {}", self.state)?,
            (true, false) => write!(f, ", {}", self.postal_code)?,
            (true, true) => {}
        }
        write!(f, ", {}", self.country)
    }
}
