//! # Registration Forms
//!
//! Request bodies for clients, products and services, each with a
//! `validate()` that reports every failing field by its wire name.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, FieldErrors, ValidationError};
use crate::money::Money;
use crate::types::ProductCategory;
use crate::validation::{
    validate_birth_date, validate_client_name, validate_cpf, validate_email, validate_phone, validate_price,
    validate_product_name,
};

/// Trims a field and maps blank to `None`.
fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Client
// =============================================================================

/// Body of `POST /clients` and `PUT /clients/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRequest {
    pub name: String,
    pub cpf: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl ClientRequest {
    /// Only the name is required. Optional fields are checked when filled.
    pub fn validate(&self, today: NaiveDate) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("name", validate_client_name(&self.name));
        if let Some(cpf) = clean(&self.cpf) {
            errors.check("cpf", validate_cpf(&cpf));
        }
        if let Some(birth_date) = self.birth_date {
            errors.check("birthDate", validate_birth_date(birth_date, today));
        }
        if let Some(phone) = clean(&self.phone) {
            errors.check("phone", validate_phone(&phone));
        }
        if let Some(email) = clean(&self.email) {
            errors.check("email", validate_email(&email));
        }
        errors.into_result()
    }

    /// Validates, then trims every text field and drops blank ones.
    pub fn into_sanitized(self, today: NaiveDate) -> CoreResult<Self> {
        self.validate(today)?;
        Ok(ClientRequest {
            name: self.name.trim().to_string(),
            cpf: clean(&self.cpf),
            birth_date: self.birth_date,
            phone: clean(&self.phone),
            email: clean(&self.email),
            address: clean(&self.address),
        })
    }
}

// =============================================================================
// Product
// =============================================================================

/// Body of `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub category: ProductCategory,
    pub brand: Option<String>,
    pub code: Option<String>,
    pub sale_price: Money,
    pub cost_price: Option<Money>,
    pub stock: Option<i64>,
}

impl ProductRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("name", validate_product_name(&self.name));
        errors.check("salePrice", validate_price(self.sale_price));
        if let Some(cost) = self.cost_price {
            errors.check("costPrice", validate_price(cost));
        }
        if self.stock.is_some_and(|s| s < 0) {
            errors.insert(
                "stock",
                ValidationError::OutOfRange {
                    field: "Stock".to_string(),
                    min: "0".to_string(),
                    max: "any amount".to_string(),
                },
            );
        }
        errors.into_result()
    }
}

// =============================================================================
// Service
// =============================================================================

/// Body of `POST /opticalservices` and `PUT /opticalservices/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
}

impl ServiceRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("name", validate_product_name(&self.name));
        errors.check("price", validate_price(self.price));
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_client_only_name_required() {
        let req = ClientRequest {
            name: "Ana Souza".into(),
            cpf: Some("  ".into()),
            ..Default::default()
        };
        let clean = req.into_sanitized(today()).unwrap();
        assert_eq!(clean.cpf, None);
        assert_eq!(clean.name, "Ana Souza");
    }

    #[test]
    fn test_client_reports_every_bad_field() {
        let req = ClientRequest {
            name: "Al".into(),
            cpf: Some("123.456.789-00".into()),
            birth_date: NaiveDate::from_ymd_opt(2030, 1, 1),
            phone: Some("1234".into()),
            email: Some("ana@".into()),
            address: None,
        };
        let errors = req.validate(today()).unwrap_err();
        let paths: Vec<&str> = errors.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["birthDate", "cpf", "email", "name", "phone"]);
    }

    #[test]
    fn test_product_prices() {
        let mut req = ProductRequest {
            name: "Ray-Ban RB5154".into(),
            category: ProductCategory::Frame,
            brand: None,
            code: None,
            sale_price: Money::from_cents(0),
            cost_price: None,
            stock: Some(3),
        };
        assert!(req.validate().is_ok());

        req.sale_price = Money::from_cents(-1);
        req.stock = Some(-2);
        let errors = req.validate().unwrap_err();
        assert!(errors.get("salePrice").is_some());
        assert!(errors.get("stock").is_some());
    }

    #[test]
    fn test_service_requires_name() {
        let req = ServiceRequest {
            name: " ".into(),
            description: None,
            price: Money::from_cents(5000),
        };
        assert!(req.validate().unwrap_err().get("name").is_some());
    }
}
