//! The product catalog entry and its request-body forms.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mercado_core::types::ProductId;

use super::ValidationError;

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    pub description: String,
    pub images: Vec<String>,
}

/// Body of `POST /products`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductDraft {
    /// Validate the draft and produce a stored [`Product`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for the first failing field.
    pub fn into_product(self, id: ProductId) -> Result<Product, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError("title is required".to_owned()));
        }
        if self.price.is_sign_negative() {
            return Err(ValidationError(
                "price must be greater or equal than 0".to_owned(),
            ));
        }
        if self.stock < 0 {
            return Err(ValidationError(
                "stock must be greater or equal than 0".to_owned(),
            ));
        }

        Ok(Product {
            id,
            title: title.to_owned(),
            price: self.price,
            stock: self.stock,
            description: self.description,
            images: self.images,
        })
    }
}

/// Body of `PATCH /products/{idProduct}`. Merge semantics.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub title: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
}

impl ProductPatch {
    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for the first failing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.as_ref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ValidationError("title is required".to_owned()));
        }
        if self.price.is_some_and(|p| p.is_sign_negative()) {
            return Err(ValidationError(
                "price must be greater or equal than 0".to_owned(),
            ));
        }
        if self.stock.is_some_and(|s| s < 0) {
            return Err(ValidationError(
                "stock must be greater or equal than 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            title: "Ceramic mug".to_owned(),
            price: Decimal::new(1299, 2),
            stock: 40,
            description: "Hand-glazed".to_owned(),
            images: vec!["mug.jpg".to_owned()],
        }
    }

    #[test]
    fn test_draft_rejects_negative_price_and_stock() {
        let mut d = draft();
        d.price = Decimal::new(-1, 2);
        assert!(d.into_product(ProductId::random()).is_err());

        let mut d = draft();
        d.stock = -1;
        assert!(d.into_product(ProductId::random()).is_err());
    }

    #[test]
    fn test_draft_requires_title() {
        let mut d = draft();
        d.title = "  ".to_owned();
        assert!(d.into_product(ProductId::random()).is_err());
    }

    #[test]
    fn test_price_serializes_as_number() {
        let product = draft().into_product(ProductId::random()).unwrap();
        let json = serde_json::to_value(&product).unwrap();
        assert!(json["price"].is_number());
        assert!((json["price"].as_f64().unwrap() - 12.99).abs() < 1e-9);
    }

    #[test]
    fn test_patch_validates_present_fields_only() {
        assert!(ProductPatch::default().validate().is_ok());

        let patch = ProductPatch {
            price: Some(Decimal::new(-5, 0)),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
