//! The order document and its request-body form.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mercado_core::types::{AddressDraft, OrderId, ProductId, UserId};

use super::ValidationError;

/// One line of an order. References the product by id; no stock check or
/// cascade happens at this layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub units: i64,
}

/// An order, owned by exactly one user.
///
/// The shipping address is a value copy taken at order time; it carries no
/// id and is not linked back to the user's address sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub shipping_address: AddressDraft,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_cost: Decimal,
    pub products: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /orders`. The owner comes from the authenticated identity,
/// never from the body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub shipping_address: AddressDraft,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub shipping_cost: Decimal,
    #[serde(default)]
    pub products: Vec<OrderLine>,
}

impl OrderDraft {
    /// Validate the draft and produce a stored [`Order`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for the first failing field.
    pub fn into_order(
        self,
        id: OrderId,
        user_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Order, ValidationError> {
        self.shipping_address.validate()?;
        if self.shipping_cost.is_sign_negative() {
            return Err(ValidationError(
                "shipping cost must be greater or equal than 0".to_owned(),
            ));
        }
        for line in &self.products {
            if line.price.is_sign_negative() {
                return Err(ValidationError(
                    "price must be greater or equal than 0".to_owned(),
                ));
            }
            if line.units < 0 {
                return Err(ValidationError(
                    "units must be greater or equal than 0".to_owned(),
                ));
            }
        }

        Ok(Order {
            id,
            user_id,
            shipping_address: self.shipping_address,
            shipping_cost: self.shipping_cost,
            products: self.products,
            created_at,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mercado_core::types::CountryCode;

    fn draft() -> OrderDraft {
        OrderDraft {
            shipping_address: AddressDraft {
                address: "Calle Mayor 1".to_owned(),
                city: "Madrid".to_owned(),
                country_code: CountryCode::ES,
                postal_code: "28013".to_owned(),
            },
            shipping_cost: Decimal::new(499, 2),
            products: vec![OrderLine {
                product_id: ProductId::random(),
                price: Decimal::new(1299, 2),
                units: 2,
            }],
        }
    }

    #[test]
    fn test_owner_comes_from_caller() {
        let user_id = UserId::random();
        let order = draft()
            .into_order(OrderId::random(), user_id, Utc::now())
            .unwrap();
        assert_eq!(order.user_id, user_id);
    }

    #[test]
    fn test_rejects_negative_amounts() {
        let mut d = draft();
        d.shipping_cost = Decimal::new(-1, 0);
        assert!(d.into_order(OrderId::random(), UserId::random(), Utc::now()).is_err());

        let mut d = draft();
        d.products[0].units = -1;
        assert!(d.into_order(OrderId::random(), UserId::random(), Utc::now()).is_err());
    }

    #[test]
    fn test_rejects_invalid_shipping_address() {
        let mut d = draft();
        d.shipping_address.postal_code = "12".to_owned();
        assert!(d.into_order(OrderId::random(), UserId::random(), Utc::now()).is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let order = draft()
            .into_order(OrderId::random(), UserId::random(), Utc::now())
            .unwrap();
        let json = serde_json::to_value(&order).unwrap();
        assert!(json.get("shippingAddress").is_some());
        assert!(json.get("shippingCost").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json["products"][0].get("productId").is_some());
    }
}
