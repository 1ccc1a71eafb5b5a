//! Records owned by the stores, plus their insert and patch shapes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CategoryId, ProductId, ReviewId};

/// A product category. Names are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Partial category update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(description) = self.description {
            category.description = Some(description);
        }
    }
}

/// A product. `category_id` is a weak reference into the category service:
/// it was checked when written and is never re-checked afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category_id: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: String,
}

/// Partial product update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category_id.is_none()
    }

    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
    }
}

/// A product review. `product_id` is a weak reference into the product service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub rating: i32,
    pub comment: Option<String>,
    pub reviewer_name: Option<String>,
    pub reviewer_email: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a review.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub product_id: ProductId,
    pub rating: i32,
    pub comment: Option<String>,
    pub reviewer_name: Option<String>,
    pub reviewer_email: Option<String>,
    pub metadata: serde_json::Value,
}

/// Partial review update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl ReviewPatch {
    pub fn is_empty(&self) -> bool {
        self.product_id.is_none()
            && self.rating.is_none()
            && self.comment.is_none()
            && self.reviewer_name.is_none()
            && self.reviewer_email.is_none()
            && self.metadata.is_none()
    }

    pub fn apply(self, review: &mut Review) {
        if let Some(product_id) = self.product_id {
            review.product_id = product_id;
        }
        if let Some(rating) = self.rating {
            review.rating = rating;
        }
        if let Some(comment) = self.comment {
            review.comment = Some(comment);
        }
        if let Some(reviewer_name) = self.reviewer_name {
            review.reviewer_name = Some(reviewer_name);
        }
        if let Some(reviewer_email) = self.reviewer_email {
            review.reviewer_email = Some(reviewer_email);
        }
        if let Some(metadata) = self.metadata {
            review.metadata = metadata;
        }
    }
}
