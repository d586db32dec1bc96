// src/dtos/product.rs
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::dtos::numeric::NumericInput;
use crate::error::AppError;
use crate::models::product::{Category, NewProduct, Product, Review};

/// Body of POST /products and PUT /products/{id}, as JSON or form fields.
/// Every field is required; they are optional here so the first missing one
/// can be reported by name.
#[derive(Debug, Default, Deserialize)]
pub struct ProductFieldsRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<NumericInput>,
    pub price: Option<NumericInput>,
    pub quantity: Option<NumericInput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequiredField {
    Name,
    Description,
    Brand,
    Category,
    Price,
    Quantity,
}

impl RequiredField {
    fn as_str(self) -> &'static str {
        match self {
            RequiredField::Name => "name",
            RequiredField::Description => "description",
            RequiredField::Brand => "brand",
            RequiredField::Category => "category",
            RequiredField::Price => "price",
            RequiredField::Quantity => "quantity",
        }
    }
}

const CREATE_CHECK_ORDER: [RequiredField; 6] = [
    RequiredField::Name,
    RequiredField::Brand,
    RequiredField::Description,
    RequiredField::Price,
    RequiredField::Category,
    RequiredField::Quantity,
];

const UPDATE_CHECK_ORDER: [RequiredField; 6] = [
    RequiredField::Name,
    RequiredField::Description,
    RequiredField::Price,
    RequiredField::Category,
    RequiredField::Quantity,
    RequiredField::Brand,
];

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

fn is_blank_number(value: &Option<NumericInput>) -> bool {
    value.as_ref().map_or(true, NumericInput::is_blank)
}

fn parse_number<T>(
    value: &Option<NumericInput>,
    field: RequiredField,
    parse: impl Fn(&NumericInput) -> Option<T>,
) -> Result<T, AppError> {
    value
        .as_ref()
        .and_then(parse)
        .ok_or_else(|| AppError::validation(format!("{} must be a number", field.as_str())))
}

impl ProductFieldsRequest {
    pub fn validate_for_create(&self) -> Result<NewProduct, AppError> {
        self.validate(&CREATE_CHECK_ORDER)
    }

    pub fn validate_for_update(&self) -> Result<NewProduct, AppError> {
        self.validate(&UPDATE_CHECK_ORDER)
    }

    fn is_missing(&self, field: RequiredField) -> bool {
        match field {
            RequiredField::Name => is_blank(&self.name),
            RequiredField::Description => is_blank(&self.description),
            RequiredField::Brand => is_blank(&self.brand),
            RequiredField::Category => is_blank_number(&self.category),
            RequiredField::Price => is_blank_number(&self.price),
            RequiredField::Quantity => is_blank_number(&self.quantity),
        }
    }

    fn validate(&self, order: &[RequiredField]) -> Result<NewProduct, AppError> {
        if let Some(field) = order.iter().copied().find(|f| self.is_missing(*f)) {
            return Err(AppError::validation(format!("{} is required", field.as_str())));
        }

        let (Some(name), Some(description), Some(brand)) = (
            self.name.as_deref(),
            self.description.as_deref(),
            self.brand.as_deref(),
        ) else {
            return Err(AppError::validation("product fields are incomplete"));
        };

        let category_id = parse_number(&self.category, RequiredField::Category, NumericInput::as_i64)?;
        let price = parse_number(&self.price, RequiredField::Price, NumericInput::as_f64)?;
        let quantity = parse_number(&self.quantity, RequiredField::Quantity, NumericInput::as_i32)?;

        if !price.is_finite() || price < 0.0 {
            return Err(AppError::validation("price cannot be negative"));
        }
        if quantity < 0 {
            return Err(AppError::validation("quantity cannot be negative"));
        }

        Ok(NewProduct {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            brand: brand.trim().to_string(),
            category_id,
            price,
            quantity,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub keyword: Option<String>,
    pub page: Option<i64>,
}

/// Body of POST /products/filter: `checked` holds category ids, `radio` is `[min, max]`.
#[derive(Debug, Default, Deserialize)]
pub struct FilterProductsRequest {
    #[serde(default)]
    pub checked: Vec<i64>,
    #[serde(default)]
    pub radio: Vec<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub user: i64,
    pub name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user: review.user,
            name: review.name,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

/// `C` is the category representation: the bare id, or the expanded category
/// for the "list all" view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView<C> {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub category: C,
    pub price: f64,
    pub quantity: i32,
    pub rating: f64,
    pub num_reviews: i32,
    pub reviews: Vec<ReviewResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type ProductResponse = ProductView<i64>;
pub type ExpandedProductResponse = ProductView<Option<CategoryResponse>>;

// Convert from Model to Response DTO
impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let category = product.category_id;
        ProductResponse::with_category(product, category)
    }
}

impl<C> ProductView<C> {
    fn with_category(product: Product, category: C) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            brand: product.brand,
            category,
            price: product.price,
            quantity: product.quantity,
            rating: product.rating,
            num_reviews: product.num_reviews,
            reviews: product.reviews.0.into_iter().map(ReviewResponse::from).collect(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl ExpandedProductResponse {
    pub fn expanded(product: Product, category: Option<Category>) -> Self {
        let category = category.map(|c| CategoryResponse { id: c.id, name: c.name });
        ProductView::with_category(product, category)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedProductsResponse {
    pub products: Vec<ProductResponse>,
    pub page: i64,
    pub pages: i64,
    pub has_more: bool,
}
