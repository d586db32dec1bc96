use crate::error::AppError;
use crate::models::product::Product;
use crate::store::{PriceRange, ProductQuery, ProductSort};

pub const PAGE_SIZE: i64 = 8;
pub const TOP_PRODUCTS_LIMIT: i64 = 4;
pub const NEW_PRODUCTS_LIMIT: i64 = 4;
pub const FEATURED_PRODUCTS_LIMIT: i64 = 8;
pub const RECOMMENDED_PRODUCTS_LIMIT: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub pages: i64,
    pub has_more: bool,
}

impl Page {
    /// Page numbers start at 1; anything lower is clamped.
    pub fn new(requested: Option<i64>, total: i64) -> Self {
        let page = requested.unwrap_or(1).max(1);
        let pages = (total.max(0) + PAGE_SIZE - 1) / PAGE_SIZE;
        Self { page, pages, has_more: page < pages }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(PAGE_SIZE)
    }
}

/// Query for the paginated name search. A blank keyword matches everything.
pub fn search_query(keyword: Option<&str>) -> ProductQuery {
    ProductQuery {
        keyword: keyword
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string),
        ..Default::default()
    }
}

/// Builds the category/price filter. Empty inputs impose no constraint;
/// a non-empty `radio` must be exactly `[min, max]`.
pub fn filter_query(checked: &[i64], radio: &[f64]) -> Result<ProductQuery, AppError> {
    let price_range = match radio {
        [] => None,
        [min, max] if min.is_finite() && max.is_finite() && min <= max => {
            Some(PriceRange { min: *min, max: *max })
        }
        [_, _] => return Err(AppError::validation("price range minimum must not exceed maximum")),
        _ => return Err(AppError::validation("radio must contain a minimum and a maximum price")),
    };

    Ok(ProductQuery {
        categories: checked.to_vec(),
        price_range,
        ..Default::default()
    })
}

/// Other products in the same category as `source`.
pub fn recommended_query(source: &Product) -> ProductQuery {
    ProductQuery {
        categories: vec![source.category_id],
        exclude_id: Some(source.id),
        ..Default::default()
    }
    .limited(RECOMMENDED_PRODUCTS_LIMIT)
}

pub fn top_rated_query() -> ProductQuery {
    ProductQuery::default()
        .sorted(ProductSort::TopRated)
        .limited(TOP_PRODUCTS_LIMIT)
}

pub fn newest_query(limit: i64) -> ProductQuery {
    ProductQuery::default()
        .sorted(ProductSort::NewestFirst)
        .limited(limit)
}
