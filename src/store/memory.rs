use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;

use super::{ProductQuery, ProductSort, ProductStore};
use crate::error::AppError;
use crate::models::product::{Category, NewProduct, Product};

#[derive(Default)]
struct Inner {
    next_product_id: i64,
    next_category_id: i64,
    products: BTreeMap<i64, Product>,
    categories: BTreeMap<i64, Category>,
}

/// Process-local store with the same semantics as the Postgres one.
#[derive(Default)]
pub struct MemoryProductStore {
    inner: RwLock<Inner>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Categories are managed elsewhere in production; this seeds them for
    /// the expanded "list all" view.
    pub async fn insert_category(&self, name: &str) -> Category {
        let mut inner = self.inner.write().await;
        inner.next_category_id += 1;
        let category = Category { id: inner.next_category_id, name: name.to_string() };
        inner.categories.insert(category.id, category.clone());
        category
    }
}

fn sort_products(products: &mut [Product], sort: ProductSort) {
    match sort {
        ProductSort::Id => products.sort_by_key(|p| p.id),
        ProductSort::NewestFirst => products.sort_by(|a, b| {
            b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
        }),
        ProductSort::TopRated => products.sort_by(|a, b| {
            b.rating.total_cmp(&a.rating).then_with(|| a.id.cmp(&b.id))
        }),
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn insert(&self, product: NewProduct) -> Result<Product, AppError> {
        let mut inner = self.inner.write().await;
        inner.next_product_id += 1;
        let now = Utc::now();
        let product = Product {
            id: inner.next_product_id,
            name: product.name,
            description: product.description,
            brand: product.brand,
            category_id: product.category_id,
            price: product.price,
            quantity: product.quantity,
            rating: 0.0,
            num_reviews: 0,
            reviews: Json(Vec::new()),
            version: 0,
            created_at: now,
            updated_at: now,
        };
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn replace(&self, id: i64, fields: NewProduct) -> Result<Option<Product>, AppError> {
        let mut inner = self.inner.write().await;
        let Some(product) = inner.products.get_mut(&id) else {
            return Ok(None);
        };
        product.name = fields.name;
        product.description = fields.description;
        product.brand = fields.brand;
        product.category_id = fields.category_id;
        product.price = fields.price;
        product.quantity = fields.quantity;
        product.version += 1;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<Product>, AppError> {
        Ok(self.inner.write().await.products.remove(&id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError> {
        Ok(self.inner.read().await.products.get(&id).cloned())
    }

    async fn find(&self, query: &ProductQuery) -> Result<Vec<Product>, AppError> {
        let inner = self.inner.read().await;
        let mut products: Vec<Product> = inner
            .products
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        sort_products(&mut products, query.sort);

        let offset = usize::try_from(query.offset).unwrap_or(0);
        let limit = query
            .limit
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(usize::MAX);
        Ok(products.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, query: &ProductQuery) -> Result<i64, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.products.values().filter(|p| query.matches(p)).count() as i64)
    }

    async fn find_all_with_category(&self) -> Result<Vec<(Product, Option<Category>)>, AppError> {
        let inner = self.inner.read().await;
        let mut products: Vec<Product> = inner.products.values().cloned().collect();
        sort_products(&mut products, ProductSort::NewestFirst);
        Ok(products
            .into_iter()
            .map(|p| {
                let category = inner.categories.get(&p.category_id).cloned();
                (p, category)
            })
            .collect())
    }

    async fn save_reviews(&self, product: &Product) -> Result<Option<Product>, AppError> {
        let mut inner = self.inner.write().await;
        let Some(stored) = inner.products.get_mut(&product.id) else {
            return Ok(None);
        };
        if stored.version != product.version {
            return Ok(None);
        }
        stored.reviews = product.reviews.clone();
        stored.num_reviews = product.num_reviews;
        stored.rating = product.rating;
        stored.version += 1;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PriceRange;

    fn fields(name: &str, category_id: i64, price: f64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: "desc".to_string(),
            brand: "brand".to_string(),
            category_id,
            price,
            quantity: 1,
        }
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_zeroed_aggregates() {
        let store = MemoryProductStore::new();
        let a = store.insert(fields("a", 1, 1.0)).await.unwrap();
        let b = store.insert(fields("b", 1, 1.0)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(a.rating, 0.0);
        assert_eq!(a.num_reviews, 0);
        assert!(a.reviews.is_empty());
    }

    #[tokio::test]
    async fn find_applies_filters_sort_and_window() {
        let store = MemoryProductStore::new();
        store.insert(fields("Red Mug", 1, 5.0)).await.unwrap();
        store.insert(fields("Blue mug", 2, 15.0)).await.unwrap();
        store.insert(fields("Plate", 1, 25.0)).await.unwrap();

        let query = ProductQuery { keyword: Some("MUG".into()), ..Default::default() };
        assert_eq!(store.count(&query).await.unwrap(), 2);

        let query = ProductQuery {
            categories: vec![1],
            price_range: Some(PriceRange { min: 0.0, max: 10.0 }),
            ..Default::default()
        };
        let found = store.find(&query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Red Mug");

        let newest = store
            .find(&ProductQuery::default().sorted(ProductSort::NewestFirst).limited(2))
            .await
            .unwrap();
        let names: Vec<_> = newest.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Plate", "Blue mug"]);
    }

    #[tokio::test]
    async fn stale_review_save_is_rejected() {
        let store = MemoryProductStore::new();
        let product = store.insert(fields("a", 1, 1.0)).await.unwrap();

        let mut first = product.clone();
        first.num_reviews = 7;
        let saved = store.save_reviews(&first).await.unwrap().unwrap();
        assert_eq!(saved.version, product.version + 1);

        // still carries the version that was read before the first save
        let stale = product.clone();
        assert!(store.save_reviews(&stale).await.unwrap().is_none());
        assert_eq!(store.find_by_id(product.id).await.unwrap().unwrap().num_reviews, 7);
    }

    #[tokio::test]
    async fn replace_and_delete_report_missing_ids() {
        let store = MemoryProductStore::new();
        assert!(store.replace(42, fields("x", 1, 1.0)).await.unwrap().is_none());
        assert!(store.delete(42).await.unwrap().is_none());

        let product = store.insert(fields("x", 1, 1.0)).await.unwrap();
        let replaced = store.replace(product.id, fields("y", 2, 3.0)).await.unwrap().unwrap();
        assert_eq!(replaced.name, "y");
        assert_eq!(replaced.version, 1);
        assert_eq!(store.delete(product.id).await.unwrap().unwrap().name, "y");
    }

    #[tokio::test]
    async fn list_all_expands_known_categories() {
        let store = MemoryProductStore::new();
        let shoes = store.insert_category("Shoes").await;
        store.insert(fields("Runner", shoes.id, 1.0)).await.unwrap();
        store.insert(fields("Orphan", 99, 1.0)).await.unwrap();

        let all = store.find_all_with_category().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].0.name, "Orphan");
        assert!(all[0].1.is_none());
        assert_eq!(all[1].1.as_ref().map(|c| c.name.as_str()), Some("Shoes"));
    }
}
