#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use catalog::{
    abstract_trait::product::repository::{
        ProductCommandRepositoryTrait, ProductQueryRepositoryTrait,
    },
    di::DependenciesInjectDeps,
    domain::requests::product::{ProductDraft, ProductFilter},
    handler::AppRouter,
    model::product::Product,
    state::AppState,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use shared::errors::RepositoryError;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

/// Product table kept in memory, ordered and filtered like the SQL one.
#[derive(Default)]
pub struct InMemoryProducts {
    rows: Mutex<Vec<Product>>,
}

impl InMemoryProducts {
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    fn matches(product: &Product, filter: &ProductFilter) -> bool {
        match filter.search.as_deref() {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                product.name.to_lowercase().contains(&term)
                    || product
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            }
        }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for InMemoryProducts {
    async fn find_all(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let rows = self.rows.lock().await;
        let mut matching: Vec<Product> = rows
            .iter()
            .filter(|p| Self::matches(p, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(matching
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.page_size as usize)
            .collect())
    }

    async fn count(&self, filter: &ProductFilter) -> Result<i64, RepositoryError> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().filter(|p| Self::matches(p, filter)).count() as i64)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, RepositoryError> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|p| p.id == id).cloned())
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for InMemoryProducts {
    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let mut rows = self.rows.lock().await;
        let id = rows.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        // strictly increasing so insertion order is the recency order
        let created_at = Utc::now() + Duration::milliseconds(id as i64);

        let product = Product {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            image: draft.image.clone(),
            category: draft.category.clone(),
            stock: draft.stock,
            created_at,
            updated_at: created_at,
        };
        rows.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i32,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        let mut rows = self.rows.lock().await;
        let product = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;

        product.name = draft.name.clone();
        product.description = draft.description.clone();
        product.price = draft.price;
        product.image = draft.image.clone();
        product.category = draft.category.clone();
        product.stock = draft.stock;
        product.updated_at = Utc::now();

        Ok(product.clone())
    }

    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub products: Arc<InMemoryProducts>,
}

impl TestApp {
    pub fn new() -> Self {
        let products = Arc::new(InMemoryProducts::default());
        let deps = DependenciesInjectDeps {
            query_repository: products.clone(),
            command_repository: products.clone(),
        };

        Self {
            router: AppRouter::build(AppState::new(deps)),
            products,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");

        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        (status, serde_json::from_str(&body).expect("json body"))
    }

    pub async fn send_json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let (status, body) = self.request(request).await;
        (status, serde_json::from_str(&body).expect("json body"))
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self
            .request(Request::delete(uri).body(Body::empty()).unwrap())
            .await;
        (status, serde_json::from_str(&body).expect("json body"))
    }

    /// Creates a product through the API and returns its id.
    pub async fn seed(&self, body: Value) -> i64 {
        let (status, json) = self.send_json("POST", "/api/products", body).await;
        assert_eq!(status, StatusCode::CREATED, "seed failed: {json}");
        json["data"]["id"].as_i64().expect("created id")
    }
}
