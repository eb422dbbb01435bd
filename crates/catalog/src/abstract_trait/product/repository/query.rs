use crate::{domain::requests::product::ProductFilter, model::product::Product as ProductModel};
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryRepositoryTrait {
    /// One page of matches, newest first.
    async fn find_all(&self, filter: &ProductFilter) -> Result<Vec<ProductModel>, RepositoryError>;
    /// Number of matches across all pages.
    async fn count(&self, filter: &ProductFilter) -> Result<i64, RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError>;
}
