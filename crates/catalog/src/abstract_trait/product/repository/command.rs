use crate::{domain::requests::product::ProductDraft, model::product::Product as ProductModel};
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductCommandRepositoryTrait {
    async fn create_product(&self, draft: &ProductDraft) -> Result<ProductModel, RepositoryError>;
    /// Replaces every writable field; `NotFound` when `id` has no row.
    async fn update_product(
        &self,
        id: i32,
        draft: &ProductDraft,
    ) -> Result<ProductModel, RepositoryError>;
    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError>;
}
