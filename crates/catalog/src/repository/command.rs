use crate::{
    abstract_trait::product::repository::ProductCommandRepositoryTrait,
    domain::requests::product::ProductDraft, model::product::Product as ProductModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(&self, draft: &ProductDraft) -> Result<ProductModel, RepositoryError> {
        info!("🆕 Inserting product: {}", draft.name);

        let product = sqlx::query_as::<_, ProductModel>(
            r#"
            INSERT INTO products (name, description, price, image, category, stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
                id, name, description, price, image, category, stock, created_at, updated_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.image)
        .bind(&draft.category)
        .bind(draft.stock)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to insert product '{}': {:?}", draft.name, e);
            RepositoryError::from(e)
        })?;

        info!("✅ Product inserted with ID {}", product.id);
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i32,
        draft: &ProductDraft,
    ) -> Result<ProductModel, RepositoryError> {
        info!("✏️ Updating product ID {}", id);

        let product = sqlx::query_as::<_, ProductModel>(
            r#"
            UPDATE products
            SET
                name = $2,
                description = $3,
                price = $4,
                image = $5,
                category = $6,
                stock = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, name, description, price, image, category, stock, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.image)
        .bind(&draft.category)
        .bind(draft.stock)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to update product ID {id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        product.ok_or(RepositoryError::NotFound)
    }

    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError> {
        info!("🗑️ Deleting product ID {}", id);

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete product ID {id}: {:?}", e);
                RepositoryError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
