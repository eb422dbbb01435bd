use crate::{
    abstract_trait::product::repository::ProductQueryRepositoryTrait,
    domain::requests::product::ProductFilter, model::product::Product as ProductModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

/// `%term%` with LIKE metacharacters escaped so they match literally.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_all(&self, filter: &ProductFilter) -> Result<Vec<ProductModel>, RepositoryError> {
        info!(
            "🔍 Fetching products | page: {}, search: {:?}",
            filter.page, filter.search
        );

        let pattern = filter.search.as_deref().map(like_pattern);

        let products = sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT
                id,
                name,
                description,
                price,
                image,
                category,
                stock,
                created_at,
                updated_at
            FROM products
            WHERE ($1::TEXT IS NULL
                OR name ILIKE $1 ESCAPE '\'
                OR description ILIKE $1 ESCAPE '\')
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(filter.page_size)
        .bind(filter.offset())
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch products: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(products)
    }

    async fn count(&self, filter: &ProductFilter) -> Result<i64, RepositoryError> {
        let pattern = filter.search.as_deref().map(like_pattern);

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM products
            WHERE ($1::TEXT IS NULL
                OR name ILIKE $1 ESCAPE '\'
                OR description ILIKE $1 ESCAPE '\')
            "#,
        )
        .bind(pattern)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to count products: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(total)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError> {
        info!("🆔 Fetching product by ID: {}", id);

        let product = sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT
                id,
                name,
                description,
                price,
                image,
                category,
                stock,
                created_at,
                updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch product {id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn test_like_pattern_wraps_term() {
        assert_eq!(like_pattern("shirt"), "%shirt%");
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
