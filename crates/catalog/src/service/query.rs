use super::{PRODUCT_NOT_FOUND, product_error};
use crate::{
    abstract_trait::product::{
        repository::DynProductQueryRepository, service::ProductQueryServiceTrait,
    },
    domain::{
        requests::product::FindAllProducts,
        response::{
            api::{ApiResponse, ApiResponsePagination},
            pagination::Pagination,
            product::ProductResponse,
        },
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, ServiceTracer},
};
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductQueryService {
    pub query: DynProductQueryRepository,
    tracer: ServiceTracer,
}

impl ProductQueryService {
    pub fn new(query: DynProductQueryRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register("catalog_product_query", registry);

        Self {
            query,
            tracer: ServiceTracer::new("product-query-service", metrics),
        }
    }
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError> {
        let filter = req.to_filter();

        info!(
            "🔍 Finding products | Page: {}, Size: {}, Search: {:?}",
            filter.page, filter.page_size, filter.search
        );

        let tracing_ctx = self.tracer.start(
            "product_find_all",
            Method::Get,
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "find_all"),
                KeyValue::new("page", filter.page.to_string()),
                KeyValue::new("page_size", filter.page_size.to_string()),
                KeyValue::new("search", filter.search.clone().unwrap_or_default()),
            ],
        );

        let (products, total) =
            match tokio::try_join!(self.query.find_all(&filter), self.query.count(&filter)) {
                Ok(res) => res,
                Err(e) => {
                    let msg = format!("Failed to fetch products: {e:?}");
                    error!("❌ {msg}");
                    self.tracer.error(tracing_ctx, &msg);
                    return Err(product_error(e));
                }
            };

        let data: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
        let pagination = Pagination::new(filter.page, filter.page_size, total);

        info!("✅ Found {} products (total: {total})", data.len());
        self.tracer
            .success(tracing_ctx, "Products retrieved from DB");

        Ok(ApiResponsePagination {
            status: "success".to_string(),
            message: "Products retrieved successfully".to_string(),
            data,
            pagination,
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🆔 Finding product by ID: {id}");

        let tracing_ctx = self.tracer.start(
            "product_find_by_id",
            Method::Get,
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "find_by_id"),
                KeyValue::new("product.id", id.to_string()),
            ],
        );

        let product = match self.query.find_by_id(id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                error!("❌ Product not found with ID: {id}");
                self.tracer.error(tracing_ctx, "Product not found");
                return Err(ServiceError::NotFound(PRODUCT_NOT_FOUND.into()));
            }
            Err(e) => {
                let msg = format!("Database error while finding product ID {id}: {e:?}");
                error!("❌ {msg}");
                self.tracer.error(tracing_ctx, &msg);
                return Err(product_error(e));
            }
        };

        info!("✅ Product retrieved: '{}' (ID: {id})", product.name);
        self.tracer
            .success(tracing_ctx, "Product retrieved from DB");

        Ok(ApiResponse::success(
            "Product retrieved successfully",
            ProductResponse::from(product),
        ))
    }
}
