use super::{PRODUCT_NOT_FOUND, product_error};
use crate::{
    abstract_trait::product::{
        repository::{DynProductCommandRepository, DynProductQueryRepository},
        service::ProductCommandServiceTrait,
    },
    domain::{
        requests::product::{CreateProductRequest, ProductDraft, UpdateProductRequest},
        response::{api::ApiResponse, product::ProductResponse},
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, ServiceTracer, TracingContext},
};
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductCommandService {
    pub query: DynProductQueryRepository,
    pub command: DynProductCommandRepository,
    tracer: ServiceTracer,
}

impl ProductCommandService {
    pub fn new(
        query: DynProductQueryRepository,
        command: DynProductCommandRepository,
        registry: &mut Registry,
    ) -> Self {
        let metrics = Metrics::new();
        metrics.register("catalog_product_command", registry);

        Self {
            query,
            command,
            tracer: ServiceTracer::new("product-command-service", metrics),
        }
    }

    fn fail(&self, tracing_ctx: TracingContext, err: ServiceError) -> ServiceError {
        let msg = err.to_string();
        error!("❌ {msg}");
        self.tracer.error(tracing_ctx, &msg);
        err
    }

    /// Errors with `NotFound` unless a row with `id` exists.
    async fn ensure_exists(&self, id: i32) -> Result<(), ServiceError> {
        match self.query.find_by_id(id).await.map_err(product_error)? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound(PRODUCT_NOT_FOUND.into())),
        }
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🆕 Creating product: {:?}", req.name);

        let tracing_ctx = self.tracer.start(
            "product_create",
            Method::Post,
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "create"),
                KeyValue::new("product.name", req.name.clone().unwrap_or_default()),
            ],
        );

        let draft = match ProductDraft::try_from(req) {
            Ok(draft) => draft,
            Err(e) => return Err(self.fail(tracing_ctx, e)),
        };

        let product = match self.command.create_product(&draft).await {
            Ok(product) => product,
            Err(e) => return Err(self.fail(tracing_ctx, product_error(e))),
        };

        info!("✅ Product created: '{}' (ID: {})", product.name, product.id);
        self.tracer.success(tracing_ctx, "Product created");

        Ok(ApiResponse::success(
            "Product created successfully",
            ProductResponse::from(product),
        ))
    }

    async fn update_product(
        &self,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "product_update",
            Method::Put,
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "update"),
                KeyValue::new("product.id", req.id.unwrap_or_default().to_string()),
            ],
        );

        let Some(id) = req.id else {
            let err = ServiceError::Validation(vec!["id: Product ID is required".into()]);
            return Err(self.fail(tracing_ctx, err));
        };

        info!("✏️ Updating product ID: {id}");

        let draft = match ProductDraft::try_from(req) {
            Ok(draft) => draft,
            Err(e) => return Err(self.fail(tracing_ctx, e)),
        };

        if let Err(e) = self.ensure_exists(id).await {
            return Err(self.fail(tracing_ctx, e));
        }

        let product = match self.command.update_product(id, &draft).await {
            Ok(product) => product,
            Err(e) => return Err(self.fail(tracing_ctx, product_error(e))),
        };

        info!("✅ Product updated: '{}' (ID: {id})", product.name);
        self.tracer.success(tracing_ctx, "Product updated");

        Ok(ApiResponse::success(
            "Product updated successfully",
            ProductResponse::from(product),
        ))
    }

    async fn delete_product(&self, id: i32) -> Result<ApiResponse<()>, ServiceError> {
        info!("🗑️ Deleting product ID: {id}");

        let tracing_ctx = self.tracer.start(
            "product_delete",
            Method::Delete,
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "delete"),
                KeyValue::new("product.id", id.to_string()),
            ],
        );

        if let Err(e) = self.ensure_exists(id).await {
            return Err(self.fail(tracing_ctx, e));
        }

        if let Err(e) = self.command.delete_product(id).await {
            return Err(self.fail(tracing_ctx, product_error(e)));
        }

        info!("✅ Product deleted (ID: {id})");
        self.tracer.success(tracing_ctx, "Product deleted");

        Ok(ApiResponse::success("Product deleted successfully", ()))
    }
}
