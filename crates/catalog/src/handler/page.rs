use crate::{
    abstract_trait::product::service::DynProductQueryService,
    domain::{
        requests::product::{DEFAULT_CATEGORY, FindAllProducts},
        response::product::ProductResponse,
    },
    state::AppState,
};
use askama::Template;
use axum::{
    Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use shared::errors::ServiceError;
use std::sync::Arc;
use tracing::error;

const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x800?text=No+Image";

/// A product as the storefront shows it.
pub struct ProductCard {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price_label: String,
    pub image_url: String,
    pub stock: i32,
    pub in_stock: bool,
}

impl From<ProductResponse> for ProductCard {
    fn from(product: ProductResponse) -> Self {
        Self {
            id: product.id,
            price_label: format!("${:.2}", product.price),
            image_url: product
                .image
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            description: product.description.unwrap_or_default(),
            in_stock: product.stock > 0,
            stock: product.stock,
            name: product.name,
            category: product.category,
        }
    }
}

#[derive(Template)]
#[template(path = "catalog.html")]
struct CatalogTemplate {
    search: String,
    heading: String,
    products: Vec<ProductCard>,
    page: i64,
    total_items: i64,
    total_pages: i64,
    has_prev: bool,
    has_next: bool,
    prev_page: i64,
    next_page: i64,
}

#[derive(Template)]
#[template(path = "detail.html")]
struct DetailTemplate {
    search: String,
    product: ProductCard,
}

#[derive(Template)]
#[template(path = "form.html")]
struct FormTemplate {
    search: String,
    heading: String,
    submit_label: String,
    method: &'static str,
    action: String,
    redirect_to: String,
    placeholder_image: &'static str,
    name: String,
    description: String,
    price: String,
    image: String,
    category: String,
    stock: String,
}

impl FormTemplate {
    fn create() -> Self {
        Self {
            search: String::new(),
            heading: "Add New Product".into(),
            submit_label: "Create Product".into(),
            method: "POST",
            action: "/api/products".into(),
            redirect_to: "/".into(),
            placeholder_image: PLACEHOLDER_IMAGE,
            name: String::new(),
            description: String::new(),
            price: String::new(),
            image: String::new(),
            category: DEFAULT_CATEGORY.into(),
            stock: String::new(),
        }
    }

    fn edit(product: ProductResponse) -> Self {
        Self {
            search: String::new(),
            heading: "Edit Product".into(),
            submit_label: "Save Changes".into(),
            method: "PUT",
            action: format!("/api/products/{}", product.id),
            redirect_to: format!("/products/{}", product.id),
            placeholder_image: PLACEHOLDER_IMAGE,
            name: product.name,
            description: product.description.unwrap_or_default(),
            price: product.price.to_string(),
            image: product.image.unwrap_or_default(),
            category: product.category,
            stock: product.stock.to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    search: String,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    search: String,
    message: String,
}

#[derive(Debug)]
pub enum PageError {
    NotFound,
    Internal(String),
}

impl From<ServiceError> for PageError {
    fn from(err: ServiceError) -> Self {
        if err.is_not_found() {
            PageError::NotFound
        } else {
            error!("Page failed to load: {err}");
            PageError::Internal("Failed to load products".into())
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, rendered) = match self {
            PageError::NotFound => (
                StatusCode::NOT_FOUND,
                NotFoundTemplate {
                    search: String::new(),
                }
                .render(),
            ),
            PageError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorTemplate {
                    search: String::new(),
                    message,
                }
                .render(),
            ),
        };

        match rendered {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                error!("Failed to render error page: {e}");
                (status, status.canonical_reason().unwrap_or("Error")).into_response()
            }
        }
    }
}

fn render<T: Template>(template: &T) -> Result<Html<String>, PageError> {
    template.render().map(Html).map_err(|e| {
        error!("Failed to render template: {e}");
        PageError::Internal("Failed to render page".into())
    })
}

/// Path ids that are not integers name no product.
fn parse_id(raw: &str) -> Result<i32, PageError> {
    raw.parse::<i32>().map_err(|_| PageError::NotFound)
}

pub async fn catalog_page(
    Extension(service): Extension<DynProductQueryService>,
    Query(params): Query<FindAllProducts>,
) -> Result<Html<String>, PageError> {
    let response = service.find_all(&params).await?;
    let pagination = response.pagination;

    let heading = match params.search_term() {
        Some(term) => format!("Search results for \"{term}\""),
        None => "New Arrivals".to_string(),
    };

    render(&CatalogTemplate {
        search: params.search.clone().unwrap_or_default(),
        heading,
        products: response.data.into_iter().map(ProductCard::from).collect(),
        has_prev: pagination.has_previous(),
        has_next: pagination.has_next(),
        prev_page: pagination.page.saturating_sub(1).max(1),
        next_page: pagination.page.saturating_add(1),
        page: pagination.page,
        total_items: pagination.total_items,
        total_pages: pagination.total_pages,
    })
}

pub async fn product_page(
    Extension(service): Extension<DynProductQueryService>,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    let response = service.find_by_id(parse_id(&id)?).await?;

    render(&DetailTemplate {
        search: String::new(),
        product: ProductCard::from(response.data),
    })
}

pub async fn create_page() -> Result<Html<String>, PageError> {
    render(&FormTemplate::create())
}

pub async fn edit_page(
    Extension(service): Extension<DynProductQueryService>,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    let response = service.find_by_id(parse_id(&id)?).await?;

    render(&FormTemplate::edit(response.data))
}

pub async fn not_found_page() -> PageError {
    PageError::NotFound
}

pub fn page_routes(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(catalog_page))
        .route("/products/create", get(create_page))
        .route("/products/{id}", get(product_page))
        .route("/products/{id}/edit", get(edit_page))
        .layer(Extension(app_state.di_container.product_query.clone()))
}
