mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_create_applies_defaults() {
    let app = TestApp::new();

    let (status, body) = app
        .send_json(
            "POST",
            "/api/products",
            json!({ "name": "Linen Shirt", "price": "19.99" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["name"], "Linen Shirt");
    assert_eq!(body["data"]["price"], 19.99);
    assert_eq!(body["data"]["category"], "General");
    assert_eq!(body["data"]["stock"], 0);
    assert!(body["data"]["image"].is_null());
    assert!(body["data"]["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_without_name_is_rejected_and_stores_nothing() {
    let app = TestApp::new();

    let (status, body) = app
        .send_json("POST", "/api/products", json!({ "price": 10 }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("Name is required"));
    assert_eq!(app.products.len().await, 0);
}

#[tokio::test]
async fn test_create_with_empty_name_is_rejected() {
    let app = TestApp::new();

    let (status, _) = app
        .send_json("POST", "/api/products", json!({ "name": "", "price": 10 }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.products.len().await, 0);
}

#[tokio::test]
async fn test_create_without_price_is_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .send_json("POST", "/api/products", json!({ "name": "Cap", "price": "" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Price is required"));
}

#[tokio::test]
async fn test_non_numeric_price_is_rejected() {
    let app = TestApp::new();

    for price in ["abc", "NaN", "-5"] {
        let (status, _) = app
            .send_json("POST", "/api/products", json!({ "name": "Cap", "price": price }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "price {price:?}");
    }

    assert_eq!(app.products.len().await, 0);
}

#[tokio::test]
async fn test_numeric_zero_price_is_rejected_as_missing() {
    let app = TestApp::new();

    let (status, body) = app
        .send_json("POST", "/api/products", json!({ "name": "Freebie", "price": 0 }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Price is required"));
    assert_eq!(app.products.len().await, 0);
}

#[tokio::test]
async fn test_text_zero_price_is_accepted() {
    let app = TestApp::new();

    let (status, body) = app
        .send_json("POST", "/api/products", json!({ "name": "Freebie", "price": "0" }))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["price"], 0.0);
    assert_eq!(app.products.len().await, 1);
}

#[tokio::test]
async fn test_get_unknown_product_is_404() {
    let app = TestApp::new();

    let (status, body) = app.get_json("/api/products/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_get_returns_created_product() {
    let app = TestApp::new();
    let id = app
        .seed(json!({ "name": "Wool Scarf", "price": 25, "stock": "4", "category": "Accessories" }))
        .await;

    let (status, body) = app.get_json(&format!("/api/products/{id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["stock"], 4);
    assert_eq!(body["data"]["category"], "Accessories");
}

#[tokio::test]
async fn test_delete_unknown_product_leaves_table_unchanged() {
    let app = TestApp::new();
    app.seed(json!({ "name": "Cap", "price": 5 })).await;

    let (status, body) = app.delete("/api/products/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Product not found");
    assert_eq!(app.products.len().await, 1);
}

#[tokio::test]
async fn test_delete_removes_product() {
    let app = TestApp::new();
    let id = app.seed(json!({ "name": "Cap", "price": 5 })).await;

    let (status, body) = app.delete(&format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");

    let (status, _) = app.get_json(&format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.products.len().await, 0);
}

#[tokio::test]
async fn test_search_matches_name_and_description_case_insensitively() {
    let app = TestApp::new();
    app.seed(json!({ "name": "Blue SHIRT", "price": 20 })).await;
    app.seed(json!({ "name": "Oxford", "description": "A classic shirt", "price": 30 }))
        .await;
    app.seed(json!({ "name": "Denim Jeans", "price": 40 })).await;

    let (status, body) = app.get_json("/api/products?search=shirt").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Oxford", "Blue SHIRT"]);
    assert_eq!(body["pagination"]["totalItems"], 2);
}

#[tokio::test]
async fn test_search_without_matches_is_empty() {
    let app = TestApp::new();
    app.seed(json!({ "name": "Cap", "price": 5 })).await;

    let (status, body) = app.get_json("/api/products?search=zzz").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["totalItems"], 0);
    assert_eq!(body["pagination"]["totalPages"], 0);
}

#[tokio::test]
async fn test_listing_pages_eight_at_a_time_newest_first() {
    let app = TestApp::new();
    for i in 1..=10 {
        app.seed(json!({ "name": format!("Item {i}"), "price": i })).await;
    }

    let (_, first) = app.get_json("/api/products?page=1").await;
    let first_page = first["data"].as_array().unwrap();
    assert_eq!(first_page.len(), 8);
    assert_eq!(first_page[0]["name"], "Item 10");
    assert_eq!(first["pagination"]["page"], 1);
    assert_eq!(first["pagination"]["pageSize"], 8);
    assert_eq!(first["pagination"]["totalItems"], 10);
    assert_eq!(first["pagination"]["totalPages"], 2);

    let (_, second) = app.get_json("/api/products?page=2").await;
    let second_page = second["data"].as_array().unwrap();
    assert_eq!(second_page.len(), 2);
    assert_eq!(second_page[1]["name"], "Item 1");
}

#[tokio::test]
async fn test_invalid_page_falls_back_to_first_page() {
    let app = TestApp::new();
    app.seed(json!({ "name": "Cap", "price": 5 })).await;

    for query in ["page=abc", "page=0", "page=-3", "page=12abc"] {
        let (status, body) = app.get_json(&format!("/api/products?{query}")).await;
        assert_eq!(status, StatusCode::OK, "{query}");
        assert_eq!(body["pagination"]["page"], 1, "{query}");
        assert_eq!(body["data"].as_array().unwrap().len(), 1, "{query}");
    }
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let app = TestApp::new();
    app.seed(json!({ "name": "Cap", "price": 5 })).await;

    let (status, body) = app.get_json("/api/products?page=5").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["totalPages"], 1);
}

#[tokio::test]
async fn test_update_replaces_fields_and_reapplies_defaults() {
    let app = TestApp::new();
    let id = app
        .seed(json!({
            "name": "Cap",
            "price": 5,
            "category": "Hats",
            "stock": 12,
            "image": "https://img/cap.png"
        }))
        .await;

    let (status, body) = app
        .send_json(
            "PUT",
            &format!("/api/products/{id}"),
            json!({ "name": "Bucket Hat", "price": "7.5" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["name"], "Bucket Hat");
    assert_eq!(body["data"]["price"], 7.5);
    assert_eq!(body["data"]["category"], "General");
    assert_eq!(body["data"]["stock"], 0);
    assert!(body["data"]["image"].is_null());
}

#[tokio::test]
async fn test_update_unknown_product_is_404() {
    let app = TestApp::new();

    let (status, _) = app
        .send_json(
            "PUT",
            "/api/products/999",
            json!({ "name": "Ghost", "price": 1 }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.products.len().await, 0);
}

#[tokio::test]
async fn test_update_with_invalid_fields_is_rejected() {
    let app = TestApp::new();
    let id = app.seed(json!({ "name": "Cap", "price": 5 })).await;

    let (status, _) = app
        .send_json("PUT", &format!("/api/products/{id}"), json!({ "price": 5 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get_json(&format!("/api/products/{id}")).await;
    assert_eq!(body["data"]["name"], "Cap");
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_service_counters() {
    let app = TestApp::new();
    app.seed(json!({ "name": "Cap", "price": 5 })).await;

    let (status, body) = app.get("/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("catalog_product_command_requests"));
}

#[tokio::test]
async fn test_openapi_document_lists_product_routes() {
    let app = TestApp::new();

    let (status, body) = app.get_json("/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/products"].is_object());
    assert!(body["paths"]["/api/products/{id}"].is_object());
}

#[tokio::test]
async fn test_search_with_nul_character_is_ignored() {
    let app = TestApp::new();
    app.seed(json!({ "name": "Cap", "price": 5 })).await;

    let (status, body) = app.get_json("/api/products?search=%00").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalItems"], 1);

    let (status, body) = app.get_json("/api/products?search=c%00ap").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Cap");
}
