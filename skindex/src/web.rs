pub mod api;
mod error;
mod state;

pub use state::WebState;

use anyhow::Result;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn create_router(state: WebState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/markets", get(api::markets::list_markets))
        .route("/api/items", get(api::items::list_items))
        .route("/api/items/search", get(api::items::search_items))
        .route("/api/items/sync", post(api::items::sync_items))
        .route("/api/items/{id}", get(api::items::get_item))
        .route(
            "/api/indices",
            get(api::indices::list_indices).post(api::indices::create_index),
        )
        .route(
            "/api/indices/{id}",
            get(api::indices::get_index)
                .put(api::indices::update_index)
                .delete(api::indices::delete_index),
        )
        .route(
            "/api/prices/{id}/calculate",
            post(api::prices::calculate_index),
        )
        .route("/api/prices/{id}/history", get(api::prices::price_history))
        .route("/api/prices/{id}/latest", get(api::prices::latest_price))
        .route(
            "/api/prices/{id}/listings-history",
            get(api::prices::listings_history),
        )
        .route("/api/prebuilt", get(api::prebuilt::list_prebuilt))
        .route(
            "/api/prebuilt/generate",
            post(api::prebuilt::generate_prebuilt),
        )
        .route("/api/prebuilt/{category}", get(api::prebuilt::get_prebuilt))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_web(state: WebState) -> Result<()> {
    let app = create_router(state);
    let address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("web server listening on {address}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::market_service::MarketPriceService;
    use crate::price_service::PriceService;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use csmarket::{CsMarketClient, ItemView};
    use skindex_api_types::result::JsonError;
    use skindex_api_types::{IndexDetail, IndexList};
    use skindex_db::SkindexDb;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn test_state() -> WebState {
        let db = SkindexDb::connect_to("sqlite::memory:").await.unwrap();
        let market = MarketPriceService::new(Arc::new(CsMarketClient::new("test-key")));
        WebState {
            prices: PriceService::new(db.clone(), market.clone()),
            market,
            db,
        }
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let app = create_router(test_state().await);
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_index_is_a_json_404() {
        let app = create_router(test_state().await);
        let response = app.oneshot(get("/api/indices/999")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: JsonError = body_json(response).await;
        assert!(error.error_message.contains("999"));
    }

    #[tokio::test]
    async fn empty_search_query_is_a_400() {
        let app = create_router(test_state().await);
        let response = app
            .oneshot(get("/api/items/search?q=%20"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_list_and_delete_index() {
        let state = test_state().await;
        state
            .db
            .upsert_catalog_items(&[ItemView {
                market_hash_name: "AK-47 | Redline (Field-Tested)".to_string(),
                hash_name: "AK-47 | Redline".to_string(),
                nameid: None,
                classid: None,
                exterior: None,
                category: None,
                weapon: None,
                item_type: Some("Rifle".to_string()),
                quality: None,
                collection: None,
                min_float: None,
                max_float: None,
                cloudflare_icon_url: None,
                akamai_icon_url: None,
            }])
            .await
            .unwrap();
        let item_id = state
            .db
            .get_items_paginated(&Default::default(), 1, 10)
            .await
            .unwrap()
            .items[0]
            .id;
        let app = create_router(state);

        let body = serde_json::json!({
            "name": "My rifles",
            "selected_markets": ["STEAMCOMMUNITY"],
            "item_ids": [item_id],
        });
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/indices")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let detail: IndexDetail = body_json(response).await;
        assert_eq!(detail.summary.item_count, 1);
        assert_eq!(detail.items[0].market_hash_name, "AK-47 | Redline (Field-Tested)");

        let response = app.clone().oneshot(get("/api/indices")).await.unwrap();
        let list: IndexList = body_json(response).await;
        assert_eq!(list.total, 1);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/indices/{}", detail.summary.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(get("/api/indices")).await.unwrap();
        let list: IndexList = body_json(response).await;
        assert_eq!(list.total, 0);
    }

    #[tokio::test]
    async fn markets_endpoint_lists_every_marketplace() {
        let app = create_router(test_state().await);
        let response = app.oneshot(get("/api/markets")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let options: serde_json::Value = body_json(response).await;
        assert_eq!(options["markets"].as_array().unwrap().len(), 12);
        assert_eq!(options["currencies"].as_array().unwrap().len(), 5);
    }
}
