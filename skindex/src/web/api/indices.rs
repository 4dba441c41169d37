use crate::web::error::ApiError;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use skindex_api_types::{CreateIndex, IndexDetail, IndexList, IndexType, UpdateIndex};
use skindex_db::common_type_conversions::IndexSummaryReturn;
use skindex_db::entity::{item, price_index};
use skindex_db::{CreateIndexData, IndexError, SkindexDb};

/// Builds the full detail payload, including the most recent recorded value.
pub(crate) async fn index_detail(
    db: &SkindexDb,
    index: price_index::Model,
    items: Vec<item::Model>,
) -> Result<IndexDetail, ApiError> {
    let latest_value = db
        .get_latest_price_point(index.id)
        .await?
        .map(|point| point.value_cents as f64 / 100.0);
    Ok(IndexDetail {
        summary: IndexSummaryReturn(index, items.len() as u64, latest_value).into(),
        items: items.into_iter().map(Into::into).collect(),
    })
}

pub(crate) async fn index_list(
    db: &SkindexDb,
    rows: Vec<(price_index::Model, Vec<item::Model>)>,
) -> Result<IndexList, ApiError> {
    let mut indices = Vec::with_capacity(rows.len());
    for (index, items) in rows {
        let latest_value = db
            .get_latest_price_point(index.id)
            .await?
            .map(|point| point.value_cents as f64 / 100.0);
        indices.push(IndexSummaryReturn(index, items.len() as u64, latest_value).into());
    }
    Ok(IndexList {
        total: indices.len(),
        indices,
    })
}

pub async fn create_index(
    State(db): State<SkindexDb>,
    Json(create): Json<CreateIndex>,
) -> Result<(StatusCode, Json<IndexDetail>), ApiError> {
    let index = db
        .create_index(CreateIndexData {
            name: create.name,
            description: create.description,
            kind: create.kind,
            category: create.category,
            selected_markets: create.selected_markets,
            currency: create.currency,
            item_ids: create.item_ids,
        })
        .await?;
    let (index, items) = db.get_index_with_items(index.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(index_detail(&db, index, items).await?),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn list_indices(
    State(db): State<SkindexDb>,
    Query(query): Query<ListQuery>,
) -> Result<Json<IndexList>, ApiError> {
    let kind = query
        .kind
        .map(|kind| {
            IndexType::parse(&kind.to_ascii_uppercase())
                .ok_or_else(|| IndexError::Validation(format!("unknown index type: {kind}")))
        })
        .transpose()?;
    let rows = db.get_all_indices(kind).await?;
    Ok(Json(index_list(&db, rows).await?))
}

pub async fn get_index(
    State(db): State<SkindexDb>,
    Path(index_id): Path<i32>,
) -> Result<Json<IndexDetail>, ApiError> {
    let (index, items) = db.get_index_with_items(index_id).await?;
    Ok(Json(index_detail(&db, index, items).await?))
}

pub async fn update_index(
    State(db): State<SkindexDb>,
    Path(index_id): Path<i32>,
    Json(update): Json<UpdateIndex>,
) -> Result<Json<IndexDetail>, ApiError> {
    db.update_index(index_id, update).await?;
    let (index, items) = db.get_index_with_items(index_id).await?;
    Ok(Json(index_detail(&db, index, items).await?))
}

pub async fn delete_index(
    State(db): State<SkindexDb>,
    Path(index_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    db.delete_index(index_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
