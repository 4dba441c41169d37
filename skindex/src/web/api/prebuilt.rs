use super::indices::{index_detail, index_list};
use crate::web::error::ApiError;
use axum::extract::{Path, State};
use axum::Json;
use skindex_api_types::{IndexDetail, IndexList, IndexType};
use skindex_db::SkindexDb;

pub async fn list_prebuilt(State(db): State<SkindexDb>) -> Result<Json<IndexList>, ApiError> {
    let rows = db.get_all_indices(Some(IndexType::Prebuilt)).await?;
    Ok(Json(index_list(&db, rows).await?))
}

pub async fn get_prebuilt(
    State(db): State<SkindexDb>,
    Path(category): Path<String>,
) -> Result<Json<IndexDetail>, ApiError> {
    let (index, items) = db
        .get_prebuilt_by_category(&category)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no prebuilt index for category {category}")))?;
    Ok(Json(index_detail(&db, index, items).await?))
}

/// Rebuilds every prebuilt index from the current catalog.
pub async fn generate_prebuilt(State(db): State<SkindexDb>) -> Result<Json<IndexList>, ApiError> {
    db.generate_prebuilt_indices().await?;
    list_prebuilt(State(db)).await
}
