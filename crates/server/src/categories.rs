//! Categories API endpoints.

use api_types::category::{Category as CategoryView, CategoryNew, CategoryQuery, CategoryUpdate};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::Category;

use crate::{
    ServerError, auth::CurrentAccount, kind_from_engine, kind_to_engine, server::ServerState,
};

fn category_view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: kind_from_engine(category.kind),
        created_at: category.created_at,
    }
}

pub async fn category_new(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .new_category(account.id, &payload.name, kind_to_engine(payload.kind))
        .await?;
    Ok((StatusCode::CREATED, Json(category_view(category))))
}

pub async fn list(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<CategoryQuery>, ServerError>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state
        .engine
        .categories(account.id, query.kind.map(kind_to_engine))
        .await?;
    Ok(Json(categories.into_iter().map(category_view).collect()))
}

pub async fn get(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ServerError>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.category(account.id, id).await?;
    Ok(Json(category_view(category)))
}

pub async fn category_update(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ServerError>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .update_category(
            account.id,
            id,
            engine::CategoryUpdate {
                name: payload.name,
                kind: payload.kind.map(kind_to_engine),
            },
        )
        .await?;
    Ok(Json(category_view(category)))
}

pub async fn category_delete(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(account.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
