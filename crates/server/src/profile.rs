//! Profile endpoints of the authenticated account.

use api_types::account::{Account as AccountView, PasswordChange, ProfileUpdate};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    ServerError,
    auth::{CurrentAccount, account_view},
    server::ServerState,
};

pub async fn get(Extension(CurrentAccount(account)): Extension<CurrentAccount>) -> Json<AccountView> {
    Json(account_view(account))
}

pub async fn update(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    State(state): State<ServerState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state
        .engine
        .update_profile(
            account.id,
            engine::ProfileUpdate {
                name: payload.name,
                currency: payload.currency,
                timezone: payload.timezone,
                profile_image_url: payload.profile_image_url.into_option(),
            },
        )
        .await?;

    Ok(Json(account_view(account)))
}

pub async fn change_password(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    State(state): State<ServerState>,
    Json(payload): Json<PasswordChange>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .change_password(account.id, &payload.current_password, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
