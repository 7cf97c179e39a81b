//! Registration, login and the bearer-token gate in front of `/api`.

use api_types::{
    account::Account as AccountView,
    auth::{LoginRequest, LoginResponse, RegisterRequest},
};
use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use engine::{Account, EngineError, RegisterCmd};

use crate::{ServerError, server::ServerState};

/// The account resolved from the request's bearer token.
#[derive(Clone, Debug)]
pub struct CurrentAccount(pub Account);

pub(crate) fn account_view(account: Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        email: account.email,
        profile_image_url: account.profile_image_url,
        currency: account.currency.code().to_string(),
        timezone: account.timezone,
        created_at: account.created_at,
    }
}

/// Rejects the request unless it carries a valid token for an existing account.
pub(crate) async fn require_account(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>()
    else {
        return Err(ServerError::Unauthorized(
            "missing or malformed bearer token".to_string(),
        ));
    };

    let account_id = state.tokens.verify(bearer.token())?;
    let account = match state.engine.account(account_id).await {
        Ok(account) => account,
        Err(EngineError::NotFound(_)) => {
            return Err(ServerError::Unauthorized(format!(
                "token subject {account_id} does not exist"
            )));
        }
        Err(err) => return Err(err.into()),
    };

    request.extensions_mut().insert(CurrentAccount(account));
    Ok(next.run(request).await)
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let account = state
        .engine
        .register(RegisterCmd {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(account_view(account))))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ServerError> {
    let account = state
        .engine
        .authenticate(&payload.email, &payload.password)
        .await
        .inspect_err(|_| tracing::warn!("failed login attempt"))?;
    let issued = state.tokens.issue(account.id)?;

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}
