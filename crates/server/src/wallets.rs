//! Wallets API endpoints.

use api_types::wallet::{Wallet as WalletView, WalletNew, WalletUpdate};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{Money, NewWalletCmd, Wallet};

use crate::{ServerError, auth::CurrentAccount, server::ServerState};

pub(crate) fn wallet_view(wallet: Wallet) -> WalletView {
    WalletView {
        id: wallet.id,
        name: wallet.name,
        bank_name: wallet.bank_name,
        currency: wallet.currency.code().to_string(),
        balance: wallet.balance.to_string(),
        created_at: wallet.created_at,
        updated_at: wallet.updated_at,
    }
}

pub async fn wallet_new(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    State(state): State<ServerState>,
    Json(payload): Json<WalletNew>,
) -> Result<(StatusCode, Json<WalletView>), ServerError> {
    let mut cmd = NewWalletCmd::new(account.id, payload.name);
    cmd.bank_name = payload.bank_name;
    cmd.currency = payload.currency;
    if let Some(opening) = payload.opening_balance.as_deref() {
        cmd = cmd.opening_balance(opening.parse::<Money>()?);
    }

    let wallet = state.engine.new_wallet(cmd).await?;
    Ok((StatusCode::CREATED, Json(wallet_view(wallet))))
}

pub async fn list(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<WalletView>>, ServerError> {
    let wallets = state.engine.wallets(account.id).await?;
    Ok(Json(wallets.into_iter().map(wallet_view).collect()))
}

pub async fn get(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ServerError>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state.engine.wallet(account.id, id).await?;
    Ok(Json(wallet_view(wallet)))
}

pub async fn wallet_update(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ServerError>,
    Json(payload): Json<WalletUpdate>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state
        .engine
        .update_wallet(
            account.id,
            id,
            engine::WalletUpdate {
                name: payload.name,
                bank_name: payload.bank_name.into_option(),
            },
        )
        .await?;
    Ok(Json(wallet_view(wallet)))
}

pub async fn wallet_delete(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_wallet(account.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
