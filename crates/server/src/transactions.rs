//! Transactions API endpoints

use api_types::transaction::{
    CategoryRef, Transaction as TransactionView, TransactionCreated, TransactionNew,
    TransactionQuery, TransactionView as TransactionRow, WalletRef,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{LedgerEntry, Money, NewTransactionCmd, Transaction, TransactionListFilter};

use crate::{
    ServerError, auth::CurrentAccount, kind_from_engine, kind_to_engine, server::ServerState,
    wallets::wallet_view,
};

fn transaction_view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        wallet_id: tx.wallet_id,
        category_id: tx.category_id,
        amount: tx.amount.to_string(),
        kind: kind_from_engine(tx.kind),
        description: tx.description,
        transaction_date: tx.transaction_date,
        created_at: tx.created_at,
    }
}

fn row_view(entry: LedgerEntry) -> TransactionRow {
    TransactionRow {
        transaction: transaction_view(entry.transaction),
        wallet: WalletRef {
            id: entry.wallet.id,
            name: entry.wallet.name,
            currency: entry.wallet.currency,
        },
        category: CategoryRef {
            id: entry.category.id,
            name: entry.category.name,
            kind: kind_from_engine(entry.category.kind),
        },
    }
}

pub async fn transaction_new(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let amount: Money = payload.amount.parse()?;
    let receipt = state
        .engine
        .create_transaction(NewTransactionCmd {
            account_id: account.id,
            wallet_id: payload.wallet_id,
            category_id: payload.category_id,
            amount,
            description: payload.description,
            transaction_date: payload.transaction_date,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionCreated {
            transaction: transaction_view(receipt.transaction),
            wallet: wallet_view(receipt.wallet),
        }),
    ))
}

pub async fn list(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<TransactionQuery>, ServerError>,
) -> Result<Json<Vec<TransactionRow>>, ServerError> {
    let filter = TransactionListFilter {
        wallet_id: query.wallet_id,
        category_id: query.category_id,
        kind: query.kind.map(kind_to_engine),
        from: query.from,
        to: query.to,
    };
    let entries = state.engine.list_transactions(account.id, &filter).await?;
    Ok(Json(entries.into_iter().map(row_view).collect()))
}
