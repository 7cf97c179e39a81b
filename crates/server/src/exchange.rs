use api_types::exchange::ExchangeRates;
use axum::{Json, extract::State};

use crate::server::ServerState;

pub async fn rates(State(state): State<ServerState>) -> Json<ExchangeRates> {
    let table = state.engine.exchange_rates();
    Json(ExchangeRates {
        base: table.base.to_string(),
        rates: table
            .rates
            .into_iter()
            .map(|(code, rate)| (code.to_string(), rate))
            .collect(),
    })
}
