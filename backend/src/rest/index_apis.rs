use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::IndexResponse;
use tracing::{error, info};

use crate::db::TransactionOrder;
use crate::rest::AppState;

/// GET / - everything in the bank, transactions ordered by transaction id
pub async fn index(State(state): State<AppState>) -> Response {
    info!("GET /");

    match load_index(&state).await {
        Ok(index) => (StatusCode::OK, Json(index)).into_response(),
        Err(e) => {
            error!("Error loading index: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error loading index").into_response()
        }
    }
}

async fn load_index(state: &AppState) -> anyhow::Result<IndexResponse> {
    let service = &state.bank_service;
    let customers = service.list_customers().await?;
    let accounts = service.list_accounts(None).await?;
    let transactions = service.list_transactions(TransactionOrder::TransactionId).await?;

    Ok(IndexResponse {
        customers: customers.iter().map(|c| c.to_dto()).collect(),
        accounts: accounts.iter().map(|a| a.to_dto()).collect(),
        transactions: transactions.iter().map(|t| t.to_dto()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db::DbConnection;
    use crate::domain::BankService;
    use crate::rest::create_router;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_index_lists_everything() {
        let db = DbConnection::init_test().await.unwrap();
        let service = BankService::new(db);
        let customer = service.create_customer("Jules", "Somewhere in Inglewood").await.unwrap();
        let account = service.open_account(customer.id, 2_000.0).await.unwrap();
        service.record_transaction(account.id, 150.0, false).await.unwrap();
        service.record_transaction(account.id, -50.0, false).await.unwrap();

        let app = create_router(AppState::new(service, AppConfig::default()));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let index: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(index["customers"].as_array().unwrap().len(), 1);
        assert_eq!(index["accounts"][0]["balance"], 2_100.0);
        assert_eq!(index["accounts"][0]["transaction_count"], 2);

        let ids: Vec<&str> = index["transactions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["transaction_id"].as_str().unwrap())
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
