//! # REST API for CSV Export
//!
//! One download endpoint per model. Each handler loads the records, builds a
//! `CsvExporter` from the configured export settings and returns the
//! rendered attachment.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use export_csv::{CsvExporter, Record};
use tracing::{error, info};

use crate::db::TransactionOrder;
use crate::domain::models::{Customer, Transaction};
use crate::rest::AppState;

/// GET /customer/csv/ - every customer, fields and filename derived from the model
pub async fn customer_csv(State(state): State<AppState>) -> Response {
    info!("GET /customer/csv/");

    let customers = match state.bank_service.list_customers().await {
        Ok(customers) => customers,
        Err(e) => return load_failed("customers", e),
    };

    let exporter = CsvExporter::for_model::<Customer>()
        .source(customers)
        .settings(state.config.exports.customer.clone());
    render(exporter)
}

/// GET /account/csv/ - only accounts above the configured balance threshold
pub async fn account_csv(State(state): State<AppState>) -> Response {
    info!("GET /account/csv/");

    let threshold = state.config.rich_account_threshold;
    let accounts = match state.bank_service.list_accounts(Some(threshold)).await {
        Ok(accounts) => accounts,
        Err(e) => return load_failed("accounts", e),
    };

    let exporter = CsvExporter::new()
        .source(accounts)
        .settings(state.config.exports.account.clone());
    render(exporter)
}

/// GET /transaction/csv/ - transaction ids are written in lowercase
pub async fn transaction_csv(State(state): State<AppState>) -> Response {
    info!("GET /transaction/csv/");

    let transactions = match state
        .bank_service
        .list_transactions(TransactionOrder::Created)
        .await
    {
        Ok(transactions) => transactions,
        Err(e) => return load_failed("transactions", e),
    };

    let exporter = CsvExporter::for_model::<Transaction>()
        .source(transactions)
        .settings(state.config.exports.transaction.clone())
        .cleaner_for("transaction_id", |value| Ok(value.to_string().to_lowercase()));
    render(exporter)
}

fn render<S>(exporter: CsvExporter<S>) -> Response
where
    S: IntoIterator,
    S::Item: Record,
{
    match exporter.into_response() {
        Ok(csv) => {
            info!("✅ Export of {} completed successfully", csv.filename());
            csv.into_response()
        }
        Err(e) => {
            error!("❌ Failed to export CSV: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to export CSV").into_response()
        }
    }
}

fn load_failed(what: &str, e: anyhow::Error) -> Response {
    error!("❌ Failed to load {} for export: {:?}", what, e);
    (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to load {}", what)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db::DbConnection;
    use crate::domain::BankService;
    use crate::rest::create_router;
    use axum::{
        body::Body,
        http::{header, HeaderMap, Method, Request},
        Router,
    };
    use export_csv::ColumnNames;
    use tower::ServiceExt;

    async fn setup_test_app(config: AppConfig) -> (Router, BankService) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let service = BankService::new(db);
        let app = create_router(AppState::new(service.clone(), config));
        (app, service)
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, HeaderMap, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_customer_csv() {
        let (app, service) = setup_test_app(AppConfig::default()).await;
        service.create_customer("Honey Bunny", "13763 Hawthorne Boulevard").await.unwrap();
        service.create_customer("Jimmie", "4145 Kraft Avenue").await.unwrap();

        let (status, headers, body) = send(app, Method::GET, "/customer/csv/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"customer_list.csv\""
        );
        let rows: Vec<&str> = body.split_terminator("\r\n").collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("Honey Bunny,13763 Hawthorne Boulevard,True,"));
        assert!(rows[1].starts_with("Jimmie,4145 Kraft Avenue,True,"));
    }

    #[tokio::test]
    async fn test_customer_csv_with_header_from_config() {
        let mut config = AppConfig::default();
        config.exports.customer.add_col_names = true;
        let (app, service) = setup_test_app(config).await;
        service.create_customer("Jimmie", "4145 Kraft Avenue").await.unwrap();

        let (_, _, body) = send(app, Method::GET, "/customer/csv/").await;
        let rows: Vec<&str> = body.split_terminator("\r\n").collect();
        assert_eq!(rows[0], "name,address,Is Active,last updated");
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_account_csv_only_rich_accounts() {
        let (app, service) = setup_test_app(AppConfig::default()).await;
        let customer = service.create_customer("Marsellus Wallace", "1541 Summitridge Drive").await.unwrap();
        service.open_account(customer.id, 600_000.0).await.unwrap();
        let rich = service.open_account(customer.id, 750_000.0).await.unwrap();

        let (status, headers, body) = send(app, Method::GET, "/account/csv/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"rich_account_list.csv\""
        );
        assert_eq!(body, format!("{},Marsellus Wallace\r\n", rich.account_no));
    }

    #[tokio::test]
    async fn test_transaction_csv_dialect_and_cleaner() {
        let (app, service) = setup_test_app(AppConfig::default()).await;
        let customer = service.create_customer("Mia Wallace", "1541 Summitridge Drive").await.unwrap();
        let account = service.open_account(customer.id, 1_000.0).await.unwrap();
        let transaction = service.record_transaction(account.id, -250.0, false).await.unwrap();

        let (status, headers, body) = send(app, Method::GET, "/transaction/csv/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"transactions_csv_filename.csv\""
        );
        let expected_prefix = format!(
            "|{}| |{}| |",
            account.account_no,
            transaction.transaction_id.to_lowercase()
        );
        assert!(body.starts_with(&expected_prefix), "unexpected body: {}", body);
        assert!(body.ends_with("|\r\n"));
        assert_eq!(body.matches("\r\n").count(), 1);
    }

    #[tokio::test]
    async fn test_export_error_is_server_error() {
        let mut config = AppConfig::default();
        config.exports.customer.add_col_names = true;
        config.exports.customer.col_names = Some(ColumnNames::Text("hello world".to_string()));
        let (app, _) = setup_test_app(config).await;

        let (status, _, body) = send(app, Method::GET, "/customer/csv/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Failed to export CSV");
    }

    #[tokio::test]
    async fn test_head_is_allowed_post_is_not() {
        let (app, _) = setup_test_app(AppConfig::default()).await;

        let (head_status, head_headers, head_body) = send(app.clone(), Method::HEAD, "/customer/csv/").await;
        assert_eq!(head_status, StatusCode::OK);
        assert_eq!(head_headers[header::CONTENT_TYPE], "text/csv");
        assert!(head_body.is_empty());

        let (post_status, _, _) = send(app, Method::POST, "/customer/csv/").await;
        assert_eq!(post_status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
