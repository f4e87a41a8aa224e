use axum::{
    Router,
    routing::{get, post, put},
};

use std::sync::Arc;

use crate::{accounts, bills, budgets, expenses, exports, transactions};
use ledger::{Ledger, Ocr, PdfRenderer};

#[derive(Clone)]
pub struct ServerState {
    pub ledger: Ledger,
    pub ocr: Arc<dyn Ocr>,
    pub pdf: Arc<dyn PdfRenderer>,
}

impl ServerState {
    pub fn new(ledger: Ledger, ocr: Arc<dyn Ocr>, pdf: Arc<dyn PdfRenderer>) -> Self {
        Self { ledger, ocr, pdf }
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/accounts", post(accounts::create).get(accounts::list))
        .route(
            "/accounts/{id}",
            get(accounts::get_one).delete(accounts::delete),
        )
        .route("/budgets", post(budgets::create).get(budgets::list))
        .route("/budgets/{category}", put(budgets::add_spend_by_path))
        .route("/budgets/update_spent", post(budgets::add_spend))
        .route("/expenses", post(expenses::create).get(expenses::list))
        .route("/expenses/{id}", axum::routing::delete(expenses::delete))
        .route(
            "/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get_one)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route("/bills/upload", post(bills::upload))
        .route("/export-transactions", get(exports::export))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
