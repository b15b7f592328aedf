//! Serviço HTTP: `GET /` e `POST /api/faturamento-certificado`.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::client::FaturamentoClient;
use crate::error::FaturamentoError;
use crate::request::FaturamentoRequest;
use crate::transport::Connector;
use crate::types::FaturamentoResult;

/// Rota da consulta de faturamento.
pub const FATURAMENTO_ROUTE: &str = "/api/faturamento-certificado";

const ONLINE_MESSAGE: &str = "API Extrator NFS-e com Certificado A1 online";

/// Corpo de erro: `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Mensagem exibida ao cliente.
    pub detail: String,
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: &'static str,
    message: &'static str,
}

type ApiError = (StatusCode, Json<ErrorBody>);

/// Monta as rotas sobre um cliente já configurado.
#[must_use]
pub fn router<C>(client: FaturamentoClient<C>) -> Router
where
    C: Connector + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(status))
        .route(FATURAMENTO_ROUTE, post(faturamento::<C>))
        .with_state(Arc::new(client))
}

/// Atende requisições em `listener` até o processo terminar.
pub async fn serve(listener: TcpListener, client: FaturamentoClient) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("listening on {addr}");
    }
    axum::serve(listener, router(client)).await
}

async fn status() -> Json<StatusBody> {
    Json(StatusBody {
        status: "ok",
        message: ONLINE_MESSAGE,
    })
}

async fn faturamento<C>(
    State(client): State<Arc<FaturamentoClient<C>>>,
    req: Result<Json<FaturamentoRequest>, JsonRejection>,
) -> Result<Json<FaturamentoResult>, ApiError>
where
    C: Connector + Send + Sync + 'static,
{
    let Json(request) = req.map_err(|rejection| {
        error_response(&FaturamentoError::InvalidRequest(rejection.body_text()))
    })?;

    // O cliente HTTP do portal é bloqueante.
    let outcome = tokio::task::spawn_blocking(move || client.fetch(&request))
        .await
        .map_err(|err| error_response(&FaturamentoError::Unclassified(err.to_string())))?;

    outcome.map(Json).map_err(|err| error_response(&err))
}

fn error_response(err: &FaturamentoError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorBody {
            detail: err.detail(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_follows_the_error_kind() {
        let (status, Json(body)) = error_response(&FaturamentoError::AuthenticationFailed);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.detail, crate::error::AUTH_FAILED_MESSAGE);

        let (status, Json(body)) =
            error_response(&FaturamentoError::Unclassified("connection reset".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.detail, "Erro: connection reset");

        let (status, _) = error_response(&FaturamentoError::InvalidRequest("Mês inválido".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
