use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http_body_util::BodyExt;
use httpmock::prelude::*;
use nfse_faturamento::{FATURAMENTO_ROUTE, FaturamentoClient, PortalConfig, router};
use serde_json::{Value, json};
use tower::ServiceExt;

fn fixture_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("read fixture")
}

fn bundle_base64() -> String {
    STANDARD.encode(std::fs::read(fixture_path("a1_moderno.p12")).expect("read bundle"))
}

async fn call(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(body: &Value) -> Request<Body> {
    Request::post(FATURAMENTO_ROUTE)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn app(base_url: &str, scratch: &std::path::Path) -> axum::Router {
    router(FaturamentoClient::new(
        PortalConfig::default()
            .with_base_url(base_url)
            .with_scratch_dir(scratch),
    ))
}

#[tokio::test]
async fn root_reports_online() {
    let scratch = tempfile::tempdir().unwrap();
    let (status, body) = call(
        app("http://127.0.0.1:1", scratch.path()),
        Request::get("/").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn post_returns_the_public_result_keys() {
    let server = MockServer::start_async().await;
    let scratch = tempfile::tempdir().unwrap();
    server
        .mock_async(|when, then| {
            when.method(GET).path("/EmissorNacional/Certificado");
            then.status(200)
                .header("Set-Cookie", "Emissor=sessao123; Path=/; HttpOnly")
                .body(fixture("login.html"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/EmissorNacional/Notas/Emitidas");
            then.status(200).body(fixture("emitidas_ultima.html"));
        })
        .await;

    let (status, body) = call(
        app(&server.base_url(), scratch.path()),
        post_json(&json!({
            "certificado_base64": bundle_base64(),
            "senha_certificado": "senha-a1",
            "ano": "2025"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["CNPJ"], "12.345.678/0001-95");
    assert_eq!(body["Faturamento"], 1234.56);
    assert_eq!(body["Notas_Encontradas"], 1);
    assert_eq!(body["Periodo"], "2025");
    assert_eq!(body["Mes"], "Ano todo");
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn wrong_password_is_401_with_the_fixed_message() {
    let scratch = tempfile::tempdir().unwrap();
    let (status, body) = call(
        app("http://127.0.0.1:1", scratch.path()),
        post_json(&json!({
            "certificado_base64": bundle_base64(),
            "senha_certificado": "outra",
            "ano": "2025"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], nfse_faturamento::AUTH_FAILED_MESSAGE);
}

#[tokio::test]
async fn invalid_month_and_malformed_body_are_400() {
    let scratch = tempfile::tempdir().unwrap();

    let (status, body) = call(
        app("http://127.0.0.1:1", scratch.path()),
        post_json(&json!({
            "certificado_base64": "AAAA",
            "senha_certificado": "x",
            "ano": "2025",
            "mes": "13"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Mês inválido");

    let (status, _) = call(
        app("http://127.0.0.1:1", scratch.path()),
        post_json(&json!({ "ano": "2025" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
