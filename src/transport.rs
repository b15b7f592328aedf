//! Transporte HTTP com certificado de cliente e jarra de cookies.

use std::sync::Arc;

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest_cookie_store::CookieStoreMutex;

use crate::certificate::IdentityFiles;
use crate::config::PortalConfig;
use crate::error::TransportError;
use crate::raw::RawPage;

/// Acesso ao portal depois de configurado o certificado do cliente.
pub trait PortalTransport {
    /// GET em `url`, devolvendo status e corpo.
    fn get(&self, url: &str) -> Result<RawPage, TransportError>;

    /// Se a jarra de cookies tem `name` válido para `url`.
    fn has_cookie(&self, url: &str, name: &str) -> bool;
}

/// Cria transportes a partir do material do certificado.
pub trait Connector {
    /// Transporte produzido.
    type Transport: PortalTransport;

    /// Configura um transporte novo usando `identity` como certificado do cliente.
    fn connect(&self, identity: &IdentityFiles) -> Result<Self::Transport, TransportError>;
}

/// Conector padrão, baseado em `reqwest` com rustls.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    config: PortalConfig,
}

impl HttpConnector {
    /// Conector com a configuração dada.
    #[must_use]
    pub const fn new(config: PortalConfig) -> Self {
        Self { config }
    }
}

impl Connector for HttpConnector {
    type Transport = HttpTransport;

    fn connect(&self, identity: &IdentityFiles) -> Result<HttpTransport, TransportError> {
        let pem = identity.read_pem_bundle()?;
        let identity = reqwest::Identity::from_pem(&pem)?;
        let jar = Arc::new(CookieStoreMutex::default());

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_str(self.config.accept())?);

        let client = Client::builder()
            .identity(identity)
            .cookie_provider(Arc::clone(&jar))
            .user_agent(self.config.user_agent())
            .default_headers(headers)
            .timeout(self.config.timeout())
            .build()?;

        Ok(HttpTransport { client, jar })
    }
}

/// Sessão HTTP bloqueante com cookies persistidos entre requisições.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    jar: Arc<CookieStoreMutex>,
}

impl PortalTransport for HttpTransport {
    fn get(&self, url: &str) -> Result<RawPage, TransportError> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let html = response.text()?;
        Ok(RawPage::new(status, html))
    }

    fn has_cookie(&self, url: &str, name: &str) -> bool {
        Url::parse(url).is_ok_and(|url| store_has_cookie(&self.jar, &url, name))
    }
}

/// Se o armazenamento enviaria o cookie `name` numa requisição a `url`:
/// domínio, caminho, `Secure` e expiração são respeitados.
fn store_has_cookie(jar: &CookieStoreMutex, url: &Url, name: &str) -> bool {
    jar.lock().is_ok_and(|store| {
        store
            .get_request_values(url)
            .any(|(cookie_name, _)| cookie_name == name)
    })
}
