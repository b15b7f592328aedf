//! Login por certificado e acesso autenticado à listagem de notas.

use log::{debug, info};

use crate::certificate::IdentityFiles;
use crate::error::{LoginFailure, TransportError};
use crate::portal::{SESSION_COOKIE, issued_list_url, login_url};
use crate::raw::{DomPage, RawPage};
use crate::transport::{Connector, PortalTransport};

/// Origem das páginas da listagem de notas emitidas.
pub trait PageSource {
    /// Busca a página `page` (1-based).
    fn fetch_page(&self, page: u32) -> Result<RawPage, TransportError>;
}

/// Sessão autenticada no Emissor Nacional.
///
/// Dona do material temporário do certificado: ao fechar ou descartar a
/// sessão, os arquivos são apagados.
#[derive(Debug)]
pub struct AuthenticatedSession<T> {
    transport: T,
    base_url: String,
    tax_id: Option<String>,
    identity: IdentityFiles,
}

impl<T: PortalTransport> AuthenticatedSession<T> {
    /// Faz o login por certificado.
    ///
    /// O sucesso é decidido só pela presença do cookie de sessão; o status
    /// HTTP não importa. Em qualquer falha `identity` é apagado antes do
    /// retorno.
    pub fn establish<C>(
        connector: &C,
        identity: IdentityFiles,
        base_url: &str,
    ) -> Result<Self, LoginFailure>
    where
        C: Connector<Transport = T>,
    {
        let transport = connector.connect(&identity)?;
        let url = login_url(base_url);
        debug!("certificate login at {url}");
        let page = transport.get(&url)?;

        if !transport.has_cookie(&url, SESSION_COOKIE) {
            return Err(LoginFailure::MissingCookie(SESSION_COOKIE));
        }

        let tax_id = DomPage::parse(&page).tax_id();
        info!(
            "session established (tax id {})",
            if tax_id.is_some() { "found" } else { "absent" }
        );

        Ok(Self {
            transport,
            base_url: base_url.to_string(),
            tax_id,
            identity,
        })
    }

    /// CNPJ formatado encontrado no perfil.
    #[must_use]
    pub fn tax_id(&self) -> Option<&str> {
        self.tax_id.as_deref()
    }

    /// Encerra a sessão e apaga o material do certificado.
    pub fn close(self) {
        self.identity.erase();
    }
}

impl<T: PortalTransport> PageSource for AuthenticatedSession<T> {
    fn fetch_page(&self, page: u32) -> Result<RawPage, TransportError> {
        let url = issued_list_url(&self.base_url, page);
        let raw = self.transport.get(&url)?;
        debug!("page {page}: status {}", raw.status);
        Ok(raw)
    }
}
