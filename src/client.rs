//! Fluxo completo: certificado, login, paginação e resultado.

use log::info;

use crate::certificate::{CertificateIdentity, IdentityFiles};
use crate::config::PortalConfig;
use crate::error::{FaturamentoError, LoginFailure};
use crate::pagination::Paginator;
use crate::request::FaturamentoRequest;
use crate::session::AuthenticatedSession;
use crate::transport::{Connector, HttpConnector};
use crate::types::{FaturamentoResult, Period};

/// Cliente de consulta de faturamento.
///
/// # Exemplo
///
/// ```no_run
/// # use nfse_faturamento::{FaturamentoClient, FaturamentoRequest, PortalConfig};
/// let client = FaturamentoClient::new(PortalConfig::default());
/// let request = FaturamentoRequest {
///     certificado_base64: "MIIK...".into(),
///     senha_certificado: "senha".into(),
///     ano: "2025".into(),
///     mes: Some("3".into()),
/// };
/// let result = client.fetch(&request)?;
/// println!("{} notas, R$ {}", result.matched_count, result.total_amount);
/// # Ok::<(), nfse_faturamento::FaturamentoError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FaturamentoClient<C = HttpConnector> {
    config: PortalConfig,
    connector: C,
}

impl FaturamentoClient<HttpConnector> {
    /// Cliente HTTP real.
    #[must_use]
    pub fn new(config: PortalConfig) -> Self {
        let connector = HttpConnector::new(config.clone());
        Self { config, connector }
    }
}

impl<C: Connector> FaturamentoClient<C> {
    /// Cliente com um conector próprio.
    pub const fn with_connector(config: PortalConfig, connector: C) -> Self {
        Self { config, connector }
    }

    /// Configuração em uso.
    pub const fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Valida a requisição e executa a consulta.
    pub fn fetch(&self, request: &FaturamentoRequest) -> Result<FaturamentoResult, FaturamentoError> {
        let period = request.validate()?;
        self.fetch_period(
            &request.certificado_base64,
            &request.senha_certificado,
            &period,
        )
    }

    /// Executa a consulta para um período já validado.
    ///
    /// O material temporário do certificado é apagado antes do retorno em
    /// todos os caminhos.
    pub fn fetch_period(
        &self,
        bundle_base64: &str,
        password: &str,
        period: &Period,
    ) -> Result<FaturamentoResult, FaturamentoError> {
        info!("fetching revenue for {}", period.period_label());
        let session = self.login(bundle_base64, password)?;

        let outcome = Paginator::new(*period).run(&session);
        let tax_id = session.tax_id().map(str::to_string);
        session.close();

        let state = outcome?;
        Ok(FaturamentoResult::new(tax_id, period, &state))
    }

    fn login(
        &self,
        bundle_base64: &str,
        password: &str,
    ) -> Result<AuthenticatedSession<C::Transport>, LoginFailure> {
        let identity = CertificateIdentity::from_base64(bundle_base64, password)?;
        let files = IdentityFiles::materialize(&identity, self.config.scratch_dir())?;
        AuthenticatedSession::establish(&self.connector, files, self.config.base_url())
    }
}
