//! Configuração de acesso ao portal.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::portal::{BROWSER_ACCEPT, BROWSER_USER_AGENT, DEFAULT_BASE_URL};

/// Tempo máximo de cada requisição ao portal.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Parâmetros de conexão com o Emissor Nacional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    base_url: String,
    timeout: Duration,
    user_agent: String,
    accept: String,
    scratch_dir: Option<PathBuf>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept: BROWSER_ACCEPT.to_string(),
            scratch_dir: None,
        }
    }
}

impl PortalConfig {
    /// Troca o endereço base do portal (útil para homologação e testes).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Tempo limite de cada requisição.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Cabeçalho `User-Agent`.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Cabeçalho `Accept`.
    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// Diretório onde o material temporário do certificado é criado.
    #[must_use]
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Endereço base do portal.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Tempo limite por requisição.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `User-Agent` enviado.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// `Accept` enviado.
    #[must_use]
    pub fn accept(&self) -> &str {
        &self.accept
    }

    /// `None` usa o diretório temporário do sistema.
    #[must_use]
    pub fn scratch_dir(&self) -> Option<&Path> {
        self.scratch_dir.as_deref()
    }
}
