//! Erros da extração de faturamento.

/// Mensagem única para qualquer falha de autenticação.
pub const AUTH_FAILED_MESSAGE: &str =
    "Autenticação não realizada. Favor inserir os dados corretamente de acesso";

/// Erro exposto ao chamador.
#[derive(thiserror::Error, Debug)]
pub enum FaturamentoError {
    /// Certificado, senha ou sessão inválidos. A causa nunca é revelada.
    #[error("{}", AUTH_FAILED_MESSAGE)]
    AuthenticationFailed,
    /// Requisição rejeitada antes de qualquer acesso ao portal.
    #[error("{0}")]
    InvalidRequest(String),
    /// Qualquer outra falha durante a sessão ou a paginação.
    #[error("{0}")]
    Unclassified(String),
}

impl FaturamentoError {
    /// Código HTTP equivalente, usado pela camada de apresentação.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::AuthenticationFailed => 401,
            Self::InvalidRequest(_) => 400,
            Self::Unclassified(_) => 500,
        }
    }

    /// Texto de detalhe devolvido ao cliente da API.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Unclassified(msg) => format!("Erro: {msg}"),
            other => other.to_string(),
        }
    }
}

impl From<TransportError> for FaturamentoError {
    fn from(err: TransportError) -> Self {
        Self::Unclassified(err.to_string())
    }
}

/// Falha de rede, TLS ou montagem do cliente HTTP.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// Erro do cliente HTTP (TLS, timeout, conexão).
    #[error("request error: {0}")]
    Http(#[from] reqwest::Error),
    /// Falha ao ler o material do certificado.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Valor de cabeçalho configurado é inválido.
    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
    /// Erro sintético de transportes alternativos.
    #[error("{0}")]
    Other(String),
}

/// Causa interna de uma falha no login. Nunca sai da biblioteca como tal.
#[derive(thiserror::Error, Debug)]
pub enum LoginFailure {
    /// Conteúdo base64 inválido.
    #[error("certificate bundle is not valid base64")]
    Base64(#[from] base64::DecodeError),
    /// Estrutura PKCS#12 ilegível.
    #[error("malformed PKCS#12 bundle")]
    Pkcs12,
    /// MAC do PKCS#12 não confere com a senha.
    #[error("wrong certificate password")]
    WrongPassword,
    /// O pacote não contém chave privada ou certificado.
    #[error("PKCS#12 bundle lacks {0}")]
    MissingPart(&'static str),
    /// Falha ao gravar ou reler o material temporário. Não é falha de
    /// autenticação: vira [`FaturamentoError::Unclassified`].
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Erro de TLS ou de rede na requisição de login.
    #[error("transport error: {0}")]
    Transport(String),
    /// O portal respondeu sem o cookie de sessão.
    #[error("session cookie '{0}' not set")]
    MissingCookie(&'static str),
}

impl From<TransportError> for LoginFailure {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Io(err) => Self::Io(err),
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<LoginFailure> for FaturamentoError {
    fn from(cause: LoginFailure) -> Self {
        collapse_login_failure(&cause)
    }
}

/// Reduz a causa de uma falha no login a [`FaturamentoError::AuthenticationFailed`].
///
/// A exceção é o armazenamento temporário: disco cheio ou diretório
/// inexistente é problema do servidor, não do certificado.
#[must_use]
pub fn collapse_login_failure(cause: &LoginFailure) -> FaturamentoError {
    log::debug!("login failed: {}", cause_kind(cause));
    match cause {
        LoginFailure::Io(err) => FaturamentoError::Unclassified(err.to_string()),
        _ => FaturamentoError::AuthenticationFailed,
    }
}

const fn cause_kind(cause: &LoginFailure) -> &'static str {
    match cause {
        LoginFailure::Base64(_) | LoginFailure::Pkcs12 | LoginFailure::WrongPassword => "decode",
        LoginFailure::MissingPart(_) => "incomplete bundle",
        LoginFailure::Io(_) => "scratch storage",
        LoginFailure::Transport(_) => "transport",
        LoginFailure::MissingCookie(_) => "no session cookie",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_login_cause_collapses_to_one_message() {
        let causes = [
            LoginFailure::Pkcs12,
            LoginFailure::WrongPassword,
            LoginFailure::MissingPart("private key"),
            LoginFailure::Transport("handshake failure".into()),
            LoginFailure::MissingCookie("Emissor"),
        ];
        for cause in causes {
            let err = FaturamentoError::from(cause);
            assert!(matches!(err, FaturamentoError::AuthenticationFailed));
            assert_eq!(err.to_string(), AUTH_FAILED_MESSAGE);
            assert_eq!(err.status_code(), 401);
        }
    }

    #[test]
    fn scratch_storage_failure_is_a_server_error() {
        let err = FaturamentoError::from(LoginFailure::Io(std::io::Error::other("disk full")));
        assert!(matches!(err, FaturamentoError::Unclassified(_)));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.detail(), "Erro: disk full");

        let reread = LoginFailure::from(TransportError::Io(std::io::Error::other("gone")));
        assert!(matches!(reread, LoginFailure::Io(_)));
    }

    #[test]
    fn unclassified_detail_is_prefixed() {
        let err = FaturamentoError::Unclassified("connection reset".into());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.detail(), "Erro: connection reset");
    }
}
