//! Corpo da requisição de faturamento e sua validação.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FaturamentoError;
use crate::types::Period;

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("valid year regex"));

/// Requisição, com os nomes de campo da API pública.
#[derive(Clone, Deserialize, Serialize)]
pub struct FaturamentoRequest {
    /// Arquivo `.pfx`/`.p12` em base64.
    pub certificado_base64: String,
    /// Senha do certificado.
    pub senha_certificado: String,
    /// Ano (`YYYY`).
    pub ano: String,
    /// Mês (1–12); ausente ou vazio para o ano todo.
    #[serde(default)]
    pub mes: Option<String>,
}

impl std::fmt::Debug for FaturamentoRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaturamentoRequest")
            .field("ano", &self.ano)
            .field("mes", &self.mes)
            .finish_non_exhaustive()
    }
}

impl FaturamentoRequest {
    /// Valida ano e mês e devolve o período normalizado.
    pub fn validate(&self) -> Result<Period, FaturamentoError> {
        if !YEAR_RE.is_match(&self.ano) {
            return Err(FaturamentoError::InvalidRequest("Ano inválido".into()));
        }
        let year = self
            .ano
            .parse::<u16>()
            .map_err(|_| FaturamentoError::InvalidRequest("Ano inválido".into()))?;

        let month = match self.mes.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(parse_month(text)?),
        };
        Ok(Period { year, month })
    }
}

fn parse_month(text: &str) -> Result<u8, FaturamentoError> {
    let invalid = || FaturamentoError::InvalidRequest("Mês inválido".into());
    let month: i64 = text.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    u8::try_from(month).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(ano: &str, mes: Option<&str>) -> FaturamentoRequest {
        FaturamentoRequest {
            certificado_base64: String::new(),
            senha_certificado: "segredo".into(),
            ano: ano.into(),
            mes: mes.map(str::to_string),
        }
    }

    #[test]
    fn normalizes_month() {
        assert_eq!(
            request("2025", Some("3")).validate().unwrap(),
            Period::month(2025, 3)
        );
        assert_eq!(
            request("2025", Some("03")).validate().unwrap(),
            Period::month(2025, 3)
        );
        assert_eq!(request("2025", Some(" ")).validate().unwrap(), Period::year(2025));
        assert_eq!(request("2025", None).validate().unwrap(), Period::year(2025));
    }

    #[test]
    fn rejects_bad_year_and_month() {
        for (ano, mes) in [
            ("25", None),
            ("20255", None),
            ("abcd", None),
            ("2025", Some("0")),
            ("2025", Some("13")),
            ("2025", Some("março")),
        ] {
            let err = request(ano, mes).validate().unwrap_err();
            assert_eq!(err.status_code(), 400, "{ano} {mes:?}");
        }
    }

    #[test]
    fn debug_hides_secrets() {
        let rendered = format!("{:?}", request("2025", None));
        assert!(!rendered.contains("segredo"));
    }

    #[test]
    fn deserializes_public_body() {
        let req: FaturamentoRequest = serde_json::from_str(
            r#"{"certificado_base64":"AAAA","senha_certificado":"x","ano":"2025"}"#,
        )
        .unwrap();
        assert_eq!(req.mes, None);
        assert_eq!(req.validate().unwrap(), Period::year(2025));
    }
}
