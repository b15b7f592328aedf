//! Resposta bruta do portal e a árvore DOM pronta para consulta.

use scraper::Html;

/// Corpo HTML e status de uma resposta do portal.
#[derive(Debug, Clone)]
pub struct RawPage {
    /// Status HTTP.
    pub status: u16,
    /// HTML completo.
    pub html: String,
}

impl RawPage {
    /// Página com o status recebido.
    #[must_use]
    pub fn new(status: u16, html: impl Into<String>) -> Self {
        Self {
            status,
            html: html.into(),
        }
    }

    /// Página servida com 200, para HTML que não veio do transporte
    /// (arquivos salvos, fixtures).
    #[must_use]
    pub fn ok(html: impl Into<String>) -> Self {
        Self::new(200, html)
    }

    /// `true` apenas para 200; qualquer outro status encerra a paginação.
    #[inline]
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// DOM de uma página do portal.
#[derive(Debug, Clone)]
pub struct DomPage {
    pub(crate) doc: Html,
}

impl DomPage {
    /// Faz o parse do HTML bruto.
    #[inline]
    #[must_use]
    pub fn parse(raw: &RawPage) -> Self {
        Self {
            doc: Html::parse_document(&raw.html),
        }
    }
}
