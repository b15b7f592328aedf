//! Literais da marcação e dos endereços do Emissor Nacional.
//!
//! Mudanças no HTML do portal devem ser refletidas apenas aqui.

/// Endereço padrão do portal.
pub const DEFAULT_BASE_URL: &str = "https://www.nfse.gov.br";

/// Caminho de login por certificado.
pub const LOGIN_PATH: &str = "/EmissorNacional/Certificado";

/// Caminho da listagem de notas emitidas.
pub const ISSUED_LIST_PATH: &str = "/EmissorNacional/Notas/Emitidas";

/// Parâmetro de consulta com o número da página (a partir da segunda).
pub const PAGE_QUERY_PARAM: &str = "pg";

/// Cookie cuja presença indica sessão autenticada.
pub const SESSION_COOKIE: &str = "Emissor";

/// Ícone de situação "gerada" nas linhas da listagem.
pub const ISSUED_ICON_SRC: &str = "/EmissorNacional/img/tb-gerada.svg";

pub(crate) const PROFILE_SELECTOR: &str = "li.dropdown.perfil";
pub(crate) const TBODY_SELECTOR: &str = "tbody";
pub(crate) const ROW_SELECTOR: &str = "tr";
pub(crate) const COMPETENCY_CELL_SELECTOR: &str = "td.td-competencia";
pub(crate) const AMOUNT_CELL_SELECTOR: &str = "td.td-valor";
pub(crate) const PAGINATION_SELECTOR: &str = "div.paginacao";
pub(crate) const NEXT_LINK_SELECTOR: &str = "a[title=\"Próxima\"]";

/// Trecho de `href` que marca o link "Próxima" como desabilitado.
pub(crate) const DISABLED_LINK_MARKER: &str = "javascript:";

pub(crate) const COMPETENCY_PATTERN: &str = r"([0-9]{2})/([0-9]{4})";
pub(crate) const TAX_ID_PATTERN: &str = r"CNPJ:\s*([0-9]+)";

/// `User-Agent` de navegador comum, evita o filtro de robôs do portal.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Cabeçalho `Accept` enviado em todas as requisições.
pub const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Monta a URL da página `page` (1-based) da listagem de notas emitidas.
pub fn issued_list_url(base_url: &str, page: u32) -> String {
    let base = base_url.trim_end_matches('/');
    if page <= 1 {
        format!("{base}{ISSUED_LIST_PATH}")
    } else {
        format!("{base}{ISSUED_LIST_PATH}?{PAGE_QUERY_PARAM}={page}")
    }
}

/// Monta a URL de login por certificado.
pub fn login_url(base_url: &str) -> String {
    format!("{}{LOGIN_PATH}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_uses_bare_endpoint() {
        assert_eq!(
            issued_list_url("https://www.nfse.gov.br/", 1),
            "https://www.nfse.gov.br/EmissorNacional/Notas/Emitidas"
        );
    }

    #[test]
    fn later_pages_append_page_param() {
        assert_eq!(
            issued_list_url("https://www.nfse.gov.br", 3),
            "https://www.nfse.gov.br/EmissorNacional/Notas/Emitidas?pg=3"
        );
    }
}
