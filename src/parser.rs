//! Leitura da listagem de notas emitidas e do perfil do usuário.

use std::sync::LazyLock;

use crate::portal::{
    AMOUNT_CELL_SELECTOR, COMPETENCY_CELL_SELECTOR, COMPETENCY_PATTERN, DISABLED_LINK_MARKER,
    ISSUED_ICON_SRC, NEXT_LINK_SELECTOR, PAGINATION_SELECTOR, PROFILE_SELECTOR, ROW_SELECTOR,
    TAX_ID_PATTERN, TBODY_SELECTOR,
};
use crate::raw::DomPage;
use crate::types::{InvoiceRow, PageSummary, Period};
use crate::utils::{capture_text, collect_text, parse_brl_amount, selector};
use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Selector};

static COMPETENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COMPETENCY_PATTERN).expect("valid competency regex"));
static TAX_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TAX_ID_PATTERN).expect("valid tax id regex"));

static TBODY: LazyLock<Selector> = LazyLock::new(|| selector(TBODY_SELECTOR));
static TR: LazyLock<Selector> = LazyLock::new(|| selector(ROW_SELECTOR));
static ISSUED_ICON: LazyLock<Selector> =
    LazyLock::new(|| selector(&format!("img[src=\"{ISSUED_ICON_SRC}\"]")));
static COMPETENCY_CELL: LazyLock<Selector> =
    LazyLock::new(|| selector(COMPETENCY_CELL_SELECTOR));
static AMOUNT_CELL: LazyLock<Selector> = LazyLock::new(|| selector(AMOUNT_CELL_SELECTOR));
static PAGINATION: LazyLock<Selector> = LazyLock::new(|| selector(PAGINATION_SELECTOR));
static NEXT_LINK: LazyLock<Selector> = LazyLock::new(|| selector(NEXT_LINK_SELECTOR));
static PROFILE: LazyLock<Selector> = LazyLock::new(|| selector(PROFILE_SELECTOR));

/// Destino de uma linha da tabela depois do filtro de período.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowOutcome {
    /// Linha ignorada; a varredura segue.
    Skip,
    /// Linha dentro do período.
    Count(InvoiceRow),
    /// Competência anterior ao ano pedido: nada adiante interessa.
    Stop,
}

impl DomPage {
    /// Soma as notas emitidas de `period` nesta página.
    ///
    /// A listagem vem em ordem decrescente de competência, então a primeira
    /// nota de um ano anterior encerra a página e a paginação. Sem `tbody`
    /// ou sem linhas a listagem acabou.
    #[must_use]
    pub fn summarize(&self, period: &Period) -> PageSummary {
        let Some(tbody) = self.doc.select(&TBODY).next() else {
            return PageSummary::EXHAUSTED;
        };
        let mut rows = tbody.select(&TR).peekable();
        if rows.peek().is_none() {
            return PageSummary::EXHAUSTED;
        }

        let mut summary = PageSummary {
            amount: Decimal::ZERO,
            count: 0,
            keep_scanning: true,
        };
        for tr in rows {
            match classify_row(tr, period) {
                RowOutcome::Skip => {}
                RowOutcome::Count(row) => {
                    summary.amount += row.amount;
                    summary.count += 1;
                }
                RowOutcome::Stop => {
                    summary.keep_scanning = false;
                    break;
                }
            }
        }
        summary
    }

    /// Existe um link "Próxima" utilizável no bloco de paginação.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        let Some(pagination) = self.doc.select(&PAGINATION).next() else {
            return false;
        };
        let Some(link) = pagination.select(&NEXT_LINK).next() else {
            return false;
        };
        !link
            .value()
            .attr("href")
            .unwrap_or_default()
            .contains(DISABLED_LINK_MARKER)
    }

    /// CNPJ do menu de perfil, já formatado, se houver.
    #[must_use]
    pub fn tax_id(&self) -> Option<String> {
        let profile = self.doc.select(&PROFILE).next()?;
        let digits = capture_text(&collect_text(profile), &TAX_ID_RE)?;
        format_cnpj(&digits)
    }
}

fn classify_row(tr: ElementRef, period: &Period) -> RowOutcome {
    if tr.select(&ISSUED_ICON).next().is_none() {
        return RowOutcome::Skip;
    }
    let Some((month, year)) = competency(tr) else {
        return RowOutcome::Skip;
    };

    if year < period.year {
        return RowOutcome::Stop;
    }
    if year > period.year {
        return RowOutcome::Skip;
    }
    if period.month.is_some_and(|m| m != month) {
        return RowOutcome::Skip;
    }

    let amount = tr
        .select(&AMOUNT_CELL)
        .next()
        .map(collect_text)
        .and_then(|text| parse_brl_amount(&text));
    match amount {
        Some(amount) => RowOutcome::Count(InvoiceRow {
            month,
            year,
            amount,
        }),
        None => RowOutcome::Skip,
    }
}

fn competency(tr: ElementRef) -> Option<(u8, u16)> {
    let text = tr.select(&COMPETENCY_CELL).next().map(collect_text)?;
    let caps = COMPETENCY_RE.captures(&text)?;
    let month = caps.get(1)?.as_str().parse().ok()?;
    let year = caps.get(2)?.as_str().parse().ok()?;
    Some((month, year))
}

/// Formata 14 dígitos como `NN.NNN.NNN/NNNN-NN`; outros tamanhos dão `None`.
#[must_use]
pub fn format_cnpj(digits: &str) -> Option<String> {
    if digits.len() != 14 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!(
        "{}.{}.{}/{}-{}",
        &digits[..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..]
    ))
}

/// Extrai o CNPJ formatado do HTML da página de login.
#[must_use]
pub fn extract_tax_id(html: &str) -> Option<String> {
    DomPage::parse(&crate::raw::RawPage::ok(html)).tax_id()
}
