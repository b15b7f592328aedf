//! Tipos de domínio: período consultado, agregação e resultado final.

use rust_decimal::Decimal;
use serde::Serialize;

/// Valor monetário, `Decimal` para somas exatas.
pub type Money = Decimal;

/// Rótulo usado quando o CNPJ não aparece no perfil.
pub const UNIDENTIFIED_TAX_ID: &str = "Não identificado";

/// Rótulo de mês quando a consulta cobre o ano todo.
pub const WHOLE_YEAR_LABEL: &str = "Ano todo";

/// Período de competência consultado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    /// Ano com quatro dígitos.
    pub year: u16,
    /// Mês (1–12); `None` para o ano inteiro.
    pub month: Option<u8>,
}

impl Period {
    /// Período de um ano inteiro.
    #[must_use]
    pub const fn year(year: u16) -> Self {
        Self { year, month: None }
    }

    /// Período de um único mês. O mês deve estar em 1..=12.
    #[must_use]
    pub const fn month(year: u16, month: u8) -> Self {
        Self {
            year,
            month: Some(month),
        }
    }

    /// `"MM/YYYY"` ou `"YYYY"`.
    #[must_use]
    pub fn period_label(&self) -> String {
        match self.month {
            Some(m) => format!("{m:02}/{}", self.year),
            None => self.year.to_string(),
        }
    }

    /// `"MM"` ou `"Ano todo"`.
    #[must_use]
    pub fn month_label(&self) -> String {
        self.month
            .map_or_else(|| WHOLE_YEAR_LABEL.to_string(), |m| format!("{m:02}"))
    }
}

/// Linha de nota já extraída da listagem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceRow {
    /// Mês de competência.
    pub month: u8,
    /// Ano de competência.
    pub year: u16,
    /// Valor da nota.
    pub amount: Money,
}

/// Contribuição de uma única página da listagem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    /// Soma dos valores das notas no período.
    pub amount: Money,
    /// Quantidade de notas somadas.
    pub count: u32,
    /// `false` quando páginas seguintes não podem ter notas do período.
    pub keep_scanning: bool,
}

impl PageSummary {
    /// Página sem tabela ou sem linhas: fim da listagem.
    pub const EXHAUSTED: Self = Self {
        amount: Decimal::ZERO,
        count: 0,
        keep_scanning: false,
    };
}

/// Acumulado ao longo da paginação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationState {
    total: Money,
    count: u32,
    keep_scanning: bool,
}

impl Default for AggregationState {
    fn default() -> Self {
        Self {
            total: Decimal::ZERO,
            count: 0,
            keep_scanning: true,
        }
    }
}

impl AggregationState {
    /// Incorpora o resultado de uma página. Depois que a varredura
    /// para, ela não volta a ser liberada.
    pub fn absorb(&mut self, page: PageSummary) {
        self.total += page.amount;
        self.count += page.count;
        self.keep_scanning &= page.keep_scanning;
    }

    /// Soma acumulada.
    #[must_use]
    pub const fn total(&self) -> Money {
        self.total
    }

    /// Número de notas acumuladas.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Se ainda faz sentido buscar a próxima página.
    #[must_use]
    pub const fn keep_scanning(&self) -> bool {
        self.keep_scanning
    }
}

/// Resultado final de uma consulta, com as chaves JSON da API pública.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaturamentoResult {
    /// CNPJ formatado ou [`UNIDENTIFIED_TAX_ID`].
    #[serde(rename = "CNPJ")]
    pub tax_id: String,
    /// Total arredondado em duas casas.
    #[serde(rename = "Faturamento", with = "rust_decimal::serde::float")]
    pub total_amount: Money,
    /// Quantidade de notas somadas.
    #[serde(rename = "Notas_Encontradas")]
    pub matched_count: u32,
    /// Rótulo do período.
    #[serde(rename = "Periodo")]
    pub period_label: String,
    /// Rótulo do mês.
    #[serde(rename = "Mes")]
    pub month_label: String,
}

impl FaturamentoResult {
    /// Monta o resultado a partir do acumulado e do CNPJ extraído.
    #[must_use]
    pub fn new(tax_id: Option<String>, period: &Period, state: &AggregationState) -> Self {
        Self {
            tax_id: tax_id.unwrap_or_else(|| UNIDENTIFIED_TAX_ID.to_string()),
            total_amount: state.total().round_dp(2),
            matched_count: state.count(),
            period_label: period.period_label(),
            month_label: period.month_label(),
        }
    }
}
