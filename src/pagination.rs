//! Máquina de estados da paginação da listagem de notas emitidas.

use log::{debug, info};

use crate::error::TransportError;
use crate::raw::DomPage;
use crate::session::PageSource;
use crate::types::{AggregationState, Period};

/// Motivo do fim da paginação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// O portal respondeu com status diferente de 200. Dados truncados sem erro.
    Status(u16),
    /// A página sinalizou que nada adiante pertence ao período (ou a listagem acabou).
    OutOfScope,
    /// Sem link "Próxima", ou link desabilitado.
    NoNextPage,
}

/// Estado da paginação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    /// Buscando a página indicada.
    Fetching(u32),
    /// Página processada; há uma próxima.
    ParsedContinue(u32),
    /// Página processada; a paginação termina.
    ParsedStop(StopReason),
    /// Estado final.
    Done(StopReason),
}

/// Conduz busca e leitura das páginas, estritamente em sequência.
#[derive(Debug, Clone)]
pub struct Paginator {
    period: Period,
    state: PaginationState,
    aggregate: AggregationState,
}

impl Paginator {
    /// Começa pela página 1.
    #[must_use]
    pub fn new(period: Period) -> Self {
        Self {
            period,
            state: PaginationState::Fetching(1),
            aggregate: AggregationState::default(),
        }
    }

    /// Estado atual.
    #[must_use]
    pub const fn state(&self) -> PaginationState {
        self.state
    }

    /// Acumulado até agora.
    #[must_use]
    pub const fn aggregate(&self) -> &AggregationState {
        &self.aggregate
    }

    /// Executa uma transição. Em `Done` não faz nada.
    pub fn step<S: PageSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> Result<PaginationState, TransportError> {
        self.state = match self.state {
            PaginationState::Fetching(page) => {
                let raw = source.fetch_page(page)?;
                if raw.is_ok() {
                    let dom = DomPage::parse(&raw);
                    let summary = dom.summarize(&self.period);
                    self.aggregate.absorb(summary);
                    debug!(
                        "page {page}: {} invoices, {} total",
                        summary.count, summary.amount
                    );
                    if !summary.keep_scanning {
                        PaginationState::ParsedStop(StopReason::OutOfScope)
                    } else if !dom.has_next_page() {
                        PaginationState::ParsedStop(StopReason::NoNextPage)
                    } else {
                        PaginationState::ParsedContinue(page)
                    }
                } else {
                    PaginationState::Done(StopReason::Status(raw.status))
                }
            }
            PaginationState::ParsedContinue(page) => PaginationState::Fetching(page + 1),
            PaginationState::ParsedStop(reason) => PaginationState::Done(reason),
            done @ PaginationState::Done(_) => done,
        };
        Ok(self.state)
    }

    /// Roda até `Done` e devolve o acumulado.
    pub fn run<S: PageSource + ?Sized>(
        mut self,
        source: &S,
    ) -> Result<AggregationState, TransportError> {
        loop {
            if let PaginationState::Done(reason) = self.step(source)? {
                info!(
                    "pagination finished ({reason:?}): {} invoices, {} total",
                    self.aggregate.count(),
                    self.aggregate.total()
                );
                return Ok(self.aggregate);
            }
        }
    }
}
