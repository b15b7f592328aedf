#![warn(missing_docs)]
//! Extração do faturamento de NFS-e do Portal Nacional (Emissor Nacional)
//! com autenticação por certificado digital A1.

mod certificate;
mod client;
mod config;
mod error;
mod pagination;
mod parser;
pub mod portal;
mod raw;
mod request;
mod service;
mod session;
mod transport;
mod types;
mod utils;

pub use crate::certificate::{CertificateIdentity, IdentityFiles};
pub use crate::client::FaturamentoClient;
pub use crate::config::{DEFAULT_TIMEOUT, PortalConfig};
pub use crate::error::{
    AUTH_FAILED_MESSAGE, FaturamentoError, LoginFailure, TransportError, collapse_login_failure,
};
pub use crate::pagination::{PaginationState, Paginator, StopReason};
pub use crate::parser::{extract_tax_id, format_cnpj};
pub use crate::raw::{DomPage, RawPage};
pub use crate::request::FaturamentoRequest;
pub use crate::service::{ErrorBody, FATURAMENTO_ROUTE, router, serve};
pub use crate::session::{AuthenticatedSession, PageSource};
pub use crate::transport::{Connector, HttpConnector, HttpTransport, PortalTransport};
pub use crate::types::*;
pub use crate::utils::parse_brl_amount;
