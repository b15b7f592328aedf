//! CLI: consulta o faturamento e imprime o resultado em JSON, ou sobe o
//! serviço HTTP com `--listen`.

use std::fs;
use std::io::{self, Read};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::Parser;
use nfse_faturamento::portal::DEFAULT_BASE_URL;
use nfse_faturamento::{FaturamentoClient, FaturamentoError, FaturamentoRequest, PortalConfig};

#[derive(Parser, Debug)]
#[command(name = "nfse-faturamento", version, about = "Faturamento de NFS-e via certificado A1")]
struct Cli {
    /// Sobe o serviço HTTP neste endereço em vez de fazer uma consulta.
    #[arg(long, env = "NFSE_LISTEN", conflicts_with_all = ["request", "pfx"])]
    listen: Option<SocketAddr>,

    /// Corpo JSON da requisição (arquivo ou `-` para stdin).
    #[arg(long, conflicts_with_all = ["pfx", "year", "month"])]
    request: Option<PathBuf>,

    /// Arquivo .pfx/.p12 do certificado.
    #[arg(long, requires = "year")]
    pfx: Option<PathBuf>,

    /// Senha do certificado.
    #[arg(long, env = "NFSE_CERT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Ano (YYYY).
    #[arg(long)]
    year: Option<String>,

    /// Mês (1-12); omita para o ano todo.
    #[arg(long)]
    month: Option<String>,

    /// Endereço base do portal.
    #[arg(long, env = "NFSE_PORTAL_URL", default_value = DEFAULT_BASE_URL)]
    portal_url: String,

    /// Tempo limite por requisição, em segundos.
    #[arg(long, env = "NFSE_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Diretório para o material temporário do certificado.
    #[arg(long, env = "NFSE_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Some(addr) = cli.listen {
        return match listen(addr, portal_config(&cli)) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                log::error!("service stopped: {err}");
                ExitCode::FAILURE
            }
        };
    }

    match run(&cli) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let body = serde_json::json!({ "status": err.status_code(), "detail": err.detail() });
            eprintln!("{body}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn listen(addr: SocketAddr, config: PortalConfig) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        nfse_faturamento::serve(listener, FaturamentoClient::new(config)).await
    })
}

fn portal_config(cli: &Cli) -> PortalConfig {
    let config = PortalConfig::default()
        .with_base_url(cli.portal_url.clone())
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    match &cli.scratch_dir {
        Some(dir) => config.with_scratch_dir(dir.clone()),
        None => config,
    }
}

fn run(cli: &Cli) -> Result<String, FaturamentoError> {
    let request = build_request(cli)?;
    let result = FaturamentoClient::new(portal_config(cli)).fetch(&request)?;
    serde_json::to_string_pretty(&result).map_err(|e| FaturamentoError::Unclassified(e.to_string()))
}

fn build_request(cli: &Cli) -> Result<FaturamentoRequest, FaturamentoError> {
    if let Some(path) = &cli.request {
        let body = read_input(path).map_err(invalid)?;
        return serde_json::from_str(&body).map_err(invalid);
    }

    let (Some(pfx), Some(year)) = (&cli.pfx, &cli.year) else {
        return Err(FaturamentoError::InvalidRequest(
            "use --request or --pfx with --year".into(),
        ));
    };
    let bundle = fs::read(pfx).map_err(invalid)?;
    Ok(FaturamentoRequest {
        certificado_base64: STANDARD.encode(bundle),
        senha_certificado: cli.password.clone().unwrap_or_default(),
        ano: year.clone(),
        mes: cli.month.clone(),
    })
}

fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut body = String::new();
        io::stdin().read_to_string(&mut body)?;
        Ok(body)
    } else {
        fs::read_to_string(path)
    }
}

fn invalid(err: impl std::fmt::Display) -> FaturamentoError {
    FaturamentoError::InvalidRequest(err.to_string())
}

const fn exit_code(err: &FaturamentoError) -> u8 {
    match err {
        FaturamentoError::InvalidRequest(_) => 2,
        FaturamentoError::AuthenticationFailed => 3,
        FaturamentoError::Unclassified(_) => 1,
    }
}
