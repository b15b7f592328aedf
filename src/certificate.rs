//! Certificado A1 (PKCS#12) e o material temporário exigido pelo transporte.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use p12_keystore::KeyStore;
use pem::Pem;
use tempfile::TempDir;

use crate::error::LoginFailure;

const CERT_FILE: &str = "cert.pem";
const KEY_FILE: &str = "key.pem";

/// Certificado do cliente e sua chave privada, em DER.
#[derive(Clone)]
pub struct CertificateIdentity {
    certificate: Vec<u8>,
    chain: Vec<Vec<u8>>,
    private_key: Vec<u8>,
}

impl std::fmt::Debug for CertificateIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateIdentity")
            .field("certificate_len", &self.certificate.len())
            .field("chain_len", &self.chain.len())
            .finish_non_exhaustive()
    }
}

impl CertificateIdentity {
    /// Decodifica um pacote PKCS#12 em base64. Quebras de linha são ignoradas.
    pub fn from_base64(encoded: &str, password: &str) -> Result<Self, LoginFailure> {
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let der = STANDARD.decode(compact)?;
        Self::from_pkcs12(&der, password)
    }

    /// Abre um pacote PKCS#12 com a senha informada.
    ///
    /// Aceita tanto pacotes PBES2 (AES-256, MAC SHA-256) quanto os legados
    /// 3DES/SHA-1. O certificado do titular é o que compartilha o
    /// `localKeyId` da chave privada, qualquer que seja sua posição no
    /// pacote; os emissores encontrados formam a cadeia.
    pub fn from_pkcs12(der: &[u8], password: &str) -> Result<Self, LoginFailure> {
        let store = KeyStore::from_pkcs12(der, password).map_err(|err| match err {
            p12_keystore::error::Error::MacError(_) => LoginFailure::WrongPassword,
            _ => LoginFailure::Pkcs12,
        })?;
        let (_, key_chain) = store
            .private_key_chain()
            .ok_or(LoginFailure::MissingPart("private key"))?;
        let (leaf, issuers) = key_chain
            .chain()
            .split_first()
            .ok_or(LoginFailure::MissingPart("certificate"))?;

        Ok(Self {
            certificate: leaf.as_der().to_vec(),
            chain: issuers.iter().map(|cert| cert.as_der().to_vec()).collect(),
            private_key: key_chain.key().to_vec(),
        })
    }

    /// Certificado do titular, em DER.
    #[must_use]
    pub fn certificate_der(&self) -> &[u8] {
        &self.certificate
    }

    /// Certificados emissores, do intermediário à raiz, em DER.
    #[must_use]
    pub fn chain_der(&self) -> &[Vec<u8>] {
        &self.chain
    }

    /// Certificado do titular seguido da cadeia, em PEM.
    #[must_use]
    pub fn certificate_pem(&self) -> String {
        let blocks: Vec<Pem> = std::iter::once(&self.certificate)
            .chain(&self.chain)
            .map(|der| Pem::new("CERTIFICATE", der.clone()))
            .collect();
        pem::encode_many(&blocks)
    }

    /// Chave privada PKCS#8 sem criptografia, em PEM.
    #[must_use]
    pub fn private_key_pem(&self) -> String {
        pem::encode(&Pem::new("PRIVATE KEY", self.private_key.clone()))
    }
}

/// Diretório temporário com `cert.pem` e `key.pem`.
///
/// Apagado em `erase` ou ao sair de escopo; falhas na remoção são ignoradas.
#[derive(Debug)]
pub struct IdentityFiles {
    dir: TempDir,
    cert_path: PathBuf,
    key_path: PathBuf,
}

impl IdentityFiles {
    /// Grava o certificado e a chave em um diretório novo dentro de
    /// `scratch` (ou do diretório temporário do sistema).
    pub fn materialize(
        identity: &CertificateIdentity,
        scratch: Option<&Path>,
    ) -> Result<Self, LoginFailure> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("nfse-cert-");
        let dir = match scratch {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        let cert_path = dir.path().join(CERT_FILE);
        let key_path = dir.path().join(KEY_FILE);
        fs::write(&cert_path, identity.certificate_pem())?;
        fs::write(&key_path, identity.private_key_pem())?;
        log::debug!("identity material written to {}", dir.path().display());

        Ok(Self {
            dir,
            cert_path,
            key_path,
        })
    }

    /// Diretório criado para esta sessão.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Caminho de `cert.pem`.
    #[must_use]
    pub fn cert_path(&self) -> &Path {
        &self.cert_path
    }

    /// Caminho de `key.pem`.
    #[must_use]
    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    /// Lê chave e certificado num único buffer PEM.
    pub fn read_pem_bundle(&self) -> std::io::Result<Vec<u8>> {
        let mut bundle = fs::read(&self.key_path)?;
        bundle.extend(fs::read(&self.cert_path)?);
        Ok(bundle)
    }

    /// Remove o diretório agora.
    pub fn erase(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(err) = self.dir.close() {
            log::warn!("could not erase {}: {err}", path.display());
        }
    }
}
