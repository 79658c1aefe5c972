use anyhow::{Context, Result, bail};
use config::FileOrString;
use reqwest::{Certificate, ClientBuilder};

/// Parses a CA bundle given as a path or inline PEM.
///
/// Blank content means no custom CA and yields `None`.
pub fn load_ca(value: &FileOrString) -> Result<Option<Vec<Certificate>>> {
    let pem = value
        .bytes()
        .with_context(|| format!("failed to read CA certificate {}", value.0))?;

    if pem.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let certificates =
        Certificate::from_pem_bundle(&pem).context("failed to parse CA certificate")?;
    if certificates.is_empty() {
        bail!("no PEM certificate found in CA certificate {}", value.0);
    }

    Ok(Some(certificates))
}

pub fn client_builder(ca: &FileOrString) -> Result<ClientBuilder> {
    Ok(with_roots(reqwest::Client::builder(), load_ca(ca)?))
}

pub fn with_roots(
    mut builder: ClientBuilder,
    certificates: Option<Vec<Certificate>>
) -> ClientBuilder {
    for certificate in certificates.into_iter().flatten() {
        builder = builder.add_root_certificate(certificate);
    }
    builder
}
