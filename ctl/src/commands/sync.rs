use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::client::ApiClient;

#[derive(Clone, Parser)]
pub struct SyncParams {
    /// Local PEM certificate that should be the stored one
    #[clap(short, long)]
    pub file: PathBuf,
}

pub async fn sync(client: &ApiClient, SyncParams { file }: SyncParams) -> anyhow::Result<()> {
    let local = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let stored = client.fetch(None).await?;
    if !needs_upload(stored.as_deref(), &local) {
        println!("Stored certificate is up to date");
        return Ok(());
    }

    client.upload(local).await?;
    println!("Uploaded {}", file.display());

    Ok(())
}

/// Whether the stored certificate differs from the local one, ignoring
/// trailing whitespace and line ending style.
fn needs_upload(stored: Option<&str>, local: &str) -> bool {
    let normalize = |pem: &str| -> Vec<String> {
        pem.lines()
            .map(|l| l.trim_end().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    };

    match stored {
        Some(stored) => normalize(stored) != normalize(local),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEM: &str = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";

    #[test]
    fn uploads_when_nothing_stored() {
        assert!(needs_upload(None, PEM));
    }

    #[test]
    fn identical_certificate_is_skipped() {
        assert!(!needs_upload(Some(PEM), PEM));
    }

    #[test]
    fn line_endings_do_not_matter() {
        let crlf = PEM.replace('\n', "\r\n");
        assert!(!needs_upload(Some(&crlf), PEM));
    }

    #[test]
    fn different_certificate_is_uploaded() {
        let other = PEM.replace("MIIB", "MIIC");
        assert!(needs_upload(Some(&other), PEM));
    }
}
