use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::client::ApiClient;

#[derive(Clone, Parser)]
pub struct UploadParams {
    /// PEM file to upload
    #[clap(short, long)]
    pub file: PathBuf,
}

pub async fn upload(client: &ApiClient, UploadParams { file }: UploadParams) -> anyhow::Result<()> {
    let pem = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    client.upload(pem).await?;
    println!("Uploaded {}", file.display());

    Ok(())
}
