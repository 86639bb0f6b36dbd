use clap::Parser;

use crate::client::ApiClient;

#[derive(Clone, Parser)]
pub struct FetchParams {
    /// Account to look up; defaults to the token's account
    #[clap(short, long)]
    pub email: Option<String>,
}

pub async fn fetch(client: &ApiClient, FetchParams { email }: FetchParams) -> anyhow::Result<()> {
    match client.fetch(email.as_deref()).await? {
        Some(cert) => {
            print!("{cert}");
            Ok(())
        }
        None => anyhow::bail!(
            "no certificate stored for {}",
            email.as_deref().unwrap_or("this account")
        ),
    }
}
