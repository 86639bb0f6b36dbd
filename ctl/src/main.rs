use clap::{Parser, Subcommand};

use crate::{
    client::ApiClient,
    commands::{FetchParams, MintTokenParams, SyncParams, UploadParams},
};

mod client;
mod commands;

#[derive(Parser)]
#[command(name = "certboxctl", version, about = "Upload and look up certificates in certbox")]
pub struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(
        long,
        global = true,
        env = "CERTBOX_API_URL",
        default_value = "http://localhost:4000"
    )]
    api_url: String,

    /// Bearer token identifying you to the API.
    #[arg(long, global = true, env = "CERTBOX_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Clone, Subcommand)]
pub enum Command {
    /// Store a PEM certificate as your latest certificate
    Upload(UploadParams),

    /// Print the latest certificate for an account
    Fetch(FetchParams),

    /// Upload a certificate only if the stored one differs
    Sync(SyncParams),

    /// Mint an HS256 development token
    #[command(name = "mint-token")]
    MintToken(MintTokenParams),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let client = ApiClient::new(args.api_url, args.token)?;

    match args.command {
        Command::Upload(params) => commands::upload(&client, params).await,
        Command::Fetch(params) => commands::fetch(&client, params).await,
        Command::Sync(params) => commands::sync(&client, params).await,
        Command::MintToken(params) => {
            println!("{}", commands::mint_token(params)?);
            Ok(())
        }
    }
}
