//! Relay CLI
//!
//! Command-line interface for the sign-in & payment relay.

use anyhow::Result;
use clap::{Parser, Subcommand};

use relay_client::RelayClient;
use relay_types::InitializePaymentRequest;

#[derive(Parser)]
#[command(name = "relay")]
#[command(author, version, about = "Sign-in & payment relay CLI client", long_about = None)]
struct Cli {
    /// Base URL of the relay
    #[arg(long, env = "RELAY_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the endpoint listing
    Info,
    /// Verify a Google ID token and print the claims
    SignIn {
        /// Google ID token
        token: String,
    },
    /// Payment operations
    Pay {
        #[command(subcommand)]
        action: PayCommands,
    },
}

#[derive(Subcommand)]
enum PayCommands {
    /// Initialize a payment and print the checkout URL
    Init {
        #[arg(long)]
        email: String,
        /// Amount in major units, e.g. 19.99
        #[arg(long)]
        amount: String,
        #[arg(long)]
        currency: Option<String>,
        /// Metadata as a JSON object
        #[arg(long, value_parser = parse_metadata)]
        metadata: Option<serde_json::Value>,
        #[arg(long)]
        reference: Option<String>,
    },
    /// Verify a payment by reference
    Verify {
        reference: String,
    },
}

fn parse_metadata(s: &str) -> Result<serde_json::Value> {
    let value: serde_json::Value = serde_json::from_str(s)
        .map_err(|e| anyhow::anyhow!("Metadata is not valid JSON: {}", e))?;
    if !value.is_object() {
        anyhow::bail!("Metadata must be a JSON object");
    }
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = RelayClient::new(&cli.api_url);

    match cli.command {
        Commands::Info => {
            let listing = client.index().await?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }

        Commands::SignIn { token } => {
            let claims = client.google_sign_in(&token).await?;
            println!("{}", serde_json::to_string_pretty(&claims)?);
        }

        Commands::Pay { action } => match action {
            PayCommands::Init {
                email,
                amount,
                currency,
                metadata,
                reference,
            } => {
                let req = InitializePaymentRequest {
                    email: Some(email),
                    amount: Some(serde_json::Value::String(amount)),
                    currency,
                    metadata,
                    reference,
                    callback_url: None,
                };
                let init = client.initialize_payment(&req).await?;
                println!("{}", serde_json::to_string_pretty(&init)?);
            }
            PayCommands::Verify { reference } => {
                let record = client.verify_payment(&reference).await?;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
        },
    }

    Ok(())
}
