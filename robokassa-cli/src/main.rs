//! Command-line caller for the Robokassa gateway client.
//!
//! Loads a TOML configuration, initialises logging, runs one gateway operation
//! and prints the outcome to stdout. Logs go to stderr.

#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and quick-xml"
)]

mod observability;

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use observability::{LogFormat, init_observability};
use robokassa::{
    Account, GatewayClient, GatewayConfig, Result,
    gateway::{CallbackParams, PaymentInfo, PaymentRequest, PaymentResult, RecurringPaymentRequest},
};
use rust_decimal::Decimal;
use tracing::error;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gateway configuration file (TOML)
    #[arg(long, short)]
    config: PathBuf,

    /// Credential set to use instead of the configured default
    #[arg(long, short)]
    account: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a payment and print its payment link
    Create {
        /// Merchant invoice id
        #[arg(long)]
        invoice_id: i64,
        /// Amount in major currency units, e.g. 149.90
        #[arg(long)]
        amount: Decimal,
        /// Description shown to the payer
        #[arg(long, default_value = "")]
        description: String,
        /// Register the payment as a parent for recurring charges
        #[arg(long)]
        recurring: bool,
        /// Payment page language
        #[arg(long)]
        culture: Option<String>,
    },
    /// Query the state of a payment
    Status {
        /// Merchant invoice id
        invoice_id: i64,
    },
    /// Charge a previously paid invoice again
    Recurring {
        /// New invoice id
        #[arg(long)]
        invoice_id: i64,
        /// Parent invoice id
        #[arg(long)]
        previous_invoice_id: i64,
        /// Amount in major currency units
        #[arg(long)]
        amount: Decimal,
        /// Description shown to the payer
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Verify a form-encoded Result URL callback and print the acknowledgement
    Verify {
        /// Callback body, e.g. `OutSum=100.000000&InvId=1&SignatureValue=...`
        body: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_observability(LogFormat::from_env());
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let config = GatewayConfig::from_file(&cli.config)?;
    let client = GatewayClient::new(config)?;
    let account = match &cli.account {
        Some(label) => client.account(label)?,
        None => client.default_account()?,
    };

    execute(account, cli.command).await
}

async fn execute(account: Account<'_>, command: Command) -> Result<String> {
    match command {
        Command::Create { invoice_id, amount, description, recurring, culture } => {
            let mut request = PaymentRequest::new(invoice_id, amount, description);
            request.recurring = recurring;
            request.culture = culture;
            account.create_payment(&request).await.map(|result| render_payment(&result))
        }
        Command::Status { invoice_id } => {
            account.get_payment_info(invoice_id).await.map(|info| render_status(&info))
        }
        Command::Recurring { invoice_id, previous_invoice_id, amount, description } => {
            let request =
                RecurringPaymentRequest::new(invoice_id, previous_invoice_id, amount, description);
            account.recurrent_payment(&request).await.map(|result| render_payment(&result))
        }
        Command::Verify { body } => {
            let params = CallbackParams::from_form(&body)?;
            Ok(if account.verify_callback(&params) {
                params.ack()
            } else {
                "bad sign".to_owned()
            })
        }
    }
}

fn render_payment(result: &PaymentResult) -> String {
    if result.is_success() {
        format!(
            "invoice: {}\nlink: {}",
            result.invoice_id.as_deref().unwrap_or("-"),
            result.link.as_deref().unwrap_or("-")
        )
    } else {
        format!(
            "rejected: {}\ngateway message: {}",
            result.error,
            result.gateway_message.as_deref().unwrap_or("-")
        )
    }
}

fn render_status(info: &PaymentInfo) -> String {
    let status = &info.status;
    if !status.is_found() {
        return format!("query failed: code {} {}", status.result.code, status.result.description);
    }

    let mut lines = Vec::new();
    if let Some(state) = &status.state {
        lines.push(format!("state: {} (changed {})", state.code, state.state_date));
    }
    if let Some(details) = &status.info {
        lines.push(format!("paid: {} {}", details.inc_sum, details.inc_curr_label));
        lines.push(format!("credited: {} {}", details.out_sum, details.out_curr_label));
    }
    for field in &status.user_fields.fields {
        lines.push(format!("{}: {}", field.name, field.value));
    }
    lines.join("\n")
}
