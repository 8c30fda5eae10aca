use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vendor_portal::models::VendorId;
use vendor_portal::{ApiService, HttpClient, PdfDownload, Settings, VendorService};

#[derive(Parser, Debug)]
#[command(name = "vendor-portal", about = "SAP vendor portal client")]
struct Cli {
    /// Configuration file, without extension
    #[arg(long, global = true, default_value = "config/default")]
    config: String,

    /// Six-digit SAP vendor number
    #[arg(long, short = 'v', global = true)]
    vendor: Option<VendorId>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check vendor credentials against SAP
    Login {
        #[arg(long, env = "VENDOR_PASSWORD")]
        password: String,
    },
    /// Purchase orders with delivery status
    Orders,
    /// Requests for quotation with days open
    Rfqs,
    /// Goods receipts, newest first
    Receipts,
    /// Invoices with aging, most overdue first
    Invoices,
    /// Debit and credit memos
    Memos,
    /// Invoices, memos and payable totals
    Finance,
    /// Vendor master data
    Profile,
    /// Record counts per section
    Dashboard,
    /// Download an invoice PDF
    Pdf {
        invoice_no: String,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_file(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config))?;

    info!(base_url = %settings.sap.base_url, client = %settings.sap.client, "Starting vendor portal");

    let transport = Arc::new(HttpClient::new(&settings)?);
    let service = VendorService::new(ApiService::new(transport));

    let vendor = cli.vendor.context("--vendor is required")?;

    match cli.command {
        Command::Login { password } => {
            print_json(&service.login(vendor.as_str(), &password).await?)?
        }
        Command::Orders => print_json(&service.purchase_orders(&vendor).await?)?,
        Command::Rfqs => print_json(&service.rfqs(&vendor).await?)?,
        Command::Receipts => print_json(&service.goods_receipts(&vendor).await?)?,
        Command::Invoices => print_json(&service.invoices(&vendor).await?)?,
        Command::Memos => print_json(&service.memos(&vendor).await?)?,
        Command::Finance => print_json(&service.finance_overview(&vendor).await?)?,
        Command::Profile => print_json(&service.profile(&vendor).await?)?,
        Command::Dashboard => print_json(&service.dashboard(&vendor).await)?,
        Command::Pdf { invoice_no, out } => {
            match service.download_invoice_pdf(&vendor, &invoice_no).await? {
                PdfDownload::Ready(pdf) => {
                    let path = pdf.save_to(&out).await?;
                    info!(path = %path.display(), size_kb = pdf.size_kb(), "Saved invoice PDF");
                }
                PdfDownload::Unavailable { reason } => {
                    anyhow::bail!(
                        "PDF not available for invoice {invoice_no}: {}",
                        reason.as_deref().unwrap_or("no document stored")
                    );
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn every_subcommand_has_help_text() {
        let command = Cli::command();
        command.clone().debug_assert();

        for sub in command.get_subcommands() {
            assert!(sub.get_about().is_some(), "{} has no help", sub.get_name());
        }
    }

    #[test]
    fn vendor_is_validated_while_parsing() {
        assert!(Cli::try_parse_from(["vendor-portal", "--vendor", "100863", "profile"]).is_ok());
        assert!(Cli::try_parse_from(["vendor-portal", "--vendor", "12ab", "profile"]).is_err());
    }
}
