//! Bizdesk Dashboard
//!
//! Prints a tenant's finance dashboard with every figure normalized into the
//! tenant's display currency.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bizdesk_common::{Currency, TenantId};
use bizdesk_fx::{
    format_amount, CurrencyNormalizer, ExchangeRateTable, InMemorySettingsStore, TenantSettings,
};
use bizdesk_reports::{
    expense_totals_by_category, pipeline_value_by_stage, DashboardSummary, RecordSet,
};

mod config;

use config::{DashboardConfig, LogFormat};

/// Bizdesk finance dashboard CLI
#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(about = "Summarize invoices, expenses and leads in one currency")]
struct Args {
    /// Records file (JSON with invoices, expenses and leads)
    #[arg(short, long)]
    records: Option<PathBuf>,

    /// Rate table file (JSON object of code to rate against USD)
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Tenant identifier
    #[arg(short, long)]
    tenant: Option<String>,

    /// Display currency stored in the tenant's settings
    #[arg(long)]
    tenant_currency: Option<String>,

    /// User-level fallback display currency
    #[arg(long)]
    user_currency: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn apply(self, mut config: DashboardConfig) -> (DashboardConfig, bool) {
        if let Some(path) = self.records {
            config.records_path = Some(path);
        }
        if let Some(path) = self.rates {
            config.rates_path = Some(path);
        }
        if let Some(tenant) = self.tenant {
            config.tenant = TenantId::new(tenant);
        }
        if let Some(code) = self.tenant_currency {
            config.tenant_currency = Currency::parse(&code);
        }
        if let Some(code) = self.user_currency {
            config.user_currency = Currency::parse(&code);
        }
        (config, self.json)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, json_output) = Args::parse().apply(DashboardConfig::from_env());

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    );
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let rates = match &config.rates_path {
        Some(path) => ExchangeRateTable::from_path(path)?,
        None => ExchangeRateTable::default_rates(),
    };
    info!(currencies = rates.len(), "Rate table ready");

    let records_path = config.require_records_path().map_err(anyhow::Error::msg)?;
    let records = RecordSet::from_path(records_path)?;
    info!(
        invoices = records.invoices.len(),
        expenses = records.expenses.len(),
        leads = records.leads.len(),
        "Records loaded"
    );

    let store = InMemorySettingsStore::new("local");
    if let Some(currency) = &config.tenant_currency {
        store.put(&config.tenant, TenantSettings::with_currency(currency.code()))?;
    }

    let mut normalizer =
        CurrencyNormalizer::new(rates).with_user_currency(config.user_currency.clone());
    normalizer.attach_tenant(&store, &config.tenant).await?;

    let ctx = normalizer.context();
    let summary = DashboardSummary::compute(&records, &ctx);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "Dashboard for {} ({}, from {:?} preference)",
        config.tenant,
        ctx.target(),
        normalizer.preference_source()
    );
    for (label, value) in summary.headline() {
        println!("  {:<14} {}", label, value);
    }

    if !summary.monthly.is_empty() {
        println!("\nMonthly");
        for month in &summary.monthly {
            println!(
                "  {}  revenue {:>14}  expenses {:>14}  profit {:>14}",
                month.month,
                format_amount(month.revenue, ctx.target()),
                format_amount(month.expenses, ctx.target()),
                format_amount(month.profit(), ctx.target()),
            );
        }
    }

    let categories = expense_totals_by_category(&records.expenses, &ctx);
    if !categories.is_empty() {
        println!("\nExpenses by category");
        for (category, amount) in &categories {
            println!("  {:<14} {}", category, format_amount(*amount, ctx.target()));
        }
    }

    let stages = pipeline_value_by_stage(&records.leads, &ctx);
    if !stages.is_empty() {
        println!("\nPipeline by stage");
        for (stage, amount) in &stages {
            println!("  {:<14} {}", format!("{:?}", stage), format_amount(*amount, ctx.target()));
        }
    }

    Ok(())
}
