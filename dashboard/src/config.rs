//! Dashboard configuration.

use std::path::{Path, PathBuf};

use bizdesk_common::{Currency, TenantId};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Main dashboard configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// JSON document with invoices, expenses and leads.
    pub records_path: Option<PathBuf>,
    /// JSON rate table; built-in rates when unset.
    pub rates_path: Option<PathBuf>,
    /// Tenant whose settings drive the display currency.
    pub tenant: TenantId,
    /// Currency stored in the tenant's settings record.
    pub tenant_currency: Option<Currency>,
    /// User-level fallback currency.
    pub user_currency: Option<Currency>,
    /// Log format.
    pub log_format: LogFormat,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            records_path: None,
            rates_path: None,
            tenant: TenantId::new("default"),
            tenant_currency: None,
            user_currency: None,
            log_format: LogFormat::Text,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("BIZDESK_RECORDS_PATH") {
            config.records_path = Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("BIZDESK_RATES_PATH") {
            config.rates_path = Some(PathBuf::from(path));
        }

        if let Ok(tenant) = std::env::var("BIZDESK_TENANT") {
            config.tenant = TenantId::new(tenant);
        }

        if let Ok(code) = std::env::var("BIZDESK_USER_CURRENCY") {
            config.user_currency = Currency::parse(&code);
        }

        if let Ok(format) = std::env::var("BIZDESK_LOG_FORMAT") {
            if format.eq_ignore_ascii_case("json") {
                config.log_format = LogFormat::Json;
            }
        }

        config
    }

    /// The records file, which every run needs.
    pub fn require_records_path(&self) -> Result<&Path, String> {
        self.records_path
            .as_deref()
            .ok_or_else(|| "Records path must be set".to_string())
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.require_records_path()?;

        if !self.tenant.is_valid() {
            return Err(format!("Invalid tenant id: {:?}", self.tenant.as_str()));
        }

        for currency in [&self.tenant_currency, &self.user_currency].into_iter().flatten() {
            let code = currency.code();
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(format!("Invalid currency code: {}", code));
            }
        }

        Ok(())
    }
}
