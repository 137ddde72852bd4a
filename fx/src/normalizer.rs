//! Currency normalizer: rate table plus the live display-currency preference.

use std::sync::Arc;

use bizdesk_common::{Currency, TenantId};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::context::CurrencyContext;
use crate::error::FxResult;
use crate::preference::{CurrencyPreference, PreferenceSource};
use crate::rates::ExchangeRateTable;
use crate::settings::SettingsSource;

/// Converts and formats amounts in the active tenant's display currency.
pub struct CurrencyNormalizer {
    rates: Arc<ExchangeRateTable>,
    preference: CurrencyPreference,
}

impl CurrencyNormalizer {
    /// Create a normalizer with no tenant attached.
    pub fn new(rates: ExchangeRateTable) -> Self {
        Self {
            rates: Arc::new(rates),
            preference: CurrencyPreference::new(),
        }
    }

    /// Set the user-level fallback currency.
    pub fn with_user_currency(mut self, currency: Option<Currency>) -> Self {
        self.preference = self.preference.with_user_currency(currency);
        self
    }

    /// Read the tenant's settings once, then follow them for changes.
    #[instrument(skip(self, source), fields(source = source.name()))]
    pub async fn attach_tenant(
        &mut self,
        source: &dyn SettingsSource,
        tenant: &TenantId,
    ) -> FxResult<()> {
        let initial = source.fetch(tenant).await?;
        let seed = match &initial {
            Some(settings) => settings.currency(),
            None => {
                debug!(tenant = %tenant, "Tenant has no settings record yet");
                None
            }
        };

        let receiver = source.subscribe(tenant).await?;
        self.preference.attach_seeded(receiver, seed);

        info!(
            tenant = %tenant,
            currency = %self.preference.current(),
            from = ?self.preference.source(),
            "Following tenant currency"
        );

        Ok(())
    }

    /// Stop following the tenant.
    pub fn detach_tenant(&mut self) {
        self.preference.detach();
    }

    /// The display currency currently in effect.
    pub fn current_target_currency(&self) -> Currency {
        self.preference.current()
    }

    /// Which fallback level supplied the display currency.
    pub fn preference_source(&self) -> PreferenceSource {
        self.preference.source()
    }

    /// Snapshot for the current display currency.
    pub fn context(&self) -> CurrencyContext {
        CurrencyContext::new(self.preference.current(), Arc::clone(&self.rates))
    }

    /// Convert into the current display currency.
    pub fn convert(&self, amount: Decimal, source: Option<&Currency>) -> Decimal {
        self.context().convert(amount, source)
    }

    /// Convert and render in the current display currency.
    pub fn format(&self, amount: Decimal, source: Option<&Currency>) -> String {
        self.context().format(amount, source)
    }

    /// Wait for the tenant preference to change and return a fresh context.
    pub async fn changed(&mut self) -> FxResult<CurrencyContext> {
        let currency = self.preference.changed().await?;
        debug!(currency = %currency, "Display currency changed");
        Ok(self.context())
    }

    /// The rate table in use.
    pub fn rates(&self) -> &Arc<ExchangeRateTable> {
        &self.rates
    }
}
