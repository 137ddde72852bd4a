//! Resolution of the active display currency.

use bizdesk_common::Currency;
use serde::{Deserialize, Serialize};

use crate::error::{FxError, FxResult};
use crate::settings::SettingsReceiver;

/// Where the active display currency came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreferenceSource {
    /// Tenant settings record.
    Tenant,
    /// The signed-in user's own preference.
    User,
    /// Nothing configured; reference currency.
    Default,
}

/// Display-currency preference: tenant subscription, then user, then USD.
#[derive(Debug, Default)]
pub struct CurrencyPreference {
    tenant: Option<SettingsReceiver>,
    /// Tenant currency read before the subscription delivered a record.
    seed: Option<Currency>,
    user: Option<Currency>,
}

impl CurrencyPreference {
    /// Preference with no tenant and no user currency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user-level fallback currency.
    pub fn with_user_currency(mut self, currency: Option<Currency>) -> Self {
        self.user = currency;
        self
    }

    /// Follow a tenant's settings subscription.
    pub fn with_tenant(mut self, receiver: SettingsReceiver) -> Self {
        self.tenant = Some(receiver);
        self
    }

    /// Replace the tenant subscription.
    pub fn attach(&mut self, receiver: SettingsReceiver) {
        self.attach_seeded(receiver, None);
    }

    /// Replace the tenant subscription, using `seed` as the tenant currency
    /// until the subscription carries a settings record.
    pub fn attach_seeded(&mut self, receiver: SettingsReceiver, seed: Option<Currency>) {
        self.tenant = Some(receiver);
        self.seed = seed;
    }

    /// Stop following the tenant; drops the subscription.
    pub fn detach(&mut self) {
        self.tenant = None;
        self.seed = None;
    }

    /// Whether a tenant subscription is attached.
    pub fn is_attached(&self) -> bool {
        self.tenant.is_some()
    }

    /// The currency currently in effect.
    pub fn current(&self) -> Currency {
        self.resolve().0
    }

    /// Which level of the fallback chain is in effect.
    pub fn source(&self) -> PreferenceSource {
        self.resolve().1
    }

    /// Wait for the tenant's settings to change, returning the new currency.
    pub async fn changed(&mut self) -> FxResult<Currency> {
        let receiver = self.tenant.as_mut().ok_or(FxError::NotSubscribed)?;
        receiver
            .changed()
            .await
            .map_err(|_| FxError::SubscriptionClosed)?;
        Ok(self.current())
    }

    fn tenant_currency(&self) -> Option<Currency> {
        let receiver = self.tenant.as_ref()?;
        let settings = receiver.borrow();
        match settings.as_ref() {
            Some(settings) => settings.currency(),
            None => self.seed.clone(),
        }
    }

    fn resolve(&self) -> (Currency, PreferenceSource) {
        if let Some(currency) = self.tenant_currency() {
            return (currency, PreferenceSource::Tenant);
        }
        if let Some(currency) = &self.user {
            return (currency.clone(), PreferenceSource::User);
        }
        (Currency::default(), PreferenceSource::Default)
    }
}
