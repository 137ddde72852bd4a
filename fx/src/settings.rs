//! Tenant settings source traits and implementations.

use async_trait::async_trait;
use bizdesk_common::{Currency, TenantId};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::{FxError, FxResult};

/// A tenant's settings record.
///
/// Only `currency` is interpreted here; every other key is carried through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantSettings {
    /// Preferred display currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Remaining fields of the record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TenantSettings {
    /// Settings carrying only a currency preference.
    pub fn with_currency(code: impl Into<String>) -> Self {
        Self {
            currency: Some(code.into()),
            extra: Map::new(),
        }
    }

    /// The preferred currency, if set to a non-blank code.
    pub fn currency(&self) -> Option<Currency> {
        self.currency.as_deref().and_then(Currency::parse)
    }
}

/// Snapshot stream of a tenant's settings; `None` while no record exists.
pub type SettingsReceiver = watch::Receiver<Option<TenantSettings>>;

/// Trait for stores that own tenant settings records.
#[async_trait]
pub trait SettingsSource: Send + Sync {
    /// Get the source name.
    fn name(&self) -> &str;

    /// Read the current settings record for a tenant.
    async fn fetch(&self, tenant: &TenantId) -> FxResult<Option<TenantSettings>>;

    /// Observe a tenant's settings; the receiver sees every later change.
    async fn subscribe(&self, tenant: &TenantId) -> FxResult<SettingsReceiver>;
}

/// Settings store held in process memory.
pub struct InMemorySettingsStore {
    name: String,
    tenants: DashMap<TenantId, watch::Sender<Option<TenantSettings>>>,
}

impl InMemorySettingsStore {
    /// Create an empty store.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tenants: DashMap::new(),
        }
    }

    /// Replace a tenant's settings record, notifying subscribers.
    pub fn put(&self, tenant: &TenantId, settings: TenantSettings) -> FxResult<()> {
        Self::validate(tenant)?;

        debug!(tenant = %tenant, currency = ?settings.currency, "Settings updated");
        self.sender(tenant).send_replace(Some(settings));
        Ok(())
    }

    /// Change only the currency field, keeping other settings.
    pub fn update_currency(&self, tenant: &TenantId, code: &str) -> FxResult<()> {
        Self::validate(tenant)?;

        let code = code.to_string();
        self.sender(tenant).send_modify(|current| {
            let settings = current.get_or_insert_with(TenantSettings::default);
            settings.currency = Some(code.clone());
        });

        info!(tenant = %tenant, currency = %code, "Tenant currency changed");
        Ok(())
    }

    /// Delete a tenant's settings record; subscribers observe `None`.
    pub fn remove(&self, tenant: &TenantId) {
        if let Some(sender) = self.tenants.get(tenant) {
            sender.send_replace(None);
        }
    }

    /// Number of tenants known to the store.
    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }

    fn sender(
        &self,
        tenant: &TenantId,
    ) -> dashmap::mapref::one::RefMut<'_, TenantId, watch::Sender<Option<TenantSettings>>> {
        self.tenants
            .entry(tenant.clone())
            .or_insert_with(|| watch::channel(None).0)
    }

    fn validate(tenant: &TenantId) -> FxResult<()> {
        if tenant.is_valid() {
            Ok(())
        } else {
            Err(FxError::InvalidTenant(tenant.clone()))
        }
    }
}

#[async_trait]
impl SettingsSource for InMemorySettingsStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, tenant: &TenantId) -> FxResult<Option<TenantSettings>> {
        Self::validate(tenant)?;
        let settings = match self.tenants.get(tenant) {
            Some(sender) => sender.borrow().clone(),
            None => None,
        };
        Ok(settings)
    }

    async fn subscribe(&self, tenant: &TenantId) -> FxResult<SettingsReceiver> {
        Self::validate(tenant)?;
        Ok(self.sender(tenant).subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settings_keep_unknown_fields() {
        let settings: TenantSettings =
            serde_json::from_value(json!({"currency": "eur", "name": "Acme", "timezone": "UTC"}))
                .unwrap();

        assert_eq!(settings.currency(), Some(Currency::eur()));
        assert_eq!(settings.extra.get("name"), Some(&json!("Acme")));

        let back = serde_json::to_value(&settings).unwrap();
        assert_eq!(back["timezone"], json!("UTC"));
    }

    #[test]
    fn test_blank_currency_is_unset() {
        assert_eq!(TenantSettings::with_currency("  ").currency(), None);
        assert_eq!(TenantSettings::default().currency(), None);
    }

    #[tokio::test]
    async fn test_fetch_unknown_tenant() {
        let store = InMemorySettingsStore::new("memory");

        let settings = store.fetch(&TenantId::new("acme")).await.unwrap();

        assert!(settings.is_none());
    }

    #[tokio::test]
    async fn test_put_and_fetch() {
        let store = InMemorySettingsStore::new("memory");
        let tenant = TenantId::new("acme");

        store.put(&tenant, TenantSettings::with_currency("GBP")).unwrap();

        let settings = store.fetch(&tenant).await.unwrap().unwrap();
        assert_eq!(settings.currency(), Some(Currency::gbp()));
    }

    #[tokio::test]
    async fn test_subscriber_sees_updates() {
        let store = InMemorySettingsStore::new("memory");
        let tenant = TenantId::new("acme");

        let mut rx = store.subscribe(&tenant).await.unwrap();
        assert!(rx.borrow().is_none());

        store.update_currency(&tenant, "EUR").unwrap();
        rx.changed().await.unwrap();

        let currency = rx.borrow().as_ref().and_then(|s| s.currency());
        assert_eq!(currency, Some(Currency::eur()));
    }

    #[tokio::test]
    async fn test_update_currency_keeps_other_fields() {
        let store = InMemorySettingsStore::new("memory");
        let tenant = TenantId::new("acme");

        let mut settings = TenantSettings::with_currency("USD");
        settings.extra.insert("name".into(), json!("Acme"));
        store.put(&tenant, settings).unwrap();
        store.update_currency(&tenant, "JPY").unwrap();

        let settings = store.fetch(&tenant).await.unwrap().unwrap();
        assert_eq!(settings.currency(), Some(Currency::jpy()));
        assert_eq!(settings.extra.get("name"), Some(&json!("Acme")));
    }

    #[tokio::test]
    async fn test_remove_notifies_none() {
        let store = InMemorySettingsStore::new("memory");
        let tenant = TenantId::new("acme");
        store.update_currency(&tenant, "EUR").unwrap();

        let mut rx = store.subscribe(&tenant).await.unwrap();
        store.remove(&tenant);
        rx.changed().await.unwrap();

        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn test_invalid_tenant_rejected() {
        let store = InMemorySettingsStore::new("memory");
        let tenant = TenantId::new("");

        assert!(matches!(
            store.subscribe(&tenant).await,
            Err(FxError::InvalidTenant(_))
        ));
        assert!(store.update_currency(&tenant, "EUR").is_err());
        assert!(store.is_empty());
    }
}
