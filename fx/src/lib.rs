//! Bizdesk FX
//!
//! Currency normalization for financial dashboards: converts monetary amounts
//! between currencies through a reference-anchored rate table and renders them
//! in a tenant's display currency.
//!
//! # Features
//!
//! - Injected exchange-rate table anchored to USD
//! - Pure conversion and formatting over an explicit [`CurrencyContext`]
//! - Target-currency resolution (tenant, then user, then USD)
//! - Live tenant preference updates through a [`SettingsSource`]
//!
//! # Example
//!
//! ```rust,ignore
//! use bizdesk_fx::{CurrencyNormalizer, ExchangeRateTable, InMemorySettingsStore};
//! use bizdesk_common::{Currency, TenantId};
//!
//! let store = InMemorySettingsStore::new("memory");
//! store.update_currency(&TenantId::new("acme"), "EUR")?;
//!
//! let mut normalizer = CurrencyNormalizer::new(ExchangeRateTable::default_rates());
//! normalizer.attach_tenant(&store, &TenantId::new("acme")).await?;
//!
//! let label = normalizer.format(dec!(100), Some(&Currency::usd()));
//! ```

pub mod context;
pub mod error;
pub mod format;
pub mod normalizer;
pub mod preference;
pub mod rates;
pub mod settings;

pub use context::CurrencyContext;
pub use error::{FxError, FxResult};
pub use format::format_amount;
pub use normalizer::CurrencyNormalizer;
pub use preference::{CurrencyPreference, PreferenceSource};
pub use rates::ExchangeRateTable;
pub use settings::{InMemorySettingsStore, SettingsReceiver, SettingsSource, TenantSettings};
