//! Bizdesk Common Types
//!
//! Shared types used across the Bizdesk workspace: tenant and record
//! identifiers, currency and monetary amounts, and the parsing step that turns
//! loosely-typed stored amounts into decimals.

pub mod amount;
pub mod error;
pub mod identifiers;
pub mod monetary;

pub use amount::*;
pub use error::*;
pub use identifiers::*;
pub use monetary::*;
