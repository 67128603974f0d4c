//! Gateway settings.
//!
//! Page sizes are per resource kind. Transactions are the only kind large
//! enough to warrant a bigger page, and balances are few per account.

use crate::domain::resources::ResourceKind;
use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TRANSACTIONS_PAGE_SIZE: usize = 120;
pub const DEFAULT_BALANCES_PAGE_SIZE: usize = 10;
pub const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub transactions_page_size: usize,
    pub balances_page_size: usize,
    pub default_page_size: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            transactions_page_size: DEFAULT_TRANSACTIONS_PAGE_SIZE,
            balances_page_size: DEFAULT_BALANCES_PAGE_SIZE,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl GatewayConfig {
    /// Builds a config, rejecting zero page sizes.
    pub fn try_new(
        transactions_page_size: usize,
        balances_page_size: usize,
        default_page_size: usize,
    ) -> Result<Self> {
        for (name, size) in [
            ("transactions_page_size", transactions_page_size),
            ("balances_page_size", balances_page_size),
            ("default_page_size", default_page_size),
        ] {
            if size == 0 {
                return Err(GatewayError::ValidationError(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }
        Ok(Self {
            transactions_page_size,
            balances_page_size,
            default_page_size,
        })
    }

    pub fn page_size_for(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Transaction => self.transactions_page_size,
            ResourceKind::Balance => self.balances_page_size,
            _ => self.default_page_size,
        }
    }
}
