//! Application state shared across handlers

use std::sync::Arc;

use heirswitch_core::{ContentStore, InMemoryContentStore, RegistryConfig, SwitchRegistry};
use heirswitch_ledger::{FungibleLedger, TokenLedger};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Switch registry
    pub registry: Arc<SwitchRegistry>,
    /// Ledger the registry escrows on
    pub ledger: Arc<dyn FungibleLedger>,
    /// Off-chain message store
    pub content: Arc<dyn ContentStore>,
}

impl AppState {
    /// Build state around an existing ledger and content store
    pub fn new(
        ledger: Arc<dyn FungibleLedger>,
        content: Arc<dyn ContentStore>,
        config: RegistryConfig,
    ) -> Self {
        let registry = Arc::new(SwitchRegistry::new(ledger.clone(), config));
        Self::from_parts(registry, ledger, content)
    }

    pub fn from_parts(
        registry: Arc<SwitchRegistry>,
        ledger: Arc<dyn FungibleLedger>,
        content: Arc<dyn ContentStore>,
    ) -> Self {
        Self {
            registry,
            ledger,
            content,
        }
    }

    /// In-memory ledger and content store with default registry settings
    pub fn in_memory(ledger: TokenLedger) -> Self {
        Self::new(
            Arc::new(ledger),
            Arc::new(InMemoryContentStore::new()),
            RegistryConfig::default(),
        )
    }
}
