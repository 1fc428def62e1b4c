//! In-memory token store for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::RwLock;

use super::kind::TokenKind;
use super::TokenStore;

/// Token store with no durable mirror.
#[derive(Default)]
pub struct MemoryTokenStore {
    values: RwLock<HashMap<TokenKind, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&kind)
            .cloned()
    }

    fn set(&self, kind: TokenKind, value: Option<String>) {
        let mut values = self
            .values
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match value {
            Some(value) => {
                values.insert(kind, value);
            }
            None => {
                values.remove(&kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderKind;

    #[test]
    fn test_set_and_clear_all() {
        let store = MemoryTokenStore::new();
        store.set(TokenKind::SessionBearer, Some("S".to_string()));
        store.set_pair(ProviderKind::Zoom, "A".to_string(), Some("R".to_string()));

        assert_eq!(store.access_token(ProviderKind::Zoom), Some("A".to_string()));
        assert_eq!(store.refresh_token(ProviderKind::Zoom), Some("R".to_string()));

        store.clear_all();
        for kind in TokenKind::ALL {
            assert_eq!(store.get(kind), None);
        }
    }
}
