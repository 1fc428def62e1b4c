//! Durable token storage for the session bearer token and platform OAuth pairs.

mod encryption;
mod file;
mod kind;
mod memory;

pub use file::FileTokenStore;
pub use kind::TokenKind;
pub use memory::MemoryTokenStore;

use crate::provider::ProviderKind;

/// Single source of truth, within the running client, for the three token
/// families. Every mutation is written through to durable storage immediately;
/// there is no batching or debounce.
///
/// Implementations must be safe to share across tasks. Any holder may
/// overwrite a token; coordination of concurrent refreshes lives in
/// [`crate::refresh::Refresher`], not here.
pub trait TokenStore: Send + Sync {
    /// Read the current value for a token kind.
    fn get(&self, kind: TokenKind) -> Option<String>;

    /// Write a value for a token kind. `None` deletes the durable entry.
    fn set(&self, kind: TokenKind, value: Option<String>);

    /// Current access token for a platform.
    fn access_token(&self, provider: ProviderKind) -> Option<String> {
        self.get(TokenKind::access(provider))
    }

    /// Current refresh token for a platform.
    fn refresh_token(&self, provider: ProviderKind) -> Option<String> {
        self.get(TokenKind::refresh(provider))
    }

    /// Store a freshly issued access/refresh pair for a platform.
    fn set_pair(&self, provider: ProviderKind, access: String, refresh: Option<String>) {
        self.set(TokenKind::access(provider), Some(access));
        if let Some(refresh) = refresh {
            self.set(TokenKind::refresh(provider), Some(refresh));
        }
    }

    /// Remove both tokens for a platform, in memory and durably.
    fn clear_provider(&self, provider: ProviderKind) {
        self.set(TokenKind::access(provider), None);
        self.set(TokenKind::refresh(provider), None);
    }

    /// Remove every stored token (session bearer and both platform pairs).
    fn clear_all(&self) {
        for kind in TokenKind::ALL {
            self.set(kind, None);
        }
    }
}
