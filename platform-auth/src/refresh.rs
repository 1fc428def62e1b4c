//! Single-flight token refresh per platform.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::provider::ProviderKind;
use crate::store::TokenStore;

/// Access/refresh pair returned by the backend's refresh-token endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Coordinates token refreshes with per-platform locking.
///
/// The per-platform locking prevents race conditions when multiple
/// concurrent calls hit an expired token at the same time. Without it, each
/// caller would exchange the same refresh token; with rotation, only one
/// exchange can win and the losers invalidate the winner's stored pair.
#[derive(Default)]
pub struct Refresher {
    locks: DashMap<ProviderKind, Arc<Mutex<()>>>,
}

impl Refresher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exchange the stored refresh token for a new pair, once.
    ///
    /// `stale_access` is the access token the caller just saw rejected; if
    /// the store already holds a different one by the time the platform
    /// lock is acquired, another caller refreshed first and its token is
    /// returned without a network call.
    ///
    /// Returns the new access token, or `None` when no refresh token is
    /// stored or the exchange fails. On failure both of the platform's
    /// tokens are cleared, forcing the user back through the consent flow.
    pub async fn refresh<F, Fut, E>(
        &self,
        provider: ProviderKind,
        store: &dyn TokenStore,
        stale_access: Option<&str>,
        exchange: F,
    ) -> Option<String>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<TokenPair, E>>,
        E: std::fmt::Display,
    {
        let lock = self
            .locks
            .entry(provider)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // Another caller may have rotated the pair while we waited.
        if let Some(current) = store.access_token(provider) {
            if stale_access != Some(current.as_str()) {
                debug!("{} token was refreshed by another caller", provider);
                return Some(current);
            }
        }

        let refresh_token = match store.refresh_token(provider) {
            Some(token) => token,
            None => {
                debug!("No {} refresh token available", provider);
                return None;
            }
        };

        match exchange(refresh_token).await {
            Ok(pair) => {
                debug!("Refreshed {} access token", provider);
                store.set_pair(provider, pair.access_token.clone(), pair.refresh_token);
                Some(pair.access_token)
            }
            Err(e) => {
                warn!("{} token refresh failed, clearing connection: {}", provider, e);
                store.clear_provider(provider);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryTokenStore, TokenKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn seeded_store(access: &str, refresh: &str) -> MemoryTokenStore {
        let store = MemoryTokenStore::new();
        store.set_pair(
            ProviderKind::Zoom,
            access.to_string(),
            Some(refresh.to_string()),
        );
        store
    }

    #[tokio::test]
    async fn test_refresh_stores_rotated_pair() {
        let store = seeded_store("old-access", "old-refresh");
        let refresher = Refresher::new();

        let result = refresher
            .refresh(
                ProviderKind::Zoom,
                &store,
                Some("old-access"),
                |refresh_token| async move {
                    assert_eq!(refresh_token, "old-refresh");
                    Ok::<_, String>(TokenPair {
                        access_token: "new-access".to_string(),
                        refresh_token: Some("new-refresh".to_string()),
                    })
                },
            )
            .await;

        assert_eq!(result, Some("new-access".to_string()));
        assert_eq!(
            store.get(TokenKind::ZoomAccess),
            Some("new-access".to_string())
        );
        assert_eq!(
            store.get(TokenKind::ZoomRefresh),
            Some("new-refresh".to_string())
        );
    }

    #[tokio::test]
    async fn test_no_refresh_token_is_terminal() {
        let store = MemoryTokenStore::new();
        store.set(TokenKind::ZoomAccess, Some("old-access".to_string()));
        let refresher = Refresher::new();
        let exchanges = Arc::new(AtomicUsize::new(0));

        let result = refresher
            .refresh(ProviderKind::Zoom, &store, Some("old-access"), {
                let exchanges = exchanges.clone();
                move |_| {
                    let exchanges = exchanges.clone();
                    async move {
                        exchanges.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, String>(TokenPair {
                            access_token: "unused".to_string(),
                            refresh_token: None,
                        })
                    }
                }
            })
            .await;

        assert_eq!(result, None);
        assert_eq!(exchanges.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_exchange_clears_both_tokens() {
        let store = seeded_store("old-access", "old-refresh");
        let refresher = Refresher::new();

        let result = refresher
            .refresh(
                ProviderKind::Zoom,
                &store,
                Some("old-access"),
                |_| async move { Err::<TokenPair, _>("invalid_grant".to_string()) },
            )
            .await;

        assert_eq!(result, None);
        assert_eq!(store.get(TokenKind::ZoomAccess), None);
        assert_eq!(store.get(TokenKind::ZoomRefresh), None);
    }

    #[tokio::test]
    async fn test_already_rotated_token_short_circuits() {
        let store = seeded_store("current-access", "current-refresh");
        let refresher = Refresher::new();

        // Caller saw "stale-access" fail, but the store has moved on.
        let exchanges = Arc::new(AtomicUsize::new(0));
        let result = refresher
            .refresh(ProviderKind::Zoom, &store, Some("stale-access"), {
                let exchanges = exchanges.clone();
                move |_| {
                    let exchanges = exchanges.clone();
                    async move {
                        exchanges.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, String>(TokenPair {
                            access_token: "unused".to_string(),
                            refresh_token: None,
                        })
                    }
                }
            })
            .await;

        assert_eq!(result, Some("current-access".to_string()));
        assert_eq!(exchanges.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_are_single_flight() {
        let store = Arc::new(seeded_store("old-access", "old-refresh"));
        let refresher = Arc::new(Refresher::new());
        let exchanges = Arc::new(AtomicUsize::new(0));

        let spawn_refresh = |store: Arc<MemoryTokenStore>,
                             refresher: Arc<Refresher>,
                             exchanges: Arc<AtomicUsize>| async move {
            refresher
                .refresh(
                    ProviderKind::Zoom,
                    store.as_ref(),
                    Some("old-access"),
                    move |_| async move {
                        exchanges.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, String>(TokenPair {
                            access_token: "new-access".to_string(),
                            refresh_token: Some("new-refresh".to_string()),
                        })
                    },
                )
                .await
        };

        let (first, second) = tokio::join!(
            spawn_refresh(store.clone(), refresher.clone(), exchanges.clone()),
            spawn_refresh(store.clone(), refresher.clone(), exchanges.clone()),
        );

        assert_eq!(first, Some("new-access".to_string()));
        assert_eq!(second, Some("new-access".to_string()));
        assert_eq!(exchanges.load(Ordering::SeqCst), 1);
    }
}
