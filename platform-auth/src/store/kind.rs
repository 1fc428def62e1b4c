//! Token families held by the store.

use crate::provider::ProviderKind;

/// The five token entries the client persists.
///
/// Storage keys are fixed by the backend contract and survive across
/// releases; renaming one silently disconnects existing installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Credential proving identity to the WorkAI backend itself.
    SessionBearer,
    ZoomAccess,
    ZoomRefresh,
    TeamsAccess,
    TeamsRefresh,
}

impl TokenKind {
    pub const ALL: [TokenKind; 5] = [
        TokenKind::SessionBearer,
        TokenKind::ZoomAccess,
        TokenKind::ZoomRefresh,
        TokenKind::TeamsAccess,
        TokenKind::TeamsRefresh,
    ];

    /// Key under which this token is persisted.
    pub fn storage_key(&self) -> &'static str {
        match self {
            TokenKind::SessionBearer => "token",
            TokenKind::ZoomAccess => "zoomToken",
            TokenKind::ZoomRefresh => "zoomRefreshToken",
            TokenKind::TeamsAccess => "teamsToken",
            TokenKind::TeamsRefresh => "teamsRefreshToken",
        }
    }

    /// Access-token kind for a platform.
    pub fn access(provider: ProviderKind) -> TokenKind {
        match provider {
            ProviderKind::Zoom => TokenKind::ZoomAccess,
            ProviderKind::Teams => TokenKind::TeamsAccess,
        }
    }

    /// Refresh-token kind for a platform.
    pub fn refresh(provider: ProviderKind) -> TokenKind {
        match provider {
            ProviderKind::Zoom => TokenKind::ZoomRefresh,
            ProviderKind::Teams => TokenKind::TeamsRefresh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_match_backend_contract() {
        assert_eq!(TokenKind::SessionBearer.storage_key(), "token");
        assert_eq!(TokenKind::ZoomAccess.storage_key(), "zoomToken");
        assert_eq!(TokenKind::ZoomRefresh.storage_key(), "zoomRefreshToken");
        assert_eq!(TokenKind::TeamsAccess.storage_key(), "teamsToken");
        assert_eq!(TokenKind::TeamsRefresh.storage_key(), "teamsRefreshToken");
    }

    #[test]
    fn test_provider_mapping() {
        assert_eq!(TokenKind::access(ProviderKind::Zoom), TokenKind::ZoomAccess);
        assert_eq!(
            TokenKind::refresh(ProviderKind::Teams),
            TokenKind::TeamsRefresh
        );
    }
}
