//! Meeting platform identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// External meeting platforms whose OAuth tokens this client stores and refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Zoom,
    Teams,
}

impl ProviderKind {
    /// Get the provider identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Zoom => "zoom",
            ProviderKind::Teams => "teams",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ProviderParseError;

impl FromStr for ProviderKind {
    type Err = ProviderParseError;

    fn from_str(name: &str) -> Result<ProviderKind, Self::Err> {
        match name.to_lowercase().as_str() {
            "zoom" => Ok(ProviderKind::Zoom),
            "teams" => Ok(ProviderKind::Teams),
            _ => Err(ProviderParseError),
        }
    }
}
