//! Generic refresh-and-retry wrapper for authenticated platform calls.

use std::future::Future;

use tracing::debug;

/// Issue an authenticated request, recovering from an expired token at most once.
///
/// The retry policy is written once here and reused for every platform call
/// site; the pieces that vary are injected:
///
/// * `request` issues the call with a bearer token and is invoked once, or
///   twice when a refresh succeeds.
/// * `should_refresh` is the platform's failure-detection predicate (built
///   from [`crate::signal::classify`]).
/// * `refresh` is the platform's refresh procedure; `None` means the token
///   could not be refreshed and the caller must re-consent.
///
/// Guarantee: at most one refresh attempt and one retried request per
/// logical call. A failure of the retried request is returned as-is; a
/// failed or impossible refresh propagates the original error.
pub async fn with_token_refresh<T, E, Req, ReqFut, Pred, Refresh, RefreshFut>(
    token: String,
    request: Req,
    should_refresh: Pred,
    refresh: Refresh,
) -> Result<T, E>
where
    Req: Fn(String) -> ReqFut,
    ReqFut: Future<Output = Result<T, E>>,
    Pred: FnOnce(&E) -> bool,
    Refresh: FnOnce() -> RefreshFut,
    RefreshFut: Future<Output = Option<String>>,
{
    let original = match request(token).await {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if !should_refresh(&original) {
        return Err(original);
    }

    debug!("Access token rejected, attempting refresh");
    match refresh().await {
        Some(new_token) => request(new_token).await,
        None => {
            debug!("Refresh yielded no token, surfacing original failure");
            Err(original)
        }
    }
}
