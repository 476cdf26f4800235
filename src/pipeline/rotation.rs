//! Credential rotation for quota-limited API access.
//!
//! A run consumes its key pool monotonically: the active key serves requests
//! until its daily quota runs out, then the ring advances to the next key and
//! the failed request is replayed unchanged. There is no path back to an
//! earlier key; stepping past the last one aborts the run.

use std::future::Future;

use crate::error::{AppError, Result};
use crate::services::ApiResult;

/// Ordered API key pool with a forward-only cursor.
#[derive(Debug, Clone)]
pub struct KeyRing {
    keys: Vec<String>,
    cursor: usize,
}

impl KeyRing {
    /// Create a ring over an ordered key list; rejects an empty list.
    pub fn new(keys: Vec<String>) -> Result<Self> {
        if keys.is_empty() {
            return Err(AppError::validation(
                "no API credentials configured; set [api] keys or TUBESCOPE_API_KEYS",
            ));
        }
        Ok(Self { keys, cursor: 0 })
    }

    /// Key currently serving requests.
    pub fn current(&self) -> &str {
        &self.keys[self.cursor]
    }

    /// Zero-based index of the active key.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Total number of keys in the pool.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Advance to the next key after a quota failure.
    ///
    /// The cursor only moves forward. Stepping past the last key leaves the
    /// cursor where it is and reports the whole pool as exhausted.
    pub fn advance(&mut self) -> Result<()> {
        if self.cursor + 1 >= self.keys.len() {
            return Err(AppError::CredentialsExhausted {
                attempted: self.keys.len(),
            });
        }
        self.cursor += 1;
        Ok(())
    }
}

/// Run one API request under quota rotation.
///
/// The outer `Result` is fatal (key pool exhausted); the inner [`ApiResult`]
/// carries non-quota request failures for the call site to handle. Quota
/// failures never reach the caller: each one advances the ring and replays
/// the identical request (same cursor, same unit) with the next key.
pub async fn fetch_with_rotation<T, F, Fut>(
    keys: &mut KeyRing,
    mut request: F,
) -> Result<ApiResult<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    loop {
        let key = keys.current().to_string();
        match request(key).await {
            Ok(value) => return Ok(Ok(value)),
            Err(error) if error.is_quota() => {
                log::warn!(
                    "Credential {}/{} out of quota ({}); rotating",
                    keys.position() + 1,
                    keys.len(),
                    error
                );
                keys.advance()?;
            }
            Err(error) => return Ok(Err(error)),
        }
    }
}
