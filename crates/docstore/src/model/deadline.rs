use std::{future::Future, time::Duration};

use crate::{Error, Result};

/// Runs one driver call under a deadline of `duration`.
///
/// An elapsed deadline is reported as [`Error::Timeout`]; anything the
/// driver returns is handed back unchanged inside [`Error::Driver`].
pub async fn within<F, T>(duration: Duration, operation: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = mongodb::error::Result<T>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(res) => res.map_err(Error::from),
        Err(_) => {
            tracing::warn!(operation, after = ?duration, "deadline elapsed");
            Err(Error::Timeout { operation, after: duration })
        }
    }
}
