//! Preview generation: invoking the host's markdown→HTML function.
//!
//! The core neither renders markdown nor times the call out. It invokes the
//! function once per sync pass and hands the result back for reconciliation.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::{BoxError, MdeError, Result};

/// Pending HTML from a preview function.
pub type PreviewFuture = BoxFuture<'static, std::result::Result<String, BoxError>>;

/// Host-supplied `(markdown) -> eventual html`.
pub type PreviewFn = Arc<dyn Fn(String) -> PreviewFuture + Send + Sync>;

/// Wrap an async closure as a [`PreviewFn`].
pub fn preview_fn<F, Fut, E>(f: F) -> PreviewFn
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<String, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    Arc::new(move |markdown| {
        let fut = f(markdown);
        Box::pin(async move { fut.await.map_err(Into::into) })
    })
}

/// Run the preview function for `markdown`.
///
/// A rejection comes back as `MdeError::Preview`.
pub async fn generate_preview(preview: &PreviewFn, markdown: &str) -> Result<String> {
    tracing::trace!(
        target: "mde::preview",
        markdown_chars = markdown.chars().count(),
        "generating preview"
    );
    match preview(markdown.to_owned()).await {
        Ok(html) => {
            tracing::trace!(target: "mde::preview", html_len = html.len(), "preview ready");
            Ok(html)
        }
        Err(e) => {
            tracing::warn!(target: "mde::preview", "preview function failed: {e}");
            Err(MdeError::Preview(e))
        }
    }
}
