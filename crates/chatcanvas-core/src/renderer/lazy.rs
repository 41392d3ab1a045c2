//! Lazily loaded, memoized component handles.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::OnceCell;

use crate::error::{ChatCanvasError, Result};

/// Async factory producing a component handle.
pub type ComponentLoader<C> = Arc<dyn Fn() -> BoxFuture<'static, Result<C>> + Send + Sync>;

/// Wraps an async closure as a [`ComponentLoader`].
pub fn component_loader<C, F, Fut>(f: F) -> ComponentLoader<C>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<C>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()))
}

/// A loader paired with the cell that memoizes its result.
///
/// Clones share the cell: whichever clone loads first does the work, every
/// other caller waits for it and receives the same handle. A failed load
/// leaves the cell empty.
pub struct LazyComponent<C> {
    key: String,
    loader: ComponentLoader<C>,
    cell: Arc<OnceCell<C>>,
}

impl<C> Clone for LazyComponent<C> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            loader: Arc::clone(&self.loader),
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<C> fmt::Debug for LazyComponent<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyComponent")
            .field("key", &self.key)
            .field("loaded", &self.cell.initialized())
            .finish()
    }
}

impl<C> LazyComponent<C>
where
    C: Clone + Send + Sync + 'static,
{
    pub fn new(key: impl Into<String>, loader: ComponentLoader<C>) -> Self {
        Self {
            key: key.into(),
            loader,
            cell: Arc::new(OnceCell::new()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the component, or returns the memoized handle.
    ///
    /// # Errors
    ///
    /// Returns `ChatCanvasError::ComponentLoad` if the loader fails.
    pub async fn load(&self) -> Result<C> {
        let component = self
            .cell
            .get_or_try_init(|| async {
                tracing::debug!(key = %self.key, "Loading component");
                (self.loader)().await.map_err(|e| match e {
                    ChatCanvasError::ComponentLoad { .. } => e,
                    other => ChatCanvasError::component_load(&self.key, other.to_string()),
                })
            })
            .await?;
        Ok(component.clone())
    }

    /// The handle if a load already completed.
    pub fn loaded(&self) -> Option<C> {
        self.cell.get().cloned()
    }
}
