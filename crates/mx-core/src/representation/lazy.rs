//! Memoized representation payloads

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{ModelError, ModelResult};
use crate::progress::ProgressScope;

/// Produces a representation payload on first access
///
/// Implementations may be slow. They should check
/// [`ProgressScope::was_canceled`] between coarse steps and return
/// [`ModelError::Canceled`] when asked to stop.
pub trait DataProvider<T>: Send + Sync {
    fn provide(&self, progress: Option<&ProgressScope<'_>>) -> ModelResult<T>;
}

/// Payload materialized at most once, then stable until mutated
#[derive(Clone)]
pub(crate) struct Lazy<T> {
    cell: OnceCell<T>,
    provider: Option<Arc<dyn DataProvider<T>>>,
    version: u64,
}

impl<T: Default> Lazy<T> {
    pub fn ready(value: T) -> Self {
        Self {
            cell: OnceCell::with_value(value),
            provider: None,
            version: 0,
        }
    }

    pub fn deferred(provider: Arc<dyn DataProvider<T>>) -> Self {
        Self {
            cell: OnceCell::new(),
            provider: Some(provider),
            version: 0,
        }
    }

    /// Materialize if needed; a failed or canceled attempt leaves the cell empty
    pub fn get(&self, progress: Option<&ProgressScope<'_>>) -> ModelResult<&T> {
        self.cell.get_or_try_init(|| match &self.provider {
            Some(provider) => {
                tracing::debug!("Materializing representation data");
                provider.provide(progress)
            }
            None => Ok(T::default()),
        })
    }

    /// Materialized payload for mutation; bumps the version
    pub fn get_mut(&mut self) -> ModelResult<&mut T> {
        self.get(None)?;
        self.version += 1;
        self.cell
            .get_mut()
            .ok_or_else(|| ModelError::Provider("payload vanished after materialization".into()))
    }

    /// Already materialized payload, without counting a mutation
    pub fn materialized_mut(&mut self) -> Option<&mut T> {
        self.cell.get_mut()
    }

    pub fn is_materialized(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Lazy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lazy")
            .field("value", &self.cell.get())
            .field("deferred", &self.provider.is_some())
            .field("version", &self.version)
            .finish()
    }
}
