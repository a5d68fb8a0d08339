//! Process-wide production model cache

use std::sync::{Arc, PoisonError, RwLock};

use super::loader::ArtifactLoader;
use super::{resolve_production, ProductionInfo};
use crate::error::Result;
use crate::registry::RegistryStore;

/// A loaded production model together with the record it came from
#[derive(Debug)]
pub struct LoadedModel<M> {
    pub model: M,
    pub info: ProductionInfo,
}

/// Lazily loaded production model shared by a serving process
///
/// The first [`get`](Self::get) resolves the registry and loads the
/// artifact; later calls return the same [`Arc`]. Promotions made after
/// that are invisible until [`reload`](Self::reload).
pub struct ProductionCache<S, L: ArtifactLoader> {
    store: S,
    loader: L,
    slot: RwLock<Option<Arc<LoadedModel<L::Model>>>>,
}

impl<S: RegistryStore, L: ArtifactLoader> ProductionCache<S, L> {
    pub fn new(store: S, loader: L) -> Self {
        Self { store, loader, slot: RwLock::new(None) }
    }

    /// Cached model, loading it on first use.
    pub fn get(&self) -> Result<Arc<LoadedModel<L::Model>>> {
        if let Some(loaded) = self.slot.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            return Ok(Arc::clone(loaded));
        }

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have loaded while we waited for the write lock.
        if let Some(loaded) = slot.as_ref() {
            return Ok(Arc::clone(loaded));
        }
        let loaded = Arc::new(self.load()?);
        *slot = Some(Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Re-read the registry and replace the cached model.
    ///
    /// On failure the previously cached model, if any, stays in place.
    pub fn reload(&self) -> Result<Arc<LoadedModel<L::Model>>> {
        let loaded = Arc::new(self.load()?);
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        let previous = slot.replace(Arc::clone(&loaded));
        tracing::info!(
            previous = previous.as_ref().map(|p| p.info.current_model.as_str()),
            current = %loaded.info.current_model,
            "production model reloaded"
        );
        Ok(loaded)
    }

    /// Read contract of the cached production model
    pub fn info(&self) -> Result<ProductionInfo> {
        Ok(self.get()?.info.clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    fn load(&self) -> Result<LoadedModel<L::Model>> {
        let info = resolve_production(&self.store)?;
        let model = self.loader.load(info.artifact(), info.artifact_sha256.as_deref())?;
        tracing::info!(
            version = %info.current_model,
            artifact = %info.artifact_path,
            "production model loaded"
        );
        Ok(LoadedModel { model, info })
    }
}
