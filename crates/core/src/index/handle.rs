use super::SymbolIndex;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared access to the current index.
///
/// Readers get a snapshot (an `Arc` clone) and keep it for as long as they
/// need; a rebuild swaps in a whole new index without disturbing them.
#[derive(Clone)]
pub struct IndexHandle {
    current: Arc<RwLock<Arc<SymbolIndex>>>,
}

impl IndexHandle {
    pub fn new(index: SymbolIndex) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(index))),
        }
    }

    pub async fn snapshot(&self) -> Arc<SymbolIndex> {
        self.current.read().await.clone()
    }

    /// Install a new index and return the previous one.
    pub async fn replace(&self, index: SymbolIndex) -> Arc<SymbolIndex> {
        let mut lock = self.current.write().await;
        std::mem::replace(&mut *lock, Arc::new(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn snapshots_survive_replacement() {
        let handle = IndexHandle::new(SymbolIndex::empty("/old"));
        let before = handle.snapshot().await;
        let previous = handle.replace(SymbolIndex::empty("/new")).await;
        assert_eq!(before.root(), std::path::Path::new("/old"));
        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(handle.snapshot().await.root(), std::path::Path::new("/new"));
    }
}
