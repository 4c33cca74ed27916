//! Dependable handles

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Identifier of a construct that something can depend on
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyRoot(String);

impl DependencyRoot {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DependencyRoot {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for DependencyRoot {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl fmt::Display for DependencyRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Something other constructs can take a dependency on
pub trait Dependable {
    /// Constructs a dependent has to wait for
    fn dependency_roots(&self) -> Vec<DependencyRoot>;
}

/// A growable set of dependency roots.
///
/// Clones share the same set. Consumers either read the roots at render
/// time or watch the number of roots through [`ConcreteDependable::subscribe`].
#[derive(Debug, Clone)]
pub struct ConcreteDependable {
    roots: Arc<RwLock<Vec<DependencyRoot>>>,
    count: Arc<watch::Sender<usize>>,
}

impl ConcreteDependable {
    pub fn new() -> Self {
        let (count, _) = watch::channel(0);
        Self {
            roots: Arc::new(RwLock::new(Vec::new())),
            count: Arc::new(count),
        }
    }

    /// Add a root; adding the same root twice is a no-op
    pub fn add(&self, root: impl Into<DependencyRoot>) {
        let root = root.into();
        let len = {
            let mut roots = self.roots.write();
            if roots.contains(&root) {
                return;
            }
            debug!("Adding dependency root: {}", root);
            roots.push(root);
            roots.len()
        };
        self.count.send_replace(len);
    }

    pub fn is_empty(&self) -> bool {
        self.roots.read().is_empty()
    }

    /// Receiver tracking the number of roots
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.count.subscribe()
    }

    /// Wait until at least one root has been added
    pub async fn attached(&self) {
        let mut receiver = self.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = receiver.wait_for(|count| *count > 0).await;
    }
}

impl Default for ConcreteDependable {
    fn default() -> Self {
        Self::new()
    }
}

impl Dependable for ConcreteDependable {
    fn dependency_roots(&self) -> Vec<DependencyRoot> {
        self.roots.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_roots_are_deduplicated_in_order() {
        let dependable = ConcreteDependable::new();
        assert!(dependable.is_empty());

        dependable.add("Stack/Listener/Rule");
        dependable.add("Stack/Listener");
        dependable.add("Stack/Listener/Rule");

        assert_eq!(
            dependable.dependency_roots(),
            vec![
                DependencyRoot::new("Stack/Listener/Rule"),
                DependencyRoot::new("Stack/Listener"),
            ]
        );
    }

    #[test]
    fn test_clones_share_roots() {
        let dependable = ConcreteDependable::new();
        let handle = dependable.clone();
        dependable.add("Stack/Listener");

        assert_eq!(handle.dependency_roots().len(), 1);
        assert_eq!(*handle.subscribe().borrow(), 1);
    }

    #[tokio::test]
    async fn test_attached_wakes_waiters() {
        let dependable = ConcreteDependable::new();
        let waiter = {
            let dependable = dependable.clone();
            tokio::spawn(async move { dependable.attached().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        dependable.add("Stack/Listener");
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
    }
}
