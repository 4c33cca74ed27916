//! Deferred values
//!
//! A [`Lazy`] wraps a producer closure that is only called when the value is
//! resolved. Producers capture shared handles to the state they read, so a
//! value resolved at render time sees every write made before it.

use std::fmt;
use std::sync::Arc;

/// A value computed on demand from the state captured by its producer
pub struct Lazy<T> {
    produce: Arc<dyn Fn() -> T + Send + Sync>,
}

impl<T> Lazy<T> {
    /// Create a deferred value from a producer
    pub fn new<F>(produce: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            produce: Arc::new(produce),
        }
    }

    /// Run the producer against the current state
    pub fn resolve(&self) -> T {
        (self.produce)()
    }
}

impl<T> Lazy<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A deferred value that always resolves to `value`
    pub fn constant(value: T) -> Self {
        Self::new(move || value.clone())
    }
}

impl<T> Clone for Lazy<T> {
    fn clone(&self) -> Self {
        Self {
            produce: self.produce.clone(),
        }
    }
}

impl<T> fmt::Debug for Lazy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Lazy(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::RwLock;

    #[test]
    fn test_resolve_reads_current_state() {
        let state = Arc::new(RwLock::new(1u32));
        let value = {
            let state = state.clone();
            Lazy::new(move || *state.read() * 10)
        };

        *state.write() = 4;
        assert_eq!(value.resolve(), 40);

        *state.write() = 7;
        assert_eq!(value.clone().resolve(), 70);
    }

    #[test]
    fn test_constant() {
        let value = Lazy::constant(Some("arn".to_string()));
        assert_eq!(value.resolve().as_deref(), Some("arn"));
    }
}
