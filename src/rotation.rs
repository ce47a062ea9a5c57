//! Round-robin rotation over alternate API keys

use std::sync::atomic::{AtomicUsize, Ordering};

/// Round-robin selector over a list of alternate API keys.
///
/// The cursor is an atomic counter shared across every call made through
/// one wrapper instance: rotation only ever needs "next index", so relaxed
/// atomics are enough and concurrent callers never lose an advance. The
/// cursor is monotonic and never reset.
#[derive(Debug)]
pub struct KeyRotator {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl KeyRotator {
    /// Create a rotator over the given keys (possibly empty)
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Return the next key in round-robin order and advance the cursor.
    ///
    /// Returns `None` when no alternate keys are configured. Repeated calls
    /// cycle through the keys in their original list order indefinitely.
    pub fn rotate(&self) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }
        let cursor = self.cursor.fetch_add(1, Ordering::Relaxed);
        Some(&self.keys[cursor % self.keys.len()])
    }

    /// Number of configured alternate keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether any alternate keys are configured
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn cycles_in_list_order() {
        let rotator = KeyRotator::new(vec!["a".into(), "b".into(), "c".into()]);
        let keys: Vec<_> = (0..5).map(|_| rotator.rotate().unwrap()).collect();
        assert_eq!(keys, ["a", "b", "c", "a", "b"]);
    }

    #[test]
    fn empty_list_yields_none() {
        let rotator = KeyRotator::new(Vec::new());
        assert!(rotator.is_empty());
        for _ in 0..3 {
            assert_eq!(rotator.rotate(), None);
        }
    }

    #[test]
    fn concurrent_rotation_never_loses_an_advance() {
        let rotator = Arc::new(KeyRotator::new(vec!["a".into(), "b".into()]));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let rotator = Arc::clone(&rotator);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        rotator.rotate().unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(rotator.cursor.load(Ordering::Relaxed), 4000);
    }
}
