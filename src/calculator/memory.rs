//! Single-slot memory register (MS / MR / MC).

/// A single numeric memory slot, zero when cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Memory {
    value: f64,
    stored: bool,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the stored value.
    pub fn store(&mut self, value: f64) {
        self.value = value;
        self.stored = true;
    }

    /// Read the stored value.
    pub fn recall(&self) -> f64 {
        self.value
    }

    /// Reset the stored value to zero.
    pub fn clear(&mut self) {
        self.value = 0.0;
        self.stored = false;
    }

    /// Whether a value has been stored since the last clear, zero included.
    pub fn is_set(&self) -> bool {
        self.stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_zero() {
        let memory = Memory::new();
        assert_eq!(memory.recall(), 0.0);
        assert!(!memory.is_set());
    }

    #[test]
    fn test_store_then_recall() {
        let mut memory = Memory::new();
        memory.store(42.5);
        assert_eq!(memory.recall(), 42.5);
        assert!(memory.is_set());
        memory.store(-1.0);
        assert_eq!(memory.recall(), -1.0);
    }

    #[test]
    fn test_storing_zero_still_counts() {
        let mut memory = Memory::new();
        memory.store(0.0);
        assert!(memory.is_set());
        assert_eq!(memory.recall(), 0.0);
        memory.clear();
        assert!(!memory.is_set());
    }

    #[test]
    fn test_clear_resets() {
        let mut memory = Memory::new();
        memory.store(7.0);
        memory.store(9.0);
        memory.clear();
        assert_eq!(memory.recall(), 0.0);
        assert!(!memory.is_set());
    }
}
