use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const DEFAULT_MAX_DEPTH: NonZeroUsize = match NonZeroUsize::new(64) {
    Some(depth) => depth,
    None => unreachable!(),
};

/// Cooperative cancellation flag shared between a scan and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What to do with a malformed element whose neighbours can still be located.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecoveryPolicy {
    /// Record a corrupt placeholder and keep scanning.
    #[default]
    BestEffort,
    /// Fail the scan on the first format error.
    Strict,
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Read only the first shallow-skippable container (the first Cluster).
    pub shallow: bool,
    pub max_depth: NonZeroUsize,
    pub recovery: RecoveryPolicy,
    pub cancel: CancelToken,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            shallow: false,
            max_depth: DEFAULT_MAX_DEPTH,
            recovery: RecoveryPolicy::default(),
            cancel: CancelToken::new(),
        }
    }
}

impl ScanOptions {
    #[must_use]
    pub const fn with_shallow(mut self, shallow: bool) -> Self {
        self.shallow = shallow;
        self
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: NonZeroUsize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn with_recovery(mut self, recovery: RecoveryPolicy) -> Self {
        self.recovery = recovery;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ScanOptions::default();
        assert!(!options.shallow);
        assert_eq!(options.max_depth.get(), 64);
        assert_eq!(options.recovery, RecoveryPolicy::BestEffort);
        assert!(!options.cancel.is_cancelled());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let options = ScanOptions::default().with_cancel(token.clone());
        token.cancel();
        assert!(options.cancel.is_cancelled());
    }
}
