//! Scan configuration and its validation.

use std::num::NonZeroUsize;

use thiserror::Error;

/// Upper bound on scan worker threads.
pub const MAX_WORKER_THREADS: usize = 256;

/// Errors specific to scan configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `worker_threads` is zero
    #[error("Worker thread count must be greater than zero.")]
    WorkerThreadsZero,
    /// `worker_threads` is above [`MAX_WORKER_THREADS`]
    #[error("Worker thread count must not exceed {MAX_WORKER_THREADS}.")]
    WorkerThreadsTooHigh,
}

/// Tuning knobs for block-batch scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Number of worker threads used to scan blocks in parallel. (Minimum: 1)
    pub worker_threads: usize,
}

/// Validated scan configuration.
/// This is the only configuration in use, `ScanConfig` is only used to build this after
/// validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedScanConfig {
    inner: ScanConfig,
}

impl std::ops::Deref for ValidatedScanConfig {
    type Target = ScanConfig;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            worker_threads: std::thread::available_parallelism()
                .map_or(1, NonZeroUsize::get)
                .min(MAX_WORKER_THREADS),
        }
    }
}

impl ScanConfig {
    /// Creates a new `ScanConfig` with custom parameters.
    #[must_use]
    pub const fn new(worker_threads: usize) -> Self {
        Self { worker_threads }
    }

    /// Validates the configuration parameters.
    ///
    /// # Errors
    /// If `worker_threads` is zero or above [`MAX_WORKER_THREADS`].
    pub const fn validate(self) -> Result<ValidatedScanConfig, ConfigError> {
        if self.worker_threads == 0 {
            return Err(ConfigError::WorkerThreadsZero);
        }

        if self.worker_threads > MAX_WORKER_THREADS {
            return Err(ConfigError::WorkerThreadsTooHigh);
        }

        Ok(ValidatedScanConfig { inner: self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let validated_config = ScanConfig::default().validate();
        assert!(validated_config.is_ok());
    }

    #[test]
    fn test_zero_workers() {
        let validated_config = ScanConfig::new(0).validate();
        assert!(matches!(
            validated_config,
            Err(ConfigError::WorkerThreadsZero)
        ));
    }

    #[test]
    fn test_too_many_workers() {
        let validated_config = ScanConfig::new(MAX_WORKER_THREADS + 1).validate();
        assert!(matches!(
            validated_config,
            Err(ConfigError::WorkerThreadsTooHigh)
        ));
    }

    #[test]
    fn test_validated_config_derefs() {
        let validated_config = ScanConfig::new(3).validate();
        assert!(matches!(validated_config, Ok(ref config) if config.worker_threads == 3));
    }
}
