//! Configuration primitives for the transport.

use crate::frame::DEFAULT_MAX_TRANSFER_LEN;

/// User-facing configuration for a [`Transport`](crate::Transport).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Deadline for a whole transfer before it is abandoned, in microseconds.
    pub timeout_us: u32,
    /// Upper bound on a single park between completion checks, in
    /// microseconds. Smaller values detect completion sooner at the cost of
    /// more wakeups.
    pub poll_interval_us: u32,
    /// Largest transfer accepted, in bytes (controller buffering limit).
    pub max_transfer_len: usize,
}

impl TransportConfig {
    /// Begins building a [`TransportConfig`] using the builder pattern.
    pub fn new() -> TransportConfigBuilder {
        TransportConfigBuilder::new()
    }

    /// Checks whether this configuration is internally consistent.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.poll_interval_us == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.poll_interval_us > self.timeout_us {
            return Err(ConfigError::PollIntervalExceedsTimeout);
        }
        if self.max_transfer_len == 0 {
            return Err(ConfigError::ZeroMaxTransferLen);
        }
        Ok(())
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_us: 100_000,
            poll_interval_us: 100,
            max_transfer_len: DEFAULT_MAX_TRANSFER_LEN,
        }
    }
}

/// Builder for [`TransportConfig`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct TransportConfigBuilder {
    config: TransportConfig,
}

impl TransportConfigBuilder {
    /// Creates a new builder seeded with [`TransportConfig::default()`].
    pub fn new() -> Self {
        Self {
            config: TransportConfig::default(),
        }
    }

    /// Overrides the transfer deadline.
    pub fn timeout_us(mut self, timeout_us: u32) -> Self {
        self.config.timeout_us = timeout_us;
        self
    }

    /// Overrides the park slice between completion checks.
    pub fn poll_interval_us(mut self, poll_interval_us: u32) -> Self {
        self.config.poll_interval_us = poll_interval_us;
        self
    }

    /// Overrides the largest accepted transfer length.
    pub fn max_transfer_len(mut self, max_transfer_len: usize) -> Self {
        self.config.max_transfer_len = max_transfer_len;
        self
    }

    /// Finalizes the builder and returns the [`TransportConfig`].
    pub fn build(self) -> TransportConfig {
        self.config
    }
}

impl Default for TransportConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation errors generated while verifying a [`TransportConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The park slice is zero, which would spin without ever sleeping.
    ZeroPollInterval,
    /// The park slice is longer than the whole deadline.
    PollIntervalExceedsTimeout,
    /// A zero-byte maximum would reject every transfer.
    ZeroMaxTransferLen,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert!(TransportConfig::default().validate().is_ok());
    }

    #[test]
    fn builder_overrides_are_applied() {
        let config = TransportConfig::new()
            .timeout_us(5_000)
            .poll_interval_us(50)
            .max_transfer_len(16)
            .build();

        assert_eq!(config.timeout_us, 5_000);
        assert_eq!(config.poll_interval_us, 50);
        assert_eq!(config.max_transfer_len, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn inconsistent_configurations_are_rejected() {
        let config = TransportConfig::new().poll_interval_us(0).build();
        assert_eq!(config.validate(), Err(ConfigError::ZeroPollInterval));

        let config = TransportConfig::new()
            .timeout_us(10)
            .poll_interval_us(100)
            .build();
        assert_eq!(
            config.validate(),
            Err(ConfigError::PollIntervalExceedsTimeout)
        );

        let config = TransportConfig::new().max_transfer_len(0).build();
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxTransferLen));
    }
}
