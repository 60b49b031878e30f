//! Pacing configuration for the batch pipeline.

use std::time::Duration;

/// Minimum inter-call interval policy for the embedding provider.
///
/// The provider rate-limits aggressive callers, so the pipeline waits
/// `inter_call_delay` before every embedding request and backs off for
/// `rate_limit_cooldown` after an explicit rate-limit response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingConfig {
    /// Delay before each embedding request.
    pub inter_call_delay: Duration,

    /// Extra cooldown after a rate-limit response, before the next
    /// document is attempted.
    pub rate_limit_cooldown: Duration,
}

impl PacingConfig {
    /// Set the inter-call delay.
    pub fn with_inter_call_delay(mut self, delay: Duration) -> Self {
        self.inter_call_delay = delay;
        self
    }

    /// Set the rate-limit cooldown.
    pub fn with_rate_limit_cooldown(mut self, cooldown: Duration) -> Self {
        self.rate_limit_cooldown = cooldown;
        self
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            inter_call_delay: Duration::from_millis(300),
            rate_limit_cooldown: Duration::from_secs(2),
        }
    }
}
