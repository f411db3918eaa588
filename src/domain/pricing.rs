/// Speech-to-text pricing used for batch quotes and final cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranscriptionPricing {
    pub cost_per_minute_usd: f64,
    /// Duration assumed for items with no recorded duration, quotes only.
    pub assumed_duration_secs: u32,
}

impl Default for TranscriptionPricing {
    fn default() -> Self {
        Self {
            cost_per_minute_usd: 0.006,
            assumed_duration_secs: 60,
        }
    }
}

impl TranscriptionPricing {
    /// Cost in USD, rounded up to four decimal places.
    pub fn cost_for(&self, total_seconds: u64) -> f64 {
        let minutes = total_seconds as f64 / 60.0;
        (minutes * self.cost_per_minute_usd * 10_000.0).ceil() / 10_000.0
    }

    pub fn quote_duration(&self, duration_seconds: Option<u32>) -> u64 {
        u64::from(duration_seconds.unwrap_or(self.assumed_duration_secs))
    }
}
