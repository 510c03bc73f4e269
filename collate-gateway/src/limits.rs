//! Per-sender daily token budget

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::debug;

/// Usage snapshot for one sender
#[derive(Debug, Clone)]
pub struct UsageStats {
    /// Number of processed batches attributed to the sender
    pub requests_count: u64,
    /// Tokens consumed over the sender's lifetime
    pub total_tokens: u64,
    /// Tokens consumed today
    pub tokens_today: u64,
    /// Timestamp of the most recent processed batch
    pub last_request: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct SenderUsage {
    day: Option<NaiveDate>,
    tokens_today: u64,
    requests_count: u64,
    total_tokens: u64,
    last_request: Option<DateTime<Utc>>,
}

impl SenderUsage {
    /// Reset the daily counter when the UTC day has rolled over
    fn roll_day(&mut self, today: NaiveDate) {
        if self.day != Some(today) {
            self.day = Some(today);
            self.tokens_today = 0;
        }
    }
}

/// Tracks token consumption per sender against a daily budget
///
/// Counters live in memory only; a restart grants everyone a fresh day.
pub struct UsageTracker {
    /// Daily token budget per sender (0 = unlimited)
    daily_limit: u64,
    usage: Mutex<HashMap<String, SenderUsage>>,
}

impl UsageTracker {
    /// Create a tracker with the given daily budget
    pub fn new(daily_limit: u64) -> Self {
        Self {
            daily_limit,
            usage: Mutex::new(HashMap::new()),
        }
    }

    /// The configured daily budget
    pub fn daily_limit(&self) -> u64 {
        self.daily_limit
    }

    /// Whether the sender still has budget left today
    pub async fn within_budget(&self, sender_id: &str) -> bool {
        if self.daily_limit == 0 {
            return true;
        }

        let today = Utc::now().date_naive();
        let mut usage = self.usage.lock().await;
        match usage.get_mut(sender_id) {
            Some(entry) => {
                entry.roll_day(today);
                entry.tokens_today < self.daily_limit
            }
            None => true,
        }
    }

    /// Tokens the sender may still consume today
    pub async fn remaining(&self, sender_id: &str) -> u64 {
        if self.daily_limit == 0 {
            return u64::MAX;
        }

        let today = Utc::now().date_naive();
        let mut usage = self.usage.lock().await;
        match usage.get_mut(sender_id) {
            Some(entry) => {
                entry.roll_day(today);
                self.daily_limit.saturating_sub(entry.tokens_today)
            }
            None => self.daily_limit,
        }
    }

    /// Attribute consumed tokens to a sender
    pub async fn record(&self, sender_id: &str, tokens: u64) {
        let today = Utc::now().date_naive();
        let mut usage = self.usage.lock().await;
        let entry = usage.entry(sender_id.to_string()).or_default();
        entry.roll_day(today);
        entry.tokens_today = entry.tokens_today.saturating_add(tokens);
        entry.requests_count += 1;
        entry.total_tokens = entry.total_tokens.saturating_add(tokens);
        entry.last_request = Some(Utc::now());
        debug!(
            sender = %sender_id,
            tokens,
            today = entry.tokens_today,
            "Recorded token usage"
        );
    }

    /// Usage snapshot for a sender, if any usage was ever recorded
    pub async fn stats(&self, sender_id: &str) -> Option<UsageStats> {
        let today = Utc::now().date_naive();
        let mut usage = self.usage.lock().await;
        usage.get_mut(sender_id).map(|entry| {
            entry.roll_day(today);
            UsageStats {
                requests_count: entry.requests_count,
                total_tokens: entry.total_tokens,
                tokens_today: entry.tokens_today,
                last_request: entry.last_request,
            }
        })
    }
}
