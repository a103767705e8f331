//! ============================================================================
//! Expiration Engine - Urgency classification for pantry items
//! ============================================================================
//! Two policies share the same day arithmetic and stay independently
//! configurable:
//! - the pantry screen's two-state check (expired / expiring within a
//!   caller-supplied threshold)
//! - the home feed's banded view (danger / warning / success inside a
//!   bounded day window)
//! Both are pure functions of the item, "now", and the policy; nothing is
//! cached between evaluations.
//! ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::PantryItem;

/// Days until an expiration date, rounded up. A fraction of a day left still
/// counts as a full day until the boundary is crossed.
pub fn days_until_expiry(expiration: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = expiration.signed_duration_since(now).num_milliseconds();
    (ms as f64 / 86_400_000.0).ceil() as i64
}

/// Two-state urgency for the pantry screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExpirationStatus {
    Expired { days: i64 },
    Expiring { days: i64 },
}

/// Classify one pantry item against `now`. Returns None when the item has no
/// expiration date, or when the date is more than `threshold_days` out.
pub fn expiration_status(
    item: &PantryItem,
    now: DateTime<Utc>,
    threshold_days: i64,
) -> Option<ExpirationStatus> {
    let expiration = item.expiration_date?;
    let days = days_until_expiry(expiration, now);

    if days < 0 {
        Some(ExpirationStatus::Expired { days: days.abs() })
    } else if days <= threshold_days {
        Some(ExpirationStatus::Expiring { days })
    } else {
        None
    }
}

/// Urgency band in the home feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryBand {
    Danger,
    Warning,
    Success,
}

/// Banding policy for the home feed. The defaults match the feed card: show
/// items within -1..=4 days, danger at <=1, warning at <=2, success above.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeedPolicy {
    pub min_days: i64,
    pub max_days: i64,
    pub danger_within: i64,
    pub warning_within: i64,
}

impl Default for FeedPolicy {
    fn default() -> Self {
        Self {
            min_days: -1,
            max_days: 4,
            danger_within: 1,
            warning_within: 2,
        }
    }
}

impl FeedPolicy {
    fn band(&self, days: i64) -> Option<ExpiryBand> {
        if days < self.min_days || days > self.max_days {
            return None;
        }
        Some(if days <= self.danger_within {
            ExpiryBand::Danger
        } else if days <= self.warning_within {
            ExpiryBand::Warning
        } else {
            ExpiryBand::Success
        })
    }
}

/// One entry in the expiring-soon feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringItem {
    pub name: String,
    pub days_left: i64,
    pub status: ExpiryBand,
}

/// Flatten pantry items into the expiring-soon feed, soonest first. Items
/// without an expiration date or outside the policy window are excluded.
pub fn expiring_feed(items: &[PantryItem], now: DateTime<Utc>, policy: FeedPolicy) -> Vec<ExpiringItem> {
    let mut feed: Vec<ExpiringItem> = items
        .iter()
        .filter_map(|item| {
            let expiration = item.expiration_date?;
            let days_left = days_until_expiry(expiration, now);
            policy.band(days_left).map(|status| ExpiringItem {
                name: item.name.clone(),
                days_left,
                status,
            })
        })
        .collect();

    feed.sort_by_key(|entry| entry.days_left);
    feed
}
