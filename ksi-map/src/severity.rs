//! Severity buckets of KSI counts and their colors.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Severity bucket of a road segment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBucket {
    /// `1–4` with default thresholds.
    Low,
    /// `5–7` with default thresholds.
    Moderate,
    /// `8+` with default thresholds.
    High,
}

impl SeverityBucket {
    /// All buckets from least to most severe.
    pub const ALL: [SeverityBucket; 3] = [
        SeverityBucket::Low,
        SeverityBucket::Moderate,
        SeverityBucket::High,
    ];

    /// Bucket of the count with default thresholds. `0` belongs to no bucket.
    pub fn of(ksi_count: u32) -> Option<Self> {
        BucketThresholds::default().bucket(ksi_count)
    }

    /// Color segments of this bucket are drawn with.
    pub fn color(&self) -> Color {
        match self {
            SeverityBucket::Low => Color::YELLOW,
            SeverityBucket::Moderate => Color::ORANGE,
            SeverityBucket::High => Color::RED,
        }
    }
}

/// Lower bounds of the two upper buckets. The low bucket always starts at `1`.
///
/// With the defaults buckets are `[1, 4]`, `[5, 7]` and `[8, ∞)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketThresholds {
    /// First count of the moderate bucket.
    pub moderate_from: u32,
    /// First count of the high bucket.
    pub high_from: u32,
}

impl Default for BucketThresholds {
    fn default() -> Self {
        Self {
            moderate_from: 5,
            high_from: 8,
        }
    }
}

impl BucketThresholds {
    /// Bucket the count falls into. `0` belongs to no bucket.
    pub fn bucket(&self, ksi_count: u32) -> Option<SeverityBucket> {
        match ksi_count {
            0 => None,
            c if c >= self.high_from => Some(SeverityBucket::High),
            c if c >= self.moderate_from => Some(SeverityBucket::Moderate),
            _ => Some(SeverityBucket::Low),
        }
    }

    /// Color of the count. Counts outside of every bucket are drawn red.
    pub fn color(&self, ksi_count: u32) -> Color {
        self.bucket(ksi_count)
            .map(|bucket| bucket.color())
            .unwrap_or(Color::RED)
    }

    /// Legend label of the bucket, e.g. `"5–7"`.
    pub fn label(&self, bucket: SeverityBucket) -> String {
        match bucket {
            SeverityBucket::Low => format!("1–{}", self.moderate_from.saturating_sub(1)),
            SeverityBucket::Moderate => format!(
                "{}–{}",
                self.moderate_from,
                self.high_from.saturating_sub(1)
            ),
            SeverityBucket::High => format!("{}+", self.high_from),
        }
    }

    /// Checks that every bucket contains at least one count.
    pub fn is_valid(&self) -> bool {
        self.moderate_from > 1 && self.high_from > self.moderate_from
    }
}

/// Color of a KSI count with default thresholds: `1–4` yellow, `5–7` orange, `8+` red.
pub fn severity_color(ksi_count: u32) -> Color {
    BucketThresholds::default().color(ksi_count)
}
