//! Registry configuration.
//!
//! Provides [`Config`], the construction-time settings for the registry
//! and its six dispatchers.
//!
//! The per-category concurrency ceilings encode a fixed policy: they are
//! read once when [`Registry::builder`](crate::Registry::builder) builds
//! the dispatchers and are never resized afterwards. The defaults are the
//! production values; overriding them is intended for embedding and tests,
//! not for runtime tuning.

use std::time::Duration;

/// Construction-time configuration for the registry runtime.
///
/// Defines:
/// - **Concurrency ceilings**: one per task category
/// - **Event system**: bus capacity for event delivery
/// - **Presentation context**: work channel capacity, refresh settle delay
/// - **Image geometry**: preview/icon/avatar sizes passed to the client
///
/// ## Field semantics
/// Ceilings must be positive; [`Config::default`] encodes the fixed
/// production policy (download=5, thumbnail=10, activity=10, avatar=10,
/// unified-search=1, read-file=10). The unified-search ceiling of 1 is
/// deliberate: result batches must be appended and rendered in strict
/// arrival order.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum concurrent file downloads.
    pub download_limit: usize,
    /// Maximum concurrent thumbnail fetches.
    pub thumbnail_limit: usize,
    /// Maximum concurrent activity-feed thumbnail fetches.
    pub activity_limit: usize,
    /// Maximum concurrent avatar fetches.
    pub avatar_limit: usize,
    /// Maximum concurrent unified-search batch insertions. Keep at 1:
    /// batches must complete in submission order.
    pub search_limit: usize,
    /// Maximum concurrent metadata reads.
    pub read_file_limit: usize,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events
    /// receive `Lagged` and skip older items. Minimum 1 (clamped by Bus).
    pub bus_capacity: usize,

    /// Capacity of the presentation context's work channel.
    ///
    /// When full, posted jobs are dropped (observers are idempotent; a
    /// dropped apply degrades to the next full refresh).
    pub presentation_capacity: usize,

    /// Delay between appending a search batch and triggering the view
    /// refresh, allowing layout to settle.
    pub refresh_settle: Duration,

    /// Bounding edge for preview renditions.
    pub preview_size: u32,
    /// Edge length for icon renditions.
    pub icon_size: u32,
    /// Edge length for avatar images.
    pub avatar_size: u32,
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - ceilings `5 / 10 / 10 / 10 / 1 / 10` (fixed production policy)
    /// - `bus_capacity = 1024`
    /// - `presentation_capacity = 1024`
    /// - `refresh_settle = 100ms`
    /// - `preview_size = 512`, `icon_size = 256`, `avatar_size = 128`
    fn default() -> Self {
        Self {
            download_limit: 5,
            thumbnail_limit: 10,
            activity_limit: 10,
            avatar_limit: 10,
            search_limit: 1,
            read_file_limit: 10,
            bus_capacity: 1024,
            presentation_capacity: 1024,
            refresh_settle: Duration::from_millis(100),
            preview_size: 512,
            icon_size: 256,
            avatar_size: 128,
        }
    }
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns a presentation channel capacity clamped to a minimum of 1.
    #[inline]
    pub fn presentation_capacity_clamped(&self) -> usize {
        self.presentation_capacity.max(1)
    }
}
