//! Cache/metadata store collaborator boundary.
//!
//! [`CacheStore`] abstracts the persistent metadata and image cache shared
//! by all dispatchers. Methods are synchronous and take `&self`:
//! implementations must be internally thread-safe, since task bodies call
//! in from multiple dispatcher workers concurrently.

use crate::model::{AvatarRecord, ItemRecord};

/// # Shared metadata/image cache.
///
/// Read paths feed the registry's pre-submit guards; write paths are
/// invoked by task bodies on result arrival. Writes that feed presentation
/// state (preview version tags, avatar records) are posted to the
/// presentation context by the tasks, so implementations never see
/// concurrent writers for the same presentation-visible key.
pub trait CacheStore: Send + Sync + 'static {
    /// Returns true if both the preview and icon renditions are cached for
    /// this item at this content version.
    fn preview_cached(&self, item_id: &str, etag: &str) -> bool;

    /// Returns the version tag under which the cached preview pair was
    /// rendered, if any.
    fn preview_tag(&self, item_id: &str) -> Option<String>;

    /// Persists the version tag of a freshly fetched preview pair.
    fn store_preview_tag(&self, item_id: &str, version_tag: &str);

    /// Returns true if a local preview is cached for this activity-feed
    /// file identifier.
    fn activity_preview_cached(&self, file_id: &str) -> bool;

    /// Returns the cached avatar record for a display file name, if any.
    fn avatar(&self, file_name: &str) -> Option<AvatarRecord>;

    /// Persists a freshly fetched avatar under `file_name`.
    fn store_avatar(&self, file_name: &str, record: AvatarRecord);

    /// Marks the cached avatar as confirmed-loaded without changing the
    /// image (the not-modified outcome).
    fn confirm_avatar(&self, file_name: &str);

    /// Persists a metadata record returned by a read-file call.
    fn store_item(&self, item: &ItemRecord);

    /// Persists the directory record for an item that is a directory.
    fn store_directory(&self, item: &ItemRecord);
}
