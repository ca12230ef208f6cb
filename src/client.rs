//! Network collaborator boundary.
//!
//! [`FetchClient`] is the seam between the dispatch layer and the actual
//! transfer implementation. Each method performs one asynchronous call and
//! resolves exactly once; retries, timeouts, and transport concerns live
//! behind this trait, never in the dispatcher.
//!
//! ## Rules
//! - A matching version tag is reported as `Err(FetchError::NotModified)`,
//!   letting tasks short-circuit without payload transfer.
//! - Implementations may resolve on any execution context; task bodies are
//!   responsible for marshalling results onto the presentation context.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::{Image, ItemRecord};

/// Payload of a successful preview fetch: the rendered pair plus the
/// version tag under which it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPayload {
    /// Full-size preview image.
    pub preview: Image,
    /// Small icon rendition of the same content.
    pub icon: Image,
    /// Version tag of the rendered content, if the server reported one.
    pub version_tag: Option<String>,
}

/// Payload of a successful avatar fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarPayload {
    /// The avatar image.
    pub image: Image,
    /// Version tag of the fetched avatar.
    pub version_tag: String,
}

/// # Asynchronous network collaborator.
///
/// One method per fetch category. Every call resolves exactly once with a
/// result or a [`FetchError`]; there is no cancellation hook, which is why
/// dispatcher cancellation is advisory for in-flight calls.
#[async_trait]
pub trait FetchClient: Send + Sync + 'static {
    /// Transfers the item's content (the transfer side effects, including
    /// any persistence, belong to the implementation).
    ///
    /// `selector` names the caller's intent (open, offline sync, ...) and
    /// is passed through untouched.
    async fn download(&self, item: &ItemRecord, selector: &str) -> Result<(), FetchError>;

    /// Fetches a preview+icon pair for the content at `path`.
    ///
    /// - `dims`: bounding size for the preview; `None` means unbounded
    ///   (the activity feed variant).
    /// - `icon_size`: edge length of the icon rendition.
    /// - `version_tag`: previously cached tag; when supplied, the server
    ///   may answer `Err(FetchError::NotModified)`.
    async fn download_preview(
        &self,
        path: &str,
        dims: Option<(u32, u32)>,
        icon_size: u32,
        version_tag: Option<&str>,
    ) -> Result<PreviewPayload, FetchError>;

    /// Fetches the avatar image for `user`.
    ///
    /// When `version_tag` matches the server's current avatar, resolves
    /// with `Err(FetchError::NotModified)`.
    async fn download_avatar(
        &self,
        user: &str,
        size: u32,
        version_tag: Option<&str>,
    ) -> Result<AvatarPayload, FetchError>;

    /// Reads the metadata record for a composed `server_url/file_name` path.
    async fn read_file(&self, server_path: &str) -> Result<ItemRecord, FetchError>;
}
