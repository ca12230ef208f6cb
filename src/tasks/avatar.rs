//! Avatar fetch task.
//!
//! Fetches a user's avatar, passing the version tag captured at submit
//! time so an unchanged avatar costs no payload transfer. Three outcomes:
//!
//! - **Fresh payload**: the record (tag + image, validated) is persisted
//!   and the observer is notified via identity-check-or-refresh.
//! - **Not modified**: the existing cached entry is marked
//!   confirmed-loaded; the image on screen is already right.
//! - **Failure**: nothing is mutated.
//!
//! The identity here is the *user*, not the file name: a recycled cell may
//! represent another user even while the file-name key is still unique.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::client::FetchClient;
use crate::core::PresentationHandle;
use crate::error::FetchError;
use crate::model::AvatarRecord;
use crate::observe::Observer;
use crate::store::CacheStore;
use crate::tasks::FetchTask;

/// Fetches one user's avatar. Keyed by the display file name.
pub(crate) struct AvatarTask {
    user: String,
    file_name: String,
    /// Cached version tag, captured when the task was created.
    version_tag: Option<String>,
    observer: Arc<dyn Observer>,
    client: Arc<dyn FetchClient>,
    store: Arc<dyn CacheStore>,
    presentation: PresentationHandle,
    size: u32,
}

impl AvatarTask {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        user: String,
        file_name: String,
        version_tag: Option<String>,
        observer: Arc<dyn Observer>,
        client: Arc<dyn FetchClient>,
        store: Arc<dyn CacheStore>,
        presentation: PresentationHandle,
        size: u32,
    ) -> Self {
        Self {
            user,
            file_name,
            version_tag,
            observer,
            client,
            store,
            presentation,
            size,
        }
    }
}

#[async_trait]
impl FetchTask for AvatarTask {
    fn key(&self) -> &str {
        &self.file_name
    }

    async fn run(&self, _ctx: CancellationToken) -> Result<(), FetchError> {
        let fetched = self
            .client
            .download_avatar(&self.user, self.size, self.version_tag.as_deref())
            .await;

        match fetched {
            Ok(payload) => {
                let user = self.user.clone();
                let file_name = self.file_name.clone();
                let store = Arc::clone(&self.store);
                let observer = Arc::clone(&self.observer);

                self.presentation.post(move || {
                    store.store_avatar(
                        &file_name,
                        AvatarRecord {
                            version_tag: payload.version_tag,
                            loaded: true,
                            image: Some(payload.image.clone()),
                        },
                    );
                    if observer.identity().as_deref() == Some(user.as_str()) {
                        observer.apply(payload.image);
                    } else {
                        observer.refresh();
                    }
                });
                Ok(())
            }
            Err(FetchError::NotModified) => {
                let file_name = self.file_name.clone();
                let store = Arc::clone(&self.store);
                self.presentation.post(move || store.confirm_avatar(&file_name));
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
