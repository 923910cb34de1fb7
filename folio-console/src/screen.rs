// List screen for one content type.

use std::marker::PhantomData;
use std::sync::Arc;

use folio_auth::AuthContext;
use folio_blob::{BlobUpload, BlobUploader, CleanupOutcome};
use folio_core::{ErrorKind, FolioError, FolioResult, RecordId, RecordStore, Stored};

use crate::content::Content;
use crate::editor::{AssetPreview, Editor, SaveOutcome};
use crate::notify::{Notifier, Toast};
use crate::utils::user_message;

/// One row of the list, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListRow {
    pub id: RecordId,
    pub name: String,
    pub asset_url: Option<String>,
    pub order: i64,
}

/// A pending delete. Nothing is removed until it is confirmed.
#[derive(Debug)]
pub struct DeletePrompt<T> {
    id: RecordId,
    message: String,
    asset_url: Option<String>,
    _marker: PhantomData<fn() -> T>,
}

/// A delete the user agreed to.
#[derive(Debug)]
pub struct ConfirmedDelete<T> {
    id: RecordId,
    asset_url: Option<String>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> DeletePrompt<T> {
    /// `Delete "<name>"?`
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn confirm(self) -> ConfirmedDelete<T> {
        ConfirmedDelete {
            id: self.id,
            asset_url: self.asset_url,
            _marker: PhantomData,
        }
    }
}

impl<T> ConfirmedDelete<T> {
    pub fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Every backend call is gated on the session being an allow-listed admin.
pub struct ContentScreen<T: Content> {
    store: RecordStore<T>,
    uploader: Option<Arc<BlobUploader>>,
    auth: Arc<AuthContext>,
    notifier: Arc<dyn Notifier>,
    items: Vec<Stored<T>>,
    loading: bool,
    editor: Editor<T>,
}

impl<T: Content> ContentScreen<T> {
    pub fn new(
        store: RecordStore<T>,
        uploader: Option<Arc<BlobUploader>>,
        auth: Arc<AuthContext>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            uploader,
            auth,
            notifier,
            items: Vec::new(),
            loading: true,
            editor: Editor::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        T::TITLE
    }

    pub(crate) fn store(&self) -> &RecordStore<T> {
        &self.store
    }

    pub fn items(&self) -> &[Stored<T>] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn editor(&self) -> &Editor<T> {
        &self.editor
    }

    pub fn rows(&self) -> Vec<ListRow> {
        self.items
            .iter()
            .map(|s| ListRow {
                id: s.id.clone(),
                name: s.record.display_name().to_string(),
                asset_url: s.record.asset_url().map(str::to_string),
                order: s.record.order(),
            })
            .collect()
    }

    pub async fn mount(&mut self) -> bool {
        self.reload().await
    }

    /// Refresh the cached list. On failure the previous list stays;
    /// a session without admin access gets an empty list.
    pub async fn reload(&mut self) -> bool {
        if !self.admitted() {
            self.items.clear();
            self.loading = false;
            return false;
        }

        let result = self.store.list().await;
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                true
            }
            Err(err) => {
                tracing::error!(collection = T::COLLECTION, error = %err, "list failed");
                self.notifier
                    .notify(Toast::error(T::MESSAGES.load_failed).with_description(user_message(&err)));
                false
            }
        }
    }

    /// Forget cached records and close the editor.
    pub fn clear(&mut self) {
        self.items.clear();
        self.loading = true;
        self.editor.cancel();
    }

    pub fn add(&mut self) {
        self.editor.open(None);
    }

    pub fn edit(&mut self, id: &RecordId) -> FolioResult<()> {
        let stored = self.find(id)?;
        self.editor.open(Some(&stored));
        Ok(())
    }

    pub fn form_mut(&mut self) -> FolioResult<&mut T::Form> {
        self.editor.form_mut()
    }

    pub fn select_asset(&mut self, upload: BlobUpload) -> FolioResult<AssetPreview> {
        self.editor.select_asset(upload).cloned()
    }

    pub fn cancel(&mut self) {
        self.editor.cancel();
    }

    /// Save the editor. Failures become toasts; the editor stays open.
    pub async fn save(&mut self) -> Option<SaveOutcome> {
        if !self.admitted() {
            return None;
        }

        let loaded = self.items.len();
        let result = self
            .editor
            .save(&self.store, self.uploader.as_deref(), loaded)
            .await;

        match result {
            Ok(Some(outcome)) => {
                match &outcome {
                    SaveOutcome::Created(id) => {
                        tracing::debug!(collection = T::COLLECTION, %id, "record created");
                        self.notifier.notify(Toast::success(T::MESSAGES.added));
                    }
                    SaveOutcome::Updated { id, fields } => {
                        tracing::debug!(collection = T::COLLECTION, %id, ?fields, "record updated");
                        self.notifier.notify(Toast::success(T::MESSAGES.updated));
                    }
                    SaveOutcome::Unchanged(_) => {}
                }
                self.reload().await;
                Some(outcome)
            }
            Ok(None) => None,
            Err(err) => {
                self.report_save_error(&err);
                None
            }
        }
    }

    fn report_save_error(&self, err: &anyhow::Error) {
        let folio = FolioError::from_anyhow(err);
        let toast = match folio.map(|e| e.kind) {
            Some(ErrorKind::Validation) => Toast::error(user_message(err)),
            Some(ErrorKind::UploadFailed) => {
                tracing::error!(collection = T::COLLECTION, error = ?err, "upload failed");
                Toast::error(T::MESSAGES.upload_failed).with_description(user_message(err))
            }
            _ => {
                tracing::error!(collection = T::COLLECTION, error = ?err, "save failed");
                Toast::error(T::MESSAGES.save_failed).with_description(user_message(err))
            }
        };
        self.notifier.notify(toast);
    }

    pub fn request_delete(&self, id: &RecordId) -> FolioResult<DeletePrompt<T>> {
        let stored = self.find(id)?;
        Ok(DeletePrompt {
            message: format!("Delete \"{}\"?", stored.record.display_name()),
            asset_url: stored.record.asset_url().map(str::to_string),
            id: stored.id,
            _marker: PhantomData,
        })
    }

    /// Remove the record, then its owned asset (best effort), then reload.
    pub async fn delete(&mut self, confirmed: ConfirmedDelete<T>) -> bool {
        if !self.admitted() {
            return false;
        }

        if let Err(err) = self.store.delete(&confirmed.id).await {
            tracing::error!(collection = T::COLLECTION, id = %confirmed.id, error = ?err, "delete failed");
            self.notifier
                .notify(Toast::error(T::MESSAGES.delete_failed).with_description(user_message(&err)));
            return false;
        }

        if let (Some(url), Some(uploader)) = (&confirmed.asset_url, &self.uploader) {
            if uploader.delete_by_url(url).await == CleanupOutcome::Failed {
                let err = FolioError::cleanup_failed(format!("{url} is orphaned"));
                tracing::warn!(collection = T::COLLECTION, id = %confirmed.id, error = %err, "asset left behind");
            }
        }

        self.notifier.notify(Toast::success(T::MESSAGES.deleted));
        self.reload().await;
        true
    }

    fn admitted(&self) -> bool {
        match self.auth.require_admin() {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(collection = T::COLLECTION, error = %err, "refused without admin access");
                self.notifier.notify(Toast::error(user_message(&err)));
                false
            }
        }
    }

    fn find(&self, id: &RecordId) -> FolioResult<Stored<T>> {
        self.items
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or_else(|| {
                FolioError::not_found(format!("{} record {id} is not loaded", T::COLLECTION))
                    .into_anyhow()
            })
    }
}
