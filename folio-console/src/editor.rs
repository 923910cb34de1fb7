//! Single-record edit buffer.
//!
//! ```text
//!            open(None)            save ok / cancel
//!   Closed ─────────────► EditingNew ─────────────► Closed
//!      │    open(Some(r))                              ▲
//!      └────────────► EditingExisting(id) ─────────────┘
//! ```
//!
//! A save runs in three steps so a UI loop can keep the editor responsive
//! while network calls are in flight: [`Editor::begin_save`] validates and
//! snapshots the buffer, [`SaveJob::run`] uploads and writes, and
//! [`Editor::finish_save`] applies the outcome unless the editor has moved
//! on to another session in the meantime. [`Editor::save`] chains all three.

use folio_blob::{BlobUpload, BlobUploader, CleanupOutcome};
use folio_core::{FolioError, FolioResult, RecordId, RecordPatch, RecordStore, Stored};
use uuid::Uuid;

use crate::content::{AssetPolicy, Content};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorMode {
    Closed,
    EditingNew,
    EditingExisting(RecordId),
}

/// What the asset slot currently shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetPreview {
    Empty,
    /// The stored asset of the record being edited.
    Remote(String),
    /// A picked file that has not been uploaded yet.
    Local { handle: String, filename: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(RecordId),
    Updated { id: RecordId, fields: Vec<String> },
    /// Nothing differed from the opened record; no write was made.
    Unchanged(RecordId),
}

enum Target<T> {
    New { order: i64 },
    Existing(Stored<T>),
}

/// Snapshot of an editor at the moment a save started.
pub struct SaveJob<T: Content> {
    session: u64,
    target: Target<T>,
    form: T::Form,
    existing_asset: Option<String>,
    pending: Option<BlobUpload>,
}

pub struct Editor<T: Content> {
    mode: EditorMode,
    form: T::Form,
    opened: Option<Stored<T>>,
    existing_asset: Option<String>,
    pending: Option<BlobUpload>,
    preview: AssetPreview,
    busy: bool,
    session: u64,
}

impl<T: Content> Default for Editor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Content> Editor<T> {
    pub fn new() -> Self {
        Self {
            mode: EditorMode::Closed,
            form: T::Form::default(),
            opened: None,
            existing_asset: None,
            pending: None,
            preview: AssetPreview::Empty,
            busy: false,
            session: 0,
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != EditorMode::Closed
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn form(&self) -> &T::Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> FolioResult<&mut T::Form> {
        if !self.is_open() {
            return Err(FolioError::invalid_state("No record is being edited").into_anyhow());
        }
        Ok(&mut self.form)
    }

    pub fn preview(&self) -> &AssetPreview {
        &self.preview
    }

    pub fn has_pending_asset(&self) -> bool {
        self.pending.is_some()
    }

    /// Seed the buffer from `existing`, or blank it for a new record.
    pub fn open(&mut self, existing: Option<&Stored<T>>) {
        self.reset();
        match existing {
            Some(stored) => {
                self.mode = EditorMode::EditingExisting(stored.id.clone());
                self.form = stored.record.form_from();
                self.existing_asset = stored.record.asset_url().map(str::to_string);
                if let Some(url) = &self.existing_asset {
                    self.preview = AssetPreview::Remote(url.clone());
                }
                self.opened = Some(stored.clone());
            }
            None => self.mode = EditorMode::EditingNew,
        }
        tracing::debug!(collection = T::COLLECTION, mode = ?self.mode, "editor opened");
    }

    /// Replace the pending asset. Nothing is uploaded until save.
    pub fn select_asset(&mut self, upload: BlobUpload) -> FolioResult<&AssetPreview> {
        if !self.is_open() {
            return Err(FolioError::invalid_state("No record is being edited").into_anyhow());
        }
        if T::ASSET == AssetPolicy::None {
            return Err(
                FolioError::invalid_state(format!("{} have no image", T::TITLE)).into_anyhow(),
            );
        }

        self.preview = AssetPreview::Local {
            handle: format!("blob:{}", Uuid::new_v4()),
            filename: upload.filename.clone(),
        };
        self.pending = Some(upload);
        Ok(&self.preview)
    }

    /// Close and discard edits. Any save still in flight is no longer reflected.
    pub fn cancel(&mut self) {
        self.reset();
        tracing::debug!(collection = T::COLLECTION, "editor closed");
    }

    /// Validate and snapshot the buffer.
    ///
    /// `Ok(None)` when a save is already in flight. `loaded` is the number
    /// of records currently shown; a new record is placed after them.
    pub fn begin_save(&mut self, loaded: usize) -> FolioResult<Option<SaveJob<T>>> {
        if self.busy {
            tracing::debug!(collection = T::COLLECTION, "save already in flight");
            return Ok(None);
        }

        let target = match (&self.mode, &self.opened) {
            (EditorMode::Closed, _) => {
                return Err(FolioError::invalid_state("No record is being edited").into_anyhow())
            }
            (EditorMode::EditingNew, _) => Target::New {
                order: loaded as i64,
            },
            (EditorMode::EditingExisting(_), Some(stored)) => Target::Existing(stored.clone()),
            (EditorMode::EditingExisting(id), None) => {
                return Err(FolioError::invalid_state(format!("Record {id} was not loaded"))
                    .into_anyhow())
            }
        };

        T::validate(&self.form)?;

        self.busy = true;
        Ok(Some(SaveJob {
            session: self.session,
            target,
            form: self.form.clone(),
            existing_asset: self.existing_asset.clone(),
            pending: self.pending.clone(),
        }))
    }

    /// Apply a finished save. Returns false for a completion from an
    /// earlier session, which is ignored.
    pub fn finish_save(&mut self, session: u64, result: &FolioResult<SaveOutcome>) -> bool {
        if session != self.session {
            tracing::debug!(collection = T::COLLECTION, session, "stale save completion ignored");
            return false;
        }

        self.busy = false;
        if result.is_ok() {
            self.reset();
        }
        true
    }

    /// `begin_save`, `run`, `finish_save` in one go.
    pub async fn save(
        &mut self,
        store: &RecordStore<T>,
        uploader: Option<&BlobUploader>,
        loaded: usize,
    ) -> FolioResult<Option<SaveOutcome>> {
        let Some(job) = self.begin_save(loaded)? else {
            return Ok(None);
        };

        let session = job.session();
        let result = job.run(store, uploader).await;
        self.finish_save(session, &result);
        result.map(Some)
    }

    fn reset(&mut self) {
        self.mode = EditorMode::Closed;
        self.form = T::Form::default();
        self.opened = None;
        self.existing_asset = None;
        self.pending = None;
        self.preview = AssetPreview::Empty;
        self.busy = false;
        self.session += 1;
    }
}

impl<T: Content> SaveJob<T> {
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Upload the pending asset (if any), then create or patch the record.
    pub async fn run(
        self,
        store: &RecordStore<T>,
        uploader: Option<&BlobUploader>,
    ) -> FolioResult<SaveOutcome> {
        let uploaded = match self.pending {
            Some(upload) => {
                let uploader = uploader.ok_or_else(|| {
                    FolioError::invalid_state(format!("{} have no image storage", T::TITLE))
                        .into_anyhow()
                })?;
                let receipt = uploader.upload(upload).await.map_err(|e| {
                    let msg = e.to_string();
                    FolioError::upload_failed(msg).with_source(e.into()).into_anyhow()
                })?;
                Some(receipt.url)
            }
            None => None,
        };

        let fresh_upload = uploaded.clone();
        let asset = uploaded.or(self.existing_asset);
        if T::ASSET == AssetPolicy::Required && asset.is_none() {
            return Err(FolioError::validation(T::MESSAGES.missing_asset).into_anyhow());
        }

        let written = match self.target {
            Target::New { order } => {
                let record = T::build(&self.form, asset, order);
                store.create(record).await.map(SaveOutcome::Created)
            }
            Target::Existing(stored) => {
                let record = T::build(&self.form, asset, stored.record.order());
                match RecordPatch::diff(&stored.record, &record) {
                    Ok(patch) if patch.is_empty() => Ok(SaveOutcome::Unchanged(stored.id)),
                    Ok(patch) => {
                        let fields = patch.keys().map(str::to_string).collect();
                        store
                            .update(&stored.id, patch)
                            .await
                            .map(|()| SaveOutcome::Updated {
                                id: stored.id,
                                fields,
                            })
                    }
                    Err(e) => Err(e),
                }
            }
        };

        // a blob uploaded for a write that failed belongs to nothing
        if written.is_err() {
            if let (Some(url), Some(uploader)) = (fresh_upload, uploader) {
                if uploader.delete_by_url(&url).await == CleanupOutcome::Failed {
                    let err = FolioError::cleanup_failed(format!("{url} is orphaned"));
                    tracing::warn!(collection = T::COLLECTION, error = %err, "upload cleanup failed");
                }
            }
        }
        written
    }
}
