use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;

use crate::document::{DocumentStore, NewDocument, RecordId};
use crate::errors::{ErrorKind, FolioError};
use crate::record::{record_fields, Record, RecordPatch, Stored, ORDER_FIELD};

/// Typed accessor over one document collection.
///
/// One `RecordStore<T>` exists per content type; the collection name
/// comes from `T::COLLECTION`. Failures are classified so the console
/// can tell a retryable outage (`StoreUnavailable`, `SaveFailed`) from
/// a missing record (`NotFound`).
pub struct RecordStore<T: Record> {
    backend: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for RecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            _record: PhantomData,
        }
    }
}

impl<T: Record> RecordStore<T> {
    pub fn new(backend: Arc<dyn DocumentStore>) -> Self {
        Self {
            backend,
            _record: PhantomData,
        }
    }

    pub fn collection(&self) -> &'static str {
        T::COLLECTION
    }

    /// Every record of the collection, ascending by `order`.
    ///
    /// Documents that no longer decode as `T` are skipped with a warning
    /// so one bad document does not hide the rest of the list.
    pub async fn list(&self) -> Result<Vec<Stored<T>>> {
        let docs = self
            .backend
            .list(T::COLLECTION, ORDER_FIELD)
            .await
            .map_err(|e| {
                FolioError::new(
                    ErrorKind::StoreUnavailable,
                    format!("Could not load {}", T::COLLECTION),
                )
                .with_source(e)
                .into_anyhow()
            })?;

        let mut out = Vec::with_capacity(docs.len());
        for doc in docs {
            match Stored::<T>::from_document(doc) {
                Ok(stored) => out.push(stored),
                Err(e) => tracing::warn!(collection = T::COLLECTION, error = %e, "skipping document"),
            }
        }

        // Backends already order by `order`; a stable sort keeps their tie order.
        out.sort_by_key(|s| s.record.order());
        Ok(out)
    }

    pub async fn get(&self, id: &RecordId) -> Result<Stored<T>> {
        let doc = self.backend.get(T::COLLECTION, id).await.map_err(|e| {
            FolioError::reclassify(
                e,
                ErrorKind::StoreUnavailable,
                format!("Could not load {}/{id}", T::COLLECTION),
            )
        })?;
        Stored::from_document(doc)
    }

    /// Persist a new record, stamping its creation time. Returns the assigned id.
    pub async fn create(&self, record: T) -> Result<RecordId> {
        let fields = record_fields(&record).map_err(|e| {
            FolioError::save_failed(format!("Could not encode {} record", T::COLLECTION))
                .with_source(e)
                .into_anyhow()
        })?;

        let doc = self
            .backend
            .insert(
                T::COLLECTION,
                NewDocument {
                    created_at: Utc::now(),
                    fields,
                },
            )
            .await
            .map_err(|e| {
                FolioError::save_failed(format!("Could not create {} record", T::COLLECTION))
                    .with_source(e)
                    .into_anyhow()
            })?;

        tracing::debug!(collection = T::COLLECTION, id = %doc.id, "record created");
        Ok(doc.id)
    }

    /// Merge `patch` into an existing record.
    pub async fn update(&self, id: &RecordId, patch: RecordPatch) -> Result<()> {
        self.backend
            .patch(T::COLLECTION, id, patch.into_fields())
            .await
            .map_err(|e| {
                FolioError::reclassify(
                    e,
                    ErrorKind::SaveFailed,
                    format!("Could not update {}/{id}", T::COLLECTION),
                )
            })?;

        tracing::debug!(collection = T::COLLECTION, id = %id, "record updated");
        Ok(())
    }

    /// Remove a record. A record that is already gone counts as removed.
    pub async fn delete(&self, id: &RecordId) -> Result<()> {
        match self.backend.delete(T::COLLECTION, id).await {
            Ok(()) => {
                tracing::debug!(collection = T::COLLECTION, id = %id, "record deleted");
                Ok(())
            }
            Err(e) if FolioError::kind_of(&e) == Some(ErrorKind::NotFound) => {
                tracing::debug!(collection = T::COLLECTION, id = %id, "record already absent");
                Ok(())
            }
            Err(e) => Err(FolioError::new(
                ErrorKind::StoreUnavailable,
                format!("Could not delete {}/{id}", T::COLLECTION),
            )
            .with_source(e)
            .into_anyhow()),
        }
    }
}
