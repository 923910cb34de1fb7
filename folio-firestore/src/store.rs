use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use folio_core::{Document, DocumentStore, FolioError, NewDocument, RecordId, CREATED_AT_FIELD};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::codec::{decode_fields, decode_timestamp, document_id, encode_fields, encode_timestamp};
use crate::config::FirestoreConfig;
use crate::error::{FirestoreError, FirestoreResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
    create_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPage {
    #[serde(default)]
    documents: Vec<RawDocument>,
    next_page_token: Option<String>,
}

/// Bearer credential of the signed-in session, read on every request.
pub type TokenSource = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// [`DocumentStore`] over the Firestore REST API.
pub struct FirestoreStore {
    client: Client,
    config: FirestoreConfig,
    session_token: Option<TokenSource>,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            session_token: None,
        }
    }

    /// Authorize requests as the signed-in user. While the source yields
    /// a token it wins over the configured `bearer_token`.
    pub fn with_token_source(mut self, source: TokenSource) -> Self {
        self.session_token = Some(source);
        self
    }

    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/{}",
            self.config.documents_url(),
            urlencoding::encode(collection)
        )
    }

    fn document_url(&self, collection: &str, id: &RecordId) -> String {
        format!(
            "{}/{}",
            self.collection_url(collection),
            urlencoding::encode(id.as_str())
        )
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let session = self.session_token.as_ref().and_then(|source| source());
        match session.as_ref().or(self.config.bearer_token.as_ref()) {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> FirestoreResult<Response> {
        let res = self.authorize(req).send().await?;
        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status();
        let body: Value = res.json().await.unwrap_or(Value::Null);
        let message = body["error"]["message"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string());
        Err(FirestoreError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

fn into_document(raw: RawDocument) -> FirestoreResult<Document> {
    let id = document_id(&raw.name)
        .ok_or_else(|| FirestoreError::decode(format!("bad document name {}", raw.name)))?;

    let mut fields = raw.fields;
    let stamped = fields.remove(CREATED_AT_FIELD);
    let created_at = stamped
        .as_ref()
        .and_then(decode_timestamp)
        .or_else(|| raw.create_time.as_ref().and_then(|t| decode_timestamp(&json!(t))))
        .unwrap_or_else(Utc::now);

    Ok(Document {
        id: RecordId::from(id),
        created_at,
        fields: decode_fields(&fields)?,
    })
}

/// Firestore field paths must be backtick-quoted unless they are plain identifiers.
fn field_path(name: &str) -> String {
    let simple = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        name.to_string()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

fn not_found(err: FirestoreError, what: String) -> anyhow::Error {
    let missing = matches!(
        err,
        FirestoreError::Http { status, .. } if status == StatusCode::NOT_FOUND.as_u16()
    );
    if missing {
        FolioError::not_found(what).with_source(err.into()).into_anyhow()
    } else {
        err.into()
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn list(&self, collection: &str, order_by: &str) -> Result<Vec<Document>> {
        let mut out = Vec::new();
        let mut page_token: Option<String> = None;
        let page_size = self.config.page_size.to_string();

        loop {
            let mut query = vec![("orderBy", field_path(order_by)), ("pageSize", page_size.clone())];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }

            let req = self.client.get(self.collection_url(collection)).query(&query);
            let page: ListPage = match self.send(req).await {
                Ok(res) => res.json().await.map_err(FirestoreError::from)?,
                // a collection with no documents does not exist yet
                Err(FirestoreError::Http { status: 404, .. }) => break,
                Err(err) => return Err(err.into()),
            };

            for raw in page.documents {
                out.push(into_document(raw)?);
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(collection, count = out.len(), "firestore list");
        Ok(out)
    }

    async fn get(&self, collection: &str, id: &RecordId) -> Result<Document> {
        let req = self.client.get(self.document_url(collection, id));
        let res = self
            .send(req)
            .await
            .map_err(|e| not_found(e, format!("{collection}/{id} not found")))?;
        let raw: RawDocument = res.json().await.map_err(FirestoreError::from)?;
        Ok(into_document(raw)?)
    }

    async fn insert(&self, collection: &str, doc: NewDocument) -> Result<Document> {
        let mut fields = encode_fields(&doc.fields);
        fields.insert(CREATED_AT_FIELD.to_string(), encode_timestamp(&doc.created_at));

        let req = self
            .client
            .post(self.collection_url(collection))
            .json(&json!({ "fields": fields }));
        let raw: RawDocument = self
            .send(req)
            .await?
            .json()
            .await
            .map_err(FirestoreError::from)?;

        let created = into_document(raw)?;
        tracing::debug!(collection, id = %created.id, "firestore insert");
        Ok(created)
    }

    async fn patch(&self, collection: &str, id: &RecordId, fields: Map<String, Value>) -> Result<()> {
        let mut query: Vec<(&str, String)> = fields
            .keys()
            .map(|k| ("updateMask.fieldPaths", field_path(k)))
            .collect();
        query.push(("currentDocument.exists", "true".to_string()));

        let req = self
            .client
            .patch(self.document_url(collection, id))
            .query(&query)
            .json(&json!({ "fields": encode_fields(&fields) }));
        self.send(req)
            .await
            .map_err(|e| not_found(e, format!("{collection}/{id} not found")))?;

        tracing::debug!(collection, %id, fields = fields.len(), "firestore patch");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &RecordId) -> Result<()> {
        let req = self.client.delete(self.document_url(collection, id));
        self.send(req)
            .await
            .map_err(|e| not_found(e, format!("{collection}/{id} not found")))?;
        tracing::debug!(collection, %id, "firestore delete");
        Ok(())
    }
}
