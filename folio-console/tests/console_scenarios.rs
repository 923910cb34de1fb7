use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use serde_json::{json, Map, Value};

use folio_auth::{AllowList, AuthContext, MemoryAuthProvider};
use folio_blob::{
    BlobConfig, BlobError, BlobResult, BlobStore, BlobUpload, BlobUploader, MemoryBlobStore,
    PutResult,
};
use folio_console::console::ConsoleParts;
use folio_console::content::{Contractor, GalleryItem, Partner};
use folio_console::{AdminConsole, Route, SaveOutcome, ToastLog, ToastVariant, Visit};
use folio_core::{
    Document, DocumentStore, MemoryDocumentStore, NewDocument, Record, RecordId,
};

const CDN: &str = "https://cdn.example.com/site";
const ADMIN: &str = "owner@example.com";
const VISITOR: &str = "visitor@example.com";

#[derive(Default)]
struct Calls {
    list: AtomicUsize,
    insert: AtomicUsize,
    patch: AtomicUsize,
    delete: AtomicUsize,
}

/// Counts backend calls; writes can be made to fail.
#[derive(Default)]
struct SpyDocuments {
    inner: MemoryDocumentStore,
    calls: Calls,
    fail_writes: AtomicBool,
    last_patch: std::sync::Mutex<Option<Map<String, Value>>>,
}

impl SpyDocuments {
    fn writes(&self) -> usize {
        self.calls.insert.load(Ordering::SeqCst) + self.calls.patch.load(Ordering::SeqCst)
    }

    fn lists(&self) -> usize {
        self.calls.list.load(Ordering::SeqCst)
    }

    async fn seed(&self, collection: &str, id: &str, fields: Value) {
        let Value::Object(fields) = fields else {
            panic!("seed fields must be an object");
        };
        self.inner
            .put(
                collection,
                Document {
                    id: RecordId::from(id),
                    created_at: Utc::now(),
                    fields,
                },
            )
            .await;
    }
}

#[async_trait]
impl DocumentStore for SpyDocuments {
    async fn list(&self, collection: &str, order_by: &str) -> Result<Vec<Document>> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        self.inner.list(collection, order_by).await
    }

    async fn get(&self, collection: &str, id: &RecordId) -> Result<Document> {
        self.inner.get(collection, id).await
    }

    async fn insert(&self, collection: &str, doc: NewDocument) -> Result<Document> {
        self.calls.insert.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("backend offline"));
        }
        self.inner.insert(collection, doc).await
    }

    async fn patch(&self, collection: &str, id: &RecordId, fields: Map<String, Value>) -> Result<()> {
        self.calls.patch.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("backend offline"));
        }
        *self.last_patch.lock().unwrap() = Some(fields.clone());
        self.inner.patch(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &RecordId) -> Result<()> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(collection, id).await
    }
}

/// Counts object store calls; puts and deletes can be made to fail.
struct SpyBlobs {
    inner: MemoryBlobStore,
    puts: AtomicUsize,
    deletes: AtomicUsize,
    fail_puts: AtomicBool,
    fail_deletes: AtomicBool,
}

impl SpyBlobs {
    fn new() -> Self {
        Self {
            inner: MemoryBlobStore::new(CDN),
            puts: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            fail_puts: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl BlobStore for SpyBlobs {
    async fn put(&self, key: &str, content_type: Option<&str>, body: Bytes) -> BlobResult<PutResult> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(BlobError::backend(std::io::Error::other("quota exceeded")));
        }
        self.inner.put(key, content_type, body).await
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(BlobError::backend(std::io::Error::other("permission denied")));
        }
        self.inner.delete(key).await
    }

    fn url_for(&self, key: &str) -> String {
        self.inner.url_for(key)
    }
}

struct Harness {
    console: AdminConsole,
    documents: Arc<SpyDocuments>,
    blobs: Arc<SpyBlobs>,
    toasts: Arc<ToastLog>,
}

async fn harness() -> Harness {
    let documents = Arc::new(SpyDocuments::default());
    let blobs = Arc::new(SpyBlobs::new());
    let toasts = Arc::new(ToastLog::new());

    let provider = Arc::new(MemoryAuthProvider::new());
    provider.add_account(ADMIN, "hunter22").await;
    provider.add_account(VISITOR, "letmein1").await;
    let auth = AuthContext::initialize(provider, AllowList::new([ADMIN]));

    let config = BlobConfig::new().with_public_base_url(CDN).accepting("image/");
    let uploader = |prefix: &str| {
        Arc::new(BlobUploader::new(
            blobs.clone() as Arc<dyn BlobStore>,
            prefix,
            config.clone(),
        ))
    };

    let console = AdminConsole::new(ConsoleParts {
        documents: documents.clone(),
        gallery_assets: uploader(GalleryItem::COLLECTION),
        contractor_assets: uploader(Contractor::COLLECTION),
        partner_assets: uploader(Partner::COLLECTION),
        auth,
        notifier: toasts.clone(),
    });
    console.ready().await;

    Harness {
        console,
        documents,
        blobs,
        toasts,
    }
}

async fn signed_in_admin() -> Harness {
    let mut h = harness().await;
    assert_eq!(h.console.sign_in(ADMIN, "hunter22").await, Route::Dashboard);
    h
}

fn photo(name: &str) -> BlobUpload {
    BlobUpload::new(vec![0xff, 0xd8, 0xff, 0xe0], name)
}

async fn seed_gallery(h: &Harness, count: i64) {
    for i in 0..count {
        h.documents
            .seed(
                "gallery",
                &format!("g{i}"),
                json!({
                    "title": format!("Project {i}"),
                    "description": "",
                    "category": "Bathroom",
                    "imageUrl": format!("{CDN}/gallery/{i}_seed.jpg"),
                    "order": i,
                }),
            )
            .await;
    }
}

#[tokio::test]
async fn new_gallery_item_uploads_once_and_goes_last() {
    let mut h = signed_in_admin().await;
    seed_gallery(&h, 3).await;
    assert_eq!(h.console.visit(Route::Gallery).await, Visit::Screen(Route::Gallery));

    let gallery = h.console.gallery();
    gallery.add();
    {
        let form = gallery.form_mut().unwrap();
        form.title = "Kitchen Reno".into();
        form.category = "Kitchen".into();
    }
    gallery.select_asset(photo("reno.jpg")).unwrap();

    let outcome = gallery.save().await;
    assert!(matches!(outcome, Some(SaveOutcome::Created(_))));
    assert_eq!(h.blobs.puts.load(Ordering::SeqCst), 1);

    let gallery = h.console.gallery();
    let created = gallery
        .items()
        .iter()
        .find(|s| s.record.title == "Kitchen Reno")
        .expect("created item is listed");
    assert_eq!(created.record.order, 3);
    assert!(created.record.image_url.starts_with(&format!("{CDN}/gallery/")));
    assert!(created.record.image_url.ends_with("_reno.jpg"));
    assert!(!gallery.editor().is_open());
    assert_eq!(h.toasts.last().unwrap().title, "Gallery item added");
}

#[tokio::test]
async fn editing_one_field_patches_only_that_field() {
    let mut h = signed_in_admin().await;
    h.documents
        .seed(
            "contractors",
            "c1",
            json!({"name": "Ana", "role": "Lead", "bio": "", "photoUrl": "", "order": 0}),
        )
        .await;
    h.console.visit(Route::Contractors).await;

    let screen = h.console.contractors();
    screen.edit(&RecordId::from("c1")).unwrap();
    screen.form_mut().unwrap().bio = "Twenty years of framing".into();

    let outcome = screen.save().await;
    match outcome {
        Some(SaveOutcome::Updated { id, fields }) => {
            assert_eq!(id, RecordId::from("c1"));
            assert_eq!(fields, vec!["bio".to_string()]);
        }
        other => panic!("expected an update, got {other:?}"),
    }

    let patch = h.documents.last_patch.lock().unwrap().clone().unwrap();
    assert_eq!(patch.len(), 1);
    assert_eq!(patch["bio"], json!("Twenty years of framing"));
    assert_eq!(h.blobs.puts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unchanged_edit_writes_nothing() {
    let mut h = signed_in_admin().await;
    h.documents
        .seed(
            "contractors",
            "c1",
            json!({"name": "Ana", "role": "Lead", "bio": "Hi", "photoUrl": "", "order": 0}),
        )
        .await;
    h.console.visit(Route::Contractors).await;

    let screen = h.console.contractors();
    screen.edit(&RecordId::from("c1")).unwrap();
    let outcome = screen.save().await;

    assert_eq!(outcome, Some(SaveOutcome::Unchanged(RecordId::from("c1"))));
    assert_eq!(h.documents.writes(), 0);
}

#[tokio::test]
async fn missing_required_field_never_reaches_the_store() {
    let mut h = signed_in_admin().await;
    h.console.visit(Route::Contractors).await;

    let screen = h.console.contractors();
    screen.add();
    screen.form_mut().unwrap().name = "Ana".into();
    screen.select_asset(photo("ana.png")).unwrap();

    assert_eq!(screen.save().await, None);
    assert!(screen.editor().is_open());
    assert_eq!(h.documents.writes(), 0);
    assert_eq!(h.blobs.puts.load(Ordering::SeqCst), 0);

    let toast = h.toasts.last().unwrap();
    assert_eq!(toast.title, "Please fill in name and role");
    assert_eq!(toast.variant, ToastVariant::Destructive);
}

#[tokio::test]
async fn gallery_item_without_image_is_rejected() {
    let mut h = signed_in_admin().await;
    h.console.visit(Route::Gallery).await;

    let gallery = h.console.gallery();
    gallery.add();
    {
        let form = gallery.form_mut().unwrap();
        form.title = "Porch".into();
        form.category = "Exterior".into();
    }

    assert_eq!(gallery.save().await, None);
    assert_eq!(h.documents.writes(), 0);
    assert_eq!(h.toasts.last().unwrap().title, "Please upload an image");
}

#[tokio::test]
async fn failed_upload_skips_the_write() {
    let mut h = signed_in_admin().await;
    h.blobs.fail_puts.store(true, Ordering::SeqCst);
    h.console.visit(Route::Partners).await;

    let screen = h.console.partners();
    screen.add();
    screen.form_mut().unwrap().name = "Acme Lumber".into();
    screen.select_asset(photo("acme.png")).unwrap();

    assert_eq!(screen.save().await, None);
    assert!(screen.editor().is_open());
    assert_eq!(h.documents.writes(), 0);
    assert_eq!(h.toasts.last().unwrap().title, "Error uploading logo");
}

#[tokio::test]
async fn failed_write_keeps_editor_open_and_cleans_up_upload() {
    let mut h = signed_in_admin().await;
    h.documents.fail_writes.store(true, Ordering::SeqCst);
    h.console.visit(Route::Gallery).await;

    let gallery = h.console.gallery();
    gallery.add();
    {
        let form = gallery.form_mut().unwrap();
        form.title = "Deck".into();
        form.category = "Exterior".into();
    }
    gallery.select_asset(photo("deck.jpg")).unwrap();

    assert_eq!(gallery.save().await, None);
    assert!(gallery.editor().is_open());
    assert!(!gallery.editor().is_busy());
    assert_eq!(gallery.editor().form().title, "Deck");

    assert_eq!(h.blobs.puts.load(Ordering::SeqCst), 1);
    assert_eq!(h.blobs.deletes.load(Ordering::SeqCst), 1);
    assert!(h.blobs.inner.keys().await.is_empty());

    let toast = h.toasts.last().unwrap();
    assert_eq!(toast.title, "Error saving item");
    assert!(toast.is_error());
}

#[tokio::test]
async fn delete_prompt_names_the_record() {
    let mut h = signed_in_admin().await;
    seed_gallery(&h, 1).await;
    h.console.visit(Route::Gallery).await;

    let prompt = h
        .console
        .gallery()
        .request_delete(&RecordId::from("g0"))
        .unwrap();
    assert_eq!(prompt.message(), "Delete \"Project 0\"?");

    // dropping the prompt deletes nothing
    drop(prompt);
    assert_eq!(h.documents.calls.delete.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn deleting_owned_asset_removes_the_blob_once() {
    let mut h = signed_in_admin().await;
    let receipt = BlobUploader::new(
        h.blobs.clone() as Arc<dyn BlobStore>,
        "gallery",
        BlobConfig::new().with_public_base_url(CDN),
    )
    .upload(photo("seed.jpg"))
    .await
    .unwrap();
    h.documents
        .seed(
            "gallery",
            "g1",
            json!({"title": "Attic", "category": "Other", "imageUrl": receipt.url, "order": 0}),
        )
        .await;
    h.console.visit(Route::Gallery).await;

    let gallery = h.console.gallery();
    let prompt = gallery.request_delete(&RecordId::from("g1")).unwrap();
    assert!(gallery.delete(prompt.confirm()).await);

    assert!(gallery.items().is_empty());
    assert_eq!(h.blobs.deletes.load(Ordering::SeqCst), 1);
    assert!(h.blobs.inner.keys().await.is_empty());
    assert_eq!(h.toasts.last().unwrap().title, "Gallery item deleted");
}

#[tokio::test]
async fn deleting_external_asset_never_touches_storage() {
    let mut h = signed_in_admin().await;
    h.documents
        .seed(
            "partners",
            "p1",
            json!({
                "name": "Acme",
                "description": "",
                "websiteUrl": "https://acme.example.org",
                "logoUrl": "https://images.example.org/acme.png",
                "order": 0,
            }),
        )
        .await;
    h.console.visit(Route::Partners).await;

    let screen = h.console.partners();
    let prompt = screen.request_delete(&RecordId::from("p1")).unwrap();
    assert!(screen.delete(prompt.confirm()).await);

    assert!(screen.items().is_empty());
    assert_eq!(h.blobs.deletes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn asset_cleanup_failure_still_deletes_the_record() {
    let mut h = signed_in_admin().await;
    h.blobs.fail_deletes.store(true, Ordering::SeqCst);
    h.documents
        .seed(
            "contractors",
            "c1",
            json!({
                "name": "Ana",
                "role": "Lead",
                "photoUrl": format!("{CDN}/contractors/1700000000000_ana.jpg"),
                "order": 0,
            }),
        )
        .await;
    h.console.visit(Route::Contractors).await;

    let screen = h.console.contractors();
    let prompt = screen.request_delete(&RecordId::from("c1")).unwrap();
    assert!(screen.delete(prompt.confirm()).await);

    assert!(screen.items().is_empty());
    assert_eq!(h.blobs.deletes.load(Ordering::SeqCst), 1);
    assert_eq!(h.toasts.last().unwrap().title, "Contractor deleted");
}

#[tokio::test]
async fn visitor_is_redirected_before_any_load() {
    let mut h = harness().await;
    assert_eq!(h.console.sign_in(VISITOR, "letmein1").await, Route::Login);

    assert_eq!(h.console.visit(Route::Gallery).await, Visit::Redirect(Route::Login));
    assert_eq!(h.console.visit(Route::Dashboard).await, Visit::Redirect(Route::Login));
    assert_eq!(h.documents.lists(), 0);

    match h.console.visit(Route::Login).await {
        Visit::Login(view) => {
            assert!(view.access_denied);
            assert_eq!(view.signed_in_as.as_deref(), Some(VISITOR));
        }
        other => panic!("expected the login view, got {other:?}"),
    }
}

#[tokio::test]
async fn signed_out_visit_redirects_and_wrong_password_reports() {
    let mut h = harness().await;
    assert_eq!(h.console.visit(Route::Services).await, Visit::Redirect(Route::Login));

    assert_eq!(h.console.sign_in(ADMIN, "wrong").await, Route::Login);
    let toast = h.toasts.last().unwrap();
    assert_eq!(toast.title, "Invalid email or password");
    match h.console.visit(Route::Login).await {
        Visit::Login(view) => assert_eq!(view.error.as_deref(), Some("Invalid email or password")),
        other => panic!("expected the login view, got {other:?}"),
    }
}

#[tokio::test]
async fn dashboard_counts_each_collection() {
    let mut h = signed_in_admin().await;
    seed_gallery(&h, 2).await;
    h.documents
        .seed(
            "services",
            "s1",
            json!({"title": "Roofing", "description": "", "icon": "home", "order": 0}),
        )
        .await;

    let Visit::Dashboard(dashboard) = h.console.visit(Route::Dashboard).await else {
        panic!("admin should see the dashboard");
    };
    let counts: Vec<_> = dashboard
        .cards
        .iter()
        .map(|c| (c.title, c.count))
        .collect();
    assert_eq!(
        counts,
        [
            ("Gallery", Some(2)),
            ("Contractors", Some(0)),
            ("Partners", Some(0)),
            ("Services", Some(1)),
        ]
    );
}

#[tokio::test]
async fn sign_out_clears_screens() {
    let mut h = signed_in_admin().await;
    seed_gallery(&h, 2).await;
    h.console.visit(Route::Gallery).await;
    assert_eq!(h.console.gallery().rows().len(), 2);

    assert_eq!(h.console.sign_out().await, Route::Login);
    assert!(h.console.gallery().items().is_empty());
    assert_eq!(h.console.visit(Route::Gallery).await, Visit::Redirect(Route::Login));
}

#[tokio::test]
async fn services_have_no_asset() {
    let mut h = signed_in_admin().await;
    h.console.visit(Route::Services).await;

    let screen = h.console.services();
    screen.add();
    assert!(screen.select_asset(photo("icon.png")).is_err());

    screen.form_mut().unwrap().title = "Painting".into();
    assert!(matches!(screen.save().await, Some(SaveOutcome::Created(_))));

    let rows = screen.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Painting");
    assert_eq!(rows[0].asset_url, None);
    assert_eq!(h.toasts.last().unwrap().title, "Service added");
}

#[tokio::test]
async fn screens_refuse_a_signed_in_visitor() {
    let mut h = harness().await;
    seed_gallery(&h, 2).await;
    assert_eq!(h.console.sign_in(VISITOR, "letmein1").await, Route::Login);

    let gallery = h.console.gallery();
    assert!(!gallery.mount().await);
    assert!(gallery.items().is_empty());

    gallery.add();
    {
        let form = gallery.form_mut().unwrap();
        form.title = "Sneaky".into();
        form.category = "Kitchen".into();
    }
    gallery.select_asset(photo("sneaky.jpg")).unwrap();
    assert_eq!(gallery.save().await, None);

    assert_eq!(h.documents.lists(), 0);
    assert_eq!(h.documents.writes(), 0);
    assert_eq!(h.blobs.puts.load(Ordering::SeqCst), 0);
    let toast = h.toasts.last().unwrap();
    assert_eq!(toast.title, "Access denied");
    assert!(toast.is_error());
}

#[tokio::test]
async fn delete_is_refused_once_the_session_loses_admin() {
    let mut h = signed_in_admin().await;
    seed_gallery(&h, 1).await;
    h.console.visit(Route::Gallery).await;
    let prompt = h
        .console
        .gallery()
        .request_delete(&RecordId::from("g0"))
        .unwrap();

    assert_eq!(h.console.sign_in(VISITOR, "letmein1").await, Route::Login);
    assert!(!h.console.gallery().delete(prompt.confirm()).await);

    assert_eq!(h.documents.calls.delete.load(Ordering::SeqCst), 0);
    assert_eq!(h.blobs.deletes.load(Ordering::SeqCst), 0);
    assert_eq!(h.documents.inner.len("gallery").await, 1);
}

#[tokio::test]
async fn documents_missing_fields_still_list_and_count() {
    let mut h = signed_in_admin().await;
    seed_gallery(&h, 2).await;
    h.documents
        .seed(
            "gallery",
            "legacy",
            json!({"title": "Legacy", "imageUrl": format!("{CDN}/gallery/9_legacy.jpg"), "order": 2}),
        )
        .await;
    h.documents
        .seed("services", "s1", json!({"title": "Roofing", "order": 0}))
        .await;

    let Visit::Dashboard(dashboard) = h.console.visit(Route::Dashboard).await else {
        panic!("admin should see the dashboard");
    };
    assert_eq!(dashboard.cards[0].count, Some(3));
    assert_eq!(dashboard.cards[3].count, Some(1));

    h.console.visit(Route::Gallery).await;
    let gallery = h.console.gallery();
    let names: Vec<_> = gallery.rows().into_iter().map(|r| r.name).collect();
    assert_eq!(names, ["Project 0", "Project 1", "Legacy"]);

    gallery.add();
    {
        let form = gallery.form_mut().unwrap();
        form.title = "Bath Refresh".into();
        form.category = "Bathroom".into();
    }
    gallery.select_asset(photo("bath.jpg")).unwrap();
    assert!(matches!(gallery.save().await, Some(SaveOutcome::Created(_))));

    let created = gallery
        .items()
        .iter()
        .find(|s| s.record.title == "Bath Refresh")
        .expect("created item is listed");
    assert_eq!(created.record.order, 3);
}

#[tokio::test]
async fn partner_created_without_logo_then_given_one() {
    let mut h = signed_in_admin().await;
    h.console.visit(Route::Partners).await;

    let screen = h.console.partners();
    screen.add();
    {
        let form = screen.form_mut().unwrap();
        form.name = "Acme Lumber".into();
        form.website_url = "https://acme.example.org".into();
    }
    let Some(SaveOutcome::Created(id)) = screen.save().await else {
        panic!("partner should be created without a logo");
    };
    let rows = screen.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Acme Lumber");
    assert_eq!(rows[0].asset_url, None);
    assert_eq!(h.blobs.puts.load(Ordering::SeqCst), 0);

    screen.edit(&id).unwrap();
    screen.form_mut().unwrap().website_url = "https://acmelumber.example.org".into();
    screen.select_asset(photo("acme.png")).unwrap();

    match screen.save().await {
        Some(SaveOutcome::Updated { fields, .. }) => {
            let mut fields = fields;
            fields.sort();
            assert_eq!(fields, ["logoUrl", "websiteUrl"]);
        }
        other => panic!("expected an update, got {other:?}"),
    }

    let partner = &screen.items()[0].record;
    assert_eq!(partner.website_url, "https://acmelumber.example.org");
    assert!(partner.logo_url.starts_with(&format!("{CDN}/partners/")));
    assert_eq!(partner.order, 0);
    assert_eq!(h.blobs.puts.load(Ordering::SeqCst), 1);
    assert_eq!(h.toasts.last().unwrap().title, "Partner updated");
}
