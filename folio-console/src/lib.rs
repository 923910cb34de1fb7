//! folio-console: the admin console over Folio's content collections.
//!
//! Four [`ContentScreen`]s (gallery, contractors, partners, services)
//! share one document backend and one object store; every screen sits
//! behind the [`folio_auth::AuthContext`] gate.

pub mod app;
pub mod console;
pub mod content;
pub mod editor;
pub mod notify;
pub mod screen;
pub mod utils;

use std::sync::Arc;

use anyhow::Result;
use folio_core::FolioConfigSnapshot;

pub use console::{AdminConsole, Dashboard, DashboardCard, LoginView, Route, Visit};
pub use content::{AssetPolicy, Content};
pub use editor::{AssetPreview, Editor, EditorMode, SaveJob, SaveOutcome};
pub use notify::{Notifier, Toast, ToastLog, ToastVariant};
pub use screen::{ConfirmedDelete, ContentScreen, DeletePrompt, ListRow};

/// Build a console from configuration. Must run inside a tokio runtime.
pub async fn build(config: &FolioConfigSnapshot, notifier: Arc<dyn Notifier>) -> Result<AdminConsole> {
    let backends = app::backends(config).await?;
    Ok(app::assemble(backends, config, notifier))
}
