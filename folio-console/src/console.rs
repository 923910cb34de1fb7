//! The admin console: routes, the auth gate, and the four content screens.

use std::sync::Arc;

use folio_auth::{AdminStatus, AuthContext, AuthGate, AuthState};
use folio_blob::BlobUploader;
use folio_core::{DocumentStore, RecordStore};

use crate::content::{Contractor, Content, GalleryItem, Partner, Service};
use crate::notify::{Notifier, Toast};
use crate::screen::ContentScreen;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Gallery,
    Contractors,
    Partners,
    Services,
}

impl Route {
    /// Entries of the navigation sidebar, in order.
    pub const NAVIGATION: [Route; 5] = [
        Route::Dashboard,
        Route::Gallery,
        Route::Contractors,
        Route::Partners,
        Route::Services,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/admin/login",
            Route::Dashboard => "/admin",
            Route::Gallery => "/admin/gallery",
            Route::Contractors => "/admin/contractors",
            Route::Partners => "/admin/partners",
            Route::Services => "/admin/services",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Dashboard => "Dashboard",
            Route::Gallery => GalleryItem::TITLE,
            Route::Contractors => Contractor::TITLE,
            Route::Partners => Partner::TITLE,
            Route::Services => Service::TITLE,
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.trim_end_matches('/');
        let path = if path.is_empty() { "/" } else { path };
        [Route::Login]
            .into_iter()
            .chain(Route::NAVIGATION)
            .find(|r| r.path() == path)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginView {
    /// Email of the signed-in user, when there is one.
    pub signed_in_as: Option<String>,
    /// Signed in, but not on the allow-list.
    pub access_denied: bool,
    /// The remote allow-list could not be read, so admin status is unknown.
    pub allow_list_unavailable: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardCard {
    pub route: Route,
    pub title: &'static str,
    pub description: &'static str,
    /// `None` when the collection could not be read.
    pub count: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dashboard {
    pub cards: Vec<DashboardCard>,
}

/// Result of navigating to a route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Visit {
    /// Auth state is still being resolved.
    Loading,
    Redirect(Route),
    Login(LoginView),
    Dashboard(Dashboard),
    /// A content screen was mounted; read it through its accessor.
    Screen(Route),
}

/// Backends and collaborators one console is built from.
pub struct ConsoleParts {
    pub documents: Arc<dyn DocumentStore>,
    pub gallery_assets: Arc<BlobUploader>,
    pub contractor_assets: Arc<BlobUploader>,
    pub partner_assets: Arc<BlobUploader>,
    pub auth: Arc<AuthContext>,
    pub notifier: Arc<dyn Notifier>,
}

pub struct AdminConsole {
    auth: Arc<AuthContext>,
    notifier: Arc<dyn Notifier>,
    login_error: Option<String>,
    gallery: ContentScreen<GalleryItem>,
    contractors: ContentScreen<Contractor>,
    partners: ContentScreen<Partner>,
    services: ContentScreen<Service>,
}

impl AdminConsole {
    pub fn new(parts: ConsoleParts) -> Self {
        let ConsoleParts {
            documents,
            gallery_assets,
            contractor_assets,
            partner_assets,
            auth,
            notifier,
        } = parts;

        Self {
            gallery: ContentScreen::new(
                RecordStore::new(Arc::clone(&documents)),
                Some(gallery_assets),
                Arc::clone(&auth),
                Arc::clone(&notifier),
            ),
            contractors: ContentScreen::new(
                RecordStore::new(Arc::clone(&documents)),
                Some(contractor_assets),
                Arc::clone(&auth),
                Arc::clone(&notifier),
            ),
            partners: ContentScreen::new(
                RecordStore::new(Arc::clone(&documents)),
                Some(partner_assets),
                Arc::clone(&auth),
                Arc::clone(&notifier),
            ),
            services: ContentScreen::new(
                RecordStore::new(documents),
                None,
                Arc::clone(&auth),
                Arc::clone(&notifier),
            ),
            auth,
            notifier,
            login_error: None,
        }
    }

    pub fn auth(&self) -> &Arc<AuthContext> {
        &self.auth
    }

    /// Wait until the session's first identity report has been resolved.
    pub async fn ready(&self) -> AuthState {
        self.auth.ready().await
    }

    pub fn gallery(&mut self) -> &mut ContentScreen<GalleryItem> {
        &mut self.gallery
    }

    pub fn contractors(&mut self) -> &mut ContentScreen<Contractor> {
        &mut self.contractors
    }

    pub fn partners(&mut self) -> &mut ContentScreen<Partner> {
        &mut self.partners
    }

    pub fn services(&mut self) -> &mut ContentScreen<Service> {
        &mut self.services
    }

    /// Navigate. Admin routes load nothing unless the gate grants access.
    pub async fn visit(&mut self, route: Route) -> Visit {
        let state = self.auth.state();

        if route == Route::Login {
            if state.gate() == AuthGate::Granted {
                return Visit::Redirect(Route::Dashboard);
            }
            return Visit::Login(self.login_view(&state));
        }

        match state.gate() {
            AuthGate::Pending => return Visit::Loading,
            AuthGate::RedirectToLogin => {
                tracing::debug!(route = route.path(), "not an admin, redirecting to login");
                return Visit::Redirect(Route::Login);
            }
            AuthGate::Granted => {}
        }

        match route {
            Route::Dashboard => Visit::Dashboard(self.dashboard().await),
            Route::Gallery => {
                self.gallery.mount().await;
                Visit::Screen(route)
            }
            Route::Contractors => {
                self.contractors.mount().await;
                Visit::Screen(route)
            }
            Route::Partners => {
                self.partners.mount().await;
                Visit::Screen(route)
            }
            Route::Services => {
                self.services.mount().await;
                Visit::Screen(route)
            }
            Route::Login => Visit::Login(self.login_view(&state)),
        }
    }

    /// Sign in and report where to go next.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Route {
        match self.auth.sign_in(email, password).await {
            Ok(state) => {
                self.login_error = None;
                if state.is_admin() {
                    Route::Dashboard
                } else {
                    Route::Login
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "sign-in failed");
                self.login_error = Some(err.to_string());
                self.notifier.notify(Toast::error(err.to_string()));
                Route::Login
            }
        }
    }

    /// Sign out, drop every cached list and go back to the login route.
    pub async fn sign_out(&mut self) -> Route {
        if let Err(err) = self.auth.sign_out().await {
            tracing::warn!(error = %err, "sign-out failed");
        }
        self.login_error = None;
        self.gallery.clear();
        self.contractors.clear();
        self.partners.clear();
        self.services.clear();
        Route::Login
    }

    pub fn login_view(&self, state: &AuthState) -> LoginView {
        let signed_in = state.user.is_some();
        LoginView {
            signed_in_as: state.user.as_ref().and_then(|u| u.email.clone()),
            access_denied: signed_in && state.admin == AdminStatus::Denied,
            allow_list_unavailable: signed_in
                && matches!(state.admin, AdminStatus::Unverified { .. }),
            error: self.login_error.clone(),
        }
    }

    async fn dashboard(&self) -> Dashboard {
        let cards = vec![
            card(
                Route::Gallery,
                "Manage project photos and portfolio images",
                count(self.gallery.store()).await,
            ),
            card(
                Route::Contractors,
                "Manage team member profiles",
                count(self.contractors.store()).await,
            ),
            card(
                Route::Partners,
                "Manage partner company logos and info",
                count(self.partners.store()).await,
            ),
            card(
                Route::Services,
                "Manage service offerings",
                count(self.services.store()).await,
            ),
        ];
        Dashboard { cards }
    }
}

fn card(route: Route, description: &'static str, count: Option<usize>) -> DashboardCard {
    DashboardCard {
        route,
        title: route.title(),
        description,
        count,
    }
}

async fn count<T: Content>(store: &RecordStore<T>) -> Option<usize> {
    match store.list().await {
        Ok(items) => Some(items.len()),
        Err(err) => {
            tracing::warn!(collection = T::COLLECTION, error = %err, "dashboard count unavailable");
            None
        }
    }
}
