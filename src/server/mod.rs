//! Web server for the dashboard.
//!
//! Every `GET /` is one page view: both flows run against the database and
//! the page is rendered from scratch. JSON endpoints expose the same queries.

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::dashboard::{DashboardOptions, ErrorHandler, SilentHandler, VisibleErrorHandler};
use crate::firestore::{DocumentStore, FirestoreClient};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub options: Arc<DashboardOptions>,
    pub handler: Arc<dyn ErrorHandler>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        options: DashboardOptions,
        handler: Arc<dyn ErrorHandler>,
    ) -> Self {
        Self {
            store,
            options: Arc::new(options),
            handler,
        }
    }

    /// Build state from settings, connecting to Firestore.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let store = FirestoreClient::new(&settings.firestore)?;
        let options = settings.dashboard_options()?;
        Ok(Self::new(
            Arc::new(store),
            options,
            error_handler(settings.show_errors),
        ))
    }
}

/// Error handler matching the `show_errors` setting.
pub fn error_handler(show_errors: bool) -> Arc<dyn ErrorHandler> {
    if show_errors {
        Arc::new(VisibleErrorHandler)
    } else {
        Arc::new(SilentHandler)
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::from_settings(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
