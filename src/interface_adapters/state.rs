use std::sync::Arc;

use mongodb::Database;

use crate::config::Settings;

// Application state threaded through every handler. Settings are read-only
// after startup; the database handle is the driver's internally-synchronized
// clone-cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: Database,
}
