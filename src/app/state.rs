//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::game::VehicleCatalog;
use crate::room::RoomRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<VehicleCatalog>,
    pub rooms: Arc<RoomRegistry>,
}

impl AppState {
    pub fn new(config: Config, catalog: VehicleCatalog) -> Self {
        let rooms = Arc::new(RoomRegistry::new(config.room_max_clients));
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            rooms,
        }
    }
}
