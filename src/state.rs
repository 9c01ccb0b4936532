use sea_orm::DatabaseConnection;

use crate::services::generator::ChampionshipGenerator;

/// Database connection type alias
pub type DbConn = DatabaseConnection;

/// Application state containing all shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub generator: ChampionshipGenerator,
}

impl AppState {
    pub fn new(db: DbConn, generator: ChampionshipGenerator) -> Self {
        Self { db, generator }
    }
}
