use crate::db::{DbPool, OrmConn};

/// Shared handles: the sqlx pool serves the plain CRUD paths, the SeaORM
/// connection serves the entity/transaction layer (checkout, payments).
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
}
