use crate::common::context::Context;
use sqlx::{MySql, Pool};

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<MySql>,
}

impl Context for AppState {
    fn db(&self) -> &Pool<MySql> {
        &self.db
    }
}
