use std::ops::{Deref, DerefMut};

use anyhow::Context;
use axum::{async_trait, extract::FromRequestParts, http::request};

use crate::Error;

#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub db: DbPool,
}

#[derive(Clone)]
pub struct DbPool(sqlx::SqlitePool);

impl DbPool {
    pub fn new(pool: sqlx::SqlitePool) -> DbPool {
        DbPool(pool)
    }

    pub async fn acquire(&self) -> Result<DbConn, Error> {
        Ok(DbConn(
            self.0.acquire().await.context("acquiring db connection")?,
        ))
    }
}

pub struct DbConn(sqlx::pool::PoolConnection<sqlx::Sqlite>);

#[async_trait]
impl FromRequestParts<AppState> for DbConn {
    type Rejection = Error;

    async fn from_request_parts(
        _req: &mut request::Parts,
        state: &AppState,
    ) -> Result<DbConn, Error> {
        state.db.acquire().await
    }
}

impl Deref for DbConn {
    type Target = sqlx::SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DbConn {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
