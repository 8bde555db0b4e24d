use axum::{
    extract::{Form, Query},
    response::Redirect,
    Json,
};
use folio_api::{Comment, DeleteComment, NewComment};

use crate::{db, extractors::*, Error};

#[derive(Debug, serde::Deserialize)]
pub struct ListParams {
    #[serde(rename = "num-comments")]
    num_comments: Option<String>,
}

impl ListParams {
    fn limit(&self) -> usize {
        let raw = self.num_comments.as_deref().unwrap_or("");
        folio_api::parse_limit(raw).unwrap_or_else(|| {
            tracing::warn!(?raw, "could not parse number of comments, defaulting to 0");
            0
        })
    }
}

pub async fn list_comments(
    mut conn: DbConn,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Comment>>, Error> {
    Ok(Json(db::list_comments(&mut *conn, params.limit()).await?))
}

pub async fn delete_comment(
    mut conn: DbConn,
    Form(data): Form<DeleteComment>,
) -> Result<(), Error> {
    let id = data
        .id
        .as_str()
        .parse::<i64>()
        .map_err(|_| Error::invalid_id(data.id.0.clone()))?;
    if !db::delete_comment(&mut *conn, id).await? {
        tracing::debug!(id, "asked to delete a comment that does not exist");
    }
    Ok(())
}

pub async fn delete_all_comments(mut conn: DbConn) -> Result<(), Error> {
    let num = db::delete_all_comments(&mut *conn).await?;
    tracing::info!(num, "deleted all comments");
    Ok(())
}

pub async fn contact_me(
    mut conn: DbConn,
    Form(data): Form<NewComment>,
) -> Result<Redirect, Error> {
    match data.validate() {
        Ok(()) => {
            let timestamp = chrono::Utc::now().timestamp_millis();
            let id = db::insert_comment(&mut *conn, &data, timestamp).await?;
            tracing::debug!(%id, "stored new comment");
        }
        Err(err) => tracing::info!("ignoring contact form submission: {err}"),
    }
    Ok(Redirect::to(folio_api::CONTACT_REDIRECT))
}
