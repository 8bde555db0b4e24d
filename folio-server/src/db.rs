use anyhow::Context;
use folio_api::{Comment, CommentId, NewComment};

/// Newest comments first
pub async fn list_comments(
    conn: &mut sqlx::SqliteConnection,
    limit: usize,
) -> anyhow::Result<Vec<Comment>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, message FROM comments ORDER BY id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(&mut *conn)
    .await
    .with_context(|| format!("fetching up to {limit} comments"))?;
    Ok(rows
        .into_iter()
        .map(|(id, message)| Comment {
            id: CommentId::from(id),
            message,
        })
        .collect())
}

pub async fn insert_comment(
    conn: &mut sqlx::SqliteConnection,
    c: &NewComment,
    timestamp: i64,
) -> anyhow::Result<CommentId> {
    let res = sqlx::query(
        "INSERT INTO comments (name, email, subject, message, timestamp) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&c.name)
    .bind(&c.email)
    .bind(&c.subject)
    .bind(&c.message)
    .bind(timestamp)
    .execute(&mut *conn)
    .await
    .context("inserting comment")?;
    Ok(CommentId::from(res.last_insert_rowid()))
}

/// Returns whether a comment was actually deleted
pub async fn delete_comment(conn: &mut sqlx::SqliteConnection, id: i64) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("deleting comment {id}"))?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_all_comments(conn: &mut sqlx::SqliteConnection) -> anyhow::Result<u64> {
    let res = sqlx::query("DELETE FROM comments")
        .execute(&mut *conn)
        .await
        .context("deleting all comments")?;
    Ok(res.rows_affected())
}
