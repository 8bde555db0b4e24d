use async_trait::async_trait;

use crate::{
    api::{Comment, CommentId, NewComment},
    Error,
};

/// Remote list of comments
///
/// Futures are not required to be `Send`, as the web front-end runs them on
/// the browser's single thread.
#[async_trait(?Send)]
pub trait CommentStore {
    async fn list_comments(&self, limit: usize) -> Result<Vec<Comment>, Error>;
    async fn delete_comment(&self, id: &CommentId) -> Result<(), Error>;
    async fn delete_all_comments(&self) -> Result<(), Error>;

    /// Submit the contact form, which stores a new comment when complete
    async fn contact_me(&self, comment: &NewComment) -> Result<(), Error>;
}

