use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use folio_client::{
    api::{Comment, CommentId, Error, NewComment},
    CommentStore,
};
use parking_lot::Mutex;

/// In-memory reference implementation of the folio server
pub struct MockServer {
    comments: BTreeMap<i64, NewComment>,
    next_id: i64,
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            comments: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Return the current number of comments
    pub fn test_num_comments(&self) -> usize {
        self.comments.len()
    }

    /// Return the id of stored comment number `idx`, oldest first
    pub fn test_get_comment_id(&self, idx: usize) -> Option<CommentId> {
        self.comments.keys().nth(idx).map(|id| CommentId::from(*id))
    }

    /// Newest first, like the real server
    pub fn list_comments(&self, limit: usize) -> Vec<Comment> {
        self.comments
            .iter()
            .rev()
            .take(limit)
            .map(|(id, c)| Comment {
                id: CommentId::from(*id),
                message: c.message.clone(),
            })
            .collect()
    }

    pub fn contact_me(&mut self, c: NewComment) -> Result<CommentId, Error> {
        c.validate()?;
        let id = self.next_id;
        self.next_id += 1;
        self.comments.insert(id, c);
        Ok(CommentId::from(id))
    }

    pub fn delete_comment(&mut self, id: &CommentId) -> Result<(), Error> {
        let id = id
            .as_str()
            .parse::<i64>()
            .map_err(|_| Error::InvalidId(id.0.clone()))?;
        self.comments.remove(&id);
        Ok(())
    }

    pub fn delete_all_comments(&mut self) {
        self.comments.clear();
    }
}

#[derive(Debug, Default)]
struct Faults {
    list: usize,
    delete: usize,
    delete_all: usize,
    post: usize,
}

/// Shared handle on a [`MockServer`] usable as a [`CommentStore`], with
/// injectable failures
#[derive(Clone, Default)]
pub struct MockStore {
    server: Arc<Mutex<MockServer>>,
    faults: Arc<Mutex<Faults>>,
}

impl MockStore {
    pub fn new() -> MockStore {
        MockStore::default()
    }

    pub fn server(&self) -> parking_lot::MutexGuard<'_, MockServer> {
        self.server.lock()
    }

    /// Store a comment with the given message, returning its id
    pub fn post(&self, message: &str) -> CommentId {
        self.server
            .lock()
            .contact_me(NewComment {
                name: String::from("Test"),
                email: String::from("test@example.org"),
                subject: String::from("Test"),
                message: String::from(message),
            })
            .expect("posting a fully filled comment")
    }

    /// Make the next `n` listings fail with a network error
    pub fn fail_lists(&self, n: usize) {
        self.faults.lock().list = n;
    }

    /// Make the next `n` single deletions fail without touching the server
    pub fn fail_deletes(&self, n: usize) {
        self.faults.lock().delete = n;
    }

    /// Make the next `n` bulk deletions fail without touching the server
    pub fn fail_delete_alls(&self, n: usize) {
        self.faults.lock().delete_all = n;
    }

    /// Make the next `n` contact form submissions fail without touching the
    /// server
    pub fn fail_posts(&self, n: usize) {
        self.faults.lock().post = n;
    }

    fn take_fault(
        &self,
        pick: impl FnOnce(&mut Faults) -> &mut usize,
    ) -> Result<(), folio_client::Error> {
        let mut faults = self.faults.lock();
        let remaining = pick(&mut *faults);
        if *remaining > 0 {
            *remaining -= 1;
            return Err(folio_client::Error::Network(String::from("injected failure")));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl CommentStore for MockStore {
    async fn list_comments(&self, limit: usize) -> Result<Vec<Comment>, folio_client::Error> {
        self.take_fault(|f| &mut f.list)?;
        Ok(self.server.lock().list_comments(limit))
    }

    async fn delete_comment(&self, id: &CommentId) -> Result<(), folio_client::Error> {
        self.take_fault(|f| &mut f.delete)?;
        Ok(self.server.lock().delete_comment(id)?)
    }

    async fn delete_all_comments(&self) -> Result<(), folio_client::Error> {
        self.take_fault(|f| &mut f.delete_all)?;
        self.server.lock().delete_all_comments();
        Ok(())
    }

    async fn contact_me(&self, comment: &NewComment) -> Result<(), folio_client::Error> {
        self.take_fault(|f| &mut f.post)?;
        // the real server redirects whether it stored the comment or not
        if let Err(err) = self.server.lock().contact_me(comment.clone()) {
            tracing::debug!(%err, "mock server ignored incomplete contact form");
        }
        Ok(())
    }
}
