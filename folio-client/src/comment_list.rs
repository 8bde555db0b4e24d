use std::sync::Arc;

use crate::api::{Comment, CommentId};

/// The rendered comments, in server order
///
/// Cloning is cheap, so the list can be handed to render functions as-is.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommentList {
    items: Arc<Vec<Comment>>,
}

impl CommentList {
    pub fn new(items: Vec<Comment>) -> CommentList {
        CommentList {
            items: Arc::new(items),
        }
    }

    /// Drop everything currently rendered and render `items` instead
    pub fn replace(&mut self, items: Vec<Comment>) {
        self.items = Arc::new(items);
    }

    /// Remove the first element for `id`, leaving the others in order
    pub fn remove(&mut self, id: &CommentId) -> Option<Comment> {
        let pos = self.items.iter().position(|c| c.id == *id)?;
        Some(Arc::make_mut(&mut self.items).remove(pos))
    }

    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items = Arc::new(Vec::new());
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Comment> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Comment] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a CommentList {
    type Item = &'a Comment;
    type IntoIter = std::slice::Iter<'a, Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
