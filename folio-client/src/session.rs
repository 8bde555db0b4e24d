use crate::{
    api::{Comment, NewComment},
    CommentList, CommentListController, CommentStore, RefreshTicket,
};

/// Drives a [`CommentListController`] against a [`CommentStore`], one
/// operation at a time
///
/// This is what non-interactive users (the CLI, tests) go through. The web
/// front-end instead splits each operation across component messages.
pub struct Session<S> {
    store: S,
    controller: CommentListController,
}

impl<S: CommentStore> Session<S> {
    pub fn new(store: S) -> Session<S> {
        Session {
            store,
            controller: CommentListController::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn controller(&self) -> &CommentListController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut CommentListController {
        &mut self.controller
    }

    pub fn view(&self) -> &CommentList {
        self.controller.view()
    }

    pub async fn refresh(&mut self, limit: usize) {
        if let Some(ticket) = self.controller.begin_refresh(limit) {
            self.run_refresh(ticket).await;
        }
    }

    pub async fn delete_one(&mut self, comment: &Comment) {
        let ticket = self.controller.begin_delete(comment);
        let res = self.store.delete_comment(&ticket.0).await;
        if let Some(reconcile) = self.controller.finish_delete(ticket, res) {
            self.run_refresh(reconcile).await;
        }
    }

    pub async fn delete_all(&mut self) {
        self.controller.begin_delete_all();
        let res = self.store.delete_all_comments().await;
        if let Some(reconcile) = self.controller.finish_delete_all(res) {
            self.run_refresh(reconcile).await;
        }
    }

    /// Submit the contact form, then show the new comment if a limit is set
    pub async fn post_comment(&mut self, comment: &NewComment) {
        if !self.controller.begin_post(comment) {
            return;
        }
        let res = self.store.contact_me(comment).await;
        if let Some(ticket) = self.controller.finish_post(res) {
            self.run_refresh(ticket).await;
        }
    }

    async fn run_refresh(&mut self, ticket: RefreshTicket) {
        let res = self.store.list_comments(ticket.limit).await;
        self.controller.finish_refresh(ticket, res);
    }
}
