use std::fmt;

use crate::{
    api::{Comment, CommentId, NewComment},
    CommentList, Error,
};

/// Monotonic stamp given to each issued refresh
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RequestSeq(u64);

/// A refresh that must be sent to the server, then handed back to
/// [`CommentListController::finish_refresh`] along with its result
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RefreshTicket {
    pub seq: RequestSeq,
    pub limit: usize,
}

/// A single-comment deletion that must be sent to the server
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeleteTicket(pub CommentId);

/// Non-fatal error shown to the user until dismissed
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Notice {
    RefreshFailed(Error),
    DeleteFailed { id: CommentId, error: Error },
    DeleteAllFailed(Error),
    PostFailed(Error),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::RefreshFailed(e) => write!(f, "Could not load comments: {e}"),
            Notice::DeleteFailed { id, error } => {
                write!(f, "Could not delete comment {id}: {error}")
            }
            Notice::DeleteAllFailed(e) => write!(f, "Could not delete all comments: {e}"),
            Notice::PostFailed(e) => write!(f, "Could not send your message: {e}"),
        }
    }
}

/// Keeps the rendered comment list in sync with the server
///
/// Every operation is split in a `begin_*` half, which updates the view and
/// says what to send, and a `finish_*` half, which applies the answer. Only
/// the latest issued refresh is ever applied. Deletions are applied to the
/// view right away, and a failed one triggers a reconciliation refresh.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommentListController {
    view: CommentList,
    limit: Option<usize>,
    last_seq: u64,
    latest_refresh: Option<RequestSeq>,
    refresh_pending: bool,
    deletes_in_flight: Vec<CommentId>,
    delete_alls_in_flight: usize,
    posts_in_flight: usize,

    // Mutations whose effect the response to `latest_refresh` may not
    // reflect yet: those in flight when it was issued, and those issued since
    deleted_since_refresh: Vec<CommentId>,
    cleared_since_refresh: bool,

    notice: Option<Notice>,
    stale: bool,
}

impl CommentListController {
    pub fn new() -> CommentListController {
        CommentListController::default()
    }

    pub fn view(&self) -> &CommentList {
        &self.view
    }

    /// The limit of the latest refresh, if any refresh was ever issued
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Whether the view is known to have diverged from the server and no
    /// reconciliation has landed yet
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn is_busy(&self) -> bool {
        self.refresh_pending
            || !self.deletes_in_flight.is_empty()
            || self.delete_alls_in_flight > 0
            || self.posts_in_flight > 0
    }

    fn next_seq(&mut self) -> RequestSeq {
        self.last_seq += 1;
        RequestSeq(self.last_seq)
    }

    /// Start fetching up to `limit` comments
    ///
    /// Returns `None` when there is nothing to fetch, in which case the view
    /// was emptied right away.
    pub fn begin_refresh(&mut self, limit: usize) -> Option<RefreshTicket> {
        let seq = self.next_seq();
        self.limit = Some(limit);
        self.latest_refresh = Some(seq);
        self.deleted_since_refresh = self.deletes_in_flight.clone();
        self.cleared_since_refresh = self.delete_alls_in_flight > 0;
        if limit == 0 {
            self.view.clear();
            self.refresh_pending = false;
            self.stale = false;
            return None;
        }
        self.refresh_pending = true;
        Some(RefreshTicket { seq, limit })
    }

    /// Apply the answer to a refresh. Returns whether it was applied, which
    /// is only the case for the latest issued refresh.
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        res: Result<Vec<Comment>, Error>,
    ) -> bool {
        if self.latest_refresh != Some(ticket.seq) {
            tracing::debug!(
                seq = ?ticket.seq,
                latest = ?self.latest_refresh,
                "discarding stale refresh response"
            );
            return false;
        }
        self.refresh_pending = false;
        match res {
            Err(error) => {
                tracing::warn!(%error, "failed refreshing comment list");
                self.notice = Some(Notice::RefreshFailed(error));
            }
            Ok(mut comments) => {
                if self.cleared_since_refresh {
                    comments.clear();
                } else if !self.deleted_since_refresh.is_empty() {
                    let deleted = &self.deleted_since_refresh;
                    comments.retain(|c| !deleted.contains(&c.id));
                }
                tracing::debug!(num = comments.len(), "rendering fetched comments");
                self.view.replace(comments);
                self.deleted_since_refresh.clear();
                self.cleared_since_refresh = false;
                self.stale = false;
                if matches!(self.notice, Some(Notice::RefreshFailed(_))) {
                    self.notice = None;
                }
            }
        }
        true
    }

    /// Remove `comment` from the view and start deleting it server-side
    pub fn begin_delete(&mut self, comment: &Comment) -> DeleteTicket {
        if self.view.remove(&comment.id).is_none() {
            tracing::debug!(id = %comment.id, "deleting comment that is not rendered");
        }
        if self.refresh_pending {
            self.deleted_since_refresh.push(comment.id.clone());
        }
        self.deletes_in_flight.push(comment.id.clone());
        DeleteTicket(comment.id.clone())
    }

    /// Apply the answer to a deletion. A failure returns the refresh that
    /// must be issued to bring the view back in line with the server.
    pub fn finish_delete(
        &mut self,
        ticket: DeleteTicket,
        res: Result<(), Error>,
    ) -> Option<RefreshTicket> {
        if let Some(pos) = self.deletes_in_flight.iter().position(|id| *id == ticket.0) {
            self.deletes_in_flight.remove(pos);
        }
        // on success the tombstone stays: the pending refresh may still
        // predate the deletion
        let error = res.err()?;
        tracing::warn!(id = %ticket.0, %error, "failed deleting comment");
        self.notice = Some(Notice::DeleteFailed {
            id: ticket.0,
            error,
        });
        self.reconcile()
    }

    /// Empty the view and start deleting every comment server-side
    pub fn begin_delete_all(&mut self) {
        self.view.clear();
        if self.refresh_pending {
            self.cleared_since_refresh = true;
        }
        self.delete_alls_in_flight += 1;
    }

    pub fn finish_delete_all(&mut self, res: Result<(), Error>) -> Option<RefreshTicket> {
        self.delete_alls_in_flight = self.delete_alls_in_flight.saturating_sub(1);
        let error = res.err()?;
        tracing::warn!(%error, "failed deleting all comments");
        self.notice = Some(Notice::DeleteAllFailed(error));
        self.reconcile()
    }

    /// Check a contact form before it is sent. An incomplete one sets a
    /// notice and must not be sent.
    pub fn begin_post(&mut self, comment: &NewComment) -> bool {
        if let Err(error) = comment.validate() {
            tracing::debug!(%error, "not sending incomplete contact form");
            self.notice = Some(Notice::PostFailed(error.into()));
            return false;
        }
        self.posts_in_flight += 1;
        true
    }

    /// Apply the answer to a contact form submission. On success, returns
    /// the refresh that brings the new comment into view.
    pub fn finish_post(&mut self, res: Result<(), Error>) -> Option<RefreshTicket> {
        self.posts_in_flight = self.posts_in_flight.saturating_sub(1);
        if let Err(error) = res {
            tracing::warn!(%error, "failed sending contact form");
            self.notice = Some(Notice::PostFailed(error));
            return None;
        }
        self.begin_refresh(self.limit?)
    }

    fn reconcile(&mut self) -> Option<RefreshTicket> {
        self.stale = true;
        match self.limit {
            Some(limit) => self.begin_refresh(limit),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comments(ids: &[&str]) -> Vec<Comment> {
        ids.iter()
            .map(|id| Comment::new(*id, format!("message {id}")))
            .collect()
    }

    fn view_ids(c: &CommentListController) -> Vec<&str> {
        c.view().iter().map(|c| c.id.as_str()).collect()
    }

    fn network_error() -> Error {
        Error::Network(String::from("connection reset"))
    }

    #[test]
    fn refresh_renders_server_order() {
        let mut c = CommentListController::new();
        let t = c.begin_refresh(2).unwrap();
        assert!(c.is_busy());
        assert!(c.finish_refresh(
            t,
            Ok(vec![Comment::new("1", "hi"), Comment::new("2", "bye")])
        ));
        assert!(!c.is_busy());
        let messages = c.view().iter().map(|c| &c.message as &str).collect::<Vec<_>>();
        assert_eq!(messages, vec!["hi", "bye"]);

        c.begin_delete(&Comment::new("1", "hi"));
        let messages = c.view().iter().map(|c| &c.message as &str).collect::<Vec<_>>();
        assert_eq!(messages, vec!["bye"]);
    }

    #[test]
    fn refresh_replaces_previous_render() {
        let mut c = CommentListController::new();
        let t = c.begin_refresh(3).unwrap();
        c.finish_refresh(t, Ok(comments(&["1", "2", "3"])));
        let t = c.begin_refresh(3).unwrap();
        c.finish_refresh(t, Ok(comments(&["4"])));
        assert_eq!(view_ids(&c), vec!["4"]);
        let t = c.begin_refresh(3).unwrap();
        c.finish_refresh(t, Ok(Vec::new()));
        assert!(c.view().is_empty());
    }

    #[test]
    fn zero_limit_empties_without_a_request() {
        let mut c = CommentListController::new();
        let t = c.begin_refresh(5).unwrap();
        c.finish_refresh(t, Ok(comments(&["1", "2"])));
        assert_eq!(c.begin_refresh(0), None);
        assert!(c.view().is_empty());
        assert!(!c.is_busy());
        assert_eq!(c.limit(), Some(0));
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut c = CommentListController::new();
        let first = c.begin_refresh(5).unwrap();
        let second = c.begin_refresh(1).unwrap();
        assert!(first.seq < second.seq);

        // the newer request lands first
        assert!(c.finish_refresh(second, Ok(comments(&["9"]))));
        assert!(!c.finish_refresh(first, Ok(comments(&["1", "2", "3"]))));
        assert_eq!(view_ids(&c), vec!["9"]);
        assert!(!c.is_busy());
    }

    #[test]
    fn stale_errors_are_discarded() {
        let mut c = CommentListController::new();
        let first = c.begin_refresh(5).unwrap();
        let second = c.begin_refresh(5).unwrap();
        assert!(!c.finish_refresh(first, Err(network_error())));
        assert_eq!(c.notice(), None);
        assert!(c.is_busy());
        c.finish_refresh(second, Ok(comments(&["1"])));
        assert_eq!(view_ids(&c), vec!["1"]);
    }

    #[test]
    fn failed_refresh_keeps_view_and_notifies() {
        let mut c = CommentListController::new();
        let t = c.begin_refresh(5).unwrap();
        c.finish_refresh(t, Ok(comments(&["1", "2"])));
        let t = c.begin_refresh(5).unwrap();
        assert!(c.finish_refresh(t, Err(Error::Payload(String::from("eof")))));
        assert_eq!(view_ids(&c), vec!["1", "2"]);
        assert_eq!(
            c.notice(),
            Some(&Notice::RefreshFailed(Error::Payload(String::from("eof"))))
        );

        // next successful refresh clears the notice
        let t = c.begin_refresh(5).unwrap();
        c.finish_refresh(t, Ok(comments(&["3"])));
        assert_eq!(c.notice(), None);
    }

    #[test]
    fn failed_delete_reconciles() {
        let mut c = CommentListController::new();
        let t = c.begin_refresh(5).unwrap();
        c.finish_refresh(t, Ok(comments(&["1", "2", "3"])));

        let d = c.begin_delete(&Comment::new("2", "message 2"));
        assert_eq!(view_ids(&c), vec!["1", "3"]);
        let reconcile = c.finish_delete(d, Err(network_error())).unwrap();
        assert_eq!(reconcile.limit, 5);
        assert!(c.is_stale());
        assert!(matches!(c.notice(), Some(Notice::DeleteFailed { id, .. }) if id.as_str() == "2"));

        c.finish_refresh(reconcile, Ok(comments(&["1", "2", "3"])));
        assert_eq!(view_ids(&c), vec!["1", "2", "3"]);
        assert!(!c.is_stale());
        // the user still gets to see why the comment came back
        assert!(c.notice().is_some());
        c.dismiss_notice();
        assert_eq!(c.notice(), None);
    }

    #[test]
    fn failed_delete_before_any_refresh_marks_stale() {
        let mut c = CommentListController::new();
        let d = c.begin_delete(&Comment::new("1", "hi"));
        assert_eq!(c.finish_delete(d, Err(network_error())), None);
        assert!(c.is_stale());
        assert!(!c.is_busy());
    }

    #[test]
    fn successful_delete_needs_no_refresh() {
        let mut c = CommentListController::new();
        let t = c.begin_refresh(5).unwrap();
        c.finish_refresh(t, Ok(comments(&["1", "2"])));
        let d = c.begin_delete(&Comment::new("1", "message 1"));
        assert!(c.is_busy());
        assert_eq!(c.finish_delete(d, Ok(())), None);
        assert!(!c.is_busy());
        assert!(!c.is_stale());
        assert_eq!(view_ids(&c), vec!["2"]);
    }

    #[test]
    fn delete_racing_a_refresh_stays_deleted() {
        let mut c = CommentListController::new();
        let t = c.begin_refresh(5).unwrap();
        c.finish_refresh(t, Ok(comments(&["1", "2", "3"])));

        let t = c.begin_refresh(5).unwrap();
        let d = c.begin_delete(&Comment::new("2", "message 2"));
        // the server answered the listing before processing the deletion
        c.finish_refresh(t, Ok(comments(&["1", "2", "3"])));
        assert_eq!(view_ids(&c), vec!["1", "3"]);
        assert_eq!(c.finish_delete(d, Ok(())), None);
    }

    #[test]
    fn refresh_issued_during_a_delete_filters_it() {
        let mut c = CommentListController::new();
        let t = c.begin_refresh(5).unwrap();
        c.finish_refresh(t, Ok(comments(&["1", "2", "3"])));

        let d = c.begin_delete(&Comment::new("2", "message 2"));
        let t = c.begin_refresh(5).unwrap();
        // the deletion is confirmed, but the listing was served before it
        assert_eq!(c.finish_delete(d, Ok(())), None);
        c.finish_refresh(t, Ok(comments(&["1", "2", "3"])));
        assert_eq!(view_ids(&c), vec!["1", "3"]);
        assert!(!c.is_busy());

        // later listings are trusted again
        let t = c.begin_refresh(5).unwrap();
        c.finish_refresh(t, Ok(comments(&["1", "2"])));
        assert_eq!(view_ids(&c), vec!["1", "2"]);
    }

    #[test]
    fn failed_delete_is_not_filtered_from_reconciliation() {
        let mut c = CommentListController::new();
        let t = c.begin_refresh(5).unwrap();
        c.finish_refresh(t, Ok(comments(&["1", "2"])));

        let t = c.begin_refresh(5).unwrap();
        let d = c.begin_delete(&Comment::new("1", "message 1"));
        let reconcile = c.finish_delete(d, Err(network_error())).unwrap();
        assert!(!c.finish_refresh(t, Ok(comments(&["1", "2"]))));
        assert!(c.finish_refresh(reconcile, Ok(comments(&["1", "2"]))));
        assert_eq!(view_ids(&c), vec!["1", "2"]);
    }

    #[test]
    fn delete_all_racing_a_refresh_stays_empty() {
        let mut c = CommentListController::new();
        let t = c.begin_refresh(5).unwrap();
        c.begin_delete_all();
        c.finish_refresh(t, Ok(comments(&["1", "2"])));
        assert!(c.view().is_empty());
        assert_eq!(c.finish_delete_all(Ok(())), None);
        assert!(c.view().is_empty());
    }

    #[test]
    fn delete_all_is_idempotent() {
        let mut c = CommentListController::new();
        let t = c.begin_refresh(5).unwrap();
        c.finish_refresh(t, Ok(comments(&["1", "2"])));
        for _ in 0..2 {
            c.begin_delete_all();
            assert!(c.view().is_empty());
            assert_eq!(c.finish_delete_all(Ok(())), None);
            assert!(c.view().is_empty());
            assert_eq!(c.notice(), None);
        }
    }

    #[test]
    fn failed_delete_all_still_empties_then_reconciles() {
        let mut c = CommentListController::new();
        let t = c.begin_refresh(2).unwrap();
        c.finish_refresh(t, Ok(comments(&["1", "2"])));
        c.begin_delete_all();
        assert!(c.view().is_empty());
        let reconcile = c.finish_delete_all(Err(network_error())).unwrap();
        assert!(c.view().is_empty());
        assert!(matches!(c.notice(), Some(Notice::DeleteAllFailed(_))));
        c.finish_refresh(reconcile, Ok(comments(&["1", "2"])));
        assert_eq!(view_ids(&c), vec!["1", "2"]);
    }

    fn new_comment(message: &str) -> NewComment {
        NewComment {
            name: String::from("Ada"),
            email: String::from("ada@example.org"),
            subject: String::from("Hello"),
            message: String::from(message),
        }
    }

    #[test]
    fn incomplete_post_is_not_sent() {
        let mut c = CommentListController::new();
        let mut comment = new_comment("hi");
        comment.subject.clear();
        assert!(!c.begin_post(&comment));
        assert!(!c.is_busy());
        assert_eq!(
            c.notice(),
            Some(&Notice::PostFailed(Error::Api(
                crate::api::Error::MissingField(String::from("subject-input"))
            )))
        );
    }

    #[test]
    fn successful_post_refreshes_current_limit() {
        let mut c = CommentListController::new();
        let t = c.begin_refresh(2).unwrap();
        c.finish_refresh(t, Ok(comments(&["1"])));

        assert!(c.begin_post(&new_comment("hi")));
        assert!(c.is_busy());
        let t = c.finish_post(Ok(())).unwrap();
        assert_eq!(t.limit, 2);
        c.finish_refresh(t, Ok(comments(&["2", "1"])));
        assert_eq!(view_ids(&c), vec!["2", "1"]);
        assert!(!c.is_busy());
    }

    #[test]
    fn post_before_any_refresh_needs_no_refresh() {
        let mut c = CommentListController::new();
        assert!(c.begin_post(&new_comment("hi")));
        assert_eq!(c.finish_post(Ok(())), None);
        assert!(!c.is_busy());
        assert_eq!(c.notice(), None);
    }

    #[test]
    fn failed_post_keeps_view_and_notifies() {
        let mut c = CommentListController::new();
        let t = c.begin_refresh(5).unwrap();
        c.finish_refresh(t, Ok(comments(&["1"])));
        assert!(c.begin_post(&new_comment("hi")));
        assert_eq!(c.finish_post(Err(network_error())), None);
        assert_eq!(view_ids(&c), vec!["1"]);
        assert_eq!(c.notice(), Some(&Notice::PostFailed(network_error())));
        assert!(!c.is_busy());
    }

    #[test]
    fn applied_refresh_matches_server_exactly() {
        bolero::check!()
            .with_type::<(u8, Vec<(u16, String)>)>()
            .cloned()
            .for_each(|(limit, records)| {
                let records = records
                    .into_iter()
                    .map(|(id, msg)| Comment::new(id.to_string(), msg))
                    .collect::<Vec<_>>();
                let mut c = CommentListController::new();
                let t = c.begin_refresh(3).unwrap();
                c.finish_refresh(t, Ok(comments(&["a", "b", "c"])));
                match c.begin_refresh(limit as usize) {
                    None => {
                        assert_eq!(limit, 0);
                        assert!(c.view().is_empty());
                    }
                    Some(t) => {
                        assert!(c.finish_refresh(t, Ok(records.clone())));
                        assert_eq!(c.view().as_slice(), &records[..]);
                    }
                }
            });
    }
}
