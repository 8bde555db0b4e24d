mod comment;
pub use comment::{Comment, CommentId, DeleteComment, NewComment};

mod error;
pub use error::Error;

pub const LIST_COMMENTS: &str = "/list-comments";
pub const DELETE_COMMENT: &str = "/delete-comment";
pub const DELETE_ALL_COMMENTS: &str = "/delete-all-comments";
pub const CONTACT_ME: &str = "/contact-me";

/// Query parameter carrying the requested number of comments
pub const NUM_COMMENTS_PARAM: &str = "num-comments";

/// Where the contact form sends the browser back to
pub const CONTACT_REDIRECT: &str = "/index.html";

/// Parse the `num-comments` parameter. Returns `None` when it is not a
/// non-negative integer, in which case callers fall back to 0.
pub fn parse_limit(raw: &str) -> Option<usize> {
    raw.trim().parse().ok()
}
