mod comment_list;
pub use comment_list::CommentList;

mod controller;
pub use controller::{CommentListController, DeleteTicket, Notice, RefreshTicket, RequestSeq};

mod error;
pub use error::Error;

mod http;
pub use http::HttpStore;

mod map;
pub use map::{Location, MapView, Panorama, LOCATIONS};

mod session;
pub use session::Session;

mod store;
pub use store::CommentStore;

pub mod api {
    pub use folio_api::*;
}
