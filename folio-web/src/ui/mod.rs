mod app;
pub use app::{App, AppMsg};

mod busy_spinner;
pub use busy_spinner::BusySpinner;

mod comment_count;
pub use comment_count::CommentCount;

mod contact_form;
pub use contact_form::ContactForm;

mod comment_list;
pub use comment_list::CommentListView;

mod map_panel;
pub use map_panel::MapPanel;

mod notice_banner;
pub use notice_banner::NoticeBanner;
