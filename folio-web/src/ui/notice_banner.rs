use folio_client::Notice;
use yew::prelude::*;

const STALE_TEXT: &str = "The list may be out of date.";

#[derive(Clone, PartialEq, Properties)]
pub struct NoticeBannerProps {
    pub notice: Option<Notice>,
    pub stale: bool,
    pub on_dismiss: Callback<()>,
}

/// Text of the banner, if there is anything to show
fn banner_text(notice: Option<&Notice>, stale: bool) -> Option<String> {
    match (notice, stale) {
        (None, false) => None,
        (None, true) => Some(String::from(STALE_TEXT)),
        (Some(n), false) => Some(n.to_string()),
        (Some(n), true) => Some(format!("{n} {STALE_TEXT}")),
    }
}

#[function_component(NoticeBanner)]
pub fn notice_banner(p: &NoticeBannerProps) -> Html {
    let text = match banner_text(p.notice.as_ref(), p.stale) {
        None => return html! {},
        Some(t) => t,
    };
    // a stale view alone cannot be dismissed, only fixed by a refresh
    let alert = if p.notice.is_some() { "alert-warning" } else { "alert-info" };
    html! {
        <div class={ classes!("alert", alert, "d-flex", "align-items-center") } role="alert">
            <div class="flex-grow-1">{ text }</div>
            { for p.notice.is_some().then(|| html! {
                <button
                    type="button"
                    class="btn-close"
                    aria-label="Dismiss"
                    onclick={ p.on_dismiss.reform(|_| ()) }
                >
                </button>
            }) }
        </div>
    }
}
