use folio_client::{api::Comment, CommentList};
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct CommentListViewProps {
    pub comments: CommentList,
    pub on_delete: Callback<Comment>,
}

#[function_component(CommentListView)]
pub fn comment_list_view(p: &CommentListViewProps) -> Html {
    if p.comments.is_empty() {
        return html! {
            <p class="text-muted">{ "No comments yet." }</p>
        };
    }
    let items = p.comments.iter().map(|c| {
        // each button deletes the comment as it was when rendered
        let on_delete = {
            let c = c.clone();
            p.on_delete.reform(move |_| c.clone())
        };
        html! {
            <li class="comment list-group-item d-flex align-items-center">
                <span class="flex-grow-1">{ &c.message }</span>
                <button
                    type="button"
                    class="btn btn-outline-danger btn-sm"
                    onclick={ on_delete }
                >
                    { "Delete" }
                </button>
            </li>
        }
    });
    html! {
        <ul id="comment-list" class="list-group">
            { for items }
        </ul>
    }
}
