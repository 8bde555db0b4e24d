use folio_client::api;
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct CommentCountProps {
    pub value: usize,
    pub on_change: Callback<usize>,
}

/// The count typed in `raw`, or else the text to put back in the input
fn typed_count(raw: &str, current: usize) -> Result<usize, String> {
    api::parse_limit(raw).ok_or_else(|| current.to_string())
}

#[function_component(CommentCount)]
pub fn comment_count(p: &CommentCountProps) -> Html {
    let on_change = {
        let on_change = p.on_change.clone();
        let current = p.value;
        Callback::from(move |e: web_sys::Event| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            match typed_count(&input.value(), current) {
                Ok(num) => on_change.emit(num),
                Err(reset) => {
                    tracing::debug!(value = ?input.value(), "resetting invalid comment count");
                    input.set_value(&reset);
                }
            }
        })
    };
    html! {
        <div class="input-group w-auto">
            <label class="input-group-text" for="num-comments">{ "Comments to show" }</label>
            <input
                type="number"
                class="form-control"
                id="num-comments"
                min="0"
                value={ p.value.to_string() }
                onchange={ on_change }
            />
        </div>
    }
}
