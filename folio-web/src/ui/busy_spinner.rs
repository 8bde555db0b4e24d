use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct BusySpinnerProps {
    pub busy: bool,
}

#[function_component(BusySpinner)]
pub fn busy_spinner(p: &BusySpinnerProps) -> Html {
    html! {
        <div
            class={ classes!("busy-spinner", (!p.busy).then(|| "is-idle")) }
            aria-hidden={ if p.busy { "false" } else { "true" } }
        >
            <span class="spinner-border spinner-border-sm" role="status"></span>
            <span class="visually-hidden">{ "Talking to the server..." }</span>
        </div>
    }
}
