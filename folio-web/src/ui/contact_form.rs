use folio_client::api::{self, NewComment};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct ContactFormProps {
    /// Bumped after each accepted submission, which empties the fields
    pub sent: u64,
    pub on_submit: Callback<NewComment>,
}

fn input_value(r: &NodeRef) -> String {
    r.cast::<HtmlInputElement>()
        .map(|i| i.value())
        .unwrap_or_default()
}

#[function_component(ContactForm)]
pub fn contact_form(p: &ContactFormProps) -> Html {
    let name = use_node_ref();
    let email = use_node_ref();
    let subject = use_node_ref();
    let message = use_node_ref();

    {
        let inputs = [name.clone(), email.clone(), subject.clone()];
        let message = message.clone();
        use_effect_with_deps(
            move |_| {
                for i in inputs.iter().filter_map(|r| r.cast::<HtmlInputElement>()) {
                    i.set_value("");
                }
                if let Some(t) = message.cast::<HtmlTextAreaElement>() {
                    t.set_value("");
                }
                || ()
            },
            p.sent,
        );
    }

    let on_submit = {
        let (name, email, subject, message) =
            (name.clone(), email.clone(), subject.clone(), message.clone());
        let on_submit = p.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(NewComment {
                name: input_value(&name),
                email: input_value(&email),
                subject: input_value(&subject),
                message: message
                    .cast::<HtmlTextAreaElement>()
                    .map(|t| t.value())
                    .unwrap_or_default(),
            });
        })
    };

    html! {
        <form id="contact-form" action={ api::CONTACT_ME } method="post" onsubmit={ on_submit }>
            <div class="row g-2 mb-2">
                <div class="col-md">
                    <input ref={ name } type="text" class="form-control"
                        id="name-input" name="name-input" placeholder="Name" />
                </div>
                <div class="col-md">
                    <input ref={ email } type="email" class="form-control"
                        id="email-input" name="email-input" placeholder="Email" />
                </div>
            </div>
            <input ref={ subject } type="text" class="form-control mb-2"
                id="subject-input" name="subject-input" placeholder="Subject" />
            <textarea ref={ message } class="form-control mb-2" rows="4"
                id="message-input" name="message-input" placeholder="Message">
            </textarea>
            <button type="submit" class="btn btn-primary">{ "Send" }</button>
        </form>
    }
}
