use folio_client::HttpStore;

mod ui;

lazy_static::lazy_static! {
    static ref CLIENT: reqwest::Client = reqwest::Client::new();
}

/// Store for the server this page was loaded from
fn page_store() -> HttpStore {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    HttpStore::with_client(origin, CLIENT.clone())
}

fn main() {
    tracing_wasm::set_as_global_default();
    yew::Renderer::<ui::App>::new().render();
}
