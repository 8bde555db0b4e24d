use folio_client::MapView;
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct MapPanelProps {
    pub map: MapView,
    pub on_click: Callback<usize>,
    pub on_hover: Callback<usize>,
    pub on_leave: Callback<()>,
}

#[function_component(MapPanel)]
pub fn map_panel(p: &MapPanelProps) -> Html {
    let markers = p.map.locations().iter().enumerate().map(|(idx, l)| {
        html! {
            <li>
                <button
                    type="button"
                    class={ classes!(
                        "marker", "btn", "btn-light",
                        (p.map.active() == Some(idx)).then(|| "active"),
                        p.map.is_highlighted(idx).then(|| "bounce")
                    ) }
                    onclick={ p.on_click.reform(move |_| idx) }
                    onmouseenter={ p.on_hover.reform(move |_| idx) }
                    onmouseleave={ p.on_leave.reform(|_| ()) }
                >
                    <span class="bi-geo-alt-fill me-1" aria-hidden="true"></span>
                    { l.name }
                </button>
            </li>
        }
    });
    let info_window = p.map.info_window().map(|l| {
        html! {
            <div class="info-window card p-2">
                <strong>{ l.name }</strong>
                <div>{ l.description }</div>
            </div>
        }
    });
    let panorama = p.map.panorama().map(|pano| {
        html! {
            <iframe class="panorama w-100" src={ pano.embed_url() } loading="lazy"></iframe>
        }
    });
    html! {
        <div class="map-panel">
            <ul class="markers list-unstyled d-flex flex-wrap gap-2">
                { for markers }
            </ul>
            { for info_window }
            { for panorama }
        </div>
    }
}
