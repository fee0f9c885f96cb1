use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ZoomControlsProps {
    pub on_zoom_in: Callback<()>,
    pub on_zoom_out: Callback<()>,
    pub on_reset: Callback<()>,
    pub label: String,
}

#[function_component(ZoomControls)]
pub fn zoom_controls(props: &ZoomControlsProps) -> Html {
    let zi = {
        let cb = props.on_zoom_in.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let zo = {
        let cb = props.on_zoom_out.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let rs = {
        let cb = props.on_reset.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {<>
        <button id="ksxr-zoom-in" class="ksxr-zoom-btn" onclick={zi}>{"+"}</button>
        <button id="ksxr-zoom-out" class="ksxr-zoom-btn" onclick={zo}>{"-"}</button>
        <button id="ksxr-zoom-reset" class="ksxr-zoom-btn ksxr-zoom-reset" onclick={rs}>{"R"}</button>
        <div id="ksxr-zoom-level" class="ksxr-zoom-indicator">{ props.label.clone() }</div>
    </>}
}
