use std::sync::Arc;

use leptos::prelude::*;
use province_map_shared::ProvinceRaster;
use wasm_bindgen_futures::spawn_local;

use crate::canvas::MapCanvas;
use crate::config::PROVINCES_JSON;
use crate::loader;

#[derive(Clone)]
enum LoadState {
    Loading,
    Ready(Arc<ProvinceRaster>),
    Failed(String),
}

fn remove_loading_shell() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    if let Some(shell) = document.get_element_by_id("app-loading-shell") {
        shell.remove();
    }
}

#[component]
pub fn App() -> impl IntoView {
    let state: RwSignal<LoadState> = RwSignal::new(LoadState::Loading);

    spawn_local(async move {
        let next = match loader::fetch_province_raster(PROVINCES_JSON).await {
            Ok(raster) => LoadState::Ready(Arc::new(raster)),
            Err(e) => {
                web_sys::console::error_1(
                    &format!("failed to load {PROVINCES_JSON}: {e}").into(),
                );
                LoadState::Failed(e)
            }
        };
        remove_loading_shell();
        state.set(next);
    });

    view! {
        <div style="width: 100%; height: 100%; position: relative;">
            {move || match state.get() {
                LoadState::Loading => {
                    view! { <div class="status">"Loading province map..."</div> }.into_any()
                }
                LoadState::Ready(raster) => view! { <MapCanvas raster=raster /> }.into_any(),
                LoadState::Failed(e) => {
                    view! {
                        <div class="status status-fatal">
                            <strong>"The province map could not be loaded."</strong>
                            <p>{e}</p>
                        </div>
                    }
                        .into_any()
                }
            }}
        </div>
    }
}
