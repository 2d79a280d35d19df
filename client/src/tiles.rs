#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use province_map_shared::{TileCache, TileCoord, TileEvent};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

use crate::render_loop::RedrawWaker;

const ONLOAD_HANDLE_KEY: &str = "__provinceTileOnload";
const ONERROR_HANDLE_KEY: &str = "__provinceTileOnerror";

pub type SharedTileCache = Rc<RefCell<TileCache<HtmlImageElement>>>;

/// Start fetching one tile. Completion is recorded in `cache` and a frame is
/// requested through `waker`; nothing is drawn from here.
pub fn load_tile(cache: SharedTileCache, coord: TileCoord, src: String, waker: RedrawWaker) {
    let img = match HtmlImageElement::new() {
        Ok(img) => img,
        Err(_) => {
            cache.borrow_mut().finish_failed(coord);
            return;
        }
    };

    let img_for_load = img.clone();
    let cache_load = cache.clone();
    let waker_load = waker.clone();
    let onload = Closure::<dyn FnMut()>::new(move || {
        clear_image_handlers(&img_for_load);

        let img_for_decode = img_for_load.clone();
        let cache_load = cache_load.clone();
        let waker_load = waker_load.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let _ = JsFuture::from(img_for_decode.decode()).await;
            let event = cache_load.borrow_mut().finish_loaded(coord, img_for_decode);
            settle(event, &waker_load);
        });
    });

    let img_for_error = img.clone();
    let onerror = Closure::<dyn FnMut()>::new(move || {
        clear_image_handlers(&img_for_error);
        let event = cache.borrow_mut().finish_failed(coord);
        settle(event, &waker);
    });

    let onload_js = onload.into_js_value();
    let onerror_js = onerror.into_js_value();
    img.set_onload(Some(onload_js.unchecked_ref()));
    img.set_onerror(Some(onerror_js.unchecked_ref()));
    let _ = Reflect::set(
        img.as_ref(),
        &JsValue::from_str(ONLOAD_HANDLE_KEY),
        &onload_js,
    );
    let _ = Reflect::set(
        img.as_ref(),
        &JsValue::from_str(ONERROR_HANDLE_KEY),
        &onerror_js,
    );
    img.set_src(&src);
}

fn settle(event: TileEvent, waker: &RedrawWaker) {
    match event {
        TileEvent::Ready(_) => waker.wake(),
        // Missing tiles past the map edge are expected; the cell just stays empty.
        TileEvent::Failed(_) => {}
    }
}

fn clear_image_handlers(img: &HtmlImageElement) {
    img.set_onload(None);
    img.set_onerror(None);
    let _ = Reflect::delete_property(img.as_ref(), &JsValue::from_str(ONLOAD_HANDLE_KEY));
    let _ = Reflect::delete_property(img.as_ref(), &JsValue::from_str(ONERROR_HANDLE_KEY));
}
