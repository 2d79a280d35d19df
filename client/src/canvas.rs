use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use province_map_shared::{BoundaryIndex, HoverLabel, MapSession, ProvinceRaster, TileCache, plan_frame};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, PointerEvent, WheelEvent};

use crate::clipboard::{self, CopyOutcome};
use crate::config::{NOTICE_HIDE_MS, TILE_URL};
use crate::render_loop::RenderScheduler;
use crate::renderer;
use crate::tiles::{self, SharedTileCache};

struct WindowBinding {
    window: web_sys::Window,
    event: &'static str,
    handler: Closure<dyn Fn(web_sys::Event)>,
}

thread_local! {
    static WINDOW_BINDINGS: RefCell<Vec<WindowBinding>> = const { RefCell::new(Vec::new()) };
}

/// Attach a window listener, replacing any earlier one for the same event.
fn bind_window_event(event: &'static str, handler: impl Fn(web_sys::Event) + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    WINDOW_BINDINGS.with(|slot| {
        let mut bindings = slot.borrow_mut();
        bindings.retain(|old| {
            if old.event != event {
                return true;
            }
            let _ = old
                .window
                .remove_event_listener_with_callback(old.event, old.handler.as_ref().unchecked_ref());
            false
        });

        let handler = Closure::<dyn Fn(web_sys::Event)>::new(handler);
        if window
            .add_event_listener_with_callback(event, handler.as_ref().unchecked_ref())
            .is_ok()
        {
            bindings.push(WindowBinding {
                window: window.clone(),
                event,
                handler,
            });
        }
    });
}

fn context_2d(
    canvas: &HtmlCanvasElement,
    cached: &RefCell<Option<CanvasRenderingContext2d>>,
) -> Option<CanvasRenderingContext2d> {
    if let Some(ctx) = cached.borrow().as_ref() {
        return Some(ctx.clone());
    }
    let ctx = canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;
    *cached.borrow_mut() = Some(ctx.clone());
    Some(ctx)
}

/// Cursor position relative to the canvas' top-left corner.
fn canvas_local(canvas_ref: NodeRef<leptos::html::Canvas>, e: &MouseEvent) -> (f64, f64) {
    canvas_ref
        .get_untracked()
        .map(|el| {
            let rect = el.get_bounding_client_rect();
            (
                e.client_x() as f64 - rect.left(),
                e.client_y() as f64 - rect.top(),
            )
        })
        .unwrap_or((e.offset_x() as f64, e.offset_y() as f64))
}

/// Pannable, zoomable province map with hover readout and multi-select.
#[component]
pub fn MapCanvas(raster: Arc<ProvinceRaster>) -> impl IntoView {
    let boundaries = Rc::new(BoundaryIndex::build(&raster));
    web_sys::console::info_1(
        &format!(
            "province map {}x{}, {} bordered provinces",
            raster.width(),
            raster.height(),
            boundaries.province_count()
        )
        .into(),
    );
    let session = Rc::new(RefCell::new(MapSession::new(raster)));
    let tile_cache: SharedTileCache = Rc::new(RefCell::new(TileCache::new(TILE_URL)));
    let cached_ctx: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let hover: RwSignal<Option<HoverLabel>> = RwSignal::new(None);
    let selected_count: RwSignal<usize> = RwSignal::new(0);
    let notice: RwSignal<Option<CopyOutcome>> = RwSignal::new(None);
    let notice_timer: Rc<RefCell<Option<gloo_timers::callback::Timeout>>> =
        Rc::new(RefCell::new(None));

    let scheduler = Rc::new(RenderScheduler::new({
        let session = session.clone();
        let tile_cache = tile_cache.clone();
        let boundaries = boundaries.clone();
        let last_stats: Cell<Option<renderer::PaintStats>> = Cell::new(None);
        move |waker| {
            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let canvas: &HtmlCanvasElement = &canvas;
            let Some(ctx) = context_2d(canvas, &cached_ctx) else {
                return;
            };
            let (surface_w, surface_h) = canvas
                .parent_element()
                .map(|p| (p.client_width() as f64, p.client_height() as f64))
                .unwrap_or((0.0, 0.0));

            let plan = plan_frame(&session.borrow(), &boundaries, surface_w, surface_h);
            let mut requested = Vec::new();
            let stats = renderer::paint(
                canvas,
                &ctx,
                &plan,
                &mut tile_cache.borrow_mut(),
                |coord, src| requested.push((coord, src)),
            );
            // Loads start after the cache borrow above is released.
            for (coord, src) in requested {
                tiles::load_tile(tile_cache.clone(), coord, src, waker.clone());
            }
            if stats.loading_changed(last_stats.replace(Some(stats))) {
                web_sys::console::debug_1(
                    &format!(
                        "tiles: {} drawn, {} pending",
                        stats.tiles_drawn, stats.tiles_missing
                    )
                    .into(),
                );
            }
        }
    }));

    // First paint once the canvas is in the DOM.
    Effect::new({
        let scheduler = scheduler.clone();
        move || {
            if canvas_ref.get().is_some() {
                scheduler.mark_dirty();
            }
        }
    });

    bind_window_event("resize", {
        let scheduler = scheduler.clone();
        move |_| scheduler.mark_dirty()
    });

    bind_window_event("keydown", {
        let scheduler = scheduler.clone();
        let session = session.clone();
        move |e| {
            let Ok(e) = e.dyn_into::<web_sys::KeyboardEvent>() else {
                return;
            };
            if e.key() == "Escape" && session.borrow_mut().clear_selection() {
                selected_count.set(0);
                scheduler.mark_dirty();
            }
        }
    });

    // --- Input handlers ---

    let on_wheel = {
        let session = session.clone();
        let scheduler = scheduler.clone();
        move |e: WheelEvent| {
            e.prevent_default();
            let (x, y) = canvas_local(canvas_ref, &e);
            if session.borrow_mut().wheel(x, y, e.delta_y()) {
                scheduler.mark_dirty();
            }
        }
    };

    let on_pointer_down = {
        let session = session.clone();
        move |e: PointerEvent| {
            session
                .borrow_mut()
                .pointer_down(e.client_x() as f64, e.client_y() as f64);

            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.set_pointer_capture(e.pointer_id()).ok();
                el.style().set_property("cursor", "grabbing").ok();
            }
        }
    };

    let on_pointer_move = {
        let session = session.clone();
        let scheduler = scheduler.clone();
        move |e: PointerEvent| {
            let (cx, cy) = (e.client_x() as f64, e.client_y() as f64);
            if session.borrow_mut().pointer_move(cx, cy) {
                scheduler.mark_dirty();
            }
            let (lx, ly) = canvas_local(canvas_ref, &e);
            hover.set(Some(session.borrow().hover(cx, cy, lx, ly)));
        }
    };

    let on_pointer_up = {
        let session = session.clone();
        move |e: PointerEvent| {
            session.borrow_mut().pointer_up();

            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.style().set_property("cursor", "grab").ok();
            }
        }
    };

    let on_pointer_leave = {
        let session = session.clone();
        move |_: PointerEvent| {
            session.borrow_mut().pointer_up();
            hover.set(None);
        }
    };

    let on_click = {
        let session = session.clone();
        let scheduler = scheduler.clone();
        move |e: MouseEvent| {
            let (x, y) = canvas_local(canvas_ref, &e);
            let mut session = session.borrow_mut();
            if session.click(x, y, e.shift_key()) {
                selected_count.set(session.selection().len());
                scheduler.mark_dirty();
            }
        }
    };

    let on_copy = {
        let session = session.clone();
        move |_: MouseEvent| {
            let text = session.borrow().selection().clipboard_text();
            let notice_timer = notice_timer.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = clipboard::copy_ids(text).await;
                if let CopyOutcome::Failed(ref e) = outcome {
                    web_sys::console::warn_1(&format!("clipboard write failed: {e}").into());
                }
                notice.set(Some(outcome));

                let timeout = gloo_timers::callback::Timeout::new(NOTICE_HIDE_MS, move || {
                    notice.set(None);
                });
                if let Some(old) = notice_timer.borrow_mut().replace(timeout) {
                    old.cancel();
                }
            });
        }
    };

    view! {
        <div class="map-shell">
            <div
                class="map-surface"
                style="position: relative; width: 100%; height: 100%; overflow: hidden;"
                on:wheel=on_wheel
                on:pointerdown=on_pointer_down
                on:pointermove=on_pointer_move
                on:pointerup=on_pointer_up
                on:pointerleave=on_pointer_leave
                on:click=on_click
            >
                <canvas
                    node_ref=canvas_ref
                    style="position: absolute; left: 0; top: 0; touch-action: none; image-rendering: pixelated; cursor: grab;"
                />
            </div>
            {move || {
                hover
                    .get()
                    .filter(|label| !label.text.is_empty())
                    .map(|label| {
                        let style = format!(
                            "position: fixed; left: {}px; top: {}px; pointer-events: none;",
                            label.left,
                            label.top,
                        );
                        view! { <div class="hover-box" style=style>{label.text}</div> }
                    })
            }}
            <div class="toolbar">
                <button class="copy-btn" on:click=on_copy>
                    {move || format!("Copy IDs ({})", selected_count.get())}
                </button>
                {move || {
                    notice
                        .get()
                        .map(|outcome| {
                            let class = if outcome.is_error() { "notice notice-error" } else { "notice" };
                            view! { <span class=class>{outcome.notice()}</span> }
                        })
                }}
            </div>
        </div>
    }
}
