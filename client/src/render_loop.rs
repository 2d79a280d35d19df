use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;

/// Batches render requests via `requestAnimationFrame`.
///
/// Input handlers call `mark_dirty()`; tile loads hold a `RedrawWaker` and call
/// `wake()` when an image arrives. Any number of requests between two vsyncs
/// collapse into one paint, so a burst of tile arrivals never recurses into
/// the renderer.
pub struct RenderScheduler {
    inner: Rc<Inner>,
}

/// Weak handle for requesting a frame from async callbacks.
#[derive(Clone)]
pub struct RedrawWaker {
    inner: Weak<Inner>,
}

struct Inner {
    window: Option<web_sys::Window>,
    dirty: Cell<bool>,
    scheduled: Cell<bool>,
    raf_id: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Inner {
    fn request_frame(&self) {
        self.dirty.set(true);
        if self.scheduled.get() {
            return;
        }
        self.scheduled.set(true);
        let cb_ref = self.callback.borrow();
        let (Some(cb), Some(window)) = (cb_ref.as_ref(), self.window.as_ref()) else {
            self.scheduled.set(false);
            return;
        };
        match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => self.raf_id.set(Some(id)),
            Err(_) => self.scheduled.set(false),
        }
    }
}

impl RenderScheduler {
    pub fn new(render_fn: impl Fn(&RedrawWaker) + 'static) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let waker = RedrawWaker {
                inner: weak.clone(),
            };
            let cb = Closure::<dyn FnMut()>::new(move || {
                let Some(inner) = waker.inner.upgrade() else {
                    return;
                };
                inner.scheduled.set(false);
                inner.raf_id.set(None);
                if inner.dirty.replace(false) {
                    render_fn(&waker);
                }
            });
            Inner {
                window: web_sys::window(),
                dirty: Cell::new(false),
                scheduled: Cell::new(false),
                raf_id: Cell::new(None),
                callback: RefCell::new(Some(cb)),
            }
        });

        Self { inner }
    }

    /// Mark the scene as needing a repaint.
    pub fn mark_dirty(&self) {
        self.inner.request_frame();
    }

    pub fn waker(&self) -> RedrawWaker {
        RedrawWaker {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl RedrawWaker {
    /// No-op once the scheduler is gone.
    pub fn wake(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.request_frame();
        }
    }
}

impl Drop for RenderScheduler {
    fn drop(&mut self) {
        if let Some(raf_id) = self.inner.raf_id.replace(None)
            && let Some(window) = self.inner.window.as_ref()
        {
            let _ = window.cancel_animation_frame(raf_id);
        }
        self.inner.scheduled.set(false);
        self.inner.dirty.set(false);
        self.inner.callback.borrow_mut().take();
    }
}
