use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use glam::Vec2;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, MouseEvent,
    TouchEvent, Window,
};

use super::raster::CanvasRaster;
use crate::color::Rgb;
use crate::config::{Config, ConfigError, DrawMode};
use crate::particle::Surface;
use crate::session::{Painter, Session};

impl From<ConfigError> for JsValue {
    fn from(err: ConfigError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Build a config from the canvas `data-*` attributes. `interactive`, when
/// given, overrides `data-interactive`.
pub fn config_from_dataset(
    canvas: &HtmlCanvasElement,
    interactive: Option<bool>,
) -> Result<Config, JsValue> {
    let config = Config::from_attributes(interactive, |name| {
        canvas.get_attribute(&format!("data-{}", name))
    })?;
    Ok(config)
}

/// Draws agents onto a 2D canvas context.
struct Canvas2dPainter<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl Painter for Canvas2dPainter<'_> {
    fn clear(&mut self, surface: Surface) {
        self.ctx
            .clear_rect(0.0, 0.0, f64::from(surface.width), f64::from(surface.height));
    }

    fn fill(&mut self, at: Vec2, size: f32, mode: DrawMode, color: Rgb) {
        self.ctx.set_fill_style_str(&color.css());
        let (x, y) = (f64::from(at.x), f64::from(at.y));
        match mode {
            DrawMode::Points => self.ctx.fill_rect(x, y, 2.0, 2.0),
            DrawMode::Circles => {
                self.ctx.begin_path();
                if self
                    .ctx
                    .arc(x, y, f64::from(size) / 2.0, 0.0, std::f64::consts::TAU)
                    .is_ok()
                {
                    self.ctx.fill();
                }
            }
        }
    }
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

struct Inner {
    window: Window,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    raster: RefCell<CanvasRaster>,
    session: RefCell<Session>,
    on_complete: js_sys::Function,

    // Holds the animation-frame closure so that it can keep calling
    // `request_animation_frame` on itself.
    frame: RefCell<Option<Closure<dyn FnMut()>>>,
    frame_handle: Cell<Option<i32>>,
    timer_handle: Cell<Option<i32>>,
    listeners: RefCell<Vec<Listener>>,
    alive: Cell<bool>,
}

/// A running reveal on one canvas. Dropping it (or calling [`Mount::stop`])
/// cancels the pending frame and timer and detaches every listener.
pub struct Mount {
    inner: Rc<Inner>,
}

impl Mount {
    pub fn start(
        canvas: HtmlCanvasElement,
        config: Config,
        on_complete: js_sys::Function,
    ) -> Result<Mount, JsValue> {
        let window = window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d context not supported")?
            .dyn_into()?;
        let interactive = config.interactive;

        let inner = Rc::new(Inner {
            raster: RefCell::new(CanvasRaster::new(&document)?),
            session: RefCell::new(Session::new(config)),
            window: window.clone(),
            canvas: canvas.clone(),
            ctx,
            on_complete,
            frame: RefCell::new(None),
            frame_handle: Cell::new(None),
            timer_handle: Cell::new(None),
            listeners: RefCell::new(Vec::new()),
            alive: Cell::new(true),
        });

        resample(&inner);

        let window_target: &EventTarget = window.as_ref();
        listen(&inner, window_target, "resize", |inner, _| resample(inner))?;
        if interactive {
            let target: &EventTarget = canvas.as_ref();
            listen(&inner, target, "mousemove", on_mouse_move)?;
            listen(&inner, target, "mouseleave", |inner, _| {
                inner.session.borrow_mut().pointer_mut().mouse_leave();
            })?;
            listen(&inner, target, "touchstart", on_touch)?;
            listen(&inner, target, "touchmove", on_touch)?;
            listen(&inner, target, "touchend", end_touch)?;
            listen(&inner, target, "touchcancel", end_touch)?;
        }

        let weak = Rc::downgrade(&inner);
        *inner.frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                on_frame(&inner);
            }
        }) as Box<dyn FnMut()>));
        request_frame(&inner);

        log::info!(
            "particle reveal mounted: {} agents, interactive={}",
            inner.session.borrow().pool().len(),
            interactive
        );
        Ok(Mount { inner })
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        let inner = &self.inner;
        inner.alive.set(false);
        if let Some(id) = inner.frame_handle.take() {
            inner.window.cancel_animation_frame(id).ok();
        }
        if let Some(id) = inner.timer_handle.take() {
            inner.window.clear_timeout_with_handle(id);
        }
        for listener in inner.listeners.borrow_mut().drain(..) {
            listener
                .target
                .remove_event_listener_with_callback(
                    listener.kind,
                    listener.callback.as_ref().unchecked_ref(),
                )
                .ok();
        }
        inner.frame.borrow_mut().take();
        log::info!("particle reveal unmounted");
    }
}

fn listen(
    inner: &Rc<Inner>,
    target: &EventTarget,
    kind: &'static str,
    handler: fn(&Inner, &Event),
) -> Result<(), JsValue> {
    let weak: Weak<Inner> = Rc::downgrade(inner);
    let callback = Closure::wrap(Box::new(move |event: Event| {
        if let Some(inner) = weak.upgrade() {
            if inner.alive.get() {
                handler(&inner, &event);
            }
        }
    }) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
    inner.listeners.borrow_mut().push(Listener {
        target: target.clone(),
        kind,
        callback,
    });
    Ok(())
}

fn request_frame(inner: &Inner) {
    let frame = inner.frame.borrow();
    let Some(callback) = frame.as_ref() else {
        return;
    };
    match inner
        .window
        .request_animation_frame(callback.as_ref().unchecked_ref())
    {
        Ok(id) => inner.frame_handle.set(Some(id)),
        Err(err) => log::warn!("request_animation_frame failed: {:?}", err),
    }
}

fn on_frame(inner: &Rc<Inner>) {
    if !inner.alive.get() {
        return;
    }
    let report = {
        let mut painter = Canvas2dPainter { ctx: &inner.ctx };
        inner.session.borrow_mut().frame(&mut painter)
    };
    if report.settled_now > 0 {
        log::trace!("{} agents settled, {}/{} arrived", report.settled_now, report.arrived, report.alive);
    }
    if report.completion_due {
        schedule_completion(inner);
    }
    // schedule next
    request_frame(inner);
}

fn schedule_completion(inner: &Rc<Inner>) {
    let delay = inner.session.borrow().config().completion_delay_ms;
    let weak = Rc::downgrade(inner);
    let callback = Closure::once_into_js(move || {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        inner.timer_handle.set(None);
        let deliver = inner.alive.get() && inner.session.borrow_mut().fire_completion();
        if deliver {
            log::info!("particle reveal complete");
            if let Err(err) = inner.on_complete.call0(&JsValue::NULL) {
                log::warn!("completion callback threw: {:?}", err);
            }
        }
    });
    match inner
        .window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
    {
        Ok(id) => inner.timer_handle.set(Some(id)),
        Err(err) => log::warn!("failed to schedule completion: {:?}", err),
    }
}

/// Size the canvas to its container and re-sample the text for it.
fn resample(inner: &Inner) {
    let (width, height) = fit_canvas(&inner.window, &inner.canvas);
    let mut raster = inner.raster.borrow_mut();
    let report = inner
        .session
        .borrow_mut()
        .resize(width, height, &mut *raster);
    log::debug!("resized to {}x{}: {:?}", width, height, report);
}

fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
    let (w, h) = match canvas.parent_element() {
        Some(parent) => (
            f64::from(parent.client_width()),
            f64::from(parent.client_height()),
        ),
        None => (
            window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0),
            window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0),
        ),
    };
    let (w, h) = (w.max(0.0) as u32, h.max(0.0) as u32);
    canvas.set_width(w);
    canvas.set_height(h);
    (w, h)
}

/// Client coordinates to canvas pixels.
fn surface_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let sx = if rect.width() > 0.0 {
        f64::from(canvas.width()) / rect.width()
    } else {
        1.0
    };
    let sy = if rect.height() > 0.0 {
        f64::from(canvas.height()) / rect.height()
    } else {
        1.0
    };
    Vec2::new(
        ((f64::from(client_x) - rect.left()) * sx) as f32,
        ((f64::from(client_y) - rect.top()) * sy) as f32,
    )
}

fn on_mouse_move(inner: &Inner, event: &Event) {
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        let at = surface_point(&inner.canvas, mouse.client_x(), mouse.client_y());
        inner.session.borrow_mut().pointer_mut().mouse_move(at);
    }
}

fn on_touch(inner: &Inner, event: &Event) {
    // Keeps the page from scrolling and from replaying the touch as mouse events.
    event.prevent_default();
    let Some(touch) = event
        .dyn_ref::<TouchEvent>()
        .and_then(|t| t.touches().get(0))
    else {
        return;
    };
    let at = surface_point(&inner.canvas, touch.client_x(), touch.client_y());
    let mut session = inner.session.borrow_mut();
    if event.type_() == "touchstart" {
        session.pointer_mut().touch_start(at);
    } else {
        session.pointer_mut().touch_move(at);
    }
}

fn end_touch(inner: &Inner, event: &Event) {
    event.prevent_default();
    let remaining = event
        .dyn_ref::<TouchEvent>()
        .and_then(|t| t.touches().get(0));
    let mut session = inner.session.borrow_mut();
    match remaining {
        // Another finger is still down: follow it.
        Some(touch) => {
            let at = surface_point(&inner.canvas, touch.client_x(), touch.client_y());
            session.pointer_mut().touch_move(at);
        }
        None => session.pointer_mut().touch_end(),
    }
}
