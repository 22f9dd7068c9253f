//! Browser backend: the scene rendered into DOM elements and driven by
//! `requestAnimationFrame`.

use crate::scene::Scene;
use crate::surface::{Environment, HostSurface, Rect, Viewport};
use orbit_shared::config::OrbitConfig;
use orbit_shared::protocol::{AmbientTilt, ItemFrame, ItemSpawn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlImageElement, PointerEvent, Window};

const ICON_ATTRIBUTE: &str = "data-icons";
const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// The host element and the document that owns it.
pub struct WebSurface {
    document: Document,
    host: HtmlElement,
}

impl WebSurface {
    /// Look up the host by id. `None` if the page has no such element.
    pub fn find(document: Document, host_id: &str) -> Option<Self> {
        let host = document
            .get_element_by_id(host_id)?
            .dyn_into::<HtmlElement>()
            .ok()?;
        Some(Self { document, host })
    }
}

impl HostSurface for WebSurface {
    type Handle = HtmlImageElement;

    fn icon_attribute(&self) -> Option<String> {
        self.host.get_attribute(ICON_ATTRIBUTE)
    }

    fn bounds(&self) -> Rect {
        let r = self.host.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.width(), r.height())
    }

    fn create_item(&mut self, spawn: &ItemSpawn) -> Option<HtmlImageElement> {
        let img = self
            .document
            .create_element("img")
            .ok()?
            .dyn_into::<HtmlImageElement>()
            .ok()?;
        img.set_class_name("icon");
        img.set_src(&spawn.icon);
        img.set_alt("Orbiting icon");

        let style = img.style();
        let size = format!("{}vmin", spawn.size_vmin);
        let props = [
            ("position", "absolute".to_string()),
            ("left", "0".to_string()),
            ("top", "0".to_string()),
            ("width", size.clone()),
            ("height", size),
            (
                "filter",
                format!(
                    "hue-rotate({}deg) drop-shadow(0 0.6vmin 1.2vmin rgba(0,0,0,0.45))",
                    spawn.hue_deg
                ),
            ),
        ];
        for (name, value) in props {
            let _ = style.set_property(name, &value);
        }

        self.host.append_child(&img).ok()?;
        Some(img)
    }

    fn apply_frame(&mut self, handle: &HtmlImageElement, frame: &ItemFrame) {
        let style = handle.style();
        let size = format!("{}vmin", frame.size_vmin);
        let _ = style.set_property("width", &size);
        let _ = style.set_property("height", &size);
        let _ = style.set_property("transform", &frame.css_transform());
        let _ = style.set_property("opacity", &format!("{:.3}", frame.opacity));
        // Stacking follows depth: nearer items on top
        let _ = style.set_property("z-index", &format!("{}", (-frame.depth).round() as i64));
    }

    fn apply_ambient_tilt(&mut self, tilt: AmbientTilt) {
        // The stylesheet rotates about Y by --mouse-tilt-x and about X by --mouse-tilt-y
        let style = self.host.style();
        let _ = style.set_property("--mouse-tilt-x", &format!("{}deg", tilt.ry));
        let _ = style.set_property("--mouse-tilt-y", &format!("{}deg", tilt.rx));
    }

    fn remove_item(&mut self, handle: HtmlImageElement) {
        handle.remove();
    }
}

/// Viewport and media queries from the browser window.
pub struct WebEnvironment {
    window: Window,
}

impl Environment for WebEnvironment {
    fn viewport(&self) -> Viewport {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64());
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64());
        Viewport::new(width.unwrap_or(0.0), height.unwrap_or(0.0))
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .is_some_and(|mql| mql.matches())
    }
}

struct Runtime {
    window: Window,
    scene: RefCell<Option<Scene<WebSurface>>>,
    stopped: Cell<bool>,
    frame_cb: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    pointer_cb: RefCell<Option<Closure<dyn FnMut(PointerEvent)>>>,
    resize_cb: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Runtime {
    fn request_frame(&self) {
        if let Some(cb) = self.frame_cb.borrow().as_ref() {
            let _ = self
                .window
                .request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }
}

/// Handle to a running scene; `stop()` tears it down.
#[wasm_bindgen]
pub struct OrbitHandle {
    runtime: Rc<Runtime>,
}

#[wasm_bindgen]
impl OrbitHandle {
    pub fn stop(&self) {
        let rt = &self.runtime;
        if rt.stopped.replace(true) {
            return;
        }
        if let Some(cb) = rt.pointer_cb.borrow_mut().take() {
            let _ = rt
                .window
                .remove_event_listener_with_callback("pointermove", cb.as_ref().unchecked_ref());
        }
        if let Some(cb) = rt.resize_cb.borrow_mut().take() {
            let _ = rt
                .window
                .remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
        }
        if let Some(scene) = rt.scene.borrow_mut().take() {
            scene.teardown();
        }
    }
}

/// Mount orbiting icons into the element with id `host_id`. Returns
/// `None` (and does nothing) when the element does not exist.
#[wasm_bindgen]
pub fn mount_orbits(host_id: &str, config: JsValue) -> Option<OrbitHandle> {
    let window = web_sys::window()?;
    let document = window.document()?;
    let surface = WebSurface::find(document, host_id);

    let config: OrbitConfig = config
        .as_string()
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default();
    mount_with(window, surface, config)
}

fn mount_with(
    window: Window,
    surface: Option<WebSurface>,
    config: OrbitConfig,
) -> Option<OrbitHandle> {
    let env = WebEnvironment {
        window: window.clone(),
    };
    let mut rng = ChaCha8Rng::from_entropy();
    let scene = Scene::mount(surface, &env, config, &mut rng)?;
    let parallax = scene.parallax_enabled();

    let runtime = Rc::new(Runtime {
        window: window.clone(),
        scene: RefCell::new(Some(scene)),
        stopped: Cell::new(false),
        frame_cb: RefCell::new(None),
        pointer_cb: RefCell::new(None),
        resize_cb: RefCell::new(None),
    });

    let rt = runtime.clone();
    *runtime.frame_cb.borrow_mut() = Some(Closure::new(move |timestamp_ms: f64| {
        if rt.stopped.get() {
            // Drop our own closure; nothing reschedules it
            let _ = rt.frame_cb.borrow_mut().take();
            return;
        }
        if let Some(scene) = rt.scene.borrow_mut().as_mut() {
            scene.advance_to(timestamp_ms / 1000.0);
        }
        rt.request_frame();
    }));

    if parallax {
        let rt = runtime.clone();
        let cb = Closure::<dyn FnMut(PointerEvent)>::new(move |e: PointerEvent| {
            if let Some(scene) = rt.scene.borrow_mut().as_mut() {
                scene.pointer_moved(e.client_x() as f64, e.client_y() as f64);
            }
        });
        let _ = window.add_event_listener_with_callback("pointermove", cb.as_ref().unchecked_ref());
        *runtime.pointer_cb.borrow_mut() = Some(cb);
    }

    let rt = runtime.clone();
    let resize_env = WebEnvironment {
        window: window.clone(),
    };
    let cb = Closure::<dyn FnMut()>::new(move || {
        if let Some(scene) = rt.scene.borrow_mut().as_mut() {
            scene.resize(resize_env.viewport());
        }
    });
    let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
    *runtime.resize_cb.borrow_mut() = Some(cb);

    runtime.request_frame();
    Some(OrbitHandle { runtime })
}
