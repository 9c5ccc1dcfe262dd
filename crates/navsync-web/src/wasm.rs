#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use js_sys::Function;
use navsync_core::coalesce::ScrollCoalescer;
use navsync_core::controller::{NavCmd, NavMode, NavigationController};
use navsync_core::debounce::SettleToken;
use navsync_core::history::{HistoryMode, to_fragment};
use navsync_core::menu::MenuState;
use navsync_core::theme::ThemeToggle;
use navsync_core::typewriter::Typewriter;
use navsync_core::{LinkPatch, LinkRegistry, NavConfig, NavError, Section, SectionId};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, ScrollBehavior,
    ScrollToOptions, Window,
};

use crate::handles::{Detach, Registrations};
use crate::measure::{anchor_spec, hash_fragment, section_from_rect};
use crate::storage::{LocalStore, js_message};

type Shared = Rc<RefCell<App>>;

/// Set up panic reporting (and console logging when enabled) on module load.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(feature = "console-logging")]
    crate::logging::init(tracing::Level::DEBUG);
}

/// Page navigation controller bound to the current document.
///
/// One instance per page. Timer and frame callbacks hold only weak
/// references, so they go inert once the page state is released. Dropping
/// the instance (JS `free()`) runs [`destroy`](NavSync::destroy), which
/// unregisters every DOM listener and `window.toggleTheme` before their
/// closures are freed.
#[wasm_bindgen]
pub struct NavSync {
    app: Option<Shared>,
    registrations: Registrations,
}

#[wasm_bindgen]
impl NavSync {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            app: None,
            registrations: Registrations::new(),
        }
    }

    /// Read the page, activate the initial section, and register handlers.
    ///
    /// `options` is a plain object matching `NavConfig` (camelCase). Throws a
    /// JS `Error` with a `code` property on invalid options or when no
    /// `window`/`document` exists. Calling `start` twice restarts cleanly.
    pub fn start(&mut self, options: Option<JsValue>) -> Result<(), JsValue> {
        self.destroy();

        let config = parse_options(options).map_err(|err| nav_error(&err))?;
        let window =
            web_sys::window().ok_or_else(|| js_error("NO_WINDOW", "no global `window`"))?;
        let document = window
            .document()
            .ok_or_else(|| js_error("NO_DOCUMENT", "window has no document"))?;

        let app = Rc::new(RefCell::new(App::new(window, document, config)?));
        app.borrow().apply_theme();
        app.borrow().apply_menu();

        let cmds = app.borrow_mut().load();
        run_commands(&app, cmds);

        let registered = register_listeners(&app, &mut self.registrations)
            .and_then(|()| install_theme_hook(&app))
            .map(|hook| self.registrations.push(hook));
        if let Err(err) = registered {
            self.registrations.release();
            return Err(err);
        }
        start_typewriter(&app);

        tracing::info!(
            links = app.borrow().controller.registry().len(),
            sections = app.borrow().sections.len(),
            "navsync started"
        );
        self.app = Some(app);
        Ok(())
    }

    /// Flip light/dark mode. Returns the new mode (`"light"` / `"dark"`).
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&self) -> Option<String> {
        self.app.as_ref().map(handle_theme_toggle)
    }

    /// Id of the active section, if any.
    #[wasm_bindgen(js_name = activeSection)]
    pub fn active_section(&self) -> Option<String> {
        let app = self.app.as_ref()?.borrow();
        app.controller.active_id().map(|id| id.as_str().to_owned())
    }

    /// JSON snapshot of navigation state, for debugging from the console.
    pub fn state(&self) -> Option<String> {
        let app = self.app.as_ref()?.borrow();
        let state = app.controller.state();
        let snapshot = serde_json::json!({
            "active": app.controller.active_id(),
            "mode": match state.mode() {
                NavMode::Idle => "idle",
                NavMode::ProgrammaticScroll => "programmatic-scroll",
            },
            "pendingTarget": state.pending_target(),
            "theme": app.theme.current(),
            "menuOpen": app.menu.is_open(),
        });
        Some(snapshot.to_string())
    }

    /// Remove every handler and release page references.
    pub fn destroy(&mut self) {
        self.registrations.release();
        self.app = None;
    }
}

impl Drop for NavSync {
    fn drop(&mut self) {
        self.destroy();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page state
// ─────────────────────────────────────────────────────────────────────────────

struct TypewriterSlot {
    machine: Typewriter,
    element: Element,
}

struct App {
    window: Window,
    config: NavConfig,
    controller: NavigationController,
    coalescer: ScrollCoalescer,
    frame_pending: bool,
    /// Every anchor matched by the link selector, indexed like the registry's
    /// `dom_index`.
    anchors: Vec<Element>,
    sections: Vec<Element>,
    root: Option<Element>,
    theme_icon: Option<Element>,
    theme: ThemeToggle<LocalStore>,
    menu: MenuState,
    menu_toggle: Option<Element>,
    menu_container: Option<Element>,
    typewriter: Option<TypewriterSlot>,
}

impl App {
    fn new(window: Window, document: Document, config: NavConfig) -> Result<Self, JsValue> {
        let anchors = query_all(&document, &config.link_selector)?;
        let sections = query_all(&document, &config.section_selector)?;

        let registry = LinkRegistry::build(anchors.iter().map(|a| {
            anchor_spec(
                a.get_attribute("href"),
                a.class_list().contains(&config.brand_class),
            )
        }));
        let controller = NavigationController::new(registry, &config);
        let theme = ThemeToggle::load(LocalStore::new(&window), config.theme.clone());

        let typewriter = match (
            query_one(&document, &config.typewriter.selector),
            Typewriter::new(config.typewriter.clone()),
        ) {
            (Some(element), Ok(machine)) => Some(TypewriterSlot { machine, element }),
            (None, _) => {
                tracing::warn!(selector = %config.typewriter.selector, "typewriter target missing; skipped");
                None
            }
            (_, Err(err)) => {
                tracing::warn!(%err, "typewriter disabled");
                None
            }
        };

        Ok(Self {
            root: document.document_element(),
            theme_icon: query_one(&document, &config.theme.icon_selector),
            menu_toggle: query_one(&document, &config.menu.toggle_selector),
            menu_container: query_one(&document, &config.menu.container_selector),
            window,
            controller,
            coalescer: ScrollCoalescer::new(),
            frame_pending: false,
            anchors,
            sections,
            theme,
            menu: MenuState::default(),
            typewriter,
            config,
        })
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn location_fragment(&self) -> Option<String> {
        let hash = self.window.location().hash().ok()?;
        hash_fragment(&hash).map(str::to_owned)
    }

    /// Measure section geometry in page coordinates.
    fn measure(&self) -> Vec<Section> {
        let scroll_y = self.scroll_y();
        self.sections
            .iter()
            .filter_map(|el| {
                let id = el.id();
                if id.is_empty() {
                    return None;
                }
                let rect = el.get_bounding_client_rect();
                Some(section_from_rect(&id, rect.top(), rect.height(), scroll_y))
            })
            .collect()
    }

    fn load(&mut self) -> Vec<NavCmd> {
        let fragment = self.location_fragment();
        let sections = self.measure();
        self.controller.on_load(fragment.as_deref(), &sections)
    }

    fn apply_links(&self, patches: &[LinkPatch]) {
        for patch in patches {
            let Some(anchor) = self.anchors.get(patch.dom_index) else {
                continue;
            };
            let _ = anchor
                .class_list()
                .toggle_with_force(&self.config.active_class, patch.active);
            let _ = if patch.active {
                anchor.set_attribute("aria-current", "true")
            } else {
                anchor.remove_attribute("aria-current")
            };
        }
    }

    fn scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn sync_url(&self, id: &SectionId, mode: HistoryMode) {
        let history = match self.window.history() {
            Ok(history) => history,
            Err(err) => {
                tracing::warn!(error = %js_message(&err), "history unavailable");
                return;
            }
        };
        let fragment = to_fragment(id);
        let result = match mode {
            HistoryMode::Push => history.push_state_with_url(&JsValue::NULL, "", Some(&fragment)),
            HistoryMode::Replace => {
                history.replace_state_with_url(&JsValue::NULL, "", Some(&fragment))
            }
        };
        if let Err(err) = result {
            tracing::warn!(%fragment, ?mode, error = %js_message(&err), "history write failed");
        }
    }

    fn apply_theme(&self) {
        let config = self.theme.config();
        if let Some(root) = &self.root {
            let _ = root.set_attribute(&config.root_attribute, self.theme.current().as_str());
        }
        if let Some(icon) = &self.theme_icon {
            icon.set_text_content(Some(self.theme.icon()));
        }
    }

    fn apply_menu(&self) {
        if let Some(container) = &self.menu_container {
            let _ = container
                .class_list()
                .toggle_with_force(&self.config.menu.open_class, self.menu.is_open());
        }
        if let Some(toggle) = &self.menu_toggle {
            let _ = toggle.set_attribute("aria-expanded", self.menu.aria_expanded());
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Event handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `click` on a tracked navbar anchor.
///
/// Post: if the section exists, the default fragment jump is prevented and
/// the controller is in ProgrammaticScroll. Otherwise the browser handles the
/// click.
fn handle_link_click(app: &Shared, dom_index: usize, event: &Event) {
    let cmds = {
        let mut guard = app.borrow_mut();
        let a = &mut *guard;
        let Some(id) = a
            .controller
            .registry()
            .links()
            .iter()
            .find(|l| l.dom_index() == dom_index)
            .map(|l| l.id().clone())
        else {
            return;
        };
        let sections = a.measure();
        a.controller.on_link_click(id.as_str(), &sections)
    };
    if cmds.is_empty() {
        return;
    }
    event.prevent_default();
    run_commands(app, cmds);
}

/// `scroll` / `resize` on the window: record the offset, resolve at most once
/// per animation frame.
fn handle_scroll(app: &Shared) {
    let window = {
        let mut a = app.borrow_mut();
        let offset = a.scroll_y();
        let first = a.coalescer.push(offset);
        if !first || a.frame_pending {
            return;
        }
        a.frame_pending = true;
        a.window.clone()
    };
    let weak = Rc::downgrade(app);
    let callback = Closure::once_into_js(move |_timestamp: f64| {
        if let Some(app) = weak.upgrade() {
            handle_frame(&app);
        }
    });
    if let Err(err) = window.request_animation_frame(callback.unchecked_ref::<Function>()) {
        tracing::warn!(error = %js_message(&err), "requestAnimationFrame failed");
        // Nothing will flush this signal; drop it so the next one reschedules.
        let mut a = app.borrow_mut();
        a.frame_pending = false;
        a.coalescer.clear();
    }
}

/// Animation frame after one or more scroll signals.
fn handle_frame(app: &Shared) {
    let cmds = {
        let mut a = app.borrow_mut();
        a.frame_pending = false;
        let Some(offset) = a.coalescer.flush() else {
            return;
        };
        let sections = a.measure();
        a.controller.on_scroll(offset, &sections)
    };
    run_commands(app, cmds);
}

/// Settle timer expiry. Stale tokens are ignored by the controller.
fn handle_settle(app: &Shared, token: SettleToken) {
    app.borrow_mut().controller.on_settle(token);
}

/// `popstate`: back/forward changed the fragment.
fn handle_popstate(app: &Shared) {
    let cmds = {
        let mut a = app.borrow_mut();
        let fragment = a.location_fragment();
        let sections = a.measure();
        a.controller
            .on_history_navigate(fragment.as_deref(), &sections)
    };
    run_commands(app, cmds);
}

fn handle_theme_toggle(app: &Shared) -> String {
    let theme = app.borrow_mut().theme.toggle();
    app.borrow().apply_theme();
    theme.as_str().to_owned()
}

fn handle_menu_toggle(app: &Shared) {
    app.borrow_mut().menu.toggle();
    app.borrow().apply_menu();
}

/// `click` anywhere inside the menu container: close on link activation.
fn handle_menu_click(app: &Shared, event: &Event) {
    let on_link = event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest("a").ok().flatten())
        .is_some();
    if on_link && app.borrow_mut().menu.on_link_activated() {
        app.borrow().apply_menu();
    }
}

fn typewriter_tick(app: &Shared) {
    let (window, delay) = {
        let mut guard = app.borrow_mut();
        let a = &mut *guard;
        let Some(slot) = a.typewriter.as_mut() else {
            return;
        };
        let frame = slot.machine.step();
        slot.element.set_text_content(Some(&frame.text));
        (a.window.clone(), frame.delay)
    };
    let weak = Rc::downgrade(app);
    set_timeout(&window, delay, move || {
        if let Some(app) = weak.upgrade() {
            typewriter_tick(&app);
        }
    });
}

fn start_typewriter(app: &Shared) {
    if app.borrow().typewriter.is_some() {
        typewriter_tick(app);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command execution
// ─────────────────────────────────────────────────────────────────────────────

/// Apply controller commands in order. Must be called with no outstanding
/// borrow of `app`.
fn run_commands(app: &Shared, cmds: Vec<NavCmd>) {
    for cmd in cmds {
        match cmd {
            NavCmd::SetLinks(patches) => app.borrow().apply_links(&patches),
            NavCmd::ScrollTo { top } => app.borrow().scroll_to(top),
            NavCmd::SyncUrl { id, mode } => app.borrow().sync_url(&id, mode),
            NavCmd::ArmSettleTimer { token, delay } => {
                // Earlier timers are left running: their tokens are stale and
                // the controller ignores them.
                let window = app.borrow().window.clone();
                let weak = Rc::downgrade(app);
                set_timeout(&window, delay, move || {
                    if let Some(app) = weak.upgrade() {
                        handle_settle(&app, token);
                    }
                });
            }
        }
    }
}

fn set_timeout(window: &Window, delay: Duration, f: impl FnOnce() + 'static) {
    let callback = Closure::once_into_js(f);
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    if let Err(err) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref::<Function>(),
        millis,
    ) {
        tracing::warn!(error = %js_message(&err), "setTimeout failed");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Listener plumbing
// ─────────────────────────────────────────────────────────────────────────────

/// A registered DOM event handler, kept alive until detached.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &impl AsRef<EventTarget>,
        kind: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let target: EventTarget = target.as_ref().clone();
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let function = callback.as_ref().unchecked_ref::<Function>();
        if passive {
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind, function, &options,
            )?;
        } else {
            target.add_event_listener_with_callback(kind, function)?;
        }
        Ok(Self {
            target,
            kind,
            callback,
        })
    }
}

impl Detach for Listener {
    fn detach(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// `window.toggleTheme`, removed from the window before the closure is freed.
struct ThemeHook {
    window: Window,
    _callback: Closure<dyn FnMut() -> JsValue>,
}

impl Detach for ThemeHook {
    fn detach(&mut self) {
        let _ = js_sys::Reflect::delete_property(&self.window, &JsValue::from_str("toggleTheme"));
    }
}

/// Wrap a handler so it only runs while the page state is alive.
fn bound(app: &Shared, f: impl Fn(&Shared, Event) + 'static) -> impl FnMut(Event) + 'static {
    let weak: Weak<RefCell<App>> = Rc::downgrade(app);
    move |event| {
        if let Some(app) = weak.upgrade() {
            f(&app, event);
        }
    }
}

fn register_listeners(app: &Shared, listeners: &mut Registrations) -> Result<(), JsValue> {
    let a = app.borrow();

    for link in a.controller.registry().links() {
        let Some(anchor) = a.anchors.get(link.dom_index()) else {
            continue;
        };
        let dom_index = link.dom_index();
        listeners.push(Listener::attach(
            anchor,
            "click",
            false,
            bound(app, move |app, event| handle_link_click(app, dom_index, &event)),
        )?);
    }

    let window = &a.window;
    listeners.push(Listener::attach(window, "scroll", true, bound(app, |app, _| handle_scroll(app)))?);
    listeners.push(Listener::attach(window, "resize", true, bound(app, |app, _| handle_scroll(app)))?);
    listeners.push(Listener::attach(
        window,
        "popstate",
        false,
        bound(app, |app, _| handle_popstate(app)),
    )?);

    if let Some(toggle) = &a.menu_toggle {
        listeners.push(Listener::attach(
            toggle,
            "click",
            false,
            bound(app, |app, _| handle_menu_toggle(app)),
        )?);
    }
    if let Some(container) = &a.menu_container {
        listeners.push(Listener::attach(
            container,
            "click",
            false,
            bound(app, |app, event| handle_menu_click(app, &event)),
        )?);
    }
    Ok(())
}

/// Expose `window.toggleTheme()` for inline `onclick` handlers.
fn install_theme_hook(app: &Shared) -> Result<ThemeHook, JsValue> {
    let weak = Rc::downgrade(app);
    let hook = Closure::<dyn FnMut() -> JsValue>::new(move || match weak.upgrade() {
        Some(app) => JsValue::from_str(&handle_theme_toggle(&app)),
        None => JsValue::UNDEFINED,
    });
    let window = app.borrow().window.clone();
    js_sys::Reflect::set(&window, &JsValue::from_str("toggleTheme"), hook.as_ref())?;
    Ok(ThemeHook {
        window,
        _callback: hook,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// DOM helpers and errors
// ─────────────────────────────────────────────────────────────────────────────

fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = document.query_selector_all(selector).map_err(|err| {
        nav_error(&NavError::InvalidSelector {
            selector: selector.to_owned(),
            reason: js_message(&err),
        })
    })?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Optional page hook. A selector the page cannot parse counts as absent.
fn query_one(document: &Document, selector: &str) -> Option<Element> {
    match document.query_selector(selector) {
        Ok(found) => found,
        Err(err) => {
            tracing::warn!(%selector, error = %js_message(&err), "unparseable selector; hook skipped");
            None
        }
    }
}

fn parse_options(options: Option<JsValue>) -> Result<NavConfig, NavError> {
    let Some(options) = options.filter(|v| !v.is_undefined() && !v.is_null()) else {
        return Ok(NavConfig::default());
    };
    let json: String = js_sys::JSON::stringify(&options)
        .map_err(|e| NavError::MalformedOptions(js_message(&e)))?
        .into();
    NavConfig::from_json(&json)
}

fn js_error(code: &str, message: &str) -> JsValue {
    let error = js_sys::Error::new(message);
    js_sys::Reflect::set(&error, &JsValue::from_str("code"), &JsValue::from_str(code)).ok();
    error.into()
}

fn nav_error(err: &NavError) -> JsValue {
    js_error(err.code(), &err.to_string())
}
