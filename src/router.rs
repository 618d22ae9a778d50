// src/router.rs
//
// The orchestrator. Owns the device redirects, the filter pipeline and the
// cursor resolver, builds the default chain, and is the single entry point
// the device layer injects events into and the rest of the compositor
// notifies of state changes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::InputConfig;
use crate::cursor::{
    CursorIcon, CursorImage, CursorImageResolver, CursorObserverToken, CursorSource,
};
use crate::error::InputError;
use crate::event::{
    AxisOrientation, AxisSource, ButtonState, Device, DeviceCapabilities, DeviceId, KeyState,
    ModifiersState, PointerButtons, ProximityState, TipState,
};
use crate::filters::{
    ActivitySpy, DecorationFilter, DragAndDropFilter, EffectsFilter, FakeTabletFilter,
    ForwardFilter, GlobalShortcutFilter, InternalWindowFilter, LockScreenFilter, MoveResizeFilter,
    PopupFilter, ScreenEdgeFilter, TouchHidesCursorSpy, VirtualTerminalFilter, WindowActionFilter,
    WindowSelectorFilter,
};
use crate::geometry::Point;
use crate::keyboard::KeyboardRedirect;
use crate::pipeline::{FilterHandle, InputFilter, InputSpy, Pipeline, RedirectCtx, SpyHandle};
use crate::pointer::PointerRedirect;
use crate::selection::{SelectionCallback, SelectionKind, SelectionState};
use crate::space::Collaborators;
use crate::tablet::TabletRedirect;
use crate::touch::TouchRedirect;
use crate::window::WindowRef;

macro_rules! redirect_ctx {
    ($self:expr) => {
        RedirectCtx {
            cx: &$self.cx,
            cursor: &$self.cursor,
            selection: &$self.selection,
            mods: $self.keyboard.modifiers(),
            touch_active: $self.touch.has_active(),
            pointer: $self.pointer.snapshot(),
        }
    };
}

pub struct InputRouter {
    cx: Collaborators,
    pipeline: Pipeline,
    pointer: PointerRedirect,
    keyboard: KeyboardRedirect,
    touch: TouchRedirect,
    tablet: TabletRedirect,
    cursor: Rc<RefCell<CursorImageResolver>>,
    selection: Rc<RefCell<SelectionState>>,
    devices: Vec<Device>,
    last_activity: Rc<Cell<Option<u32>>>,
}

impl InputRouter {
    pub fn new(cx: Collaborators, config: InputConfig) -> Self {
        let cursor = Rc::new(RefCell::new(CursorImageResolver::new()));
        let selection = Rc::new(RefCell::new(SelectionState::default()));
        let last_activity = Rc::new(Cell::new(None));
        let pipeline = build_pipeline(&config, &last_activity);
        info!(
            "input router: chain built (shortcuts: {}, session control: {}, screen edges: {})",
            config.shortcuts.enabled, config.shortcuts.session_control, config.shortcuts.screen_edges
        );
        Self {
            cx,
            pipeline,
            pointer: PointerRedirect::new(config.pointer),
            keyboard: KeyboardRedirect::new(config.keyboard),
            touch: TouchRedirect::new(),
            tablet: TabletRedirect::new(),
            cursor,
            selection,
            devices: Vec::new(),
            last_activity,
        }
    }

    // ---- device hot-plug -------------------------------------------------

    fn has_capability(&self, capability: DeviceCapabilities) -> bool {
        self.devices
            .iter()
            .any(|d| d.capabilities.contains(capability))
    }

    /// Registers a device. The seat capability flags flip on the first
    /// device of each class.
    pub fn device_added(&mut self, device: Device) {
        info!("input device added: {} (id {})", device.name, device.id);
        let caps = device.capabilities;
        let first_pointer =
            caps.contains(DeviceCapabilities::POINTER) && !self.has_capability(DeviceCapabilities::POINTER);
        let first_keyboard = caps.contains(DeviceCapabilities::KEYBOARD)
            && !self.has_capability(DeviceCapabilities::KEYBOARD);
        let first_touch =
            caps.contains(DeviceCapabilities::TOUCH) && !self.has_capability(DeviceCapabilities::TOUCH);
        self.devices.push(device);
        if first_pointer {
            self.cx.seat.set_pointer_capability(true);
            self.cursor.borrow_mut().set_pointer_available(true);
        }
        if first_keyboard {
            self.cx.seat.set_keyboard_capability(true);
        }
        if first_touch {
            self.cx.seat.set_touch_capability(true);
        }
    }

    /// Unregisters a device; the capability flags flip back when the last
    /// device of a class goes away, and the matching focus is dropped.
    pub fn device_removed(&mut self, id: DeviceId) -> Result<(), InputError> {
        let index = self
            .devices
            .iter()
            .position(|d| d.id == id)
            .ok_or(InputError::DeviceNotFound(id))?;
        let device = self.devices.remove(index);
        info!("input device removed: {} (id {})", device.name, device.id);
        let caps = device.capabilities;
        if caps.contains(DeviceCapabilities::POINTER)
            && !self.has_capability(DeviceCapabilities::POINTER)
        {
            self.cx.seat.set_pointer_capability(false);
            self.cursor.borrow_mut().set_pointer_available(false);
            let rctx = redirect_ctx!(self);
            self.pointer.unset_focus(&rctx);
        }
        if caps.contains(DeviceCapabilities::KEYBOARD)
            && !self.has_capability(DeviceCapabilities::KEYBOARD)
        {
            self.cx.seat.set_keyboard_capability(false);
            let rctx = redirect_ctx!(self);
            self.keyboard.unset_focus(&rctx);
        }
        if caps.contains(DeviceCapabilities::TOUCH)
            && !self.has_capability(DeviceCapabilities::TOUCH)
        {
            self.cx.seat.set_touch_capability(false);
            let rctx = redirect_ctx!(self);
            self.touch.cancel(&rctx);
        }
        Ok(())
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    // ---- event injection -------------------------------------------------

    pub fn process_pointer_motion(&mut self, delta: Point, time: u32) {
        let rctx = redirect_ctx!(self);
        self.pointer
            .process_motion(delta, time, &mut self.pipeline, &rctx);
        self.after_dispatch();
    }

    pub fn process_pointer_motion_absolute(&mut self, normalized: Point, time: u32) {
        let rctx = redirect_ctx!(self);
        self.pointer
            .process_motion_absolute(normalized, time, &mut self.pipeline, &rctx);
        self.after_dispatch();
    }

    pub fn process_pointer_button(&mut self, button: u32, state: ButtonState, time: u32) {
        let rctx = redirect_ctx!(self);
        self.pointer
            .process_button(button, state, time, &mut self.pipeline, &rctx);
        self.after_dispatch();
    }

    pub fn process_pointer_axis(
        &mut self,
        orientation: AxisOrientation,
        delta: f64,
        v120: i32,
        source: AxisSource,
        time: u32,
    ) {
        let rctx = redirect_ctx!(self);
        self.pointer.process_axis(
            orientation,
            delta,
            v120,
            source,
            time,
            &mut self.pipeline,
            &rctx,
        );
        self.after_dispatch();
    }

    pub fn process_key(&mut self, code: u32, state: KeyState, time: u32) {
        let rctx = redirect_ctx!(self);
        self.keyboard
            .process_key(code, state, time, &mut self.pipeline, &rctx);
        self.after_dispatch();
    }

    pub fn process_key_repeat(&mut self, code: u32, time: u32) {
        let rctx = redirect_ctx!(self);
        self.keyboard
            .process_key_repeat(code, time, &mut self.pipeline, &rctx);
        self.after_dispatch();
    }

    pub fn process_touch_down(&mut self, id: i32, position: Point, time: u32) {
        let rctx = redirect_ctx!(self);
        self.touch
            .process_down(id, position, time, &mut self.pipeline, &rctx);
        self.after_dispatch();
    }

    pub fn process_touch_motion(&mut self, id: i32, position: Point, time: u32) {
        let rctx = redirect_ctx!(self);
        self.touch
            .process_motion(id, position, time, &mut self.pipeline, &rctx);
        self.after_dispatch();
    }

    pub fn process_touch_up(&mut self, id: i32, time: u32) {
        let rctx = redirect_ctx!(self);
        self.touch.process_up(id, time, &mut self.pipeline, &rctx);
        self.after_dispatch();
    }

    pub fn process_touch_cancel(&mut self) {
        let rctx = redirect_ctx!(self);
        self.touch.cancel(&rctx);
    }

    pub fn process_swipe_begin(&mut self, fingers: u32, time: u32) {
        let rctx = redirect_ctx!(self);
        self.pointer
            .process_swipe_begin(fingers, time, &mut self.pipeline, &rctx);
    }

    pub fn process_swipe_update(&mut self, delta: Point, time: u32) {
        let rctx = redirect_ctx!(self);
        self.pointer
            .process_swipe_update(delta, time, &mut self.pipeline, &rctx);
    }

    pub fn process_swipe_end(&mut self, time: u32) {
        let rctx = redirect_ctx!(self);
        self.pointer
            .process_swipe_end(time, &mut self.pipeline, &rctx);
    }

    pub fn process_swipe_cancel(&mut self, time: u32) {
        let rctx = redirect_ctx!(self);
        self.pointer
            .process_swipe_cancel(time, &mut self.pipeline, &rctx);
    }

    pub fn process_pinch_begin(&mut self, fingers: u32, time: u32) {
        let rctx = redirect_ctx!(self);
        self.pointer
            .process_pinch_begin(fingers, time, &mut self.pipeline, &rctx);
    }

    pub fn process_pinch_update(&mut self, delta: Point, scale: f64, rotation: f64, time: u32) {
        let rctx = redirect_ctx!(self);
        self.pointer
            .process_pinch_update(delta, scale, rotation, time, &mut self.pipeline, &rctx);
    }

    pub fn process_pinch_end(&mut self, time: u32) {
        let rctx = redirect_ctx!(self);
        self.pointer
            .process_pinch_end(time, &mut self.pipeline, &rctx);
    }

    pub fn process_pinch_cancel(&mut self, time: u32) {
        let rctx = redirect_ctx!(self);
        self.pointer
            .process_pinch_cancel(time, &mut self.pipeline, &rctx);
    }

    pub fn process_hold_begin(&mut self, fingers: u32, time: u32) {
        let rctx = redirect_ctx!(self);
        self.pointer
            .process_hold_begin(fingers, time, &mut self.pipeline, &rctx);
    }

    pub fn process_hold_end(&mut self, time: u32) {
        let rctx = redirect_ctx!(self);
        self.pointer
            .process_hold_end(time, &mut self.pipeline, &rctx);
    }

    pub fn process_tablet_tool_proximity(
        &mut self,
        position: Point,
        state: ProximityState,
        time: u32,
    ) {
        let rctx = redirect_ctx!(self);
        self.tablet
            .process_proximity(position, state, time, &mut self.pipeline, &rctx);
    }

    pub fn process_tablet_tool_tip(&mut self, position: Point, state: TipState, time: u32) {
        let rctx = redirect_ctx!(self);
        self.tablet
            .process_tip(position, state, time, &mut self.pipeline, &rctx);
    }

    pub fn process_tablet_tool_axis(&mut self, position: Point, pressure: f64, time: u32) {
        let rctx = redirect_ctx!(self);
        self.tablet
            .process_axis(position, pressure, time, &mut self.pipeline, &rctx);
    }

    pub fn process_tablet_tool_button(&mut self, button: u32, state: ButtonState, time: u32) {
        let rctx = redirect_ctx!(self);
        self.tablet
            .process_button(button, state, time, &mut self.pipeline, &rctx);
    }

    // A selection mode that ended during dispatch suppressed pointer focus
    // while it ran; settle focus again once the dust settles.
    fn after_dispatch(&mut self) {
        let ended = self.selection.borrow_mut().take_just_ended();
        if ended {
            let rctx = redirect_ctx!(self);
            self.pointer.update(&rctx);
        }
    }

    // ---- compositor notifications ---------------------------------------

    /// Must be called synchronously when a window is removed, before its
    /// resources are torn down: every redirect drops its references and
    /// the pointer re-targets.
    pub fn window_removed(&mut self, window: &WindowRef) {
        debug!("window {:?} removed, scrubbing input state", window);
        let rctx = redirect_ctx!(self);
        self.pointer.window_removed(window, &rctx);
        self.keyboard.window_removed(window, &rctx);
        self.touch.window_removed(window, &rctx);
        self.tablet.window_removed(window);
        let rctx = redirect_ctx!(self);
        self.pointer.update(&rctx);
        self.keyboard.update(&rctx);
    }

    /// Stacking or geometry changed: what is under the pointer may differ
    /// now even though the pointer did not move.
    pub fn stacking_changed(&mut self) {
        let rctx = redirect_ctx!(self);
        self.pointer.update(&rctx);
        self.keyboard.update(&rctx);
    }

    /// Output layout changed; a pointer left stranded outside every output
    /// is pulled back in.
    pub fn outputs_changed(&mut self) {
        let rctx = redirect_ctx!(self);
        self.pointer.revalidate(&rctx);
    }

    /// Screen lock flipped. Gestures are force-ended (clients must not be
    /// left mid-gesture across the lock boundary), focus is recomputed
    /// under the new admission rules, and the cursor shows the lock state.
    pub fn lock_state_changed(&mut self, time: u32) {
        let locked = self.cx.lock.is_locked();
        info!("screen lock: {}", locked);
        let rctx = redirect_ctx!(self);
        self.pointer
            .cancel_gestures(time, &mut self.pipeline, &rctx);
        let rctx = redirect_ctx!(self);
        self.touch.cancel(&rctx);
        self.cursor.borrow_mut().set_lock_active(locked);
        let rctx = redirect_ctx!(self);
        self.pointer.update(&rctx);
        self.keyboard.update(&rctx);
    }

    /// A drag-and-drop session started; the drag icon takes over the
    /// cursor for its duration.
    pub fn drag_started(&mut self, icon: Option<CursorImage>) {
        let image = icon.unwrap_or_else(|| CursorImage::new(CursorIcon::Grabbing));
        self.cursor.borrow_mut().set_drag(Some(image));
    }

    pub fn drag_ended(&mut self) {
        self.cursor.borrow_mut().set_drag(None);
        // Focus updates were suppressed during the drag.
        let rctx = redirect_ctx!(self);
        self.pointer.update(&rctx);
    }

    /// The window manager started an interactive move/resize; the cursor
    /// switches until it finishes.
    pub fn interactive_move_resize_started(&mut self) {
        self.cursor
            .borrow_mut()
            .set_move_resize(Some(CursorImage::new(CursorIcon::Move)));
    }

    pub fn interactive_move_resize_finished(&mut self) {
        self.cursor.borrow_mut().set_move_resize(None);
        let rctx = redirect_ctx!(self);
        self.pointer.update(&rctx);
    }

    // ---- interactive selection modes ------------------------------------

    /// Starts the interactive window-picking mode. The callback fires
    /// exactly once, with the picked window or `None` on cancel.
    pub fn start_interactive_window_selection(
        &mut self,
        callback: impl FnOnce(Option<WindowRef>) + 'static,
    ) {
        self.start_selection(
            SelectionKind::Window,
            SelectionCallback::Window(Box::new(callback)),
        );
    }

    /// Starts the interactive point-picking mode. The callback fires
    /// exactly once, with the picked position or `None` on cancel.
    pub fn start_interactive_position_selection(
        &mut self,
        callback: impl FnOnce(Option<Point>) + 'static,
    ) {
        self.start_selection(
            SelectionKind::Position,
            SelectionCallback::Position(Box::new(callback)),
        );
    }

    fn start_selection(&mut self, kind: SelectionKind, callback: SelectionCallback) {
        if self.selection.borrow().is_active() {
            warn!("selection mode already active, rejecting new {:?} request", kind);
            match callback {
                SelectionCallback::Window(cb) => cb(None),
                SelectionCallback::Position(cb) => cb(None),
            }
            return;
        }
        let handle = self.pipeline.install_selector(Box::new(WindowSelectorFilter));
        self.selection.borrow_mut().begin(kind, callback, handle);
        self.cursor.borrow_mut().set_selection_active(true);
        // Clients see a pointer leave for the duration of the mode.
        let rctx = redirect_ctx!(self);
        self.pointer.unset_focus(&rctx);
    }

    pub fn is_selecting(&self) -> bool {
        self.selection.borrow().is_active()
    }

    // ---- filter management ----------------------------------------------

    /// Installs a filter at the runtime insertion point, after the
    /// security and mode filters but before forwarding.
    pub fn append_filter(&mut self, filter: Box<dyn InputFilter>) -> FilterHandle {
        self.pipeline.append_filter(filter)
    }

    /// Installs a filter ahead of the whole chain.
    pub fn prepend_filter(&mut self, filter: Box<dyn InputFilter>) -> FilterHandle {
        self.pipeline.prepend_filter(filter)
    }

    pub fn uninstall_filter(&mut self, handle: FilterHandle) {
        self.pipeline.uninstall_filter(handle);
    }

    pub fn add_spy(&mut self, spy: Box<dyn InputSpy>) -> SpyHandle {
        self.pipeline.add_spy(spy)
    }

    pub fn remove_spy(&mut self, handle: SpyHandle) {
        self.pipeline.remove_spy(handle);
    }

    // ---- queries and cursor plumbing ------------------------------------

    pub fn global_pointer(&self) -> Point {
        self.pointer.position()
    }

    pub fn pointer_focus_window(&self) -> Option<WindowRef> {
        self.pointer.focused_window()
    }

    pub fn pressed_pointer_buttons(&self) -> Vec<u32> {
        self.pointer.pressed_buttons()
    }

    /// Combined mask of the currently pressed pointer buttons.
    pub fn button_states(&self) -> PointerButtons {
        self.pointer.button_states()
    }

    pub fn keyboard_modifiers(&self) -> ModifiersState {
        self.keyboard.modifiers()
    }

    pub fn keyboard_repeat_info(&self) -> (u32, u32) {
        self.keyboard.repeat_info()
    }

    pub fn is_pointer_confined(&self) -> bool {
        self.pointer.is_confined()
    }

    pub fn is_pointer_locked(&self) -> bool {
        self.pointer.is_locked()
    }

    /// Timestamp of the most recent user input, for idle tracking.
    pub fn last_activity(&self) -> Option<u32> {
        self.last_activity.get()
    }

    pub fn warp_pointer(&mut self, target: Point, time: u32) {
        let rctx = redirect_ctx!(self);
        self.pointer.warp(target, time, &mut self.pipeline, &rctx);
    }

    /// The focused surface committed a cursor image (or hid it with
    /// `None`).
    pub fn set_focus_surface_cursor(&mut self, image: Option<CursorImage>) {
        self.cursor.borrow_mut().set_focus_cursor(image);
    }

    /// A grabbing effect overrides the cursor while it runs.
    pub fn set_effect_cursor_override(&mut self, image: Option<CursorImage>) {
        self.cursor.borrow_mut().set_effect_override(image);
    }

    pub fn cursor_image(&self) -> CursorImage {
        self.cursor.borrow().current_image()
    }

    pub fn cursor_source(&self) -> CursorSource {
        self.cursor.borrow().current_source()
    }

    /// Observes cursor changes (the renderer redraws the cursor plane on
    /// each notification).
    pub fn on_cursor_changed(
        &mut self,
        observer: impl FnMut(CursorSource, &CursorImage) + 'static,
    ) -> CursorObserverToken {
        self.cursor.borrow_mut().on_changed(observer)
    }

    pub fn remove_cursor_observer(&mut self, token: CursorObserverToken) {
        self.cursor.borrow_mut().remove_observer(token);
    }
}

fn build_pipeline(config: &InputConfig, last_activity: &Rc<Cell<Option<u32>>>) -> Pipeline {
    let mut pipeline = Pipeline::new();
    if config.shortcuts.enabled && config.shortcuts.session_control {
        pipeline.push(Box::new(VirtualTerminalFilter));
    }
    pipeline.add_spy(Box::new(ActivitySpy::new(last_activity.clone())));
    pipeline.add_spy(Box::new(TouchHidesCursorSpy));
    pipeline.push(Box::new(DragAndDropFilter));
    pipeline.push(Box::new(LockScreenFilter::new()));
    pipeline.push(Box::new(PopupFilter));
    pipeline.push_selector_slot();
    if config.shortcuts.enabled && config.shortcuts.screen_edges {
        pipeline.push(Box::new(ScreenEdgeFilter));
    }
    if config.shortcuts.enabled {
        pipeline.push(Box::new(GlobalShortcutFilter));
    }
    pipeline.push(Box::new(EffectsFilter));
    pipeline.push(Box::new(MoveResizeFilter));
    pipeline.push(Box::new(DecorationFilter));
    pipeline.push(Box::new(InternalWindowFilter::new()));
    pipeline.push(Box::new(WindowActionFilter));
    pipeline.push_forward_marker();
    pipeline.push(Box::new(ForwardFilter));
    pipeline.push(Box::new(FakeTabletFilter));
    pipeline
}
