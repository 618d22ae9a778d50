// tests/routing.rs
//
// End-to-end routing scenarios: a real router with its default chain, driven
// through the public injection entry points against mock compositor
// collaborators.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use novade_input::event::{BTN_LEFT, BTN_SIDE};
use novade_input::{
    AxisEvent, AxisOrientation, AxisSource, ButtonEvent, ButtonState, Collaborators, CursorIcon,
    CursorSource, DecorationId, Device, DeviceCapabilities, DispatchCtx, EffectsHandler,
    InputConfig, InputFilter, InputRouter, InternalWindows, KeyEvent, KeyState, LockScreen,
    ModifiersState, MotionEvent, Outputs, PlatformWindowId, Point, Rect, Region, SeatSink,
    ShortcutHandler, Space, SurfaceId, TouchDownEvent, TouchMotionEvent, TouchUpEvent, WindowKind,
    WindowRef,
};

// Helper to initialize tracing only once per test binary.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[derive(Default)]
struct Scene {
    /// Topmost first.
    windows: RefCell<Vec<(WindowRef, Rect)>>,
    active: Cell<Option<WindowRef>>,
    confine_regions: RefCell<HashMap<u64, Region>>,
    lock_screen_windows: RefCell<HashSet<u64>>,
}

impl Scene {
    fn add_window(&self, window: WindowRef, geometry: Rect) {
        self.windows.borrow_mut().insert(0, (window, geometry));
    }

    fn remove_window(&self, window: &WindowRef) {
        self.windows.borrow_mut().retain(|(w, _)| w != window);
        if self.active.get() == Some(*window) {
            self.active.set(None);
        }
    }
}

impl Space for Scene {
    fn window_at(&self, position: Point) -> Option<WindowRef> {
        self.windows
            .borrow()
            .iter()
            .find(|(_, r)| r.contains(position))
            .map(|(w, _)| *w)
    }

    fn active_window(&self) -> Option<WindowRef> {
        self.active.get()
    }

    fn surface(&self, window: &WindowRef) -> Option<SurfaceId> {
        match window.kind {
            WindowKind::Surface | WindowKind::X11 => Some(window.id as SurfaceId),
            WindowKind::Internal => None,
        }
    }

    fn internal_handle(&self, _window: &WindowRef) -> Option<PlatformWindowId> {
        None
    }

    fn decoration_at(&self, _window: &WindowRef, _position: Point) -> Option<DecorationId> {
        None
    }

    fn decoration_hover_enter(
        &self,
        _window: &WindowRef,
        _decoration: DecorationId,
        _position: Point,
    ) {
    }

    fn decoration_hover_leave(&self, _window: &WindowRef, _decoration: DecorationId) {}

    fn decoration_pointer_motion(
        &self,
        _window: &WindowRef,
        _decoration: DecorationId,
        _position: Point,
    ) -> Option<CursorIcon> {
        None
    }

    fn decoration_pointer_button(
        &self,
        _window: &WindowRef,
        _decoration: DecorationId,
        _event: &ButtonEvent,
        _position: Point,
    ) {
    }

    fn decoration_pointer_axis(
        &self,
        _window: &WindowRef,
        _decoration: DecorationId,
        _event: &AxisEvent,
    ) {
    }

    fn confine_region(&self, window: &WindowRef) -> Option<Region> {
        self.confine_regions.borrow().get(&window.id).cloned()
    }

    fn lock_region(&self, _window: &WindowRef) -> Option<Region> {
        None
    }

    fn lock_position_hint(&self, _window: &WindowRef) -> Option<Point> {
        None
    }

    fn is_lock_screen_window(&self, window: &WindowRef) -> bool {
        self.lock_screen_windows.borrow().contains(&window.id)
    }

    fn request_activation(&self, _window: &WindowRef) {}

    fn move_resize_window(&self) -> Option<WindowRef> {
        None
    }

    fn update_move_resize(&self, _position: Point) {}

    fn end_move_resize(&self) {}

    fn cancel_move_resize(&self) {}
}

/// Records every seat call as one log line.
#[derive(Default)]
struct SeatProbe {
    log: RefCell<Vec<String>>,
    pointer_focus: Cell<Option<SurfaceId>>,
    touch_focus: Cell<Option<SurfaceId>>,
    drag_active: Cell<bool>,
}

impl SeatProbe {
    fn push(&self, line: String) {
        self.log.borrow_mut().push(line);
    }

    fn contains(&self, line: &str) -> bool {
        self.log.borrow().iter().any(|l| l == line)
    }

    fn position_of(&self, line: &str) -> Option<usize> {
        self.log.borrow().iter().position(|l| l == line)
    }

    fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl SeatSink for SeatProbe {
    fn set_focused_pointer_surface(&self, surface: Option<SurfaceId>, _position: Point) {
        self.pointer_focus.set(surface);
        self.push(format!("pointer-focus {:?}", surface));
    }

    fn set_focused_keyboard_surface(&self, surface: Option<SurfaceId>) {
        self.push(format!("keyboard-focus {:?}", surface));
    }

    fn set_focused_touch_surface(&self, surface: Option<SurfaceId>, _position: Point) {
        self.touch_focus.set(surface);
        self.push(format!("touch-focus {:?}", surface));
    }

    fn pointer_motion(&self, position: Point, _time: u32) {
        self.push(format!("motion {} {}", position.x, position.y));
    }

    fn pointer_button(&self, button: u32, state: ButtonState, _time: u32) {
        self.push(format!("button {:#x} {:?}", button, state));
    }

    fn pointer_axis(
        &self,
        orientation: AxisOrientation,
        delta: f64,
        _v120: i32,
        _source: AxisSource,
        _time: u32,
    ) {
        self.push(format!("axis {:?} {}", orientation, delta));
    }

    fn pointer_frame(&self) {
        self.push("frame".into());
    }

    fn keyboard_key(&self, code: u32, state: KeyState, _time: u32) {
        self.push(format!("key {} {:?}", code, state));
    }

    fn touch_down(&self, slot: i32, position: Point, _time: u32) {
        self.push(format!("touch-down {} {} {}", slot, position.x, position.y));
    }

    fn touch_motion(&self, slot: i32, position: Point, _time: u32) {
        self.push(format!(
            "touch-motion {} {} {}",
            slot, position.x, position.y
        ));
    }

    fn touch_up(&self, slot: i32, _time: u32) {
        self.push(format!("touch-up {}", slot));
    }

    fn touch_cancel(&self) {
        self.push("touch-cancel".into());
    }

    fn touch_frame(&self) {
        self.push("touch-frame".into());
    }

    fn gesture_swipe_begin(&self, fingers: u32, _time: u32) {
        self.push(format!("swipe-begin {}", fingers));
    }

    fn gesture_swipe_update(&self, delta: Point, _time: u32) {
        self.push(format!("swipe-update {} {}", delta.x, delta.y));
    }

    fn gesture_swipe_end(&self, _time: u32) {
        self.push("swipe-end".into());
    }

    fn gesture_swipe_cancel(&self, _time: u32) {
        self.push("swipe-cancel".into());
    }

    fn gesture_pinch_begin(&self, fingers: u32, _time: u32) {
        self.push(format!("pinch-begin {}", fingers));
    }

    fn gesture_pinch_update(&self, _delta: Point, scale: f64, _rotation: f64, _time: u32) {
        self.push(format!("pinch-update {}", scale));
    }

    fn gesture_pinch_end(&self, _time: u32) {
        self.push("pinch-end".into());
    }

    fn gesture_pinch_cancel(&self, _time: u32) {
        self.push("pinch-cancel".into());
    }

    fn gesture_hold_begin(&self, fingers: u32, _time: u32) {
        self.push(format!("hold-begin {}", fingers));
    }

    fn gesture_hold_end(&self, _time: u32) {
        self.push("hold-end".into());
    }

    fn set_pointer_capability(&self, available: bool) {
        self.push(format!("cap-pointer {}", available));
    }

    fn set_keyboard_capability(&self, available: bool) {
        self.push(format!("cap-keyboard {}", available));
    }

    fn set_touch_capability(&self, available: bool) {
        self.push(format!("cap-touch {}", available));
    }

    fn is_drag_active(&self) -> bool {
        self.drag_active.get()
    }

    fn drag_motion(&self, position: Point, _time: u32) {
        self.push(format!("drag-motion {} {}", position.x, position.y));
    }

    fn set_drag_target(&self, surface: Option<SurfaceId>, _position: Point) {
        self.push(format!("drag-target {:?}", surface));
    }

    fn drag_drop(&self, _time: u32) {
        self.push("drag-drop".into());
    }

    fn drag_cancel(&self) {
        self.push("drag-cancel".into());
    }

    fn has_popup_grab(&self) -> bool {
        false
    }

    fn popup_grab_owner(&self) -> Option<SurfaceId> {
        None
    }

    fn dismiss_popups(&self) {}
}

struct Screens {
    geometries: RefCell<Vec<Rect>>,
}

impl Default for Screens {
    fn default() -> Self {
        Self {
            geometries: RefCell::new(vec![Rect::new(0.0, 0.0, 1280.0, 1024.0)]),
        }
    }
}

impl Outputs for Screens {
    fn output_geometries(&self) -> Vec<Rect> {
        self.geometries.borrow().clone()
    }
}

#[derive(Default)]
struct LockFlag {
    locked: Cell<bool>,
}

impl LockScreen for LockFlag {
    fn is_locked(&self) -> bool {
        self.locked.get()
    }
}

struct PassiveShortcuts;

impl ShortcutHandler for PassiveShortcuts {
    fn global_key(&self, _modifiers: ModifiersState, _event: &KeyEvent) -> bool {
        false
    }

    fn global_axis(&self, _modifiers: ModifiersState, _event: &AxisEvent) -> bool {
        false
    }

    fn edge_approach(&self, _position: Point, _time: u32) -> bool {
        false
    }

    fn switch_vt(&self, _vt: u32) -> bool {
        true
    }
}

struct NoInternalWindows;

impl InternalWindows for NoInternalWindows {
    fn pointer_enter(&self, _window: PlatformWindowId, _position: Point) {}
    fn pointer_leave(&self, _window: PlatformWindowId) {}
    fn pointer_motion(&self, _window: PlatformWindowId, _event: &MotionEvent) -> bool {
        false
    }
    fn pointer_button(&self, _window: PlatformWindowId, _event: &ButtonEvent) -> bool {
        false
    }
    fn pointer_axis(&self, _window: PlatformWindowId, _event: &AxisEvent) -> bool {
        false
    }
    fn key(&self, _window: PlatformWindowId, _event: &KeyEvent) -> bool {
        false
    }
    fn touch_down(&self, _window: PlatformWindowId, _event: &TouchDownEvent) -> bool {
        false
    }
    fn touch_motion(&self, _window: PlatformWindowId, _event: &TouchMotionEvent) -> bool {
        false
    }
    fn touch_up(&self, _window: PlatformWindowId, _event: &TouchUpEvent) -> bool {
        false
    }
}

struct IdleEffects;

impl EffectsHandler for IdleEffects {
    fn is_grabbing_input(&self) -> bool {
        false
    }
    fn pointer_motion(&self, _event: &MotionEvent) -> bool {
        false
    }
    fn pointer_button(&self, _event: &ButtonEvent) -> bool {
        false
    }
    fn pointer_axis(&self, _event: &AxisEvent) -> bool {
        false
    }
    fn key(&self, _event: &KeyEvent) -> bool {
        false
    }
    fn touch_down(&self, _event: &TouchDownEvent) -> bool {
        false
    }
    fn touch_motion(&self, _event: &TouchMotionEvent) -> bool {
        false
    }
    fn touch_up(&self, _event: &TouchUpEvent) -> bool {
        false
    }
}

struct Harness {
    scene: Rc<Scene>,
    seat: Rc<SeatProbe>,
    outputs: Rc<Screens>,
    lock: Rc<LockFlag>,
}

impl Harness {
    fn new() -> Self {
        init_tracing();
        Self {
            scene: Rc::new(Scene::default()),
            seat: Rc::new(SeatProbe::default()),
            outputs: Rc::new(Screens::default()),
            lock: Rc::new(LockFlag::default()),
        }
    }

    fn router(&self) -> InputRouter {
        InputRouter::new(
            Collaborators {
                space: self.scene.clone(),
                seat: self.seat.clone(),
                outputs: self.outputs.clone(),
                lock: self.lock.clone(),
                shortcuts: Rc::new(PassiveShortcuts),
                internal: Rc::new(NoInternalWindows),
                effects: Rc::new(IdleEffects),
            },
            InputConfig::default(),
        )
    }
}

#[test]
fn motion_focuses_then_forwards_with_a_frame() {
    let h = Harness::new();
    h.scene
        .add_window(WindowRef::surface(1), Rect::new(0.0, 0.0, 500.0, 500.0));
    let mut router = h.router();

    router.process_pointer_motion(Point::new(100.0, 100.0), 1);

    let focus = h.seat.position_of("pointer-focus Some(1)").unwrap();
    let motion = h.seat.position_of("motion 100 100").unwrap();
    let frame = h.seat.position_of("frame").unwrap();
    assert!(focus < motion && motion < frame);

    router.process_pointer_button(BTN_LEFT, ButtonState::Pressed, 2);
    assert!(h.seat.contains("button 0x110 Pressed"));
}

#[test]
fn confinement_clamps_escape_attempts_with_axis_hold() {
    let h = Harness::new();
    let w = WindowRef::surface(1);
    h.scene.add_window(w, Rect::new(0.0, 0.0, 1280.0, 1024.0));
    h.scene.active.set(Some(w));
    h.scene
        .confine_regions
        .borrow_mut()
        .insert(w.id, Region::from(Rect::new(0.0, 0.0, 100.0, 100.0)));
    let mut router = h.router();

    // The constraint engages once the pointer is inside the region.
    router.process_pointer_motion(Point::new(50.0, 50.0), 1);
    assert!(router.is_pointer_confined());

    // Both axis-hold candidates land outside: the motion is rejected and
    // the position does not change.
    router.process_pointer_motion(Point::new(640.0, 462.0), 2);
    assert_eq!(router.global_pointer(), Point::new(50.0, 50.0));
    assert!(router.is_pointer_confined());

    // Diagonal where only x escapes: x is held at the previous position
    // and the y component is accepted.
    router.process_pointer_motion(Point::new(640.0, 30.0), 3);
    assert_eq!(router.global_pointer(), Point::new(50.0, 80.0));
}

#[test]
fn locking_mid_pinch_force_ends_the_gesture() {
    let h = Harness::new();
    let mut router = h.router();

    router.process_pinch_begin(3, 1);
    assert!(h.seat.contains("pinch-begin 3"));

    h.lock.locked.set(true);
    router.lock_state_changed(2);

    assert!(h.seat.contains("pinch-cancel"));
    assert_eq!(router.cursor_source(), CursorSource::LockScreen);
}

#[test]
fn earlier_filter_wins_and_later_one_never_runs() {
    struct ClaimButton {
        name: &'static str,
        hits: Rc<RefCell<Vec<&'static str>>>,
    }

    impl InputFilter for ClaimButton {
        fn pointer_button(&mut self, _event: &ButtonEvent, _ctx: &mut DispatchCtx<'_>) -> bool {
            self.hits.borrow_mut().push(self.name);
            true
        }
    }

    let h = Harness::new();
    let mut router = h.router();
    let hits = Rc::new(RefCell::new(Vec::new()));
    router.append_filter(Box::new(ClaimButton {
        name: "a",
        hits: hits.clone(),
    }));
    router.append_filter(Box::new(ClaimButton {
        name: "b",
        hits: hits.clone(),
    }));

    router.process_pointer_button(BTN_LEFT, ButtonState::Pressed, 1);

    assert_eq!(*hits.borrow(), vec!["a"]);
    // Consumed ahead of forwarding.
    assert!(!h.seat.contains("button 0x110 Pressed"));
}

#[test]
fn uninstalled_filter_stops_eating_events() {
    struct SideButtonEater {
        seen: Rc<Cell<usize>>,
    }

    impl InputFilter for SideButtonEater {
        fn pointer_button(&mut self, event: &ButtonEvent, _ctx: &mut DispatchCtx<'_>) -> bool {
            self.seen.set(self.seen.get() + 1);
            event.button == BTN_SIDE
        }
    }

    let h = Harness::new();
    let mut router = h.router();
    let seen = Rc::new(Cell::new(0));
    let handle = router.append_filter(Box::new(SideButtonEater { seen: seen.clone() }));

    router.process_pointer_button(BTN_SIDE, ButtonState::Pressed, 1);
    assert_eq!(seen.get(), 1);
    assert!(!h.seat.contains("button 0x113 Pressed"));

    router.uninstall_filter(handle);
    router.process_pointer_button(BTN_SIDE, ButtonState::Released, 2);
    assert_eq!(seen.get(), 1);
    assert!(h.seat.contains("button 0x113 Released"));
}

#[test]
fn combined_device_flips_both_capability_flags() {
    let h = Harness::new();
    let mut router = h.router();

    router.device_added(Device {
        id: 1,
        name: "keyboard-mouse-combo".into(),
        capabilities: DeviceCapabilities::POINTER | DeviceCapabilities::KEYBOARD,
    });
    assert!(h.seat.contains("cap-pointer true"));
    assert!(h.seat.contains("cap-keyboard true"));
    assert_eq!(router.devices().len(), 1);

    router.device_removed(1).unwrap();
    assert!(h.seat.contains("cap-pointer false"));
    assert!(h.seat.contains("cap-keyboard false"));
    assert!(router.devices().is_empty());
}

#[test]
fn lock_screen_admits_only_greeter_input() {
    let h = Harness::new();
    let greeter = WindowRef::surface(2);
    let normal = WindowRef::surface(1);
    h.scene.add_window(normal, Rect::new(300.0, 0.0, 300.0, 300.0));
    h.scene.add_window(greeter, Rect::new(0.0, 0.0, 300.0, 300.0));
    h.scene.lock_screen_windows.borrow_mut().insert(greeter.id);
    h.lock.locked.set(true);
    let mut router = h.router();

    router.process_pointer_motion(Point::new(100.0, 100.0), 1);
    router.process_pointer_button(BTN_LEFT, ButtonState::Pressed, 2);
    assert!(h.seat.contains("button 0x110 Pressed"));
    router.process_pointer_button(BTN_LEFT, ButtonState::Released, 3);

    h.seat.clear();
    router.process_pointer_motion(Point::new(300.0, 0.0), 4);
    router.process_pointer_button(BTN_LEFT, ButtonState::Pressed, 5);

    // Over the ordinary window everything is swallowed, while the frame
    // still closes each batch.
    assert!(!h.seat.contains("motion 400 100"));
    assert!(!h.seat.contains("button 0x110 Pressed"));
    assert!(h.seat.contains("frame"));
}

#[test]
fn touch_sequences_map_device_ids_onto_seat_slots() {
    let h = Harness::new();
    h.scene
        .add_window(WindowRef::surface(1), Rect::new(0.0, 0.0, 500.0, 500.0));
    let mut router = h.router();

    router.process_touch_down(7, Point::new(50.0, 50.0), 1);
    assert_eq!(h.seat.touch_focus.get(), Some(1));
    assert!(h.seat.contains("touch-down 0 50 50"));
    assert!(h.seat.contains("touch-frame"));

    router.process_touch_down(9, Point::new(60.0, 60.0), 2);
    assert!(h.seat.contains("touch-down 1 60 60"));

    router.process_touch_up(7, 3);
    assert!(h.seat.contains("touch-up 0"));

    // The freed slot is reused by the next finger.
    router.process_touch_down(11, Point::new(70.0, 70.0), 4);
    assert!(h.seat.contains("touch-down 0 70 70"));

    router.process_touch_up(9, 5);
    router.process_touch_up(11, 6);
    assert_eq!(h.seat.touch_focus.get(), None);
}

#[test]
fn active_drag_takes_over_pointer_routing() {
    let h = Harness::new();
    h.scene
        .add_window(WindowRef::surface(1), Rect::new(0.0, 0.0, 500.0, 500.0));
    h.seat.drag_active.set(true);
    let mut router = h.router();

    router.process_pointer_motion(Point::new(100.0, 100.0), 1);
    assert!(h.seat.contains("drag-target Some(1)"));
    assert!(h.seat.contains("drag-motion 100 100"));
    // The drag filter owns the motion; nothing is forwarded to a focus,
    // but the batch is still closed with a frame.
    assert!(!h.seat.contains("motion 100 100"));
    assert!(h.seat.contains("frame"));

    router.process_pointer_button(BTN_LEFT, ButtonState::Released, 2);
    assert!(h.seat.contains("drag-drop"));
}

#[test]
fn window_removal_scrubs_focus_and_cancels_touch() {
    let h = Harness::new();
    let w = WindowRef::surface(1);
    h.scene.add_window(w, Rect::new(0.0, 0.0, 500.0, 500.0));
    h.scene.active.set(Some(w));
    let mut router = h.router();

    router.process_pointer_motion(Point::new(100.0, 100.0), 1);
    router.process_touch_down(1, Point::new(50.0, 50.0), 2);
    assert_eq!(router.pointer_focus_window(), Some(w));

    h.scene.remove_window(&w);
    router.window_removed(&w);

    assert_eq!(router.pointer_focus_window(), None);
    assert_eq!(h.seat.pointer_focus.get(), None);
    assert!(h.seat.contains("touch-cancel"));
}

#[test]
fn output_shrink_pulls_the_pointer_back_inside() {
    let h = Harness::new();
    let mut router = h.router();

    router.process_pointer_motion(Point::new(1200.0, 900.0), 1);
    assert_eq!(router.global_pointer(), Point::new(1200.0, 900.0));

    *h.outputs.geometries.borrow_mut() = vec![Rect::new(0.0, 0.0, 800.0, 600.0)];
    router.outputs_changed();
    assert_eq!(router.global_pointer(), Point::new(800.0, 600.0));
}

#[test]
fn cursor_observer_sees_source_transitions_until_removed() {
    let h = Harness::new();
    let mut router = h.router();

    let sources = Rc::new(RefCell::new(Vec::new()));
    let sink = sources.clone();
    let token = router.on_cursor_changed(move |source, _image| {
        sink.borrow_mut().push(source);
    });
    assert!(sources.borrow().is_empty());

    h.lock.locked.set(true);
    router.lock_state_changed(1);
    assert!(sources.borrow().contains(&CursorSource::LockScreen));

    h.lock.locked.set(false);
    router.lock_state_changed(2);
    assert_eq!(sources.borrow().last(), Some(&CursorSource::Fallback));

    router.remove_cursor_observer(token);
    let count = sources.borrow().len();
    h.lock.locked.set(true);
    router.lock_state_changed(3);
    assert_eq!(sources.borrow().len(), count);
}
