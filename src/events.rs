//! Listener bookkeeping and pointer input translation
//!
//! The [`EventHub`] tracks which listeners a mounted session holds. A session
//! registers its resize listener and the orbit controls register their pointer
//! subscription at mount; both must be unregistered at unmount. Events are only
//! delivered to holders of a live handle, so a torn-down session never reacts
//! to input again and leaks show up as a non-zero [`EventHub::active_count`].
//!
//! [`PointerInput`] is the windowing-independent form of pointer events the
//! controls consume. [`TouchTracker`] folds multi-finger touch into the same
//! vocabulary.

use std::collections::HashMap;

use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};

/// What a listener subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Resize,
    Pointer,
}

/// Proof of registration. Not `Clone`: whoever holds it hands it back to
/// [`EventHub::unregister`].
#[derive(Debug, PartialEq, Eq)]
pub struct ListenerHandle {
    id: u64,
    kind: ListenerKind,
}

impl ListenerHandle {
    pub fn kind(&self) -> ListenerKind {
        self.kind
    }
}

/// Registry of live listeners
#[derive(Debug, Default)]
pub struct EventHub {
    next_id: u64,
    active: HashMap<u64, ListenerKind>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: ListenerKind) -> ListenerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.active.insert(id, kind);
        log::trace!("registered {:?} listener #{}", kind, id);
        ListenerHandle { id, kind }
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unregister(&mut self, handle: ListenerHandle) -> bool {
        let removed = self.active.remove(&handle.id).is_some();
        if removed {
            log::trace!("unregistered {:?} listener #{}", handle.kind, handle.id);
        }
        removed
    }

    pub fn is_active(&self, handle: &ListenerHandle) -> bool {
        self.active.contains_key(&handle.id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn active_of(&self, kind: ListenerKind) -> usize {
        self.active.values().filter(|k| **k == kind).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer events in physical pixels
///
/// Wheel deltas follow the DOM convention: positive `delta_y` scrolls down,
/// which zooms out. One wheel notch is 100 pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Pressed(PointerButton),
    Released(PointerButton),
    Moved { x: f64, y: f64 },
    Left,
    Wheel { delta_y: f64 },
    /// Magnification delta; positive zooms in
    Pinch { delta: f64 },
    Modifiers { shift: bool },
}

const PIXELS_PER_LINE: f64 = 100.0;

impl PointerInput {
    /// Translates a mouse, wheel, gesture or modifier event into zero or more
    /// pointer inputs. Touch needs per-finger state; see [`TouchTracker`].
    pub fn from_window_event(event: &WindowEvent) -> Vec<PointerInput> {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = map_button(*button) else {
                    return Vec::new();
                };
                match state {
                    ElementState::Pressed => vec![PointerInput::Pressed(button)],
                    ElementState::Released => vec![PointerInput::Released(button)],
                }
            }
            WindowEvent::CursorMoved { position, .. } => vec![PointerInput::Moved {
                x: position.x,
                y: position.y,
            }],
            WindowEvent::CursorLeft { .. } => vec![PointerInput::Left],
            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -(*y as f64) * PIXELS_PER_LINE,
                    MouseScrollDelta::PixelDelta(position) => -position.y,
                };
                vec![PointerInput::Wheel { delta_y }]
            }
            WindowEvent::PinchGesture { delta, .. } => vec![PointerInput::Pinch { delta: *delta }],
            WindowEvent::ModifiersChanged(modifiers) => vec![PointerInput::Modifiers {
                shift: modifiers.state().shift_key(),
            }],
            _ => Vec::new(),
        }
    }
}

/// Turns raw touch points into pointer input
///
/// One finger drags with the primary button and orbits. When a second finger
/// lands the first two fingers form a gesture: the change in their spacing
/// becomes [`PointerInput::Pinch`] and their midpoint drags with the secondary
/// button, which pans. Fingers beyond the second are tracked but move nothing.
#[derive(Debug, Default)]
pub struct TouchTracker {
    /// Live touches in the order they started
    touches: Vec<(u64, (f64, f64))>,
    /// Distance between the two gesture fingers at the last update
    spacing: f64,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> usize {
        self.touches.len()
    }

    /// Translates any window event, routing touch through the tracker
    pub fn translate(&mut self, event: &WindowEvent) -> Vec<PointerInput> {
        match event {
            WindowEvent::Touch(touch) => self.handle_touch(
                touch.id,
                touch.phase,
                (touch.location.x, touch.location.y),
            ),
            other => PointerInput::from_window_event(other),
        }
    }

    pub fn handle_touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        location: (f64, f64),
    ) -> Vec<PointerInput> {
        match phase {
            TouchPhase::Started => self.start(id, location),
            TouchPhase::Moved => self.move_to(id, location),
            TouchPhase::Ended | TouchPhase::Cancelled => self.end(id),
        }
    }

    fn start(&mut self, id: u64, location: (f64, f64)) -> Vec<PointerInput> {
        if self.index_of(id).is_some() {
            return self.move_to(id, location);
        }
        self.touches.push((id, location));

        match self.touches.len() {
            1 => vec![moved_to(location), PointerInput::Pressed(PointerButton::Primary)],
            2 => {
                let mut inputs = vec![PointerInput::Released(PointerButton::Primary)];
                inputs.extend(self.begin_gesture());
                inputs
            }
            _ => Vec::new(),
        }
    }

    fn move_to(&mut self, id: u64, location: (f64, f64)) -> Vec<PointerInput> {
        let Some(index) = self.index_of(id) else {
            return Vec::new();
        };
        self.touches[index].1 = location;

        match (self.touches.len(), index) {
            (1, _) => vec![moved_to(location)],
            (_, 0 | 1) => self.update_gesture(),
            _ => Vec::new(),
        }
    }

    fn end(&mut self, id: u64) -> Vec<PointerInput> {
        let Some(index) = self.index_of(id) else {
            return Vec::new();
        };
        self.touches.remove(index);

        match self.touches.as_slice() {
            [] => vec![PointerInput::Released(PointerButton::Primary)],
            [(_, remaining)] => vec![
                PointerInput::Released(PointerButton::Secondary),
                moved_to(*remaining),
                PointerInput::Pressed(PointerButton::Primary),
            ],
            // A gesture finger lifted; the next finger in line takes its place
            _ if index < 2 => {
                let mut inputs = vec![PointerInput::Released(PointerButton::Secondary)];
                inputs.extend(self.begin_gesture());
                inputs
            }
            _ => Vec::new(),
        }
    }

    fn begin_gesture(&mut self) -> Vec<PointerInput> {
        let Some((a, b)) = self.gesture_points() else {
            return Vec::new();
        };
        self.spacing = distance(a, b);
        vec![
            moved_to(midpoint(a, b)),
            PointerInput::Pressed(PointerButton::Secondary),
        ]
    }

    fn update_gesture(&mut self) -> Vec<PointerInput> {
        let Some((a, b)) = self.gesture_points() else {
            return Vec::new();
        };
        let spacing = distance(a, b);
        let mut inputs = Vec::with_capacity(2);
        if self.spacing > 0.0 && spacing > 0.0 && spacing != self.spacing {
            inputs.push(PointerInput::Pinch {
                delta: spacing / self.spacing - 1.0,
            });
        }
        self.spacing = spacing;
        inputs.push(moved_to(midpoint(a, b)));
        inputs
    }

    fn gesture_points(&self) -> Option<((f64, f64), (f64, f64))> {
        match self.touches.as_slice() {
            [(_, a), (_, b), ..] => Some((*a, *b)),
            _ => None,
        }
    }

    fn index_of(&self, id: u64) -> Option<usize> {
        self.touches.iter().position(|(touch, _)| *touch == id)
    }
}

fn moved_to((x, y): (f64, f64)) -> PointerInput {
    PointerInput::Moved { x, y }
}

fn midpoint(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    ((a.0 + b.0) * 0.5, (a.1 + b.1) * 0.5)
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

fn map_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}
