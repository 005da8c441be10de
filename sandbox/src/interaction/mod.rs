//! Pointer and keyboard handling
//!
//! Window events are translated into `InputEvent`s by the app; a `Controller`
//! turns them into world mutations. Global commands (quit, pause) never reach
//! the controller.

mod drag;
mod nudge;

pub use drag::{pick_entity, DragController, DragState, BATCH_STEP};
pub use nudge::{NudgeController, NUDGE_SPEED};

use glam::Vec2;

use crate::world::{DragJoint, World};

/// Keys the sandboxes react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Reset,
    IncreaseBatch,
    DecreaseBatch,
    Pause,
    Left,
    Right,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left button: spawn
    Primary,
    /// Right button: grab
    Secondary,
    Middle,
}

/// One discrete input event, positions in world pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    PointerDown { button: PointerButton, position: Vec2 },
    PointerUp { button: PointerButton, position: Vec2 },
    PointerMove { position: Vec2 },
    Wheel { delta: f32 },
}

/// What the frame loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Continue,
    Quit,
    TogglePause,
}

/// Commands handled by the loop itself, whatever the controller
pub fn global_command(event: &InputEvent) -> Option<Command> {
    match event {
        InputEvent::Quit | InputEvent::KeyDown(Key::Escape) => Some(Command::Quit),
        InputEvent::KeyDown(Key::Pause) => Some(Command::TogglePause),
        _ => None,
    }
}

/// Interprets input as world mutations
pub trait Controller {
    /// Populate the world before the first frame
    fn setup(&mut self, _world: &mut World) {}

    fn handle(&mut self, world: &mut World, event: &InputEvent);

    /// Last known pointer position in world pixels
    fn pointer(&self) -> Vec2;

    /// The active drag joint, if any
    fn drag(&self) -> Option<&DragJoint> {
        None
    }

    /// Drop any engine objects the controller owns, before the world goes away
    fn release(&mut self, _world: &mut World) {}
}
