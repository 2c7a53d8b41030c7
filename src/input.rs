// ============================================================================
// input.rs — KeyIntent
// Translation of winit keyboard events into surface key events.
// ============================================================================

use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::surface::{KeyEvent, KeyEventKind};

/// Physical key code name in the DOM `KeyboardEvent.code` vocabulary.
///
/// winit names most `KeyCode` variants after that standard, so the variant
/// name is used directly. The exceptions winit renames are mapped back here.
pub fn key_code_name(code: KeyCode) -> String {
    match code {
        KeyCode::SuperLeft => String::from("MetaLeft"),
        KeyCode::SuperRight => String::from("MetaRight"),
        _ => format!("{code:?}"),
    }
}

pub fn event_kind(state: ElementState) -> KeyEventKind {
    match state {
        ElementState::Pressed => KeyEventKind::Down,
        ElementState::Released => KeyEventKind::Up,
    }
}

/// `None` for keys the platform could not identify. Auto-repeat presses
/// are passed through as ordinary key-downs.
pub fn translate(event: &winit::event::KeyEvent) -> Option<KeyEvent> {
    let PhysicalKey::Code(code) = event.physical_key else {
        return None;
    };
    Some(KeyEvent {
        kind: event_kind(event.state),
        code: key_code_name(code),
    })
}
