use crate::browser;
use anyhow::Result;
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;

/// The abstract command set the game understands.
/// Raw key codes stop existing at this boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    Enter,
}

impl Command {
    /// Map a KeyboardEvent code to a command
    /// - None for every code the game has no binding for
    pub fn from_code(code: &str) -> Option<Command> {
        match code {
            "ArrowUp" => Some(Command::Up),
            "ArrowDown" => Some(Command::Down),
            "ArrowLeft" => Some(Command::Left),
            "ArrowRight" => Some(Command::Right),
            "Enter" => Some(Command::Enter),
            _ => None,
        }
    }
}

/// Hook the window's key-up events into a channel the game loop can drain
/// between frames. Key-up (not key-down) keeps one press = one step, the
/// same discrete movement the game was designed around.
pub fn prepare_input() -> Result<UnboundedReceiver<KeyboardEvent>> {
    let (sender, receiver) = unbounded();

    let handler = browser::closure_wrap(Box::new(move |event: KeyboardEvent| {
        let _ = sender.unbounded_send(event);
    }) as Box<dyn FnMut(KeyboardEvent)>);
    browser::window()?.set_onkeyup(Some(handler.as_ref().unchecked_ref()));
    // leak the handler so the listener outlives this call
    handler.forget();

    Ok(receiver)
}

/// Drain every key-up event queued since the last frame into commands.
/// Unmapped codes are dropped here, with a diagnostic, so entities only
/// ever see the Command enum.
pub fn drain(receiver: &mut UnboundedReceiver<KeyboardEvent>) -> Vec<Command> {
    let mut commands = Vec::new();
    while let Ok(Some(event)) = receiver.try_next() {
        match Command::from_code(&event.code()) {
            Some(command) => commands.push(command),
            None => warn!("Ignoring key-up with no binding : '{}'", event.code()),
        }
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_and_enter_codes_map_to_commands() {
        assert_eq!(Command::from_code("ArrowUp"), Some(Command::Up));
        assert_eq!(Command::from_code("ArrowDown"), Some(Command::Down));
        assert_eq!(Command::from_code("ArrowLeft"), Some(Command::Left));
        assert_eq!(Command::from_code("ArrowRight"), Some(Command::Right));
        assert_eq!(Command::from_code("Enter"), Some(Command::Enter));
    }

    #[test]
    fn unknown_codes_map_to_none() {
        assert_eq!(Command::from_code("Space"), None);
        assert_eq!(Command::from_code("KeyW"), None);
        assert_eq!(Command::from_code(""), None);
    }
}
