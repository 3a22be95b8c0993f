// ==================== Modules ====================
// browser carries the console macros, so it must come first
#[macro_use]
pub mod browser;
pub mod engine;
pub mod entity;
pub mod game;

// ==================== Imports ====================
use engine::GameLoop;
use game::GemCrossing;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

// ==================== Main Functions ====================
/// Main entry for the Webassembly module
/// - installs the panic hook
/// - hands a Loading game to the loop, which pre-loads every sprite and
/// then drives update/draw off requestAnimationFrame
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();

    // spawns a new asynchronous task in local thread, for web assembly
    // environment, using wasm_bindgen_futures
    browser::spawn_local(async move {
        GameLoop::start(GemCrossing::new())
            .await
            .expect("Could not start game loop");
    });

    Ok(())
}
