use crate::browser;
use anyhow::{anyhow, Context, Error, Result};
// ELI5: web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use futures::channel::oneshot::channel;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::{
    // unchecked_ref (unsafe) cast from Javascript type to Rust type
    // - because we control the closure creation and specify the expected type,
    // in principle this should be generally safe (unsafe) code
    JsCast,
    JsValue,
};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

pub mod input;

// length of a frame in milliseconds
const FRAME_SIZE: f32 = 1.0 / 60.0 * 1000.0;
/// Fixed step handed to Game::update, in seconds.
/// Motion is scaled by this delta so the game runs at the same speed
/// regardless of how the browser batches animation frames.
pub const FRAME_STEP: f32 = FRAME_SIZE / 1000.0;

#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    /// Discrete input commands, delivered between frames by the event queue
    /// - a command is fully applied before the next update tick runs
    fn handle_command(&mut self, command: input::Command);
    fn update(&mut self, dt: f32);
    fn draw(&self, renderer: &Renderer);
}

pub struct GameLoop {
    last_frame: f64,
    accumulated_delta: f32,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut receiver = input::prepare_input()?;
        let mut game = game.initialize().await?;
        let mut game_loop = GameLoop {
            last_frame: browser::now()?,
            accumulated_delta: 0.0,
        };
        let renderer = Renderer {
            // moving this outside of request_animation_frame closure no longer
            // requires us to use the expect() syntax ... nice
            context: browser::context()?,
        };
        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            // drain key-up events first so every command lands before the
            // tick that follows it
            for command in input::drain(&mut receiver) {
                game.handle_command(command);
            }
            game_loop.accumulated_delta += (perf - game_loop.last_frame) as f32;
            while game_loop.accumulated_delta > FRAME_SIZE {
                game.update(FRAME_STEP);
                game_loop.accumulated_delta -= FRAME_SIZE;
            }
            game_loop.last_frame = perf;
            game.draw(&renderer);
            if let Err(err) = browser::request_animation_frame(f.borrow().as_ref().unwrap()) {
                // the loop dies here; nothing recoverable about that
                error!("GameLoop: could not schedule next frame : {:#?}", err);
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }
}

// ==================== Geometry ====================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(position: Point, size: Size) -> Self {
        Self { position, size }
    }

    pub fn left(&self) -> f32 {
        self.position.x
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.width
    }

    pub fn top(&self) -> f32 {
        self.position.y
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.height
    }

    /// Strict overlap on both axes
    /// - rectangles that merely share an edge do NOT intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

#[cfg(debug_assertions)]
pub trait DebugDraw {
    fn draw_debug(&self, renderer: &Renderer);
}

#[cfg(debug_assertions)]
impl DebugDraw for Rect {
    fn draw_debug(&self, renderer: &Renderer) {
        renderer.stroke_rect(self);
    }
}

// ==================== Renderer ====================

pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.position.x.into(),
            rect.position.y.into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    /// Draw a whole image with its top-left corner at `position`.
    /// This game uses one image per pose, never sprite-sheet slices.
    pub fn draw_image(&self, image: &HtmlImageElement, position: &Point) {
        self.context
            .draw_image_with_html_image_element(image, position.x.into(), position.y.into())
            .expect("Drawing is throwing exceptions! Unrecoverable error");
    }

    /// Draw an image tipped over by `radians` around `position`
    /// - used for the knocked-down player pose
    pub fn draw_image_rotated(&self, image: &HtmlImageElement, position: &Point, radians: f64) {
        self.context.save();
        self.context
            .translate(position.x.into(), position.y.into())
            .expect("Translate is throwing exceptions! Unrecoverable error");
        self.context
            .rotate(radians)
            .expect("Rotate is throwing exceptions! Unrecoverable error");
        self.context
            .draw_image_with_html_image_element(image, 0.0, 0.0)
            .expect("Drawing is throwing exceptions! Unrecoverable error");
        self.context.restore();
    }

    pub fn fill_rect(&self, rect: &Rect, color: &str) {
        self.context.set_fill_style_str(color);
        self.context.fill_rect(
            rect.position.x.into(),
            rect.position.y.into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    /// Translucent fill, bracketed by save/restore so the alpha never leaks
    /// into later draw calls
    pub fn fill_rect_with_alpha(&self, rect: &Rect, color: &str, alpha: f64) {
        self.context.save();
        self.context.set_global_alpha(alpha);
        self.fill_rect(rect, color);
        self.context.restore();
    }

    pub fn fill_text(&self, text: &str, position: &Point, font: &str, color: &str) {
        self.context.set_font(font);
        self.context.set_fill_style_str(color);
        self.context
            .fill_text(text, position.x.into(), position.y.into())
            .expect("Text is throwing exceptions! Unrecoverable error");
    }

    /// "start" | "center" | "end" ... callers reset to "start" when done
    pub fn set_text_align(&self, align: &str) {
        self.context.set_text_align(align);
    }

    pub fn stroke_rect(&self, rect: &Rect) {
        self.context.stroke_rect(
            rect.position.x.into(),
            rect.position.y.into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }
}

// ==================== Resources ====================

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::new_image()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!(
                "[engine.rs::load_image] Error loading image: {:#?}",
                err
            )));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callback alive until image is loaded or errors
    success_callback.forget();
    error_callback.forget();

    // ?? - double unwrap because Result<Result<(), Error>, oneshot::Canceled>
    // - first unwrap yields channel result : Result<(), Error>
    // - second unwrap yields image load result : () or propagating Error
    rx.await??;

    Ok(image)
}

/// Every sprite the game may ever draw, loaded before the first frame.
/// Render code looks sprites up by the same path string the manifest names,
/// so a miss is a startup configuration error rather than a blank frame.
pub struct Assets {
    images: HashMap<String, HtmlImageElement>,
}

impl Assets {
    pub async fn load(sources: &[String]) -> Result<Assets> {
        // kick off every load at once and let the slowest one gate us
        let loads = futures::future::join_all(sources.iter().map(|source| load_image(source)));

        let mut images = HashMap::new();
        for (source, loaded) in sources.iter().zip(loads.await) {
            let image =
                loaded.with_context(|| format!("Failed to pre-load sprite : {}", source))?;
            images.insert(source.clone(), image);
        }

        Ok(Assets { images })
    }

    pub fn get(&self, sprite: &str) -> Result<&HtmlImageElement> {
        self.images
            .get(sprite)
            .ok_or_else(|| anyhow!("Sprite '{}' missing from pre-loaded assets", sprite))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect::new(Point { x, y }, Size { width, height })
    }

    #[test]
    fn overlapping_rectangles_intersect() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 10.0, 10.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn edge_touching_rectangles_do_not_intersect() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        // shares the x = 10 edge exactly
        let right_neighbor = rect(10.0, 0.0, 10.0, 10.0);
        // shares the y = 10 edge exactly
        let below_neighbor = rect(0.0, 10.0, 10.0, 10.0);

        assert!(!a.intersects(&right_neighbor));
        assert!(!a.intersects(&below_neighbor));
    }

    #[test]
    fn disjoint_rectangles_do_not_intersect() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(50.0, 50.0, 10.0, 10.0);

        assert!(!a.intersects(&b));
    }

    #[test]
    fn contained_rectangle_intersects() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        let inner = rect(40.0, 40.0, 10.0, 10.0);

        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn overlap_on_one_axis_only_is_not_an_intersection() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        // same columns, rows far apart
        let b = rect(0.0, 50.0, 10.0, 10.0);

        assert!(!a.intersects(&b));
    }
}
