/// Polyview Web - draws the transformed mesh on a 2D canvas
///
/// The browser owns the frame loop: call `render()` from
/// `requestAnimationFrame` and `rotate()` from key handlers.

use polyview_core::{InputEvent, Mesh, ModelState, Pipeline, Polygon, RenderConfig, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const BACKGROUND: &str = "black";
const PEN: &str = "#00FF00";
const LINE_WIDTH: f64 = 2.0;

#[wasm_bindgen]
pub struct WebRenderer {
    mesh: Mesh,
    pipeline: Pipeline,
    state: ModelState,
    pending: Vec<InputEvent>,
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Bind to the canvas with id `canvas_id`, rendering `model` (OBJ text)
    /// or the built-in cube
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, model: Option<String>) -> Result<WebRenderer, JsValue> {
        let mesh = match model {
            Some(text) => Mesh::from_obj(&text),
            None => Mesh::default_model(),
        }
        .map_err(|e| JsValue::from_str(&format!("Failed to load model: {}", e)))?;

        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(canvas_id))
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {canvas_id:?}")))?
            .dyn_into::<HtmlCanvasElement>()?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let (width, height) = (canvas.width() as f64, canvas.height() as f64);
        let pipeline = Pipeline::new(RenderConfig {
            viewport: Viewport::new(width, height),
            ..Default::default()
        });

        Ok(WebRenderer {
            mesh,
            pipeline,
            state: ModelState::default(),
            pending: Vec::new(),
            context,
            width,
            height,
        })
    }

    /// Apply queued input, advance the spin and draw one frame
    pub fn render(&mut self) {
        self.state.apply_all(self.pending.drain(..));
        self.state.advance();

        let polygons = self.pipeline.frame(&self.mesh, &self.state);
        self.draw(&polygons);
    }

    /// Queue a rotation (degrees) for the next frame
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.pending.push(InputEvent::Rotate { dx, dy, dz });
    }

    pub fn toggle_pause(&mut self) {
        self.pending.push(InputEvent::TogglePause);
    }

    pub fn reset(&mut self) {
        self.pending.push(InputEvent::Reset);
    }

    pub fn face_count(&self) -> usize {
        self.mesh.face_count()
    }
}

impl WebRenderer {
    fn draw(&self, polygons: &[Polygon]) {
        let ctx = &self.context;
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, self.width, self.height);

        ctx.set_stroke_style_str(PEN);
        ctx.set_line_width(LINE_WIDTH);
        ctx.set_fill_style_str(BACKGROUND);

        for polygon in polygons {
            let mut points = polygon.screen.iter().map(|p| canvas_point(p.x, p.y, self.width, self.height));
            let Some((x0, y0)) = points.next() else {
                continue;
            };
            ctx.begin_path();
            ctx.move_to(x0, y0);
            for (x, y) in points {
                ctx.line_to(x, y);
            }
            ctx.close_path();
            ctx.fill();
            ctx.stroke();
        }
    }
}

/// Centred +y-up screen space to canvas pixels
fn canvas_point(x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
    (width / 2.0 + x, height / 2.0 - y)
}
