/// Character-cell rasterizer for screen-space polygons
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use polyview_core::{Polygon, ScreenPoint, Viewport};
use std::io::Write;

/// Character drawn for polygon outlines
pub const EDGE_CHAR: char = '#';

/// What a character cell currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    /// Covered by a polygon interior; hides whatever was drawn before
    Fill,
    Edge,
}

/// Draws polygons in the order given, later ones over earlier ones.
///
/// Every cell is split into two square-ish sub-pixels stacked vertically,
/// so the pixel grid is `width x 2*height`. Screen points are centred on
/// the grid with +y up.
pub struct PolygonRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl PolygonRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// The pixel viewport the transform pipeline should target
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f64, self.pixel_height() as f64)
    }

    fn pixel_height(&self) -> usize {
        self.height * 2
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.cells[y * self.width + x]
    }

    /// Map a centred screen point to pixel-grid coordinates
    pub fn to_pixel(&self, point: &ScreenPoint) -> (f64, f64) {
        (
            self.width as f64 / 2.0 + point.x,
            self.pixel_height() as f64 / 2.0 - point.y,
        )
    }

    pub fn render(&mut self, polygons: &[Polygon]) {
        for polygon in polygons {
            self.render_polygon(polygon);
        }
    }

    fn render_polygon(&mut self, polygon: &Polygon) {
        let points: Vec<(f64, f64)> = polygon.screen.iter().map(|p| self.to_pixel(p)).collect();
        if points.len() < 3 || points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return;
        }

        // Fan triangulation; faces are planar and the fill is flat
        for i in 1..points.len() - 1 {
            self.fill_triangle(points[0], points[i], points[i + 1]);
        }

        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.stroke_line(from, to);
        }
    }

    fn set(&mut self, x: i64, y: i64, cell: Cell) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.pixel_height() as i64 {
            return;
        }
        let idx = (y as usize / 2) * self.width + x as usize;
        self.cells[idx] = cell;
    }

    fn fill_triangle(&mut self, v0: (f64, f64), v1: (f64, f64), v2: (f64, f64)) {
        // Bounding box, clipped to the pixel grid
        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0) as i64;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil().min(self.width as f64 - 1.0) as i64;
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0) as i64;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil().min(self.pixel_height() as f64 - 1.0) as i64;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.set(x, y, Cell::Fill);
                    }
                }
            }
        }
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64)) {
        let bounds = (self.width as f64, self.pixel_height() as f64);
        let Some((a, b)) = clip_line(from, to, bounds) else {
            return;
        };

        // Bresenham between the clipped endpoints
        let (mut x0, mut y0) = (a.0.floor() as i64, a.1.floor() as i64);
        let (x1, y1) = (b.0.floor() as i64, b.1.floor() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set(x0, y0, Cell::Edge);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetForegroundColor(Color::Green))?;
        for y in 0..self.height {
            let row: String = self.cells[y * self.width..(y + 1) * self.width]
                .iter()
                .map(|cell| match cell {
                    Cell::Empty | Cell::Fill => ' ',
                    Cell::Edge => EDGE_CHAR,
                })
                .collect();
            writer.queue(cursor::MoveTo(0, y as u16))?;
            writer.queue(Print(row))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

/// Liang-Barsky clip of a segment against `[0, w) x [0, h)`
fn clip_line(
    from: (f64, f64),
    to: (f64, f64),
    (w, h): (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    // keep endpoints strictly inside so flooring stays on the grid
    let (max_x, max_y) = (w - 1e-6, h - 1e-6);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

    for (p, q) in [
        (-dx, from.0),
        (dx, max_x - from.0),
        (-dy, from.1),
        (dy, max_y - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }

    if t0 > t1 {
        return None;
    }
    Some((
        (from.0 + t0 * dx, from.1 + t0 * dy),
        (from.0 + t1 * dx, from.1 + t1 * dy),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn square(face: usize, half: f64) -> Polygon {
        let corners = [(-half, -half), (half, -half), (half, half), (-half, half)];
        Polygon {
            face,
            clip: corners.iter().map(|&(x, y)| Vector3::new(x, y, 0.0)).collect(),
            screen: corners
                .iter()
                .map(|&(x, y)| ScreenPoint { x, y, depth: 0.0 })
                .collect(),
        }
    }

    #[test]
    fn test_viewport_doubles_rows() {
        let renderer = PolygonRenderer::new(80, 24);
        assert_eq!(renderer.viewport(), Viewport::new(80.0, 48.0));
    }

    #[test]
    fn test_origin_maps_to_centre() {
        let renderer = PolygonRenderer::new(40, 10);
        let (x, y) = renderer.to_pixel(&ScreenPoint { x: 0.0, y: 0.0, depth: 0.0 });
        assert_eq!((x, y), (20.0, 10.0));
        let (_, y) = renderer.to_pixel(&ScreenPoint { x: 0.0, y: 4.0, depth: 0.0 });
        assert_eq!(y, 6.0, "+y is up");
    }

    #[test]
    fn test_square_has_outline_and_interior() {
        let mut renderer = PolygonRenderer::new(40, 20);
        renderer.render(&[square(0, 10.0)]);

        // pixel (20, 20) is cell row 10
        assert_eq!(renderer.cell(20, 10), Cell::Fill);
        // left edge at pixel x = 10
        assert_eq!(renderer.cell(10, 10), Cell::Edge);
        assert_eq!(renderer.cell(2, 10), Cell::Empty);
    }

    #[test]
    fn test_later_polygon_covers_earlier_outline() {
        let mut renderer = PolygonRenderer::new(40, 20);
        renderer.render(&[square(0, 4.0), square(1, 12.0)]);
        // the small square's left edge lies inside the large square
        assert_eq!(renderer.cell(16, 10), Cell::Fill);
    }

    #[test]
    fn test_offscreen_polygon_is_clipped() {
        let mut renderer = PolygonRenderer::new(10, 5);
        renderer.render(&[square(0, 1e9)]);
        assert!(renderer.cells.iter().all(|&c| c == Cell::Fill));
    }

    #[test]
    fn test_clip_line_rejects_outside() {
        assert!(clip_line((-5.0, -5.0), (-1.0, 20.0), (10.0, 10.0)).is_none());
        let (a, b) = clip_line((-5.0, 5.0), (15.0, 5.0), (10.0, 10.0)).unwrap();
        assert_eq!(a, (0.0, 5.0));
        assert!(b.0 < 10.0 && b.0 > 9.99);
    }
}
