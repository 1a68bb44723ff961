use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use tiny_skia::{FillRule, Paint, Path as SkiaPath, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::values::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Axis-aligned box given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl IntRect {
    fn to_skia(self) -> Option<Rect> {
        Rect::from_xywh(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }
}

/// The drawing surface. Shapes whose geometry is degenerate (negative
/// sizes, too few points) leave the surface untouched.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("failed to allocate canvas {}x{}", width, height))?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> i32 {
        self.pixmap.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.pixmap.height() as i32
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha color of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let pixel = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color {
            r: pixel.red(),
            g: pixel.green(),
            b: pixel.blue(),
            a: pixel.alpha(),
        })
    }

    /// Replaces every pixel, alpha included.
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    pub fn wipe(&mut self) {
        self.clear(Color::TRANSPARENT);
    }

    pub fn draw_rect(&mut self, color: Color, line_width: i32, rect: IntRect) {
        if let Some(bounds) = rect.to_skia() {
            self.stroke(&PathBuilder::from_rect(bounds), color, line_width);
        }
    }

    pub fn draw_ellipse(&mut self, color: Color, line_width: i32, rect: IntRect) {
        if let Some(path) = rect.to_skia().and_then(PathBuilder::from_oval) {
            self.stroke(&path, color, line_width);
        }
    }

    pub fn draw_line(&mut self, color: Color, line_width: i32, from: Point, to: Point) {
        if let Some(path) = polyline(&[from, to], false) {
            self.stroke(&path, color, line_width);
        }
    }

    pub fn draw_polygon(&mut self, color: Color, line_width: i32, points: &[Point]) {
        if let Some(path) = polyline(points, true) {
            self.stroke(&path, color, line_width);
        }
    }

    pub fn fill_rect(&mut self, color: Color, rect: IntRect) {
        if let Some(bounds) = rect.to_skia() {
            self.pixmap
                .fill_rect(bounds, &solid(color), Transform::identity(), None);
        }
    }

    pub fn fill_ellipse(&mut self, color: Color, rect: IntRect) {
        if let Some(path) = rect.to_skia().and_then(PathBuilder::from_oval) {
            self.fill(&path, color);
        }
    }

    pub fn fill_polygon(&mut self, color: Color, points: &[Point]) {
        if let Some(path) = polyline(points, true) {
            self.fill(&path, color);
        }
    }

    /// Writes the canvas in the format implied by the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = ImageFormat::from_path(path)
            .with_context(|| format!("cannot infer an image format from {}", path.display()))?;
        let image = self.to_rgba_image()?;
        let written = match format {
            // JPEG has no alpha channel
            ImageFormat::Jpeg => DynamicImage::ImageRgba8(image)
                .to_rgb8()
                .save_with_format(path, format),
            _ => image.save_with_format(path, format),
        };
        written.with_context(|| format!("failed to write image {}", path.display()))
    }

    fn to_rgba_image(&self) -> Result<RgbaImage> {
        let rgba = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect::<Vec<u8>>();
        RgbaImage::from_raw(self.pixmap.width(), self.pixmap.height(), rgba).ok_or_else(|| {
            anyhow!(
                "failed to construct image buffer for {}x{} canvas",
                self.pixmap.width(),
                self.pixmap.height()
            )
        })
    }

    fn stroke(&mut self, path: &SkiaPath, color: Color, line_width: i32) {
        // never a hairline: tiny-skia's aliased hairline blitter overruns
        // the pixmap on the right and bottom edges
        let stroke = Stroke {
            width: line_width.max(1) as f32,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &solid(color), &stroke, Transform::identity(), None);
    }

    fn fill(&mut self, path: &SkiaPath, color: Color) {
        self.pixmap.fill_path(
            path,
            &solid(color),
            FillRule::EvenOdd,
            Transform::identity(),
            None,
        );
    }
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = false;
    paint
}

fn polyline(points: &[Point], closed: bool) -> Option<SkiaPath> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut builder = PathBuilder::new();
    builder.move_to(first.x as f32, first.y as f32);
    for point in rest {
        builder.line_to(point.x as f32, point.y as f32);
    }
    if closed {
        builder.close();
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::opaque(255, 0, 0);
    const BLUE: Color = Color::opaque(0, 0, 255);

    fn canvas(width: u32, height: u32) -> Canvas {
        Canvas::new(width, height).expect("canvas should allocate")
    }

    fn all_pixels(canvas: &Canvas) -> impl Iterator<Item = Color> + '_ {
        (0..canvas.height() as u32).flat_map(move |y| {
            (0..canvas.width() as u32).filter_map(move |x| canvas.pixel(x, y))
        })
    }

    #[test]
    fn new_canvas_is_transparent() {
        let canvas = canvas(4, 3);
        assert_eq!((canvas.width(), canvas.height()), (4, 3));
        assert!(all_pixels(&canvas).all(|pixel| pixel == Color::TRANSPARENT));
    }

    #[test]
    fn zero_sized_canvas_is_refused() {
        assert!(Canvas::new(0, 10).is_err());
    }

    #[test]
    fn clear_then_wipe_returns_to_transparent() {
        let mut canvas = canvas(8, 8);
        canvas.clear(RED);
        assert!(all_pixels(&canvas).all(|pixel| pixel == RED));
        canvas.wipe();
        canvas.wipe();
        assert!(all_pixels(&canvas).all(|pixel| pixel == Color::TRANSPARENT));
    }

    #[test]
    fn fill_rect_covers_exactly_its_area() {
        let mut canvas = canvas(10, 10);
        canvas.fill_rect(
            BLUE,
            IntRect {
                x: 2,
                y: 2,
                width: 3,
                height: 3,
            },
        );
        assert_eq!(canvas.pixel(2, 2), Some(BLUE));
        assert_eq!(canvas.pixel(4, 4), Some(BLUE));
        assert_eq!(canvas.pixel(5, 5), Some(Color::TRANSPARENT));
        assert_eq!(canvas.pixel(1, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn degenerate_shapes_draw_nothing() {
        let mut canvas = canvas(10, 10);
        canvas.fill_rect(
            RED,
            IntRect {
                x: 5,
                y: 5,
                width: -3,
                height: 2,
            },
        );
        canvas.fill_polygon(RED, &[Point { x: 1, y: 1 }]);
        canvas.draw_polygon(RED, 1, &[]);
        assert!(all_pixels(&canvas).all(|pixel| pixel == Color::TRANSPARENT));
    }

    #[test]
    fn fill_ellipse_covers_center_not_corners() {
        let mut canvas = canvas(20, 20);
        canvas.fill_ellipse(
            RED,
            IntRect {
                x: 0,
                y: 0,
                width: 20,
                height: 20,
            },
        );
        assert_eq!(canvas.pixel(10, 10), Some(RED));
        assert_eq!(canvas.pixel(0, 0), Some(Color::TRANSPARENT));
        assert_eq!(canvas.pixel(19, 19), Some(Color::TRANSPARENT));
    }

    #[test]
    fn fill_polygon_triangle() {
        let mut canvas = canvas(20, 20);
        canvas.fill_polygon(
            BLUE,
            &[
                Point { x: 0, y: 0 },
                Point { x: 20, y: 0 },
                Point { x: 0, y: 20 },
            ],
        );
        assert_eq!(canvas.pixel(3, 3), Some(BLUE));
        assert_eq!(canvas.pixel(18, 18), Some(Color::TRANSPARENT));
    }

    #[test]
    fn draw_rect_outlines_without_filling() {
        let mut canvas = canvas(20, 20);
        canvas.draw_rect(
            RED,
            2,
            IntRect {
                x: 4,
                y: 4,
                width: 12,
                height: 12,
            },
        );
        assert_eq!(canvas.pixel(4, 10), Some(RED));
        assert_eq!(canvas.pixel(10, 10), Some(Color::TRANSPARENT));
    }

    #[test]
    fn draw_line_marks_pixels_along_it() {
        let mut canvas = canvas(20, 20);
        canvas.draw_line(RED, 3, Point { x: 0, y: 10 }, Point { x: 20, y: 10 });
        assert_eq!(canvas.pixel(10, 10), Some(RED));
        assert_eq!(canvas.pixel(10, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn edge_aligned_strokes_clamp_thin_widths_to_one_pixel() {
        let full = IntRect {
            x: 0,
            y: 0,
            width: 50,
            height: 50,
        };
        let corner = [
            Point { x: 0, y: 0 },
            Point { x: 50, y: 0 },
            Point { x: 50, y: 50 },
        ];
        for line_width in [0, -5, 1] {
            let mut rect = canvas(50, 50);
            rect.draw_rect(RED, line_width, full);
            assert!(all_pixels(&rect).any(|pixel| pixel == RED), "width {line_width}");
            assert_eq!(rect.pixel(25, 25), Some(Color::TRANSPARENT));

            let mut line = canvas(50, 50);
            line.draw_line(RED, line_width, corner[1], corner[2]);
            line.draw_line(RED, line_width, Point { x: 0, y: 50 }, corner[2]);
            line.draw_line(RED, line_width, corner[0], corner[1]);
            assert!(all_pixels(&line).any(|pixel| pixel == RED), "width {line_width}");

            let mut polygon = canvas(50, 50);
            polygon.draw_polygon(RED, line_width, &corner);
            polygon.draw_ellipse(RED, line_width, full);
            assert!(all_pixels(&polygon).any(|pixel| pixel == RED), "width {line_width}");
        }
    }

    #[test]
    fn save_png_round_trips_pixels() {
        let dir = tempfile::tempdir().expect("tempdir should create");
        let path = dir.path().join("out.png");
        let mut canvas = canvas(6, 4);
        canvas.clear(RED);
        canvas.save(&path).expect("png should save");

        let image = image::open(&path).expect("png should load").to_rgba8();
        assert_eq!(image.dimensions(), (6, 4));
        assert_eq!(image.get_pixel(5, 3).0, [255, 0, 0, 255]);
    }

    #[test]
    fn save_jpeg_drops_alpha() {
        let dir = tempfile::tempdir().expect("tempdir should create");
        let path = dir.path().join("out.jpg");
        let mut canvas = canvas(8, 8);
        canvas.clear(BLUE);
        canvas.save(&path).expect("jpeg should save");
        assert!(path.exists());
    }

    #[test]
    fn save_reports_unknown_extension_and_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir should create");
        let canvas = canvas(2, 2);
        assert!(canvas.save(&dir.path().join("out.unknownext")).is_err());
        assert!(canvas.save(&dir.path().join("missing/out.png")).is_err());
    }
}
