use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};

use crate::color::Color;
use crate::graphics::{draw_ellipse, draw_line, draw_triangle, fill_span};

/// A 2-D raster target the renderer draws on
///
/// Off-screen buffers are created with [`Surface::create`] and released by
/// dropping them. Coordinates are in pixels relative to the surface's top-left
/// corner; anything outside the surface is clipped.
pub trait Surface: Sized {
    fn create(width: u32, height: u32) -> Self;
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn fill(&mut self, color: Color);
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color);
    fn fill_triangle(&mut self, p0: [f64; 2], p1: [f64; 2], p2: [f64; 2], color: Color);
    fn fill_ellipse(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, color: Color);
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color);

    fn draw_hline(&mut self, x: i32, y: i32, length: i32, color: Color) {
        self.fill_rect(x, y, length, 1, color);
    }

    fn draw_vline(&mut self, x: i32, y: i32, length: i32, color: Color) {
        self.fill_rect(x, y, 1, length, color);
    }

    /// Copies this surface onto `dest` with its top-left corner at `(x, y)`,
    /// skipping pixels equal to `transparent`
    fn blit(&self, dest: &mut Self, x: i32, y: i32, transparent: Option<Color>);
}

/// In-memory RGB565 surface
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Canvas {
    /// Color at `(x, y)`, `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    #[cfg(test)]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Expands the canvas to 8-bit RGB
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let (r, g, b) = self.pixels[(y * self.width + x) as usize].to_rgb();
            Rgb([r, g, b])
        })
    }

    /// Writes the canvas to `path`; the format follows the file extension
    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        self.to_image()
            .save(path)
            .with_context(|| format!("failed to write snapshot {}", path.display()))
    }

    fn dims(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize)
    }
}

impl Surface for Canvas {
    fn create(width: u32, height: u32) -> Self {
        Canvas {
            width,
            height,
            pixels: vec![Color::BLACK; width as usize * height as usize],
        }
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let (w, h) = self.dims();
        for row in y.max(0)..(y + height).min(h as i32) {
            fill_span(&mut self.pixels, w, h, x as i64, row as i64, width as i64, color);
        }
    }

    fn fill_triangle(&mut self, p0: [f64; 2], p1: [f64; 2], p2: [f64; 2], color: Color) {
        let (w, h) = self.dims();
        draw_triangle(p0, p1, p2, &mut self.pixels, w, h, color);
    }

    fn fill_ellipse(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, color: Color) {
        let (w, h) = self.dims();
        draw_ellipse(
            cx as i64,
            cy as i64,
            rx as i64,
            ry as i64,
            &mut self.pixels,
            w,
            h,
            color,
        );
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let (w, h) = self.dims();
        draw_line(
            x0 as i64,
            y0 as i64,
            x1 as i64,
            y1 as i64,
            &mut self.pixels,
            w,
            h,
            color,
        );
    }

    fn blit(&self, dest: &mut Self, x: i32, y: i32, transparent: Option<Color>) {
        let dest_width = dest.width as i64;
        let dest_height = dest.height as i64;
        for sy in 0..self.height as i64 {
            let dy = y as i64 + sy;
            if dy < 0 || dy >= dest_height {
                continue;
            }
            for sx in 0..self.width as i64 {
                let dx = x as i64 + sx;
                if dx < 0 || dx >= dest_width {
                    continue;
                }
                let color = self.pixels[(sy * self.width as i64 + sx) as usize];
                if Some(color) == transparent {
                    continue;
                }
                dest.pixels[(dy * dest_width + dx) as usize] = color;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut canvas = Canvas::create(4, 4);
        canvas.fill_rect(-2, 2, 10, 10, Color::RED);
        assert_eq!(canvas.pixel(0, 1), Some(Color::BLACK));
        assert_eq!(canvas.pixel(0, 2), Some(Color::RED));
        assert_eq!(canvas.pixel(3, 3), Some(Color::RED));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn blit_skips_transparent_pixels() {
        let mut sprite = Canvas::create(2, 2);
        sprite.fill(Color::TRANSPARENT);
        sprite.fill_rect(0, 0, 1, 1, Color::RED);

        let mut screen = Canvas::create(4, 4);
        screen.fill(Color::WHITE);
        sprite.blit(&mut screen, 3, 3, Some(Color::TRANSPARENT));

        assert_eq!(screen.pixel(3, 3), Some(Color::RED));
        assert_eq!(screen.pixel(2, 2), Some(Color::WHITE));
        assert!(screen.pixels().iter().all(|&c| c != Color::TRANSPARENT));
    }

    #[test]
    fn opaque_blit_copies_everything_in_range() {
        let mut sprite = Canvas::create(3, 3);
        sprite.fill(Color::RED);
        let mut screen = Canvas::create(4, 4);
        sprite.blit(&mut screen, -1, -1, None);
        let red = screen.pixels().iter().filter(|&&c| c == Color::RED).count();
        assert_eq!(red, 4);
    }

    #[test]
    fn lines_by_direction() {
        let mut canvas = Canvas::create(5, 5);
        canvas.draw_hline(0, 0, 5, Color::RED);
        canvas.draw_vline(4, 0, 5, Color::WHITE);
        canvas.draw_line(0, 4, 3, 1, Color::RED);
        assert_eq!(canvas.pixel(2, 0), Some(Color::RED));
        assert_eq!(canvas.pixel(4, 3), Some(Color::WHITE));
        assert_eq!(canvas.pixel(1, 3), Some(Color::RED));
    }

    #[test]
    fn snapshot_reloads_with_the_same_pixels() {
        let mut canvas = Canvas::create(3, 2);
        canvas.fill(Color::WHITE);
        canvas.fill_rect(1, 1, 1, 1, Color::RED);
        let path =
            std::env::temp_dir().join(format!("boing-snapshot-{}.png", std::process::id()));
        canvas.save_snapshot(&path).unwrap();
        let image = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).ok();

        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(image.get_pixel(1, 1), &Rgb([255, 0, 0]));
    }

    #[test]
    fn snapshot_rejects_unknown_extensions() {
        let canvas = Canvas::create(2, 2);
        let path = std::env::temp_dir().join("boing-snapshot.not-an-image");
        let err = canvas.save_snapshot(&path).unwrap_err();
        assert!(err.to_string().contains("failed to write snapshot"));
    }
}
