use crate::color::Color;
use crate::math::edge_function;

/// Writes one pixel, ignoring anything outside the buffer
fn put_pixel(pixel_data: &mut [Color], width: usize, height: usize, x: i64, y: i64, color: Color) {
    if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
        pixel_data[y as usize * width + x as usize] = color;
    }
}

/// Fills a horizontal run of pixels starting at `(x, y)`
pub fn fill_span(
    pixel_data: &mut [Color],
    width: usize,
    height: usize,
    x: i64,
    y: i64,
    length: i64,
    color: Color,
) {
    if y < 0 || y as usize >= height || length <= 0 {
        return;
    }
    let start = x.max(0);
    let end = (x + length).min(width as i64);
    if start >= end {
        return;
    }
    let row = y as usize * width;
    pixel_data[row + start as usize..row + end as usize].fill(color);
}

/// Fills a triangle of either winding, sampling at pixel centers
pub fn draw_triangle(
    v0: [f64; 2],
    v1: [f64; 2],
    v2: [f64; 2],
    pixel_data: &mut [Color],
    width: usize,
    height: usize,
    color: Color,
) {
    // Normalize to a single winding so one sign test covers both
    let area = edge_function(&v0, &v1, &v2);
    if area == 0.0 || !area.is_finite() {
        return;
    }
    let (v1, v2) = if area < 0.0 { (v2, v1) } else { (v1, v2) };

    // Compute bounding box of the triangle, clipped to the buffer
    let min_x = v0[0].min(v1[0]).min(v2[0]).floor().max(0.0) as i64;
    let max_x = v0[0].max(v1[0]).max(v2[0]).ceil().min(width as f64 - 1.0) as i64;
    let min_y = v0[1].min(v1[1]).min(v2[1]).floor().max(0.0) as i64;
    let max_y = v0[1].max(v1[1]).max(v2[1]).ceil().min(height as f64 - 1.0) as i64;
    if min_x > max_x || min_y > max_y {
        return;
    }

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = [x as f64 + 0.5, y as f64 + 0.5];

            let w0 = edge_function(&v1, &v2, &p);
            let w1 = edge_function(&v2, &v0, &p);
            let w2 = edge_function(&v0, &v1, &p);

            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                pixel_data[y as usize * width + x as usize] = color;
            }
        }
    }
}

/// Draws a line between two points in the pixel buffer using Bresenham's algorithm
pub fn draw_line(
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
    pixel_data: &mut [Color],
    width: usize,
    height: usize,
    color: Color,
) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    loop {
        put_pixel(pixel_data, width, height, x0, y0, color);

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

/// Fills an axis-aligned ellipse centered on `(cx, cy)`
pub fn draw_ellipse(
    cx: i64,
    cy: i64,
    rx: i64,
    ry: i64,
    pixel_data: &mut [Color],
    width: usize,
    height: usize,
    color: Color,
) {
    if rx < 0 || ry < 0 {
        return;
    }
    if ry == 0 {
        fill_span(pixel_data, width, height, cx - rx, cy, 2 * rx + 1, color);
        return;
    }
    for dy in -ry..=ry {
        let t = dy as f64 / ry as f64;
        let half = (rx as f64 * (1.0 - t * t).max(0.0).sqrt()).round() as i64;
        fill_span(pixel_data, width, height, cx - half, cy + dy, 2 * half + 1, color);
    }
}
