//! Drawing helpers for the interactive viewer.
//!
//! Converts the ring image to a texture and maps brightness samples onto a
//! plot rectangle. The plot's x-axis spans `[0, r_max]` and its y-axis is
//! locked to [`Y_RANGE`].

use macroquad::prelude::*;

use crate::controls::ControlPanel;
use crate::curve::RadiusSample;
use crate::ring::RingImage;
use crate::scene::Y_RANGE;

pub const CURVE_COLOR: Color = Color::new(0.0, 120.0 / 255.0, 215.0 / 255.0, 1.0);
pub const AXIS_COLOR: Color = LIGHTGRAY;
pub const SELECTED_COLOR: Color = YELLOW;
const FONT_SIZE: f32 = 20.0;
const TICKS: usize = 5;


/// Maps a `(radius, brightness)` point onto `rect`.
pub fn to_screen(radius: f64, brightness: f64, r_max: f64, rect: Rect) -> Vec2 {
    let (y_min, y_max) = Y_RANGE;
    let u = (radius / r_max) as f32;
    let v = ((brightness.clamp(y_min, y_max) - y_min) / (y_max - y_min)) as f32;
    vec2(rect.x + u * rect.w, rect.y + (1.0 - v) * rect.h)
}

/// Uploads the ring image as a texture.
pub fn ring_texture(ring: &RingImage) -> Texture2D {
    let texture = Texture2D::from_rgba8(ring.width() as u16, ring.height() as u16, &ring.to_rgba());
    texture.set_filter(FilterMode::Nearest);
    texture
}

/// Draws the ring texture stretched over `rect`.
pub fn draw_ring(texture: &Texture2D, rect: Rect) {
    draw_texture_ex(
        texture,
        rect.x,
        rect.y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(rect.w, rect.h)),
            ..Default::default()
        },
    );
}

/// Draws axes, tick labels and the brightness curve inside `rect`.
pub fn draw_curve(samples: &[RadiusSample], r_max: f64, rect: Rect, color: Color, thickness: f32) {
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, AXIS_COLOR);

    for k in 0..=TICKS {
        let fraction = k as f64 / TICKS as f64;
        let x = rect.x + fraction as f32 * rect.w;
        let y = rect.y + (1.0 - fraction as f32) * rect.h;
        draw_line(x, rect.y + rect.h, x, rect.y + rect.h + 5.0, 1.0, AXIS_COLOR);
        draw_line(rect.x - 5.0, y, rect.x, y, 1.0, AXIS_COLOR);
        draw_text(
            &format!("{:.2}", fraction * r_max),
            x - 12.0,
            rect.y + rect.h + 20.0,
            FONT_SIZE * 0.8,
            AXIS_COLOR,
        );
        draw_text(
            &format!("{:.1}", fraction),
            rect.x - 35.0,
            y + 5.0,
            FONT_SIZE * 0.8,
            AXIS_COLOR,
        );
    }
    draw_text("r", rect.x + rect.w - 10.0, rect.y + rect.h + 38.0, FONT_SIZE, AXIS_COLOR);
    draw_text("brightness", rect.x, rect.y - 8.0, FONT_SIZE, AXIS_COLOR);

    for pair in samples.windows(2) {
        let a = to_screen(pair[0].radius, pair[0].brightness, r_max, rect);
        let b = to_screen(pair[1].radius, pair[1].brightness, r_max, rect);
        draw_line(a.x, a.y, b.x, b.y, thickness, color);
    }
}

/// Draws one label per control, highlighting the selected one.
pub fn draw_controls(panel: &ControlPanel, x: f32, y: f32) {
    for (index, control) in panel.controls().iter().enumerate() {
        let color = if index == panel.selected_index() {
            SELECTED_COLOR
        } else {
            WHITE
        };
        draw_text(
            &format!("[{}] {}", index + 1, control),
            x,
            y + index as f32 * (FONT_SIZE + 4.0),
            FONT_SIZE,
            color,
        );
    }
}
