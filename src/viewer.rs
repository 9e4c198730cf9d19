//! Interactive viewer.
//!
//! Left half: the ring image. Right half: the brightness curve. Keys `1`-`6`
//! select a control, Up/Down step it (hold Shift for x10), the mouse wheel
//! zooms the radial axis, `M` switches model and `S` writes the current frame
//! to the output directory.

use log::{error, info};
use macroquad::prelude::*;

use crate::controls::ControlPanel;
use crate::helpers::{draw_controls, draw_curve, draw_ring, ring_texture, CURVE_COLOR};
use crate::output;
use crate::scene::Scene;
use crate::settings::Settings;

const MARGIN: f32 = 60.0;
const PANEL_HEIGHT: f32 = 160.0;
const ZOOM_FACTOR: f64 = 0.9;

const SELECT_KEYS: [KeyCode; 6] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
];

/// Window configuration for [`run`].
pub fn window_conf(settings: &Settings) -> Conf {
    Conf {
        window_title: "fringes".to_string(),
        window_width: (2 * settings.width) as i32 + 2 * MARGIN as i32,
        window_height: settings.height as i32 + PANEL_HEIGHT as i32,
        window_resizable: true,
        ..Default::default()
    }
}

/// Side length in pixels of the ring image for the current window size.
fn ring_side() -> usize {
    let side = (screen_width() / 2.0 - MARGIN).min(screen_height() - PANEL_HEIGHT);
    side.max(1.0) as usize
}

/// Runs the viewer until the window is closed.
pub async fn run(mut settings: Settings) {
    let mut panel = ControlPanel::new(&settings.controls, &settings.params);
    let side = ring_side();
    let mut scene = Scene::new(
        settings.model,
        panel.to_params(),
        settings.r_max,
        settings.curve_step,
        side,
        side,
    );
    let mut texture = ring_texture(scene.ring());
    let mut size = (side, side);

    loop {
        let mut ring_changed = false;

        let side = ring_side();
        if (side, side) != size {
            size = (side, side);
            scene.resize(side, side);
            ring_changed = true;
        }

        for (index, key) in SELECT_KEYS.iter().enumerate() {
            if is_key_pressed(*key) {
                panel.select(index);
            }
        }

        let step = if is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift) {
            10
        } else {
            1
        };
        let mut delta = 0;
        if is_key_pressed(KeyCode::Up) {
            delta += step;
        }
        if is_key_pressed(KeyCode::Down) {
            delta -= step;
        }
        if delta != 0 && panel.step_selected(delta) {
            scene.set_params(panel.to_params());
            ring_changed = true;
        }

        let (_, wheel) = mouse_wheel();
        if wheel != 0.0 {
            let factor = if wheel > 0.0 {
                ZOOM_FACTOR
            } else {
                1.0 / ZOOM_FACTOR
            };
            scene.set_x_range(scene.r_max() * factor);
            ring_changed = true;
        }

        if is_key_pressed(KeyCode::M) {
            scene.set_model(scene.model().toggled());
            info!("Switched to {} model", scene.model());
            ring_changed = true;
        }

        if is_key_pressed(KeyCode::S) {
            settings.params = *scene.params();
            settings.model = scene.model();
            settings.r_max = scene.r_max();
            settings.width = scene.ring().width();
            settings.height = scene.ring().height();
            match output::writeup(&settings, true) {
                Ok(dir) => info!("Saved frame to {:?}", dir),
                Err(e) => error!("Failed to save frame: {:#}", e),
            }
        }

        if ring_changed {
            texture = ring_texture(scene.ring());
        }

        clear_background(BLACK);

        let side = size.0 as f32;
        draw_ring(&texture, Rect::new(0.0, 0.0, side, side));

        let plot = Rect::new(
            screen_width() / 2.0 + MARGIN,
            MARGIN,
            screen_width() / 2.0 - 2.0 * MARGIN,
            (side - 2.0 * MARGIN).max(MARGIN),
        );
        draw_curve(scene.curve(), scene.r_max(), plot, CURVE_COLOR, 2.0);

        draw_controls(&panel, 20.0, side + 30.0);
        draw_text(
            &format!(
                "model: {}   r max: {:.2}   [M] model  [S] save  [wheel] zoom",
                scene.model(),
                scene.r_max()
            ),
            screen_width() / 2.0 + MARGIN,
            side + 30.0,
            20.0,
            LIGHTGRAY,
        );

        next_frame().await;
    }
}
