//! Scene rasterization
//!
//! `draw_frame` reads the game state and nothing else: the same state always
//! produces the same pixels. The dash phase of the centerline comes from
//! world distance, so scrolling is the only thing that animates the road.

use glam::{Mat2, Vec2};

use super::framebuffer::{Framebuffer, Rgba, rgb, text_height, text_width};
use crate::consts::{LOGICAL_HEIGHT, LOGICAL_WIDTH, ROAD_BORDER_WIDTH, VEHICLE_SCREEN_Y};
use crate::sim::{GameState, PauseState, RoadSample, dash_visible, tilt_angle};
use crate::tuning::Tuning;

const BACKGROUND: Rgba = rgb(0x0b0d1a);
const DITHER: Rgba = rgb(0x0f1230);
const ROAD: Rgba = rgb(0x2a2e52);
const BORDER: Rgba = rgb(0xf7d54a);
const CENTER_LINE: Rgba = rgb(0xd8e6ff);
const HUD_PANEL: Rgba = rgb(0x001a14);
const HUD_TEXT: Rgba = rgb(0x00ffd1);
const OVERLAY: Rgba = rgb(0x000000);

const DITHER_STEP: u32 = 16;

const HUD_X: f32 = 6.0;
const HUD_Y: f32 = 6.0;
const HUD_MIN_WIDTH: u32 = 120;
const HUD_PAD: u32 = 4;
const HUD_SCALE: u32 = 2;
const HUD_LINE_GAP: u32 = 3;
const HUD_ALPHA: u8 = 217;
const OVERLAY_ALPHA: u8 = 153;

/// One axis-aligned piece of the car, in sprite-local pixels
struct SpritePart {
    min: Vec2,
    size: Vec2,
    color: Rgba,
}

impl SpritePart {
    const fn new(x: f32, y: f32, w: f32, h: f32, color: Rgba) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
            color,
        }
    }

    fn contains(&self, p: Vec2) -> bool {
        let max = self.min + self.size;
        p.x >= self.min.x && p.x < max.x && p.y >= self.min.y && p.y < max.y
    }
}

/// Car parts in paint order; later parts cover earlier ones
const CAR: [SpritePart; 6] = [
    SpritePart::new(-6.0, -10.0, 12.0, 20.0, rgb(0xff2f6d)),
    SpritePart::new(-4.0, -12.0, 8.0, 2.0, rgb(0xffd1df)),
    SpritePart::new(-7.0, -8.0, 2.0, 6.0, rgb(0x111111)),
    SpritePart::new(5.0, -8.0, 2.0, 6.0, rgb(0x111111)),
    SpritePart::new(-7.0, 4.0, 2.0, 6.0, rgb(0x111111)),
    SpritePart::new(5.0, 4.0, 2.0, 6.0, rgb(0x111111)),
];

/// Half-extent of a screen box that contains the car at any tilt
const CAR_REACH: f32 = 15.0;

/// Draw one complete frame
pub fn draw_frame(fb: &mut Framebuffer, state: &GameState, pause: PauseState, tuning: &Tuning) {
    draw_background(fb);
    draw_road(fb, state.world.distance_travelled, tuning);
    draw_car(fb, state, tuning);
    draw_hud(fb, state, tuning);
    if pause.is_paused() {
        draw_pause_overlay(fb);
    }
}

fn draw_background(fb: &mut Framebuffer) {
    fb.clear(BACKGROUND);
    for y in (0..fb.height()).step_by(DITHER_STEP as usize) {
        let offset = if y % (DITHER_STEP * 2) == 0 { 0 } else { DITHER_STEP / 2 };
        for x in (offset..fb.width()).step_by(DITHER_STEP as usize) {
            fb.set_pixel(x as i32, y as i32, DITHER);
        }
    }
}

/// World coordinate of the road shown on screen row `row`
pub fn row_world_y(distance_travelled: f64, row: u32) -> f64 {
    distance_travelled + f64::from(LOGICAL_HEIGHT - row)
}

fn draw_road(fb: &mut Framebuffer, distance_travelled: f64, tuning: &Tuning) {
    let road = &tuning.road;
    for row in 0..fb.height() {
        let world_y = row_world_y(distance_travelled, row);
        let sample = RoadSample::at(world_y, road);
        let y = row as f32;

        fb.fill_rect(sample.left_edge, y, sample.width(), 1.0, ROAD);
        fb.fill_rect(sample.left_edge - ROAD_BORDER_WIDTH, y, ROAD_BORDER_WIDTH, 1.0, BORDER);
        fb.fill_rect(sample.right_edge, y, ROAD_BORDER_WIDTH, 1.0, BORDER);
        if dash_visible(world_y, road) {
            fb.fill_rect(sample.center - 0.5, y, 1.0, 1.0, CENTER_LINE);
        }
    }
}

fn draw_car(fb: &mut Framebuffer, state: &GameState, tuning: &Tuning) {
    let origin = Vec2::new(state.vehicle.lateral, VEHICLE_SCREEN_Y);
    if !origin.is_finite() {
        return;
    }
    // screen -> sprite space
    let to_local = Mat2::from_angle(-tilt_angle(&state.vehicle, &tuning.vehicle));

    let x0 = (origin.x - CAR_REACH).floor().max(0.0) as i32;
    let x1 = (origin.x + CAR_REACH).ceil().min(fb.width() as f32) as i32;
    let y0 = (origin.y - CAR_REACH).floor().max(0.0) as i32;
    let y1 = (origin.y + CAR_REACH).ceil().min(fb.height() as f32) as i32;

    for y in y0..y1 {
        for x in x0..x1 {
            let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let local = to_local * (center - origin);
            if let Some(part) = CAR.iter().rev().find(|part| part.contains(local)) {
                fb.set_pixel(x, y, part.color);
            }
        }
    }
}

/// HUD lines for the current state
pub fn hud_lines(state: &GameState, tuning: &Tuning) -> [String; 3] {
    let kmh = state.vehicle.speed.max(0.0) * tuning.distance.kmh_per_speed;
    [
        format!("SPD {:.0} KM/H", kmh),
        format!("DIST {:.0} M", state.world.session_meters),
        format!("BEST {:.0} M", state.world.best_meters),
    ]
}

fn draw_hud(fb: &mut Framebuffer, state: &GameState, tuning: &Tuning) {
    let lines = hud_lines(state, tuning);
    let line_h = text_height(HUD_SCALE) + HUD_LINE_GAP;
    let widest = lines.iter().map(|l| text_width(l, HUD_SCALE)).max().unwrap_or(0);
    let panel_w = (widest + HUD_PAD * 2).max(HUD_MIN_WIDTH);
    let panel_h = line_h * lines.len() as u32 - HUD_LINE_GAP + HUD_PAD * 2;

    fb.blend_rect(HUD_X, HUD_Y, panel_w as f32, panel_h as f32, HUD_PANEL, HUD_ALPHA);
    let text_x = HUD_X as i32 + HUD_PAD as i32;
    let mut text_y = HUD_Y as i32 + HUD_PAD as i32;
    for line in &lines {
        fb.draw_text(text_x, text_y, line, HUD_TEXT, HUD_SCALE);
        text_y += line_h as i32;
    }
}

fn draw_pause_overlay(fb: &mut Framebuffer) {
    fb.blend_rect(0.0, 0.0, LOGICAL_WIDTH as f32, LOGICAL_HEIGHT as f32, OVERLAY, OVERLAY_ALPHA);

    let title = "PAUSED";
    let hint = "SPACE / ESC";
    let mid_y = (LOGICAL_HEIGHT / 2) as i32;
    let title_x = (LOGICAL_WIDTH.saturating_sub(text_width(title, 3)) / 2) as i32;
    fb.draw_text(title_x, mid_y - text_height(3) as i32, title, HUD_TEXT, 3);
    let hint_x = (LOGICAL_WIDTH.saturating_sub(text_width(hint, 1)) / 2) as i32;
    fb.draw_text(hint_x, mid_y + 6, hint, HUD_TEXT, 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::centerline;

    fn frame(state: &GameState, pause: PauseState) -> Framebuffer {
        let mut fb = Framebuffer::new(LOGICAL_WIDTH, LOGICAL_HEIGHT);
        draw_frame(&mut fb, state, pause, &Tuning::default());
        fb
    }

    #[test]
    fn test_same_state_same_pixels() {
        let mut state = GameState::new(12.0);
        state.world.distance_travelled = 987.25;
        state.vehicle.heading_bias = 3.0;
        assert_eq!(frame(&state, PauseState::Running), frame(&state, PauseState::Running));
    }

    #[test]
    fn test_road_follows_centerline() {
        let state = GameState::new(0.0);
        let fb = frame(&state, PauseState::Running);
        let tuning = Tuning::default();
        // a row clear of the HUD and the car
        let row = 120;
        let center = centerline(row_world_y(0.0, row), &tuning.road);
        let road_x = (center - 20.0).round() as u32;
        assert_eq!(fb.pixel(road_x, row), Some(ROAD));
        let border_x = (center - tuning.road.width / 2.0 - 1.0).floor() as u32;
        assert_eq!(fb.pixel(border_x, row), Some(BORDER));
    }

    #[test]
    fn test_vehicle_row_maps_to_vehicle_world_y() {
        let mut state = GameState::new(0.0);
        state.world.distance_travelled = 500.0;
        let row = VEHICLE_SCREEN_Y as u32;
        assert_eq!(row_world_y(500.0, row), state.world.vehicle_world_y());
    }

    #[test]
    fn test_car_drawn_at_lateral_position() {
        let mut state = GameState::new(0.0);
        state.vehicle.lateral = 150.0;
        let fb = frame(&state, PauseState::Running);
        assert_eq!(fb.pixel(150, VEHICLE_SCREEN_Y as u32), Some(rgb(0xff2f6d)));
        // nose sits above the body
        assert_eq!(fb.pixel(150, VEHICLE_SCREEN_Y as u32 - 11), Some(rgb(0xffd1df)));
    }

    #[test]
    fn test_hud_reports_kmh_and_clamps_reverse() {
        let tuning = Tuning::default();
        let mut state = GameState::new(42.4);
        state.vehicle.speed = 100.0;
        state.world.session_meters = 17.6;
        assert_eq!(hud_lines(&state, &tuning), ["SPD 60 KM/H", "DIST 18 M", "BEST 42 M"]);

        state.vehicle.speed = -20.0;
        assert_eq!(hud_lines(&state, &tuning)[0], "SPD 0 KM/H");
    }

    #[test]
    fn test_pause_overlay_dims_the_scene() {
        let state = GameState::new(0.0);
        let running = frame(&state, PauseState::Running);
        let paused = frame(&state, PauseState::Paused);
        assert_ne!(running, paused);

        // bottom-right corner: background, untouched by HUD or pause text
        let (x, y) = (LOGICAL_WIDTH - 1, LOGICAL_HEIGHT - 1);
        let lit = running.pixel(x, y).unwrap();
        let dim = paused.pixel(x, y).unwrap();
        assert!(dim[0] <= lit[0] && dim[1] <= lit[1] && dim[2] < lit[2]);
    }
}
