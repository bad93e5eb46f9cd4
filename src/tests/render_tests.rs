//! Full renders of the fixture forecast.

use crate::assets::Assets;
use crate::bmp;
use crate::canvas::{Canvas, HEIGHT, WIDTH};
use crate::fixture;
use crate::renderer::DashboardRenderer;
use chrono::{DateTime, TimeZone};
use chrono_tz::{Europe::London, Tz};
use image::{Rgba, RgbaImage};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn updated_at() -> DateTime<Tz> {
    London.with_ymd_and_hms(2022, 7, 31, 7, 15, 0).unwrap()
}

/// Solid 4×4 icon with uniform alpha
fn write_icon(dir: &Path, name: &str, alpha: u8) {
    RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, alpha]))
        .save(dir.join(format!("{}.png", name)))
        .unwrap();
}

fn renderer_with_icons(names: &[&str]) -> (TempDir, DashboardRenderer) {
    renderer_with_translucent_icons(names, 255)
}

fn renderer_with_translucent_icons(names: &[&str], alpha: u8) -> (TempDir, DashboardRenderer) {
    let dir = TempDir::new().unwrap();
    for name in names {
        write_icon(dir.path(), name, alpha);
    }
    let assets = Assets::load(dir.path());
    (dir, DashboardRenderer::new(Arc::new(assets), London))
}

fn render_fixture(renderer: &DashboardRenderer) -> Canvas {
    renderer.render(&fixture::forecast(), updated_at()).unwrap()
}

/// Test that the fixture renders at 400×300 with the header text and extremes in place.
#[test]
fn fixture_renders_full_size_non_blank() {
    let (_dir, renderer) = renderer_with_icons(&[]);
    let canvas = render_fixture(&renderer);

    assert_eq!((canvas.width(), canvas.height()), (WIDTH, HEIGHT));
    assert!(canvas.black_pixel_count() > 1_000);
    assert_eq!(renderer.date_label(&fixture::forecast()), "Sunday 31 July 2022");

    // Date text in the header strip
    assert!(canvas.black_pixels_in(11, 8, 200, 24) > 0);
    // "Updated HH:MM" ends at x = 389
    assert!(canvas.black_pixels_in(300, 8, 390, 24) > 0);
    // High and low numerals
    assert!(canvas.black_pixels_in(62, 55, 100, 76) > 0);
    assert!(canvas.black_pixels_in(142, 60, 180, 76) > 0);
}

/// Test that the temperature curve and rainfall bars land on their computed coordinates.
///
/// Dry hours still get a one-pixel bar sitting on the axis.
#[test]
fn fixture_curve_and_rain_are_drawn() {
    let (_dir, renderer) = renderer_with_icons(&[]);
    let canvas = render_fixture(&renderer);

    // 18.29 °C at 06:00 local: x = 20, y ≈ 111
    assert!(canvas.black_pixels_in(19, 110, 22, 113) > 0);
    // 0.1641 mm/hr at 12:00 local: bar from y = 188 to the axis
    assert_eq!(canvas.black_pixels_in(107, 188, 114, 191), 21);
    // Dry hours still leave a one-pixel stub on the axis
    assert_eq!(canvas.black_pixels_in(17, 190, 24, 191), 7);
}

/// Test that every six-hourly tick has a label under the axis.
#[test]
fn time_axis_labels_sit_below_axis() {
    let (_dir, renderer) = renderer_with_icons(&[]);
    let canvas = render_fixture(&renderer);

    for x in [20u32, 110, 200, 290, 380] {
        assert!(
            canvas.black_pixels_in(x.saturating_sub(16), 196, x + 16, 210) > 0,
            "no label under tick at x = {}",
            x
        );
    }
}

/// Test that loaded icons are drawn in the header and in the hourly strip.
#[test]
fn icons_are_composited_when_loaded() {
    let (_dir, renderer) = renderer_with_icons(&["cloudy", "cloudy@2x"]);
    let canvas = render_fixture(&renderer);

    // Full-day icon at (10, 36)
    assert_eq!(canvas.black_pixels_in(10, 36, 14, 40), 16);
    // First hourly icon at (20 - 12, 236)
    assert_eq!(canvas.black_pixels_in(8, 236, 12, 240), 16);
    // 18:00 local, x = 200
    assert_eq!(canvas.black_pixels_in(188, 236, 192, 240), 16);
}

/// Test that missing icon files leave their slots blank instead of failing the render.
#[test]
fn missing_icons_leave_gaps() {
    let (_dir, renderer) = renderer_with_icons(&[]);
    let canvas = render_fixture(&renderer);

    assert_eq!(canvas.black_pixels_in(10, 36, 14, 40), 0);
    assert_eq!(canvas.black_pixels_in(8, 236, 12, 240), 0);
}

/// Test that slots before 06:00 local pick the night variant.
///
/// The 06:00 slots at both ends of the day count as daytime.
#[test]
fn night_icons_before_six_local() {
    // Only the night variant exists, so only night slots get an icon
    let (_dir, renderer) = renderer_with_icons(&["clear_night"]);
    let mut forecast = fixture::forecast();
    for hour in forecast.hourly.iter_mut() {
        hour.weather_code = 1000;
    }
    let canvas = renderer.render(&forecast, updated_at()).unwrap();

    // Midnight local (x = 290) is night
    assert_eq!(canvas.black_pixels_in(278, 236, 282, 240), 16);
    // 06:00 at either end of the day is not
    assert_eq!(canvas.black_pixels_in(8, 236, 12, 240), 0);
    assert_eq!(canvas.black_pixels_in(368, 236, 372, 240), 0);
}

/// Test that rendering is deterministic down to the encoded bytes.
#[test]
fn same_input_gives_identical_bytes() {
    let (_dir, renderer) = renderer_with_icons(&["cloudy", "cloudy@2x"]);
    let first = bmp::encode(&render_fixture(&renderer));
    let second = bmp::encode(&render_fixture(&renderer));

    assert_eq!(first.len(), 15_662);
    assert_eq!(first, second);
}

/// Test that the "Updated" stamp only affects the header strip.
#[test]
fn updated_time_changes_only_the_header() {
    let (_dir, renderer) = renderer_with_icons(&[]);
    let forecast = fixture::forecast();
    let early = renderer.render(&forecast, updated_at()).unwrap();
    let late = renderer
        .render(&forecast, London.with_ymd_and_hms(2022, 7, 31, 19, 48, 0).unwrap())
        .unwrap();

    assert_ne!(early, late);
    let header_rows = (30 * early.bytes_per_row()) as usize;
    assert_eq!(&early.buffer()[header_rows..], &late.buffer()[header_rows..]);
}

/// Test that the apparent-temperature curve is dithered while the actual curve is solid.
///
/// A flat day at 20 °C with an apparent 12 °C puts the solid line at y = 90 and the
/// dotted one at y = 130. The 4×4 mask at mid-gray inks half of each stroke row.
#[test]
fn apparent_curve_is_half_inked() {
    let (_dir, renderer) = renderer_with_icons(&[]);
    let mut forecast = fixture::forecast();
    for hour in forecast.hourly.iter_mut() {
        hour.temperature = 20.0;
        hour.temperature_apparent = hour.temperature - 8.0;
        hour.precipitation_intensity = 0.0;
    }
    let canvas = renderer.render(&forecast, updated_at()).unwrap();

    // 120 columns of a 3-pixel stroke, clear of labels and diagonals
    let solid = canvas.black_pixels_in(40, 88, 160, 93);
    let dotted = canvas.black_pixels_in(40, 128, 160, 133);
    assert!(solid >= 300, "actual curve has {} pixels", solid);
    assert!((150..=210).contains(&dotted), "apparent curve has {} pixels", dotted);
    // Nothing between the two curves left of the falling diagonal
    assert_eq!(canvas.black_pixels_in(40, 95, 120, 126), 0);
}

/// Test that both corner-to-corner diagonals are drawn as dotted mid-gray lines.
#[test]
fn diagonals_are_dithered() {
    let (_dir, renderer) = renderer_with_icons(&[]);
    let canvas = render_fixture(&renderer);

    // Top-left to bottom-right passes y ≈ 0.75x, one pixel per column here
    let falling = canvas.black_pixels_in(40, 30, 60, 45);
    assert!(falling > 0 && falling < 20, "falling diagonal has {} pixels", falling);
    // Bottom-left to top-right under the "Updated" stamp
    let rising = canvas.black_pixels_in(340, 27, 364, 45);
    assert!(rising > 0 && rising < 24, "rising diagonal has {} pixels", rising);
}

/// Test that the header and hourly icons use different alpha cut-offs.
///
/// Alpha 100 clears the hourly threshold of 90 but not the header one of 127.
#[test]
fn icon_thresholds_differ_by_slot() {
    let (_dir, renderer) = renderer_with_translucent_icons(&["cloudy", "cloudy@2x"], 100);
    let canvas = render_fixture(&renderer);

    assert_eq!(canvas.black_pixels_in(10, 36, 14, 40), 0);
    assert_eq!(canvas.black_pixels_in(8, 236, 12, 240), 16);
    assert_eq!(canvas.black_pixels_in(188, 236, 192, 240), 16);
}

/// Test that the first high and first low points get a temperature label above them.
///
/// The fixture peaks at 23.18 °C at 16:00 local (x = 170, y = 90) and bottoms out
/// at 17.24 °C at the closing 06:00 (x = 380, y ≈ 116).
#[test]
fn extreme_points_are_labelled() {
    let (_dir, renderer) = renderer_with_icons(&[]);
    let canvas = render_fixture(&renderer);

    // Text sits on a baseline 4 pixels above each point
    assert!(canvas.black_pixels_in(160, 74, 181, 87) > 0);
    assert!(canvas.black_pixels_in(370, 100, 391, 113) > 0);
    // Neighbouring hours carry no label
    assert_eq!(canvas.black_pixels_in(120, 74, 141, 84), 0);
}
