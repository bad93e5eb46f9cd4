//! # Dashboard Rendering
//!
//! This module draws a [`Forecast`] onto a 400×300 1-bit [`Canvas`] and provides
//! an ASCII preview of the result for development on a desktop terminal.
//!
//! ## Drawing order
//! Later steps paint over earlier ones:
//! 1. Corner-to-corner diagonals in dithered mid-gray
//! 2. Header: date, "Updated HH:MM", full-day condition icon
//! 3. Day high (large) and low (bold) numerals
//! 4. Temperature curve
//! 5. Apparent-temperature curve, dithered to a dotted line
//! 6. Labels above the first high and first low points
//! 7. Rainfall bars
//! 8. Time axis labels
//! 9. Condition icons every 6 hours
//! 10. Wind speed circles every 6 hours
//!
//! Every date shown is in the renderer's timezone. Icons that were not loaded
//! are left out; everything else is always drawn.

use crate::assets::Assets;
use crate::canvas::{Canvas, GrayLayer, HEIGHT, WIDTH};
use crate::layout::{Layout, RenderError, AXIS_Y};
use crate::{Forecast, DAY_START_HOUR};
use chrono::{DateTime, Timelike};
use chrono_tz::Tz;
use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::{BinaryColor, Gray8},
    prelude::*,
    primitives::{Circle, Line, Polyline, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use std::sync::Arc;
use tracing::debug;

/// m/s → mph
const MPH_PER_METRE_PER_SECOND: f64 = 2.23694;
/// Wind above this is drawn as a filled circle
const WINDY_MPH: f64 = 10.0;

const CURVE_WIDTH: u32 = 3;
/// Gray level of the dithered elements, about half the pixels end up inked
const MID_GRAY: Gray8 = Gray8::new(127);

/// Alpha thresholds for icon masks
const HEADER_ICON_THRESHOLD: u8 = 127;
const HOURLY_ICON_THRESHOLD: u8 = 90;

// Fixed positions on the 400×300 canvas
const DATE_ANCHOR: Point = Point::new(11, 21);
const UPDATED_ANCHOR: Point = Point::new(WIDTH as i32 - 11, 21);
const HEADER_ICON_ORIGIN: Point = Point::new(10, 36);
const HIGH_ANCHOR: Point = Point::new(62, 75);
const LOW_ANCHOR: Point = Point::new(142, 75);
const POINT_LABEL_LIFT: i32 = 4;
const BAR_HALF_WIDTH: i32 = 3;
const TICK_LABEL_GAP: i32 = 6;
const ICON_TOP: i32 = 236;
const ICON_HALF_WIDTH: i32 = 12;
const WIND_CENTER_Y: i32 = 280;
const WIND_DIAMETER: u32 = 18;

/// Renders forecasts with a fixed set of assets and a fixed timezone.
#[derive(Clone, Debug)]
pub struct DashboardRenderer {
    assets: Arc<Assets>,
    tz: Tz,
}

impl DashboardRenderer {
    pub fn new(assets: Arc<Assets>, tz: Tz) -> Self {
        Self { assets, tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Render `forecast`, stamping `updated_at` into the header.
    ///
    /// The output depends only on the arguments and the loaded assets, so the
    /// same inputs always give the same pixels.
    pub fn render(&self, forecast: &Forecast, updated_at: DateTime<Tz>) -> Result<Canvas, RenderError> {
        let layout = Layout::new(forecast, self.tz)?;
        let mut canvas = Canvas::new(WIDTH, HEIGHT);

        debug!(
            day_start = %layout.day_start(),
            hours = layout.hours().len(),
            high = layout.temp_high(),
            low = layout.temp_low(),
            "Rendering dashboard"
        );

        self.draw_diagonals(&mut canvas);
        self.draw_header(&mut canvas, forecast, updated_at);
        self.draw_extremes(&mut canvas, &layout);
        self.draw_temperature_curves(&mut canvas, &layout);
        self.draw_point_labels(&mut canvas, &layout);
        self.draw_rainfall(&mut canvas, &layout);
        self.draw_time_axis(&mut canvas, &layout);
        self.draw_condition_icons(&mut canvas, &layout);
        self.draw_wind(&mut canvas, &layout);

        Ok(canvas)
    }

    /// Header date, e.g. "Sunday 31 July 2022"
    pub fn date_label(&self, forecast: &Forecast) -> String {
        forecast
            .today
            .start_time
            .with_timezone(&self.tz)
            .format("%A %d %B %Y")
            .to_string()
    }

    fn draw_diagonals(&self, canvas: &mut Canvas) {
        let mut layer = GrayLayer::new(WIDTH, HEIGHT);
        let style = PrimitiveStyle::with_stroke(MID_GRAY, 1);
        let (right, bottom) = (WIDTH as i32 - 1, HEIGHT as i32 - 1);

        Line::new(Point::zero(), Point::new(right, bottom))
            .into_styled(style)
            .draw(&mut layer)
            .ok();
        Line::new(Point::new(0, bottom), Point::new(right, 0))
            .into_styled(style)
            .draw(&mut layer)
            .ok();

        layer.composite_onto(canvas);
    }

    fn draw_header(&self, canvas: &mut Canvas, forecast: &Forecast, updated_at: DateTime<Tz>) {
        let fonts = &self.assets.typography;

        draw_text(
            canvas,
            &self.date_label(forecast),
            DATE_ANCHOR,
            fonts.date.font(),
            Alignment::Left,
            Baseline::Alphabetic,
        );

        let updated = format!("Updated {}", updated_at.with_timezone(&self.tz).format("%H:%M"));
        draw_text(
            canvas,
            &updated,
            UPDATED_ANCHOR,
            fonts.updated.font(),
            Alignment::Right,
            Baseline::Alphabetic,
        );

        if let Some(code) = forecast.today.weather_code_full_day {
            self.draw_icon(canvas, code, true, false, HEADER_ICON_ORIGIN, HEADER_ICON_THRESHOLD);
        }
    }

    fn draw_extremes(&self, canvas: &mut Canvas, layout: &Layout) {
        let fonts = &self.assets.typography;
        draw_text(
            canvas,
            &format_temp(layout.temp_high()),
            HIGH_ANCHOR,
            fonts.temp_high.font(),
            Alignment::Left,
            Baseline::Alphabetic,
        );
        draw_text(
            canvas,
            &format_temp(layout.temp_low()),
            LOW_ANCHOR,
            fonts.temp_low.font(),
            Alignment::Left,
            Baseline::Alphabetic,
        );
    }

    fn draw_temperature_curves(&self, canvas: &mut Canvas, layout: &Layout) {
        let actual: Vec<Point> = layout
            .hours()
            .iter()
            .map(|h| to_point(layout.x_for_time(&h.start_time), layout.y_for_temp(h.temperature)))
            .collect();
        Polyline::new(&actual)
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, CURVE_WIDTH))
            .draw(canvas)
            .ok();

        let apparent: Vec<Point> = layout
            .hours()
            .iter()
            .map(|h| {
                to_point(
                    layout.x_for_time(&h.start_time),
                    layout.y_for_temp(h.temperature_apparent),
                )
            })
            .collect();
        let mut layer = GrayLayer::new(WIDTH, HEIGHT);
        Polyline::new(&apparent)
            .into_styled(PrimitiveStyle::with_stroke(MID_GRAY, CURVE_WIDTH))
            .draw(&mut layer)
            .ok();
        layer.composite_onto(canvas);
    }

    fn draw_point_labels(&self, canvas: &mut Canvas, layout: &Layout) {
        let font = self.assets.typography.curve_label.font();
        for index in [layout.high_index(), layout.low_index()] {
            let hour = layout.hours()[index];
            let anchor = to_point(
                layout.x_for_time(&hour.start_time),
                layout.y_for_temp(hour.temperature),
            ) - Point::new(0, POINT_LABEL_LIFT);
            draw_text(
                canvas,
                &format_temp(hour.temperature),
                anchor,
                font,
                Alignment::Center,
                Baseline::Alphabetic,
            );
        }
    }

    fn draw_rainfall(&self, canvas: &mut Canvas, layout: &Layout) {
        let fill = PrimitiveStyle::with_fill(BinaryColor::On);
        let axis = AXIS_Y.round() as i32;
        for hour in layout.hours() {
            let top = to_point(
                layout.x_for_time(&hour.start_time),
                layout.y_for_rainfall(hour.precipitation_intensity),
            );
            Rectangle::with_corners(
                Point::new(top.x - BAR_HALF_WIDTH, top.y),
                Point::new(top.x + BAR_HALF_WIDTH, axis),
            )
            .into_styled(fill)
            .draw(canvas)
            .ok();
        }
    }

    fn draw_time_axis(&self, canvas: &mut Canvas, layout: &Layout) {
        let font = self.assets.typography.axis_label.font();
        let top = AXIS_Y.round() as i32 + TICK_LABEL_GAP;
        for tick in layout.time_axis_ticks() {
            draw_text(
                canvas,
                &tick.label,
                Point::new(tick.x.round() as i32, top),
                font,
                Alignment::Center,
                Baseline::Top,
            );
        }
    }

    fn draw_condition_icons(&self, canvas: &mut Canvas, layout: &Layout) {
        for hour in layout.six_hourly() {
            let x = layout.x_for_time(&hour.start_time).round() as i32;
            let night = hour.start_time.with_timezone(&self.tz).hour() < DAY_START_HOUR;
            self.draw_icon(
                canvas,
                hour.weather_code,
                false,
                night,
                Point::new(x - ICON_HALF_WIDTH, ICON_TOP),
                HOURLY_ICON_THRESHOLD,
            );
        }
    }

    fn draw_wind(&self, canvas: &mut Canvas, layout: &Layout) {
        let font = self.assets.typography.wind.font();
        for hour in layout.six_hourly() {
            let mph = wind_mph(hour.wind_speed);
            let center = Point::new(layout.x_for_time(&hour.start_time).round() as i32, WIND_CENTER_Y);
            let radius = WIND_DIAMETER as i32 / 2;
            let circle = Circle::new(center - Point::new(radius, radius), WIND_DIAMETER);

            let text_color = if mph > WINDY_MPH {
                circle
                    .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                    .draw(canvas)
                    .ok();
                BinaryColor::Off
            } else {
                circle
                    .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
                    .draw(canvas)
                    .ok();
                BinaryColor::On
            };

            let style = MonoTextStyle::new(font, text_color);
            let centered = TextStyleBuilder::new()
                .alignment(Alignment::Center)
                .baseline(Baseline::Middle)
                .build();
            Text::with_text_style(&format!("{:.0}", mph), center, style, centered)
                .draw(canvas)
                .ok();
        }
    }

    fn draw_icon(
        &self,
        canvas: &mut Canvas,
        code: i32,
        full_day: bool,
        night: bool,
        origin: Point,
        threshold: u8,
    ) {
        let icons = &self.assets.icons;
        let resolution = if full_day { 2 } else { 1 };
        let Some(icon) = icons.icon_for(code, full_day, night, resolution) else {
            return;
        };
        match icons.get(&icon) {
            Ok(mask) => {
                mask.draw_thresholded(canvas, origin, threshold).ok();
            }
            Err(e) => debug!(error = %e, "Skipping icon"),
        }
    }
}

/// Wind speed in mph
pub fn wind_mph(metres_per_second: f64) -> f64 {
    metres_per_second * MPH_PER_METRE_PER_SECOND
}

/// Whole degrees with a degree sign, e.g. "23°"
pub fn format_temp(celsius: f64) -> String {
    format!("{:.0}°", celsius)
}

fn to_point(x: f64, y: f64) -> Point {
    Point::new(x.round() as i32, y.round() as i32)
}

fn draw_text(
    canvas: &mut Canvas,
    text: &str,
    anchor: Point,
    font: &MonoFont<'_>,
    alignment: Alignment,
    baseline: Baseline,
) {
    let style = MonoTextStyle::new(font, BinaryColor::On);
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(baseline)
        .build();
    Text::with_text_style(text, anchor, style, text_style)
        .draw(canvas)
        .ok();
}

/// Terminal preview, one character per 4×6 block of pixels.
pub fn ascii_preview(canvas: &Canvas) -> String {
    const BLOCK_W: u32 = 4;
    const BLOCK_H: u32 = 6;
    const SHADES: [char; 4] = [' ', '.', ':', '#'];

    let cells = (BLOCK_W * BLOCK_H) as usize;
    let mut out = String::new();
    for y in (0..canvas.height()).step_by(BLOCK_H as usize) {
        for x in (0..canvas.width()).step_by(BLOCK_W as usize) {
            let ink = canvas.black_pixels_in(x, y, x + BLOCK_W, y + BLOCK_H);
            let shade = if ink == 0 {
                0
            } else {
                (1 + ink * (SHADES.len() - 1) / (cells + 1)).min(SHADES.len() - 1)
            };
            out.push(SHADES[shade]);
        }
        out.push('\n');
    }
    out
}

/// Print the terminal preview to stdout.
pub fn draw_ascii(canvas: &Canvas) {
    print!("{}", ascii_preview(canvas));
}
