// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering sink: numeric series in, PNG bytes out.
//!
//! Charts are deliberately text-free; offer name, source filter, and
//! period travel in the chat message caption instead, so rendering never
//! depends on system fonts.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use traffika_core::TraffikaError;

use crate::conversion::ConversionSummary;
use crate::forecast::ForecastSeries;
use crate::trend::TrendSeries;

const WIDTH: u32 = 900;
const HEIGHT: u32 = 480;

/// Conversion bars render in the green the dashboards use elsewhere.
const BAR_GREEN: RGBColor = RGBColor(0x4c, 0xaf, 0x50);
const LINE_BLUE: RGBColor = RGBColor(0x21, 0x96, 0xf3);

/// Conversion-rate ceiling: the y axis is fixed at 0..5 %.
const CONVERSION_Y_MAX: f64 = 5.0;

fn chart_err(e: impl std::fmt::Display) -> TraffikaError {
    TraffikaError::Internal(format!("chart rendering failed: {e}"))
}

fn encode_png(rgb: &[u8]) -> Result<Vec<u8>, TraffikaError> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(rgb, WIDTH, HEIGHT, ExtendedColorType::Rgb8)
        .map_err(chart_err)?;
    Ok(png)
}

/// Single-bar conversion chart with a fixed 0..5 % axis.
pub fn conversion_chart(summary: &ConversionSummary) -> Result<Vec<u8>, TraffikaError> {
    let mut rgb = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .build_cartesian_2d(0f64..1f64, 0f64..CONVERSION_Y_MAX)
            .map_err(chart_err)?;

        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(0.35, 0.0), (0.65, summary.rate.min(CONVERSION_Y_MAX))],
                BAR_GREEN.filled(),
            )))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    encode_png(&rgb)
}

/// Two-series forecast chart: solid history, dashed projection.
pub fn forecast_chart(series: &ForecastSeries) -> Result<Vec<u8>, TraffikaError> {
    let total = series.history.len() + series.projection.len();
    let y_max = series
        .history
        .iter()
        .chain(series.projection.iter())
        .map(|(_, r)| *r)
        .fold(0.0f64, f64::max)
        .max(1.0)
        * 1.15;

    let mut rgb = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .build_cartesian_2d(0f64..(total.max(2) - 1) as f64, 0f64..y_max)
            .map_err(chart_err)?;

        let history_points: Vec<(f64, f64)> = series
            .history
            .iter()
            .enumerate()
            .map(|(i, (_, r))| (i as f64, *r))
            .collect();
        chart
            .draw_series(LineSeries::new(
                history_points.iter().copied(),
                LINE_BLUE.stroke_width(2),
            ))
            .map_err(chart_err)?;
        chart
            .draw_series(
                history_points
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), 3, LINE_BLUE.filled())),
            )
            .map_err(chart_err)?;

        let offset = series.history.len();
        let projection_points: Vec<(f64, f64)> = series
            .projection
            .iter()
            .enumerate()
            .map(|(i, (_, r))| ((offset + i) as f64, *r))
            .collect();
        chart
            .draw_series(DashedLineSeries::new(
                projection_points.iter().copied(),
                6,
                4,
                RED.stroke_width(2),
            ))
            .map_err(chart_err)?;
        chart
            .draw_series(
                projection_points
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), 3, RED.filled())),
            )
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    encode_png(&rgb)
}

/// Single-line install trend chart.
pub fn trend_chart(series: &TrendSeries) -> Result<Vec<u8>, TraffikaError> {
    let y_max = series
        .points
        .iter()
        .map(|(_, c)| *c)
        .max()
        .unwrap_or(1)
        .max(1) as f64
        * 1.15;
    let x_max = (series.points.len().max(2) - 1) as f64;

    let mut rgb = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .build_cartesian_2d(0f64..x_max, 0f64..y_max)
            .map_err(chart_err)?;

        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .enumerate()
            .map(|(i, (_, c))| (i as f64, *c as f64))
            .collect();

        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                LINE_BLUE.stroke_width(2),
            ))
            .map_err(chart_err)?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), 3, LINE_BLUE.filled())),
            )
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    encode_png(&rgb)
}
