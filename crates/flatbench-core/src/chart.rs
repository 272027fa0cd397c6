// Dweve Flatbench - Benchmark aggregation and comparison plots
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Grouped bar chart rendering.
//!
//! One chart per bucket: bars are clustered by tick (numeric type) with one
//! bar per label (library or commit) inside each cluster. Layout numbers
//! live in [`ChartLayout`] so they can be checked without drawing.

use crate::classify::Kind;
use crate::error::{FlatbenchError, Result};
use crate::grouping::GroupedSeries;
use crate::units::{select_unit, TimeUnit};
use plotters::prelude::*;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Extension of written chart files.
pub const CHART_EXTENSION: &str = "svg";

const CHART_SIZE: (u32, u32) = (1024, 640);
const TITLE_FONT_SIZE: u32 = 28;
const AXIS_LABEL_FONT_SIZE: u32 = 18;
const TICK_LABEL_FONT_SIZE: u32 = 16;
const LEGEND_FONT_SIZE: u32 = 14;

// Legend cell geometry in pixels.
const LEGEND_CELL_WIDTH: i32 = 160;
const LEGEND_CELL_HEIGHT: i32 = 22;
const LEGEND_SWATCH: i32 = 14;
const LEGEND_TOP: i32 = 64;
const LEGEND_RIGHT: i32 = 32;

/// Bar colors of a plotting style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotStyle {
    /// Saturated ten-color palette.
    Default,
    /// Soft pastel palette.
    Pastel,
    /// Deep, muted palette.
    Deep,
}

impl PlotStyle {
    /// Name accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            PlotStyle::Default => "default",
            PlotStyle::Pastel => "seaborn-v0_8-pastel",
            PlotStyle::Deep => "seaborn-v0_8-deep",
        }
    }

    /// Every supported style.
    pub fn all() -> &'static [PlotStyle] {
        &[PlotStyle::Default, PlotStyle::Pastel, PlotStyle::Deep]
    }

    fn palette(&self) -> &'static [RGBColor] {
        match self {
            PlotStyle::Default => &[
                RGBColor(31, 119, 180),
                RGBColor(255, 127, 14),
                RGBColor(44, 160, 44),
                RGBColor(214, 39, 40),
                RGBColor(148, 103, 189),
                RGBColor(140, 86, 75),
                RGBColor(227, 119, 194),
                RGBColor(127, 127, 127),
                RGBColor(188, 189, 34),
                RGBColor(23, 190, 207),
            ],
            PlotStyle::Pastel => &[
                RGBColor(161, 201, 244),
                RGBColor(255, 180, 130),
                RGBColor(141, 229, 161),
                RGBColor(255, 159, 155),
                RGBColor(208, 187, 255),
                RGBColor(222, 187, 155),
                RGBColor(250, 176, 228),
                RGBColor(207, 207, 207),
                RGBColor(255, 254, 163),
                RGBColor(185, 242, 240),
            ],
            PlotStyle::Deep => &[
                RGBColor(76, 114, 176),
                RGBColor(221, 132, 82),
                RGBColor(85, 168, 104),
                RGBColor(196, 78, 82),
                RGBColor(129, 114, 179),
                RGBColor(147, 120, 96),
                RGBColor(218, 139, 195),
                RGBColor(140, 140, 140),
                RGBColor(204, 185, 116),
                RGBColor(100, 181, 205),
            ],
        }
    }

    /// Color of the `index`-th label, cycling through the palette.
    pub fn color(&self, index: usize) -> RGBColor {
        let palette = self.palette();
        palette[index % palette.len()]
    }
}

impl FromStr for PlotStyle {
    type Err = FlatbenchError;

    fn from_str(name: &str) -> Result<Self> {
        PlotStyle::all()
            .iter()
            .find(|style| style.name() == name)
            .copied()
            .ok_or_else(|| {
                let known: Vec<&str> = PlotStyle::all().iter().map(PlotStyle::name).collect();
                FlatbenchError::config(format!(
                    "unknown plotting style '{}' (expected one of: {})",
                    name,
                    known.join(", ")
                ))
            })
    }
}

/// Geometry of one grouped bar chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    /// Width of a single bar in tick units.
    pub bar_width: f64,
    /// Multiplier between consecutive bar offsets.
    pub spacing: f64,
    /// Upper limit of the y axis.
    pub y_max: f64,
    /// Number of legend columns.
    pub legend_columns: usize,
}

impl ChartLayout {
    /// Compute the layout for `label_count` bars per cluster and the largest
    /// scaled value on the chart.
    pub fn new(label_count: usize, max_scaled: f64) -> Self {
        let count = label_count.max(1) as f64;
        Self {
            bar_width: f64::min(0.2, 0.8 / count),
            spacing: f64::min(0.05, 0.2 / count) + 1.0,
            y_max: 1.2 * max_scaled.max(1.0),
            legend_columns: (label_count / 4).max(1),
        }
    }

    /// Offset of the `index`-th bar from the first bar of its cluster.
    pub fn offset(&self, index: usize) -> f64 {
        self.bar_width * index as f64 * self.spacing
    }

    /// Center of bar `index` in a cluster of `label_count` bars around `tick`.
    pub fn bar_center(&self, tick: usize, index: usize, label_count: usize) -> f64 {
        let last = self.offset(label_count.saturating_sub(1));
        tick as f64 + self.offset(index) - last / 2.0
    }
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartSpec<'a> {
    /// Series to draw.
    pub series: &'a GroupedSeries,
    /// Chart caption.
    pub title: &'a str,
    /// Bar palette.
    pub style: PlotStyle,
}

/// Deterministic file name for a bucket's chart.
///
/// Re-running over the same data overwrites the previous chart.
pub fn chart_file_name(group: &str, operation: &str, kind: Kind, labels: &[String]) -> String {
    format!(
        "{} - {} {} - {}.{}",
        group,
        operation,
        kind,
        labels.join(","),
        CHART_EXTENSION
    )
}

/// Caption for a bucket's chart, e.g. `To Float - Parse Float`.
pub fn chart_title(group: &str, operation: &str, kind: Kind) -> String {
    format!(
        "{} - {} {}",
        title_case(group),
        title_case(operation),
        title_case(kind.as_str())
    )
}

fn title_case(text: &str) -> String {
    text.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Render a chart to an SVG file.
///
/// The time unit is chosen once for the whole chart from its smallest value.
pub fn render_chart(spec: &ChartSpec<'_>, path: &Path) -> Result<TimeUnit> {
    let series = spec.series;
    let unit = select_unit(series.all_values());
    let max_scaled = series
        .all_values()
        .map(|v| unit.scale(v))
        .fold(0.0, f64::max);
    let labels = series.labels();
    let ticks = series.ticks();
    let layout = ChartLayout::new(labels.len(), max_scaled);
    let err = |e: &dyn std::fmt::Display| FlatbenchError::render(path, e);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| err(&e))?;

    let x_max = (ticks.len() as f64 - 0.5).max(0.5);
    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title, ("sans-serif", TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(48)
        .y_label_area_size(72)
        .build_cartesian_2d(-0.5..x_max, 0.0..layout.y_max)
        .map_err(|e| err(&e))?;

    let tick_names: Vec<String> = ticks.iter().map(ToString::to_string).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(tick_names.len() * 2 + 1)
        .x_label_formatter(&|x| {
            let idx = x.round();
            if idx < 0.0 || (x - idx).abs() > 1e-6 {
                return String::new();
            }
            tick_names.get(idx as usize).cloned().unwrap_or_default()
        })
        .y_desc(format!("Mean Time ({})", unit.symbol()))
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()
        .map_err(|e| err(&e))?;

    for (index, label) in labels.iter().enumerate() {
        let color = spec.style.color(index);
        let values = series.values(label).unwrap_or_default();
        let bars = values.iter().enumerate().map(|(tick, &value)| {
            let center = layout.bar_center(tick, index, labels.len());
            let half = layout.bar_width / 2.0;
            Rectangle::new(
                [(center - half, 0.0), (center + half, unit.scale(value))],
                color.filled(),
            )
        });
        chart.draw_series(bars).map_err(|e| err(&e))?;
    }

    draw_legend(&root, labels, spec.style, layout.legend_columns).map_err(|e| err(&e))?;
    root.present().map_err(|e| err(&e))?;

    debug!(path = %path.display(), unit = unit.symbol(), bars = labels.len() * ticks.len(), "rendered chart");
    Ok(unit)
}

fn draw_legend<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    labels: &[String],
    style: PlotStyle,
    columns: usize,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    if labels.is_empty() {
        return Ok(());
    }
    let columns = columns.max(1);
    let rows = (labels.len() + columns - 1) / columns;
    let (width, _) = root.dim_in_pixel();

    let box_width = columns as i32 * LEGEND_CELL_WIDTH;
    let left = width as i32 - LEGEND_RIGHT - box_width;
    let top = LEGEND_TOP;
    root.draw(&Rectangle::new(
        [(left - 8, top - 6), (left + box_width, top + rows as i32 * LEGEND_CELL_HEIGHT)],
        WHITE.mix(0.85).filled(),
    ))?;
    root.draw(&Rectangle::new(
        [(left - 8, top - 6), (left + box_width, top + rows as i32 * LEGEND_CELL_HEIGHT)],
        BLACK.mix(0.4).stroke_width(1),
    ))?;

    for (index, label) in labels.iter().enumerate() {
        let x = left + (index % columns) as i32 * LEGEND_CELL_WIDTH;
        let y = top + (index / columns) as i32 * LEGEND_CELL_HEIGHT;
        root.draw(&Rectangle::new(
            [(x, y), (x + LEGEND_SWATCH, y + LEGEND_SWATCH)],
            style.color(index).filled(),
        ))?;
        root.draw(&Text::new(
            label.clone(),
            (x + LEGEND_SWATCH + 6, y),
            ("sans-serif", LEGEND_FONT_SIZE).into_font(),
        ))?;
    }
    Ok(())
}
