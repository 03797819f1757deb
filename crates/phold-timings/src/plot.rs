//! Generation timing comparison plots
//!
//! Renders one log-log scatter subplot per `(height, width)` grid size,
//! laid out with heights as rows and widths as columns. Each subplot
//! compares generation with SST (blue) and without SST (orange), one marker
//! shape per node count, and labels every configuration present in both
//! with the absolute difference between them.
//!
//! Layout is computed first as a [`FigurePlan`], independent of any
//! backend, and then drawn with `plotters`.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::f64::consts::SQRT_2;
use std::path::Path;
use tracing::{debug, info};

use crate::config::{PlotConfig, PlotMetric};
use crate::error::AnalysisError;
use crate::model::TimingCategory;
use crate::organize::OrganizedData;

pub const FIGURE_TITLE: &str = "PHOLD JSON Dump Timings (Log₂ x-axis, Log₁₀ y-axis)";

/// Categories drawn in each subplot, in drawing order
pub const PLOTTED_CATEGORIES: [TimingCategory; 2] =
    [TimingCategory::GenMpi, TimingCategory::GenPy];

const SST_COLOR: RGBColor = RGBColor(31, 119, 180);
const NO_SST_COLOR: RGBColor = RGBColor(255, 127, 14);

// Font sizes
const TITLE_FONT_SIZE: u32 = 28;
const CAPTION_FONT_SIZE: u32 = 20;
const AXIS_LABEL_FONT_SIZE: u32 = 16;
const TICK_LABEL_FONT_SIZE: u32 = 13;
const ANNOTATION_FONT_SIZE: u32 = 11;
const LEGEND_FONT_SIZE: u32 = 15;

// Layout in pixels; text widths are upper estimates per character
const TITLE_BAND: u32 = 50;
const TITLE_CHAR_WIDTH: u32 = 17;
const FIGURE_MARGIN: u32 = 20;
const LEGEND_PADDING: u32 = 16;
const LEGEND_ROW_HEIGHT: u32 = 30;
const MARKER_SIZE: i32 = 6;
const LEGEND_SWATCH: i32 = 24;
const LEGEND_CHAR_WIDTH: i32 = 9;
const LEGEND_GAP: i32 = 20;

/// Marker shape for a node count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeMarker {
    Circle,
    Square,
    Triangle,
}

impl NodeMarker {
    /// Marker for the node counts the sweep uses; other counts are not plotted.
    pub fn for_nodes(num_nodes: u32) -> Option<Self> {
        match num_nodes {
            4 => Some(NodeMarker::Circle),
            8 => Some(NodeMarker::Square),
            16 => Some(NodeMarker::Triangle),
            _ => None,
        }
    }
}

pub fn category_color(category: TimingCategory) -> RGBColor {
    match category {
        TimingCategory::GenMpi | TimingCategory::BuildMpi => SST_COLOR,
        TimingCategory::GenPy | TimingCategory::BuildPy => NO_SST_COLOR,
    }
}

/// Points of one category and node count, sorted by total ranks.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSeries {
    pub category: TimingCategory,
    pub num_nodes: u32,
    pub marker: NodeMarker,
    /// `(total_ranks, seconds)`
    pub points: Vec<(f64, f64)>,
}

impl MarkerSeries {
    pub fn label(&self) -> String {
        format!("{} ({} Nodes)", self.category.display_name(), self.num_nodes)
    }
}

/// Difference label between the two plotted categories at one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub num_nodes: u32,
    pub total_ranks: f64,
    /// Geometric mean of the two values, midway between them on a log axis
    pub y: f64,
    pub difference: f64,
}

impl Annotation {
    pub fn text(&self) -> String {
        format!("{:.1}", self.difference)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub category: TimingCategory,
    pub marker: NodeMarker,
}

impl LegendEntry {
    /// Estimated width in pixels, marker and trailing gap included.
    pub fn width(&self) -> i32 {
        LEGEND_SWATCH + self.label.chars().count() as i32 * LEGEND_CHAR_WIDTH + LEGEND_GAP
    }
}

/// Placement of one legend entry, in legend-band pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendSlot {
    pub row: usize,
    pub x: i32,
    pub width: i32,
}

/// Estimated rendered width of the figure title.
pub fn title_width() -> u32 {
    FIGURE_TITLE.chars().count() as u32 * TITLE_CHAR_WIDTH
}

fn legend_band(legend_rows: usize) -> u32 {
    2 * LEGEND_PADDING + legend_rows as u32 * LEGEND_ROW_HEIGHT
}

/// Contents and grid position of one subplot.
#[derive(Debug, Clone, PartialEq)]
pub struct SubplotPlan {
    pub row: usize,
    pub col: usize,
    pub height: u32,
    pub width: u32,
    pub series: Vec<MarkerSeries>,
    pub annotations: Vec<Annotation>,
    /// Observed total-rank values, used verbatim as x ticks
    pub x_ticks: Vec<f64>,
}

impl SubplotPlan {
    pub fn title(&self) -> String {
        format!("{}x{}", self.height, self.width)
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// X range padded by half a power of two on each side.
    pub fn x_range(&self) -> (f64, f64) {
        match (self.x_ticks.first(), self.x_ticks.last()) {
            (Some(&lo), Some(&hi)) => (lo / SQRT_2, hi * SQRT_2),
            _ => (1.0, 2.0),
        }
    }

    /// Y range padded by a factor of two on each side.
    pub fn y_range(&self) -> (f64, f64) {
        let values = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(_, y)| y));
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });
        if lo.is_finite() && hi.is_finite() {
            (lo / 2.0, hi * 2.0)
        } else {
            (0.1, 10.0)
        }
    }
}

/// Backend-independent layout of the whole figure.
#[derive(Debug, Clone, PartialEq)]
pub struct FigurePlan {
    /// Grid rows
    pub heights: Vec<u32>,
    /// Grid columns
    pub widths: Vec<u32>,
    /// Subplots for the sizes present; absent cells stay blank
    pub subplots: Vec<SubplotPlan>,
    /// Shared legend, taken from the first subplot that has points
    pub legend: Vec<LegendEntry>,
}

impl FigurePlan {
    pub fn rows(&self) -> usize {
        self.heights.len()
    }

    pub fn cols(&self) -> usize {
        self.widths.len()
    }

    pub fn summary(&self) -> PlotSummary {
        PlotSummary {
            subplots: self.subplots.len(),
            points: self.subplots.iter().map(SubplotPlan::point_count).sum(),
            annotations: self.subplots.iter().map(|s| s.annotations.len()).sum(),
        }
    }

    /// Width of the subplot grid, widened if the title would not fit.
    pub fn figure_width(&self, config: &PlotConfig) -> u32 {
        let grid_width = config.subplot_width * self.cols() as u32;
        grid_width.max(title_width() + 2 * FIGURE_MARGIN)
    }

    /// Wrap the legend into centred rows that fit within `figure_width`.
    pub fn legend_layout(&self, figure_width: u32) -> Vec<LegendSlot> {
        let available = figure_width.saturating_sub(2 * FIGURE_MARGIN) as i32;

        let mut rows: Vec<Vec<i32>> = Vec::new();
        let mut row_width = 0;
        for entry in &self.legend {
            let width = entry.width();
            match rows.last_mut() {
                Some(row) if row_width + width <= available => {
                    row.push(width);
                    row_width += width;
                }
                _ => {
                    rows.push(vec![width]);
                    row_width = width;
                }
            }
        }

        let mut slots = Vec::with_capacity(self.legend.len());
        for (row, widths) in rows.iter().enumerate() {
            let total: i32 = widths.iter().sum();
            let mut x = (figure_width as i32 - total) / 2;
            for &width in widths {
                slots.push(LegendSlot { row, x, width });
                x += width;
            }
        }
        slots
    }

    /// Figure size in pixels for the given subplot dimensions.
    pub fn dimensions(&self, config: &PlotConfig) -> (u32, u32) {
        let width = self.figure_width(config);
        let legend_rows = self
            .legend_layout(width)
            .last()
            .map_or(0, |slot| slot.row + 1);
        let height =
            TITLE_BAND + config.subplot_height * self.rows() as u32 + legend_band(legend_rows);
        (width, height)
    }
}

/// What was drawn, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotSummary {
    pub subplots: usize,
    pub points: usize,
    pub annotations: usize,
}

/// Lay out the figure; `None` if there is nothing to plot.
pub fn plan_figure(data: &OrganizedData, metric: PlotMetric) -> Option<FigurePlan> {
    if data.is_empty() {
        return None;
    }

    let heights = data.heights();
    let widths = data.widths();

    let row_of = grid_index(&heights);
    let col_of = grid_index(&widths);

    // Sizes come sorted by (height, width), i.e. row-major
    let subplots: Vec<SubplotPlan> = data
        .sizes()
        .filter_map(|size| {
            let (row, col) = (*row_of.get(&size.0)?, *col_of.get(&size.1)?);
            Some(plan_subplot(data, size, row, col, metric))
        })
        .collect();

    let legend = subplots
        .iter()
        .find(|subplot| !subplot.series.is_empty())
        .map(|subplot| {
            subplot
                .series
                .iter()
                .map(|series| LegendEntry {
                    label: series.label(),
                    category: series.category,
                    marker: series.marker,
                })
                .collect()
        })
        .unwrap_or_default();

    Some(FigurePlan {
        heights,
        widths,
        subplots,
        legend,
    })
}

/// Map each value to its position in the sorted grid axis.
fn grid_index(axis: &[u32]) -> BTreeMap<u32, usize> {
    axis.iter().enumerate().map(|(i, &v)| (v, i)).collect()
}

fn plan_subplot(
    data: &OrganizedData,
    size: (u32, u32),
    row: usize,
    col: usize,
    metric: PlotMetric,
) -> SubplotPlan {
    let mut series = Vec::new();
    let mut x_ticks = BTreeSet::new();
    let mut values: BTreeMap<TimingCategory, BTreeMap<(u32, u64), f64>> = BTreeMap::new();

    for category in PLOTTED_CATEGORIES {
        let Some(node_series) = data.series(size, category) else {
            continue;
        };

        for (&num_nodes, points) in node_series {
            let Some(marker) = NodeMarker::for_nodes(num_nodes) else {
                debug!("{}x{}: not plotting {} nodes", size.0, size.1, num_nodes);
                continue;
            };

            let mut points = points.clone();
            points.sort_by_key(|p| p.total_ranks);

            let mut xy = Vec::with_capacity(points.len());
            for point in points {
                let y = point.value(metric);
                // Log axes cannot show zero or negative values
                if point.total_ranks == 0 || !(y.is_finite() && y > 0.0) {
                    debug!("{}x{}: dropping non-positive point {:?}", size.0, size.1, point);
                    continue;
                }
                values
                    .entry(category)
                    .or_default()
                    .insert((num_nodes, point.total_ranks), y);
                x_ticks.insert(point.total_ranks);
                xy.push((point.total_ranks as f64, y));
            }

            if !xy.is_empty() {
                series.push(MarkerSeries {
                    category,
                    num_nodes,
                    marker,
                    points: xy,
                });
            }
        }
    }

    let annotations = match (
        values.get(&TimingCategory::GenMpi),
        values.get(&TimingCategory::GenPy),
    ) {
        (Some(with_sst), Some(without_sst)) => annotate_differences(with_sst, without_sst),
        _ => Vec::new(),
    };

    SubplotPlan {
        row,
        col,
        height: size.0,
        width: size.1,
        series,
        annotations,
        x_ticks: x_ticks.into_iter().map(|x| x as f64).collect(),
    }
}

fn annotate_differences(
    with_sst: &BTreeMap<(u32, u64), f64>,
    without_sst: &BTreeMap<(u32, u64), f64>,
) -> Vec<Annotation> {
    with_sst
        .iter()
        .filter_map(|(&(num_nodes, total_ranks), &a)| {
            without_sst.get(&(num_nodes, total_ranks)).map(|&b| Annotation {
                num_nodes,
                total_ranks: total_ranks as f64,
                y: (a * b).sqrt(),
                difference: (b - a).abs(),
            })
        })
        .collect()
}

/// Render the generation timing comparison to `path`.
///
/// A `.svg` extension selects the SVG backend; anything else is written
/// as a bitmap (PNG by default).
///
/// # Errors
///
/// Returns [`AnalysisError::NoData`] if `data` is empty and
/// [`AnalysisError::Plot`] if the backend fails.
pub fn plot_generation_timings(
    data: &OrganizedData,
    config: &PlotConfig,
    path: &Path,
) -> Result<PlotSummary, AnalysisError> {
    let plan = plan_figure(data, config.metric).ok_or(AnalysisError::NoData)?;
    let dimensions = plan.dimensions(config);

    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    let rendered = if is_svg {
        render(SVGBackend::new(path, dimensions).into_drawing_area(), &plan, config)
    } else {
        render(BitMapBackend::new(path, dimensions).into_drawing_area(), &plan, config)
    };
    rendered.map_err(|e| AnalysisError::Plot(e.to_string()))?;

    let summary = plan.summary();
    info!(
        "Saved: {} ({} subplots, {} points, {} annotations)",
        path.display(),
        summary.subplots,
        summary.points,
        summary.annotations
    );
    Ok(summary)
}

fn render<DB>(
    root: DrawingArea<DB, Shift>,
    plan: &FigurePlan,
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let body = root.titled(FIGURE_TITLE, ("sans-serif", TITLE_FONT_SIZE))?;

    let grid_height = config.subplot_height * plan.rows() as u32;
    let (grid, legend_area) = body.split_vertically(grid_height);
    let cells = grid.split_evenly((plan.rows(), plan.cols()));

    for subplot in &plan.subplots {
        let cell = &cells[subplot.row * plan.cols() + subplot.col];
        let bottom_row = subplot.row + 1 == plan.rows();
        draw_subplot(cell, subplot, bottom_row)?;
    }

    let slots = plan.legend_layout(plan.figure_width(config));
    draw_legend(&legend_area, &plan.legend, &slots)?;
    root.present()?;
    Ok(())
}

fn draw_subplot<DB>(
    cell: &DrawingArea<DB, Shift>,
    plan: &SubplotPlan,
    bottom_row: bool,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x_lo, x_hi) = plan.x_range();
    let (y_lo, y_hi) = plan.y_range();

    let mut chart = ChartBuilder::on(cell)
        .caption(plan.title(), ("sans-serif", CAPTION_FONT_SIZE))
        .margin(10)
        .x_label_area_size(if bottom_row { 45 } else { 30 })
        .y_label_area_size(if plan.col == 0 { 70 } else { 50 })
        .build_cartesian_2d(
            (x_lo..x_hi)
                .log_scale()
                .base(2.0)
                .with_key_points(plan.x_ticks.clone()),
            (y_lo..y_hi).log_scale(),
        )?;

    let x_label = |x: &f64| format!("{:.0}", x);
    let mut mesh = chart.configure_mesh();
    mesh.x_label_formatter(&x_label)
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(BLACK.mix(0.05))
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE));
    if plan.col == 0 {
        mesh.y_desc("Time (seconds)");
    }
    if bottom_row {
        mesh.x_desc("Total Ranks");
    }
    mesh.draw()?;

    for series in &plan.series {
        let style = category_color(series.category).filled();
        let points = series.points.iter().copied();
        match series.marker {
            NodeMarker::Circle => {
                chart.draw_series(points.map(|p| Circle::new(p, MARKER_SIZE, style)))?;
            }
            NodeMarker::Square => {
                chart.draw_series(points.map(|p| {
                    EmptyElement::at(p)
                        + Rectangle::new(
                            [(-MARKER_SIZE, -MARKER_SIZE), (MARKER_SIZE, MARKER_SIZE)],
                            style,
                        )
                }))?;
            }
            NodeMarker::Triangle => {
                chart.draw_series(points.map(|p| TriangleMarker::new(p, MARKER_SIZE + 1, style)))?;
            }
        }
    }

    let annotation_style = ("sans-serif", ANNOTATION_FONT_SIZE)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(plan.annotations.iter().map(|a| {
        Text::new(a.text(), (a.total_ranks, a.y), annotation_style.clone())
    }))?;

    Ok(())
}

fn draw_legend<DB>(
    area: &DrawingArea<DB, Shift>,
    entries: &[LegendEntry],
    slots: &[LegendSlot],
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (Some(first), Some(last)) = (slots.iter().map(|s| s.x).min(), slots.last()) else {
        return Ok(());
    };
    let right = slots.iter().map(|s| s.x + s.width - LEGEND_GAP).max().unwrap_or(first);
    let top = LEGEND_PADDING as i32;
    let bottom = top + (last.row as i32 + 1) * LEGEND_ROW_HEIGHT as i32;

    area.draw(&Rectangle::new(
        [(first - 10, top - 4), (right + 10, bottom + 4)],
        BLACK.mix(0.4).stroke_width(1),
    ))?;

    let label_style = ("sans-serif", LEGEND_FONT_SIZE)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));

    for (entry, slot) in entries.iter().zip(slots) {
        let style = category_color(entry.category).filled();
        let y = top + slot.row as i32 * LEGEND_ROW_HEIGHT as i32 + LEGEND_ROW_HEIGHT as i32 / 2;
        let center = (slot.x + MARKER_SIZE + 2, y);
        match entry.marker {
            NodeMarker::Circle => area.draw(&Circle::new(center, MARKER_SIZE, style))?,
            NodeMarker::Square => area.draw(&Rectangle::new(
                [
                    (center.0 - MARKER_SIZE, center.1 - MARKER_SIZE),
                    (center.0 + MARKER_SIZE, center.1 + MARKER_SIZE),
                ],
                style,
            ))?,
            NodeMarker::Triangle => {
                area.draw(&TriangleMarker::new(center, MARKER_SIZE + 1, style))?
            }
        }
        area.draw(&Text::new(
            entry.label.clone(),
            (slot.x + LEGEND_SWATCH, y),
            label_style.clone(),
        ))?;
    }

    Ok(())
}
