use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, LineStyle, Plot, PlotPoints,
    PlotUi, Points, Polygon,
};

use crate::analysis::chart::{BoxGroup, ChartBody, CountTable, HistogramSeries, ViolinGroup};
use crate::analysis::Chart;
use crate::color::ColorMap;

const CHART_HEIGHT: f32 = 380.0;
const OUTLINE: Color32 = Color32::DARK_GRAY;

/// Axis label for integer category positions; blank between categories.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Report chart (central panel)
// ---------------------------------------------------------------------------

/// Render the chart of the current report.
pub fn report_chart(ui: &mut Ui, chart: &Chart, colors: &ColorMap) {
    ui.strong(&chart.title);

    let mut plot = Plot::new("report_chart")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label(&chart.x_label)
        .y_axis_label(&chart.y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    // Category axes get their tick labels from the class or value names.
    let categories: Option<Vec<String>> = match &chart.body {
        ChartBody::Box(_) | ChartBody::Violin(_) => {
            Some(chart.classes().into_iter().map(String::from).collect())
        }
        ChartBody::Count(table) => Some(table.values.iter().map(|v| v.to_string()).collect()),
        ChartBody::Histogram(_) => None,
    };
    if let Some(labels) = categories {
        plot = plot.x_axis_formatter(move |mark, _range| category_label(&labels, mark.value));
    }

    plot.show(ui, |plot_ui| match &chart.body {
        ChartBody::Box(groups) => draw_boxes(plot_ui, groups, colors),
        ChartBody::Histogram(series) => draw_histograms(plot_ui, series, colors),
        ChartBody::Violin(groups) => draw_violins(plot_ui, groups, colors),
        ChartBody::Count(table) => draw_counts(plot_ui, table, colors),
    });
}

fn draw_boxes(plot_ui: &mut PlotUi, groups: &[BoxGroup], colors: &ColorMap) {
    for (i, group) in groups.iter().enumerate() {
        let x = i as f64;
        let color = colors.color_for(&group.label);
        let spread = BoxSpread::new(
            group.lower_whisker,
            group.q1,
            group.median,
            group.q3,
            group.upper_whisker,
        );
        let elem = BoxElem::new(x, spread)
            .name(&group.label)
            .box_width(0.6)
            .whisker_width(0.3)
            .fill(color)
            .stroke(Stroke::new(1.5, OUTLINE));
        plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&group.label).color(color));

        if !group.outliers.is_empty() {
            let points: PlotPoints = group.outliers.iter().map(|&y| [x, y]).collect();
            plot_ui.points(Points::new(points).radius(2.5).color(OUTLINE));
        }
    }
}

fn draw_histograms(plot_ui: &mut PlotUi, series: &[HistogramSeries], colors: &ColorMap) {
    for s in series {
        let color = colors.color_for(&s.label);

        if !s.bins.is_empty() {
            let bars: Vec<Bar> = s
                .bins
                .iter()
                .map(|b| Bar::new((b.start + b.end) / 2.0, b.count as f64).width(b.end - b.start))
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).name(&s.label).color(color));
        }

        if !s.curve.is_empty() {
            let points: PlotPoints = s.curve.iter().copied().collect();
            let mut line = Line::new(points).name(&s.label).color(color).width(2.0);
            if s.bins.is_empty() {
                line = line.fill(0.0);
            }
            plot_ui.line(line);
        }
    }
}

fn draw_violins(plot_ui: &mut PlotUi, groups: &[ViolinGroup], colors: &ColorMap) {
    for (i, group) in groups.iter().enumerate() {
        let x = i as f64;
        let color = colors.color_for(&group.label);

        if !group.outline.is_empty() {
            // Right side bottom-up, then left side top-down.
            let right = group.outline.iter().map(|&[y, w]| [x + w, y]);
            let left = group.outline.iter().rev().map(|&[y, w]| [x - w, y]);
            let points: PlotPoints = right.chain(left).collect();
            plot_ui.polygon(
                Polygon::new(points)
                    .name(&group.label)
                    .fill_color(color)
                    .stroke(Stroke::new(1.0, OUTLINE)),
            );
        }

        for (q, mark) in group.quartiles.iter().enumerate() {
            if !mark.value.is_finite() {
                continue;
            }
            let style = if q == 1 {
                LineStyle::dashed_loose()
            } else {
                LineStyle::dotted_dense()
            };
            let segment = vec![[x - mark.half_width, mark.value], [x + mark.half_width, mark.value]];
            plot_ui.line(Line::new(PlotPoints::from(segment)).color(OUTLINE).style(style));
        }
    }
}

fn draw_counts(plot_ui: &mut PlotUi, table: &CountTable, colors: &ColorMap) {
    let hues = table.classes.len().max(1) as f64;
    let width = 0.8 / hues;

    for (h, class) in table.classes.iter().enumerate() {
        let offset = (h as f64 - (hues - 1.0) / 2.0) * width;
        let bars: Vec<Bar> = table
            .counts
            .iter()
            .enumerate()
            .map(|(v, per_class)| Bar::new(v as f64 + offset, per_class[h] as f64).width(width))
            .collect();
        plot_ui.bar_chart(
            BarChart::new(bars)
                .name(class)
                .color(colors.color_for(class)),
        );
    }
}

// ---------------------------------------------------------------------------
// Class distribution (side panel)
// ---------------------------------------------------------------------------

/// Bar chart of rows per class label.
pub fn class_count_chart(ui: &mut Ui, counts: &[(String, usize)], colors: &ColorMap) {
    let labels: Vec<String> = counts.iter().map(|(l, _)| l.clone()).collect();
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (label, n))| {
            Bar::new(i as f64, *n as f64)
                .width(0.6)
                .name(label)
                .fill(colors.color_for(label))
        })
        .collect();

    Plot::new("class_counts")
        .height(160.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}
