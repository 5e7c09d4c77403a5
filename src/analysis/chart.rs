use std::collections::BTreeSet;

use super::stats;
use super::{group_by_class, AnalysisError, ChartKind, ClassGroup, Variant};
use crate::data::classify::{ColumnDescriptor, ColumnKind};
use crate::data::model::RecordTable;

/// Grid resolution of the density curves overlaid on histograms.
const CURVE_GRID: usize = 200;
/// Bandwidths a standalone density curve extends past the data.
const CURVE_CUT: f64 = 3.0;
const VIOLIN_GRID: usize = 100;
const VIOLIN_CUT: f64 = 2.0;
/// Half-width of the widest violin, in category-axis units.
const VIOLIN_HALF_WIDTH: f64 = 0.4;
/// Box plot whiskers reach this many IQRs beyond the box.
const WHISKER_IQR: f64 = 1.5;

// ---------------------------------------------------------------------------
// Chart description
// ---------------------------------------------------------------------------

/// A chart ready to draw: titles plus the geometry for one chart kind.
#[derive(Debug, Clone)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub body: ChartBody,
}

#[derive(Debug, Clone)]
pub enum ChartBody {
    Box(Vec<BoxGroup>),
    Histogram(Vec<HistogramSeries>),
    Violin(Vec<ViolinGroup>),
    Count(CountTable),
}

/// Five-number box summary of one class.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGroup {
    pub label: String,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// One class's distribution. `bins` is empty for pure density charts; when
/// bins are present, `curve` is scaled to counts so both share the y axis.
#[derive(Debug, Clone)]
pub struct HistogramSeries {
    pub label: String,
    pub bins: Vec<Bin>,
    pub curve: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuartileMark {
    pub value: f64,
    pub half_width: f64,
}

/// Violin outline as `[value, half_width]` pairs plus 25/50/75% markers.
/// The outline is empty when the class has too few distinct values for a
/// density; the markers are still drawn.
#[derive(Debug, Clone)]
pub struct ViolinGroup {
    pub label: String,
    pub outline: Vec<[f64; 2]>,
    pub quartiles: [QuartileMark; 3],
}

/// Counts of each boolean value per class: `counts[value][class]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountTable {
    pub values: Vec<bool>,
    pub classes: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl Chart {
    /// Class labels in drawing order.
    pub fn classes(&self) -> Vec<&str> {
        match &self.body {
            ChartBody::Box(groups) => groups.iter().map(|g| g.label.as_str()).collect(),
            ChartBody::Histogram(series) => series.iter().map(|s| s.label.as_str()).collect(),
            ChartBody::Violin(groups) => groups.iter().map(|g| g.label.as_str()).collect(),
            ChartBody::Count(table) => table.classes.iter().map(String::as_str).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Map a (feature, chart kind) pair to exactly one chart.
///
/// The pair must be offered by `variant` for the feature's kind; anything else
/// is rejected rather than drawn as the wrong chart.
pub fn dispatch(
    table: &RecordTable,
    feature: &ColumnDescriptor,
    chart: ChartKind,
    class_column: &str,
    variant: Variant,
) -> Result<Chart, AnalysisError> {
    if feature.name == class_column || feature.kind == ColumnKind::Categorical {
        return Err(AnalysisError::NotSelectable(feature.name.clone()));
    }
    if !variant.allows(feature.kind, chart) {
        return Err(AnalysisError::UnsupportedChart {
            feature: feature.name.clone(),
            kind: feature.kind,
            chart,
        });
    }

    let groups = group_by_class(table, class_column, &feature.name)?;
    let name = feature.name.as_str();

    let chart = match chart {
        ChartKind::Boxplot => Chart {
            kind: chart,
            title: format!("Boxplot of {name} by personality"),
            x_label: "Personality".into(),
            y_label: name.into(),
            body: ChartBody::Box(box_groups(&groups, name)?),
        },
        ChartKind::Histogram => {
            let with_bins = matches!(variant, Variant::Extended);
            let (title, y_label) = if with_bins {
                (format!("Histogram of {name} by personality"), "Frequency")
            } else {
                (format!("Distribution of {name} by profile"), "Density")
            };
            Chart {
                kind: chart,
                title,
                x_label: name.into(),
                y_label: y_label.into(),
                body: ChartBody::Histogram(histogram_series(&groups, name, with_bins)?),
            }
        }
        ChartKind::ViolinPlot => Chart {
            kind: chart,
            title: format!("Violin plot of {name} by personality"),
            x_label: "Personality".into(),
            y_label: name.into(),
            body: ChartBody::Violin(violin_groups(&groups, name)?),
        },
        ChartKind::Countplot => Chart {
            kind: chart,
            title: format!("Count of {name} by personality"),
            x_label: name.into(),
            y_label: "Count".into(),
            body: ChartBody::Count(count_table(&groups, name)?),
        },
    };
    Ok(chart)
}

/// Numeric values per class, failing when the whole feature is empty.
fn numeric_groups(
    groups: &[ClassGroup<'_>],
    feature: &str,
) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
    let numeric: Vec<(String, Vec<f64>)> = groups
        .iter()
        .map(|g| (g.label.clone(), g.numbers()))
        .collect();
    if numeric.iter().all(|(_, xs)| xs.is_empty()) {
        log::warn!("feature '{feature}' has no numeric values");
        return Err(AnalysisError::EmptyFeature(feature.to_string()));
    }
    Ok(numeric)
}

fn box_groups(groups: &[ClassGroup<'_>], feature: &str) -> Result<Vec<BoxGroup>, AnalysisError> {
    let boxes = numeric_groups(groups, feature)?
        .into_iter()
        .filter_map(|(label, xs)| {
            let xs = stats::sorted(&xs);
            let q1 = stats::quantile(&xs, 0.25)?;
            let median = stats::quantile(&xs, 0.5)?;
            let q3 = stats::quantile(&xs, 0.75)?;
            let iqr = q3 - q1;
            let lo_fence = q1 - WHISKER_IQR * iqr;
            let hi_fence = q3 + WHISKER_IQR * iqr;

            let inside: Vec<f64> = xs
                .iter()
                .copied()
                .filter(|&x| x >= lo_fence && x <= hi_fence)
                .collect();
            let lower_whisker = inside.first().map_or(q1, |&x| x.min(q1));
            let upper_whisker = inside.last().map_or(q3, |&x| x.max(q3));
            let outliers = xs
                .iter()
                .copied()
                .filter(|&x| x < lo_fence || x > hi_fence)
                .collect();

            Some(BoxGroup {
                label,
                lower_whisker,
                q1,
                median,
                q3,
                upper_whisker,
                outliers,
            })
        })
        .collect();
    Ok(boxes)
}

fn histogram_series(
    groups: &[ClassGroup<'_>],
    feature: &str,
    with_bins: bool,
) -> Result<Vec<HistogramSeries>, AnalysisError> {
    let series = numeric_groups(groups, feature)?
        .into_iter()
        .map(|(label, xs)| {
            if !with_bins {
                let curve = stats::density_curve(&xs, CURVE_CUT, CURVE_GRID);
                return HistogramSeries {
                    label,
                    bins: Vec::new(),
                    curve,
                };
            }

            let sorted = stats::sorted(&xs);
            let edges = stats::auto_bin_edges(&sorted);
            let counts = stats::bin_counts(&sorted, &edges);
            let bins: Vec<Bin> = edges
                .windows(2)
                .zip(counts)
                .map(|(w, count)| Bin {
                    start: w[0],
                    end: w[1],
                    count,
                })
                .collect();

            // Density scaled to counts, clipped to the data range.
            let bin_width = bins.first().map(|b| b.end - b.start).unwrap_or(1.0);
            let scale = xs.len() as f64 * bin_width;
            let curve = stats::density_curve(&xs, 0.0, CURVE_GRID)
                .into_iter()
                .map(|[x, d]| [x, d * scale])
                .collect();

            HistogramSeries { label, bins, curve }
        })
        .collect();
    Ok(series)
}

fn violin_groups(groups: &[ClassGroup<'_>], feature: &str) -> Result<Vec<ViolinGroup>, AnalysisError> {
    let numeric = numeric_groups(groups, feature)?;

    let densities: Vec<Vec<[f64; 2]>> = numeric
        .iter()
        .map(|(_, xs)| stats::density_curve(xs, VIOLIN_CUT, VIOLIN_GRID))
        .collect();
    // Equal areas for all violins: one scale for every class.
    let peak = densities
        .iter()
        .flatten()
        .map(|p| p[1])
        .fold(0.0_f64, f64::max);
    let scale = if peak > 0.0 { VIOLIN_HALF_WIDTH / peak } else { 0.0 };

    let violins = numeric
        .into_iter()
        .zip(densities)
        .filter(|((_, xs), _)| !xs.is_empty())
        .map(|((label, xs), density)| {
            let outline: Vec<[f64; 2]> = density.iter().map(|&[y, d]| [y, d * scale]).collect();
            let sorted = stats::sorted(&xs);
            let mark = |q: f64| {
                let value = stats::quantile(&sorted, q).unwrap_or(f64::NAN);
                let half_width = if outline.is_empty() {
                    VIOLIN_HALF_WIDTH
                } else {
                    interpolate(&outline, value)
                };
                QuartileMark { value, half_width }
            };
            let quartiles = [mark(0.25), mark(0.5), mark(0.75)];
            ViolinGroup {
                label,
                outline,
                quartiles,
            }
        })
        .collect();
    Ok(violins)
}

/// Linear interpolation of a curve given as ascending `[x, y]` points.
fn interpolate(curve: &[[f64; 2]], x: f64) -> f64 {
    let idx = curve.partition_point(|p| p[0] < x);
    match (idx.checked_sub(1).and_then(|i| curve.get(i)), curve.get(idx)) {
        (Some(a), Some(b)) if b[0] > a[0] => a[1] + (b[1] - a[1]) * (x - a[0]) / (b[0] - a[0]),
        (_, Some(b)) => b[1],
        (Some(a), None) => a[1],
        (None, None) => 0.0,
    }
}

fn count_table(groups: &[ClassGroup<'_>], feature: &str) -> Result<CountTable, AnalysisError> {
    let per_class: Vec<Vec<bool>> = groups.iter().map(|g| g.bools()).collect();
    let values: Vec<bool> = per_class
        .iter()
        .flatten()
        .copied()
        .collect::<BTreeSet<bool>>()
        .into_iter()
        .collect();
    if values.is_empty() {
        log::warn!("feature '{feature}' has no boolean values");
        return Err(AnalysisError::EmptyFeature(feature.to_string()));
    }

    let counts = values
        .iter()
        .map(|&value| {
            per_class
                .iter()
                .map(|bools| bools.iter().filter(|&&b| b == value).count())
                .collect()
        })
        .collect();

    Ok(CountTable {
        values,
        classes: groups.iter().map(|g| g.label.clone()).collect(),
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::data::labels::map_class_labels;
    use crate::data::model::Value;

    fn labeled() -> RecordTable {
        map_class_labels(&fixtures::encoded_table(), "Personality").unwrap()
    }

    fn numeric(name: &str) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.into(),
            kind: ColumnKind::Numeric,
        }
    }

    fn boolean(name: &str) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.into(),
            kind: ColumnKind::Boolean,
        }
    }

    #[test]
    fn countplot_on_numeric_feature_is_rejected() {
        let err = dispatch(
            &labeled(),
            &numeric("Age"),
            ChartKind::Countplot,
            "Personality",
            Variant::Extended,
        )
        .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::UnsupportedChart {
                feature: "Age".into(),
                kind: ColumnKind::Numeric,
                chart: ChartKind::Countplot,
            }
        );
    }

    #[test]
    fn violin_is_not_offered_by_classic_variant() {
        let result = dispatch(
            &labeled(),
            &numeric("Age"),
            ChartKind::ViolinPlot,
            "Personality",
            Variant::Classic,
        );
        assert!(matches!(result, Err(AnalysisError::UnsupportedChart { .. })));
    }

    #[test]
    fn class_column_cannot_be_plotted() {
        let table = fixtures::encoded_table();
        let result = dispatch(
            &table,
            &numeric("Personality"),
            ChartKind::Boxplot,
            "Personality",
            Variant::Extended,
        );
        assert_eq!(result.unwrap_err(), AnalysisError::NotSelectable("Personality".into()));
    }

    #[test]
    fn boxes_follow_first_seen_class_order() {
        let chart = dispatch(
            &labeled(),
            &numeric("Age"),
            ChartKind::Boxplot,
            "Personality",
            Variant::Extended,
        )
        .unwrap();
        assert_eq!(chart.classes(), vec!["Extrovert", "Introvert"]);

        let ChartBody::Box(groups) = chart.body else {
            panic!("expected a box chart");
        };
        // Extrovert ages: 25, 28, 31.
        assert_eq!(groups[0].median, 28.0);
        assert_eq!(groups[0].q1, 26.5);
        assert_eq!(groups[0].lower_whisker, 25.0);
        assert_eq!(groups[0].upper_whisker, 31.0);
        assert!(groups[0].outliers.is_empty());
    }

    #[test]
    fn far_values_become_outliers() {
        let rows = [1, 2, 3, 4, 100]
            .iter()
            .map(|&v| vec![Value::Text("Introvert".into()), Value::Integer(v)])
            .collect();
        let table = RecordTable::new(vec!["Personality".into(), "Age".into()], rows);
        let chart = dispatch(
            &table,
            &numeric("Age"),
            ChartKind::Boxplot,
            "Personality",
            Variant::Classic,
        )
        .unwrap();
        let ChartBody::Box(groups) = chart.body else {
            panic!("expected a box chart");
        };
        assert_eq!(groups[0].outliers, vec![100.0]);
        assert_eq!(groups[0].upper_whisker, 4.0);
    }

    #[test]
    fn histogram_series_are_labeled_per_class() {
        let chart = dispatch(
            &labeled(),
            &numeric("Time_spent_Alone"),
            ChartKind::Histogram,
            "Personality",
            Variant::Extended,
        )
        .unwrap();
        assert_eq!(chart.y_label, "Frequency");
        let ChartBody::Histogram(series) = chart.body else {
            panic!("expected a histogram");
        };
        assert_eq!(series.len(), 2);
        for s in &series {
            let total: usize = s.bins.iter().map(|b| b.count).sum();
            assert_eq!(total, 3, "{}", s.label);
            assert!(!s.curve.is_empty());
        }
    }

    #[test]
    fn classic_histogram_draws_density_only() {
        let chart = dispatch(
            &labeled(),
            &numeric("Age"),
            ChartKind::Histogram,
            "Personality",
            Variant::Classic,
        )
        .unwrap();
        let ChartBody::Histogram(series) = chart.body else {
            panic!("expected a histogram");
        };
        assert!(series.iter().all(|s| s.bins.is_empty() && !s.curve.is_empty()));
    }

    #[test]
    fn violin_quartiles_sit_inside_the_outline() {
        let chart = dispatch(
            &labeled(),
            &numeric("Time_spent_Alone"),
            ChartKind::ViolinPlot,
            "Personality",
            Variant::Extended,
        )
        .unwrap();
        let ChartBody::Violin(groups) = chart.body else {
            panic!("expected a violin chart");
        };
        for group in &groups {
            let widest = group.outline.iter().map(|p| p[1]).fold(0.0, f64::max);
            assert!(widest <= VIOLIN_HALF_WIDTH + 1e-9);
            assert!(group.quartiles[0].value <= group.quartiles[1].value);
            assert!(group.quartiles[1].value <= group.quartiles[2].value);
            for mark in &group.quartiles {
                assert!(mark.half_width > 0.0 && mark.half_width <= widest + 1e-9);
            }
        }
    }

    #[test]
    fn violins_share_one_area() {
        let chart = dispatch(
            &labeled(),
            &numeric("Time_spent_Alone"),
            ChartKind::ViolinPlot,
            "Personality",
            Variant::Extended,
        )
        .unwrap();
        let ChartBody::Violin(groups) = chart.body else {
            panic!("expected a violin chart");
        };
        let areas: Vec<f64> = groups
            .iter()
            .map(|g| {
                g.outline
                    .windows(2)
                    .map(|w| (w[1][0] - w[0][0]) * (w[0][1] + w[1][1]))
                    .sum()
            })
            .collect();
        assert_eq!(areas.len(), 2);
        assert!((areas[0] - areas[1]).abs() / areas[0] < 0.05, "{areas:?}");
    }

    #[test]
    fn countplot_splits_values_by_class() {
        let chart = dispatch(
            &labeled(),
            &boolean("Stage_fear"),
            ChartKind::Countplot,
            "Personality",
            Variant::Extended,
        )
        .unwrap();
        let ChartBody::Count(table) = chart.body else {
            panic!("expected a count chart");
        };
        assert_eq!(table.values, vec![false, true]);
        assert_eq!(table.classes, vec!["Extrovert", "Introvert"]);
        // Extrovert: false, false, true. Introvert: true, true, false.
        assert_eq!(table.counts, vec![vec![2, 1], vec![1, 2]]);
    }

    #[test]
    fn empty_feature_is_an_error() {
        let rows = vec![
            vec![Value::Text("Extrovert".into()), Value::Null],
            vec![Value::Text("Introvert".into()), Value::Null],
        ];
        let table = RecordTable::new(vec!["Personality".into(), "Age".into()], rows);
        let result = dispatch(
            &table,
            &numeric("Age"),
            ChartKind::Histogram,
            "Personality",
            Variant::Extended,
        );
        assert_eq!(result.unwrap_err(), AnalysisError::EmptyFeature("Age".into()));
    }
}
