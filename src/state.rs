use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::analysis::{self, AnalysisError, ChartKind, Report, Selection};
use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::classify::{selectable_features, ColumnDescriptor};
use crate::data::labels::map_class_labels;
use crate::data::loader::{load_dataset, LoadError};
use crate::data::model::RecordTable;

// ---------------------------------------------------------------------------
// Dataset preparation
// ---------------------------------------------------------------------------

/// Load a dataset and apply the variant's label mapping.
pub fn prepare_dataset(path: &Path, config: &DashboardConfig) -> Result<RecordTable, LoadError> {
    let table = load_dataset(path, &config.class_column)?;
    if !config.variant.maps_labels() {
        return Ok(table);
    }
    map_class_labels(&table, &config.class_column)
        .ok_or_else(|| LoadError::MissingColumn(config.class_column.clone()))
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset, shared read-only (None until a load succeeds).
    pub dataset: Option<Arc<RecordTable>>,

    /// File the dataset came from.
    pub source_path: Option<PathBuf>,

    /// Features offered in the sidebar, numeric first.
    pub features: Vec<ColumnDescriptor>,

    /// Current sidebar selection.
    pub selection: Option<Selection>,

    /// Chart and statistics for the current selection.
    pub report: Option<Result<Report, AnalysisError>>,

    /// Rows per class, most frequent first.
    pub class_counts: Vec<(String, usize)>,

    /// Class label colours.
    pub color_map: Option<ColorMap>,

    /// Error that stops the page (file or class column missing).
    pub load_error: Option<String>,

    /// Status / warning message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            source_path: None,
            features: Vec::new(),
            selection: None,
            report: None,
            class_counts: Vec::new(),
            color_map: None,
            load_error: None,
            status_message: None,
        }
    }

    /// Load the dataset named in the configuration.
    pub fn load_configured(&mut self) {
        let path = self.config.data_path.clone();
        self.load(&path);
    }

    /// Load a dataset from disk, replacing the current one on success and
    /// halting the page on failure.
    pub fn load(&mut self, path: &Path) {
        match prepare_dataset(path, &self.config) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows with columns {:?} from {}",
                    table.len(),
                    table.column_names,
                    path.display()
                );
                self.source_path = Some(path.to_path_buf());
                self.set_dataset(table);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.clear();
                self.load_error = Some(e.to_string());
            }
        }
    }

    fn clear(&mut self) {
        self.dataset = None;
        self.source_path = None;
        self.features.clear();
        self.selection = None;
        self.report = None;
        self.class_counts.clear();
        self.color_map = None;
        self.status_message = None;
    }

    /// Ingest a loaded dataset: classify columns, pick the default selection
    /// and compute the first report.
    pub fn set_dataset(&mut self, table: RecordTable) {
        let variant = self.config.variant;
        let class_column = self.config.class_column.as_str();

        if table.is_empty() {
            log::warn!("Dataset has no rows");
        }
        self.features = selectable_features(&table, class_column, variant.includes_boolean());
        self.class_counts = analysis::class_counts(&table, class_column);

        let mut labels: Vec<&str> = self.class_counts.iter().map(|(l, _)| l.as_str()).collect();
        labels.sort_unstable();
        self.color_map = Some(ColorMap::new(&labels));

        self.selection = self.features.first().and_then(|feature| {
            let chart = *variant.chart_kinds(feature.kind).first()?;
            Some(Selection {
                feature: feature.clone(),
                chart,
            })
        });

        self.status_message = if self.features.is_empty() {
            log::warn!("No plottable features in dataset");
            Some(if variant.includes_boolean() {
                "No numeric or boolean features found to plot.".to_string()
            } else {
                "No numeric features found for analysis.".to_string()
            })
        } else {
            None
        };

        log::info!("{} selectable feature(s)", self.features.len());
        self.load_error = None;
        self.dataset = Some(Arc::new(table));
        self.refresh();
    }

    /// Whether the page stops before drawing any chart.
    pub fn halted(&self) -> bool {
        self.load_error.is_some() || self.dataset.is_none() || self.features.is_empty()
    }

    /// Chart kinds offered for the selected feature.
    pub fn chart_options(&self) -> &'static [ChartKind] {
        match &self.selection {
            Some(sel) => self.config.variant.chart_kinds(sel.feature.kind),
            None => &[],
        }
    }

    /// Switch feature. The chart kind is kept when the new feature supports
    /// it, otherwise the first offered kind is used.
    pub fn select_feature(&mut self, name: &str) {
        let Some(feature) = self.features.iter().find(|f| f.name == name).cloned() else {
            log::warn!("Unknown feature '{name}'");
            return;
        };
        if self.selection.as_ref().is_some_and(|s| s.feature == feature) {
            return;
        }

        let options = self.config.variant.chart_kinds(feature.kind);
        let chart = match &self.selection {
            Some(sel) if options.contains(&sel.chart) => sel.chart,
            _ => match options.first() {
                Some(&chart) => chart,
                None => return,
            },
        };
        log::debug!("Selected feature '{name}' with {chart}");
        self.selection = Some(Selection { feature, chart });
        self.refresh();
    }

    pub fn select_chart(&mut self, chart: ChartKind) {
        let Some(selection) = &mut self.selection else {
            return;
        };
        if selection.chart == chart {
            return;
        }
        selection.chart = chart;
        log::debug!("Selected chart {chart}");
        self.refresh();
    }

    /// Recompute the report for the current selection.
    pub fn refresh(&mut self) {
        self.report = match (&self.dataset, &self.selection) {
            (Some(table), Some(selection)) => {
                let result = analysis::run(
                    table,
                    selection,
                    &self.config.class_column,
                    self.config.variant,
                );
                if let Err(e) = &result {
                    log::error!("Analysis failed: {e}");
                }
                Some(result)
            }
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;
    use crate::analysis::Variant;
    use crate::data::fixtures;

    fn state(variant: Variant) -> AppState {
        AppState::new(DashboardConfig {
            variant,
            ..DashboardConfig::default()
        })
    }

    fn write_csv(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("personality_dataset.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_class_column_halts_without_output() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "Age,Stage_fear\n25,True\n40,False\n");

        let mut state = state(Variant::Extended);
        state.load(&path);

        assert!(state.halted());
        assert!(state.load_error.as_deref().unwrap().contains("Personality"));
        assert!(state.report.is_none());
        assert!(state.features.is_empty());
    }

    #[test]
    fn missing_file_halts() {
        let dir = TempDir::new().unwrap();
        let mut state = state(Variant::Extended);
        state.load(&dir.path().join("nope.csv"));
        assert!(state.halted());
        assert!(state.report.is_none());
    }

    #[test]
    fn encoded_csv_is_mapped_and_reported() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "Personality,Age,Stage_fear\n0,25,True\n1,40,False\n0,30,False\n1,35,True\n",
        );

        let mut state = state(Variant::Extended);
        state.load(&path);

        assert!(!state.halted());
        let names: Vec<&str> = state.features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Age", "Stage_fear"]);
        assert_eq!(
            state.class_counts,
            vec![("Extrovert".to_string(), 2), ("Introvert".to_string(), 2)]
        );
        let report = state.report.as_ref().unwrap().as_ref().unwrap();
        assert_eq!(report.chart.kind, ChartKind::Boxplot);
        assert_eq!(report.summary.classes(), ["Extrovert", "Introvert"]);
    }

    #[test]
    fn switching_to_boolean_feature_resets_chart_kind() {
        let mut state = state(Variant::Extended);
        state.set_dataset(map_class_labels(&fixtures::encoded_table(), "Personality").unwrap());

        state.select_chart(ChartKind::ViolinPlot);
        state.select_feature("Stage_fear");
        assert_eq!(state.selection.as_ref().unwrap().chart, ChartKind::Countplot);
        assert_eq!(state.chart_options(), &[ChartKind::Countplot]);

        // Back to a numeric feature: Countplot is not offered, first kind wins.
        state.select_feature("Time_spent_Alone");
        assert_eq!(state.selection.as_ref().unwrap().chart, ChartKind::Boxplot);
        assert!(state.report.as_ref().unwrap().is_ok());
    }

    #[test]
    fn chart_kind_survives_numeric_to_numeric_switch() {
        let mut state = state(Variant::Classic);
        state.set_dataset(fixtures::labeled_table());

        state.select_chart(ChartKind::Histogram);
        state.select_feature("Time_spent_Alone");
        assert_eq!(state.selection.as_ref().unwrap().chart, ChartKind::Histogram);
        // Classic variant never offers boolean features.
        assert!(state.features.iter().all(|f| f.name != "Stage_fear"));
    }

    #[test]
    fn table_without_features_shows_warning() {
        let mut state = state(Variant::Extended);
        let table = RecordTable::new(
            vec!["Personality".into(), "Country".into()],
            vec![vec![
                crate::data::model::Value::Text("Extrovert".into()),
                crate::data::model::Value::Text("BR".into()),
            ]],
        );
        state.set_dataset(table);
        assert!(state.halted());
        assert!(state.status_message.is_some());
        assert!(state.report.is_none());
    }
}
