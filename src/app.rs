//! Application state: the form, the displayed chart and the persistence adapter.
//!
//! Front ends (CLI, GUI) own one [`App`] and drive it with `restore` once at
//! start-up, `submit` per user submit and `export` per export request.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::error::ChartError;
use crate::export::{self, ExportFormat, ExportOutcome};
use crate::form::FormInput;
use crate::layout;
use crate::models::LayoutConfig;
use crate::scene::DrawingTree;
use crate::storage::StateStore;

/// The chart currently on display, with the title it was generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub title: String,
    pub tree: DrawingTree,
}

impl RenderedChart {
    /// Default export file name for this chart.
    pub fn file_name(&self, format: ExportFormat) -> String {
        export::export_file_name(&self.title, format)
    }
}

#[derive(Debug)]
pub struct App {
    pub form: FormInput,
    config: LayoutConfig,
    chart: Option<RenderedChart>,
    store: Option<StateStore>,
}

impl App {
    /// `store = None` disables persistence.
    pub fn new(config: LayoutConfig, store: Option<StateStore>) -> Self {
        Self {
            form: FormInput::default(),
            config,
            chart: None,
            store,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn chart(&self) -> Option<&RenderedChart> {
        self.chart.as_ref()
    }

    pub fn tree(&self) -> Option<&DrawingTree> {
        self.chart.as_ref().map(|c| &c.tree)
    }

    /// Load the saved form and side labels, fill the fields and redraw its chart.
    ///
    /// Returns whether a chart is now displayed. Saved data that no longer
    /// validates fills the form but draws nothing.
    pub fn restore(&mut self) -> Result<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        let Some(state) = store.load()? else {
            return Ok(false);
        };
        self.form = FormInput::from(state);
        if let Some(labels) = store.load_labels()? {
            self.config.labels = labels;
        }
        match self.draw() {
            Ok(chart) => {
                self.chart = Some(chart);
                Ok(true)
            }
            Err(e) => {
                log::warn!("saved chart inputs no longer render: {e}");
                Ok(false)
            }
        }
    }

    fn draw(&self) -> Result<RenderedChart, ChartError> {
        let request = self.form.submit()?;
        let tree = layout::layout(&request, &self.config)?;
        Ok(RenderedChart {
            title: request.title,
            tree,
        })
    }

    /// Validate the form, lay out a fresh chart, save the inputs and replace the display.
    ///
    /// On error nothing changes: no chart is replaced and nothing is saved.
    pub fn submit(&mut self) -> Result<&RenderedChart, ChartError> {
        let chart = self.draw()?;
        if let Some(store) = &self.store
            && let Err(e) =
                store.save_with_labels(&self.form.to_state(), Some(&self.config.labels))
        {
            log::warn!("could not save chart inputs: {e:#}");
        }
        Ok(&*self.chart.insert(chart))
    }

    /// Export the displayed chart to `path`. No-op when nothing is displayed.
    pub fn export<P: AsRef<Path>>(&self, path: P, format: ExportFormat) -> Result<ExportOutcome> {
        export::export(self.tree(), path, format)
    }

    /// Export into `dir` under the default `chart_<title>` name.
    pub fn export_into<P: AsRef<Path>>(&self, dir: P, format: ExportFormat) -> Result<ExportOutcome> {
        match &self.chart {
            Some(chart) => self.export(dir.as_ref().join(chart.file_name(format)), format),
            None => Ok(ExportOutcome::NothingToExport),
        }
    }

    /// Where the state store lives, if persistence is on.
    pub fn state_path(&self) -> Option<PathBuf> {
        self.store.as_ref().map(|s| s.path().to_path_buf())
    }
}
