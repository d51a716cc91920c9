//! Text report assembly, section renderers and the influence plot.

mod plot;
mod summary;
mod table;

pub use plot::{render_influence_plot, PlotError, MIN_PLOT_SIZE};
pub use summary::{
    base_levels, breusch_pagan_section, categorical_table, cleaning_summary, dataset_info,
    descriptive_table, format_value, influence_section, model_summary, percent_effects, vif_table,
};
pub use table::{Align, MarkdownTable};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One headed block of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

/// Ordered report text plus the images written alongside it.
#[derive(Debug, Clone, Default)]
pub struct Report {
    sections: Vec<Section>,
    images: Vec<PathBuf>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, heading: impl Into<String>, body: impl Into<String>) {
        self.sections.push(Section {
            heading: heading.into(),
            body: body.into(),
        });
    }

    pub fn add_image(&mut self, path: impl Into<PathBuf>) {
        self.images.push(path.into());
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str(&format!("--- {} ---\n", section.heading));
            if !section.body.is_empty() {
                out.push_str(section.body.trim_end());
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    /// Write the rendered report, replacing any existing file.
    pub fn persist(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.render())
    }
}
