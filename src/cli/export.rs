use std::path::PathBuf;

use chrono::Local;
use clap::ValueEnum;

use crate::{error, export as render, success, types::Limit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    /// Raw track data
    #[default]
    Csv,
    /// Plain-text summary report
    Report,
}

pub async fn export(limit: Limit, format: ExportFormat, output: Option<PathBuf>) {
    let history = super::fetch_history(limit).await;
    if history.is_empty() {
        return;
    }

    let (contents, default_name) = match format {
        ExportFormat::Csv => (render::to_csv(&history), render::csv_file_name(limit)),
        ExportFormat::Report => (
            render::summary_report(&history, Local::now()),
            render::report_file_name(render::today()),
        ),
    };

    let path = output.unwrap_or_else(|| PathBuf::from(default_name));
    if let Err(e) = async_fs::write(&path, contents).await {
        error!("Failed to write {}. Err: {}", path.display(), e);
    }

    success!("Exported {} tracks to {}", history.len(), path.display());
}
