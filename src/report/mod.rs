// SPDX-License-Identifier: PMPL-1.0-or-later

//! Catalog statistics and their output formats

pub mod formatter;
pub mod output;
pub mod stats;

use anyhow::Result;
use std::fs;
use std::path::Path;

pub use formatter::StatsFormatter;
pub use output::StatsOutputFormat;
pub use stats::{CatalogStats, ContextStats, Counts};

/// Save statistics to file in the given format
pub fn save_stats<P: AsRef<Path>>(
    stats: &CatalogStats,
    format: StatsOutputFormat,
    path: P,
) -> Result<()> {
    fs::write(path.as_ref(), format.serialize(stats)?)?;
    Ok(())
}

/// Print statistics to console
pub fn print_stats(stats: &CatalogStats) {
    StatsFormatter::new().print(stats);
}
