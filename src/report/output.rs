// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for printed/exported statistics

use crate::report::formatter::StatsFormatter;
use crate::report::stats::CatalogStats;
use anyhow::Result;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatsOutputFormat {
    Text,
    Json,
    Yaml,
}

impl StatsOutputFormat {
    pub fn serialize(&self, stats: &CatalogStats) -> Result<String> {
        match self {
            // Text goes through the formatter without colour codes.
            StatsOutputFormat::Text => Ok(StatsFormatter::plain().render(stats)),
            StatsOutputFormat::Json => Ok(serde_json::to_string_pretty(stats)?),
            StatsOutputFormat::Yaml => Ok(serde_yaml::to_string(stats)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    #[test]
    fn cli_names() {
        assert_eq!(
            StatsOutputFormat::from_str("yaml", true),
            Ok(StatsOutputFormat::Yaml)
        );
        assert!(StatsOutputFormat::from_str("nickel", true).is_err());
    }

    #[test]
    fn yaml_contains_fingerprint() {
        let table = Table::load_str(
            r#"<TS version="2.1" language="de"><context><name>C</name>
            <message><source>Yes</source><translation>Ja</translation></message>
            </context></TS>"#,
        )
        .expect("should load");
        let stats = table.stats();
        let yaml = StatsOutputFormat::Yaml
            .serialize(&stats)
            .expect("should serialize");
        assert!(yaml.contains(&stats.fingerprint));
        assert!(yaml.contains("locale: de"));
    }
}
