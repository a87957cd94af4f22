// SPDX-License-Identifier: PMPL-1.0-or-later

//! Human-readable statistics output

use crate::report::stats::{CatalogStats, Counts};
use colored::*;

pub struct StatsFormatter {
    color: bool,
}

impl StatsFormatter {
    pub fn new() -> Self {
        Self { color: true }
    }

    /// A formatter that never emits ANSI escapes, for files.
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn print(&self, stats: &CatalogStats) {
        print!("{}", self.render(stats));
    }

    pub fn render(&self, stats: &CatalogStats) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "\n{}\n\n",
            self.paint("=== TRANSLATION CATALOG ===", |s| s.bold().cyan())
        ));

        out.push_str(&format!(
            "  Locale:      {}\n",
            stats.locale.as_deref().unwrap_or("(undeclared)")
        ));
        out.push_str(&format!("  TS version:  {}\n", stats.version));
        out.push_str(&format!(
            "  Unfinished:  {}\n",
            if stats.include_unfinished {
                "served"
            } else {
                "source fallback"
            }
        ));
        out.push_str(&format!(
            "  Fingerprint: {}\n",
            self.paint(&stats.fingerprint, |s| s.dimmed())
        ));
        out.push('\n');

        out.push_str(&format!("{}\n", self.paint("CONTEXTS", |s| s.bold().yellow())));
        if stats.contexts.is_empty() {
            out.push_str("  (none)\n");
        }
        let width = stats
            .contexts
            .iter()
            .map(|context| context.name.chars().count())
            .max()
            .unwrap_or(0);
        for context in &stats.contexts {
            out.push_str(&format!(
                "  {:<width$}  {}\n",
                context.name,
                self.counts_line(&context.counts),
                width = width
            ));
        }
        out.push('\n');

        out.push_str(&format!("{}\n", self.paint("TOTAL", |s| s.bold().yellow())));
        out.push_str(&format!("  {}\n", self.counts_line(&stats.totals)));

        if !stats.warnings.is_empty() {
            out.push('\n');
            out.push_str(&format!("{}\n", self.paint("WARNINGS", |s| s.bold().red())));
            for warning in &stats.warnings {
                out.push_str(&format!("  - {}\n", warning));
            }
        }
        out.push('\n');
        out
    }

    fn counts_line(&self, counts: &Counts) -> String {
        let coverage = counts.coverage();
        let coverage_text = format!("{:.1}%", coverage);
        let coverage_text = if coverage >= 95.0 {
            self.paint(&coverage_text, |s| s.green())
        } else if coverage >= 50.0 {
            self.paint(&coverage_text, |s| s.yellow())
        } else {
            self.paint(&coverage_text, |s| s.red())
        };
        format!(
            "{} messages, {} translated ({}), {} empty, {} unfinished, {} obsolete",
            counts.messages,
            counts.translated,
            coverage_text,
            counts.empty,
            counts.unfinished,
            counts.obsolete
        )
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for StatsFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    #[test]
    fn plain_render_has_no_escapes() {
        let table = Table::load_str(
            r#"<TS version="2.1" language="ja_JP"><context><name>ConfigDialog</name>
            <message><source>Table</source><translation>テーブル</translation></message>
            <message><source>-</source><translation></translation></message>
            </context></TS>"#,
        )
        .expect("should load");
        let text = StatsFormatter::plain().render(&table.stats());
        assert!(!text.contains('\u{1b}'));
        assert!(text.contains("ConfigDialog"));
        assert!(text.contains("2 messages, 1 translated (50.0%), 1 empty"));
    }
}
