use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{display_float, ComponentValue, RubricResult};

/// One row of the tabular export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Criterion")]
    pub criterion: String,
    #[serde(rename = "Score Attained")]
    pub score_attained: Option<f64>,
    #[serde(rename = "Max Score")]
    pub max_score: Option<f64>,
    #[serde(rename = "Feedback")]
    pub feedback: String,
}

/// One row per criterion followed by the sentence count, duration and overall rows
pub fn export_rows(result: &RubricResult) -> Vec<ExportRow> {
    let mut rows: Vec<ExportRow> = result
        .per_criterion
        .iter()
        .map(|c| ExportRow {
            criterion: c.name.clone(),
            score_attained: Some(c.score),
            max_score: Some(c.max_score as f64),
            feedback: c.feedback.clone(),
        })
        .collect();

    rows.push(ExportRow {
        criterion: "Sentence Count".to_string(),
        score_attained: Some(result.sentence_count as f64),
        max_score: None,
        feedback: String::new(),
    });
    rows.push(ExportRow {
        criterion: "Duration Seconds (user-entered)".to_string(),
        score_attained: result.duration_seconds_used,
        max_score: None,
        feedback: String::new(),
    });
    rows.push(ExportRow {
        criterion: "Overall".to_string(),
        score_attained: Some(result.totals.attained),
        max_score: Some(result.totals.possible as f64),
        feedback: format!("Overall percent: {}", display_float(result.overall_score)),
    });

    rows
}

/// Write the export rows as CSV (header: Criterion, Score Attained, Max Score, Feedback)
pub fn write_csv<W: Write>(result: &RubricResult, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in export_rows(result) {
        csv_writer
            .serialize(&row)
            .context("Failed to write export row")?;
    }
    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Write the export rows to a CSV file
pub fn write_csv_file(result: &RubricResult, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    write_csv(result, file)
}

/// Write the structured payload to a JSON file
pub fn write_json(result: &RubricResult, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, result).context("Failed to write JSON")?;
    Ok(())
}

/// Human-readable score report
pub struct ScoreReport<'a> {
    result: &'a RubricResult,
    generated_at: String,
}

impl<'a> ScoreReport<'a> {
    pub fn new(result: &'a RubricResult) -> Self {
        Self {
            result,
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Format the report as text
    pub fn format(&self) -> String {
        let result = self.result;
        let mut output = String::new();

        output.push_str("Introduction Rubric Report\n");
        output.push_str("==========================\n");
        output.push_str(&format!("Generated: {}\n", self.generated_at));
        output.push_str(&format!(
            "Overall score: {} / 100\n",
            display_float(result.overall_score)
        ));
        output.push_str(&format!(
            "Words: {}  Sentences: {}  Duration: {}\n\n",
            result.word_count,
            result.sentence_count,
            result
                .duration_seconds_used
                .map(|d| format!("{}s", display_float(d)))
                .unwrap_or_else(|| "not given (assumed 60s)".to_string())
        ));

        for criterion in &result.per_criterion {
            output.push_str(&format!(
                "{} [{}/{}]\n",
                criterion.name,
                display_float(criterion.score),
                criterion.max_score
            ));

            for (label, value) in criterion.components.iter() {
                let value = match value {
                    ComponentValue::Number(n) => display_float(*n),
                    ComponentValue::Label(s) => s.clone(),
                };
                output.push_str(&format!("  - {}: {}\n", label, value));
            }

            output.push_str(&indent(&wrap_text(&criterion.feedback, 76), "  "));
            output.push_str("\n\n");
        }

        output.push_str(&format!(
            "Total: {} / {}\n",
            display_float(result.totals.attained),
            result.totals.possible
        ));

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap text at approximately the given width
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        if line_len + word.len() + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word.len();
    }

    result
}
