//! Note assembly: YAML front matter + templated Markdown sections for one problem.
//!
//! Everything here is a pure function of its inputs; the creation date is passed
//! in rather than read from the clock.

use chrono::NaiveDate;

use crate::domain::ProblemRecord;
use crate::markup;

/// Knobs the assembler reads from settings.
#[derive(Clone, Debug, PartialEq)]
pub struct NoteOptions {
  pub include_hints: bool,
  pub default_status: String,
  pub preferred_language: String,
}

impl Default for NoteOptions {
  fn default() -> Self {
    Self {
      include_hints: true,
      default_status: "todo".into(),
      preferred_language: "python3".into(),
    }
  }
}

/// `<display id>. <title>.md`. The title is used verbatim; characters that are
/// illegal in file names are not replaced.
pub fn note_filename(record: &ProblemRecord) -> String {
  format!("{}. {}.md", record.display_id, record.title)
}

/// Build the complete note text.
pub fn assemble(record: &ProblemRecord, source_url: &str, today: NaiveDate, options: &NoteOptions) -> String {
  let mut out = front_matter(record, source_url, today, options);

  let mut lines: Vec<String> = vec![
    format!("# {}. {}", record.display_id, record.title),
    String::new(),
    "## Problem Description".into(),
    String::new(),
    markup::convert(&record.description_markup),
    String::new(),
  ];

  if options.include_hints && !record.hints.is_empty() {
    lines.push("## Hints".into());
    lines.push(String::new());
    for (i, hint) in record.hints.iter().enumerate() {
      lines.push(format!("{}. {}", i + 1, hint));
    }
    lines.push(String::new());
  }

  lines.extend(
    [
      "## Solution",
      "",
      "### Approach",
      "",
      "<!-- Describe your approach here -->",
      "",
      "### Complexity Analysis",
      "",
      "- Time Complexity: ",
      "- Space Complexity: ",
      "",
      "### Code",
      "",
    ]
    .map(String::from),
  );

  if let Some(template) = record.template_for(&options.preferred_language) {
    lines.push(format!("```{}", fence_language(&template.lang_slug)));
    lines.push(template.code.clone());
    lines.push("```".into());
    lines.push(String::new());
  }

  lines.extend(["## Notes", "", "<!-- Add your notes here -->", ""].map(String::from));

  out.push_str(&lines.join("\n"));
  out
}

fn front_matter(record: &ProblemRecord, source_url: &str, today: NaiveDate, options: &NoteOptions) -> String {
  let tags = record
    .topic_tags
    .iter()
    .map(|t| quoted(t))
    .collect::<Vec<_>>()
    .join(", ");

  let mut lines = vec![
    "---".to_string(),
    format!("title: {}", quoted(&record.title)),
    format!("leetcode_id: {}", record.display_id),
    format!("difficulty: {}", record.difficulty),
    format!("tags: [{}]", tags),
    format!("acceptance_rate: {:.2}%", record.acceptance_rate),
    format!("url: {}", quoted(source_url)),
    format!("date_created: {}", today.format("%Y-%m-%d")),
    format!("status: {}", quoted(&options.default_status)),
    "done: false".into(),
    "time_taken_min: 0".into(),
    "num_tries: 0".into(),
    "---".into(),
  ];
  lines.push(String::new());
  lines.join("\n")
}

/// Double-quoted YAML scalar.
fn quoted(value: &str) -> String {
  format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Markdown fence info string for a LeetCode language slug.
fn fence_language(lang_slug: &str) -> &str {
  match lang_slug {
    "python3" | "python" | "pythondata" => "python",
    "golang" => "go",
    "csharp" => "cs",
    "mysql" | "mssql" | "oraclesql" | "postgresql" => "sql",
    other => other,
  }
}
