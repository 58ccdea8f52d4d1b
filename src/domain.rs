//! Domain models: the problem record built from one API response and its code templates.

/// Starter code for one language, as listed by the problem page.
#[derive(Clone, Debug, PartialEq)]
pub struct CodeTemplate {
  pub lang_slug: String,   // lookup key, e.g. "python3"
  pub lang_label: String,  // display label, e.g. "Python3"
  pub code: String,
}

/// One imported problem. Built once per import from the API response and never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct ProblemRecord {
  pub id: String,
  pub display_id: String,
  pub title: String,
  pub slug: String,
  pub difficulty: String,   // free-form ("Easy", "Medium", "Hard", ...)
  pub description_markup: String,
  pub topic_tags: Vec<String>,
  pub code_templates: Vec<CodeTemplate>,
  pub hints: Vec<String>,
  pub example_input: String,
  pub acceptance_rate: f64,

  // Kept from the response but not rendered anywhere.
  pub stats: String,
  pub similar_questions: String,
  pub company_tags: Vec<String>,
}

impl ProblemRecord {
  /// Starter code for `lang_slug`, if the problem ships one.
  pub fn template_for(&self, lang_slug: &str) -> Option<&CodeTemplate> {
    self.code_templates.iter().find(|t| t.lang_slug == lang_slug)
  }
}
