//! HTML -> Markdown for the description fragments LeetCode serves.
//!
//! The conversion is an ordered pipeline of small rewrite steps. Every step is a
//! plain `fn(&str) -> String`; `convert` folds the input through them in order.
//! Order matters: structural rules run before the catch-all tag strip, and
//! entities are decoded only once no tags are left to confuse the patterns.
//!
//! Only the subset LeetCode emits is handled. Nested tags of the same kind
//! (bold inside bold) are not guaranteed to come out right.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// One named rewrite step.
pub struct RewriteStep {
  pub name: &'static str,
  pub apply: fn(&str) -> String,
}

/// Steps in application order.
pub const PIPELINE: &[RewriteStep] = &[
  RewriteStep { name: "strip_style", apply: strip_style },
  RewriteStep { name: "paragraphs", apply: paragraphs },
  RewriteStep { name: "bold", apply: bold },
  RewriteStep { name: "italic", apply: italic },
  RewriteStep { name: "inline_code", apply: inline_code },
  RewriteStep { name: "preformatted", apply: preformatted },
  RewriteStep { name: "list_containers", apply: list_containers },
  RewriteStep { name: "list_items", apply: list_items },
  RewriteStep { name: "links", apply: links },
  RewriteStep { name: "headings", apply: headings },
  RewriteStep { name: "superscript", apply: superscript },
  RewriteStep { name: "strip_tags", apply: strip_tags },
  RewriteStep { name: "decode_entities", apply: decode_entities },
  RewriteStep { name: "collapse_newlines", apply: collapse_newlines },
  RewriteStep { name: "trim", apply: trim },
];

/// Convert an HTML fragment to Markdown. Never fails; malformed markup is
/// rewritten on a best-effort basis.
pub fn convert(html: &str) -> String {
  PIPELINE.iter().fold(html.to_string(), |text, step| (step.apply)(&text))
}

// Tag names are matched as whole words so `<p` never eats `<pre>` and `<b` never eats `<br>`.
fn re(pattern: &str) -> Regex {
  Regex::new(pattern).expect("valid markup pattern")
}

static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| re(r"(?is)<style\b[^>]*>.*?</style\s*>"));
static P_OPEN: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<p\b[^>]*>"));
static P_CLOSE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)</p\s*>"));
static STRONG: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<strong\b[^>]*>(.*?)</strong\s*>"));
static B: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<b\b[^>]*>(.*?)</b\s*>"));
static EM: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<em\b[^>]*>(.*?)</em\s*>"));
static I: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<i\b[^>]*>(.*?)</i\s*>"));
static CODE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<code\b[^>]*>(.*?)</code\s*>"));
static PRE: LazyLock<Regex> = LazyLock::new(|| re(r"(?is)<pre\b[^>]*>(.*?)</pre\s*>"));
static LIST_CONTAINER: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)</?(?:ul|ol)\b[^>]*>"));
static LI_OPEN: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<li\b[^>]*>"));
static LI_CLOSE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)</li\s*>"));
static ANCHOR: LazyLock<Regex> =
  LazyLock::new(|| re(r#"(?i)<a\b[^>]*\bhref="([^"]*)"[^>]*>(.*?)</a\s*>"#));
static HEADINGS: LazyLock<Vec<(Regex, String)>> = LazyLock::new(|| {
  (1..=4)
    .map(|level| {
      let pattern = format!(r"(?i)<h{level}\b[^>]*>(.*?)</h{level}\s*>");
      let replacement = format!("{} ${{1}}\n", "#".repeat(level));
      (re(&pattern), replacement)
    })
    .collect()
});
static SUP: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<sup\b[^>]*>(.*?)</sup\s*>"));
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| re(r"<[^>]+>"));
static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| re(r"\n{3,}"));

fn replace(pattern: &Regex, text: &str, replacement: &str) -> String {
  pattern.replace_all(text, replacement).into_owned()
}

pub fn strip_style(text: &str) -> String {
  replace(&STYLE_BLOCK, text, "")
}

pub fn paragraphs(text: &str) -> String {
  let text = replace(&P_OPEN, text, "\n");
  replace(&P_CLOSE, &text, "\n")
}

pub fn bold(text: &str) -> String {
  let text = replace(&STRONG, text, "**${1}**");
  replace(&B, &text, "**${1}**")
}

pub fn italic(text: &str) -> String {
  let text = replace(&EM, text, "*${1}*");
  replace(&I, &text, "*${1}*")
}

pub fn inline_code(text: &str) -> String {
  replace(&CODE, text, "`${1}`")
}

/// Fence `<pre>` blocks. Tags nested inside the block are dropped, not converted.
pub fn preformatted(text: &str) -> String {
  PRE
    .replace_all(text, |caps: &Captures| {
      format!("\n```\n{}\n```\n", ANY_TAG.replace_all(&caps[1], ""))
    })
    .into_owned()
}

pub fn list_containers(text: &str) -> String {
  replace(&LIST_CONTAINER, text, "\n")
}

pub fn list_items(text: &str) -> String {
  let text = replace(&LI_OPEN, text, "- ");
  replace(&LI_CLOSE, &text, "\n")
}

pub fn links(text: &str) -> String {
  replace(&ANCHOR, text, "[${2}](${1})")
}

pub fn headings(text: &str) -> String {
  HEADINGS
    .iter()
    .fold(text.to_string(), |acc, (pattern, replacement)| replace(pattern, &acc, replacement))
}

pub fn superscript(text: &str) -> String {
  replace(&SUP, text, "^${1}^")
}

pub fn strip_tags(text: &str) -> String {
  replace(&ANY_TAG, text, "")
}

/// `&amp;` is decoded after `&lt;`/`&gt;` so `&amp;lt;` stays a literal `&lt;`.
pub fn decode_entities(text: &str) -> String {
  text
    .replace("&nbsp;", " ")
    .replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&amp;", "&")
    .replace("&quot;", "\"")
    .replace("&#39;", "'")
}

pub fn collapse_newlines(text: &str) -> String {
  replace(&BLANK_RUN, text, "\n\n")
}

pub fn trim(text: &str) -> String {
  text.trim().to_string()
}
