//! Problem page address -> title slug used by the GraphQL API.
//!
//! Examples:
//!   https://leetcode.com/problems/two-sum/             -> two-sum
//!   https://leetcode.com/problems/two-sum/description/ -> two-sum

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static PROBLEM_PATH: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"/problems/([^/]+)").expect("valid problem path pattern"));

/// Extract the slug from a problem URL. Returns None when the input is not an
/// absolute URL or its path has no `/problems/<slug>` segment.
pub fn extract_slug(page_address: &str) -> Option<String> {
  let url = Url::parse(page_address.trim()).ok()?;
  PROBLEM_PATH
    .captures(url.path())
    .and_then(|c| c.get(1))
    .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
  use super::extract_slug;

  #[test]
  fn slug_from_canonical_urls() {
    assert_eq!(extract_slug("https://leetcode.com/problems/two-sum/").as_deref(), Some("two-sum"));
    assert_eq!(extract_slug("https://leetcode.com/problems/two-sum").as_deref(), Some("two-sum"));
    assert_eq!(
      extract_slug("https://leetcode.com/problems/two-sum/description/").as_deref(),
      Some("two-sum")
    );
    assert_eq!(
      extract_slug("https://leetcode.cn/problems/lru-cache/solutions/123/?envType=daily").as_deref(),
      Some("lru-cache")
    );
  }

  #[test]
  fn query_and_fragment_are_not_part_of_the_slug() {
    assert_eq!(
      extract_slug("https://leetcode.com/problems/add-two-numbers?tab=description#top").as_deref(),
      Some("add-two-numbers")
    );
  }

  #[test]
  fn non_problem_addresses_yield_none() {
    assert_eq!(extract_slug("https://leetcode.com/contest/weekly-contest-400/"), None);
    assert_eq!(extract_slug("https://leetcode.com/problems/"), None);
    assert_eq!(extract_slug("https://leetcode.com/"), None);
  }

  #[test]
  fn unparseable_input_yields_none() {
    assert_eq!(extract_slug(""), None);
    assert_eq!(extract_slug("two-sum"), None);
    assert_eq!(extract_slug("leetcode.com/problems/two-sum"), None);
  }
}
