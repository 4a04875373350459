/// Recovering a human-readable answer from an agent run log.
///
/// The run log is not a stable structured contract, so extraction is an
/// ordered cascade of heuristics, most specific first. Each rule is a
/// (matcher, transform) pair; the first rule that produces text wins, and a
/// generic fallback covers logs no rule understands.

use once_cell::sync::Lazy;
use regex::Regex;

/// Returned when no rule matches the log
pub const FALLBACK_MESSAGE: &str =
    "Task completed. The browser agent executed the search but couldn't format a clean result.";

static DONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"ActionResult\(is_done=True, success=True, extracted_content=['"](.+?)['"]"#)
        .expect("done regex")
});

// Label rules capture text up to the next INFO log token
static RESULT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Result: (.+?)INFO").expect("result regex"));
static FOUND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Successfully found (.+?)INFO").expect("found regex"));
static CHEAPEST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)The 3 cheapest (.+?)INFO").expect("cheapest regex"));

static EXTRACTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Extracted from page.*?```json(.*?)```").expect("extraction regex"));

/// One step of the extraction cascade
struct ExtractRule {
    name: &'static str,
    apply: fn(&str) -> Option<String>,
}

static RULES: &[ExtractRule] = &[
    ExtractRule { name: "done-marker", apply: done_marker },
    ExtractRule { name: "result-label", apply: result_label },
    ExtractRule { name: "found-label", apply: found_label },
    ExtractRule { name: "cheapest-label", apply: cheapest_label },
    ExtractRule { name: "page-extraction", apply: page_extraction },
];

/// Recover a single readable answer from the rendered run log.
/// Never fails; logs nothing recognizable yield the generic fallback.
pub fn extract_result_text(log: &str) -> String {
    for rule in RULES {
        if let Some(text) = (rule.apply)(log) {
            log::debug!("extraction rule '{}' matched", rule.name);
            return text;
        }
    }
    FALLBACK_MESSAGE.to_string()
}

/// Terminal ActionResult record of a successful run; returned exactly
fn done_marker(log: &str) -> Option<String> {
    DONE_RE.captures(log).map(|c| c[1].to_string())
}

fn result_label(log: &str) -> Option<String> {
    labeled(&RESULT_RE, log)
}

fn found_label(log: &str) -> Option<String> {
    labeled(&FOUND_RE, log)
}

fn cheapest_label(log: &str) -> Option<String> {
    labeled(&CHEAPEST_RE, log)
}

fn labeled(re: &Regex, log: &str) -> Option<String> {
    re.captures(log).map(|c| c[1].trim().to_string())
}

/// Last fenced json block after an "Extracted from page" marker
fn page_extraction(log: &str) -> Option<String> {
    EXTRACTION_RE
        .captures_iter(log)
        .last()
        .map(|c| format!("Raw data extracted: {}", &c[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_done_marker_returns_embedded_content() {
        let log = "INFO [agent] ActionResult(is_done=True, success=True, \
                   extracted_content='The 3 cheapest flights are A, B, C')";
        assert_eq!(
            extract_result_text(log),
            "The 3 cheapest flights are A, B, C"
        );
    }

    #[test]
    fn test_done_marker_with_double_quotes() {
        let log = r#"ActionResult(is_done=True, success=True, extracted_content="42 results")"#;
        assert_eq!(extract_result_text(log), "42 results");
    }

    #[test]
    fn test_result_label_trimmed() {
        let log = "INFO [agent] Result:  Paris is the capital of France \nINFO [agent] shutting down";
        assert_eq!(extract_result_text(log), "Paris is the capital of France");
    }

    #[test]
    fn test_result_label_spans_lines() {
        let log = "Result: line one\nline two\nINFO done";
        assert_eq!(extract_result_text(log), "line one\nline two");
    }

    #[test]
    fn test_successfully_found_label() {
        let log = "INFO [agent] Successfully found 3 hotels under $100 INFO [agent] done";
        assert_eq!(extract_result_text(log), "3 hotels under $100");
    }

    #[test]
    fn test_cheapest_label() {
        let log = "INFO [agent] The 3 cheapest flights: LH101, BA202, AF303 INFO [agent] done";
        assert_eq!(extract_result_text(log), "flights: LH101, BA202, AF303");
    }

    #[test]
    fn test_done_marker_wins_over_labels() {
        let log = "INFO [agent] Result: partial text\nINFO [agent] \
                   ActionResult(is_done=True, success=True, extracted_content='final answer')";
        assert_eq!(extract_result_text(log), "final answer");
    }

    #[test]
    fn test_last_extraction_block_wins() {
        let log = "INFO Extracted from page\n```json\n{\"a\": 1}\n```\n\
                   INFO Extracted from page\n```json\n{\"b\": 2}\n```";
        assert_eq!(extract_result_text(log), "Raw data extracted: \n{\"b\": 2}\n");
    }

    #[test]
    fn test_unrecognized_log_yields_fallback() {
        assert_eq!(extract_result_text("WARN nothing of interest here"), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_empty_log_yields_fallback() {
        assert_eq!(extract_result_text(""), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_result_label_without_terminator_falls_through() {
        // a trailing Result record with no following INFO token is not matched
        let log = "Result: dangling text with no log token after it";
        assert_eq!(extract_result_text(log), FALLBACK_MESSAGE);
    }
}
