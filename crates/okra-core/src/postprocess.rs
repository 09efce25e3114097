//! Answer post-processing: actionable items and related questions.
//!
//! Actionable extraction is deliberately shallow - fixed keyword rules over
//! sentences, no NLP. A sentence matching several rules yields several items,
//! one per matched framing. Related questions come from a fixed lookup per
//! query domain plus one canned question per source kind actually used.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::{ActionItem, ActionKind, ActionPriority, QueryContext, QueryDomain, SourceKind};

/// Maximum action items per answer.
pub const MAX_ACTION_ITEMS: usize = 5;

/// Maximum related questions per answer.
pub const MAX_RELATED_QUESTIONS: usize = 5;

/// Sentences at or below this length carry no actionable signal.
const MIN_SENTENCE_LEN: usize = 20;

/// Maximum description length before truncation.
const MAX_DESCRIPTION_LEN: usize = 200;

// ============================================================================
// Actionable extraction
// ============================================================================

/// One keyword rule: pattern, resulting kind, resulting priority.
struct ActionRule {
    pattern: Regex,
    kind: ActionKind,
    priority: ActionPriority,
}

/// The four fixed keyword rules, tested in order per sentence.
fn action_rules() -> &'static [ActionRule] {
    static RULES: OnceLock<Vec<ActionRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            ActionRule {
                pattern: Regex::new(r"(?i)\b(recommend|suggest|should)\b").expect("static regex"),
                kind: ActionKind::Recommendation,
                priority: ActionPriority::Medium,
            },
            ActionRule {
                pattern: Regex::new(r"(?i)\b(investigate|analyze|review)\b").expect("static regex"),
                kind: ActionKind::Investigation,
                priority: ActionPriority::Medium,
            },
            ActionRule {
                pattern: Regex::new(r"(?i)\b(decide|determine|choose)\b").expect("static regex"),
                kind: ActionKind::Decision,
                priority: ActionPriority::High,
            },
            ActionRule {
                pattern: Regex::new(r"(?i)\b(urgent|critical|immediate)\b").expect("static regex"),
                kind: ActionKind::Recommendation,
                priority: ActionPriority::High,
            },
        ]
    })
}

/// Extract actionable items from an answer.
///
/// Splits on sentence punctuation, tests each sentence longer than 20
/// characters against the keyword rules, and caps the output at
/// [`MAX_ACTION_ITEMS`] in sentence order. A sentence matching multiple rules
/// yields one item per rule; each matched rule is a distinct actionable
/// framing, so duplicates are accepted.
pub fn extract_action_items(answer: &str) -> Vec<ActionItem> {
    let mut items = Vec::new();

    'sentences: for sentence in answer.split(['.', '!', '?']) {
        let sentence = sentence.trim();
        if sentence.len() <= MIN_SENTENCE_LEN {
            continue;
        }

        for rule in action_rules() {
            if rule.pattern.is_match(sentence) {
                items.push(ActionItem {
                    kind: rule.kind,
                    priority: rule.priority,
                    description: truncate_description(sentence),
                    owner: None,
                });
                if items.len() >= MAX_ACTION_ITEMS {
                    break 'sentences;
                }
            }
        }
    }

    items
}

/// Truncate a description to [`MAX_DESCRIPTION_LEN`] characters with an
/// ellipsis. Character-based so multi-byte text cannot split mid-codepoint.
fn truncate_description(sentence: &str) -> String {
    if sentence.chars().count() <= MAX_DESCRIPTION_LEN {
        return sentence.to_string();
    }
    let mut truncated: String = sentence.chars().take(MAX_DESCRIPTION_LEN).collect();
    truncated.push_str("...");
    truncated
}

// ============================================================================
// Related questions
// ============================================================================

/// Three canned follow-up questions per query domain.
fn domain_questions(domain: QueryDomain) -> [&'static str; 3] {
    match domain {
        QueryDomain::Strategic => [
            "What strategic initiatives are currently at risk?",
            "How do our strategic goals align with recent performance?",
            "Which market trends should inform the next planning cycle?",
        ],
        QueryDomain::Operational => [
            "Which operational bottlenecks are costing us the most?",
            "How has process efficiency changed this quarter?",
            "Where are service levels slipping?",
        ],
        QueryDomain::Financial => [
            "How does spending compare against budget this quarter?",
            "Which cost centers are growing fastest?",
            "What is driving the variance in margin?",
        ],
        QueryDomain::Risk => [
            "Which identified risks lack a mitigation owner?",
            "How exposed are we to our top three risks?",
            "What early-warning indicators should we monitor?",
        ],
        QueryDomain::Innovation => [
            "Which experiments showed the strongest signal this quarter?",
            "Where is the innovation pipeline thinnest?",
            "What capabilities would unlock the next product bet?",
        ],
    }
}

/// One canned follow-up question per source kind.
fn kind_question(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Insight => "What other insights relate to this topic?",
        SourceKind::Evidence => "What evidence supports these findings?",
        SourceKind::Kpi => "Which KPIs are underperforming and need attention?",
        SourceKind::Scenario => "Which scenarios should we prepare for next?",
        SourceKind::Recommendation => "Which open recommendations should be prioritized?",
    }
}

/// Build the related-question list for a query.
///
/// Domain questions first, then one question per distinct source kind among
/// the ranked sources. Deduplicated by exact string match, capped at
/// [`MAX_RELATED_QUESTIONS`].
pub fn related_questions(context: &QueryContext, kinds: &BTreeSet<SourceKind>) -> Vec<String> {
    let mut questions: Vec<String> = Vec::new();

    if let Some(domain) = context.domain {
        for question in domain_questions(domain) {
            push_unique(&mut questions, question);
        }
    }

    for kind in kinds {
        push_unique(&mut questions, kind_question(*kind));
    }

    questions.truncate(MAX_RELATED_QUESTIONS);
    questions
}

/// The fixed generic question set for the insufficient-context response.
pub fn generic_related_questions() -> Vec<String> {
    vec![
        "What data is currently tracked for this organization?".to_string(),
        "Which business areas have recorded insights?".to_string(),
        "What KPIs are being monitored?".to_string(),
    ]
}

fn push_unique(questions: &mut Vec<String>, question: &str) {
    if !questions.iter().any(|q| q == question) {
        questions.push(question.to_string());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_recommendation_sentence() {
        let items =
            extract_action_items("We should renegotiate the enterprise pricing tiers. Sales are stable.");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, ActionKind::Recommendation);
        assert_eq!(items[0].priority, ActionPriority::Medium);
        assert!(items[0].description.contains("renegotiate"));
    }

    #[test]
    fn test_short_sentences_are_skipped() {
        let items = extract_action_items("You should go. Fix it now!");
        assert!(items.is_empty());
    }

    #[test]
    fn test_multi_rule_sentence_yields_multiple_items() {
        let items = extract_action_items(
            "It is urgent that we investigate the billing discrepancies in the EU region.",
        );

        let kinds: Vec<ActionKind> = items.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![ActionKind::Investigation, ActionKind::Recommendation]
        );
        assert_eq!(items[1].priority, ActionPriority::High);
    }

    #[test]
    fn test_decision_rule_is_high_priority() {
        let items = extract_action_items("Leadership must decide between the two vendor proposals.");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, ActionKind::Decision);
        assert_eq!(items[0].priority, ActionPriority::High);
    }

    #[test]
    fn test_keyword_requires_word_boundary() {
        // "shoulder" must not trigger the "should" rule.
        let items = extract_action_items("The shoulder season slowed bookings across all regions.");
        assert!(items.is_empty());
    }

    #[test]
    fn test_caps_at_five_items() {
        let answer = "We should expand into new markets immediately because of this. "
            .repeat(10);
        let items = extract_action_items(&answer);
        assert_eq!(items.len(), MAX_ACTION_ITEMS);
    }

    #[test]
    fn test_long_description_truncated_with_ellipsis() {
        let sentence = format!("We should {}", "x".repeat(400));
        let items = extract_action_items(&sentence);
        assert_eq!(items[0].description.chars().count(), 203);
        assert!(items[0].description.ends_with("..."));
    }

    #[test]
    fn test_related_questions_domain_plus_kinds() {
        let context =
            QueryContext::new("q", "org-1").with_domain(QueryDomain::Financial);
        let kinds: BTreeSet<SourceKind> = [SourceKind::Kpi].into_iter().collect();

        let questions = related_questions(&context, &kinds);

        assert_eq!(questions.len(), 4);
        assert!(questions
            .contains(&"Which KPIs are underperforming and need attention?".to_string()));
    }

    #[test]
    fn test_related_questions_capped_at_five() {
        let context = QueryContext::new("q", "org-1").with_domain(QueryDomain::Risk);
        let kinds: BTreeSet<SourceKind> = [
            SourceKind::Insight,
            SourceKind::Evidence,
            SourceKind::Kpi,
            SourceKind::Scenario,
        ]
        .into_iter()
        .collect();

        let questions = related_questions(&context, &kinds);
        assert_eq!(questions.len(), MAX_RELATED_QUESTIONS);
    }

    #[test]
    fn test_related_questions_no_duplicates() {
        let context = QueryContext::new("q", "org-1").with_domain(QueryDomain::Operational);
        let kinds: BTreeSet<SourceKind> = [
            SourceKind::Insight,
            SourceKind::Evidence,
            SourceKind::Kpi,
            SourceKind::Scenario,
            SourceKind::Recommendation,
        ]
        .into_iter()
        .collect();

        let questions = related_questions(&context, &kinds);
        let mut deduped = questions.clone();
        deduped.dedup();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), questions.len());
        assert!(questions.len() <= MAX_RELATED_QUESTIONS);
    }

    #[test]
    fn test_no_domain_yields_kind_questions_only() {
        let context = QueryContext::new("q", "org-1");
        let kinds: BTreeSet<SourceKind> =
            [SourceKind::Insight, SourceKind::Evidence].into_iter().collect();

        let questions = related_questions(&context, &kinds);
        assert_eq!(questions.len(), 2);
    }

    #[test]
    fn test_generic_questions_are_small_fixed_set() {
        let questions = generic_related_questions();
        assert!(!questions.is_empty());
        assert!(questions.len() <= MAX_RELATED_QUESTIONS);
    }
}
