//! Structured parsing of examiner critiques.
//!
//! The examiner model is asked for a fixed layout (`Score: X/10`, then
//! "Strong points", "Missing or incorrect", "Feedback" and a closing
//! `Condition:` line) but rarely follows it exactly: emphasis markers,
//! bullet glyphs, header casing and section order all drift. Parsing is
//! therefore best-effort and never fails. Anything that cannot be found
//! degrades to an empty list or `None`.
//!
//! Each section is located independently by its own header, using a small
//! table of header/terminator pairs, so the sections may appear in any
//! order.

use std::sync::LazyLock;

use patsim_core::models::evaluation::{EvaluationReport, SectionKind};
use regex::Regex;
use tracing::debug;

static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*_`]+").expect("valid emphasis regex"));

static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)score:\s*(\d+)\s*/\s*10").expect("valid score regex"));

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-+•*]+\.?\s*").expect("valid bullet regex"));

static CONDITION_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t>#\-+•]*(?:(?:actual|true|final)\s+)?(?:condition|diagnosis)(?:\s+name)?\s*:[ \t]*(\S[^\n]*)$",
    )
    .expect("valid condition line regex")
});

static CONDITION_SENTENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:actual|true)\s+(?:condition|diagnosis)\s+(?:is|was)\s+([^\n.]+)")
        .expect("valid condition sentence regex")
});

/// Leading whitespace, bullet glyphs and Markdown heading/quote markers
/// allowed before a header word.
const HEADER_LEAD: &str = r"[ \t>#\-+•]*";

const STRENGTHS_HEADER: &str = r"strong points:";
const MISSING_HEADER: &str = r"missing(?: or incorrect)?:";
const FEEDBACK_HEADER: &str = r"feedback:";

/// A line that only carries structure: a bare section header or the score.
static STRUCTURAL_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^[>#\s]*(?:{STRENGTHS_HEADER}|{MISSING_HEADER}|{FEEDBACK_HEADER}|score:\s*\d+\s*/\s*10)\s*$"
    ))
    .expect("valid structural line regex")
});

/// Where a section starts and what ends it. `terminator: None` runs to the
/// end of the text.
struct SectionRule {
    kind: SectionKind,
    header: Regex,
    terminator: Option<Regex>,
}

// Headers and terminators both have to start a line, so a header word
// inside a bullet never opens or closes a section.
fn section_rule(kind: SectionKind, header: &str, ends_at: &[&str]) -> SectionRule {
    SectionRule {
        kind,
        header: Regex::new(&format!(r"(?im)^{HEADER_LEAD}{header}"))
            .expect("valid section header regex"),
        terminator: (!ends_at.is_empty()).then(|| {
            Regex::new(&format!(r"(?i)\n{HEADER_LEAD}(?:{})", ends_at.join("|")))
                .expect("valid section terminator regex")
        }),
    }
}

static SECTION_RULES: LazyLock<Vec<SectionRule>> = LazyLock::new(|| {
    vec![
        section_rule(
            SectionKind::Strengths,
            STRENGTHS_HEADER,
            &[MISSING_HEADER, FEEDBACK_HEADER],
        ),
        section_rule(
            SectionKind::Missing,
            MISSING_HEADER,
            &[FEEDBACK_HEADER, STRENGTHS_HEADER],
        ),
        section_rule(SectionKind::Feedback, FEEDBACK_HEADER, &[]),
    ]
});

/// Normalize line endings and strip Markdown emphasis markers.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let unix = text.replace('\r', "");
    EMPHASIS_RE.replace_all(&unix, "").trim().to_string()
}

/// Find `Score: N/10` anywhere in normalized text.
///
/// Returns `None` when no score is present or it falls outside 0–10.
pub fn extract_score(normalized: &str) -> Option<u8> {
    let caps = SCORE_RE.captures(normalized)?;
    let value: u8 = caps[1].parse().ok()?;
    (value <= 10).then_some(value)
}

/// The raw body of one section, or `None` when its header never appears.
///
/// The first header match wins; the body ends at the first terminator
/// after it.
pub fn extract_section(normalized: &str, kind: SectionKind) -> Option<&str> {
    let rule = SECTION_RULES.iter().find(|r| r.kind == kind)?;
    let header = rule.header.find(normalized)?;
    let rest = &normalized[header.end()..];

    let end = rule
        .terminator
        .as_ref()
        .and_then(|t| t.find(rest))
        .map(|m| m.start())
        .unwrap_or(rest.len());

    Some(&rest[..end])
}

/// Split a section body into its non-empty items, bullets stripped.
///
/// Bare section headers and score lines that fall inside a body (Feedback
/// runs to the end of the text) are not items and are dropped.
pub fn to_list(body: &str) -> Vec<String> {
    body.lines()
        .map(|line| BULLET_RE.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty() && !STRUCTURAL_LINE_RE.is_match(line))
        .collect()
}

/// The true condition named by the examiner, if any.
///
/// Prefers the last `Condition: X` style line, since the examiner is asked
/// to close with it; falls back to "the actual condition is X".
pub fn extract_condition(normalized: &str) -> Option<String> {
    let raw = CONDITION_LINE_RE
        .captures_iter(normalized)
        .last()
        .or_else(|| CONDITION_SENTENCE_RE.captures(normalized))
        .map(|caps| caps[1].to_string())?;

    let cleaned = raw.trim().trim_end_matches('.').trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Convert free-text examiner output into an [`EvaluationReport`].
///
/// Never fails: missing structure yields empty lists and an absent score.
pub fn parse(text: &str) -> EvaluationReport {
    let normalized = normalize(text);

    let section =
        |kind| extract_section(&normalized, kind).map(to_list).unwrap_or_default();

    let report = EvaluationReport {
        score: extract_score(&normalized),
        strengths: section(SectionKind::Strengths),
        missing: section(SectionKind::Missing),
        feedback: section(SectionKind::Feedback),
        condition: extract_condition(&normalized),
    };

    debug!(
        score = ?report.score,
        strengths = report.strengths.len(),
        missing = report.missing.len(),
        feedback = report.feedback.len(),
        has_condition = report.condition.is_some(),
        "parsed evaluation"
    );

    report
}
