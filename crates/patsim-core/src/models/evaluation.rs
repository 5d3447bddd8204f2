use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The structured form of an examiner's free-text critique.
///
/// Derived from raw evaluator text and replaced wholesale on every
/// evaluation; never edited in place. An absent `score` is distinct from a
/// score of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvaluationReport {
    pub score: Option<u8>,
    pub strengths: Vec<String>,
    pub missing: Vec<String>,
    pub feedback: Vec<String>,
    /// The true condition as disclosed by the examiner, when it named one.
    pub condition: Option<String>,
}

/// Coarse banding of a score, used for color coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ScoreBand {
    /// 0–4
    Poor,
    /// 5–6
    Fair,
    /// 7–10
    Good,
}

impl ScoreBand {
    pub fn for_score(score: u8) -> Self {
        match score {
            0..=4 => ScoreBand::Poor,
            5..=6 => ScoreBand::Fair,
            _ => ScoreBand::Good,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SectionKind {
    Strengths,
    Missing,
    Feedback,
}

impl SectionKind {
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Strengths => "Strong points",
            SectionKind::Missing => "Missing / Incorrect",
            SectionKind::Feedback => "Feedback",
        }
    }
}

/// A non-empty subsection of a report, ready for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSection<'a> {
    pub kind: SectionKind,
    pub items: &'a [String],
}

impl EvaluationReport {
    /// `None` when no score was found, so no color coding applies.
    pub fn score_band(&self) -> Option<ScoreBand> {
        self.score.map(ScoreBand::for_score)
    }

    /// The subsections to render, in display order. Empty lists are skipped
    /// rather than rendered as empty subsections.
    pub fn sections(&self) -> Vec<ReportSection<'_>> {
        [
            (SectionKind::Strengths, &self.strengths),
            (SectionKind::Missing, &self.missing),
            (SectionKind::Feedback, &self.feedback),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(kind, items)| ReportSection {
            kind,
            items: items.as_slice(),
        })
        .collect()
    }

    /// True when the text yielded nothing structured at all.
    pub fn is_empty(&self) -> bool {
        self.score.is_none()
            && self.strengths.is_empty()
            && self.missing.is_empty()
            && self.feedback.is_empty()
            && self.condition.is_none()
    }
}
