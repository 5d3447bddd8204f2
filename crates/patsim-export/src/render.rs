use patsim_core::models::evaluation::EvaluationReport;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use crate::error::ExportError;

const REPORT_TEMPLATE_NAME: &str = "evaluation.md";

/// Subsections are emitted only when non-empty; the score line only when a
/// score was found.
pub const REPORT_TEMPLATE: &str = r#"# Evaluation
{% if score is defined %}
**Score: {{ score }}/10** ({{ band }})
{% endif %}{% for section in sections %}
## {{ section.title }}

{% for item in section.items %}- {{ item }}
{% endfor %}{% endfor %}{% if condition is defined %}
**Condition:** {{ condition }}
{% endif %}"#;

#[derive(Serialize)]
struct SectionContext<'a> {
    title: &'static str,
    items: &'a [String],
}

fn band_label(report: &EvaluationReport) -> Option<&'static str> {
    use patsim_core::models::evaluation::ScoreBand;
    report.score_band().map(|band| match band {
        ScoreBand::Poor => "poor",
        ScoreBand::Fair => "fair",
        ScoreBand::Good => "good",
    })
}

/// Render a report with the built-in Markdown template.
pub fn render_markdown(report: &EvaluationReport) -> Result<String, ExportError> {
    render_with_template(REPORT_TEMPLATE, report)
}

/// Render a report with a caller-supplied Tera template.
///
/// Context variables: `score` and `band` (only when scored), `sections`
/// (non-empty subsections, each with `title` and `items`), `strengths`,
/// `missing`, `feedback`, and `condition` (only when disclosed).
pub fn render_with_template(
    template_content: &str,
    report: &EvaluationReport,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_template(REPORT_TEMPLATE_NAME, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let mut context = Context::new();
    if let (Some(score), Some(band)) = (report.score, band_label(report)) {
        context.insert("score", &score);
        context.insert("band", band);
    }
    if let Some(condition) = &report.condition {
        context.insert("condition", condition);
    }

    let sections: Vec<SectionContext<'_>> = report
        .sections()
        .into_iter()
        .map(|s| SectionContext {
            title: s.kind.title(),
            items: s.items,
        })
        .collect();
    context.insert("sections", &sections);
    context.insert("strengths", &report.strengths);
    context.insert("missing", &report.missing);
    context.insert("feedback", &report.feedback);

    let rendered = tera.render(REPORT_TEMPLATE_NAME, &context)?;
    debug!(len = rendered.len(), sections = sections.len(), "rendered evaluation report");
    Ok(rendered)
}
