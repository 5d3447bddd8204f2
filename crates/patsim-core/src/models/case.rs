use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A scripted clinical scenario the virtual patient role-plays.
///
/// `condition` is the ground truth. It is embedded only in the examiner
/// prompt, never in the patient prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Case {
    pub id: u32,
    pub condition: String,
    pub symptoms: Vec<String>,
    pub history: String,
    #[serde(default)]
    pub extra: String,
}

/// The patient-facing view of a case: everything except the condition.
#[derive(Debug, Clone, Serialize)]
pub struct PresentingCase<'a> {
    pub symptoms: &'a [String],
    pub history: &'a str,
    pub extra: &'a str,
}

impl Case {
    pub fn presenting(&self) -> PresentingCase<'_> {
        PresentingCase {
            symptoms: &self.symptoms,
            history: &self.history,
            extra: &self.extra,
        }
    }
}
