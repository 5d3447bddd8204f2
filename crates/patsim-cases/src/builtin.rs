use std::sync::LazyLock;

use patsim_core::models::case::Case;

/// The reference cases shipped with the simulator.
pub(crate) static BUILTIN_CASES: LazyLock<Vec<Case>> = LazyLock::new(|| {
    vec![
        Case {
            id: 1,
            condition: "Migraine".to_string(),
            symptoms: vec![
                "Severe headache".to_string(),
                "Nausea".to_string(),
                "Sensitivity to light".to_string(),
            ],
            history: "Headaches for the last 3 days, worse in the morning, no head trauma"
                .to_string(),
            extra: "No fever, no cough".to_string(),
        },
        Case {
            id: 2,
            condition: "Asthma".to_string(),
            symptoms: vec![
                "Shortness of breath".to_string(),
                "Wheezing".to_string(),
                "Cough".to_string(),
            ],
            history: "Symptoms worsen at night and after exercise".to_string(),
            extra: "No chest pain".to_string(),
        },
    ]
});
