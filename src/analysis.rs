//! Image analysis seam for the intake workflow.
//!
//! No inference runs in this service. `ConstantResult` stands in for a real
//! model and always answers with the same finding; a real provider can be
//! swapped in through `CoreState` without touching the workflow.

use crate::models::CancerType;

/// Placeholder finding recorded for every submission.
pub const PLACEHOLDER_RESULT: &str = "Tumor detected";

/// Produces the diagnostic string stored with a patient record.
pub trait AnalysisProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Analyze one screening upload of the given category.
    fn analyze(&self, cancer_type: CancerType) -> String;
}

/// Always returns the same string, whatever the input.
#[derive(Debug, Clone)]
pub struct ConstantResult {
    result: String,
}

impl ConstantResult {
    pub fn new(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
        }
    }
}

impl Default for ConstantResult {
    fn default() -> Self {
        Self::new(PLACEHOLDER_RESULT)
    }
}

impl AnalysisProvider for ConstantResult {
    fn name(&self) -> &str {
        "constant"
    }

    fn analyze(&self, _cancer_type: CancerType) -> String {
        self.result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_placeholder_for_every_category() {
        let provider = ConstantResult::default();
        for cancer_type in CancerType::ALL {
            assert_eq!(provider.analyze(*cancer_type), "Tumor detected");
        }
    }

    #[test]
    fn custom_constant_is_returned() {
        let provider = ConstantResult::new("No tumor detected");
        assert_eq!(provider.analyze(CancerType::Brain), "No tumor detected");
    }

    #[test]
    fn usable_as_trait_object() {
        let provider: Box<dyn AnalysisProvider> = Box::new(ConstantResult::default());
        assert_eq!(provider.name(), "constant");
    }
}
