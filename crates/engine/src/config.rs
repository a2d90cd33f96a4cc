//! Workflow configuration.

use procura_core::{ApprovalLevel, WorkflowError, WorkflowResult};

/// Configuration injected into the engine and lifecycle manager at
/// construction. Deliberately not a process-wide lookup so tests can vary it
/// freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    default_levels: Vec<ApprovalLevel>,
}

impl WorkflowConfig {
    /// A config with the given fallback approval ladder. The ladder must
    /// name at least one level, otherwise a request without per-request
    /// levels would be approvable by nobody-in-particular.
    pub fn new(default_levels: Vec<ApprovalLevel>) -> WorkflowResult<Self> {
        if default_levels.is_empty() {
            return Err(WorkflowError::validation(
                "default approval levels must not be empty",
            ));
        }
        Ok(Self { default_levels })
    }

    /// Parse a comma-separated ladder, e.g. `"1,2"`.
    pub fn parse(s: &str) -> WorkflowResult<Self> {
        let mut levels = Vec::new();
        for part in s.split(',') {
            let n: u32 = part
                .trim()
                .parse()
                .map_err(|_| WorkflowError::validation(format!("invalid approval level: {part}")))?;
            levels.push(ApprovalLevel::new(n)?);
        }
        Self::new(levels)
    }

    /// Fallback ladder for requests that carry no per-request levels.
    pub fn default_levels(&self) -> &[ApprovalLevel] {
        &self.default_levels
    }
}

impl Default for WorkflowConfig {
    /// Two-step ladder: levels 1 and 2.
    fn default() -> Self {
        let levels = [1, 2]
            .into_iter()
            .map(|n| ApprovalLevel::new(n).expect("hard-coded level is non-zero"))
            .collect();
        Self {
            default_levels: levels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_ladder() {
        let config = WorkflowConfig::parse("1, 2,3").unwrap();
        let levels: Vec<u32> = config.default_levels().iter().map(|l| l.get()).collect();
        assert_eq!(levels, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_empty_and_zero_ladders() {
        assert!(WorkflowConfig::new(Vec::new()).is_err());
        assert!(WorkflowConfig::parse("0").is_err());
        assert!(WorkflowConfig::parse("one").is_err());
    }
}
