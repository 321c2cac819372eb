use super::combiner::combine_findings;
use super::multi_club::MultiClubRule;
use super::shared_club::SharedClubRule;
use crate::config::{PipelineConfig, RuleThresholds};
use crate::relations::RelationIndex;
use crate::types::{Evaluation, MultiClubViolation, SharedClubViolation};
use std::cell::RefCell;
use std::time::{Duration, Instant};

/// Per-rule results before reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFindings {
    pub multi_club: Vec<MultiClubViolation>,
    pub shared_club: Vec<SharedClubViolation>,
}

// Sequential rule pipeline infrastructure
pub trait SanctionRule {
    fn apply(&self, index: &RelationIndex, findings: &mut RuleFindings);
    fn name(&self) -> &str;
}

pub struct RuleEngine {
    pipeline: PipelineConfig,
    thresholds: RuleThresholds,
    pub rule_timings: RefCell<Vec<(String, Duration)>>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(PipelineConfig::default(), RuleThresholds::default())
    }
}

impl RuleEngine {
    pub fn new(pipeline: PipelineConfig, thresholds: RuleThresholds) -> Self {
        Self {
            pipeline,
            thresholds,
            rule_timings: RefCell::new(Vec::new()),
        }
    }

    /// Run the enabled rules of the pipeline in order
    pub fn apply_rules(&self, index: &RelationIndex) -> RuleFindings {
        let mut findings = RuleFindings::default();

        // Clear previous timings
        self.rule_timings.borrow_mut().clear();

        for rule_config in &self.pipeline.rules {
            if !rule_config.enabled {
                log::debug!("Skipping disabled rule: {}", rule_config.name);
                continue;
            }
            self.apply_rule_by_name(&rule_config.name, index, &mut findings);
        }

        log::info!(
            "Rules produced {} §1.1 and {} §1.4 findings",
            findings.multi_club.len(),
            findings.shared_club.len()
        );
        findings
    }

    /// Run the pipeline and reconcile accounts flagged by both rules
    pub fn evaluate(&self, index: &RelationIndex) -> Evaluation {
        combine_findings(self.apply_rules(index))
    }

    fn apply_rule_by_name(&self, rule_name: &str, index: &RelationIndex, findings: &mut RuleFindings) {
        let rule_start = Instant::now();
        let rule: Box<dyn SanctionRule> = match rule_name {
            "MultiClub" => Box::new(MultiClubRule::new(&self.thresholds)),
            "SharedClub" => Box::new(SharedClubRule::new(&self.thresholds)),
            _ => {
                log::warn!("Unknown rule: {rule_name}. Skipping...");
                return;
            }
        };

        log::debug!("Applying rule: {}", rule.name());
        rule.apply(index, findings);

        self.rule_timings
            .borrow_mut()
            .push((rule_name.to_string(), rule_start.elapsed()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::types::AccountRecord;

    fn record(id: &str, club: &str, logins: u64) -> AccountRecord {
        AccountRecord {
            username: format!("user_{id}"),
            account_id: id.to_string(),
            social_club: club.to_string(),
            login_timestamp: "2024-03-01 18:22:10".to_string(),
            first_login_page: "/spawn".to_string(),
            total_logins: logins,
        }
    }

    fn sample_index() -> RelationIndex {
        RelationIndex::build(&[
            record("X", "A", 4),
            record("X", "B", 4),
            record("Y", "A", 10),
            record("Z", "A", 1),
        ])
    }

    #[test]
    fn test_default_pipeline_runs_both_rules() {
        let engine = RuleEngine::default();
        let findings = engine.apply_rules(&sample_index());
        assert_eq!(findings.multi_club.len(), 1);
        assert_eq!(findings.shared_club.len(), 1);
        assert_eq!(engine.rule_timings.borrow().len(), 2);
    }

    #[test]
    fn test_disabled_and_unknown_rules_are_skipped() {
        let pipeline = PipelineConfig {
            rules: vec![
                RuleConfig {
                    name: "MultiClub".to_string(),
                    enabled: false,
                },
                RuleConfig {
                    name: "NoSuchRule".to_string(),
                    enabled: true,
                },
                RuleConfig {
                    name: "SharedClub".to_string(),
                    enabled: true,
                },
            ],
        };
        let engine = RuleEngine::new(pipeline, RuleThresholds::default());
        let findings = engine.apply_rules(&sample_index());
        assert!(findings.multi_club.is_empty());
        assert_eq!(findings.shared_club.len(), 1);
        assert_eq!(engine.rule_timings.borrow().len(), 1);
    }

    #[test]
    fn test_evaluate_combines_overlap() {
        let evaluation = RuleEngine::default().evaluate(&sample_index());
        // X is in §1.1 and in the §1.4 group of A
        assert!(evaluation.multi_club.is_empty());
        assert_eq!(evaluation.combined.len(), 1);
        assert_eq!(evaluation.combined[0].record.account_id, "X");
    }
}
