use crate::config::AnalysisConfig;
use crate::error::SanctionResult;
use crate::preprocessors::{AcpLogPreprocessor, Preprocessor};
use crate::relations::{RelationAnalytics, RelationIndex};
use crate::rules::RuleEngine;
use crate::types::{AccountRecord, Evaluation};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};

/// Everything one pass over an input produced
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRun {
    pub analytics: RelationAnalytics,
    pub evaluation: Evaluation,
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        log::debug!("{}: {}µs", step_name, elapsed.as_micros());

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        println!("\n📊 Performance Summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();

        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            println!(
                "   {:.<35} {:.3}ms ({:.1}%)",
                step,
                duration.as_secs_f64() * 1000.0,
                percentage
            );
        }
        println!("   {:.<35} {:.3}ms", "Total", total.as_secs_f64() * 1000.0);
    }
}

pub struct SanctionProcessor {
    preprocessor: Box<dyn Preprocessor>,
    rule_engine: RuleEngine,
}

impl SanctionProcessor {
    /// Create SanctionProcessor with full dependency injection
    pub fn new_with_dependencies(preprocessor: Box<dyn Preprocessor>, rule_engine: RuleEngine) -> Self {
        Self {
            preprocessor,
            rule_engine,
        }
    }

    /// ACP log parser plus the rule pipeline from `config`
    pub fn new(config: &AnalysisConfig) -> Self {
        Self::new_with_dependencies(
            Box::new(AcpLogPreprocessor::new()),
            RuleEngine::new(config.pipeline.clone(), config.rules.clone()),
        )
    }

    pub fn parse_text(&self, text: &str) -> Vec<AccountRecord> {
        self.preprocessor.parse_text(text)
    }

    /// Index → rules → combine over already parsed records
    pub fn evaluate(&self, records: &[AccountRecord]) -> Evaluation {
        let index = RelationIndex::build(records);
        self.rule_engine.evaluate(&index)
    }

    pub fn process_text(&self, text: &str) -> AnalysisRun {
        self.run(text, &mut StepProfiler::new(false))
    }

    pub fn process_file(&self, input_path: impl AsRef<Path>) -> SanctionResult<AnalysisRun> {
        self.process_file_with_profiling(input_path, false)
    }

    /// Process a log file, printing per-step timings when `enable_profiling` is set
    pub fn process_file_with_profiling(
        &self,
        input_path: impl AsRef<Path>,
        enable_profiling: bool,
    ) -> SanctionResult<AnalysisRun> {
        let input_path = input_path.as_ref();
        let start_time = Instant::now();
        let mut profiler = StepProfiler::new(enable_profiling);

        let records = profiler.time_step("1. Read + parse + dedup", || {
            self.preprocessor.process_file(input_path)
        })?;
        let run = self.run_records(&records, &mut profiler);

        profiler.print_summary();
        if enable_profiling {
            for (rule, duration) in self.rule_engine.rule_timings.borrow().iter() {
                println!("   {:.<35} {:.3}ms", format!("   rule {rule}"), duration.as_secs_f64() * 1000.0);
            }
        }
        log::info!(
            "Processed {} in {:.3}s: {} records, {} sanctions",
            input_path.display(),
            start_time.elapsed().as_secs_f64(),
            run.analytics.record_count,
            run.evaluation.summary().total_records()
        );
        Ok(run)
    }

    /// Index, analytics, rules and combine over already parsed records
    pub fn process_records(&self, records: &[AccountRecord]) -> AnalysisRun {
        self.run_records(records, &mut StepProfiler::new(false))
    }

    fn run(&self, text: &str, profiler: &mut StepProfiler) -> AnalysisRun {
        let records = profiler.time_step("1. Parse + dedup", || self.preprocessor.parse_text(text));
        self.run_records(&records, profiler)
    }

    fn run_records(&self, records: &[AccountRecord], profiler: &mut StepProfiler) -> AnalysisRun {
        let index = profiler.time_step("2. Relation index", || RelationIndex::build(records));
        let analytics = profiler.time_step("3. Relation analytics", || RelationAnalytics::compute(&index));
        let findings = profiler.time_step("4. Rules", || self.rule_engine.apply_rules(&index));
        let evaluation = profiler.time_step("5. Combine", || crate::rules::combine_findings(findings));

        AnalysisRun {
            analytics,
            evaluation,
        }
    }
}

impl Default for SanctionProcessor {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SanctionError;

    const LOG: &str = "\
x X SC: A 2024-03-01 10:00:00 FirstLogin: (Page:/a) (Total Logins: 4)
x X SC: B 2024-03-01 10:00:00 FirstLogin: (Page:/a) (Total Logins: 6)
y Y SC: A 2024-03-01 10:00:00 FirstLogin: (Page:/a) (Total Logins: 10)
z Z SC: A 2024-03-01 10:00:00 FirstLogin: (Page:/a) (Total Logins: 1)
";

    #[test]
    fn test_profiler_disabled_records_nothing() {
        let mut profiler = StepProfiler::new(false);
        let value = profiler.time_step("step", || 21 * 2);
        assert_eq!(value, 42);
        assert!(profiler.timings().is_empty());
    }

    #[test]
    fn test_profiler_enabled_records_steps() {
        let mut profiler = StepProfiler::new(true);
        profiler.time_step("a", || ());
        profiler.time_step("b", || ());
        let names: Vec<&str> = profiler.timings().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_evaluate_matches_full_pass() {
        let processor = SanctionProcessor::default();
        let evaluation = processor.evaluate(&processor.parse_text(LOG));

        assert_eq!(evaluation, processor.process_text(LOG).evaluation);
        assert_eq!(evaluation.combined.len(), 1);
        assert_eq!(evaluation.combined[0].record.sanction_text, "Permanenter Bann (Logins: 10)");
    }

    #[test]
    fn test_file_pass_reads_through_preprocessor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acp_data.txt");
        let mut bytes = LOG.as_bytes().to_vec();
        // invalid UTF-8 on its own line is replaced, not fatal
        bytes.extend_from_slice(b"\xff\xfe broken\n");
        std::fs::write(&path, bytes).unwrap();

        let run = SanctionProcessor::default().process_file_with_profiling(&path, true).unwrap();
        assert_eq!(run.analytics.record_count, 4);
        assert_eq!(run.evaluation, SanctionProcessor::default().process_text(LOG).evaluation);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SanctionProcessor::default()
            .process_file("/nonexistent/acp_data.txt")
            .unwrap_err();
        assert!(matches!(err, SanctionError::Io { .. }));
    }
}
