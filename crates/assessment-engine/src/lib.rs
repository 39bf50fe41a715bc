//! Environmental impact assessment engine
//!
//! Runs the registered calculators over one project record in a fixed
//! order, isolates failures per module and folds the results into an
//! [`AssessmentSummary`].

pub mod aggregator;
pub mod calculators;
pub mod catalog;
pub mod error;
pub mod patterns;
pub mod region;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use eia_types::modules::*;
use eia_types::{AssessmentSummary, ModuleResult, ModuleResults, ProjectRecord};
use tracing::{debug, error, info};

use aggregator::Aggregate;
use calculators::*;

pub use error::CalculatorError;

/// AssessmentEngine entry point
pub struct AssessmentEngine {
    stages: Vec<(&'static str, Stage)>,
}

impl AssessmentEngine {
    /// Engine with the nine standard modules registered
    pub fn new() -> Self {
        Self::with_stages(vec![
            (AIR_QUALITY, Stage::independent(AirQualityCalculator)),
            (NOISE_ASSESSMENT, Stage::independent(NoiseCalculator)),
            (WATER_RESOURCES, Stage::independent(WaterCalculator)),
            (WASTE_MANAGEMENT, Stage::independent(WasteCalculator)),
            (BIOLOGICAL_ENVIRONMENT, Stage::independent(BiologicalCalculator)),
            (SOIL_GEOLOGY, Stage::independent(SoilGeologyCalculator)),
            (SOCIO_ECONOMIC, Stage::independent(SocioEconomicCalculator)),
            (RISK_ASSESSMENT, Stage::independent(RiskCalculator)),
            (
                ENVIRONMENTAL_MANAGEMENT_PLAN,
                Stage::dependent(ManagementPlanCalculator),
            ),
        ])
    }

    /// Engine with a custom registration list, run in the given order
    pub fn with_stages(stages: Vec<(&'static str, Stage)>) -> Self {
        Self { stages }
    }

    pub fn module_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|(key, _)| *key)
    }

    /// Run every module and aggregate. Never fails: module errors become
    /// error entries, and a failure outside the modules yields an error
    /// summary.
    pub fn run(&self, project: &ProjectRecord) -> AssessmentSummary {
        self.run_with(project, aggregator::aggregate)
    }

    /// Run every module and fold the results with `aggregate`
    fn run_with<F>(&self, project: &ProjectRecord, aggregate: F) -> AssessmentSummary
    where
        F: Fn(&ModuleResults) -> Aggregate,
    {
        let start = Instant::now();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let results = self.run_stages(project);
            let aggregate = aggregate(&results);
            (results, aggregate)
        }));

        let processing_time = start.elapsed().as_secs_f64();

        match outcome {
            Ok((results, aggregate)) => {
                info!(
                    project = %project.id,
                    score = aggregate.compliance_score,
                    status = %aggregate.overall_status,
                    elapsed = processing_time,
                    "Assessment completed"
                );
                AssessmentSummary {
                    results,
                    overall_status: aggregate.overall_status,
                    total_impacts: aggregate.total_impacts,
                    critical_issues: aggregate.critical_issues,
                    compliance_score: aggregate.compliance_score,
                    processing_time,
                }
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(project = %project.id, error = %message, "Assessment failed");
                AssessmentSummary::failed(&message, processing_time)
            }
        }
    }

    fn run_stages(&self, project: &ProjectRecord) -> ModuleResults {
        let mut results = ModuleResults::new();

        for (key, stage) in &self.stages {
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| stage.evaluate(project, &results)));

            let result = match outcome {
                Ok(Ok(result)) => {
                    debug!(module = *key, status = result.status_label(), "Module evaluated");
                    result
                }
                Ok(Err(err)) => {
                    error!(module = *key, error = %err, "Module failed");
                    ModuleResult::error(err.to_string())
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(module = *key, error = %message, "Module panicked");
                    ModuleResult::error(message)
                }
            };

            results.insert(*key, result);
        }

        results
    }
}

impl Default for AssessmentEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eia_types::{ComplianceStatus, ModuleReport, OverallStatus, ProjectType};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn dubai_project() -> ProjectRecord {
        let mut project =
            ProjectRecord::new("a1b2c3d4", "Test", ProjectType::Residential, "Dubai", 10_000.0);
        project.mitigation_measures = vec!["water_spraying".to_string()];
        project
    }

    struct Failing;

    impl Calculator for Failing {
        fn evaluate(&self, _: &ProjectRecord) -> Result<ModuleResult, CalculatorError> {
            Err(CalculatorError::InvalidInput("no receptors".to_string()))
        }
    }

    struct Panicking;

    impl Calculator for Panicking {
        fn evaluate(&self, _: &ProjectRecord) -> Result<ModuleResult, CalculatorError> {
            panic!("division by zero")
        }
    }

    struct PanickingPlan;

    impl PlanCalculator for PanickingPlan {
        fn evaluate(
            &self,
            _: &ProjectRecord,
            _: &ModuleResults,
        ) -> Result<ModuleResult, CalculatorError> {
            panic!("plan template missing")
        }
    }

    struct Fixed(Option<ComplianceStatus>);

    impl Calculator for Fixed {
        fn evaluate(&self, _: &ProjectRecord) -> Result<ModuleResult, CalculatorError> {
            Ok(ModuleResult::Assessed(ModuleReport::new(self.0)))
        }
    }

    /// Records how many upstream entries the plan stage saw
    struct Recording(Arc<AtomicUsize>);

    impl PlanCalculator for Recording {
        fn evaluate(
            &self,
            _: &ProjectRecord,
            upstream: &ModuleResults,
        ) -> Result<ModuleResult, CalculatorError> {
            self.0.store(upstream.len(), Ordering::SeqCst);
            Ok(ModuleResult::Generated(ModuleReport::new(None)))
        }
    }

    /// Standard registration with one module replaced
    fn engine_with(key: &'static str, replacement: Stage) -> AssessmentEngine {
        let mut replacement = Some(replacement);
        let stages = AssessmentEngine::new()
            .stages
            .into_iter()
            .map(|(k, stage)| match replacement.take() {
                Some(r) if k == key => (k, r),
                other => {
                    replacement = other;
                    (k, stage)
                }
            })
            .collect();
        AssessmentEngine::with_stages(stages)
    }

    fn results_without_time(summary: &AssessmentSummary) -> serde_json::Value {
        serde_json::to_value(&summary.results).unwrap()
    }

    #[test]
    fn test_dubai_residential_scenario() {
        let summary = AssessmentEngine::new().run(&dubai_project());

        let keys: Vec<_> = summary.results.keys().collect();
        assert_eq!(keys, ASSESSMENT_ORDER.to_vec());
        assert_eq!(summary.modules_succeeded(), 9);

        let air = summary.results.get(AIR_QUALITY).unwrap();
        assert_eq!(air.compliance(), Some(ComplianceStatus::Compliant));
        assert_eq!(air.report().unwrap().detail_f64("pm10_concentration"), Some(72.0));

        assert_eq!(
            summary.results.get(NOISE_ASSESSMENT).unwrap().compliance(),
            Some(ComplianceStatus::NonCompliant)
        );
        assert_eq!(summary.results.get(RISK_ASSESSMENT).unwrap().compliance(), None);
        assert_eq!(
            summary.results.get(ENVIRONMENTAL_MANAGEMENT_PLAN).unwrap().status_label(),
            "generated"
        );

        // air, water, waste, socio 100; bio 70; noise, soil 40
        assert_eq!(summary.compliance_score, 78.6);
        assert_eq!(summary.overall_status, OverallStatus::ReviewRequired);
        assert_eq!(summary.total_impacts, 2);
        assert_eq!(
            summary.critical_issues,
            vec![
                "3 critical species affected".to_string(),
                "Soil contamination risk requires investigation".to_string(),
            ]
        );
        assert!(summary.processing_time >= 0.0);
    }

    #[test]
    fn test_failing_module_does_not_cascade() {
        let baseline = AssessmentEngine::new().run(&dubai_project());
        let summary = engine_with(WATER_RESOURCES, Stage::independent(Failing)).run(&dubai_project());

        assert_eq!(summary.results.len(), 9);
        assert_eq!(
            summary.results.get(WATER_RESOURCES),
            Some(&ModuleResult::error("Invalid input: no receptors"))
        );
        for key in ASSESSMENT_ORDER {
            if key != WATER_RESOURCES && key != ENVIRONMENTAL_MANAGEMENT_PLAN {
                assert_eq!(summary.results.get(key), baseline.results.get(key), "{}", key);
            }
        }

        // The plan drops the failed module's component
        let plan = summary.results.get(ENVIRONMENTAL_MANAGEMENT_PLAN).unwrap();
        assert_eq!(plan.report().unwrap().detail("total_components").unwrap(), 7);
    }

    #[test]
    fn test_panicking_module_becomes_error_entry() {
        let summary = engine_with(AIR_QUALITY, Stage::independent(Panicking)).run(&dubai_project());

        assert_eq!(
            summary.results.get(AIR_QUALITY),
            Some(&ModuleResult::error("division by zero"))
        );
        assert_eq!(summary.modules_succeeded(), 8);
        // Remaining tokens: noise 40, water 100, waste 100, bio 70, soil 40, socio 100
        assert_eq!(summary.compliance_score, 75.0);
        assert_ne!(summary.overall_status, OverallStatus::Error);
    }

    #[test]
    fn test_plan_sees_all_eight_upstream_entries() {
        let seen = Arc::new(AtomicUsize::new(0));
        let engine = engine_with(AIR_QUALITY, Stage::independent(Panicking));
        let mut stages = engine.stages;
        stages.pop();
        stages.push((
            ENVIRONMENTAL_MANAGEMENT_PLAN,
            Stage::dependent(Recording(seen.clone())),
        ));

        AssessmentEngine::with_stages(stages).run(&dubai_project());
        assert_eq!(seen.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_orchestration_failure_yields_error_summary() {
        let summary = AssessmentEngine::new().run_with(&dubai_project(), |_| {
            panic!("aggregation table corrupted")
        });

        assert_eq!(summary.overall_status, OverallStatus::Error);
        assert_eq!(summary.compliance_score, 0.0);
        assert_eq!(summary.total_impacts, 0);
        assert!(summary.results.is_empty());
        assert_eq!(
            summary.critical_issues,
            vec!["Assessment error: aggregation table corrupted".to_string()]
        );
        assert!(summary.processing_time >= 0.0);
    }

    #[test]
    fn test_tokenless_module_is_excluded() {
        let engine = AssessmentEngine::with_stages(vec![
            ("first", Stage::independent(Fixed(Some(ComplianceStatus::Compliant)))),
            ("second", Stage::independent(Fixed(None))),
        ]);
        let summary = engine.run(&dubai_project());

        assert_eq!(summary.compliance_score, 100.0);
        assert_eq!(summary.total_impacts, 0);
        assert_eq!(summary.overall_status, OverallStatus::Compliant);
    }

    #[test]
    fn test_empty_registration_scores_zero() {
        let summary = AssessmentEngine::with_stages(Vec::new()).run(&dubai_project());
        assert!(summary.results.is_empty());
        assert_eq!(summary.compliance_score, 0.0);
        assert_eq!(summary.overall_status, OverallStatus::ReviewRequired);
    }

    #[test]
    fn test_runs_are_deterministic() {
        let engine = AssessmentEngine::new();
        let first = engine.run(&dubai_project());
        let second = engine.run(&dubai_project());

        assert_eq!(results_without_time(&first), results_without_time(&second));
        assert_eq!(first.compliance_score, second.compliance_score);
        assert_eq!(first.overall_status, second.overall_status);
        assert_eq!(first.critical_issues, second.critical_issues);
    }

    #[test]
    fn test_module_keys_follow_registration() {
        let keys: Vec<_> = AssessmentEngine::default().module_keys().collect();
        assert_eq!(keys, ASSESSMENT_ORDER.to_vec());
    }

    // ============================================================
    // Property tests
    // ============================================================

    fn project_strategy() -> impl Strategy<Value = ProjectRecord> {
        (
            prop::sample::select(ProjectType::ALL.to_vec()),
            prop::sample::select(vec![
                "Dubai",
                "Abu Dhabi",
                "Sharjah Marina",
                "Riyadh",
                "Jeddah Coastal",
                "Al Ain desert",
                "Industrial port",
            ]),
            1.0f64..200_000.0,
            0u32..72,
            prop::sample::select(vec!["sandy", "clay", "rocky", "silt", "gravel"]),
            0.0f64..60.0,
            0.0f64..2_000.0,
        )
            .prop_map(
                |(project_type, location, size, duration, soil, wind, receptor)| {
                    let mut p = ProjectRecord::new("p", "Prop", project_type, location, size);
                    p.duration = duration;
                    p.soil_type = soil.to_string();
                    p.wind_speed = wind;
                    p.nearest_receptor = receptor;
                    p
                },
            )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn every_module_reports_and_score_is_bounded(project in project_strategy()) {
            let summary = AssessmentEngine::new().run(&project);

            prop_assert_eq!(summary.results.len(), 9);
            prop_assert!(summary.compliance_score >= 0.0);
            prop_assert!(summary.compliance_score <= 100.0);
            prop_assert_ne!(summary.overall_status, OverallStatus::Error);
        }

        #[test]
        fn single_failure_never_cascades(
            project in project_strategy(),
            index in 0usize..9,
        ) {
            let key = ASSESSMENT_ORDER[index];
            let stage = if key == ENVIRONMENTAL_MANAGEMENT_PLAN {
                Stage::dependent(PanickingPlan)
            } else {
                Stage::independent(Panicking)
            };
            let summary = engine_with(key, stage).run(&project);

            prop_assert_eq!(summary.results.len(), 9);
            for (k, result) in summary.results.iter() {
                prop_assert_eq!(result.is_error(), k == key);
            }
        }
    }
}
