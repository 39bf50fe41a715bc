//! API handlers for the EIA server
//!
//! Provides REST endpoints for:
//! - Comprehensive assessment
//! - Report generation (PDF/HTML/JSON)
//! - Component catalog and platform capabilities

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use assessment_engine::catalog::{ComponentInfo, COMPONENTS};
use eia_report::{RenderedReport, ReportFormat, ReportInput};
use eia_types::modules::ASSESSMENT_ORDER;
use eia_types::{new_id, AssessmentSummary, ModuleResults};

use crate::error::ServerError;
use crate::models::{is_valid_id, project_from_request, ReportRequest};
use crate::state::{AppState, StoredAssessment};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub modules: BTreeMap<&'static str, &'static str>,
    pub assessments_completed: usize,
}

/// Handler: GET /health
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "eia-server",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
        modules: ASSESSMENT_ORDER.iter().map(|key| (*key, "operational")).collect(),
        assessments_completed: state.assessments.count().await,
    })
}

/// Summary block of an assessment response
#[derive(Serialize)]
pub struct SummaryView {
    pub overall_status: eia_types::OverallStatus,
    pub compliance_score: f64,
    pub total_impacts: usize,
    pub critical_issues: Vec<String>,
    pub components_assessed: usize,
    pub processing_time: String,
}

impl SummaryView {
    pub(crate) fn from_summary(summary: &AssessmentSummary) -> Self {
        Self {
            overall_status: summary.overall_status,
            compliance_score: summary.compliance_score,
            total_impacts: summary.total_impacts,
            critical_issues: summary.critical_issues.clone(),
            components_assessed: ASSESSMENT_ORDER.len(),
            processing_time: format!("{:.2} seconds", summary.processing_time),
        }
    }
}

/// Assessment response
#[derive(Serialize)]
pub struct AssessResponse {
    pub status: &'static str,
    pub project_id: String,
    pub assessment_id: String,
    pub assessment_results: ModuleResults,
    pub summary: SummaryView,
    pub timestamp: String,
}

/// Handler: POST /api/comprehensive-assess
pub async fn handle_comprehensive_assess(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<AssessResponse>, ServerError> {
    let project = project_from_request(&body, new_id())?;
    state.projects.insert(project.clone()).await;

    info!(project = %project.id, name = %project.name, location = %project.location, "Running assessment");

    let engine = Arc::clone(&state.engine);
    let assessed = project.clone();
    let summary = tokio::task::spawn_blocking(move || engine.run(&assessed))
        .await
        .map_err(|e| ServerError::Internal(format!("Assessment task failed: {}", e)))?;

    let stored = StoredAssessment {
        id: new_id(),
        project_id: project.id.clone(),
        summary,
        created_at: Utc::now(),
    };
    state.assessments.insert(stored.clone()).await;

    info!(
        project = %project.id,
        assessment = %stored.id,
        score = stored.summary.compliance_score,
        "Assessment stored"
    );

    Ok(Json(AssessResponse {
        status: "success",
        project_id: project.id,
        assessment_id: stored.id,
        summary: SummaryView::from_summary(&stored.summary),
        assessment_results: stored.summary.results,
        timestamp: stored.created_at.to_rfc3339(),
    }))
}

/// Handler: GET /api/assessments/:id
pub async fn handle_get_assessment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServerError> {
    if !is_valid_id(&id) {
        return Err(ServerError::InvalidRequest(format!("Invalid assessment ID: {}", id)));
    }

    let stored = state
        .assessments
        .get(&id)
        .await
        .ok_or_else(|| ServerError::NotFound(format!("Assessment '{}' not found", id)))?;

    Ok(Json(json!({
        "assessment_id": stored.id,
        "project_id": stored.project_id,
        "created_at": stored.created_at.to_rfc3339(),
        "summary": stored.summary,
    })))
}

/// Component catalog response
#[derive(Serialize)]
pub struct ComponentsResponse {
    pub components: BTreeMap<&'static str, &'static ComponentInfo>,
    pub total_components: usize,
    pub all_active: bool,
    pub professional_grade: bool,
}

/// Handler: GET /api/assessment-components
pub async fn handle_assessment_components() -> Json<ComponentsResponse> {
    Json(ComponentsResponse {
        components: COMPONENTS.iter().map(|c| (c.key, c)).collect(),
        total_components: COMPONENTS.len(),
        all_active: COMPONENTS.iter().all(|c| c.status == "active"),
        professional_grade: true,
    })
}

/// Handler: POST /api/generate-professional-report
pub async fn handle_generate_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Response, ServerError> {
    let format: ReportFormat = request.format.parse()?;

    let project_id = request.project_id.filter(|id| is_valid_id(id));
    let assessment_id = request.assessment_id.filter(|id| is_valid_id(id));

    let known_project = match &project_id {
        Some(id) => state.projects.get(id).await,
        None => None,
    };

    let (project, assessment) = if let Some(project) = known_project {
        let assessment = state
            .assessments
            .latest_for_project(&project.id)
            .await
            .ok_or_else(|| ServerError::NotFound("No assessment found for this project".into()))?;
        (project, assessment)
    } else {
        let assessment = match &assessment_id {
            Some(id) => state.assessments.get(id).await,
            None => None,
        }
        .ok_or_else(|| ServerError::InvalidRequest("Invalid project or assessment ID".into()))?;
        let project = state
            .projects
            .get(&assessment.project_id)
            .await
            .ok_or_else(|| ServerError::NotFound("Project for this assessment not found".into()))?;
        (project, assessment)
    };

    let generated_at = Utc::now();
    let input = ReportInput {
        project: &project,
        assessment_id: &assessment.id,
        summary: &assessment.summary,
        generated_at,
    };

    let response = match eia_report::render(&input, format)? {
        RenderedReport::Pdf(bytes) => {
            let disposition = format!(
                "attachment; filename={}",
                eia_report::pdf_filename(&project.name, generated_at)
            );
            (
                [
                    (header::CONTENT_TYPE, format.content_type().to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        RenderedReport::Html(html) => {
            ([(header::CONTENT_TYPE, format.content_type())], html).into_response()
        }
        RenderedReport::Json(report) => Json(report).into_response(),
    };

    info!(
        project = %project.id,
        assessment = %assessment.id,
        format = %format,
        "Report generated"
    );

    Ok(response)
}

/// Handler: GET /api/platform-capabilities
pub async fn handle_platform_capabilities() -> Json<Value> {
    Json(json!({
        "platform": "EIA Assessment Platform",
        "version": env!("CARGO_PKG_VERSION"),
        "capabilities": {
            "environmental_components": COMPONENTS.len(),
            "assessment_modules": [
                "Air Quality (PM10, PM2.5, TSP)",
                "Noise Impact (Construction & Operational)",
                "Water Resources (Demand, Wastewater, Balance)",
                "Waste Management (C&D, Municipal, Hazardous)",
                "Biodiversity (Species, Habitats, Ecosystems)",
                "Soil & Geology (Contamination, Seismic, Geotechnical)",
                "Socio-Economic (Demographics, Traffic, Heritage)",
                "Risk Assessment (Multi-category, Mitigation)",
                "Environmental Management Plan (Implementation)",
            ],
            "regional_coverage": ["UAE", "KSA", "GCC Region"],
            "regulatory_frameworks": [
                "UAE Federal Law No. 24 of 1999",
                "KSA Environmental Law",
                "Local Municipality Requirements",
                "International Standards (ISO, IFC)",
            ],
            "report_formats": ["pdf", "html", "json"],
        },
    }))
}
