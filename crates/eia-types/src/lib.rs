pub mod compliance;
pub mod error;
pub mod ids;
pub mod modules;
pub mod project;
pub mod results;

pub use compliance::{ComplianceStatus, OverallStatus};
pub use error::ValidationError;
pub use ids::new_id;
pub use project::{ProjectRecord, ProjectType};
pub use results::{AssessmentSummary, ModuleReport, ModuleResult, ModuleResults};
