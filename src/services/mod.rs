pub mod asset_service;
pub mod document_service;
pub mod page_service;
pub mod plan_service;
pub mod privacy_policy_service;
pub mod project_service;
pub mod review_service;
pub mod scenario_service;
pub mod terms_service;

pub use asset_service::{AssetDraft, AssetService};
pub use document_service::{DocumentDraft, DocumentService};
pub use page_service::{PageDraft, PageService};
pub use plan_service::{PlanDraft, PlanService};
pub use privacy_policy_service::{PrivacyPolicyDraft, PrivacyPolicyService};
pub use project_service::{ProjectDraft, ProjectOverview, ProjectService};
pub use review_service::{ReviewDraft, ReviewService};
pub use scenario_service::{ScenarioDraft, ScenarioService};
pub use terms_service::{TermsDraft, TermsService};
