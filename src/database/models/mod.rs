pub mod asset;
pub mod document;
pub mod page;
pub mod plan;
pub mod privacy_policy;
pub mod project;
pub mod review;
pub mod scenario;
pub mod terms;

pub use asset::Asset;
pub use document::Document;
pub use page::Page;
pub use plan::Plan;
pub use privacy_policy::PrivacyPolicy;
pub use project::Project;
pub use review::Review;
pub use scenario::Scenario;
pub use terms::Terms;
