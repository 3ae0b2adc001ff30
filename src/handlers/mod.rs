// One controller module per entity; each exposes its DTOs and a `routes()`
// builder that main.rs merges into the app router.
pub mod assets;
pub mod documents;
pub mod pages;
pub mod plans;
pub mod privacy_policies;
pub mod projects;
pub mod reviews;
pub mod scenarios;
pub mod shared;
pub mod terms;
