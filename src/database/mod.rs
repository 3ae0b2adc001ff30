pub mod filter;
pub mod manager;
pub mod models;
pub mod pagination;
pub mod repository;

pub use filter::{FilterValue, ListFilter};
pub use manager::{DatabaseError, DatabaseManager};
pub use pagination::PageParams;
pub use repository::Repository;
