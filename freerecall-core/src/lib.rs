pub mod errors;
pub mod material;
pub mod models;
pub mod repo;
pub mod routes;
pub mod scheduler;
pub mod scoring;
pub mod study;
pub mod topic;

pub use errors::*;
pub use material::*;
pub use models::*;
pub use repo::*;
pub use routes::*;
pub use scheduler::*;
pub use scoring::*;
pub use study::*;
pub use topic::*;
