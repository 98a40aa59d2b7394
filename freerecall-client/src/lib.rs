//! Client side of the FreeRecall study contract.
//!
//! [`StudyApi`] is the four-call seam to the backend; [`HttpStudyApi`] speaks
//! it over HTTP. The [`views`] module holds one view model per page. Each view
//! owns only its own state, fetches on demand and never caches across
//! navigations.

pub mod api;
pub mod http;
pub mod views;

pub use api::{ApiError, StudyApi};
pub use http::{HttpStudyApi, DEFAULT_BASE_URL};
pub use views::*;
