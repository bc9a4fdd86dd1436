//! GreenBidz domain types.
//!
//! Wire and value types shared by the API client: ids, persisted session state,
//! listings, reference data and the payloads of the typed operations. No I/O.

pub mod analysis;
pub mod auth;
pub mod catalog;
pub mod common;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod language;
pub mod product;
pub mod profile;
pub mod session;
pub mod upload;

pub use analysis::AnalysisResult;
pub use auth::{LoginRequest, LoginResponse, RegisterRequest};
pub use catalog::{AuctionGroup, Category, Country, Subcategory};
pub use envelope::{server_message, Envelope};
pub use error::DomainError;
pub use ids::{AuctionGroupId, CategoryId, CountryId, ProductId, UserId};
pub use language::Language;
pub use product::{Product, ProductStatus, ProductSubmission};
pub use profile::{ProfileUpdate, UserProfile};
pub use session::{storage_keys, SessionCredentials, LOGGED_IN_FLAG};
pub use upload::Upload;
