//! Port definitions for the client's external boundaries.

pub mod outbound;
