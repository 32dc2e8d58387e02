//! Search sessions for BlastUI
//!
//! A [`Session`] owns everything one interactive run needs: configuration,
//! the database registry, a temporary workspace for query files and the
//! most recent [`ResultSet`](blastui_results::ResultSet). Searches are
//! described by a [`SearchRequest`] and run one at a time.

pub mod request;
pub mod session;

pub use request::SearchRequest;
pub use session::{Session, SessionPaths};
