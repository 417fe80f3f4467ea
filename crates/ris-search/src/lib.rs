//! Search entry points for the product catalog: single-vector and fused
//! searches, SKU lookup, and the per-session page cursor.

pub mod bootstrap;
pub mod images;
pub mod pager;
pub mod service;
pub mod session;

pub use images::FsImageLoader;
pub use pager::{page, Direction, PageView, Pager};
pub use service::{Collaborators, FacetFilters, SearchMode, SearchQuery, SearchService};
pub use session::{ResultSource, SearchSession, SessionStore};
