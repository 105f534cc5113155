//! Client-side routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation request (path or route name)
//!     → router.rs (normalize, follow redirects)
//!     → table.rs (exact lookup in the frozen route table)
//!     → matcher.rs (path normalization rules)
//!     → history.rs (push/replace entry under the base URL)
//!     → Return: Resolved view or NavigationError
//!
//! Table construction (at startup):
//!     Route[]
//!     → Check path/name uniqueness
//!     → Check root redirect and redirect termination
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Table is data, validated independently of any rendering
//! - Exact static matching only (no params, no wildcards)
//! - Unmatched paths produce an explicit NotFound outcome
//! - Deterministic: same input always resolves to the same outcome

pub mod error;
pub mod history;
pub mod matcher;
pub mod router;
pub mod table;

pub use error::{NavigationError, RouteTableError};
pub use history::WebHistory;
pub use router::{Location, Resolved, Router};
pub use table::{Binding, Outcome, Route, RouteTable, View};
