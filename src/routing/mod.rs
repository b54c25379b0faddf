//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (route lookup)
//!     → matcher.rs (evaluate compiled pattern)
//!     → Return: matched Route or explicit no-match
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Compile patterns (literal / variable segments)
//!     → Sort by specificity
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route
//! - Most-specific match wins; config order breaks ties

pub mod matcher;
pub mod router;

pub use matcher::{PathPattern, PatternError};
pub use router::{Route, RouteTable, RouteTableError};
