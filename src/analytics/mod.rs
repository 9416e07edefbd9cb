//! Analytics module
//!
//! Charts of how quotations are spread over statuses, sources and months,
//! and the clients with the most quotations.

mod charts;
mod handlers;

pub use handlers::get_analytics_page;
