//! Dashboard module
//!
//! The landing page: headline numbers for all quotations and the searchable
//! quotations list.

mod cards;
mod handlers;

pub use handlers::get_dashboard_page;
