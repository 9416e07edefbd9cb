//! Quotation records: the model, its SQLite store, the create and edit forms and the list view.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;

pub use create::{create_quotation_endpoint, get_new_quotation_page};
pub use db::{
    create_quotation_table, delete_quotation, get_all_quotations, get_quotation, insert_quotation,
    update_quotation,
};
pub use delete::delete_quotation_endpoint;
pub use domain::{Quotation, QuotationFields, QuotationId, Source, Status};
pub use edit::{get_edit_quotation_page, update_quotation_endpoint};
pub use list::{get_quotations_table, quotations_list_view};
