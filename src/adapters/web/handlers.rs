pub use crate::adapters::web::payments_handler::payments;
pub use crate::adapters::web::payments_summary_handler::payments_summary;
