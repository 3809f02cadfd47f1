//! Importing transactions from OFX bank statement exports.
//!
//! The import flow has three steps: the user uploads a statement file, the
//! parsed transactions are shown for review and editing, and the reviewed
//! rows are committed to the database in one batch.

mod commit;
mod import_page;
pub mod ofx;
mod preview;

pub use commit::commit_import_endpoint;
pub use import_page::get_import_page;
pub use ofx::{ParsedTransaction, parse_ofx};
pub use preview::preview_import_endpoint;
