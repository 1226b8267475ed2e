//! View-model components shared by dashboard templates.

pub mod data_table;
pub mod form_field;

pub use data_table::{DataTable, TableCell, TableColumn, TableRow};
pub use form_field::{FormField, Widget};
