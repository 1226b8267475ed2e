//! Data table component types.
//!
//! Every resource list page renders one [`DataTable`]: a fixed set of
//! columns and one [`TableRow`] per entity with edit/delete actions.

use uuid::Uuid;

/// Column definition for a data table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: &'static str,
    /// Display label for the column header.
    pub label: &'static str,
}

impl TableColumn {
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// One cell. A swatch renders as a colored dot next to the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,
    pub swatch: Option<String>,
}

impl TableCell {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            swatch: None,
        }
    }

    /// A color value shown with its swatch.
    #[must_use]
    pub fn swatch(hex: impl Into<String>) -> Self {
        let hex = hex.into();
        Self {
            text: hex.clone(),
            swatch: Some(hex),
        }
    }

    /// A yes/no flag.
    #[must_use]
    pub fn flag(value: bool) -> Self {
        Self::text(if value { "Yes" } else { "No" })
    }
}

/// One entity in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: Uuid,
    pub cells: Vec<TableCell>,
}

/// A rendered list: columns, rows and where row actions point.
#[derive(Debug, Clone)]
pub struct DataTable {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
    /// Base path for row actions, e.g. `/{store}/billboards`.
    pub base_path: String,
    /// Whether rows link to edit/delete pages.
    pub actions: bool,
}

impl DataTable {
    #[must_use]
    pub const fn new(columns: Vec<TableColumn>, rows: Vec<TableRow>, base_path: String) -> Self {
        Self {
            columns,
            rows,
            base_path,
            actions: true,
        }
    }

    /// Hide the edit/delete row actions.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.actions = false;
        self
    }

    #[must_use]
    pub fn edit_url(&self, row: &TableRow) -> String {
        format!("{}/{}", self.base_path, row.id)
    }

    #[must_use]
    pub fn delete_url(&self, row: &TableRow) -> String {
        format!("{}/{}/delete", self.base_path, row.id)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_action_urls() {
        let id = Uuid::nil();
        let table = DataTable::new(
            vec![TableColumn::new("label", "Label")],
            vec![TableRow {
                id,
                cells: vec![TableCell::text("Summer")],
            }],
            "/s/billboards".to_owned(),
        );
        let row = &table.rows[0];
        assert_eq!(table.edit_url(row), format!("/s/billboards/{id}"));
        assert_eq!(table.delete_url(row), format!("/s/billboards/{id}/delete"));
        assert!(table.actions);
        assert!(!table.read_only().actions);
    }

    #[test]
    fn test_cells() {
        assert_eq!(TableCell::flag(true).text, "Yes");
        let swatch = TableCell::swatch("#ff0000");
        assert_eq!(swatch.swatch.as_deref(), Some("#ff0000"));
    }
}
