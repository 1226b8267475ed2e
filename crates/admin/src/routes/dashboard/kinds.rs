//! How each resource kind appears in the dashboard: its table columns and
//! its form fields.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use storeadmin_core::{
    Billboard, BillboardInput, CategoryDetail, CategoryInput, Color, ColorInput, ImageInput,
    OrderDetail, ProductDetail, ProductFilter, ProductInput, SelectOption, Size, SizeInput,
    StoreId,
};

use crate::components::{FormField, TableCell, TableColumn, TableRow};
use crate::db::{CatalogStore, RepositoryError};
use crate::services::{Billboards, Categories, Colors, Orders, Products, ResourceKind, Sizes};

/// A kind with a list page.
pub trait DashboardList: ResourceKind {
    /// Rows have no edit or delete pages.
    const READ_ONLY: bool = false;

    fn columns() -> Vec<TableColumn>;

    fn row(view: &Self::View) -> TableRow;

    /// Filter used by the list page.
    fn dashboard_filter() -> Self::Filter {
        Default::default()
    }
}

/// A kind with create/edit forms.
#[async_trait]
pub trait DashboardForm: DashboardList {
    /// Prefill an edit form.
    fn input_from_view(view: &Self::View) -> Self::Input;

    /// Read a submitted form. Absent checkboxes are unchecked.
    fn input_from_form(form: &HashMap<String, String>) -> Self::Input;

    /// Fields to render, holding `input`'s values. Selects list the store's
    /// rows.
    async fn fields(
        db: &dyn CatalogStore,
        store: StoreId,
        input: &Self::Input,
    ) -> Result<Vec<FormField>, RepositoryError>;
}

fn date(at: &DateTime<Utc>) -> TableCell {
    TableCell::text(at.format("%B %-d, %Y").to_string())
}

fn value(form: &HashMap<String, String>, key: &str) -> String {
    form.get(key).cloned().unwrap_or_default()
}

fn checked(form: &HashMap<String, String>, key: &str) -> bool {
    form.contains_key(key)
}

// =============================================================================
// Billboards
// =============================================================================

impl DashboardList for Billboards {
    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::new("label", "Label"),
            TableColumn::new("createdAt", "Date"),
        ]
    }

    fn row(billboard: &Billboard) -> TableRow {
        TableRow {
            id: billboard.id.as_uuid(),
            cells: vec![TableCell::text(&billboard.label), date(&billboard.created_at)],
        }
    }
}

#[async_trait]
impl DashboardForm for Billboards {
    fn input_from_view(billboard: &Billboard) -> BillboardInput {
        BillboardInput {
            label: billboard.label.clone(),
            image_url: billboard.image_url.clone(),
        }
    }

    fn input_from_form(form: &HashMap<String, String>) -> BillboardInput {
        BillboardInput {
            label: value(form, "label"),
            image_url: value(form, "imageUrl"),
        }
    }

    async fn fields(
        _db: &dyn CatalogStore,
        _store: StoreId,
        input: &BillboardInput,
    ) -> Result<Vec<FormField>, RepositoryError> {
        Ok(vec![
            FormField::url("imageUrl", "Background image", &input.image_url),
            FormField::text("label", "Label", &input.label),
        ])
    }
}

// =============================================================================
// Categories
// =============================================================================

impl DashboardList for Categories {
    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", "Name"),
            TableColumn::new("billboard", "Billboard"),
            TableColumn::new("createdAt", "Date"),
        ]
    }

    fn row(detail: &CategoryDetail) -> TableRow {
        TableRow {
            id: detail.category.id.as_uuid(),
            cells: vec![
                TableCell::text(&detail.category.name),
                TableCell::text(&detail.billboard.label),
                date(&detail.category.created_at),
            ],
        }
    }
}

#[async_trait]
impl DashboardForm for Categories {
    fn input_from_view(detail: &CategoryDetail) -> CategoryInput {
        CategoryInput {
            name: detail.category.name.clone(),
            billboard_id: detail.category.billboard_id.to_string(),
        }
    }

    fn input_from_form(form: &HashMap<String, String>) -> CategoryInput {
        CategoryInput {
            name: value(form, "name"),
            billboard_id: value(form, "billboardId"),
        }
    }

    async fn fields(
        db: &dyn CatalogStore,
        store: StoreId,
        input: &CategoryInput,
    ) -> Result<Vec<FormField>, RepositoryError> {
        let billboards = db.list_billboards(store).await?;
        Ok(vec![
            FormField::text("name", "Name", &input.name),
            FormField::select(
                "billboardId",
                "Billboard",
                &input.billboard_id,
                SelectOption::from_all(&billboards),
            ),
        ])
    }
}

// =============================================================================
// Sizes
// =============================================================================

impl DashboardList for Sizes {
    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", "Name"),
            TableColumn::new("value", "Value"),
            TableColumn::new("createdAt", "Date"),
        ]
    }

    fn row(size: &Size) -> TableRow {
        TableRow {
            id: size.id.as_uuid(),
            cells: vec![
                TableCell::text(&size.name),
                TableCell::text(&size.value),
                date(&size.created_at),
            ],
        }
    }
}

#[async_trait]
impl DashboardForm for Sizes {
    fn input_from_view(size: &Size) -> SizeInput {
        SizeInput {
            name: size.name.clone(),
            value: size.value.clone(),
        }
    }

    fn input_from_form(form: &HashMap<String, String>) -> SizeInput {
        SizeInput {
            name: value(form, "name"),
            value: value(form, "value"),
        }
    }

    async fn fields(
        _db: &dyn CatalogStore,
        _store: StoreId,
        input: &SizeInput,
    ) -> Result<Vec<FormField>, RepositoryError> {
        Ok(vec![
            FormField::text("name", "Name", &input.name),
            FormField::text("value", "Value", &input.value),
        ])
    }
}

// =============================================================================
// Colors
// =============================================================================

impl DashboardList for Colors {
    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", "Name"),
            TableColumn::new("value", "Value"),
            TableColumn::new("createdAt", "Date"),
        ]
    }

    fn row(color: &Color) -> TableRow {
        TableRow {
            id: color.id.as_uuid(),
            cells: vec![
                TableCell::text(&color.name),
                TableCell::swatch(&color.value),
                date(&color.created_at),
            ],
        }
    }
}

#[async_trait]
impl DashboardForm for Colors {
    fn input_from_view(color: &Color) -> ColorInput {
        ColorInput {
            name: color.name.clone(),
            value: color.value.clone(),
        }
    }

    fn input_from_form(form: &HashMap<String, String>) -> ColorInput {
        ColorInput {
            name: value(form, "name"),
            value: value(form, "value"),
        }
    }

    async fn fields(
        _db: &dyn CatalogStore,
        _store: StoreId,
        input: &ColorInput,
    ) -> Result<Vec<FormField>, RepositoryError> {
        Ok(vec![
            FormField::text("name", "Name", &input.name),
            FormField::color("value", "Value", &input.value).with_help("Hex code, e.g. #1a2b3c"),
        ])
    }
}

// =============================================================================
// Products
// =============================================================================

impl DashboardList for Products {
    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", "Name"),
            TableColumn::new("isArchived", "Archived"),
            TableColumn::new("isFeatured", "Featured"),
            TableColumn::new("price", "Price"),
            TableColumn::new("category", "Category"),
            TableColumn::new("size", "Size"),
            TableColumn::new("color", "Color"),
            TableColumn::new("createdAt", "Date"),
        ]
    }

    fn row(detail: &ProductDetail) -> TableRow {
        let product = &detail.product;
        TableRow {
            id: product.id.as_uuid(),
            cells: vec![
                TableCell::text(&product.name),
                TableCell::flag(product.is_archived),
                TableCell::flag(product.is_featured),
                TableCell::text(product.price.display()),
                TableCell::text(&detail.category.name),
                TableCell::text(&detail.size.name),
                TableCell::swatch(&detail.color.value),
                date(&product.created_at),
            ],
        }
    }

    /// Owners see archived products too.
    fn dashboard_filter() -> ProductFilter {
        ProductFilter {
            include_archived: true,
            ..ProductFilter::default()
        }
    }
}

#[async_trait]
impl DashboardForm for Products {
    fn input_from_view(detail: &ProductDetail) -> ProductInput {
        let product = &detail.product;
        ProductInput {
            name: product.name.clone(),
            price: Some(product.price.amount().to_string()),
            category_id: product.category_id.to_string(),
            size_id: product.size_id.to_string(),
            color_id: product.color_id.to_string(),
            images: product
                .images
                .iter()
                .map(|image| ImageInput {
                    url: image.url.clone(),
                })
                .collect(),
            is_featured: product.is_featured,
            is_archived: product.is_archived,
        }
    }

    /// Images arrive as one URL per line.
    fn input_from_form(form: &HashMap<String, String>) -> ProductInput {
        ProductInput {
            name: value(form, "name"),
            price: form.get("price").cloned(),
            category_id: value(form, "categoryId"),
            size_id: value(form, "sizeId"),
            color_id: value(form, "colorId"),
            images: value(form, "images")
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|url| ImageInput {
                    url: url.to_owned(),
                })
                .collect(),
            is_featured: checked(form, "isFeatured"),
            is_archived: checked(form, "isArchived"),
        }
    }

    async fn fields(
        db: &dyn CatalogStore,
        store: StoreId,
        input: &ProductInput,
    ) -> Result<Vec<FormField>, RepositoryError> {
        let categories: Vec<SelectOption> = db
            .list_categories(store)
            .await?
            .iter()
            .map(|detail| SelectOption::from(&detail.category))
            .collect();
        let sizes = db.list_sizes(store).await?;
        let colors = db.list_colors(store).await?;
        let images = input
            .images
            .iter()
            .map(|image| image.url.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(vec![
            FormField::textarea("images", "Images", images).with_help("One image URL per line"),
            FormField::text("name", "Name", &input.name),
            FormField::text("price", "Price", input.price.clone().unwrap_or_default()),
            FormField::select("categoryId", "Category", &input.category_id, categories),
            FormField::select("sizeId", "Size", &input.size_id, SelectOption::from_all(&sizes)),
            FormField::select(
                "colorId",
                "Color",
                &input.color_id,
                SelectOption::from_all(&colors),
            ),
            FormField::checkbox("isFeatured", "Featured", input.is_featured)
                .with_help("This product will appear on the home page"),
            FormField::checkbox("isArchived", "Archived", input.is_archived)
                .with_help("This product will not appear anywhere in the store"),
        ])
    }
}

// =============================================================================
// Orders
// =============================================================================

impl DashboardList for Orders {
    const READ_ONLY: bool = true;

    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::new("products", "Products"),
            TableColumn::new("phone", "Phone"),
            TableColumn::new("address", "Address"),
            TableColumn::new("totalPrice", "Total price"),
            TableColumn::new("isPaid", "Paid"),
            TableColumn::new("createdAt", "Date"),
        ]
    }

    fn row(detail: &OrderDetail) -> TableRow {
        let order = &detail.order;
        let products = detail
            .products
            .iter()
            .map(|product| product.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        TableRow {
            id: order.id.as_uuid(),
            cells: vec![
                TableCell::text(products),
                TableCell::text(&order.phone),
                TableCell::text(&order.address),
                TableCell::text(storeadmin_core::format_usd(detail.total_price)),
                TableCell::flag(order.is_paid),
                date(&order.created_at),
            ],
        }
    }
}
