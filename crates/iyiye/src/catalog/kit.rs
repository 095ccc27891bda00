//! Kit and kit-category statements (key-value `kitstore` data source).
//!
//! Kits live in single-purpose tables named
//! `<environment>.<application>.kit` and
//! `<environment>.<application>.kit_category`; PartiQL requires the dotted
//! names quoted. One statement per operation — key-value batches never
//! grow past a single statement.

use iyiye_core::resolver::{ParamSpec, StatementTemplate};

use super::CatalogConfig;

/// Fully qualified kit-category table name.
pub fn kit_category_table(config: &CatalogConfig) -> String {
    format!(
        "{}.{}.kit_category",
        config.environment, config.application
    )
}

/// Fully qualified kit table name.
pub fn kit_table(config: &CatalogConfig) -> String {
    format!("{}.{}.kit", config.environment, config.application)
}

/// `Query.kitCategoryList`: every kit category.
pub fn category_list(config: &CatalogConfig) -> StatementTemplate {
    StatementTemplate::new(format!(
        "Select * From \"{}\"",
        kit_category_table(config)
    ))
}

/// `Query.kit`: one kit by id.
pub fn get_kit(config: &CatalogConfig) -> StatementTemplate {
    StatementTemplate::new(format!(
        "Select * From \"{}\" Where id = :ID",
        kit_table(config)
    ))
    .param("ID", ParamSpec::required("id"))
}
