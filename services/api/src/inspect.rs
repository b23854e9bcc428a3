use std::fs;
use std::path::Path;

use chrono::Utc;
use depot_lifecycle::error::AppError;
use depot_lifecycle::lifecycle::Fixtures;
use depot_lifecycle::schema::{catalog, openapi, validate};
use serde_json::Value;

pub(crate) fn print_fixtures() -> Result<(), AppError> {
    let fixtures = Fixtures::build(Utc::now().fixed_offset());
    println!("{}", serde_json::to_string_pretty(&fixtures)?);
    Ok(())
}

pub(crate) fn print_schema(name: Option<&str>) -> Result<(), AppError> {
    let document = match name {
        Some(name) => schema_document(name)?,
        None => openapi::document(),
    };
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn schema_document(name: &str) -> Result<Value, AppError> {
    let schema = catalog::by_name(name).ok_or_else(|| AppError::UnknownSchema(name.to_string()))?;
    openapi::components()
        .remove(schema.name)
        .ok_or_else(|| AppError::UnknownSchema(name.to_string()))
}

pub(crate) fn validate_document(schema_name: &str, path: &Path) -> Result<(), AppError> {
    let schema = catalog::by_name(schema_name)
        .ok_or_else(|| AppError::UnknownSchema(schema_name.to_string()))?;
    let raw = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&raw)?;

    if let Err(violations) = validate(schema, &document) {
        for violation in &violations.violations {
            eprintln!("  {violation}");
        }
        return Err(violations.into());
    }

    println!("{} is a valid {}", path.display(), schema.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lookup_ignores_case() {
        let schema = schema_document("gatecreaterequest").expect("known schema");
        assert_eq!(schema["type"], "object");
    }

    #[test]
    fn unknown_schema_names_are_reported() {
        let err = schema_document("Invoice").expect_err("unknown");
        assert!(matches!(err, AppError::UnknownSchema(name) if name == "Invoice"));
    }

    #[test]
    fn missing_files_surface_io_errors() {
        let err = validate_document("Release", Path::new("/nonexistent/release.json"))
            .expect_err("missing file");
        assert!(matches!(err, AppError::Io(_)));
    }
}
