// src/dataset/schema.rs

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::error::{LookupError, Result};

/// One labelled entry of the reply template.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct FieldSpec {
    pub label: String,
    /// Block fields put their value on the line after the label.
    #[serde(default)]
    pub block: bool,
}

impl FieldSpec {
    fn inline(label: &str) -> Self {
        Self {
            label: label.to_string(),
            block: false,
        }
    }

    fn block(label: &str) -> Self {
        Self {
            label: label.to_string(),
            block: true,
        }
    }
}

/// Where the dataset lives inside the workbook and how its rows are printed.
///
/// `fields` is positional: entry `i` labels column `i` of the sheet.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct SchemaVariant {
    pub name: String,
    pub sheet: String,
    pub address_column: String,
    pub fields: Vec<FieldSpec>,
}

impl SchemaVariant {
    /// The first deployment's layout: 8 columns on sheet `БАЗА УЗЛОВ`.
    pub fn legacy() -> Self {
        Self {
            name: "legacy".to_string(),
            sheet: "БАЗА УЗЛОВ".to_string(),
            address_column: "Адрес".to_string(),
            fields: vec![
                FieldSpec::inline("Адрес"),
                FieldSpec::inline("Принадлежность"),
                FieldSpec::inline("Тип"),
                FieldSpec::inline("Район"),
                FieldSpec::inline("Допуск"),
                FieldSpec::block("Размещение"),
                FieldSpec::block("Контакты"),
                FieldSpec::block("Примечания"),
            ],
        }
    }

    /// Layout in use today: 9 columns on sheet `НОВАЯ БАЗА`.
    pub fn current() -> Self {
        Self {
            name: "current".to_string(),
            sheet: "НОВАЯ БАЗА".to_string(),
            address_column: "АДРЕС".to_string(),
            fields: vec![
                FieldSpec::inline("Адрес"),
                FieldSpec::inline("ID узла"),
                FieldSpec::inline("Принадлежность"),
                FieldSpec::inline("Тип"),
                FieldSpec::inline("Допуск"),
                FieldSpec::inline("Список"),
                FieldSpec::block("Размещение"),
                FieldSpec::block("Контакты"),
                FieldSpec::block("Примечания"),
            ],
        }
    }

    /// Parse a custom variant from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let variant: SchemaVariant = serde_yaml::from_str(yaml)
            .map_err(|e| LookupError::config(format!("invalid schema YAML: {}", e)))?;
        variant.validate()?;
        Ok(variant)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|e| {
            LookupError::config(format!("reading schema {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Accepts `legacy`, `current` or a path to a `.yaml`/`.yml` file.
    pub fn resolve(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        match spec.to_lowercase().as_str() {
            "legacy" => Ok(Self::legacy()),
            "current" | "" => Ok(Self::current()),
            lower if lower.ends_with(".yaml") || lower.ends_with(".yml") => {
                Self::from_yaml_file(spec)
            }
            _ => Err(LookupError::config(format!(
                "unknown schema variant '{}' (expected legacy, current or a YAML file)",
                spec
            ))),
        }
    }

    /// Number of positional fields a record needs to be printable.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Column the address must sit in: the template field labelled like the
    /// address column (case-insensitive), or the first column.
    pub fn address_position(&self) -> usize {
        let wanted = self.address_column.to_uppercase();
        self.fields
            .iter()
            .position(|f| f.label.to_uppercase() == wanted)
            .unwrap_or(0)
    }

    fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(LookupError::config(format!(
                "schema variant '{}' defines no fields",
                self.name
            )));
        }
        if self.sheet.is_empty() || self.address_column.is_empty() {
            return Err(LookupError::config(format!(
                "schema variant '{}' needs a sheet and an address column",
                self.name
            )));
        }
        Ok(())
    }
}

impl Default for SchemaVariant {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_variants() {
        let legacy = SchemaVariant::legacy();
        assert_eq!(legacy.field_count(), 8);
        assert_eq!(legacy.sheet, "БАЗА УЗЛОВ");
        assert_eq!(legacy.address_column, "Адрес");
        assert_eq!(legacy.fields.iter().filter(|f| f.block).count(), 3);

        let current = SchemaVariant::current();
        assert_eq!(current.field_count(), 9);
        assert_eq!(current.fields[1].label, "ID узла");
        assert_eq!(SchemaVariant::default(), current);
    }

    #[test]
    fn test_address_position() {
        assert_eq!(SchemaVariant::legacy().address_position(), 0);
        assert_eq!(SchemaVariant::current().address_position(), 0);

        let yaml = "name: ids\nsheet: S\naddress_column: Адрес\nfields:\n  - label: Номер\n  - label: адрес\n";
        assert_eq!(SchemaVariant::from_yaml_str(yaml).unwrap().address_position(), 1);
    }

    #[test]
    fn test_resolve_by_name() {
        assert_eq!(SchemaVariant::resolve("legacy").unwrap().name, "legacy");
        assert_eq!(SchemaVariant::resolve(" Current ").unwrap().name, "current");
        assert_eq!(SchemaVariant::resolve("").unwrap().name, "current");
        assert!(matches!(
            SchemaVariant::resolve("newest"),
            Err(LookupError::Config(_))
        ));
    }

    #[test]
    fn test_yaml_variant() {
        let yaml = r#"
name: depot
sheet: Лист1
address_column: Адрес
fields:
  - label: Адрес
  - label: Телефон
  - label: Комментарий
    block: true
"#;
        let variant = SchemaVariant::from_yaml_str(yaml).unwrap();
        assert_eq!(variant.name, "depot");
        assert_eq!(variant.field_count(), 3);
        assert!(!variant.fields[1].block);
        assert!(variant.fields[2].block);
    }

    #[test]
    fn test_yaml_variant_without_fields_is_rejected() {
        let yaml = "name: empty\nsheet: S\naddress_column: A\nfields: []\n";
        assert!(matches!(
            SchemaVariant::from_yaml_str(yaml),
            Err(LookupError::Config(_))
        ));
    }

    #[test]
    fn test_resolve_yaml_path() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "name: file\nsheet: S\naddress_column: A\nfields:\n  - label: A\n"
        )
        .unwrap();
        let variant = SchemaVariant::resolve(file.path().to_str().unwrap()).unwrap();
        assert_eq!(variant.name, "file");

        assert!(SchemaVariant::resolve("/nonexistent/schema.yml").is_err());
    }
}
