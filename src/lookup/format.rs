use crate::dataset::{AddressRecord, SchemaVariant};
use crate::error::{LookupError, Result};

/// Render `record` with the variant's template, one labelled entry per field.
///
/// Inline fields print as `Label: value`, block fields put the value on the
/// following line. A record shorter than the template is `MalformedRecord`.
pub fn format_record(record: &AddressRecord, variant: &SchemaVariant) -> Result<String> {
    let expected = variant.field_count();
    if record.fields.len() < expected {
        return Err(LookupError::malformed_record(
            record.address.clone(),
            expected,
            record.fields.len(),
        ));
    }

    let mut out = String::new();
    for (spec, value) in variant.fields.iter().zip(&record.fields) {
        if spec.block {
            out.push_str(&format!("{}: \n{}\n", spec.label, value));
        } else {
            out.push_str(&format!("{}: {}\n", spec.label, value));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::canonicalize;

    fn record(fields: &[&str]) -> AddressRecord {
        AddressRecord {
            address: canonicalize(fields[0]),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_legacy_template() {
        let r = record(&[
            "УЛ. МИРА 1",
            "ГТС",
            "ОРШ",
            "Центр",
            "свободный",
            "подвал, 2 подъезд",
            "Иванов\n+7 900 000-00-00",
            "",
        ]);
        let text = format_record(&r, &SchemaVariant::legacy()).unwrap();
        assert_eq!(
            text,
            "Адрес: УЛ. МИРА 1\n\
             Принадлежность: ГТС\n\
             Тип: ОРШ\n\
             Район: Центр\n\
             Допуск: свободный\n\
             Размещение: \nподвал, 2 подъезд\n\
             Контакты: \nИванов\n+7 900 000-00-00\n\
             Примечания: \n\n"
        );
    }

    #[test]
    fn test_current_template() {
        let r = record(&["ПР. МИРА 3", "120", "ЖЭК", "ШКАФ", "по заявке", "А", "чердак", "вахта", "ключ"]);
        let text = format_record(&r, &SchemaVariant::current()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Адрес: ПР. МИРА 3");
        assert_eq!(lines[1], "ID узла: 120");
        assert_eq!(lines[5], "Список: А");
        assert_eq!(lines[6], "Размещение: ");
        assert_eq!(lines[7], "чердак");
        assert!(text.ends_with("Примечания: \nключ\n"));
    }

    #[test]
    fn test_deterministic() {
        let r = record(&["А", "1", "2", "3", "4", "5", "6", "7", "8"]);
        let v = SchemaVariant::current();
        assert_eq!(format_record(&r, &v).unwrap(), format_record(&r, &v).unwrap());
    }

    #[test]
    fn test_short_record_is_malformed() {
        let r = record(&["А", "1", "2", "3", "4", "5", "6", "7"]);
        match format_record(&r, &SchemaVariant::current()) {
            Err(LookupError::MalformedRecord {
                address,
                expected,
                found,
            }) => {
                assert_eq!(address, "А");
                assert_eq!(expected, 9);
                assert_eq!(found, 8);
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let r = record(&["А", "1", "2", "3", "4", "5", "6", "7", "лишнее"]);
        let text = format_record(&r, &SchemaVariant::legacy()).unwrap();
        assert!(!text.contains("лишнее"));
    }
}
