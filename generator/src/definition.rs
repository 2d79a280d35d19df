use std::collections::HashMap;

use province_map_shared::ProvinceId;

use crate::error::GeneratorError;

pub type ColorTable = HashMap<[u8; 3], ProvinceId>;

/// Parses `id;r;g;b;...` rows. Rows whose first field is not an integer
/// (headers, comments, blank lines) are skipped.
pub fn parse_definitions(text: &str) -> Result<ColorTable, GeneratorError> {
    let mut table = ColorTable::new();
    for (index, row) in text.lines().enumerate() {
        let line = index + 1;
        let mut fields = row.split(';').map(str::trim);
        let Some(id) = fields.next().and_then(|field| field.parse::<ProvinceId>().ok()) else {
            continue;
        };

        let mut rgb = [0u8; 3];
        for channel in &mut rgb {
            let field = fields.next().ok_or_else(|| GeneratorError::Definition {
                line,
                reason: format!("province {id} has fewer than three colour channels"),
            })?;
            *channel = field.parse().map_err(|_| GeneratorError::Definition {
                line,
                reason: format!("invalid colour channel '{field}'"),
            })?;
        }
        table.insert(rgb, id);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_header_and_reads_rows() {
        let table = parse_definitions("province;red;green;blue;x;y\n1;10;20;30;land;false\n\n2;0;0;255;sea;true\n")
            .expect("valid definitions");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&[10, 20, 30]), Some(&1));
        assert_eq!(table.get(&[0, 0, 255]), Some(&2));
    }

    #[test]
    fn rejects_bad_channel() {
        let err = parse_definitions("5;300;0;0\n").expect_err("channel overflow");
        assert!(matches!(err, GeneratorError::Definition { line: 1, .. }));
    }

    #[test]
    fn rejects_short_row() {
        let err = parse_definitions("h\n5;1;2\n").expect_err("missing blue");
        assert!(matches!(err, GeneratorError::Definition { line: 2, .. }));
    }
}
