use std::collections::HashSet;
use std::path::Path;

use province_map_shared::ProvinceId;

use crate::error::GeneratorError;

/// IDs listed in the first `provinces = { ... }` block of a state file.
pub fn parse_state_provinces(text: &str) -> Vec<ProvinceId> {
    let mut rest = text;
    while let Some(pos) = rest.find("provinces") {
        let after = rest[pos + "provinces".len()..].trim_start();
        rest = &rest[pos + "provinces".len()..];

        let Some(after) = after.strip_prefix('=') else {
            continue;
        };
        let Some(body) = after.trim_start().strip_prefix('{') else {
            continue;
        };
        let Some(end) = body.find('}') else {
            return Vec::new();
        };
        return body[..end]
            .split(|c: char| !c.is_ascii_digit())
            .filter_map(|token| token.parse().ok())
            .collect();
    }
    Vec::new()
}

/// Union of the province IDs of every `*.txt` file in `dir`.
pub fn load_state_provinces(dir: &Path) -> Result<HashSet<ProvinceId>, GeneratorError> {
    let entries = std::fs::read_dir(dir).map_err(|source| GeneratorError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut ids = HashSet::new();
    let mut files = 0usize;
    for entry in entries {
        let path = entry
            .map_err(|source| GeneratorError::Read {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
            continue;
        }
        let text = std::fs::read_to_string(&path)
            .map_err(|source| GeneratorError::Read { path: path.clone(), source })?;
        ids.extend(parse_state_provinces(&text));
        files += 1;
    }

    tracing::debug!(files, provinces = ids.len(), "loaded state files");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_province_block() {
        let text = "state = {\n\tid = 4\n\tprovinces = {\n\t\t12 13 400\n\t}\n\tmanpower = 100\n}\n";
        assert_eq!(parse_state_provinces(text), vec![12, 13, 400]);
    }

    #[test]
    fn skips_keys_that_only_mention_provinces() {
        let text = "provinces_owned = 3\nprovinces={ 7 8 }";
        assert_eq!(parse_state_provinces(text), vec![7, 8]);
    }

    #[test]
    fn missing_block_yields_nothing() {
        assert!(parse_state_provinces("state = { id = 1 }").is_empty());
        assert!(parse_state_provinces("provinces = { 1 2").is_empty());
    }
}
