//! `check-chaos`: validate a chaos document and show its weight table

use std::io;
use std::path::Path;

use domain::WeightedChaos;
use infrastructure::chaos::{
    ChaosLoadError, DocumentFormat, default_profile, load_chaos_file, load_chaos_reader,
    parse_chaos_str,
};

/// Load the document at `source` (`-` reads standard input)
///
/// `format` overrides detection from the file extension.
pub fn load(source: &str, format: Option<DocumentFormat>) -> Result<WeightedChaos, ChaosLoadError> {
    if source == "-" {
        return load_chaos_reader(io::stdin().lock(), format.unwrap_or(DocumentFormat::Detect));
    }

    let path = Path::new(source);
    match format {
        None => load_chaos_file(path),
        Some(format) => {
            let text = std::fs::read_to_string(path).map_err(|source| ChaosLoadError::Io {
                path: path.display().to_string(),
                source,
            })?;
            parse_chaos_str(&text, format)
        },
    }
}

/// The built-in profile
pub fn load_default() -> Result<WeightedChaos, ChaosLoadError> {
    default_profile()
}

/// One line per entry with the draw range it owns, then the remainder
pub fn weight_table(chaos: &WeightedChaos) -> Vec<String> {
    let mut lines = vec![format!("{:>3}  {:>7}  {:<18}  {}", "#", "weight", "draw", "fault")];

    let mut start = 0.0;
    for (index, entry) in chaos.entries().iter().enumerate() {
        let end = start + entry.weight;
        lines.push(format!(
            "{index:>3}  {:>6.2}%  [{start:>6.2}, {end:>6.2})  {}",
            entry.weight, entry.action
        ));
        start = end;
    }

    let remainder = 100.0 - chaos.total_weight();
    if remainder > 0.0 {
        lines.push(format!(
            "{:>3}  {remainder:>6.2}%  [{start:>6.2}, {:>6.2})  no fault",
            "-", 100.0
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_table_has_remainder() {
        let table = weight_table(&load_default().unwrap());
        assert_eq!(table.len(), 6);
        assert!(table[1].contains("latency 10000ms"));
        assert!(table[3].contains("[ 10.00,  15.00)"));
        assert!(table[5].ends_with("no fault"));
        assert!(table[5].contains("80.00%"));
    }

    #[test]
    fn full_weight_has_no_remainder() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"[{"statusCode": {"code": 503}}]"#).unwrap();

        let chaos = load(&file.path().display().to_string(), None).unwrap();
        let table = weight_table(&chaos);
        assert_eq!(table.len(), 2);
        assert!(table[1].contains("status 503"));
    }

    #[test]
    fn explicit_format_overrides_extension() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(br#"{"chaos": [{"weight": 1, "latency": {"latency": 5}}]}"#)
            .unwrap();

        let path = file.path().display().to_string();
        assert!(load(&path, None).is_err());
        let chaos = load(&path, Some(DocumentFormat::Json)).unwrap();
        assert_eq!(chaos.len(), 1);
    }

    #[test]
    fn invalid_document_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(b"[[chaos]]\nweight = 101\n[chaos.statusCode]\ncode = 500\n")
            .unwrap();
        let err = load(&file.path().display().to_string(), None).unwrap_err();
        assert!(matches!(err, ChaosLoadError::Invalid(_)));
    }
}
