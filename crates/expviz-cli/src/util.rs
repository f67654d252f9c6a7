//! Input files: service results and chart styles.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::schema::style::ChartStyle;

fn read_json_file<T>(kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open {kind} file: {}", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {kind} JSON file: {}", path.display()))?;
    tracing::debug!(kind, path = %path.display(), "loaded JSON file");
    Ok(value)
}

/// Reads a statistics service result payload.
pub fn read_result_file<T>(path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    read_json_file("result", path)
}

/// Reads the chart style, or the default palette when no file is given.
pub fn read_style_file(path: Option<&Path>) -> anyhow::Result<ChartStyle> {
    path.map_or_else(|| Ok(ChartStyle::default()), |path| read_json_file("style", path))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;
    use crate::schema::service::TimingResult;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("expviz-{}-{name}", std::process::id()));
        File::create(&path)
            .unwrap()
            .write_all(contents.as_bytes())
            .unwrap();
        path
    }

    #[test]
    fn test_read_result_file() {
        let path = temp_file("timing.json", r#"{"control_median_time": 30.0}"#);
        let result: TimingResult = read_result_file(&path).unwrap();
        assert_eq!(result.control_median_time, Some(30.0));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_parse_error_names_file() {
        let path = temp_file("broken.json", "{");
        let err = read_result_file::<TimingResult>(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_default_style_without_file() {
        assert_eq!(read_style_file(None).unwrap(), ChartStyle::default());
    }
}
