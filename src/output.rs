use crate::error::CrawlError;
use crate::results::EventRecord;
use std::fs;
use std::path::Path;

/// Default file the CLI writes the collected events to
pub const DEFAULT_OUTPUT_FILE: &str = "events.json";

/// Indented JSON array of events; absent fields become `null`
pub fn render_json(records: &[EventRecord]) -> Result<String, CrawlError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Prints the events to stdout and writes the same JSON to `path`
pub fn emit(records: &[EventRecord], path: impl AsRef<Path>) -> Result<(), CrawlError> {
    let json = render_json(records)?;
    println!("{}", json);
    write_json(&json, path.as_ref())?;
    Ok(())
}

fn write_json(json: &str, path: &Path) -> Result<(), CrawlError> {
    fs::write(path, json)?;
    ::log::info!("Wrote {} bytes to {}", json.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_collection() {
        assert_eq!(render_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_emit_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT_FILE);

        let mut record = EventRecord::new(
            "https://www.ussalabama.com/event/movie-night/".to_string(),
            "USS Alabama".to_string(),
        );
        record.title = Some("Movie Night".to_string());
        emit(&[record.clone()], &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("[\n  {"));
        assert!(written.contains("\"description\": null"));

        let parsed: Vec<EventRecord> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, vec![record]);
    }

    #[test]
    fn test_emit_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("events.json");
        assert!(matches!(emit(&[], &path), Err(CrawlError::Output(_))));
    }
}
