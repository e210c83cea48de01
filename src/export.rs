//! One-shot export of a single snapshot to a JSON file.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use sb8200_adapters::ModemSource;
use sb8200_types::Snapshot;

/// Collect once from `source` and write the snapshot to `path`.
pub async fn export_snapshot<S: ModemSource>(
    source: &S,
    timeout: Duration,
    path: &Path,
) -> Result<Snapshot> {
    let snapshot = source
        .collect_within(timeout)
        .await
        .with_context(|| format!("collecting from {}", source.description()))?;
    write_snapshot(&snapshot, path)?;
    Ok(snapshot)
}

/// Write `snapshot` to `path` as pretty-printed JSON.
pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb8200_types::{DownstreamChannelReading, UpstreamChannelReading};

    #[test]
    fn test_write_snapshot() {
        let snapshot = Snapshot::builder()
            .timestamp_ms(1703160000000)
            .downstream(DownstreamChannelReading {
                channel: 33,
                modulation: -1,
                freq_hz: 957_000_000.0,
                power_dbmv: 4.1,
                snr_db: 40.9,
                correcteds: 9876,
                uncorrectables: 54,
            })
            .upstream(UpstreamChannelReading {
                channel: 2,
                width_hz: 6_400_000,
                freq_hz: 36_000_000,
                power_dbmv: 44.0,
            })
            .build();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        write_snapshot(&snapshot, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: Snapshot = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, snapshot);
        assert!(contents.contains("\"modulation\": -1"));
    }

    #[test]
    fn test_write_snapshot_bad_path() {
        let snapshot = Snapshot::builder().build();
        let err = write_snapshot(&snapshot, Path::new("/nonexistent/dir/out.json")).unwrap_err();
        assert!(err.to_string().contains("creating"));
    }
}
