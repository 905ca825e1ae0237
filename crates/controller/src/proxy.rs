//! Proxy pool loading.
//!
//! One `host:port` per line. A line that does not parse is warned about and
//! skipped; a single bad line never aborts the load. Blank lines are ignored
//! silently.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

use yantra_common::{ProxyEntry, YantraError};

/// Outcome of a proxy load: the usable entries plus how many lines were
/// dropped on the floor.
#[derive(Debug, Default)]
pub struct LoadedProxies {
    pub entries: Vec<ProxyEntry>,
    pub skipped: usize,
}

impl LoadedProxies {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load proxies from a file. The handle is released when this returns.
pub fn load_proxies<P: AsRef<Path>>(path: P) -> Result<LoadedProxies> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open proxy file {}", path.display()))?;
    Ok(read_proxies(BufReader::new(file)))
}

/// Load proxies from any line-oriented source.
pub fn read_proxies<R: BufRead>(reader: R) -> LoadedProxies {
    let mut loaded = LoadedProxies::default();
    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(err) => {
                // Unreadable remainder ends the stream, keep what we have.
                warn!("Proxy source read failed: {err}");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_proxy_line(line) {
            Ok(entry) => loaded.entries.push(entry),
            Err(err) => {
                warn!("Error while loading proxy: {err}");
                loaded.skipped += 1;
            }
        }
    }
    loaded
}

/// Split a `host:port` line on the first `:`.
fn parse_proxy_line(line: &str) -> Result<ProxyEntry, YantraError> {
    let Some((host, port)) = line.split_once(':') else {
        return Err(YantraError::InvalidProxy {
            line: line.to_string(),
            reason: "missing ':' separator".to_string(),
        });
    };
    if host.is_empty() {
        return Err(YantraError::InvalidProxy {
            line: line.to_string(),
            reason: "empty host".to_string(),
        });
    }
    let port: u16 = port.parse().map_err(|_| YantraError::InvalidProxy {
        line: line.to_string(),
        reason: format!("invalid port '{port}'"),
    })?;
    Ok(ProxyEntry::new(host, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn tolerates_bad_lines() {
        let input = Cursor::new("1.2.3.4:8080\ngarbage\n5.6.7.8:3128\n");
        let loaded = read_proxies(input);
        assert_eq!(
            loaded.entries,
            vec![
                ProxyEntry::new("1.2.3.4", 8080),
                ProxyEntry::new("5.6.7.8", 3128),
            ]
        );
        assert_eq!(loaded.skipped, 1);
    }

    #[test]
    fn blank_trailing_line_is_not_an_error() {
        let input = Cursor::new("1.2.3.4:8080\n\n");
        let loaded = read_proxies(input);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.skipped, 0);
    }

    #[test]
    fn empty_source_yields_empty_pool() {
        let loaded = read_proxies(Cursor::new(""));
        assert!(loaded.is_empty());
        assert_eq!(loaded.skipped, 0);
    }

    #[test]
    fn line_parse_reports_reason() {
        assert!(parse_proxy_line("10.0.0.1:9000").is_ok());
        let err = parse_proxy_line("10.0.0.1:notaport").unwrap_err();
        assert!(err.to_string().contains("notaport"));
        assert!(parse_proxy_line("noseparator").is_err());
        assert!(parse_proxy_line(":8080").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_proxies("/definitely/not/here.txt").is_err());
    }
}
