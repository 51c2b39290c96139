//! Configuration loading and parsing.
//!
//! Parses a `lessontron.toml` file named explicitly by the binary
//! (`--config`): the width fallback policy (`[width] default`, `margin`) and
//! the render theme name (`[render] theme`). Every key is optional and falls
//! back to the built-in default.
//!
//! Nothing is discovered: without an explicit path no file is read, so the
//! only persisted state a run depends on is the lesson document itself.
//!
//! Loading is tolerant: a missing file yields defaults, an unparsable one
//! yields defaults plus a `config_parse_failed` warning. The theme is kept as
//! the raw string; the renderer validates it. Unknown fields are ignored so
//! older binaries keep reading newer files.

use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct WidthConfig {
    #[serde(default = "WidthConfig::default_columns")]
    pub default: u16,
    #[serde(default = "WidthConfig::default_margin")]
    pub margin: u16,
}

impl Default for WidthConfig {
    fn default() -> Self {
        Self {
            default: Self::default_columns(),
            margin: Self::default_margin(),
        }
    }
}

impl WidthConfig {
    const fn default_columns() -> u16 {
        80
    }
    const fn default_margin() -> u16 {
        2
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    #[serde(default = "RenderConfig::default_theme")]
    pub theme: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            theme: Self::default_theme(),
        }
    }
}

impl RenderConfig {
    fn default_theme() -> String {
        "auto".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub width: WidthConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,     // original file string (optional)
    pub source: Option<PathBuf>, // file the values came from
    pub file: ConfigFile,        // parsed (or default) data
}

/// Load `path` when given; `None` means built-in defaults and no file access.
pub fn load_from(path: Option<PathBuf>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let Ok(content) = fs::read_to_string(&path) else {
        debug!(target: "config", path = %path.display(), "config_absent");
        return Config::default();
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            debug!(target: "config", path = %path.display(), "config_loaded");
            Config {
                raw: Some(content),
                source: Some(path),
                file,
            }
        }
        Err(e) => {
            warn!(
                target: "config",
                path = %path.display(),
                error = %e.message(),
                "config_parse_failed"
            );
            Config::default()
        }
    }
}

impl Config {
    /// Fallback width when the probe fails. A configured zero would leave no
    /// room to render, so it is raised to one column.
    pub fn effective_default_width(&self) -> u16 {
        let raw = self.file.width.default;
        let clamped = raw.max(1);
        if clamped != raw {
            info!(target: "config", raw, clamped, "width_default_clamped");
        }
        clamped
    }

    pub fn margin(&self) -> u16 {
        self.file.width.margin
    }

    pub fn theme(&self) -> &str {
        &self.file.render.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn capture<F: FnOnce()>(level: Level, f: F) -> String {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();
        with_default(subscriber, f);
        let bytes = buffer.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml")));
        assert!(cfg.raw.is_none());
        assert!(cfg.source.is_none());
        assert_eq!(cfg.file.width.default, 80);
        assert_eq!(cfg.margin(), 2);
        assert_eq!(cfg.theme(), "auto");
    }

    #[test]
    fn parses_all_sections() {
        let tmp = write_config(
            "[width]\ndefault = 100\nmargin = 4\n[render]\ntheme = \"light\"\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf()));
        assert_eq!(cfg.effective_default_width(), 100);
        assert_eq!(cfg.margin(), 4);
        assert_eq!(cfg.theme(), "light");
        assert_eq!(cfg.source.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = write_config("[width]\nmargin = 0\nunknown_key = true\n");
        let cfg = load_from(Some(tmp.path().to_path_buf()));
        assert_eq!(cfg.margin(), 0);
        assert_eq!(cfg.file.width.default, 80);
        assert_eq!(cfg.theme(), "auto");
        assert!(cfg.raw.is_some());
    }

    #[test]
    fn unparsable_file_falls_back_with_warning() {
        let tmp = write_config("[width\ndefault = \"wide\"\n");
        let path = tmp.path().to_path_buf();
        let mut cfg = None;
        let logs = capture(Level::WARN, || cfg = Some(load_from(Some(path))));
        let cfg = cfg.unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert!(logs.contains("WARN config:"));
        assert!(logs.contains("config_parse_failed"));
    }

    #[test]
    fn zero_default_width_is_clamped_with_info_event() {
        let tmp = write_config("[width]\ndefault = 0\n");
        let cfg = load_from(Some(tmp.path().to_path_buf()));
        let mut width = 0;
        let logs = capture(Level::INFO, || width = cfg.effective_default_width());
        assert_eq!(width, 1);
        assert!(logs.contains("INFO config:"));
        assert!(logs.contains("width_default_clamped"));
    }

    #[test]
    fn no_path_reads_nothing() {
        let mut cfg = None;
        let logs = capture(Level::DEBUG, || cfg = Some(load_from(None)));
        let cfg = cfg.unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.file, ConfigFile::default());
        assert!(!logs.contains("config_absent"));
        assert!(!logs.contains("config_loaded"));
    }

    #[test]
    fn document_key_is_ignored() {
        let tmp = write_config("document = \"other.md\"\n[render]\ntheme = \"dark\"\n");
        let cfg = load_from(Some(tmp.path().to_path_buf()));
        assert_eq!(cfg.theme(), "dark");
    }
}
