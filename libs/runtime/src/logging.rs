use crate::config::{LoggingConfig, Section};
use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use parking_lot::Mutex;
use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

const DEFAULT_SECTION: &str = "default";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// `None` means the sink is switched off; unknown names fall back to INFO.
fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        "off" | "none" => None,
        _ => Some(LevelFilter::INFO),
    }
}

/// Empty `file_level` inherits the console level.
fn file_level(section: &Section) -> Option<LevelFilter> {
    if section.file_level.trim().is_empty() {
        parse_level(&section.console_level)
    } else {
        parse_level(&section.file_level)
    }
}

// -------- rotating file writer --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

impl<'a> fmt::MakeWriter<'a> for RotWriter {
    type Writer = RotWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Relative log paths live under the service home dir.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating_writer(section: &Section, base_dir: &Path) -> std::io::Result<RotWriter> {
    let path = resolve_log_path(&section.file, base_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let max_bytes = section.max_size_mb.unwrap_or(100) * 1024 * 1024;
    let rot = FileRotate::new(
        &path,
        AppendTimestamp::default(FileLimit::MaxFiles(section.max_backups.unwrap_or(3))),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

// -------- filters --------

/// Console filter: the default section sets the floor, named sections override
/// their own targets.
fn console_targets(cfg: &LoggingConfig) -> Targets {
    let default = cfg
        .get(DEFAULT_SECTION)
        .and_then(|s| parse_level(&s.console_level))
        .unwrap_or(LevelFilter::OFF);

    cfg.iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .fold(Targets::new().with_default(default), |t, (name, s)| {
            t.with_target(name.clone(), parse_level(&s.console_level).unwrap_or(LevelFilter::OFF))
        })
}

/// Default file filter: everything except targets that own a file of their own.
fn default_file_targets(cfg: &LoggingConfig, level: LevelFilter) -> Targets {
    cfg.iter()
        .filter(|(name, s)| name.as_str() != DEFAULT_SECTION && !s.file.trim().is_empty())
        .fold(Targets::new().with_default(level), |t, (name, _)| {
            t.with_target(name.clone(), LevelFilter::OFF)
        })
}

fn file_layer(writer: RotWriter, filter: Targets) -> BoxedLayer {
    fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(writer)
        .with_filter(filter)
        .boxed()
}

fn build_layers(cfg: &LoggingConfig, base_dir: &Path) -> Vec<BoxedLayer> {
    let mut layers: Vec<BoxedLayer> = vec![fmt::layer()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_targets(cfg))
        .boxed()];

    for (name, section) in cfg {
        if section.file.trim().is_empty() {
            continue;
        }
        let Some(level) = file_level(section) else {
            continue;
        };
        let writer = match open_rotating_writer(section, base_dir) {
            Ok(w) => w,
            Err(e) => {
                eprintln!("Failed to open log file '{}' for '{}': {}", section.file, name, e);
                continue;
            }
        };
        let filter = if name == DEFAULT_SECTION {
            default_file_targets(cfg, level)
        } else {
            Targets::new().with_target(name.clone(), level)
        };
        layers.push(file_layer(writer, filter));
    }
    layers
}

/// Install the global subscriber.
/// Relative file paths are resolved against `base_dir` (usually `server.home_dir`).
/// Calling this twice is harmless; the second install is ignored.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // sqlx logs through `log`
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let _ = Registry::default().with(build_layers(cfg, base_dir)).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;

    fn section(console: &str, file: &str, file_level: &str) -> Section {
        Section {
            console_level: console.into(),
            file: file.into(),
            file_level: file_level.into(),
            max_backups: Some(2),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn level_parsing() {
        assert_eq!(parse_level("trace"), Some(LevelFilter::TRACE));
        assert_eq!(parse_level("DEBUG"), Some(LevelFilter::DEBUG));
        assert_eq!(parse_level(" Warn "), Some(LevelFilter::WARN));
        assert_eq!(parse_level("off"), None);
        assert_eq!(parse_level("none"), None);
        assert_eq!(parse_level("loud"), Some(LevelFilter::INFO));
    }

    #[test]
    fn empty_file_level_inherits_console_level() {
        assert_eq!(file_level(&section("warn", "x.log", "")), Some(LevelFilter::WARN));
        assert_eq!(file_level(&section("warn", "x.log", "trace")), Some(LevelFilter::TRACE));
    }

    #[test]
    fn console_targets_override_per_crate() {
        let mut cfg = default_logging_config();
        cfg.insert("sqlx".into(), section("warn", "", ""));
        let targets = console_targets(&cfg);
        assert!(targets.would_enable("products::domain", &tracing::Level::INFO));
        assert!(!targets.would_enable("sqlx::query", &tracing::Level::INFO));
        assert!(targets.would_enable("sqlx::query", &tracing::Level::WARN));
    }

    #[test]
    fn default_file_skips_targets_with_own_file() {
        let mut cfg = default_logging_config();
        cfg.insert("api_ingress".into(), section("info", "logs/http.log", "debug"));
        cfg.insert("sqlx".into(), section("warn", "", ""));
        let targets = default_file_targets(&cfg, LevelFilter::DEBUG);
        assert!(!targets.would_enable("api_ingress::request_id", &tracing::Level::ERROR));
        assert!(targets.would_enable("sqlx::query", &tracing::Level::DEBUG));
    }

    #[test]
    fn log_paths_resolve_against_home_dir() {
        let tmp = tempdir().unwrap();
        let resolved = resolve_log_path("logs/test.log", tmp.path());
        assert!(resolved.starts_with(tmp.path()));
        assert_eq!(resolve_log_path("/var/log/x.log", tmp.path()), PathBuf::from("/var/log/x.log"));
    }

    #[test]
    fn rotating_writer_creates_parent_dirs() {
        let tmp = tempdir().unwrap();
        let s = section("info", "nested/dir/app.log", "debug");
        let mut w = open_rotating_writer(&s, tmp.path()).expect("writer");
        w.write_all(b"hello\n").unwrap();
        w.flush().unwrap();
        assert!(tmp.path().join("nested/dir").is_dir());
    }

    #[test]
    fn layers_include_one_per_file_section() {
        let tmp = tempdir().unwrap();
        let mut cfg = default_logging_config();
        cfg.insert("api_ingress".into(), section("info", "logs/http.log", ""));
        cfg.insert("sqlx".into(), section("warn", "", ""));
        // console + default file + api_ingress file
        assert_eq!(build_layers(&cfg, tmp.path()).len(), 3);
    }
}
