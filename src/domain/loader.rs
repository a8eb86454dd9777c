//! Init-file loader.
//!
//! Reads whitespace-separated commands and applies them to a [`Hierarchy`]:
//!
//! ```text
//! # comment line
//! category <name>
//! appender <name> <layoutKind> <appenderKind> [kind-specific args...]
//! priority <name> <priorityName>
//! ```
//!
//! The first error aborts the load. Lines applied before the failing one
//! stay applied; there is no rollback. Loading the same file twice keeps
//! category identity but attaches every appender a second time.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use super::appenders::{AppenderSpec, DEFAULT_SYSLOG_PORT, LOG_LOCAL7, LOG_USER};
use super::layouts::{BasicLayout, Layout, PatternLayout, SimpleLayout};
use super::tokenizer::Tokenizer;
use super::{Category, ConfigureError, ErrorKind, Hierarchy, Priority};

/// Default upper bound on a conversion pattern, in characters.
pub const DEFAULT_MAX_PATTERN_LENGTH: usize = 999;

/// Loader limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Pattern text beyond this many characters is discarded.
    pub max_pattern_length: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            max_pattern_length: DEFAULT_MAX_PATTERN_LENGTH,
        }
    }
}

/// Top-level init-file commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Appender,
    Priority,
    Category,
}

impl Command {
    fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "appender" => Some(Command::Appender),
            "priority" => Some(Command::Priority),
            "category" => Some(Command::Category),
            _ => None,
        }
    }
}

/// Applies init files to a category hierarchy.
pub struct Configurator<'h> {
    hierarchy: &'h Hierarchy,
    options: LoaderOptions,
}

impl<'h> Configurator<'h> {
    pub fn new(hierarchy: &'h Hierarchy) -> Self {
        Self::with_options(hierarchy, LoaderOptions::default())
    }

    pub fn with_options(hierarchy: &'h Hierarchy, options: LoaderOptions) -> Self {
        Self { hierarchy, options }
    }

    /// Load the init file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `SourceUnreadable` before parsing anything if the file cannot
    /// be read, otherwise the first error found while applying it.
    pub fn configure(&self, path: &Path) -> Result<(), ConfigureError> {
        let bytes = fs::read(path).map_err(|e| {
            ConfigureError::new(
                ErrorKind::SourceUnreadable,
                format!(
                    "Config file {} does not exist or is unreadable: {}",
                    path.display(),
                    e
                ),
            )
        })?;
        info!("Loading logging configuration from {}", path.display());
        self.configure_str(&String::from_utf8_lossy(&bytes))
    }

    /// Apply init-file text.
    pub fn configure_str(&self, source: &str) -> Result<(), ConfigureError> {
        let mut tokens = Tokenizer::new(source);

        while let Some(keyword) = tokens.next_token() {
            if keyword.starts_with('#') {
                tokens.skip_line();
                continue;
            }

            let line = tokens.line();
            // A command without a category name is treated as end of input
            let Some(category_name) = tokens.next_token() else {
                debug!("line {}: '{}' without category, stopping", line, keyword);
                break;
            };

            let category = self.resolve_category(category_name);
            debug!("line {}: {} {}", line, keyword, category_name);

            match Command::parse(keyword) {
                Some(Command::Appender) => {
                    self.configure_appender(&mut tokens, &category, category_name)?
                }
                Some(Command::Priority) => {
                    configure_priority(&mut tokens, &category, category_name)?
                }
                // Resolution above already created the category
                Some(Command::Category) => {}
                None => {
                    return Err(ConfigureError::new(
                        ErrorKind::InvalidCommand,
                        format!("Invalid format in logging configuration file. Command: {keyword}"),
                    ));
                }
            }
        }

        Ok(())
    }

    fn resolve_category(&self, name: &str) -> Arc<Category> {
        if name == Hierarchy::ROOT_NAME {
            self.hierarchy.root()
        } else {
            self.hierarchy.get_instance(name)
        }
    }

    fn configure_appender(
        &self,
        tokens: &mut Tokenizer<'_>,
        category: &Category,
        category_name: &str,
    ) -> Result<(), ConfigureError> {
        let (Some(layout_kind), Some(appender_kind)) = (tokens.next_token(), tokens.next_token())
        else {
            debug!("under-specified appender for {}, dropped", category_name);
            return Ok(());
        };

        let spec = parse_appender_spec(tokens, appender_kind, category_name)?;
        let layout = parse_layout(
            tokens,
            layout_kind,
            category_name,
            self.options.max_pattern_length,
        )?;

        debug!(
            "attaching {} appender with {} layout to {}",
            spec.kind(),
            layout.kind(),
            category_name
        );
        category.add_appender(spec.build(category_name, layout));
        Ok(())
    }
}

/// Read the kind-specific arguments of an appender line.
fn parse_appender_spec(
    tokens: &mut Tokenizer<'_>,
    kind: &str,
    category_name: &str,
) -> Result<AppenderSpec, ConfigureError> {
    let spec = match kind {
        "file" => {
            let path = tokens
                .next_token()
                .ok_or_else(|| ConfigureError::missing("filename for file appender", category_name))?;
            AppenderSpec::File {
                path: PathBuf::from(path),
            }
        }
        "console" => AppenderSpec::Console,
        "stdout" => AppenderSpec::Stdout,
        "stderr" => AppenderSpec::Stderr,
        "syslog" => {
            let identity = tokens.next_token().ok_or_else(|| {
                ConfigureError::missing("syslog name for syslog appender", category_name)
            })?;
            let facility = read_facility(tokens, category_name)?;
            AppenderSpec::Syslog {
                identity: identity.to_string(),
                facility,
            }
        }
        "remotesyslog" => {
            let identity = tokens.next_token().ok_or_else(|| {
                ConfigureError::missing("syslog name for remote syslog appender", category_name)
            })?;
            let relay_host = tokens.next_token().ok_or_else(|| {
                ConfigureError::missing("syslog host for remote syslog appender", category_name)
            })?;
            let facility = read_facility(tokens, category_name)?;
            let port = tokens.next_parsed::<u16>().unwrap_or(DEFAULT_SYSLOG_PORT);
            AppenderSpec::RemoteSyslog {
                identity: identity.to_string(),
                relay_host: relay_host.to_string(),
                facility,
                port,
            }
        }
        other => {
            return Err(ConfigureError::new(
                ErrorKind::InvalidAppenderKind,
                format!(
                    "Invalid appender name ({other}) in logging configuration file for category: {category_name}"
                ),
            ));
        }
    };
    Ok(spec)
}

/// Optional facility code, `LOG_USER` when absent. Codes must lie within
/// `LOG_KERN..=LOG_LOCAL7`.
fn read_facility(tokens: &mut Tokenizer<'_>, category_name: &str) -> Result<i32, ConfigureError> {
    match tokens.next_parsed::<i32>() {
        None => Ok(LOG_USER),
        Some(facility) if (0..=LOG_LOCAL7).contains(&facility) => Ok(facility),
        Some(facility) => Err(ConfigureError::new(
            ErrorKind::MissingArgument,
            format!(
                "Invalid syslog facility ({facility}) in logging configuration file for category: {category_name}"
            ),
        )),
    }
}

/// Build the layout named by `kind`, reading the pattern text if needed.
fn parse_layout(
    tokens: &mut Tokenizer<'_>,
    kind: &str,
    category_name: &str,
    max_pattern_length: usize,
) -> Result<Box<dyn Layout>, ConfigureError> {
    match kind {
        "basic" => Ok(Box::new(BasicLayout::new())),
        "simple" => Ok(Box::new(SimpleLayout::new())),
        "pattern" => {
            let pattern = tokens.rest_of_line(max_pattern_length);
            let layout = PatternLayout::new(pattern).map_err(|e| {
                ConfigureError::new(
                    ErrorKind::InvalidPattern,
                    format!(
                        "Invalid pattern ({pattern}) in logging configuration file for category: {category_name}: {e}"
                    ),
                )
            })?;
            Ok(Box::new(layout))
        }
        other => Err(ConfigureError::new(
            ErrorKind::InvalidLayoutKind,
            format!(
                "Invalid layout ({other}) in logging configuration file for category: {category_name}"
            ),
        )),
    }
}

fn configure_priority(
    tokens: &mut Tokenizer<'_>,
    category: &Category,
    category_name: &str,
) -> Result<(), ConfigureError> {
    let name = tokens
        .next_token()
        .ok_or_else(|| ConfigureError::missing("priority", category_name))?;
    let priority = Priority::from_name(name).ok_or_else(|| {
        ConfigureError::new(
            ErrorKind::InvalidPriority,
            format!(
                "Invalid priority ({name}) in logging configuration file for category: {category_name}"
            ),
        )
    })?;
    category.set_priority(priority);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn load(source: &str) -> (Hierarchy, Result<(), ConfigureError>) {
        let hierarchy = Hierarchy::new();
        let result = Configurator::new(&hierarchy).configure_str(source);
        (hierarchy, result)
    }

    fn spec_of(args: &str, kind: &str) -> Result<AppenderSpec, ConfigureError> {
        let mut tokens = Tokenizer::new(args);
        parse_appender_spec(&mut tokens, kind, "app")
    }

    #[test]
    fn test_same_name_resolves_to_same_category() {
        let (hierarchy, result) =
            load("category app\nappender app basic console\npriority app DEBUG\n");
        result.unwrap();
        let app = hierarchy.exists("app").unwrap();
        assert!(Arc::ptr_eq(&app, &hierarchy.get_instance("app")));
        assert_eq!(app.appender_count(), 1);
        assert_eq!(app.priority(), Some(Priority::DEBUG));
    }

    #[test]
    fn test_root_name_binds_root() {
        let (hierarchy, result) = load("priority root ERROR\nappender root simple stderr\n");
        result.unwrap();
        let root = hierarchy.root();
        assert_eq!(root.priority(), Some(Priority::ERROR));
        assert_eq!(root.appender_count(), 1);
        assert_eq!(hierarchy.current_categories().len(), 1);
    }

    #[test]
    fn test_file_appender_with_basic_layout() {
        let (hierarchy, result) = load("appender app basic file /tmp/x.log\n");
        result.unwrap();
        let infos = hierarchy.exists("app").unwrap().appenders();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].kind, "file");
        assert_eq!(infos[0].layout, "basic");
        assert_eq!(infos[0].target, "/tmp/x.log");
    }

    #[test]
    fn test_pattern_is_rest_of_line() {
        let (hierarchy, result) =
            load("appender app pattern console    %d [%p] %m%n\ncategory other\n");
        result.unwrap();
        let infos = hierarchy.exists("app").unwrap().appenders();
        assert_eq!(infos[0].kind, "console");
        assert_eq!(infos[0].pattern.as_deref(), Some("%d [%p] %m%n"));
        assert!(hierarchy.exists("other").is_some());
    }

    #[test]
    fn test_pattern_is_truncated_to_limit() {
        let hierarchy = Hierarchy::new();
        let options = LoaderOptions {
            max_pattern_length: 4,
        };
        Configurator::with_options(&hierarchy, options)
            .configure_str("appender app pattern console %m%n and more\n")
            .unwrap();
        let infos = hierarchy.exists("app").unwrap().appenders();
        assert_eq!(infos[0].pattern.as_deref(), Some("%m%n"));
    }

    #[test]
    fn test_syslog_default_facility() {
        let spec = spec_of("myapp", "syslog").unwrap();
        assert_eq!(
            spec,
            AppenderSpec::Syslog {
                identity: "myapp".to_string(),
                facility: LOG_USER,
            }
        );
        let spec = spec_of("myapp 16", "syslog").unwrap();
        assert!(matches!(spec, AppenderSpec::Syslog { facility: 16, .. }));
    }

    #[test]
    fn test_deeply_dotted_category_loads() {
        let name = format!("a{}", ".".repeat(30_000));
        let (hierarchy, result) = load(&format!("category {name}\npriority {name} DEBUG\n"));
        result.unwrap();
        assert_eq!(hierarchy.exists(&name).unwrap().priority(), Some(Priority::DEBUG));
        assert_eq!(hierarchy.exists("a").unwrap().priority(), None);
    }

    #[test]
    fn test_out_of_range_facility_is_rejected() {
        for args in ["myapp 2147483647", "myapp -99", "myapp 185"] {
            let err = spec_of(args, "syslog").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingArgument, "{args}");
            assert!(err.reason().contains("category: app"));
        }
        let err = spec_of("myapp 127.0.0.1 2147483647 514", "remotesyslog").unwrap_err();
        assert!(err.reason().contains("Invalid syslog facility (2147483647)"));

        let spec = spec_of("myapp 184", "syslog").unwrap();
        assert!(matches!(spec, AppenderSpec::Syslog { facility: LOG_LOCAL7, .. }));
    }

    #[test]
    fn test_syslog_facility_absent_before_pattern() {
        let (hierarchy, result) = load("appender app pattern syslog myapp %p %m\n");
        result.unwrap();
        let infos = hierarchy.exists("app").unwrap().appenders();
        assert_eq!(infos[0].pattern.as_deref(), Some("%p %m"));
        assert_eq!(infos[0].target, "syslog(myapp, facility 8)");
    }

    #[test]
    fn test_remote_syslog_defaults_are_independent() {
        assert_eq!(
            spec_of("myapp loghost", "remotesyslog").unwrap(),
            AppenderSpec::RemoteSyslog {
                identity: "myapp".to_string(),
                relay_host: "loghost".to_string(),
                facility: LOG_USER,
                port: DEFAULT_SYSLOG_PORT,
            }
        );
        assert!(matches!(
            spec_of("myapp loghost 16", "remotesyslog").unwrap(),
            AppenderSpec::RemoteSyslog {
                facility: 16,
                port: 514,
                ..
            }
        ));
        assert!(matches!(
            spec_of("myapp loghost 16 1514", "remotesyslog").unwrap(),
            AppenderSpec::RemoteSyslog {
                facility: 16,
                port: 1514,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_required_arguments() {
        for (args, kind, what) in [
            ("", "file", "filename"),
            ("", "syslog", "syslog name"),
            ("", "remotesyslog", "syslog name"),
            ("myapp", "remotesyslog", "syslog host"),
        ] {
            let err = spec_of(args, kind).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingArgument, "{kind} {args:?}");
            assert!(err.reason().contains(what), "{}", err.reason());
            assert!(err.reason().ends_with("category: app"));
        }
    }

    #[test]
    fn test_invalid_appender_kind_keeps_earlier_lines() {
        let (hierarchy, result) =
            load("appender early basic console\nappender app basic bogus\ncategory later\n");
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAppenderKind);
        assert!(err.reason().contains("(bogus)"));
        assert!(err.reason().contains("category: app"));
        assert_eq!(hierarchy.exists("early").unwrap().appender_count(), 1);
        assert_eq!(hierarchy.exists("app").unwrap().appender_count(), 0);
        assert!(hierarchy.exists("later").is_none());
    }

    #[test]
    fn test_invalid_layout_attaches_nothing() {
        let (hierarchy, result) = load("appender app fancy console\n");
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLayoutKind);
        assert!(err.reason().contains("(fancy)"));
        assert_eq!(hierarchy.exists("app").unwrap().appender_count(), 0);
    }

    #[test]
    fn test_invalid_pattern() {
        let (_, result) = load("appender app pattern console %q\n");
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidPattern);
    }

    #[test]
    fn test_invalid_priority_names_value_and_category() {
        let (_, result) = load("priority foo BOGUS\n");
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPriority);
        assert!(err.reason().contains("BOGUS"));
        assert!(err.reason().contains("foo"));
    }

    #[test]
    fn test_missing_priority() {
        let (_, result) = load("priority foo");
        assert_eq!(result.unwrap_err().kind(), ErrorKind::MissingArgument);
    }

    #[test]
    fn test_invalid_command_stops_load() {
        let (hierarchy, result) = load("frobnicate app\ncategory later\n");
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCommand);
        assert!(err.reason().contains("frobnicate"));
        // the category is resolved before the command is dispatched
        assert!(hierarchy.exists("app").is_some());
        assert!(hierarchy.exists("later").is_none());
    }

    #[test]
    fn test_comments_are_line_scoped() {
        let (hierarchy, result) =
            load("# appender app basic bogus\ncategory app # trailing note bogus\ncategory b\n");
        result.unwrap();
        assert!(hierarchy.exists("app").is_some());
        assert!(hierarchy.exists("b").is_some());
        assert!(hierarchy.exists("bogus").is_none());
    }

    #[test]
    fn test_dangling_command_is_benign_eof() {
        let (hierarchy, result) = load("category app\npriority");
        result.unwrap();
        assert!(hierarchy.exists("app").is_some());
    }

    #[test]
    fn test_under_specified_appender_is_dropped() {
        let (hierarchy, result) = load("appender app basic");
        result.unwrap();
        assert_eq!(hierarchy.exists("app").unwrap().appender_count(), 0);
    }

    #[test]
    fn test_reload_keeps_identity_and_duplicates_appenders() {
        let source = "appender app simple console\n";
        let hierarchy = Hierarchy::new();
        let configurator = Configurator::new(&hierarchy);
        configurator.configure_str(source).unwrap();
        let first = hierarchy.get_instance("app");
        configurator.configure_str(source).unwrap();
        let second = hierarchy.get_instance("app");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.appender_count(), 2);
    }

    #[test]
    fn test_unreadable_source() {
        let hierarchy = Hierarchy::new();
        let path = env::temp_dir().join("catconf-definitely-missing").join("log.init");
        let err = Configurator::new(&hierarchy)
            .configure(&path)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceUnreadable);
        assert_eq!(hierarchy.current_categories().len(), 1);
    }

    #[test]
    fn test_configure_from_file() {
        let dir = env::temp_dir().join(format!("catconf-loader-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("log.init");
        fs::write(&path, "category app.db\npriority app WARN\n").unwrap();

        let hierarchy = Hierarchy::new();
        Configurator::new(&hierarchy).configure(&path).unwrap();
        assert_eq!(
            hierarchy.get_instance("app.db").chained_priority(),
            Priority::WARN
        );

        fs::remove_dir_all(&dir).ok();
    }
}
