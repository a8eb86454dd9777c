//! Init-file service backing the CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info, warn};

use crate::domain::{Configurator, Hierarchy, Priority};
use crate::service::report::CategoryReport;
use crate::settings::Settings;

/// Service running the loader on behalf of CLI commands.
pub struct ConfigureService {
    settings: Settings,
}

impl ConfigureService {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Pick the init file: explicit argument first, then settings.
    pub fn resolve_init_file(&self, file: Option<&Path>) -> Result<PathBuf> {
        file.map(PathBuf::from)
            .or_else(|| self.settings.init_file.clone())
            .ok_or_else(|| anyhow!("No init file given: pass --file or set init_file in settings"))
    }

    /// Load `file` into `hierarchy`.
    pub fn load_into(&self, file: &Path, hierarchy: &Hierarchy) -> Result<()> {
        debug!(
            "Loading {} (max pattern length {})",
            file.display(),
            self.settings.max_pattern_length
        );
        Configurator::with_options(hierarchy, self.settings.loader_options())
            .configure(file)
            .map_err(|e| {
                warn!(kind = %e.kind(), "Load of {} aborted: {}", file.display(), e.reason());
                e
            })?;
        Ok(())
    }

    /// Load into a fresh hierarchy and discard it.
    pub fn check(&self, file: Option<&Path>) -> Result<()> {
        let file = self.resolve_init_file(file)?;
        self.load_into(&file, &Hierarchy::new())?;
        info!("{} is valid", file.display());
        Ok(())
    }

    /// Load into a fresh hierarchy and snapshot it.
    pub fn show(&self, file: Option<&Path>) -> Result<Vec<CategoryReport>> {
        let file = self.resolve_init_file(file)?;
        let hierarchy = Hierarchy::new();
        self.load_into(&file, &hierarchy)?;
        Ok(CategoryReport::collect(&hierarchy))
    }

    /// Configure the process-wide hierarchy and log one message.
    pub fn emit(
        &self,
        file: Option<&Path>,
        category_name: &str,
        priority_name: &str,
        message: &str,
    ) -> Result<()> {
        let priority = Priority::from_name(priority_name)
            .ok_or_else(|| anyhow!("Invalid priority: {}", priority_name))?;
        let file = self.resolve_init_file(file)?;

        let hierarchy = Hierarchy::global();
        self.load_into(&file, hierarchy)?;

        if hierarchy.exists(category_name).is_none() {
            warn!(
                "Category {} is not declared in {}, using inherited settings",
                category_name,
                file.display()
            );
        }
        let category = hierarchy.get_instance(category_name);
        debug!(
            "Emitting {} message via {} (threshold {})",
            priority,
            category.name(),
            category.chained_priority()
        );
        category
            .log(priority, message)
            .with_context(|| format!("Failed to write log event for {}", category.name()))
    }

    /// Write a commented sample init file.
    pub fn generate_sample(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!(
                "{} already exists (use --force to overwrite)",
                path.display()
            );
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, Self::sample_init_content())
            .with_context(|| format!("Failed to write init file: {}", path.display()))?;
        Ok(())
    }

    fn sample_init_content() -> &'static str {
        r#"# catconf init file
#
# category <name>
# appender <name> <layout> <kind> [args...]
# priority <name> <PRIORITY>
#
# layouts: basic | simple | pattern <rest of line>
# kinds:   console | stdout | stderr | file <path>
#          syslog <identity> [facility]
#          remotesyslog <identity> <host> [facility] [port]

priority root WARN
appender root simple stderr

category app
priority app INFO
appender app pattern console %d [%p] %c: %m%n

# appender app.db basic file /var/log/app-db.log
# appender app basic remotesyslog app loghost.example.net 8 514
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("catconf-service-{}-{}", tag, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_resolve_prefers_argument() {
        let settings = Settings {
            init_file: Some(PathBuf::from("/etc/from-settings.init")),
            ..Settings::default()
        };
        let service = ConfigureService::new(settings);
        assert_eq!(
            service
                .resolve_init_file(Some(Path::new("cli.init")))
                .unwrap(),
            PathBuf::from("cli.init")
        );
        assert_eq!(
            service.resolve_init_file(None).unwrap(),
            PathBuf::from("/etc/from-settings.init")
        );
    }

    #[test]
    fn test_resolve_without_any_file() {
        let service = ConfigureService::new(Settings::default());
        assert!(service.resolve_init_file(None).is_err());
    }

    #[test]
    fn test_sample_is_loadable() {
        let dir = temp_dir("sample");
        let path = dir.join("log.init");
        ConfigureService::generate_sample(&path, false).unwrap();
        assert!(ConfigureService::generate_sample(&path, false).is_err());
        ConfigureService::generate_sample(&path, true).unwrap();

        let service = ConfigureService::new(Settings::default());
        let reports = service.show(Some(&path)).unwrap();
        let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["root", "app"]);
        assert_eq!(reports[0].priority, Some(Priority::WARN));
        assert_eq!(
            reports[1].appenders[0].pattern.as_deref(),
            Some("%d [%p] %c: %m%n")
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_emit_writes_through_file_appender() {
        let dir = temp_dir("emit");
        let log = dir.join("out.log");
        let init = dir.join("log.init");
        fs::write(
            &init,
            format!(
                "appender emit.test pattern file {} %p %c %m%n\n",
                log.display()
            ),
        )
        .unwrap();

        let service = ConfigureService::new(Settings::default());
        service
            .emit(Some(&init), "emit.test", "WARN", "hello")
            .unwrap();
        assert_eq!(fs::read_to_string(&log).unwrap(), "WARN emit.test hello\n");

        assert!(service
            .emit(Some(&init), "emit.test", "LOUD", "hello")
            .is_err());

        fs::remove_dir_all(&dir).ok();
    }
}
