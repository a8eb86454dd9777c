//! Categories and the hierarchy that owns them.
//!
//! Names are hierarchical on `.`: `app.db.pool` has parent `app.db`, whose
//! parent is `app`, whose parent is the root category. Requesting the same
//! name twice returns the same `Arc`.

use std::borrow::Borrow;
use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, RwLock};

use tracing::warn;

use super::appenders::{Appender, AppenderInfo};
use super::{LoggingEvent, Priority};

/// Category name held as a prefix of a shared string, so the ancestors
/// created for one dotted name share its allocation.
#[derive(Debug, Clone)]
struct CategoryName {
    full: Arc<str>,
    len: usize,
}

impl CategoryName {
    fn new(name: &str) -> Self {
        Self {
            full: Arc::from(name),
            len: name.len(),
        }
    }

    fn as_str(&self) -> &str {
        &self.full[..self.len]
    }
}

impl PartialEq for CategoryName {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for CategoryName {}

impl PartialOrd for CategoryName {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for CategoryName {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.as_str().cmp(other.as_str())
    }
}

impl Borrow<str> for CategoryName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// A named node in the logging namespace.
#[derive(Debug)]
pub struct Category {
    name: CategoryName,
    parent: Option<Arc<Category>>,
    priority: RwLock<Option<Priority>>,
    appenders: RwLock<Vec<Box<dyn Appender>>>,
    additive: AtomicBool,
}

impl Category {
    fn new(name: CategoryName, parent: Option<Arc<Category>>, priority: Option<Priority>) -> Self {
        Self {
            name,
            parent,
            priority: RwLock::new(priority),
            appenders: RwLock::new(Vec::new()),
            additive: AtomicBool::new(true),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn parent(&self) -> Option<&Arc<Category>> {
        self.parent.as_ref()
    }

    /// Explicitly set threshold, if any.
    pub fn priority(&self) -> Option<Priority> {
        *self.priority.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_priority(&self, priority: Priority) {
        *self.priority.write().unwrap_or_else(|e| e.into_inner()) = Some(priority);
    }

    /// Threshold in effect: own priority or the nearest ancestor's.
    pub fn chained_priority(&self) -> Priority {
        let mut current = Some(self);
        while let Some(category) = current {
            if let Some(priority) = category.priority() {
                return priority;
            }
            current = category.parent.as_deref();
        }
        Priority::NOTSET
    }

    pub fn is_priority_enabled(&self, priority: Priority) -> bool {
        priority <= self.chained_priority()
    }

    pub fn additivity(&self) -> bool {
        self.additive.load(Ordering::Relaxed)
    }

    /// Whether events also go to the ancestors' appenders.
    #[cfg(test)]
    pub fn set_additivity(&self, additive: bool) {
        self.additive.store(additive, Ordering::Relaxed);
    }

    /// Attach an appender. Appenders accumulate; nothing is replaced.
    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.appenders
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(appender);
    }

    #[cfg(test)]
    pub fn appender_count(&self) -> usize {
        self.appenders.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn appenders(&self) -> Vec<AppenderInfo> {
        self.appenders
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|a| a.describe())
            .collect()
    }

    /// Log `message` if `priority` passes the chained threshold.
    ///
    /// Every appender on this category and on its ancestors (while
    /// additivity holds) is called; the first write error is returned after
    /// all appenders have been tried.
    pub fn log(&self, priority: Priority, message: &str) -> io::Result<()> {
        if !self.is_priority_enabled(priority) {
            return Ok(());
        }

        let event = LoggingEvent::new(self.name(), message, priority);
        let mut first_error = None;
        let mut current = Some(self);
        while let Some(category) = current {
            for appender in category
                .appenders
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .iter()
            {
                if let Err(e) = appender.append(&event) {
                    warn!(
                        "{} appender of {} failed for event from {}: {}",
                        appender.kind(),
                        appender.name(),
                        self.name(),
                        e
                    );
                    first_error.get_or_insert(e);
                }
            }
            if !category.additivity() {
                break;
            }
            current = category.parent.as_deref();
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for Category {
    // Unlink the ancestor chain one level at a time
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(category) = parent {
            parent = Arc::into_inner(category).and_then(|mut c| c.parent.take());
        }
    }
}

/// Registry of categories by name.
#[derive(Debug)]
pub struct Hierarchy {
    root: Arc<Category>,
    categories: Mutex<BTreeMap<CategoryName, Arc<Category>>>,
}

impl Hierarchy {
    /// Reserved name of the root category.
    pub const ROOT_NAME: &'static str = "root";

    /// Create an empty hierarchy whose root has priority `INFO`.
    pub fn new() -> Self {
        Self {
            root: Arc::new(Category::new(
                CategoryName::new(Self::ROOT_NAME),
                None,
                Some(Priority::INFO),
            )),
            categories: Mutex::new(BTreeMap::new()),
        }
    }

    /// Process-wide default hierarchy.
    pub fn global() -> &'static Hierarchy {
        static GLOBAL: OnceLock<Hierarchy> = OnceLock::new();
        GLOBAL.get_or_init(Hierarchy::new)
    }

    pub fn root(&self) -> Arc<Category> {
        Arc::clone(&self.root)
    }

    /// Get or create the category called `name`, creating missing
    /// ancestors on the way. `""` and `"root"` both return the root.
    pub fn get_instance(&self, name: &str) -> Arc<Category> {
        let mut categories = self.categories.lock().unwrap_or_else(|e| e.into_inner());
        self.get_or_create(&mut categories, name)
    }

    /// Walk the dotted prefixes of `name` from the shortest, creating each
    /// missing one under the previous.
    fn get_or_create(
        &self,
        categories: &mut BTreeMap<CategoryName, Arc<Category>>,
        name: &str,
    ) -> Arc<Category> {
        if let Some(existing) = categories.get(name) {
            return Arc::clone(existing);
        }

        let full: Arc<str> = Arc::from(name);
        let ends = name
            .match_indices('.')
            .map(|(idx, _)| idx)
            .chain(std::iter::once(name.len()));
        let mut current = self.root();
        for end in ends {
            let prefix = &name[..end];
            current = if prefix.is_empty() || prefix == Self::ROOT_NAME {
                self.root()
            } else if let Some(existing) = categories.get(prefix) {
                Arc::clone(existing)
            } else {
                let key = CategoryName {
                    full: Arc::clone(&full),
                    len: end,
                };
                let category = Arc::new(Category::new(key.clone(), Some(current), None));
                categories.insert(key, Arc::clone(&category));
                category
            };
        }
        current
    }

    /// Look up an existing category without creating it.
    pub fn exists(&self, name: &str) -> Option<Arc<Category>> {
        if name == Self::ROOT_NAME {
            return Some(self.root());
        }
        self.categories
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    /// Root first, then every named category in name order.
    pub fn current_categories(&self) -> Vec<Arc<Category>> {
        let categories = self.categories.lock().unwrap_or_else(|e| e.into_inner());
        std::iter::once(self.root())
            .chain(categories.values().cloned())
            .collect()
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::appenders::FileAppender;
    use crate::domain::layouts::SimpleLayout;
    use std::env;
    use std::fs;

    #[test]
    fn test_same_name_same_instance() {
        let hierarchy = Hierarchy::new();
        let a = hierarchy.get_instance("app.db");
        let b = hierarchy.get_instance("app.db");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_root_name_maps_to_root() {
        let hierarchy = Hierarchy::new();
        assert!(Arc::ptr_eq(&hierarchy.get_instance("root"), &hierarchy.root()));
        assert!(Arc::ptr_eq(&hierarchy.get_instance(""), &hierarchy.root()));
        // names are case-sensitive
        assert!(!Arc::ptr_eq(&hierarchy.get_instance("Root"), &hierarchy.root()));
    }

    #[test]
    fn test_parents_created_on_demand() {
        let hierarchy = Hierarchy::new();
        let leaf = hierarchy.get_instance("app.db.pool");
        let parent = leaf.parent().unwrap();
        assert_eq!(parent.name(), "app.db");
        assert_eq!(parent.parent().unwrap().name(), "app");
        assert!(Arc::ptr_eq(
            parent.parent().unwrap().parent().unwrap(),
            &hierarchy.root()
        ));
        assert!(hierarchy.exists("app").is_some());
        assert!(hierarchy.exists("other").is_none());
    }

    #[test]
    fn test_deeply_dotted_name() {
        let hierarchy = Hierarchy::new();
        let name = format!("a{}", ".".repeat(30_000));
        let leaf = hierarchy.get_instance(&name);
        assert_eq!(leaf.name(), name);
        assert_eq!(leaf.parent().unwrap().name(), &name[..name.len() - 1]);
        assert!(hierarchy.exists("a.").is_some());
        assert_eq!(hierarchy.current_categories().len(), 30_002);
        assert!(Arc::ptr_eq(&hierarchy.get_instance(&name), &leaf));

        let mut depth = 0;
        let mut current = leaf.parent();
        while let Some(category) = current {
            depth += 1;
            current = category.parent();
        }
        assert_eq!(depth, 30_001);

        drop(leaf);
        drop(hierarchy);
    }

    #[test]
    fn test_odd_dotted_names() {
        let hierarchy = Hierarchy::new();
        let leaf = hierarchy.get_instance(".x");
        assert!(Arc::ptr_eq(leaf.parent().unwrap(), &hierarchy.root()));
        let leaf = hierarchy.get_instance("root.x");
        assert!(Arc::ptr_eq(leaf.parent().unwrap(), &hierarchy.root()));
        let leaf = hierarchy.get_instance("a..b");
        assert_eq!(leaf.parent().unwrap().name(), "a.");
        assert_eq!(leaf.parent().unwrap().parent().unwrap().name(), "a");
    }

    #[test]
    fn test_chained_priority() {
        let hierarchy = Hierarchy::new();
        let leaf = hierarchy.get_instance("app.db");
        assert_eq!(leaf.chained_priority(), Priority::INFO);
        hierarchy.get_instance("app").set_priority(Priority::DEBUG);
        assert_eq!(leaf.chained_priority(), Priority::DEBUG);
        leaf.set_priority(Priority::ERROR);
        assert_eq!(leaf.chained_priority(), Priority::ERROR);
        assert!(leaf.is_priority_enabled(Priority::FATAL));
        assert!(!leaf.is_priority_enabled(Priority::WARN));
    }

    #[test]
    fn test_current_categories_root_first() {
        let hierarchy = Hierarchy::new();
        hierarchy.get_instance("zeta");
        hierarchy.get_instance("alpha");
        let names: Vec<String> = hierarchy
            .current_categories()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["root", "alpha", "zeta"]);
    }

    #[test]
    fn test_log_reaches_ancestors_unless_not_additive() {
        let dir = env::temp_dir().join(format!("catconf-category-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let root_log = dir.join("root.log");
        let leaf_log = dir.join("leaf.log");

        let hierarchy = Hierarchy::new();
        let mut root_appender = FileAppender::new("root", &root_log);
        root_appender.set_layout(Box::new(SimpleLayout::new()));
        hierarchy.root().add_appender(Box::new(root_appender));

        let leaf = hierarchy.get_instance("app.db");
        let mut leaf_appender = FileAppender::new("app.db", &leaf_log);
        leaf_appender.set_layout(Box::new(SimpleLayout::new()));
        leaf.add_appender(Box::new(leaf_appender));

        leaf.log(Priority::WARN, "shared").unwrap();
        leaf.log(Priority::DEBUG, "filtered").unwrap();
        leaf.set_additivity(false);
        leaf.log(Priority::ERROR, "leaf only").unwrap();

        assert_eq!(
            fs::read_to_string(&leaf_log).unwrap(),
            "WARN    : shared\nERROR   : leaf only\n"
        );
        assert_eq!(fs::read_to_string(&root_log).unwrap(), "WARN    : shared\n");

        fs::remove_dir_all(&dir).ok();
    }
}
