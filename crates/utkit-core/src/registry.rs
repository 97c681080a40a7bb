//! Module registry.
//!
//! A [`Namespace`] records which helper groups are enabled together with
//! the library version. It is built once at startup and handed to
//! whatever needs it; nothing here is global.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{VERSION, VERSION_DATE};
use crate::error::RegistryError;

/// A helper group that can be loaded onto a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Data,
    Fetch,
    File,
    Format,
    Dom,
    Filter,
    Cookie,
    Css,
    Async,
    Env,
    Helpers,
}

impl Module {
    /// Every group, in load order.
    pub const ALL: [Module; 11] = [
        Module::Data,
        Module::Fetch,
        Module::File,
        Module::Format,
        Module::Dom,
        Module::Filter,
        Module::Cookie,
        Module::Css,
        Module::Async,
        Module::Env,
        Module::Helpers,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Module::Data => "data",
            Module::Fetch => "fetch",
            Module::File => "file",
            Module::Format => "format",
            Module::Dom => "dom",
            Module::Filter => "filter",
            Module::Cookie => "cookie",
            Module::Css => "css",
            Module::Async => "async",
            Module::Env => "env",
            Module::Helpers => "helpers",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Module {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Module::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| RegistryError::UnknownModule(s.to_string()))
    }
}

/// Which groups to load: everything, one name, or a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ModuleSelection {
    #[serde(skip)]
    All,
    One(String),
    Many(Vec<String>),
}

impl ModuleSelection {
    /// Parsed groups. Unknown names are reported and skipped.
    pub fn resolve(&self) -> Vec<Module> {
        let names: Vec<&str> = match self {
            ModuleSelection::All => return Module::ALL.to_vec(),
            ModuleSelection::One(name) if name == "all" => return Module::ALL.to_vec(),
            ModuleSelection::One(name) => vec![name.as_str()],
            ModuleSelection::Many(names) => names.iter().map(String::as_str).collect(),
        };

        names
            .into_iter()
            .filter_map(|name| match name.parse::<Module>() {
                Ok(module) => Some(module),
                Err(e) => {
                    tracing::warn!("{e}");
                    None
                }
            })
            .collect()
    }
}

impl From<&str> for ModuleSelection {
    fn from(name: &str) -> Self {
        if name == "all" {
            ModuleSelection::All
        } else {
            ModuleSelection::One(name.to_string())
        }
    }
}

impl From<Vec<String>> for ModuleSelection {
    fn from(names: Vec<String>) -> Self {
        ModuleSelection::Many(names)
    }
}

/// The set of enabled helper groups plus version metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Namespace {
    pub version: [u32; 3],
    pub version_date: [u32; 3],
    modules: BTreeSet<Module>,
}

impl Namespace {
    /// A namespace with no groups loaded.
    pub fn empty() -> Self {
        Self {
            version: VERSION,
            version_date: VERSION_DATE,
            modules: BTreeSet::new(),
        }
    }

    /// Build a namespace with `selection` loaded.
    pub fn init(selection: impl Into<ModuleSelection>) -> Self {
        let mut ns = Self::empty();
        ns.load(selection);
        ns
    }

    /// Merge more groups in. Already-loaded groups are left as they are.
    pub fn load(&mut self, selection: impl Into<ModuleSelection>) {
        for module in selection.into().resolve() {
            if self.modules.insert(module) {
                tracing::debug!(module = module.name(), "module loaded");
            }
        }
    }

    pub fn is_loaded(&self, module: Module) -> bool {
        self.modules.contains(&module)
    }

    pub fn modules(&self) -> impl Iterator<Item = Module> + '_ {
        self.modules.iter().copied()
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::init(ModuleSelection::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_parse() {
        assert_eq!("css".parse::<Module>(), Ok(Module::Css));
        assert_eq!(
            "nope".parse::<Module>(),
            Err(RegistryError::UnknownModule("nope".to_string()))
        );
        assert_eq!(Module::Async.to_string(), "async");
    }

    #[test]
    fn test_init_all() {
        let ns = Namespace::default();
        assert_eq!(ns.version, [3, 0, 0]);
        assert_eq!(ns.version_date, [2023, 3, 23]);
        assert_eq!(ns.modules().count(), Module::ALL.len());
        assert_eq!(Namespace::init("all"), ns);
    }

    #[test]
    fn test_init_one_and_many() {
        let ns = Namespace::init("cookie");
        assert!(ns.is_loaded(Module::Cookie));
        assert!(!ns.is_loaded(Module::Dom));

        let ns = Namespace::init(vec!["dom".to_string(), "bogus".to_string(), "env".to_string()]);
        assert_eq!(ns.modules().collect::<Vec<_>>(), vec![Module::Dom, Module::Env]);
    }

    #[test]
    fn test_load_merges() {
        let mut ns = Namespace::init("data");
        ns.load("filter");
        ns.load("data");
        assert_eq!(ns.modules().count(), 2);
    }

    #[test]
    fn test_selection_deserialize() {
        let one: ModuleSelection = serde_json::from_str(r#""css""#).unwrap();
        assert_eq!(one, ModuleSelection::One("css".to_string()));
        let many: ModuleSelection = serde_json::from_str(r#"["css","env"]"#).unwrap();
        assert_eq!(many.resolve(), vec![Module::Css, Module::Env]);
    }
}
