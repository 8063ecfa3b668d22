//! Domain models for the machconf pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`Language`] - output language with its two numeric offset schemes
//! - [`ModuleConfig`] / [`ModuleRegistry`] - per-module machine/unit numbers
//! - [`Machine`] / [`ModuleEntry`] - supervision JSON machine hierarchy
//! - [`Recipe`] - recipe entity folded from the external store

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::PromptResult;
use crate::prompt::Operator;

// =============================================================================
// Languages
// =============================================================================

/// Output language for client-facing texts.
///
/// The fault/text export and the recipe store assign *different* numeric
/// codes to the same human languages, so a language resolves to two
/// independent offsets. The two tables are a domain fact and must never be
/// unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Arp,
    Fr,
    En,
    Es,
    De,
    Gr,
}

impl Language {
    /// Languages offered by the interactive menu, in menu order.
    pub const MENU: [Language; 5] = [
        Language::Arp,
        Language::Fr,
        Language::En,
        Language::Es,
        Language::De,
    ];

    /// Resolve a menu index (0-based) to a language.
    pub fn from_menu_index(index: usize) -> Option<Self> {
        Self::MENU.get(index).copied()
    }

    /// Short name used in the menu.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Arp => "arp",
            Language::Fr => "fr",
            Language::En => "en",
            Language::Es => "es",
            Language::De => "de",
            Language::Gr => "gr",
        }
    }

    /// Locale offset in the text-ID export (fault resolutions, designations).
    pub fn fault_offset(&self) -> i64 {
        match self {
            Language::Arp | Language::Fr => 0,
            Language::En => 1,
            Language::Es => 2,
            Language::De => 3,
            Language::Gr => 4,
        }
    }

    /// Language code used by the recipe store.
    pub fn store_offset(&self) -> i64 {
        match self {
            Language::Arp => 0,
            Language::Fr => 1,
            Language::En => 2,
            Language::Es => 3,
            Language::De => 4,
            Language::Gr => 5,
        }
    }
}

// =============================================================================
// Module Configuration
// =============================================================================

/// Configuration of a single module: its owning machine number, its unit
/// number within that machine, and two locale display names.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleConfig {
    pub num_machine: i64,
    pub num_module: i64,
    pub name_lang_1: String,
    pub name_lang_2: String,
}

/// Insertion-ordered registry of module configurations.
///
/// A module is configured at most once per run: the summary table seeds the
/// registry (first value wins), and [`ModuleRegistry::resolve`] prompts the
/// operator on first miss and caches the answer forever. Entries are never
/// mutated after creation.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    entries: Vec<(String, ModuleConfig)>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a configuration unless the module is already known.
    /// Returns `false` when an existing entry was kept.
    pub fn insert_if_absent(&mut self, module: &str, config: ModuleConfig) -> bool {
        if self.get(module).is_some() {
            return false;
        }
        self.entries.push((module.to_string(), config));
        true
    }

    pub fn get(&self, module: &str) -> Option<&ModuleConfig> {
        self.entries
            .iter()
            .find(|(name, _)| name == module)
            .map(|(_, cfg)| cfg)
    }

    /// Cache-or-prompt resolution: returns the stored configuration, asking
    /// the operator for the machine/module numbers the first time an
    /// unconfigured module is encountered.
    pub fn resolve(&mut self, module: &str, op: &mut dyn Operator) -> PromptResult<ModuleConfig> {
        if let Some(cfg) = self.get(module) {
            return Ok(cfg.clone());
        }

        let num_machine = op.ask_int(&format!("Machine number for module {}: ", module))?;
        let num_module = op.ask_int(&format!("Module number for module {}: ", module))?;
        let cfg = ModuleConfig {
            num_machine,
            num_module,
            name_lang_1: String::new(),
            name_lang_2: String::new(),
        };
        self.entries.push((module.to_string(), cfg.clone()));
        Ok(cfg)
    }

    /// Iterate modules in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleConfig)> {
        self.entries.iter().map(|(name, cfg)| (name.as_str(), cfg))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Machines
// =============================================================================

/// A physical machine in the supervision hierarchy: display names in up to
/// three locales, its modules in first-seen order, and optional recipes.
#[derive(Debug, Clone, Serialize)]
pub struct Machine {
    pub num: i64,
    pub name_1: String,
    pub name_2: String,
    pub name_3: String,
    pub ems: Vec<ModuleEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipes: Option<Vec<Recipe>>,
}

/// A module entry under a machine. `axs` is a placeholder empty mapping
/// consumed by the downstream supervision system.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleEntry {
    pub num: i64,
    pub name_1: String,
    pub name_2: String,
    pub name_3: String,
    pub nb_in_machine: i64,
    pub utility: i64,
    pub checked: bool,
    pub axs: Map<String, Value>,
}

// =============================================================================
// Recipes
// =============================================================================

/// A recipe folded from the external store rows sharing one code.
///
/// `used` is fixed when the entity is created from the first row for its
/// code and never updated by later rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub num: i64,
    pub name_1: String,
    pub name_2: String,
    pub name_3: String,
    pub used: bool,
    pub checked: bool,
}

impl Recipe {
    /// Placeholder entity for a code, before any localized name is seen.
    pub fn placeholder(num: i64, used: bool) -> Self {
        let name = format!("Recipe {}", num);
        Self {
            num,
            name_1: name.clone(),
            name_2: name.clone(),
            name_3: name,
            used,
            checked: true,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Uppercase the first character, leave the rest unchanged.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
