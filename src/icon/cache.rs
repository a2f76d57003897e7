//! Memoized icon resolution.

use super::{resolve, IconLookup, IconSurface};
use log::debug;
use std::collections::HashMap;

/// Per-dock cache of resolved icons, keyed by icon name.
///
/// Size, theme and foreground are fixed for the lifetime of the cache, so
/// the name alone identifies a record.  Misses are cached too: a name that
/// did not resolve is not searched for again.
#[derive(Debug)]
pub struct IconCache {
    theme: IconLookup,
    size: u32,
    foreground: String,
    records: HashMap<String, Option<IconSurface>>,
}

impl IconCache {
    pub fn new(theme: IconLookup, size: u32, foreground: impl Into<String>) -> Self {
        Self {
            theme,
            size,
            foreground: foreground.into(),
            records: HashMap::new(),
        }
    }

    /// The icon for `name`, resolving it on first use.
    pub fn get(&mut self, name: &str) -> Option<&IconSurface> {
        let (theme, size, foreground) = (&self.theme, self.size, self.foreground.as_str());
        self.records
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!("resolving icon {} at {}px", name, size);
                resolve(name, size, theme, foreground)
            })
            .as_ref()
    }

    /// Whether `name` has been looked up before, hit or miss.
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Number of cached records, including misses.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn foreground(&self) -> &str {
        &self.foreground
    }

    pub fn lookup(&self) -> &IconLookup {
        &self.theme
    }
}
