//! Industry production queue
//!
//! Items are built one at a time in FIFO order. The current item absorbs
//! the planet's whole industry stockpile each turn; excess progress from a
//! finished item carries into the next one.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

use crate::core::error::Result;

/// Something a planet can build with industry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Industry points required
    pub cost: f32,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, cost: f32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            cost,
        }
    }
}

/// Buildable items available to planets
#[derive(Debug, Clone, Default)]
pub struct ProductionCatalog {
    items: Vec<CatalogItem>,
}

#[derive(Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    item: Vec<CatalogItem>,
}

impl ProductionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.add(CatalogItem {
            name: "Orbital Farm".into(),
            description: "Hydroponic ring for surplus food".into(),
            cost: 40.0,
        });
        catalog.add(CatalogItem {
            name: "Research Station".into(),
            description: "Deep space observatory".into(),
            cost: 60.0,
        });
        catalog.add(CatalogItem {
            name: "Defense Platform".into(),
            description: "Orbital battery".into(),
            cost: 80.0,
        });
        catalog
    }

    pub fn add(&mut self, item: CatalogItem) {
        self.items.push(item);
    }

    pub fn get(&self, name: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|i| i.name == name)
    }

    pub fn all(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Parse `[[item]]` tables from TOML
    pub fn parse_toml(content: &str) -> Result<Self> {
        let parsed: TomlCatalog = toml::from_str(content)?;
        Ok(Self {
            items: parsed.item,
        })
    }

    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }
}

/// Item under construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionItem {
    pub item: CatalogItem,
    pub progress: f32,
}

impl ProductionItem {
    pub fn fraction_complete(&self) -> f32 {
        if self.item.cost <= 0.0 {
            return 1.0;
        }
        (self.progress / self.item.cost).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionQueue {
    current: Option<ProductionItem>,
    queued: VecDeque<CatalogItem>,
}

impl ProductionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, item: CatalogItem) {
        self.queued.push_back(item);
    }

    pub fn current(&self) -> Option<&ProductionItem> {
        self.current.as_ref()
    }

    pub fn queued(&self) -> impl Iterator<Item = &CatalogItem> + '_ {
        self.queued.iter()
    }

    /// Something is being built or waiting to be
    pub fn is_active(&self) -> bool {
        self.current.is_some() || !self.queued.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queued.len() + usize::from(self.current.is_some())
    }

    pub fn is_empty(&self) -> bool {
        !self.is_active()
    }

    fn start_next(&mut self) -> bool {
        if self.current.is_none() {
            self.current = self.queued.pop_front().map(|item| ProductionItem {
                item,
                progress: 0.0,
            });
        }
        self.current.is_some()
    }

    /// Spend `industry` on the queue and return the items finished
    ///
    /// Leftover progress after the last item stays in `industry`.
    pub fn advance(&mut self, industry: &mut f32) -> Vec<CatalogItem> {
        let mut completed = Vec::new();
        while self.start_next() {
            let Some(current) = self.current.as_mut() else {
                break;
            };
            current.progress += *industry;
            *industry = 0.0;
            if current.progress < current.item.cost {
                break;
            }
            *industry = current.progress - current.item.cost;
            if let Some(done) = self.current.take() {
                completed.push(done.item);
            }
        }
        completed
    }
}
