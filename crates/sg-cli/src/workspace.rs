//! Everything a command needs, built once from the configuration.

use anyhow::{Context, Result};
use sg_locale::Catalog;
use sg_rules::RuleRegistry;
use sg_service::RulesService;
use sg_store::{DataStore, load_dataset};
use tracing::info;

use crate::config::Config;

pub struct Workspace {
    pub config: Config,
    pub registry: RuleRegistry,
    pub store: DataStore,
    pub catalog: Catalog,
}

impl Workspace {
    /// Build the registry from the enabled modules, load the dataset and
    /// assemble the translation catalog.
    pub fn open(config: Config) -> Result<Self> {
        let registry = Self::registry(&config);
        let snapshot = load_dataset(&config.data_dir)
            .with_context(|| format!("load dataset {}", config.data_dir.display()))?;
        let store = DataStore::new(snapshot);
        let catalog = Self::catalog(&config)?;
        info!(
            rule_types = registry.len(),
            modules = ?registry.modules(),
            locales = ?sg_rules::Translator::locales(&catalog),
            "workspace ready"
        );
        Ok(Self {
            config,
            registry,
            store,
            catalog,
        })
    }

    pub fn registry(config: &Config) -> RuleRegistry {
        RuleRegistry::with_enabled_modules(&config.modules)
    }

    pub fn catalog(config: &Config) -> Result<Catalog> {
        let mut catalog = Catalog::bundled()
            .context("load bundled locales")?
            .with_default_locale(config.default_locale.clone());
        if let Some(dir) = &config.locales_dir {
            catalog
                .load_dir(dir)
                .with_context(|| format!("load locales from {}", dir.display()))?;
        }
        Ok(catalog)
    }

    pub fn service(&self) -> Result<RulesService<'_>> {
        RulesService::new(&self.registry, &self.store).context("compile rule schema")
    }
}
