use std::collections::BTreeMap;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::Config;
use crate::data::category::Category;
use crate::data::loader::load_tables;
use crate::data::lookup::{build_keys, detail_view, distinct_values, first_match, normalize_name};
use crate::data::model::Table;
use crate::error::QueryError;

// ---------------------------------------------------------------------------
// CategoryTable – one loaded table plus its lookup keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct CategoryTable {
    table: Table,
    /// Normalized identifying value per row; empty when the identifying
    /// column is absent.
    keys: Vec<Option<String>>,
}

impl CategoryTable {
    fn new(category: Category, table: Table) -> Self {
        let keys = build_keys(&table, category.identifying_column());
        Self { table, keys }
    }
}

// ---------------------------------------------------------------------------
// Catalog – the query service
// ---------------------------------------------------------------------------

/// All category tables, built once and read-only afterwards. Share it
/// behind an `Arc`; every query is a pure function of the loaded data.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: BTreeMap<Category, CategoryTable>,
}

impl Catalog {
    /// Categories absent from `tables` get an empty table.
    pub fn from_tables(tables: impl IntoIterator<Item = (Category, Table)>) -> Self {
        let mut given: BTreeMap<Category, Table> = tables.into_iter().collect();
        let tables = Category::ALL
            .into_iter()
            .map(|c| {
                let table = given.remove(&c).unwrap_or_default();
                (c, CategoryTable::new(c, table))
            })
            .collect();
        Self { tables }
    }

    /// Read every configured source. Fails if any existing file cannot be
    /// parsed; an empty category only produces a warning.
    pub fn load(config: &Config) -> Result<Self> {
        let mut tables = Vec::with_capacity(Category::ALL.len());

        for category in Category::ALL {
            let paths = config.source_paths(category);
            let table = load_tables(&paths)
                .with_context(|| format!("loading {category} dataset"))?;

            if table.is_empty() {
                warn!("{category} dataset is empty; lookups in this category will fail");
            } else if !table.has_column(category.identifying_column()) {
                warn!(
                    "{category} dataset has no '{}' column",
                    category.identifying_column()
                );
            }
            info!("{category}: {} rows", table.len());
            tables.push((category, table));
        }

        Ok(Self::from_tables(tables))
    }

    /// Row count per category.
    pub fn summary(&self) -> BTreeMap<&'static str, usize> {
        self.tables
            .iter()
            .map(|(c, t)| (c.as_str(), t.table.len()))
            .collect()
    }

    fn resolve(&self, category: &str) -> Result<(Category, &CategoryTable), QueryError> {
        let parsed: Category = category.parse()?;
        let entry = self
            .tables
            .get(&parsed)
            .ok_or_else(|| QueryError::InvalidCategory(category.to_string()))?;

        let column = parsed.identifying_column();
        if !entry.table.has_column(column) {
            return Err(QueryError::MissingColumn(column.to_string()));
        }
        Ok((parsed, entry))
    }

    /// Distinct pathogen names in `category`, sorted ascending.
    pub fn list_pathogens(&self, category: &str) -> Result<Vec<String>, QueryError> {
        let (parsed, entry) = self.resolve(category)?;
        Ok(distinct_values(&entry.table, parsed.identifying_column()))
    }

    /// Full record for the first row whose identifying value matches
    /// `pathogen` ignoring case and surrounding whitespace.
    pub fn get_details(
        &self,
        category: &str,
        pathogen: &str,
    ) -> Result<BTreeMap<String, String>, QueryError> {
        let (_, entry) = self.resolve(category)?;
        let key = normalize_name(pathogen);

        let idx = first_match(&entry.keys, &key).ok_or_else(|| QueryError::NotFound {
            pathogen: pathogen.to_string(),
            category: category.to_string(),
        })?;
        Ok(detail_view(&entry.table, &entry.table.records()[idx]))
    }
}
