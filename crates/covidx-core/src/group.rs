//! Column groups and their property-map encoding.
//!
//! A [`ColumnGroup`] is an ordered list of covered columns plus the index
//! table the group writes to. Groups are registered on a table through a
//! flat string-to-string property map built with [`IndexSpecBuilder`] and read
//! back with [`ColumnGroup::from_properties`].
//!
//! # Property keys
//!
//! ```text
//! covidx.index.covered.groups.count          = <n>
//! covidx.index.covered.group.<i>.table       = <index table>
//! covidx.index.covered.group.<i>.columns.count = <m>
//! covidx.index.covered.group.<i>.columns.<j> = <family>:<qualifier>
//! ```
//!
//! Every key is produced by [`SpecKey::render`].

use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::column::CoveredColumn;
use crate::error::{Error, Result};

/// Prefix shared by every index specification property.
pub const SPEC_PREFIX: &str = "covidx.index.covered";

/// Ordered property map produced by [`IndexSpecBuilder`].
pub type IndexSpecProperties = IndexMap<String, String>;

/// Ordered set of covered columns written to one index table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnGroup {
    table: String,
    columns: Vec<CoveredColumn>,
}

impl ColumnGroup {
    /// Creates a group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyColumnGroup`] if `columns` is empty.
    pub fn new(table: impl Into<String>, columns: Vec<CoveredColumn>) -> Result<Self> {
        let table = table.into();
        if columns.is_empty() {
            return Err(Error::EmptyColumnGroup(table));
        }
        Ok(Self { table, columns })
    }

    /// Index table receiving this group's writes.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Covered columns in slot order.
    #[must_use]
    pub fn columns(&self) -> &[CoveredColumn] {
        &self.columns
    }

    /// Number of covered columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false for a constructed group.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates covered columns in slot order.
    pub fn iter(&self) -> std::slice::Iter<'_, CoveredColumn> {
        self.columns.iter()
    }

    /// Reads every registered group, in registration order.
    ///
    /// A map without a group count holds no groups.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSpecKey`] or [`Error::InvalidSpecValue`] if the
    /// map is incomplete or holds unparsable values, and
    /// [`Error::EmptyColumnGroup`] for a group declaring zero columns.
    pub fn from_properties<P: PropertySource + ?Sized>(props: &P) -> Result<Vec<Self>> {
        let Some(group_count) = read_count(props, &SpecKey::GroupCount)? else {
            return Ok(Vec::new());
        };

        let mut groups = Vec::with_capacity(group_count);
        for group in 0..group_count {
            let table_key = SpecKey::Table { group }.render();
            let table = props
                .property(&table_key)
                .ok_or(Error::MissingSpecKey(table_key))?;

            let count_key = SpecKey::ColumnCount { group };
            let column_count = read_count(props, &count_key)?
                .ok_or_else(|| Error::MissingSpecKey(count_key.render()))?;

            let mut columns = Vec::with_capacity(column_count);
            for column in 0..column_count {
                let key = SpecKey::Column { group, column }.render();
                let spec = props
                    .property(&key)
                    .ok_or_else(|| Error::MissingSpecKey(key.clone()))?;
                let parsed = CoveredColumn::parse(spec).map_err(|e| Error::InvalidSpecValue {
                    key,
                    message: e.to_string(),
                })?;
                columns.push(parsed);
            }

            groups.push(Self::new(table, columns)?);
        }
        Ok(groups)
    }
}

impl<'a> IntoIterator for &'a ColumnGroup {
    type Item = &'a CoveredColumn;
    type IntoIter = std::slice::Iter<'a, CoveredColumn>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// Keys of the index specification property map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKey {
    /// Number of registered groups.
    GroupCount,
    /// Target table of a group.
    Table {
        /// Group index.
        group: usize,
    },
    /// Number of columns in a group.
    ColumnCount {
        /// Group index.
        group: usize,
    },
    /// One covered column of a group.
    Column {
        /// Group index.
        group: usize,
        /// Column index within the group.
        column: usize,
    },
}

impl SpecKey {
    /// Renders the property key.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::GroupCount => format!("{SPEC_PREFIX}.groups.count"),
            Self::Table { group } => format!("{SPEC_PREFIX}.group.{group}.table"),
            Self::ColumnCount { group } => format!("{SPEC_PREFIX}.group.{group}.columns.count"),
            Self::Column { group, column } => {
                format!("{SPEC_PREFIX}.group.{group}.columns.{column}")
            }
        }
    }
}

/// Read access to a string-keyed property map.
pub trait PropertySource {
    /// Returns the value stored under `key`.
    fn property(&self, key: &str) -> Option<&str>;
}

impl<S: BuildHasher> PropertySource for IndexMap<String, String, S> {
    fn property(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl<S: BuildHasher> PropertySource for HashMap<String, String, S> {
    fn property(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl PropertySource for BTreeMap<String, String> {
    fn property(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

fn read_count<P: PropertySource + ?Sized>(props: &P, key: &SpecKey) -> Result<Option<usize>> {
    let rendered = key.render();
    props
        .property(&rendered)
        .map(|raw| {
            raw.trim().parse::<usize>().map_err(|e| Error::InvalidSpecValue {
                key: rendered.clone(),
                message: format!("'{raw}' is not a count: {e}"),
            })
        })
        .transpose()
}

/// Accumulates column groups into an index specification property map.
#[derive(Debug, Clone, Default)]
pub struct IndexSpecBuilder {
    properties: IndexSpecProperties,
    groups: usize,
}

impl IndexSpecBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a group and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColumn`] if a column cannot be rendered as a
    /// string. The builder is left unchanged in that case.
    pub fn add_index_group(&mut self, group: &ColumnGroup) -> Result<usize> {
        let index = self.groups;
        let columns = group
            .iter()
            .map(CoveredColumn::to_spec_string)
            .collect::<Result<Vec<_>>>()?;

        self.put(SpecKey::Table { group: index }, group.table().to_string());
        self.put(
            SpecKey::ColumnCount { group: index },
            columns.len().to_string(),
        );
        for (column, spec) in columns.into_iter().enumerate() {
            self.put(
                SpecKey::Column {
                    group: index,
                    column,
                },
                spec,
            );
        }

        self.groups += 1;
        self.put(SpecKey::GroupCount, self.groups.to_string());
        Ok(index)
    }

    /// Number of registered groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups
    }

    /// Current property map.
    #[must_use]
    pub fn properties(&self) -> &IndexSpecProperties {
        &self.properties
    }

    /// Consumes the builder into its property map.
    #[must_use]
    pub fn build(self) -> IndexSpecProperties {
        self.properties
    }

    fn put(&mut self, key: SpecKey, value: String) {
        self.properties.insert(key.render(), value);
    }
}
