//! Covered column references.
//!
//! A [`CoveredColumn`] names a column family plus either one exact qualifier
//! or every qualifier of the family (wildcard). Its string form,
//! `family:qualifier`, is what index specifications store; an empty qualifier
//! denotes the wildcard.

use bytes::Bytes;
use std::fmt;

use crate::cell::Cell;
use crate::error::{Error, Result};

/// Separator between family and qualifier in the string form of a column.
pub const COLUMN_SEPARATOR: char = ':';

/// A column whose visible value contributes to an index key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoveredColumn {
    family: Bytes,
    qualifier: Option<Bytes>,
}

impl CoveredColumn {
    /// Creates a covered column; `None` covers every qualifier of the family.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColumn`] if the family is empty or contains
    /// the separator, or if an exact qualifier is empty (`family:` names the
    /// wildcard in spec strings).
    pub fn new(family: impl Into<Bytes>, qualifier: Option<Bytes>) -> Result<Self> {
        let family = family.into();
        if family.is_empty() {
            return Err(Error::InvalidColumn("column family must not be empty".into()));
        }
        if family.contains(&(COLUMN_SEPARATOR as u8)) {
            return Err(Error::InvalidColumn(format!(
                "column family '{}' must not contain '{COLUMN_SEPARATOR}'",
                String::from_utf8_lossy(&family)
            )));
        }
        if qualifier.as_ref().is_some_and(Bytes::is_empty) {
            return Err(Error::InvalidColumn(format!(
                "exact qualifier of family '{}' must not be empty",
                String::from_utf8_lossy(&family)
            )));
        }
        Ok(Self { family, qualifier })
    }

    /// Covers exactly one qualifier.
    ///
    /// # Errors
    ///
    /// See [`CoveredColumn::new`].
    pub fn exact(family: impl Into<Bytes>, qualifier: impl Into<Bytes>) -> Result<Self> {
        Self::new(family, Some(qualifier.into()))
    }

    /// Covers every qualifier of the family.
    ///
    /// # Errors
    ///
    /// See [`CoveredColumn::new`].
    pub fn all_qualifiers(family: impl Into<Bytes>) -> Result<Self> {
        Self::new(family, None)
    }

    /// Parses the `family:qualifier` form. An empty qualifier (or no
    /// separator at all) yields a wildcard column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColumn`] if the family part is invalid.
    pub fn parse(spec: &str) -> Result<Self> {
        let (family, qualifier) = spec.split_once(COLUMN_SEPARATOR).unwrap_or((spec, ""));
        let qualifier =
            (!qualifier.is_empty()).then(|| Bytes::copy_from_slice(qualifier.as_bytes()));
        Self::new(Bytes::copy_from_slice(family.as_bytes()), qualifier)
    }

    /// Renders the `family:qualifier` form read back by [`CoveredColumn::parse`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColumn`] if family or qualifier is not UTF-8,
    /// since the specification map only holds strings.
    pub fn to_spec_string(&self) -> Result<String> {
        let family = std::str::from_utf8(&self.family)
            .map_err(|e| Error::InvalidColumn(format!("family is not UTF-8: {e}")))?;
        let qualifier = match &self.qualifier {
            Some(q) => std::str::from_utf8(q)
                .map_err(|e| Error::InvalidColumn(format!("qualifier is not UTF-8: {e}")))?,
            None => "",
        };
        Ok(format!("{family}{COLUMN_SEPARATOR}{qualifier}"))
    }

    /// Column family.
    #[must_use]
    pub fn family(&self) -> &Bytes {
        &self.family
    }

    /// Exact qualifier, `None` for a wildcard.
    #[must_use]
    pub fn qualifier(&self) -> Option<&Bytes> {
        self.qualifier.as_ref()
    }

    /// Returns true if the column covers every qualifier of its family.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.qualifier.is_none()
    }

    /// Returns true if `family` is this column's family.
    #[must_use]
    pub fn matches_family(&self, family: &[u8]) -> bool {
        self.family.as_ref() == family
    }

    /// Returns true if `qualifier` is covered by this column.
    #[must_use]
    pub fn matches_qualifier(&self, qualifier: &[u8]) -> bool {
        self.qualifier
            .as_ref()
            .map_or(true, |q| q.as_ref() == qualifier)
    }

    /// Returns true if the cell addresses this column. Family delete markers
    /// match every column of their family.
    #[must_use]
    pub fn matches(&self, cell: &Cell) -> bool {
        self.matches_family(&cell.family)
            && (cell.is_delete_family() || self.matches_qualifier(&cell.qualifier))
    }

    /// `family ‖ separator ‖ qualifier` as stored in index-table qualifiers.
    /// A wildcard renders with an empty qualifier.
    #[must_use]
    pub fn index_qualifier(&self, separator: u8) -> Vec<u8> {
        let qualifier = self.qualifier.as_deref().unwrap_or_default();
        let mut out = Vec::with_capacity(self.family.len() + 1 + qualifier.len());
        out.extend_from_slice(&self.family);
        out.push(separator);
        out.extend_from_slice(qualifier);
        out
    }
}

impl fmt::Display for CoveredColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qualifier = match &self.qualifier {
            Some(q) => String::from_utf8_lossy(q),
            None => "*".into(),
        };
        write!(
            f,
            "{}{COLUMN_SEPARATOR}{qualifier}",
            String::from_utf8_lossy(&self.family)
        )
    }
}
