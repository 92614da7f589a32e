//! # Unit of Measure Lookup
//!
//! Products reference units by `uom_id`. The full id → code table is small,
//! so it is loaded once per request and every row resolves against it.
//! Unknown, null or unloadable ids all show the fallback code (`EA`).

use std::collections::HashMap;

use crate::FALLBACK_UOM_CODE;

/// In-memory id → code mapping with a fallback code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UomTable {
    codes: HashMap<i64, String>,
    fallback: String,
}

impl Default for UomTable {
    fn default() -> Self {
        UomTable::new(HashMap::new())
    }
}

impl UomTable {
    /// Wraps a loaded mapping, falling back to `EA`.
    pub fn new(codes: HashMap<i64, String>) -> Self {
        UomTable {
            codes,
            fallback: FALLBACK_UOM_CODE.to_string(),
        }
    }

    /// Builds a table from `(id, code)` pairs as read from storage.
    ///
    /// Blank codes are skipped so they resolve to the fallback.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i64, String)>,
    {
        UomTable::new(
            pairs
                .into_iter()
                .filter(|(_, code)| !code.trim().is_empty())
                .collect(),
        )
    }

    /// Replaces the fallback code. A blank value keeps the current one.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        let fallback = fallback.into();
        if !fallback.trim().is_empty() {
            self.fallback = fallback;
        }
        self
    }

    /// The code for `uom_id`, or the fallback.
    pub fn resolve(&self, uom_id: Option<i64>) -> &str {
        uom_id
            .and_then(|id| self.codes.get(&id))
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> UomTable {
        UomTable::from_pairs(vec![(1, "CS".to_string()), (2, "LB".to_string())])
    }

    #[test]
    fn test_known_ids_resolve() {
        let uoms = table();
        assert_eq!(uoms.resolve(Some(1)), "CS");
        assert_eq!(uoms.resolve(Some(2)), "LB");
        assert_eq!(uoms.len(), 2);
    }

    #[test]
    fn test_unknown_and_null_fall_back_to_ea() {
        let uoms = table();
        assert_eq!(uoms.resolve(Some(99)), "EA");
        assert_eq!(uoms.resolve(None), "EA");
    }

    #[test]
    fn test_empty_table_resolves_everything_to_fallback() {
        let uoms = UomTable::default();
        assert!(uoms.is_empty());
        assert_eq!(uoms.resolve(Some(1)), "EA");
    }

    #[test]
    fn test_blank_codes_are_skipped() {
        let uoms = UomTable::from_pairs(vec![(1, "  ".to_string())]);
        assert_eq!(uoms.resolve(Some(1)), "EA");
    }

    #[test]
    fn test_custom_fallback() {
        let uoms = table().with_fallback("UNIT");
        assert_eq!(uoms.resolve(None), "UNIT");
        assert_eq!(uoms.fallback(), "UNIT");

        let unchanged = table().with_fallback("");
        assert_eq!(unchanged.resolve(None), "EA");
    }
}
