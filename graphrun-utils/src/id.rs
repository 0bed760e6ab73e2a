//! Interned names for nodes and ports.

use symbol_table::GlobalSymbol;

/// An interned node or port name.
///
/// Names recur constantly as hash-map keys (port maps, mappings, edge key
/// maps, the write-ledger), so they are interned once and carried as a
/// `Copy` handle. Equality compares interned symbols. There is deliberately
/// no `Ord` on `Id`: symbol numbering follows interning order, not
/// spelling, and the one place the engine orders names — the scheduler's
/// lexicographic tie-break — must compare spellings via [`Id::as_str`].
#[derive(
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    Debug,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Id {
    sym: GlobalSymbol,
}

impl Id {
    /// Intern a name. Accepts anything printable so edge indices and run
    /// identifiers can be named in diagnostics.
    pub fn new<S: ToString>(name: S) -> Self {
        Self {
            sym: GlobalSymbol::from(name.to_string()),
        }
    }

    /// The spelling of this name.
    pub fn as_str(&self) -> &'static str {
        self.sym.as_str()
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self {
            sym: GlobalSymbol::from(s),
        }
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Self {
            sym: GlobalSymbol::from(s),
        }
    }
}

/// Comparisons against literals, for diagnostics and tests.
impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// A trait representing something in the graph that has a name.
pub trait GetName {
    /// Return the object's name.
    fn name(&self) -> Id;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable() {
        let a: Id = "n1".into();
        let b = Id::new(String::from("n1"));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "n1");
        assert_eq!(a, "n1");
    }

    #[test]
    fn spelling_order_is_independent_of_interning_order() {
        // Interned in reverse lexicographic order on purpose.
        let z: Id = "zz".into();
        let a: Id = "aa".into();
        assert!(a.as_str() < z.as_str());
    }
}
