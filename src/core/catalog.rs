//! Immutable, ordered example tables.
//!
//! A catalog is built once and shared by `Arc` with every playback controller
//! that reads it. Nothing mutates it after construction.

use crate::display::DeltaError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("catalog `{0}` has no examples")]
    Empty(String),
    #[error("example {index} of catalog `{name}`: {source}")]
    InvalidDelta {
        name: String,
        index: usize,
        #[source]
        source: DeltaError,
    },
}

#[derive(Debug)]
pub struct Catalog<E> {
    name: String,
    examples: Box<[E]>,
}

impl<E> Catalog<E> {
    pub fn new(name: impl Into<String>, examples: Vec<E>) -> Result<Self, CatalogError> {
        let name = name.into();
        if examples.is_empty() {
            return Err(CatalogError::Empty(name));
        }
        Ok(Self {
            name,
            examples: examples.into_boxed_slice(),
        })
    }

    /// Builtin tables. They are never empty and their deltas are covered by
    /// each panel's tests.
    pub(crate) fn from_static(name: &str, examples: Vec<E>) -> Self {
        debug_assert!(!examples.is_empty(), "builtin catalog `{name}` is empty");
        Self {
            name: name.to_string(),
            examples: examples.into_boxed_slice(),
        }
    }

    /// Run `check` over every example, reporting the first failure.
    pub fn validate_with<F>(self, mut check: F) -> Result<Self, CatalogError>
    where
        F: FnMut(&E) -> Result<(), DeltaError>,
    {
        for (index, example) in self.examples.iter().enumerate() {
            check(example).map_err(|source| CatalogError::InvalidDelta {
                name: self.name.clone(),
                index,
                source,
            })?;
        }
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Panics when `index` is out of range; callers keep `index < len()`.
    pub fn get(&self, index: usize) -> &E {
        &self.examples[index]
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.examples.len() - 1
    }

    pub fn all(&self) -> &[E] {
        &self.examples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.examples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        let err = Catalog::<u32>::new("nothing", Vec::new()).unwrap_err();
        assert_eq!(err, CatalogError::Empty("nothing".to_string()));
    }

    #[test]
    fn keeps_order() {
        let c = Catalog::new("numbers", vec![3, 1, 2]).unwrap();
        assert_eq!(c.len(), 3);
        assert_eq!(c.last_index(), 2);
        assert_eq!(*c.get(0), 3);
        assert_eq!(c.all(), &[3, 1, 2]);
        assert!(!c.is_empty());
    }

    #[test]
    fn validate_reports_index() {
        let c = Catalog::new("words", vec!["cat", "mouse", "dog"]).unwrap();
        let err = c
            .validate_with(|w| {
                if *w == "mouse" {
                    Err(DeltaError::UnknownWord(w.to_string()))
                } else {
                    Ok(())
                }
            })
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDelta { index: 1, .. }));
    }

    #[test]
    #[should_panic]
    fn get_out_of_range_panics() {
        let c = Catalog::new("one", vec![1]).unwrap();
        let _ = c.get(1);
    }
}
