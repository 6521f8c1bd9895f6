//! `Debug` formatters for use with `#[debug(with = ...)]` from `custom_debug`.
//!
//! Decoded models and rasters carry vertex arrays and pixel payloads that run
//! into the tens of thousands of elements. These formatters print the first few
//! entries and a count of the rest.

use std::fmt;

const FIRST_N_ELEMENTS: usize = 3;

/// A collection that can report its size and lend out its leading elements
pub trait Collection {
    type Item: fmt::Debug;

    fn item_count(&self) -> usize;
    fn head(&self, elements: usize) -> &[Self::Item];
}

impl<T: fmt::Debug> Collection for [T] {
    type Item = T;
    fn item_count(&self) -> usize {
        self.len()
    }
    fn head(&self, elements: usize) -> &[T] {
        &self[..elements.min(self.len())]
    }
}

impl<T: fmt::Debug> Collection for Vec<T> {
    type Item = T;
    fn item_count(&self) -> usize {
        self.len()
    }
    fn head(&self, elements: usize) -> &[T] {
        self.as_slice().head(elements)
    }
}

#[cfg(not(feature = "debug-print-all"))]
pub fn trimmed_collection_fmt<T: Collection + fmt::Debug>(
    n: &T,
    f: &mut fmt::Formatter,
) -> fmt::Result {
    let first_n = n.head(FIRST_N_ELEMENTS);
    let rest = n.item_count() - first_n.len();

    if rest == 0 {
        write!(f, "{:?}", n)
    } else {
        write!(f, "{:?} + {} elements", first_n, rest)
    }
}

#[cfg(feature = "debug-print-all")]
pub fn trimmed_collection_fmt<T: Collection + fmt::Debug>(
    n: &T,
    f: &mut fmt::Formatter,
) -> fmt::Result {
    write!(f, "{:?}", n)
}
