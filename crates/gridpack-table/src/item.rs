#![forbid(unsafe_code)]

//! Collaborator traits: how cells are read out of items, and how formatted
//! rows are handed to the packer.

use std::any::{Any, type_name};
use std::fmt;
use std::marker::PhantomData;

use crate::error::FormatError;

/// Raw, type-erased value of one cell.
pub type CellValue = Box<dyn Any + Send>;

/// Extracts and formats the value of one column for items of type `T`.
///
/// [`Getter::value`] and [`Getter::format`] are used for tabular output;
/// [`Getter::value_string`] is the plain rendering used by non-tabular
/// exports (CSV-like output via [`crate::Table::format_item_basic`]).
pub trait Getter<T: ?Sized>: Send + Sync {
    /// Raw value of the cell.
    fn value(&self, item: &T) -> Result<CellValue, FormatError>;

    /// Plain string form of the cell, without any decoration.
    fn value_string(&self, column: &str, item: &T) -> Result<String, FormatError>;

    /// Display form of a value previously returned by [`Getter::value`].
    fn format(&self, item: &T, value: CellValue) -> Result<String, FormatError>;
}

/// Getter whose value already is the display string.
///
/// ```
/// use gridpack_table::{FnGetter, Getter};
///
/// let getter = FnGetter::new(|name: &String| name.to_uppercase());
/// let value = getter.value(&"a.txt".to_owned()).unwrap();
/// assert_eq!(getter.format(&"a.txt".to_owned(), value).unwrap(), "A.TXT");
/// ```
pub struct FnGetter<F> {
    render: F,
}

impl<F> FnGetter<F> {
    pub fn new(render: F) -> Self {
        Self { render }
    }
}

impl<F> fmt::Debug for FnGetter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnGetter").finish_non_exhaustive()
    }
}

impl<T, F> Getter<T> for FnGetter<F>
where
    T: ?Sized,
    F: Fn(&T) -> String + Send + Sync,
{
    fn value(&self, item: &T) -> Result<CellValue, FormatError> {
        Ok(Box::new((self.render)(item)))
    }

    fn value_string(&self, _column: &str, item: &T) -> Result<String, FormatError> {
        Ok((self.render)(item))
    }

    fn format(&self, _item: &T, value: CellValue) -> Result<String, FormatError> {
        value
            .downcast::<String>()
            .map(|s| *s)
            .map_err(|_| FormatError::new("expected a string value"))
    }
}

/// Getter that separates the raw value from its display form.
///
/// The plain string form is the value's [`fmt::Display`] output; the
/// tabular form comes from the formatting function, e.g. a byte count shown
/// as `4.0K`.
pub struct TypedGetter<V, G, F> {
    get: G,
    format: F,
    _value: PhantomData<fn() -> V>,
}

impl<V, G, F> TypedGetter<V, G, F> {
    pub fn new<T>(get: G, format: F) -> Self
    where
        T: ?Sized,
        G: Fn(&T) -> V,
        F: Fn(&V) -> String,
    {
        Self {
            get,
            format,
            _value: PhantomData,
        }
    }
}

impl<V, G, F> fmt::Debug for TypedGetter<V, G, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedGetter")
            .field("value", &type_name::<V>())
            .finish_non_exhaustive()
    }
}

impl<T, V, G, F> Getter<T> for TypedGetter<V, G, F>
where
    T: ?Sized,
    V: Any + Send + fmt::Display,
    G: Fn(&T) -> V + Send + Sync,
    F: Fn(&V) -> String + Send + Sync,
{
    fn value(&self, item: &T) -> Result<CellValue, FormatError> {
        Ok(Box::new((self.get)(item)))
    }

    fn value_string(&self, _column: &str, item: &T) -> Result<String, FormatError> {
        Ok((self.get)(item).to_string())
    }

    fn format(&self, _item: &T, value: CellValue) -> Result<String, FormatError> {
        value
            .downcast::<V>()
            .map(|v| (self.format)(&*v))
            .map_err(|_| FormatError::new(format!("expected a {} value", type_name::<V>())))
    }
}

/// Random access to rows of already formatted cells.
///
/// Every row is expected to hold one cell per table column.
pub trait FormattedItemList {
    /// Number of rows.
    fn len(&self) -> usize;

    /// Cells of row `index`. Panics if `index >= len()`, like slice
    /// indexing.
    fn get(&self, index: usize) -> &[String];

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FormattedItemList for [Vec<String>] {
    fn len(&self) -> usize {
        <[Vec<String>]>::len(self)
    }

    fn get(&self, index: usize) -> &[String] {
        &self[index]
    }
}

impl FormattedItemList for Vec<Vec<String>> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> &[String] {
        &self[index]
    }
}
