//! Comparison options for structural equality

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use super::node::Node;

/// Comparator over two nodes of the same named type
pub type CompareFn = Arc<dyn Fn(&Node, &Node) -> bool + Send + Sync>;

/// One structural comparison option
///
/// Options are order-independent: see [`CompareOptions`] for how repeated
/// or conflicting options merge.
#[derive(Clone)]
pub enum CompareOption {
    /// Skip a named field, addressed by its dotted path from the root value
    IgnoreField(String),
    /// Replace structural comparison for every struct or enum with this name
    Comparator { type_name: String, compare: CompareFn },
    /// Whether `_`-prefixed fields take part in the comparison
    TreatInternal(bool),
}

impl fmt::Debug for CompareOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOption::IgnoreField(path) => f.debug_tuple("IgnoreField").field(path).finish(),
            CompareOption::Comparator { type_name, .. } => f
                .debug_struct("Comparator")
                .field("type_name", type_name)
                .finish_non_exhaustive(),
            CompareOption::TreatInternal(significant) => {
                f.debug_tuple("TreatInternal").field(significant).finish()
            }
        }
    }
}

/// Ignore the field at `path` (e.g. `"address.city"`)
///
/// Sequence elements, map values, options and newtypes do not add a
/// segment, so `"items.price"` ignores `price` in every element of `items`.
pub fn ignore_field(path: impl Into<String>) -> CompareOption {
    CompareOption::IgnoreField(path.into())
}

/// Compare every value of the named type with `compare`
pub fn comparator<F>(type_name: impl Into<String>, compare: F) -> CompareOption
where
    F: Fn(&Node, &Node) -> bool + Send + Sync + 'static,
{
    CompareOption::Comparator {
        type_name: type_name.into(),
        compare: Arc::new(compare),
    }
}

/// Like [`comparator`], keyed by the Rust type `U`
///
/// Matches the name serde derives for `U`: the last path segment of the
/// type name without generic arguments.
pub fn comparator_for<U, F>(compare: F) -> CompareOption
where
    U: ?Sized,
    F: Fn(&Node, &Node) -> bool + Send + Sync + 'static,
{
    comparator(short_type_name::<U>(), compare)
}

/// Treat `_`-prefixed fields as significant (`true`, the default) or skip
/// them (`false`)
pub fn treat_internal(significant: bool) -> CompareOption {
    CompareOption::TreatInternal(significant)
}

/// `my_crate::model::Money<u8>` -> `Money`
pub(crate) fn short_type_name<U: ?Sized>() -> &'static str {
    let full = std::any::type_name::<U>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Merged, order-independent view of a list of [`CompareOption`]s
#[derive(Clone)]
pub struct CompareOptions {
    ignored: HashSet<String>,
    comparators: HashMap<String, Vec<CompareFn>>,
    treat_internal: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            ignored: HashSet::new(),
            comparators: HashMap::new(),
            treat_internal: true,
        }
    }
}

impl fmt::Debug for CompareOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut comparators: Vec<_> = self.comparators.keys().collect();
        comparators.sort();
        f.debug_struct("CompareOptions")
            .field("ignored", &self.ignored)
            .field("comparators", &comparators)
            .field("treat_internal", &self.treat_internal)
            .finish()
    }
}

impl CompareOptions {
    /// Merge options
    ///
    /// Ignored paths form a set. Comparators registered for the same type
    /// must all agree for two values to be equal. Internal fields stay
    /// significant only if no option turns them off.
    pub fn new(options: impl IntoIterator<Item = CompareOption>) -> Self {
        let mut merged = Self::default();
        for option in options {
            match option {
                CompareOption::IgnoreField(path) => {
                    merged.ignored.insert(path);
                }
                CompareOption::Comparator { type_name, compare } => {
                    merged.comparators.entry(type_name).or_default().push(compare);
                }
                CompareOption::TreatInternal(significant) => {
                    merged.treat_internal &= significant;
                }
            }
        }
        merged
    }

    /// Merge a borrowed slice of options
    pub fn from_slice(options: &[CompareOption]) -> Self {
        Self::new(options.iter().cloned())
    }

    /// Check if the field at this dotted path is ignored
    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignored.contains(path)
    }

    /// Check if `_`-prefixed fields are compared
    pub fn treats_internal(&self) -> bool {
        self.treat_internal
    }

    pub(crate) fn comparators_for(&self, type_name: &str) -> Option<&[CompareFn]> {
        self.comparators.get(type_name).map(Vec::as_slice)
    }
}
