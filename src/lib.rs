//! Package implement an ordered map on a size-annotated
//! [left-leaning-red-black][wiki-llrb] tree.
//!
//! [OMap] is an ephemeral ordered-map, single threaded, with following
//! characteristics:
//!
//! - Each entry in OMap instance correspond to a {Key, Value} pair.
//! - Parametrised over `key-type` and `value-type`.
//! - Insertion is balanced using the LLRB rotate/flip discipline.
//! - Deletion is plain [Hibbard deletion][hibbard], colors are not
//!   repaired. Order and sizes stay exact, balance may degrade.
//! - Every node tracks the size of its sub-tree.
//! - Full table scan and range scan, in ascending key order.
//! - Snapshot export of keys, values and entries.
//! - Cheap single path height probes, for diagnostics.
//! - No Durability guarantee.
//! - Not thread safe.
//!
//! Constructing a new [OMap] instance and CRUD operations:
//!
//! ```
//! use llrbmap::OMap;
//!
//! let mut index: OMap<String, String> = OMap::new();
//! assert_eq!(index.len(), 0);
//! assert_eq!(index.is_empty(), true);
//!
//! assert_eq!(index.set("key1".to_string(), "value1".to_string()), None);
//! index.set("key2".to_string(), "value2".to_string());
//!
//! let old = index.set("key2".to_string(), "value3".to_string());
//! assert_eq!(old, Some("value2".to_string()));
//! assert_eq!(index.len(), 2);
//!
//! assert_eq!(index.get("key1").unwrap(), "value1");
//! assert_eq!(index.get("key2").unwrap(), "value3");
//! assert!(index.contains_value(&"value3".to_string()));
//!
//! index.remove("key1");
//! assert!(!index.contains_key("key1"));
//! assert_eq!(index.len(), 1);
//! ```
//!
//! Values that may be missing are modelled with `Option`, which keeps a
//! stored "null" apart from an absent key:
//!
//! ```
//! use llrbmap::OMap;
//!
//! let mut index: OMap<u32, Option<&str>> = OMap::new();
//! index.set(1, None);
//! assert_eq!(index.get(&1), Some(&None));
//! assert_eq!(index.get(&2), None);
//! assert!(index.contains_value(&None));
//! ```
//!
//! Callers holding optional keys can use the `try_*` variants, which
//! fail with [Error::InvalidArgument] on a missing key:
//!
//! ```
//! use llrbmap::{Error, OMap};
//!
//! let mut index: OMap<u32, u32> = OMap::new();
//! assert!(index.try_set(Some(10), 100).is_ok());
//! match index.try_set(None, 200) {
//!     Err(Error::InvalidArgument(_, _)) => (),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! [wiki-llrb]: https://en.wikipedia.org/wiki/Left-leaning_red-black_tree
//! [hibbard]: https://en.wikipedia.org/wiki/Binary_search_tree#Deletion

use std::{error, fmt, result};

// Short form to compose Error values.
//
// Here are few possible ways:
//
// ```ignore
// use crate::Error;
// err_at!(InvalidArgument, msg: format!("bad argument"));
// ```
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, msg: "size mismatch {} {}", a, b);
// ```
//
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
}

mod checked;
mod node;
mod omap;

pub use omap::{Iter, OMap, Range, Stats};

/// Error variants that are returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the
/// error location.
pub enum Error {
    /// Tree failed validation, refer to [OMap::validate].
    Fatal(String, String),
    /// Missing key, or missing source, passed to a `try_*` API.
    InvalidArgument(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
            InvalidArgument(p, msg) => write!(f, "{} InvalidArgument: {}", p, msg),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;
