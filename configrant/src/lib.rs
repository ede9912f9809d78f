//! Bind command-line arguments, environment variables and defaults onto struct fields
//!
//! `configrant` fills the fields of a configuration struct from, in priority
//! order, a command-line argument, an environment variable and a default
//! literal. A field is only filled while it still holds its type's zero value,
//! so values provided by the caller always win.
//!
//! # Features
//!
//! - **Declarative**: one `#[cfgrant(...)]` tag per field with `#[derive(Configrant)]`
//! - **Caller first**: non-zero fields are never overwritten
//! - **Nested records**: fields of nested (and optional nested) structs are bound in place
//! - **Composite values**: sequences, maps and durations from plain literals
//!
//! # Example
//!
//! ```rust
//! use configrant::{Args, Configrant};
//! use std::time::Duration;
//!
//! #[derive(Debug, Default, Configrant)]
//! struct Config {
//!     #[cfgrant("arg:--url,env:EXAMPLE_API_URL,default:http://localhost:8080")]
//!     pub url: String,
//!
//!     #[cfgrant("arg:--timeout,default:5s")]
//!     pub timeout: Duration,
//!
//!     #[cfgrant("default:true")]
//!     pub is_async: bool,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let args = Args::parse(["--timeout=7s"]);
//! let mut config = Config::default();
//! config.configure_with(&args)?;
//!
//! assert_eq!(config.url, "http://localhost:8080");
//! assert_eq!(config.timeout, Duration::from_secs(7));
//! assert!(config.is_async);
//! # Ok(())
//! # }
//! ```
//!
//! # Tags
//!
//! A tag is a comma-separated list of `key:value` options:
//!
//! - `arg` - key looked up in the argument table (`--timeout=5s`, or a bare
//!   `--verbose` which reads as `true`)
//! - `env` - environment variable name
//! - `default` - literal used when neither of the above is set
//!
//! Unknown keys are ignored. The tag `-` (or `#[cfgrant(skip)]`) excludes a
//! field. The structured form `#[cfgrant(arg = "--url", env = "API_URL")]`
//! is equivalent to the string form.
//!
//! Only fields visible outside their module (any `pub` visibility) are bound;
//! private fields are left untouched even when tagged. Fields of a nested
//! record type need no tag: their own fields carry the tags.
//!
//! # Value Literals
//!
//! | Type | Literal |
//! |------|---------|
//! | `String` | taken as is |
//! | `bool` | `1 t T TRUE true True`, `0 f F FALSE false False` |
//! | integers | `42`, `-7`, `0x1F`, `0o17`, `0b101` (range checked) |
//! | `f32`, `f64` | `3.32`, `1e-3`, `0x1p-2`, `inf` |
//! | `Duration` | `300ms`, `1h30m`, `1.5s` (units `ns us µs ms s m h`) |
//! | `Vec<T>` | `a;b;c` |
//! | `HashMap<K, V>`, `BTreeMap<K, V>` | `first:1;second:2` |
//!
//! `Option<T>` and `Box<T>` are bound through to `T`; an unset `Option` is
//! filled with `T::default()` before binding.
//!
//! # Errors
//!
//! Malformed tags and unsupported field types are reported before anything is
//! written. A literal that fails to convert aborts the pass and names the
//! field and the source it came from; in that case no field is written either.

// Lets the derive output (`::configrant::...`) resolve inside this crate's tests.
extern crate self as configrant;

mod args;
mod duration;
mod error;
mod field;
mod record;
mod resolve;
mod setter;
mod slot;
mod tag;
mod walk;

use tracing::debug;

pub use args::Args;
pub use configrant_derive::Configrant;
pub use duration::{parse_duration, DurationError};
pub use error::{ConvertError, Error};
pub use field::{Descriptor, Prepared};
pub use record::{FieldRef, Record};
pub use resolve::{Resolved, Source, Sources};
pub use setter::{setter_for, Kind, Setter, Value};
pub use slot::{Member, Node, Slot};
pub use tag::{Tag, TagError, EXCLUDE};
pub use walk::flatten;

/// Bind `target` using the arguments of the current process.
///
/// See [`process_with`].
pub fn process<T: Member + ?Sized>(target: &mut T) -> Result<(), Error> {
    process_with(target, &Args::from_env())
}

/// Bind the fields of `target` from `args`, the environment and tag defaults.
///
/// For every configurable leaf field still holding its zero value, the first
/// non-empty literal among argument, environment variable and default is
/// converted and stored. The pass is all or nothing with respect to field
/// values: every literal is converted before the first one is stored.
///
/// # Errors
///
/// - [`Error::NotRecord`] when `target` is not a record
/// - [`Error::TagFormat`] / [`Error::UnsupportedType`] for malformed fields
/// - [`Error::Parse`] / [`Error::MapFormat`] when a literal cannot be converted
pub fn process_with<T: Member + ?Sized>(target: &mut T, args: &Args) -> Result<(), Error> {
    let not_record = || Error::NotRecord {
        type_name: std::any::type_name::<T>(),
    };

    // Checked before `node()`, which may allocate `Option` storage
    if !target.is_record() {
        return Err(not_record());
    }
    let Node::Record(record) = target.node() else {
        return Err(not_record());
    };

    let mut descriptors = flatten(record)?;

    let mut pending = Vec::with_capacity(descriptors.len());
    for (index, descriptor) in descriptors.iter().enumerate() {
        if let Some(prepared) = descriptor.prepare(args)? {
            pending.push((index, prepared));
        }
    }

    for (index, prepared) in pending {
        let descriptor = &mut descriptors[index];
        let source = prepared.resolved.source;
        descriptor.commit(prepared)?;
        debug!(field = %descriptor.path(), %source, "bound field");
    }

    Ok(())
}
