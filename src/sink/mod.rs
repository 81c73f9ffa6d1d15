//! Property sinks for buildprop.
//!
//! This module handles:
//! - The key/value store contract resolved values are written into
//! - The overwrite-or-preserve policy
//! - A `key=value` properties file implementation

pub mod properties;

pub use properties::{PropertyMap, format_entry};

use crate::error::{BuildPropError, Result};
use tracing::debug;

/// A key/value store receiving resolved property values.
pub trait PropertySink {
	/// Current value of a property.
	fn get(&self, name: &str) -> Option<&str>;

	/// Set a property, replacing any existing value.
	fn set_always(&mut self, name: &str, value: &str);

	/// Set a property only when it has no value yet.
	fn set_if_absent(&mut self, name: &str, value: &str) {
		if self.get(name).is_none() {
			self.set_always(name, value);
		}
	}
}

/// What [`define_property`] did to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
	/// The value was written.
	Written,
	/// An existing value was kept because overwriting is disabled.
	Preserved { existing: String },
}

/// Write `value` under `name`, honoring the overwrite policy.
///
/// A missing value is written as the empty string.
pub fn define_property(
	sink: &mut dyn PropertySink,
	name: &str,
	value: Option<&str>,
	overwrite: bool,
) -> Result<Definition> {
	if name.trim().is_empty() {
		return Err(BuildPropError::PropertyBlank);
	}

	let value = value.unwrap_or("");
	debug!("Define property {name} = \"{value}\"");

	if overwrite {
		sink.set_always(name, value);
		return Ok(Definition::Written);
	}

	match sink.get(name) {
		Some(existing) => Ok(Definition::Preserved {
			existing: existing.to_string(),
		}),
		None => {
			sink.set_if_absent(name, value);
			Ok(Definition::Written)
		}
	}
}
