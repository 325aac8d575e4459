#![deny(missing_docs)]
#![doc = "Shared building blocks for the crunch CRDT benchmark tooling: errors, slugs and canonical serialization."]

pub mod errors;
pub mod hash;
pub mod serde;
pub mod slug;

pub use errors::{CrunchError, ErrorInfo};
pub use hash::{content_digest, stable_hash_string};
pub use serde::{from_json_slice, from_yaml_slice, to_canonical_json_bytes, to_pretty_json_bytes};
pub use slug::{order_file_name, slugify, slugify_filename};
