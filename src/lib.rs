#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use vc_json as json;
pub use vc_reflect as reflect;
pub use vc_utils as utils;

pub use vc_json::{DeserializeSettings, Error, Result, SerializeSettings, Value};
pub use vc_json::{from_canonical, from_canonical_as, parse, to_object, to_typed};
pub use vc_json::{to_canonical, to_canonical_with, to_json_string, to_json_string_with};
