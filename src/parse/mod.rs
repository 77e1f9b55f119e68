//! Hand-written readers for the JSON and XML subsets accepted by
//! [`StructuredSource`](crate::sources::StructuredSource).

mod cursor;
mod json;
mod xml;

pub use json::parse_json;
pub use xml::parse_xml;
