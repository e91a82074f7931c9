//! HTTP protocol helpers shared by the file handler and middleware.
//!
//! Everything here is independent of the route table: content types,
//! conditional-request support, range parsing, and response builders.

pub mod etag;
pub mod mime;
pub mod range;
pub mod response;

pub use range::{parse as parse_range, ByteRange, RangeOutcome};
pub use response::{
    full_entity, html_page, moved_permanently, not_found, not_modified, partial_entity,
    range_not_satisfiable,
};
