pub use self::attributes::{Attribute, AttributeScanner, Quote};
pub use self::engine::TagFilter;
pub(crate) use self::engine::filter_with;
pub use self::policy::{AllowPolicy, AttributeList, PolicyConfig, TagSpec, DATA_WILDCARD};
pub use self::scanner::{Scanner, Segment};
pub use self::tag::{ParsedTag, TagEnd, TagStart};

mod attributes;
mod charclass;
mod engine;
mod policy;
mod scanner;
mod tag;
