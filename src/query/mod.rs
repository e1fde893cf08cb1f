pub mod classify;
pub mod prefix;

pub use classify::{classify, SearchRequest};
pub use prefix::{PrefixTable, SearchKind};
