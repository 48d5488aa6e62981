//! Text formats for Five9 domain configuration: campaign profile filter
//! expressions and IVR script definitions.

pub mod filter;
pub mod ivr;

pub use filter::{
    FilterError, demystify, demystify_filter, flatten, prettify, remystify, remystify_filter,
};
pub use ivr::{IvrError, IvrFunction, extract_functions, variable_usage};
