//! Library components of the `dhis2-utils` command line tool.

pub mod logging;
pub mod output;
