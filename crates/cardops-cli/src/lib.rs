//! Library parts of the `cardops` command line tool.

pub mod logging;
pub mod settings;
