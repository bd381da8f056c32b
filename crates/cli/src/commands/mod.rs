//! Command implementations, one module per subcommand.

pub mod download;
pub mod extensions;
pub mod fix_refs;
pub mod jobs;
pub mod list;
pub mod render;
pub mod upload;
