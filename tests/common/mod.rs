//! Common test infrastructure
//!
//! Every test gets its own data directory with the shipped item templates
//! and an empty store, and drives the `signage-import` binary against it.
//!
//! ```no_run
//! mod common;
//! use common::{TestEnv, PNG_BYTES};
//!
//! #[test]
//! fn test_import_png() {
//!     let env = TestEnv::new();
//!     let file = env.write_file("a.png", PNG_BYTES);
//!     env.cmd().arg(&file).assert().success();
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::TestEnv;
