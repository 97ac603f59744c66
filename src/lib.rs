//! Uniform filesystem view over heterogeneous storage.
//!
//! `unifs` exposes one filesystem-like API whatever the medium behind
//! it:
//!
//! - **Local disk**, where directories are real and visibility maps to
//!   file mode bits.
//! - **Flat-namespace object stores** (S3, GCS, in-memory) reached
//!   through the `object_store` crate, where directories are emulated
//!   from key segments and delimiter listings.
//!
//! Operations take logical `/`-separated paths relative to a configured
//! root prefix and answer with canonical [`Entry`] values whose shape
//! does not depend on the medium.
//!
//! ```no_run
//! use unifs::{Filesystem, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let fs = Filesystem::memory();
//!     fs.write("docs/hello.txt", "hello").await?;
//!     let entry = fs.read("docs/hello.txt").await?;
//!     assert_eq!(entry.size, Some(5));
//!     for entry in fs.list_contents("", true).await? {
//!         println!("{:?} {}", entry.kind, entry.path);
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod emulate;
pub mod entry;
pub mod error;
pub mod filesystem;
pub mod path;
pub mod response;

pub use backend::{Backend, LocalBackend, ObjectStoreBackend, PermissionMap};
pub use config::BackendConfig;
pub use emulate::emulate_directories;
pub use entry::{Entry, EntryKind, Visibility, WriteOptions};
pub use error::{Error, Result};
pub use filesystem::Filesystem;
pub use path::{dirname, pathinfo, PathInfo, PathPrefixer};
pub use response::RawResponse;
