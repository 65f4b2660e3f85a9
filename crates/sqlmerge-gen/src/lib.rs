//! Merge statement generation for sqlmerge.
//!
//! Turns a source (staging) table description and a target table
//! description into an ordered list of reconciliation operations:
//!
//! 1. **Delete** target rows whose join key is absent from the source
//! 2. **Update** target rows matched by the join key
//! 3. **Insert** source rows whose join key is absent from the target
//!
//! Column roles decide participation: `TrackInsert` columns receive the
//! current timestamp on insert only, `TrackUpdate` columns on update only.
//!
//! ```
//! use sqlmerge_core::{Column, SqlType, TableSchema};
//! use sqlmerge_gen::{MergeKind, generate};
//!
//! let target = TableSchema::new("country")
//!     .column(Column::new("code", SqlType::Char(2)).primary_key())
//!     .column(Column::new("name", SqlType::Text));
//! let source = TableSchema::new("country")
//!     .namespace("staging")
//!     .column(Column::new("code", SqlType::Char(2)))
//!     .column(Column::new("name", SqlType::Text));
//!
//! let ops = generate(&source, &target, None).unwrap();
//! let kinds: Vec<_> = ops.iter().map(|op| op.kind).collect();
//! assert_eq!(kinds, [MergeKind::Delete, MergeKind::Update, MergeKind::Insert]);
//! ```

pub mod config;
pub mod generate;
pub mod operation;
pub mod role;

pub use config::MergeConfig;
pub use generate::{MergeGenerator, SOURCE_ALIAS, TARGET_ALIAS, generate, resolve_join_columns};
pub use operation::{MergeKind, MergeOperation};
