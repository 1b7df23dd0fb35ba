//! Content engines
//!
//! Pure transformations of the home document and the gallery list. Nothing in
//! here touches the filesystem; callers load, transform, save and then clean
//! up media.
//!
//! | Module      | Role |
//! |-------------|------|
//! | `field`     | decoded update input (three-way field presence, stored files) |
//! | `merge`     | home document merge rules |
//! | `sectors`   | exhibitor sector removals |
//! | `galleries` | gallery list mutations and self-healing |
//! | `dates`     | schedule date and countdown normalization |
//! | `view`      | read-side display defaults |

pub mod dates;
pub mod field;
pub mod galleries;
pub mod merge;
pub mod sectors;
pub mod view;

pub use field::{FieldValue, FormFields, HomeUpdate, UploadedFile};
pub use galleries::GalleryLookup;
