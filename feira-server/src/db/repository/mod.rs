//! Repository Module
//!
//! Read-modify-write access to the two content documents. Each repository
//! holds a mutex for the whole load → mutate → save cycle, so writers on one
//! file never interleave.

pub mod gallery;
pub mod home;

pub use gallery::GalleryRepository;
pub use home::HomeRepository;
