//! Storage layer for FinTrack
//!
//! JSON file storage with atomic writes: one records blob per identity and
//! one profile file per identity.

pub mod file_io;
pub mod profile;
pub mod records;

pub use file_io::{read_json, write_bytes_atomic, write_json_atomic};
pub use profile::ProfileRepository;
pub use records::RecordsRepository;
