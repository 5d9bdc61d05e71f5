//! File formats for scan lists.

pub mod mgf;

pub use mgf::{read_mgf, read_mgf_file, write_mgf, write_mgf_file, MgfError, MgfReader};
