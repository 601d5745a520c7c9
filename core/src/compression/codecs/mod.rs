pub mod gzip_base64;

pub use gzip_base64::*;
