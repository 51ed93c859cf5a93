pub mod manifest;

pub use manifest::{GenerateManifestRequest, GenerateManifestResponse};
