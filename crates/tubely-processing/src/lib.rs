//! Tubely media processing
//!
//! Runs the external probe against uploaded files, decodes its stream listing
//! and classifies the video's aspect ratio. Upload validation lives here too
//! since it is shared by the thumbnail and video handlers.

pub mod probe;
pub mod validator;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use probe::{
    classify, classify_aspect, classify_ratio, parse_stream_descriptor, probe_descriptor,
    AspectLabel, ExecutionError, FfprobeProber, MediaProber, ProbeError, StreamDescriptor,
};
pub use validator::{normalize_content_type, MediaValidator, ValidationError};
