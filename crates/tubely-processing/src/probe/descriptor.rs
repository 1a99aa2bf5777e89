use serde::Deserialize;

use super::aspect::{classify, AspectLabel};
use super::error::ProbeError;

/// Pixel dimensions of the stream chosen for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDescriptor {
    pub width: u32,
    pub height: u32,
}

impl StreamDescriptor {
    pub fn aspect(&self) -> Result<AspectLabel, ProbeError> {
        classify(self.width, self.height)
    }
}

// Every field is optional so that explicit `null` decodes like an absent key.
#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Option<Vec<ProbeStream>>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    codec_type: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

/// Decode `ffprobe -print_format json -show_streams` output.
///
/// Audio and data streams carry no dimensions, so the first stream that
/// declares `codec_type: "video"` wins. Output without any codec types falls
/// back to the first stream listed.
pub fn parse_stream_descriptor(raw: &[u8]) -> Result<StreamDescriptor, ProbeError> {
    let output: ProbeOutput = serde_json::from_slice(raw).map_err(ProbeError::Decode)?;

    let streams = output.streams.unwrap_or_default();

    let stream = streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .or_else(|| streams.first())
        .ok_or(ProbeError::NoStream)?;

    let width = stream.width.unwrap_or_default();
    let height = stream.height.unwrap_or_default();
    if width == 0 || height == 0 {
        return Err(ProbeError::DegenerateDimensions { width, height });
    }

    Ok(StreamDescriptor { width, height })
}
