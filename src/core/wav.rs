//! Wrap raw PCM audio (as returned by TTS endpoints) in a WAV container.

/// Size of the canonical RIFF/WAVE header written by [`pcm_to_wav`].
pub const WAV_HEADER_LEN: usize = 44;

/// Raw PCM layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl Default for PcmFormat {
    /// 24 kHz mono 16-bit, the TTS provider's output format.
    fn default() -> Self {
        Self {
            sample_rate: 24_000,
            channels: 1,
            bits_per_sample: 16,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WavError {
    #[error("PCM data too large for a WAV file ({0} bytes)")]
    TooLarge(usize),
    #[error("Unsupported sample width: {0} bits (expected 8, 16, 24 or 32)")]
    UnsupportedBits(u16),
    #[error("Invalid PCM format: {0}")]
    InvalidFormat(String),
    #[error("Unrecognized PCM mime type: {0}")]
    Mime(String),
}

impl PcmFormat {
    /// Parse a mime type such as `audio/L16;codec=pcm;rate=24000`.
    /// Missing parameters fall back to [`PcmFormat::default`].
    pub fn from_mime(mime: &str) -> Result<Self, WavError> {
        let bad = || WavError::Mime(mime.to_string());
        let mut parts = mime.split(';').map(str::trim);
        let essence = parts.next().unwrap_or_default().to_ascii_lowercase();
        let subtype = essence.strip_prefix("audio/").ok_or_else(bad)?;

        let mut format = PcmFormat::default();
        if let Some(bits) = subtype.strip_prefix('l') {
            format.bits_per_sample = bits.parse().map_err(|_| bad())?;
        } else if subtype != "pcm" {
            return Err(bad());
        }

        for param in parts.filter(|p| !p.is_empty()) {
            let Some((key, value)) = param.split_once('=') else {
                return Err(bad());
            };
            match key.trim().to_ascii_lowercase().as_str() {
                "rate" => format.sample_rate = value.trim().parse().map_err(|_| bad())?,
                "channels" => format.channels = value.trim().parse().map_err(|_| bad())?,
                _ => {}
            }
        }
        Ok(format)
    }

    fn validate(&self) -> Result<(), WavError> {
        if !matches!(self.bits_per_sample, 8 | 16 | 24 | 32) {
            return Err(WavError::UnsupportedBits(self.bits_per_sample));
        }
        if self.channels == 0 {
            return Err(WavError::InvalidFormat("channel count must be positive".into()));
        }
        if self.sample_rate == 0 {
            return Err(WavError::InvalidFormat("sample rate must be positive".into()));
        }
        Ok(())
    }

    /// Bytes per sample frame; `None` if it does not fit the header's u16 field.
    fn block_align(&self) -> Option<u16> {
        self.channels.checked_mul(self.bits_per_sample / 8)
    }

    fn byte_rate(&self) -> Option<u32> {
        self.block_align()
            .and_then(|align| self.sample_rate.checked_mul(u32::from(align)))
    }

    /// Playback length of `pcm_len` bytes in this format.
    pub fn duration_secs(&self, pcm_len: usize) -> f64 {
        match self.byte_rate() {
            Some(rate) if rate > 0 => pcm_len as f64 / f64::from(rate),
            _ => 0.0,
        }
    }
}

/// Prefix `pcm` with a 44-byte RIFF/WAVE header describing `format`.
pub fn pcm_to_wav(pcm: &[u8], format: PcmFormat) -> Result<Vec<u8>, WavError> {
    format.validate()?;
    let block_align = format
        .block_align()
        .ok_or_else(|| WavError::InvalidFormat("block align overflows u16".into()))?;
    let byte_rate = format
        .byte_rate()
        .ok_or_else(|| WavError::InvalidFormat("byte rate overflows u32".into()))?;
    let data_size = u32::try_from(pcm.len())
        .ok()
        .filter(|len| len.checked_add(36).is_some())
        .ok_or(WavError::TooLarge(pcm.len()))?;

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + pcm.len());

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&format.channels.to_le_bytes());
    wav.extend_from_slice(&format.sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&format.bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.extend_from_slice(pcm);

    Ok(wav)
}
