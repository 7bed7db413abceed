use crate::error::TranslateError;

/// Decode a 16-bit PCM WAV buffer into (sample_rate, samples).
///
/// Only what the translation collaborator actually sends: RIFF/WAVE,
/// PCM format, 16 bits per sample. Chunks other than `fmt ` and `data`
/// are skipped.
pub fn decode_wav_pcm16(bytes: &[u8]) -> Result<(u32, Vec<i16>), TranslateError> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(TranslateError::BadAudio("not a RIFF/WAVE buffer".into()));
    }

    let mut sample_rate: Option<u32> = None;
    let mut data: Option<&[u8]> = None;

    let mut pos = 12;
    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let size = u32::from_le_bytes([
            bytes[pos + 4],
            bytes[pos + 5],
            bytes[pos + 6],
            bytes[pos + 7],
        ]) as usize;
        let body_start = pos + 8;
        let body_end = body_start + size;
        if body_end > bytes.len() {
            return Err(TranslateError::BadAudio("truncated chunk".into()));
        }
        let body = &bytes[body_start..body_end];

        match id {
            b"fmt " => {
                if body.len() < 16 {
                    return Err(TranslateError::BadAudio("short fmt chunk".into()));
                }
                let format = u16::from_le_bytes([body[0], body[1]]);
                let bits = u16::from_le_bytes([body[14], body[15]]);
                if format != 1 {
                    return Err(TranslateError::BadAudio(format!(
                        "unsupported wav format {format}"
                    )));
                }
                if bits != 16 {
                    return Err(TranslateError::BadAudio(format!(
                        "unsupported bit depth {bits}"
                    )));
                }
                sample_rate = Some(u32::from_le_bytes([body[4], body[5], body[6], body[7]]));
            }
            b"data" => data = Some(body),
            _ => {}
        }

        // Chunks are word-aligned.
        pos = body_end + (size & 1);
    }

    let sample_rate =
        sample_rate.ok_or_else(|| TranslateError::BadAudio("missing fmt chunk".into()))?;
    let data = data.ok_or_else(|| TranslateError::BadAudio("missing data chunk".into()))?;

    let samples = data
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect();
    Ok((sample_rate, samples))
}
