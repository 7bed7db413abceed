//! Small PCM helpers shared by both segmentation paths.

/// Clamp a float sample to [-1, 1] and quantize to signed 16-bit.
/// Asymmetric scaling keeps -1.0 at exactly i16::MIN.
pub fn quantize(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 0x8000 as f32) as i16
    } else {
        (s * 0x7fff as f32) as i16
    }
}

/// Root-mean-square energy of a float block, on the [0, 1] scale.
pub fn rms(block: &[f32]) -> f32 {
    if block.is_empty() {
        return 0.0;
    }
    let sum: f32 = block.iter().map(|s| s * s).sum();
    (sum / block.len() as f32).sqrt()
}

/// Naive decimating down-sampler: picks every `in_rate / out_rate`-th
/// sample. Good enough for speech going to a recognizer; pass-through
/// when the rates already match.
pub fn downsample(input: &[f32], in_rate: u32, out_rate: u32) -> Vec<f32> {
    if in_rate == out_rate {
        return input.to_vec();
    }
    let factor = in_rate as f64 / out_rate as f64;
    let out_len = (input.len() as f64 / factor).round() as usize;
    let mut out = Vec::with_capacity(out_len);
    let mut idx = 0.0f64;
    for _ in 0..out_len {
        let i = idx as usize;
        if i >= input.len() {
            break;
        }
        out.push(input[i]);
        idx += factor;
    }
    out
}
