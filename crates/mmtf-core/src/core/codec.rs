//! Decoders for the MMTF binary array encoding strategies.
//!
//! An encoded column starts with a 12-byte big-endian header (encoding
//! strategy id, declared element count, strategy parameter) followed by the
//! payload. Strategies compose primitive transforms: run-length expansion,
//! delta (cumulative sum) reconstruction, recursive-index accumulation and
//! fixed-point division, on top of raw big-endian integer or float payloads.

use thiserror::Error;

/// The number of header bytes preceding every encoded column payload.
pub const HEADER_LEN: usize = 12;

/// A fully decoded column, as one of the three value families the format
/// can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedArray {
    Ints(Vec<i32>),
    Floats(Vec<f32>),
    Strings(Vec<String>),
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("column is {0} bytes, shorter than the 12-byte header")]
    MissingHeader(usize),
    #[error("unknown encoding strategy {0}")]
    UnknownStrategy(i32),
    #[error("declared element count {0} is negative")]
    NegativeCount(i32),
    #[error("payload length {len} is not a multiple of {width} bytes")]
    RaggedPayload { len: usize, width: usize },
    #[error("run-length payload is not a sequence of (value, count) pairs")]
    UnpairedRunLength,
    #[error("run-length repeat count {0} is negative")]
    NegativeRunLength(i32),
    #[error("fixed-point divisor must be non-zero")]
    ZeroDivisor,
    #[error("string width {0} must be positive")]
    BadStringWidth(i32),
    #[error("payload is not a valid character (code {0})")]
    InvalidChar(i32),
    #[error("fixed-width string payload is not valid UTF-8")]
    InvalidUtf8,
    #[error("decoded {decoded} elements, header declared {declared}")]
    LengthMismatch { declared: usize, decoded: usize },
}

/// Decodes one encoded column into a flat typed array.
///
/// # Arguments
///
/// * `column` - The full encoded column, header included.
///
/// # Errors
///
/// Returns a [`CodecError`] if the header is truncated, the strategy id is
/// unknown, the payload is malformed, or the decoded element count does not
/// match the count declared in the header.
pub fn decode_column(column: &[u8]) -> Result<DecodedArray, CodecError> {
    if column.len() < HEADER_LEN {
        return Err(CodecError::MissingHeader(column.len()));
    }
    let strategy = read_header_i32(column, 0);
    let declared = read_header_i32(column, 4);
    let param = read_header_i32(column, 8);
    if declared < 0 {
        return Err(CodecError::NegativeCount(declared));
    }
    let declared = declared as usize;
    let payload = &column[HEADER_LEN..];

    let decoded = match strategy {
        1 => DecodedArray::Floats(read_f32s(payload)?),
        2 => DecodedArray::Ints(read_i8s(payload)),
        3 => DecodedArray::Ints(read_i16s(payload)?),
        4 => DecodedArray::Ints(read_i32s(payload)?),
        5 => DecodedArray::Strings(fixed_width_strings(payload, param)?),
        6 => DecodedArray::Strings(chars_from_codes(&run_length(&read_i32s(payload)?)?)?),
        7 => DecodedArray::Ints(run_length(&read_i32s(payload)?)?),
        8 => DecodedArray::Ints(delta(run_length(&read_i32s(payload)?)?)),
        9 => DecodedArray::Floats(fixed_point(&run_length(&read_i32s(payload)?)?, param)?),
        10 => {
            let unpacked = recursive_index(&read_i16s(payload)?, i16::MIN as i32, i16::MAX as i32);
            DecodedArray::Floats(fixed_point(&delta(unpacked), param)?)
        }
        11 => DecodedArray::Floats(fixed_point(&read_i16s(payload)?, param)?),
        12 => {
            let unpacked = recursive_index(&read_i16s(payload)?, i16::MIN as i32, i16::MAX as i32);
            DecodedArray::Floats(fixed_point(&unpacked, param)?)
        }
        13 => {
            let unpacked = recursive_index(&read_i8s(payload), i8::MIN as i32, i8::MAX as i32);
            DecodedArray::Floats(fixed_point(&unpacked, param)?)
        }
        14 => DecodedArray::Ints(recursive_index(
            &read_i16s(payload)?,
            i16::MIN as i32,
            i16::MAX as i32,
        )),
        15 => DecodedArray::Ints(recursive_index(
            &read_i8s(payload),
            i8::MIN as i32,
            i8::MAX as i32,
        )),
        other => return Err(CodecError::UnknownStrategy(other)),
    };

    let len = decoded.len();
    if len != declared {
        return Err(CodecError::LengthMismatch {
            declared,
            decoded: len,
        });
    }
    Ok(decoded)
}

impl DecodedArray {
    pub fn len(&self) -> usize {
        match self {
            DecodedArray::Ints(v) => v.len(),
            DecodedArray::Floats(v) => v.len(),
            DecodedArray::Strings(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn read_header_i32(column: &[u8], offset: usize) -> i32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&column[offset..offset + 4]);
    i32::from_be_bytes(buf)
}

fn read_i32s(payload: &[u8]) -> Result<Vec<i32>, CodecError> {
    if payload.len() % 4 != 0 {
        return Err(CodecError::RaggedPayload {
            len: payload.len(),
            width: 4,
        });
    }
    Ok(payload
        .chunks_exact(4)
        .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn read_i16s(payload: &[u8]) -> Result<Vec<i32>, CodecError> {
    if payload.len() % 2 != 0 {
        return Err(CodecError::RaggedPayload {
            len: payload.len(),
            width: 2,
        });
    }
    Ok(payload
        .chunks_exact(2)
        .map(|c| i16::from_be_bytes([c[0], c[1]]) as i32)
        .collect())
}

fn read_i8s(payload: &[u8]) -> Vec<i32> {
    payload.iter().map(|&b| b as i8 as i32).collect()
}

fn read_f32s(payload: &[u8]) -> Result<Vec<f32>, CodecError> {
    if payload.len() % 4 != 0 {
        return Err(CodecError::RaggedPayload {
            len: payload.len(),
            width: 4,
        });
    }
    Ok(payload
        .chunks_exact(4)
        .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Expands (value, repeat) pairs into a flat array.
fn run_length(pairs: &[i32]) -> Result<Vec<i32>, CodecError> {
    if pairs.len() % 2 != 0 {
        return Err(CodecError::UnpairedRunLength);
    }
    let mut out = Vec::new();
    for pair in pairs.chunks_exact(2) {
        let (value, count) = (pair[0], pair[1]);
        if count < 0 {
            return Err(CodecError::NegativeRunLength(count));
        }
        out.extend(std::iter::repeat_n(value, count as usize));
    }
    Ok(out)
}

/// Reconstructs absolute values from consecutive differences.
fn delta(mut values: Vec<i32>) -> Vec<i32> {
    let mut acc: i32 = 0;
    for v in values.iter_mut() {
        acc = acc.wrapping_add(*v);
        *v = acc;
    }
    values
}

/// Accumulates runs of extreme values: each output element is the sum of
/// consecutive inputs up to and including the first value that is neither
/// `min` nor `max` of the packed integer type.
fn recursive_index(values: &[i32], min: i32, max: i32) -> Vec<i32> {
    let mut out = Vec::new();
    let mut acc: i64 = 0;
    for &v in values {
        acc += v as i64;
        if v != min && v != max {
            out.push(acc as i32);
            acc = 0;
        }
    }
    out
}

fn fixed_point(values: &[i32], divisor: i32) -> Result<Vec<f32>, CodecError> {
    if divisor == 0 {
        return Err(CodecError::ZeroDivisor);
    }
    let divisor = divisor as f32;
    Ok(values.iter().map(|&v| v as f32 / divisor).collect())
}

/// Maps character codes to single-character strings; code 0 denotes an
/// absent value and becomes the empty string.
fn chars_from_codes(codes: &[i32]) -> Result<Vec<String>, CodecError> {
    codes
        .iter()
        .map(|&code| {
            if code == 0 {
                return Ok(String::new());
            }
            u32::try_from(code)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .ok_or(CodecError::InvalidChar(code))
        })
        .collect()
}

/// Splits a byte payload into `width`-sized strings, stripping NUL padding.
fn fixed_width_strings(payload: &[u8], width: i32) -> Result<Vec<String>, CodecError> {
    if width <= 0 {
        return Err(CodecError::BadStringWidth(width));
    }
    let width = width as usize;
    if payload.len() % width != 0 {
        return Err(CodecError::RaggedPayload {
            len: payload.len(),
            width,
        });
    }
    payload
        .chunks_exact(width)
        .map(|chunk| {
            std::str::from_utf8(chunk)
                .map(|s| s.trim_end_matches('\0').to_string())
                .map_err(|_| CodecError::InvalidUtf8)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(strategy: i32, count: i32, param: i32, payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&strategy.to_be_bytes());
        bytes.extend_from_slice(&count.to_be_bytes());
        bytes.extend_from_slice(&param.to_be_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    fn i32_payload(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    fn i16_payload(values: &[i16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn pass_through_floats_decode_unchanged() {
        let payload: Vec<u8> = [1.0f32, -2.5, 3.25]
            .iter()
            .flat_map(|v| v.to_be_bytes())
            .collect();
        let decoded = decode_column(&column(1, 3, 0, &payload)).unwrap();
        assert_eq!(decoded, DecodedArray::Floats(vec![1.0, -2.5, 3.25]));
    }

    #[test]
    fn pass_through_int_widths_decode_unchanged() {
        let decoded = decode_column(&column(2, 3, 0, &[1, 0xFF, 0x80])).unwrap();
        assert_eq!(decoded, DecodedArray::Ints(vec![1, -1, -128]));

        let decoded = decode_column(&column(3, 2, 0, &i16_payload(&[300, -300]))).unwrap();
        assert_eq!(decoded, DecodedArray::Ints(vec![300, -300]));

        let decoded = decode_column(&column(4, 2, 0, &i32_payload(&[70000, -70000]))).unwrap();
        assert_eq!(decoded, DecodedArray::Ints(vec![70000, -70000]));
    }

    #[test]
    fn fixed_width_strings_strip_nul_padding() {
        let decoded = decode_column(&column(5, 2, 4, b"A\0\0\0BC\0\0")).unwrap();
        assert_eq!(
            decoded,
            DecodedArray::Strings(vec!["A".to_string(), "BC".to_string()])
        );
    }

    #[test]
    fn run_length_chars_expand_and_map_zero_to_empty() {
        let payload = i32_payload(&['A' as i32, 2, 0, 1]);
        let decoded = decode_column(&column(6, 3, 0, &payload)).unwrap();
        assert_eq!(
            decoded,
            DecodedArray::Strings(vec!["A".to_string(), "A".to_string(), String::new()])
        );
    }

    #[test]
    fn run_length_ints_expand_pairs() {
        let payload = i32_payload(&[1, 3, 7, 1]);
        let decoded = decode_column(&column(7, 4, 0, &payload)).unwrap();
        assert_eq!(decoded, DecodedArray::Ints(vec![1, 1, 1, 7]));
    }

    #[test]
    fn delta_composes_with_run_length() {
        // Run-length gives [10, 1, 1, 1]; cumulative sum gives [10, 11, 12, 13].
        let payload = i32_payload(&[10, 1, 1, 3]);
        let decoded = decode_column(&column(8, 4, 0, &payload)).unwrap();
        assert_eq!(decoded, DecodedArray::Ints(vec![10, 11, 12, 13]));
    }

    #[test]
    fn fixed_point_divides_by_header_parameter() {
        let payload = i32_payload(&[100, 2, -50, 1]);
        let decoded = decode_column(&column(9, 3, 100, &payload)).unwrap();
        assert_eq!(decoded, DecodedArray::Floats(vec![1.0, 1.0, -0.5]));
    }

    #[test]
    fn recursive_index_sums_runs_across_sentinels() {
        // i16::MAX keeps accumulating into the next element.
        let payload = i16_payload(&[i16::MAX, 100, -10, i16::MIN, -100]);
        let decoded = decode_column(&column(14, 3, 0, &payload)).unwrap();
        assert_eq!(
            decoded,
            DecodedArray::Ints(vec![i16::MAX as i32 + 100, -10, i16::MIN as i32 - 100])
        );
    }

    #[test]
    fn recursive_index_delta_fixed_point_decodes_coordinates() {
        // Fixed-point 1000 coordinates [0.0, 1.0, 2.0] stored as deltas.
        let payload = i16_payload(&[0, 1000, 1000]);
        let decoded = decode_column(&column(10, 3, 1000, &payload)).unwrap();
        assert_eq!(decoded, DecodedArray::Floats(vec![0.0, 1.0, 2.0]));
    }

    #[test]
    fn recursive_index_fixed_point_decodes_wide_values() {
        // i16::MAX + 233 = 33000, beyond i16 range; 500 stands alone.
        let payload = i16_payload(&[i16::MAX, 233, 500]);
        let decoded = decode_column(&column(12, 2, 1000, &payload)).unwrap();
        assert_eq!(decoded, DecodedArray::Floats(vec![33.0, 0.5]));
    }

    #[test]
    fn recursive_index_bytes_sum_runs_across_sentinels() {
        // 127 (i8::MAX) accumulates into 3; -128 (i8::MIN) into -2.
        let payload: Vec<u8> = [127i8, 3, -128, -2, 5]
            .iter()
            .map(|&v| v as u8)
            .collect();
        let decoded = decode_column(&column(15, 3, 0, &payload)).unwrap();
        assert_eq!(decoded, DecodedArray::Ints(vec![130, -130, 5]));
    }

    #[test]
    fn divide_strategies_decode_small_int_payloads() {
        let decoded = decode_column(&column(11, 2, 10, &i16_payload(&[15, -5]))).unwrap();
        assert_eq!(decoded, DecodedArray::Floats(vec![1.5, -0.5]));

        let decoded = decode_column(&column(13, 1, 10, &[25])).unwrap();
        assert_eq!(decoded, DecodedArray::Floats(vec![2.5]));
    }

    #[test]
    fn truncated_header_is_rejected() {
        assert!(matches!(
            decode_column(&[0, 0, 0, 7]),
            Err(CodecError::MissingHeader(4))
        ));
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        assert!(matches!(
            decode_column(&column(99, 0, 0, &[])),
            Err(CodecError::UnknownStrategy(99))
        ));
    }

    #[test]
    fn ragged_payload_is_rejected() {
        assert!(matches!(
            decode_column(&column(4, 1, 0, &[0, 0, 1])),
            Err(CodecError::RaggedPayload { len: 3, width: 4 })
        ));
    }

    #[test]
    fn odd_run_length_payload_is_rejected() {
        let payload = i32_payload(&[1, 2, 3]);
        assert!(matches!(
            decode_column(&column(7, 2, 0, &payload)),
            Err(CodecError::UnpairedRunLength)
        ));
    }

    #[test]
    fn negative_repeat_count_is_rejected() {
        let payload = i32_payload(&[1, -2]);
        assert!(matches!(
            decode_column(&column(7, 0, 0, &payload)),
            Err(CodecError::NegativeRunLength(-2))
        ));
    }

    #[test]
    fn declared_count_mismatch_is_rejected() {
        let payload = i32_payload(&[1, 3]);
        assert!(matches!(
            decode_column(&column(7, 2, 0, &payload)),
            Err(CodecError::LengthMismatch {
                declared: 2,
                decoded: 3
            })
        ));
    }

    #[test]
    fn zero_divisor_is_rejected() {
        assert!(matches!(
            decode_column(&column(11, 1, 0, &i16_payload(&[5]))),
            Err(CodecError::ZeroDivisor)
        ));
    }
}
