//! 페이로드 코덱.
//!
//! 포맷된 줄이 임계값보다 길면 DEFLATE(zlib)로 압축하고,
//! 그렇지 않으면 UTF-8 바이트를 그대로 저장한다.

use flate2::read::{ZlibDecoder, ZlibEncoder};
use flate2::Compression;
use logkeep_core::error::CoreError;
use logkeep_core::models::log_record::PayloadEncoding;
use std::io::Read;

/// 압축 임계값 (문자 수) — 이 길이를 넘는 줄만 압축
pub const COMPRESSION_THRESHOLD: usize = 256;

/// 인코딩 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub bytes: Vec<u8>,
    pub encoding: PayloadEncoding,
}

/// 압축 정책에 따라 한 줄을 인코딩
pub fn encode_line(line: &str) -> Result<EncodedPayload, CoreError> {
    if line.chars().count() > COMPRESSION_THRESHOLD {
        let mut encoder = ZlibEncoder::new(line.as_bytes(), Compression::default());
        let mut compressed = Vec::new();
        encoder
            .read_to_end(&mut compressed)
            .map_err(|e| CoreError::Codec(format!("deflate 압축 실패: {e}")))?;
        Ok(EncodedPayload {
            bytes: compressed,
            encoding: PayloadEncoding::Deflate,
        })
    } else {
        Ok(EncodedPayload {
            bytes: line.as_bytes().to_vec(),
            encoding: PayloadEncoding::Raw,
        })
    }
}

/// 저장된 인코딩 태그에 따라 원래 줄로 복원
pub fn decode_payload(bytes: &[u8], encoding: PayloadEncoding) -> Result<String, CoreError> {
    let raw = match encoding {
        PayloadEncoding::Raw => bytes.to_vec(),
        PayloadEncoding::Deflate => {
            let mut decoder = ZlibDecoder::new(bytes);
            let mut decompressed = Vec::new();
            decoder
                .read_to_end(&mut decompressed)
                .map_err(|e| CoreError::Codec(format!("deflate 해제 실패: {e}")))?;
            decompressed
        }
    };
    String::from_utf8(raw).map_err(|e| CoreError::Codec(format!("UTF-8 디코딩 실패: {e}")))
}
