//! 바이트 분석기 -- 엔트로피 및 매직 바이트 검증
//!
//! 이미 읽어 들인 버퍼에 대한 순수 계산만 수행합니다.
//! 파일 I/O 실패는 호출자가 처리합니다.
//!
//! - [`entropy`]: Shannon 엔트로피와 정보성 구간
//! - [`magic`]: 확장자별 매직 바이트 테이블

pub mod entropy;
pub mod magic;

pub use entropy::{EntropyBand, shannon_entropy};
pub use magic::MagicTable;

use crate::types::ByteProfile;

/// 텍스트 판별 시 NUL 바이트를 검사하는 앞부분 길이
const TEXT_SNIFF_LEN: usize = 8 * 1024;

/// 바이트 분석기
#[derive(Debug, Clone, Default)]
pub struct ByteAnalyzer {
    magic: MagicTable,
}

impl ByteAnalyzer {
    /// 지정한 매직 테이블로 분석기를 생성합니다.
    pub fn new(magic: MagicTable) -> Self {
        Self { magic }
    }

    /// 버퍼의 바이트 프로파일을 계산합니다.
    pub fn profile(&self, bytes: &[u8], claimed_extension: &str) -> ByteProfile {
        ByteProfile {
            entropy: shannon_entropy(bytes),
            magic_ok: self.magic.check(bytes, claimed_extension),
            size_bytes: bytes.len() as u64,
        }
    }

    /// 사용 중인 매직 테이블
    pub fn magic_table(&self) -> &MagicTable {
        &self.magic
    }
}

/// 버퍼를 텍스트로 취급할 수 있는지 판별합니다.
///
/// 앞 8 KiB 안에 NUL 바이트가 없으면 텍스트입니다. 잘못된 UTF-8 바이트는
/// 손실 디코딩으로 대체되므로 Latin-1 등이 섞인 로그도 텍스트로 분석됩니다.
pub fn looks_like_text(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(TEXT_SNIFF_LEN)];
    !head.contains(&0)
}
