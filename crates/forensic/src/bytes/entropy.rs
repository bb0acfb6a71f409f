//! Shannon 엔트로피 계산
//!
//! 바이트 값의 예측 불가능성을 bits/byte 단위로 측정합니다.
//! 일반 텍스트는 낮고, 압축/암호화된 데이터는 8.0에 가깝습니다.

/// 이 값 미만은 평문/구조화된 데이터로 봅니다.
pub const ENTROPY_PLAIN_MAX: f64 = 5.0;

/// 이 값을 초과하면 패킹/암호화된 데이터로 봅니다.
pub const ENTROPY_PACKED_MIN: f64 = 7.5;

/// 바이트 버퍼의 최대 엔트로피
pub const ENTROPY_MAX: f64 = 8.0;

/// 엔트로피 구간 (정보성 분류)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropyBand {
    /// 평문 또는 구조화된 데이터
    Plain,
    /// 일반 바이너리
    Binary,
    /// 패킹/암호화 의심
    Packed,
}

impl EntropyBand {
    /// 엔트로피 값을 구간으로 분류합니다.
    pub fn classify(entropy: f64) -> Self {
        if entropy < ENTROPY_PLAIN_MAX {
            Self::Plain
        } else if entropy > ENTROPY_PACKED_MIN {
            Self::Packed
        } else {
            Self::Binary
        }
    }
}

/// 버퍼 전체의 Shannon 엔트로피를 계산합니다.
///
/// 빈 버퍼는 0.0을 반환합니다. 결과는 항상 `[0.0, 8.0]` 범위입니다.
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut counts = [0u64; 256];
    for &byte in data {
        counts[byte as usize] += 1;
    }

    let len = data.len() as f64;
    let entropy: f64 = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / len;
            -p * p.log2()
        })
        .sum();

    // 부동소수점 오차로 범위를 벗어나지 않도록 고정
    entropy.clamp(0.0, ENTROPY_MAX)
}
