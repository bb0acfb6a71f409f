//! 매직 바이트 테이블
//!
//! 확장자별로 파일이 반드시 가져야 하는 선행 바이트 시퀀스를 보관합니다.
//! 항목은 hex 문자열로 선언하고 생성 시 한 번만 디코딩합니다.

use std::collections::HashMap;

use crate::error::ForensicError;

/// 기본 매직 바이트 테이블 (확장자, hex 접두사)
pub const DEFAULT_MAGIC: &[(&str, &str)] = &[
    (".jpg", "FFD8"),
    (".jpeg", "FFD8"),
    (".png", "89504E47"),
    (".gif", "47494638"),
    (".pdf", "25504446"),
    (".exe", "4D5A"),
    (".zip", "504B0304"),
];

/// 확장자 -> 필수 접두사 바이트 테이블
#[derive(Debug, Clone)]
pub struct MagicTable {
    entries: HashMap<String, Vec<u8>>,
}

impl MagicTable {
    /// (확장자, hex 접두사) 목록으로 테이블을 생성합니다.
    ///
    /// hex는 대소문자를 구분하지 않습니다.
    ///
    /// # Errors
    /// - hex 문자열이 비어있거나 유효하지 않은 경우
    pub fn new<'a>(
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ForensicError> {
        let mut table = HashMap::new();
        for (ext, prefix_hex) in entries {
            let ext = normalize_extension(ext);
            let prefix = hex::decode(prefix_hex.trim()).map_err(|e| ForensicError::Config {
                field: format!("magic_table[{ext}]"),
                reason: format!("invalid hex prefix '{prefix_hex}': {e}"),
            })?;
            if prefix.is_empty() {
                return Err(ForensicError::Config {
                    field: format!("magic_table[{ext}]"),
                    reason: "prefix must not be empty".to_owned(),
                });
            }
            table.insert(ext, prefix);
        }
        Ok(Self { entries: table })
    }

    /// 확장자에 해당하는 필수 접두사를 반환합니다.
    pub fn prefix_for(&self, extension: &str) -> Option<&[u8]> {
        self.entries
            .get(&normalize_extension(extension))
            .map(Vec::as_slice)
    }

    /// 버퍼가 주장된 확장자의 매직 바이트와 일치하는지 확인합니다.
    ///
    /// 테이블에 없는 확장자는 판단하지 않으므로 `true`를 반환합니다.
    pub fn check(&self, bytes: &[u8], extension: &str) -> bool {
        match self.prefix_for(extension) {
            Some(prefix) => bytes.starts_with(prefix),
            None => true,
        }
    }

    /// 등록된 확장자 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 테이블이 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MagicTable {
    fn default() -> Self {
        let entries = DEFAULT_MAGIC
            .iter()
            .filter_map(|(ext, prefix_hex)| {
                hex::decode(prefix_hex)
                    .ok()
                    .map(|prefix| ((*ext).to_owned(), prefix))
            })
            .collect();
        Self { entries }
    }
}

/// 확장자를 소문자, 점 포함 형식으로 정규화합니다 (`PNG` -> `.png`).
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.is_empty() || ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_all_entries() {
        let table = MagicTable::default();
        assert_eq!(table.len(), DEFAULT_MAGIC.len());
        assert_eq!(table.prefix_for(".png"), Some(&[0x89, 0x50, 0x4E, 0x47][..]));
    }

    #[test]
    fn png_with_wrong_header_fails() {
        let table = MagicTable::default();
        assert!(!table.check(b"GIF89a....", ".png"));
        assert!(table.check(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A], ".png"));
    }

    #[test]
    fn unknown_extension_has_no_opinion() {
        let table = MagicTable::default();
        assert!(table.check(b"anything at all", ".log"));
        assert!(table.check(b"", ".txt"));
        assert!(table.check(b"\x00\x01", ""));
    }

    #[test]
    fn extension_lookup_is_normalized() {
        let table = MagicTable::default();
        assert!(table.check(b"%PDF-1.7", "PDF"));
        assert!(!table.check(b"hello", ".PDF"));
        assert!(table.check(&[0xFF, 0xD8, 0xFF], "jpeg"));
    }

    #[test]
    fn short_buffer_fails_known_extension() {
        let table = MagicTable::default();
        assert!(!table.check(b"PK", ".zip"));
        assert!(!table.check(b"", ".exe"));
    }

    #[test]
    fn custom_table_accepts_lowercase_hex() {
        let table = MagicTable::new([("elf", "7f454c46")]).unwrap();
        assert!(table.check(b"\x7fELF\x02", ".elf"));
        assert!(table.check(b"MZ", ".exe")); // 기본 항목 없음
    }

    #[test]
    fn custom_table_rejects_invalid_hex() {
        let err = MagicTable::new([(".bin", "ZZ")]).unwrap_err();
        assert!(matches!(err, ForensicError::Config { .. }));
    }

    #[test]
    fn custom_table_rejects_empty_prefix() {
        assert!(MagicTable::new([(".bin", "")]).is_err());
    }
}
