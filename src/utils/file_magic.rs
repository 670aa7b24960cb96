//! 附件内容签名校验
//!
//! 上传的第一个数据块必须与扩展名对应的魔术字节一致，
//! 纯文本类附件不做签名校验。

/// 扩展名对应的内容签名
enum Signature {
    /// 以任一前缀开头
    Prefix(&'static [&'static [u8]]),
    /// RIFF 容器，8..12 字节为子类型
    Riff(&'static [u8]),
    /// 纯文本，不校验
    Text,
}

fn signature_for(extension: &str) -> Option<Signature> {
    let sig = match extension {
        ".png" => Signature::Prefix(&[&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]]),
        ".jpg" | ".jpeg" => Signature::Prefix(&[&[0xFF, 0xD8, 0xFF]]),
        ".gif" => Signature::Prefix(&[b"GIF87a", b"GIF89a"]),
        ".webp" => Signature::Riff(b"WEBP"),
        ".pdf" => Signature::Prefix(&[b"%PDF"]),
        ".doc" | ".xls" | ".ppt" => {
            Signature::Prefix(&[&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]])
        }
        // OOXML 与 zip 同为 ZIP 容器
        ".docx" | ".xlsx" | ".pptx" | ".zip" => Signature::Prefix(&[&[0x50, 0x4B, 0x03, 0x04]]),
        ".7z" => Signature::Prefix(&[&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C]]),
        ".gz" => Signature::Prefix(&[&[0x1F, 0x8B]]),
        ".txt" | ".md" | ".csv" | ".json" | ".py" | ".rs" | ".c" | ".cpp" | ".java" => {
            Signature::Text
        }
        _ => return None,
    };
    Some(sig)
}

/// 验证文件内容的魔术字节是否与扩展名匹配
///
/// `extension` 包含点号，如 ".png"。空数据或未知扩展名一律拒绝。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match signature_for(&extension.to_lowercase()) {
        Some(Signature::Prefix(prefixes)) => prefixes.iter().any(|p| data.starts_with(p)),
        Some(Signature::Riff(kind)) => {
            data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == kind
        }
        Some(Signature::Text) => true,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_magic() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(validate_magic_bytes(&png_header, ".png"));
        assert!(validate_magic_bytes(&png_header, ".PNG"));
        assert!(!validate_magic_bytes(&png_header, ".jpg"));
    }

    #[test]
    fn test_pdf_magic() {
        assert!(validate_magic_bytes(b"%PDF-1.7", ".pdf"));
        assert!(!validate_magic_bytes(b"%PDF-1.7", ".docx"));
    }

    #[test]
    fn test_webp_magic() {
        let mut data = b"RIFF".to_vec();
        data.extend_from_slice(&[0, 0, 0, 0]);
        data.extend_from_slice(b"WEBP");
        assert!(validate_magic_bytes(&data, ".webp"));
        assert!(!validate_magic_bytes(b"RIFF", ".webp"));
    }

    #[test]
    fn test_source_files_are_text() {
        assert!(validate_magic_bytes(b"fn main() {}", ".rs"));
        assert!(validate_magic_bytes(b"# Notes", ".md"));
    }

    #[test]
    fn test_empty_and_unknown() {
        assert!(!validate_magic_bytes(&[], ".txt"));
        assert!(!validate_magic_bytes(&[0x4D, 0x5A], ".exe"));
    }
}
