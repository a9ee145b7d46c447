//! `$DWGCODEPAGE` to `encoding_rs` mapping.
//!
//! Only drawings older than AC1021 use this; later versions are always UTF-8.

use encoding_rs::Encoding;

/// Encoding for a `$DWGCODEPAGE` value.
///
/// `None` means no transcoding is needed (ASCII / UTF-8). Unrecognized
/// names fall back to windows-1252, the most common pre-2007 code page.
pub fn encoding_from_code_page(code_page: &str) -> Option<&'static Encoding> {
    let name = code_page.trim().to_ascii_lowercase().replace('_', "-");
    let encoding = match name.as_str() {
        "ascii" | "utf-8" | "utf8" | "unicode" => return None,

        "ansi-874" => encoding_rs::WINDOWS_874,
        "ansi-932" => encoding_rs::SHIFT_JIS,
        "ansi-936" | "gb2312" => encoding_rs::GBK,
        "ansi-949" | "korean" | "johab" => encoding_rs::EUC_KR,
        "ansi-950" | "big5" => encoding_rs::BIG5,
        "ansi-1250" | "dos852" => encoding_rs::WINDOWS_1250,
        "ansi-1251" => encoding_rs::WINDOWS_1251,
        "ansi-1253" | "dos869" => encoding_rs::WINDOWS_1253,
        "ansi-1254" | "dos857" | "iso8859-9" => encoding_rs::WINDOWS_1254,
        "ansi-1255" => encoding_rs::WINDOWS_1255,
        "ansi-1256" => encoding_rs::WINDOWS_1256,
        "ansi-1257" => encoding_rs::WINDOWS_1257,
        "ansi-1258" => encoding_rs::WINDOWS_1258,
        "dos855" | "dos866" => encoding_rs::IBM866,
        "iso8859-2" => encoding_rs::ISO_8859_2,
        "iso8859-5" => encoding_rs::ISO_8859_5,
        "iso8859-7" => encoding_rs::ISO_8859_7,
        "iso8859-15" => encoding_rs::ISO_8859_15,
        "koi8-r" => encoding_rs::KOI8_R,

        // ansi_1252, dos850, iso8859-1 and anything unrecognized
        _ => encoding_rs::WINDOWS_1252,
    };
    Some(encoding)
}
