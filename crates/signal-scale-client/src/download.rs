//! Binary export payloads and filename selection.

use chrono::NaiveDate;
use percent_encoding::percent_decode_str;
use signal_scale_core::ExportFormat;

pub const CSV_EXPORT_FILENAME: &str = "signal_scale_export.csv";

/// Raw bytes of a binary export, unparsed.
#[derive(Debug, Clone)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    /// Filename announced by the server in `Content-Disposition`.
    pub filename: Option<String>,
}

impl Download {
    /// Server-provided filename when present, otherwise `default`.
    /// The result is always safe to join onto a directory.
    #[must_use]
    pub fn filename_or(&self, default: &str) -> String {
        self.filename
            .as_deref()
            .map(sanitize_filename)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| sanitize_filename(default))
    }
}

/// Extracts the filename from a `Content-Disposition` header value.
///
/// `filename*=` (RFC 5987, percent-encoded) wins over a plain `filename=`.
#[must_use]
pub fn filename_from_content_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in value.split(';').map(str::trim) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let encoded = raw.trim().split_once("''").map_or(raw.trim(), |(_, v)| v);
                extended = percent_decode_str(encoded.trim_matches('"'))
                    .decode_utf8()
                    .ok()
                    .map(|s| s.into_owned());
            }
            "filename" => {
                plain = Some(raw.trim().trim_matches('"').to_owned());
            }
            _ => {}
        }
    }

    extended.or(plain).filter(|name| !name.is_empty())
}

/// Default report filename: `{brand}_competitive_intelligence_{YYYY-MM-DD}.{ext}`.
#[must_use]
pub fn default_report_filename(brand: &str, format: ExportFormat, date: NaiveDate) -> String {
    let brand: String = brand
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    sanitize_filename(&format!(
        "{brand}_competitive_intelligence_{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    ))
}

/// Strips path components and characters that are unsafe in filenames.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .filter(|c| !c.is_control() && !matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect::<String>()
        .trim_start_matches('.')
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_filename_is_extracted() {
        assert_eq!(
            filename_from_content_disposition(r#"attachment; filename="acme_report.pdf""#),
            Some("acme_report.pdf".to_string())
        );
        assert_eq!(
            filename_from_content_disposition("attachment; filename=report.md"),
            Some("report.md".to_string())
        );
    }

    #[test]
    fn extended_filename_wins_and_is_decoded() {
        assert_eq!(
            filename_from_content_disposition(
                "attachment; filename=\"fallback.pdf\"; filename*=UTF-8''Crooks%20%26%20Castles.pdf"
            ),
            Some("Crooks & Castles.pdf".to_string())
        );
    }

    #[test]
    fn missing_filename_is_none() {
        assert_eq!(filename_from_content_disposition("inline"), None);
        assert_eq!(filename_from_content_disposition("attachment; filename=\"\""), None);
    }

    #[test]
    fn default_report_filename_uses_brand_and_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(
            default_report_filename("Crooks & Castles", ExportFormat::Pdf, date),
            "Crooks_&_Castles_competitive_intelligence_2025-03-09.pdf"
        );
        assert_eq!(
            default_report_filename("Acme", ExportFormat::Markdown, date),
            "Acme_competitive_intelligence_2025-03-09.md"
        );
    }

    #[test]
    fn sanitize_filename_drops_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("..\\evil.csv"), "evil.csv");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
    }

    #[test]
    fn filename_or_prefers_server_name() {
        let download = Download {
            bytes: Vec::new(),
            content_type: None,
            filename: Some("server.csv".to_string()),
        };
        assert_eq!(download.filename_or(CSV_EXPORT_FILENAME), "server.csv");

        let download = Download {
            filename: None,
            ..download
        };
        assert_eq!(download.filename_or(CSV_EXPORT_FILENAME), CSV_EXPORT_FILENAME);
    }
}
