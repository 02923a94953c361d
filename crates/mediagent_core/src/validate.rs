use thiserror::Error;

const REPORT_EXTENSION: &str = ".txt";

/// Client-side form errors. The `Display` text is what the form shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a .txt file")]
    WrongExtension,
    #[error("Please select a file to upload")]
    NoFileSelected,
    #[error("Please enter report text to analyze")]
    EmptyReportText,
}

/// True when `name` ends in `.txt`, ignoring ASCII case.
pub fn is_report_filename(name: &str) -> bool {
    let suffix_len = REPORT_EXTENSION.len();
    if name.len() < suffix_len || !name.is_char_boundary(name.len() - suffix_len) {
        return false;
    }
    name[name.len() - suffix_len..].eq_ignore_ascii_case(REPORT_EXTENSION)
}

pub fn validate_report_filename(name: &str) -> Result<(), ValidationError> {
    if is_report_filename(name) {
        Ok(())
    } else {
        Err(ValidationError::WrongExtension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_ignores_case() {
        assert!(is_report_filename("report.txt"));
        assert!(is_report_filename("report.TXT"));
        assert!(is_report_filename("Report.TxT"));
        assert!(is_report_filename(".txt"));
    }

    #[test]
    fn other_extensions_are_rejected() {
        assert!(!is_report_filename("report.pdf"));
        assert!(!is_report_filename("report.txt.pdf"));
        assert!(!is_report_filename("report"));
        assert!(!is_report_filename("txt"));
        assert!(!is_report_filename(""));
    }

    #[test]
    fn multibyte_names_do_not_panic() {
        assert!(!is_report_filename("rapport-é"));
        assert!(is_report_filename("läkarrapport.txt"));
        assert_eq!(
            validate_report_filename("日本語"),
            Err(ValidationError::WrongExtension)
        );
    }
}
