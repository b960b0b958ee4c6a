use ducatify::core::error::{AppError, DocumentError};
use ducatify::core::types::ErrorCategory;
use ducatify::utils::serialization::{DocumentCodec, JsonCodec, YamlCodec};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation_with_category() {
        let error = AppError::new(ErrorCategory::CallerInput, "Invalid input".to_string());
        assert_eq!(error.category, ErrorCategory::CallerInput);
        assert_eq!(error.message, "Invalid input");
        assert!(error.step.is_none());
    }

    #[test]
    fn test_each_category_has_a_distinct_code() {
        let categories = [
            ErrorCategory::StructuralAbsence,
            ErrorCategory::TypeMismatch,
            ErrorCategory::AnchorNotFound,
            ErrorCategory::CallerInput,
            ErrorCategory::ConfigurationError,
            ErrorCategory::SerializationError,
            ErrorCategory::IoError,
            ErrorCategory::InternalError,
        ];
        let mut codes: Vec<String> = categories
            .iter()
            .map(|category| AppError::new(*category, "x").code)
            .collect();
        assert!(codes.iter().all(|code| code.starts_with("DUC-")));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), categories.len());
    }

    #[test]
    fn test_document_error_categories() {
        assert_eq!(
            DocumentError::MissingKey("jobs".to_string()).category(),
            ErrorCategory::StructuralAbsence
        );
        assert_eq!(
            DocumentError::Unpack { found: "string" }.category(),
            ErrorCategory::TypeMismatch
        );
        assert_eq!(
            DocumentError::AnchorNotFound {
                anchor: "database_z1".to_string()
            }
            .category(),
            ErrorCategory::AnchorNotFound
        );
        assert_eq!(
            DocumentError::MissingInput("system domain for route registration").category(),
            ErrorCategory::StructuralAbsence
        );
    }

    #[test]
    fn test_step_failure_carries_step_and_category() {
        let error = AppError::step_failed(
            "updating releases",
            DocumentError::MissingKey("releases".to_string()),
        );
        assert_eq!(error.category, ErrorCategory::StructuralAbsence);
        assert_eq!(error.code, "DUC-DOC-001");
        assert_eq!(error.step.as_deref(), Some("updating releases"));
        assert_eq!(error.to_string(), "updating releases: map missing key releases");
    }

    #[test]
    fn test_outer_context_prefixes_the_chain() {
        let error = AppError::step_failed(
            "adding garden properties",
            DocumentError::MissingKey("garden".to_string()),
        );
        let wrapped = anyhow::Error::new(error).context("transforming");
        assert_eq!(
            format!("{:#}", wrapped),
            "transforming: adding garden properties: map missing key garden"
        );
    }

    #[test]
    fn test_codec_failures_are_serialization_errors() {
        let err = YamlCodec.decode(b"jobs: [unclosed").unwrap_err();
        let app = err.downcast_ref::<AppError>().unwrap();
        assert_eq!(app.category, ErrorCategory::SerializationError);
        assert_eq!(app.code, "DUC-SER-001");

        let document = YamlCodec.decode(b"weight: .inf\n").unwrap();
        let err = JsonCodec.encode(&document).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AppError>().unwrap().category,
            ErrorCategory::SerializationError
        );
    }
}
