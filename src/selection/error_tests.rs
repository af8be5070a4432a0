//! Unit tests for selection error types

#[cfg(test)]
mod tests {
    use crate::resource::{ModelLabel, PageId};
    use crate::selection::error::SelectionError;

    #[test]
    fn test_bucket_not_choosable_names_label() {
        let error = SelectionError::BucketNotChoosable(ModelLabel::new("tests.category"));
        assert!(error.to_string().contains("tests.category"));
    }

    #[test]
    fn test_not_choosable_display() {
        let error = SelectionError::NotChoosable {
            id: PageId(12),
            page_type: "tests.simplepage".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Page 12 (tests.simplepage) is not one of the allowed page types"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SelectionError>();
    }
}
