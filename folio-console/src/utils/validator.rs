use folio_core::{bail_folio, FolioResult};

/// Fails with `message` when `value` is blank.
pub fn require_non_empty(value: &str, message: &str) -> FolioResult<()> {
    if value.trim().is_empty() {
        bail_folio!(validation, message);
    }
    Ok(())
}

pub fn require_all(values: &[&str], message: &str) -> FolioResult<()> {
    values
        .iter()
        .try_for_each(|v| require_non_empty(v, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ErrorKind, FolioError};

    #[test]
    fn blank_is_a_validation_error() {
        let err = require_non_empty("  ", "Please enter a name").unwrap_err();
        assert_eq!(FolioError::kind_of(&err), Some(ErrorKind::Validation));
        assert_eq!(FolioError::from_anyhow(&err).unwrap().message, "Please enter a name");
    }

    #[test]
    fn all_must_be_filled() {
        assert!(require_all(&["Sam", "Framer"], "x").is_ok());
        assert!(require_all(&["Sam", ""], "x").is_err());
    }
}
