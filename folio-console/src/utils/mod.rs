pub mod validator;

use folio_core::FolioError;

/// The user-facing part of an error: the Folio message when there is one.
pub fn user_message(err: &anyhow::Error) -> String {
    match FolioError::from_anyhow(err) {
        Some(folio) => folio.message.clone(),
        None => err.to_string(),
    }
}
