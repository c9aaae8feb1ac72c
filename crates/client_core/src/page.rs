//! The handler's view of the surrounding document.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use tracing::error;

use crate::error::ClientError;

/// Named elements the handler reads from and writes to, plus the
/// diagnostic console it reports failures on.
pub trait Page: Send + Sync {
    /// Current value of a text-bearing input, or `None` if no such element.
    fn input_value(&self, element_id: &str) -> Option<String>;

    fn set_text_content(&self, element_id: &str, text: String) -> Result<(), ClientError>;

    fn log_error(&self, message: &str) {
        error!(target: "console", "{message}");
    }
}

/// In-memory document holding one string per element id.
#[derive(Debug, Default)]
pub struct FormPage {
    elements: RwLock<HashMap<String, String>>,
}

impl FormPage {
    pub fn with_elements<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            elements: RwLock::new(
                ids.into_iter()
                    .map(|id| (id.into(), String::new()))
                    .collect(),
            ),
        }
    }

    /// Sets an element's value, creating the element if needed.
    pub fn set_value(&self, element_id: &str, value: impl Into<String>) {
        self.elements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(element_id.to_string(), value.into());
    }

    pub fn text(&self, element_id: &str) -> Option<String> {
        self.elements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(element_id)
            .cloned()
    }
}

impl Page for FormPage {
    fn input_value(&self, element_id: &str) -> Option<String> {
        self.text(element_id)
    }

    fn set_text_content(&self, element_id: &str, text: String) -> Result<(), ClientError> {
        let mut elements = self
            .elements
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let slot = elements
            .get_mut(element_id)
            .ok_or_else(|| ClientError::MissingElement(element_id.to_string()))?;
        *slot = text;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_requires_existing_element() {
        let page = FormPage::with_elements(["parseResult"]);
        page.set_text_content("parseResult", "[]".into())
            .expect("element exists");
        assert_eq!(page.text("parseResult").as_deref(), Some("[]"));

        let err = page
            .set_text_content("missing", "x".into())
            .expect_err("should fail");
        assert!(matches!(err, ClientError::MissingElement(id) if id == "missing"));
    }

    #[test]
    fn input_value_reflects_latest_value() {
        let page = FormPage::default();
        assert_eq!(page.input_value("sentenceInput"), None);
        page.set_value("sentenceInput", "[1]");
        page.set_value("sentenceInput", "[2]");
        assert_eq!(page.input_value("sentenceInput").as_deref(), Some("[2]"));
    }
}
