//! Pending-submission state of a page.
//!
//! A [`Navigation`] describes the request the browser currently has in
//! flight. Views use it to disable and relabel the submit button of the form
//! being submitted and to list the title of a post that is still being
//! created. Server renders always start from [`Navigation::idle`]; the inline
//! page script in `layout.html` applies the same rules in the browser while a
//! submission is pending, so [`Navigation::submitting`] is the state that
//! script mirrors.

use serde::Serialize;

use crate::validation::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Navigation {
    pub state: NavigationState,
    pub form_method: Option<String>,
    pub form_action: Option<String>,
    pub form_data: Vec<(String, String)>,
}

impl Navigation {
    pub fn idle() -> Self {
        Self {
            state: NavigationState::Idle,
            form_method: None,
            form_action: None,
            form_data: Vec::new(),
        }
    }

    pub fn submitting(method: &str, action: &str, form_data: Vec<(String, String)>) -> Self {
        Self {
            state: NavigationState::Submitting,
            form_method: Some(method.to_uppercase()),
            form_action: Some(action.to_string()),
            form_data,
        }
    }

    pub fn form_value(&self, field: &str) -> Option<&str> {
        self.form_data
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a submission to `action` with `method` is in flight. When
    /// `intent` is given the submission must also carry that intent.
    pub fn is_submitting(&self, method: &str, action: &str, intent: Option<&str>) -> bool {
        self.state == NavigationState::Submitting
            && self
                .form_method
                .as_deref()
                .map(|m| m.eq_ignore_ascii_case(method))
                .unwrap_or(false)
            && self.form_action.as_deref() == Some(action)
            && intent.map_or(true, |i| self.form_value("intent") == Some(i))
    }

    /// Title of the post being created, shown in the admin list before the
    /// server has confirmed it.
    pub fn optimistic_post_title(&self) -> Option<&str> {
        if self.form_action.as_deref() != Some(crate::api::NEW_POST_ACTION) {
            return None;
        }
        if self.state != NavigationState::Submitting {
            return None;
        }
        self.form_value("title")
    }
}

/// Per-form status resolved from the navigation and the last action result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    Idle,
    Submitting,
    LoadedWithErrors,
}

impl FormStatus {
    pub fn resolve(
        navigation: &Navigation,
        method: &str,
        action: &str,
        intent: Option<&str>,
        errors: Option<&FieldErrors>,
    ) -> Self {
        if navigation.is_submitting(method, action, intent) {
            FormStatus::Submitting
        } else if errors.map(FieldErrors::has_errors).unwrap_or(false) {
            FormStatus::LoadedWithErrors
        } else {
            FormStatus::Idle
        }
    }
}

/// Submit button as rendered into a form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitButton {
    pub label: &'static str,
    pub pending_label: &'static str,
    pub disabled: bool,
}

impl SubmitButton {
    /// `busy` is true when any form on the page is submitting; the label only
    /// changes for the form that is.
    pub fn new(
        idle_label: &'static str,
        pending_label: &'static str,
        status: FormStatus,
        busy: bool,
    ) -> Self {
        let pending = status == FormStatus::Submitting;
        Self {
            label: if pending { pending_label } else { idle_label },
            pending_label,
            disabled: pending || busy,
        }
    }
}
