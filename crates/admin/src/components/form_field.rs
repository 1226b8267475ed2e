//! Form field component types.

use storeadmin_core::{FieldError, SelectOption};

/// How a field is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    Text,
    Url,
    /// Newline-separated list.
    Textarea,
    Select,
    Checkbox,
    Color,
}

impl Widget {
    /// Template-facing name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Url => "url",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Color => "color",
        }
    }
}

/// One input on a resource form, with its current value.
#[derive(Debug, Clone)]
pub struct FormField {
    /// Form key; matches the JSON attribute name.
    pub name: &'static str,
    pub label: &'static str,
    pub widget: Widget,
    pub value: String,
    pub checked: bool,
    pub options: Vec<SelectOption>,
    pub help: Option<&'static str>,
}

impl FormField {
    #[must_use]
    pub fn text(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            label,
            widget: Widget::Text,
            value: value.into(),
            checked: false,
            options: Vec::new(),
            help: None,
        }
    }

    #[must_use]
    pub fn url(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            widget: Widget::Url,
            ..Self::text(name, label, value)
        }
    }

    #[must_use]
    pub fn textarea(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            widget: Widget::Textarea,
            ..Self::text(name, label, value)
        }
    }

    #[must_use]
    pub fn color(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            widget: Widget::Color,
            ..Self::text(name, label, value)
        }
    }

    /// A select over typed options; `value` is the selected id, if any.
    #[must_use]
    pub fn select(
        name: &'static str,
        label: &'static str,
        value: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            widget: Widget::Select,
            options,
            ..Self::text(name, label, value)
        }
    }

    #[must_use]
    pub fn checkbox(name: &'static str, label: &'static str, checked: bool) -> Self {
        Self {
            widget: Widget::Checkbox,
            checked,
            ..Self::text(name, label, "")
        }
    }

    #[must_use]
    pub const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.widget.as_str()
    }

    #[must_use]
    pub fn is_selected(&self, option: &SelectOption) -> bool {
        option.id.to_string() == self.value.trim()
    }

    /// The error to show under this field, if it is the one that failed.
    #[must_use]
    pub fn error<'a>(&self, error: Option<&'a FieldError>) -> Option<&'a str> {
        error
            .filter(|e| e.field == self.name)
            .map(|e| e.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_select_marks_current_value() {
        let id = Uuid::new_v4();
        let option = SelectOption {
            id,
            label: "Summer".to_owned(),
        };
        let field = FormField::select("billboardId", "Billboard", id.to_string(), vec![option.clone()]);
        assert!(field.is_selected(&option));
        assert_eq!(field.kind(), "select");
    }

    #[test]
    fn test_error_only_for_own_field() {
        let field = FormField::text("name", "Name", "");
        let err = FieldError::new("name", "Name is required");
        assert_eq!(field.error(Some(&err)), Some("Name is required"));
        let other = FieldError::new("value", "Value is required");
        assert_eq!(field.error(Some(&other)), None);
    }
}
