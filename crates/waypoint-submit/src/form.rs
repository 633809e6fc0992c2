//! Form submission data

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMethod {
    #[default]
    Get,
    Post,
}

impl FormMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormMethod::Get => "get",
            FormMethod::Post => "post",
        }
    }
}

impl std::fmt::Display for FormMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FormMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "get" => Ok(FormMethod::Get),
            "post" => Ok(FormMethod::Post),
            _ => Err(format!("Unknown form method: {}", s)),
        }
    }
}

/// One form submission as handed to [`crate::submit`].
#[derive(Debug, Clone, Default)]
pub struct FormSubmission {
    pub method: FormMethod,
    pub name: String,
    /// Target URL; the current entry's URL when absent.
    pub action: Option<String>,
    /// Form fields, query-encoded for GET and body-encoded for POST.
    pub fields: Vec<(String, String)>,
    /// Info attached to the navigation a redirect response triggers.
    pub info: Option<Value>,
}

impl FormSubmission {
    pub fn new(method: FormMethod, name: impl Into<String>) -> Self {
        Self {
            method,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }
}
