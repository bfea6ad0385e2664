//! Code element model consumed by matchers and evaluators.

use serde::{Deserialize, Serialize};

/// A language-agnostic description of one source-structure unit.
///
/// Implementors are produced by external AST exporters (one per language);
/// the engine borrows an element for the duration of a single match or
/// evaluate call and never mutates or retains it.
///
/// Parameter and return information can be supplied twice: as a plain count
/// and as a list of declared names. The metric extractor prefers the count
/// when it is nonzero and falls back to the list length otherwise, so
/// exporters may fill in whichever side they have.
pub trait CodeElement {
    /// Package (or folder) the element belongs to.
    fn package(&self) -> &str;

    /// Type name; empty when the element is not attached to a type.
    fn type_name(&self) -> &str;

    /// Method name; empty for package- or type-level elements.
    fn method(&self) -> &str;

    /// Field name; empty unless the element is a field.
    fn field(&self) -> &str;

    /// Path of the defining source file.
    fn file_path(&self) -> &str;

    /// Cyclomatic complexity of the element's body.
    fn cyclomatic_complexity(&self) -> usize {
        0
    }

    /// Declared parameter count.
    fn parameter_count(&self) -> usize {
        0
    }

    /// Declared return-value count.
    fn return_count(&self) -> usize {
        0
    }

    /// Line count of the element.
    fn line_count(&self) -> usize {
        0
    }

    /// Parameter list, when the exporter provides one.
    fn parameters(&self) -> &[String] {
        &[]
    }

    /// Return-value list, when the exporter provides one.
    fn returns(&self) -> &[String] {
        &[]
    }
}

/// An owned [`CodeElement`] for external feeders and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceElement {
    /// Package (or folder) of the element.
    pub package: String,
    /// Type name.
    #[serde(rename = "type", default)]
    pub type_name: String,
    /// Method name.
    #[serde(default)]
    pub method: String,
    /// Field name.
    #[serde(default)]
    pub field: String,
    /// Defining source file path.
    #[serde(default)]
    pub file_path: String,
    /// Cyclomatic complexity.
    #[serde(default)]
    pub cyclomatic_complexity: usize,
    /// Declared parameter count.
    #[serde(default)]
    pub parameter_count: usize,
    /// Declared return-value count.
    #[serde(default)]
    pub return_count: usize,
    /// Line count.
    #[serde(default)]
    pub line_count: usize,
    /// Parameter list.
    #[serde(default)]
    pub parameters: Vec<String>,
    /// Return-value list.
    #[serde(default)]
    pub returns: Vec<String>,
}

impl SourceElement {
    /// Creates an element rooted at a package.
    #[must_use]
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Self::default()
        }
    }

    /// Sets the type name.
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// Sets the method name.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Sets the field name.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Sets the source file path.
    #[must_use]
    pub fn with_file(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = file_path.into();
        self
    }

    /// Sets the cyclomatic complexity.
    #[must_use]
    pub fn with_complexity(mut self, complexity: usize) -> Self {
        self.cyclomatic_complexity = complexity;
        self
    }

    /// Sets the line count.
    #[must_use]
    pub fn with_lines(mut self, lines: usize) -> Self {
        self.line_count = lines;
        self
    }

    /// Sets the declared parameter count.
    #[must_use]
    pub fn with_parameter_count(mut self, count: usize) -> Self {
        self.parameter_count = count;
        self
    }

    /// Sets the declared return count.
    #[must_use]
    pub fn with_return_count(mut self, count: usize) -> Self {
        self.return_count = count;
        self
    }

    /// Sets the parameter list.
    #[must_use]
    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the return-value list.
    #[must_use]
    pub fn with_returns<I, S>(mut self, returns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.returns = returns.into_iter().map(Into::into).collect();
        self
    }
}

impl CodeElement for SourceElement {
    fn package(&self) -> &str {
        &self.package
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn field(&self) -> &str {
        &self.field
    }

    fn file_path(&self) -> &str {
        &self.file_path
    }

    fn cyclomatic_complexity(&self) -> usize {
        self.cyclomatic_complexity
    }

    fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    fn return_count(&self) -> usize {
        self.return_count
    }

    fn line_count(&self) -> usize {
        self.line_count
    }

    fn parameters(&self) -> &[String] {
        &self.parameters
    }

    fn returns(&self) -> &[String] {
        &self.returns
    }
}

/// Joins an element's non-empty structural coordinates with `:` for display.
#[must_use]
pub fn element_path(element: &dyn CodeElement) -> String {
    let mut parts: Vec<&str> = vec![element.package()];
    for part in [element.type_name(), element.method(), element.field()] {
        if !part.is_empty() {
            parts.push(part);
        }
    }
    parts.join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_fields() {
        let element = SourceElement::new("app/service")
            .with_type("UserService")
            .with_method("getUser")
            .with_file("app/service/user.go")
            .with_complexity(7);
        assert_eq!(element.package(), "app/service");
        assert_eq!(element.type_name(), "UserService");
        assert_eq!(element.method(), "getUser");
        assert_eq!(element.cyclomatic_complexity(), 7);
    }

    #[test]
    fn element_path_skips_empty_parts() {
        let element = SourceElement::new("pkg").with_method("run");
        assert_eq!(element_path(&element), "pkg:run");
    }

    #[test]
    fn serializes_type_under_its_own_name() {
        let element = SourceElement::new("pkg").with_type("T");
        let json = serde_json::to_string(&element).unwrap();
        assert!(json.contains("\"type\":\"T\""));
    }
}
