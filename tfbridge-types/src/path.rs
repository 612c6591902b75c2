//! Attribute paths into nested values.

use std::fmt;

/// One step of an [`AttributePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Object attribute, by plugin-side name.
    Attribute(String),
    /// List element.
    Index(usize),
    /// Map entry.
    Key(String),
}

/// Location of a value inside a resource, e.g. `rules[0].ports`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AttributePath {
    steps: Vec<PathStep>,
}

impl AttributePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn attribute(&self, name: impl Into<String>) -> Self {
        self.push(PathStep::Attribute(name.into()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.push(PathStep::Index(index))
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        self.push(PathStep::Key(key.into()))
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Attribute names along the path, skipping list and map steps.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| match step {
            PathStep::Attribute(name) => Some(name.as_str()),
            _ => None,
        })
    }

    fn push(&self, step: PathStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "<root>");
        }
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Attribute(name) if i == 0 => write!(f, "{}", name)?,
                PathStep::Attribute(name) => write!(f, ".{}", name)?,
                PathStep::Index(index) => write!(f, "[{}]", index)?,
                PathStep::Key(key) => write!(f, "[{:?}]", key)?,
            }
        }
        Ok(())
    }
}
