use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUILTIN_STEPS: &str = include_str!("steps.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Primary,
    Secondary,
    Accent,
}

impl ColorTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTag::Primary => "primary",
            ColorTag::Secondary => "secondary",
            ColorTag::Accent => "accent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepIcon {
    Calculator,
    Cpu,
    Wrench,
    Flask,
}

/// Shape of one entry in the content blob. The index is not part of the
/// blob; it comes from the entry's position.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StepEntry {
    icon: StepIcon,
    title: String,
    description: String,
    detail: String,
    color: ColorTag,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepDescriptor {
    pub index: usize,
    pub icon: StepIcon,
    pub title: String,
    pub description: String,
    pub detail: String,
    pub color: ColorTag,
}

impl StepDescriptor {
    /// "01", "02", ... as shown next to the card title.
    pub fn number_label(&self) -> String {
        format!("{:02}", self.index + 1)
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("step content is not valid: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("step content contains no steps")]
    Empty,
    #[error("step {index} has a blank `{field}`")]
    BlankField { index: usize, field: &'static str },
}

/// Ordered, read-only list of journey steps, indexed 0..N-1.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRegistry {
    steps: Vec<StepDescriptor>,
}

impl StepRegistry {
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_json(BUILTIN_STEPS)
    }

    pub fn from_json(raw: &str) -> Result<Self, RegistryError> {
        let entries: Vec<StepEntry> = serde_json::from_str(raw)?;
        if entries.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut steps = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            for (field, value) in [
                ("title", &entry.title),
                ("description", &entry.description),
                ("detail", &entry.detail),
            ] {
                if value.trim().is_empty() {
                    return Err(RegistryError::BlankField { index, field });
                }
            }
            steps.push(StepDescriptor {
                index,
                icon: entry.icon,
                title: entry.title,
                description: entry.description,
                detail: entry.detail,
                color: entry.color,
            });
        }

        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.steps.len()
    }

    pub fn get(&self, index: usize) -> Option<&StepDescriptor> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.steps.iter()
    }
}

#[cfg(test)]
pub(crate) fn sample_registry(count: usize) -> StepRegistry {
    let colors = ["primary", "secondary", "accent"];
    let entries: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "icon": "cpu",
                "title": format!("Step {}", i),
                "description": format!("What step {} covers", i),
                "detail": format!("Why step {} matters", i),
                "color": colors[i % colors.len()],
            })
        })
        .collect();
    StepRegistry::from_json(&serde_json::Value::Array(entries).to_string())
        .expect("sample registry is well formed")
}
