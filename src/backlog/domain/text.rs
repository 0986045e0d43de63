//! Validated text scalars for backlog entities.
//!
//! Input is trimmed before validation and lengths are counted in characters.

use super::{BacklogDomainError, TextField};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Epic names span 3 to 100 characters.
const EPIC_NAME_LENGTH: (usize, usize) = (3, 100);
/// Epic descriptions are capped at 1000 characters.
const EPIC_DESCRIPTION_MAX_LENGTH: usize = 1000;
/// Sprint backlog names span 3 to 50 characters.
const SPRINT_NAME_LENGTH: (usize, usize) = (3, 50);
/// User story names span 10 to 100 characters.
const USER_STORY_NAME_LENGTH: (usize, usize) = (10, 100);
/// Each Given/When/Then clause spans 5 to 255 characters.
const CLAUSE_LENGTH: (usize, usize) = (5, 255);
/// Task titles span 5 to 100 characters.
const TASK_TITLE_LENGTH: (usize, usize) = (5, 100);

fn require_text(field: TextField, value: impl Into<String>) -> Result<String, BacklogDomainError> {
    let raw = value.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BacklogDomainError::BlankField(field));
    }
    Ok(trimmed.to_owned())
}

fn require_length(
    field: TextField,
    value: impl Into<String>,
    (min, max): (usize, usize),
) -> Result<String, BacklogDomainError> {
    let text = require_text(field, value)?;
    let actual = text.chars().count();
    if actual < min || actual > max {
        return Err(BacklogDomainError::LengthOutOfRange {
            field,
            min,
            max,
            actual,
        });
    }
    Ok(text)
}

macro_rules! text_scalar {
    ($(#[$meta:meta])* $name:ident, |$value:ident| $build:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl TryFrom<String> for $name {
            type Error = BacklogDomainError;

            fn try_from($value: String) -> Result<Self, Self::Error> {
                $build
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl $name {
            /// Returns the value as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_scalar!(
    /// Non-blank project name.
    ProjectName,
    |value| Self::new(value)
);

impl ProjectName {
    /// Creates a validated project name.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogDomainError::BlankField`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, BacklogDomainError> {
        require_text(TextField::ProjectName, value).map(Self)
    }
}

text_scalar!(
    /// Non-blank product backlog name.
    ProductBacklogName,
    |value| Self::new(value)
);

impl ProductBacklogName {
    /// Creates a validated product backlog name.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogDomainError::BlankField`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, BacklogDomainError> {
        require_text(TextField::ProductBacklogName, value).map(Self)
    }
}

text_scalar!(
    /// Epic name of 3 to 100 characters.
    EpicName,
    |value| Self::new(value)
);

impl EpicName {
    /// Creates a validated epic name.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogDomainError`] when the value is blank or its length
    /// falls outside 3..=100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BacklogDomainError> {
        require_length(TextField::EpicName, value, EPIC_NAME_LENGTH).map(Self)
    }
}

text_scalar!(
    /// Epic description of at most 1000 characters.
    EpicDescription,
    |value| Self::new(value)
);

impl EpicDescription {
    /// Creates a validated epic description.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogDomainError`] when the value is blank or exceeds
    /// 1000 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BacklogDomainError> {
        require_length(
            TextField::EpicDescription,
            value,
            (1, EPIC_DESCRIPTION_MAX_LENGTH),
        )
        .map(Self)
    }
}

text_scalar!(
    /// Sprint backlog name of 3 to 50 characters.
    SprintBacklogName,
    |value| Self::new(value)
);

impl SprintBacklogName {
    /// Creates a validated sprint backlog name.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogDomainError`] when the value is blank or its length
    /// falls outside 3..=50 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BacklogDomainError> {
        require_length(TextField::SprintBacklogName, value, SPRINT_NAME_LENGTH).map(Self)
    }
}

text_scalar!(
    /// User story name of 10 to 100 characters.
    UserStoryName,
    |value| Self::new(value)
);

impl UserStoryName {
    /// Creates a validated user story name.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogDomainError`] when the value is blank or its length
    /// falls outside 10..=100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BacklogDomainError> {
        require_length(TextField::UserStoryName, value, USER_STORY_NAME_LENGTH).map(Self)
    }
}

text_scalar!(
    /// One Given, When or Then clause of 5 to 255 characters.
    BddClause,
    |value| Self::new(TextField::Clause, value)
);

impl BddClause {
    /// Creates a validated clause for the given field.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogDomainError`] when the value is blank or its length
    /// falls outside 5..=255 characters.
    pub fn new(field: TextField, value: impl Into<String>) -> Result<Self, BacklogDomainError> {
        require_length(field, value, CLAUSE_LENGTH).map(Self)
    }
}

text_scalar!(
    /// Task title of 5 to 100 characters.
    TaskTitle,
    |value| Self::new(value)
);

impl TaskTitle {
    /// Creates a validated task title.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogDomainError`] when the value is blank or its length
    /// falls outside 5..=100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BacklogDomainError> {
        require_length(TextField::TaskTitle, value, TASK_TITLE_LENGTH).map(Self)
    }
}

text_scalar!(
    /// Non-blank task description.
    TaskDescription,
    |value| Self::new(value)
);

impl TaskDescription {
    /// Creates a validated task description.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogDomainError::BlankField`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, BacklogDomainError> {
        require_text(TextField::TaskDescription, value).map(Self)
    }
}

/// "As a [role], I want [feature], so that [benefit]" narrative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "NarrativeParts")]
pub struct StoryNarrative {
    role: String,
    feature: String,
    benefit: String,
}

impl StoryNarrative {
    /// Creates a validated narrative; every part must be non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogDomainError::BlankField`] naming the first blank part.
    pub fn new(
        role: impl Into<String>,
        feature: impl Into<String>,
        benefit: impl Into<String>,
    ) -> Result<Self, BacklogDomainError> {
        Ok(Self {
            role: require_text(TextField::Role, role)?,
            feature: require_text(TextField::Feature, feature)?,
            benefit: require_text(TextField::Benefit, benefit)?,
        })
    }

    /// Returns the role.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Returns the desired feature.
    #[must_use]
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Returns the expected benefit.
    #[must_use]
    pub fn benefit(&self) -> &str {
        &self.benefit
    }
}

#[derive(Deserialize)]
struct NarrativeParts {
    role: String,
    feature: String,
    benefit: String,
}

impl TryFrom<NarrativeParts> for StoryNarrative {
    type Error = BacklogDomainError;

    fn try_from(parts: NarrativeParts) -> Result<Self, Self::Error> {
        Self::new(parts.role, parts.feature, parts.benefit)
    }
}

impl fmt::Display for StoryNarrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "As a {}, I want {}, so that {}",
            self.role, self.feature, self.benefit
        )
    }
}
