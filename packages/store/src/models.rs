//! # Domain models for the portfolio
//!
//! Defines the rows the dashboard manages and the public pages display, together
//! with the editable drafts the dashboard forms bind to.
//!
//! ## Types
//!
//! | Struct | Table | Cardinality | Represents |
//! |--------|-------|-------------|-----------|
//! | [`Project`] | `projects` | [`Many`] | A gallery entry with links and an ordered list of technologies. |
//! | [`Post`] | `posts` | [`Many`] | A blog post; only `published` posts are shown publicly. |
//! | [`Profile`] | `profiles` | [`One`] | The owner's profile, keyed by their user id. |
//!
//! Each record has a matching draft (`ProjectDraft`, `PostDraft`, `ProfileDraft`)
//! whose every field starts empty. A draft's `id` is only ever copied from a stored
//! record and is never written back in a payload: identifiers belong to the store.
//!
//! ## Helper functions
//!
//! - [`split_list`] turns comma-separated form input into a list, trimming entries
//!   and dropping empty ones.
//! - [`join_list`] is the inverse used to fill the form input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ManagerError;
use crate::manager::{Draft, Many, One, Record};

/// A portfolio project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub user_id: String,
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub image_url: String,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub technologies: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A blog post.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub user_id: String,
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(default, deserialize_with = "nullable")]
    pub excerpt: String,
    #[serde(default, deserialize_with = "nullable")]
    pub published: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The site owner's profile. `id` is the owner's user id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub full_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub avatar_url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub bio: String,
    #[serde(default, deserialize_with = "nullable")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub social_links: SocialLinks,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Social profile URLs keyed by platform.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// Form state for creating or editing a [`Project`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProjectDraft {
    #[serde(skip_serializing)]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub technologies: Vec<String>,
}

/// Form state for creating or editing a [`Post`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PostDraft {
    #[serde(skip_serializing)]
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub published: bool,
}

/// Form state for the [`Profile`] screen.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProfileDraft {
    #[serde(skip_serializing)]
    pub id: Option<String>,
    pub full_name: String,
    pub avatar_url: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub social_links: SocialLinks,
}

impl Record for Project {
    const TABLE: &'static str = "projects";
    type Draft = ProjectDraft;
    type Cardinality = Many;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> ProjectDraft {
        ProjectDraft {
            id: Some(self.id.clone()),
            title: self.title.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            live_url: self.live_url.clone(),
            github_url: self.github_url.clone(),
            technologies: self.technologies.clone(),
        }
    }
}

impl Record for Post {
    const TABLE: &'static str = "posts";
    const UPDATED_AT: Option<&'static str> = Some("updated_at");
    type Draft = PostDraft;
    type Cardinality = Many;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> PostDraft {
        PostDraft {
            id: Some(self.id.clone()),
            title: self.title.clone(),
            content: self.content.clone(),
            excerpt: self.excerpt.clone(),
            published: self.published,
        }
    }
}

impl Record for Profile {
    const TABLE: &'static str = "profiles";
    const UPDATED_AT: Option<&'static str> = Some("updated_at");
    type Draft = ProfileDraft;
    type Cardinality = One;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> ProfileDraft {
        ProfileDraft {
            id: Some(self.id.clone()),
            full_name: self.full_name.clone(),
            avatar_url: self.avatar_url.clone(),
            bio: self.bio.clone(),
            skills: self.skills.clone(),
            social_links: self.social_links.clone(),
        }
    }
}

impl Draft for ProjectDraft {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ManagerError> {
        require("title", &self.title)?;
        require("description", &self.description)
    }
}

impl ProjectDraft {
    /// Replace the technologies from a comma-separated input value.
    pub fn set_technologies(&mut self, input: &str) {
        self.technologies = split_list(input);
    }
}

impl Draft for PostDraft {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ManagerError> {
        require("title", &self.title)?;
        require("content", &self.content)
    }
}

impl Draft for ProfileDraft {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ManagerError> {
        require("full name", &self.full_name)
    }
}

impl ProfileDraft {
    /// Replace the skills from a comma-separated input value.
    pub fn set_skills(&mut self, input: &str) {
        self.skills = split_list(input);
    }
}

/// Map a form value onto an optional field: blank input clears it.
pub fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Split comma-separated input into trimmed, non-empty entries.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render a list back into the comma-separated form input.
pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

fn require(field: &'static str, value: &str) -> Result<(), ManagerError> {
    if value.trim().is_empty() {
        Err(ManagerError::Missing { field })
    } else {
        Ok(())
    }
}

/// Columns the store may hand back as `null` decode to the field's default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
