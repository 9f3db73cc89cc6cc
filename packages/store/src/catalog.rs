//! Public read paths: what visitors see on the home, gallery and blog pages, plus
//! the dashboard overview counters.

use crate::error::StoreError;
use crate::models::{Post, Profile, Project};
use crate::manager::Record;
use crate::remote::{decode_rows, Query, RemoteStore, OWNER_COLUMN};

/// Counters shown on the dashboard overview.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub projects: usize,
    pub posts: usize,
    pub published_posts: usize,
}

/// Published posts, newest first.
pub async fn published_posts<S: RemoteStore>(store: &S) -> Result<Vec<Post>, StoreError> {
    let query = Query::new().eq("published", true).newest_first();
    decode_rows(Post::TABLE, store.select(Post::TABLE, &query).await?)
}

/// Every project, newest first.
pub async fn all_projects<S: RemoteStore>(store: &S) -> Result<Vec<Project>, StoreError> {
    let query = Query::new().newest_first();
    decode_rows(Project::TABLE, store.select(Project::TABLE, &query).await?)
}

/// The `limit` most recent projects.
pub async fn featured_projects<S: RemoteStore>(
    store: &S,
    limit: usize,
) -> Result<Vec<Project>, StoreError> {
    let query = Query::new().newest_first().limit(limit);
    decode_rows(Project::TABLE, store.select(Project::TABLE, &query).await?)
}

/// The site owner's profile, if one has been saved.
pub async fn site_profile<S: RemoteStore>(store: &S) -> Result<Option<Profile>, StoreError> {
    let rows = store.select(Profile::TABLE, &Query::new().limit(1)).await?;
    Ok(decode_rows::<Profile>(Profile::TABLE, rows)?.into_iter().next())
}

pub async fn dashboard_stats<S: RemoteStore>(
    store: &S,
    owner: &str,
) -> Result<DashboardStats, StoreError> {
    let owned = Query::new().eq(OWNER_COLUMN, owner);
    let projects = store.select(Project::TABLE, &owned).await?;
    let posts: Vec<Post> = decode_rows(Post::TABLE, store.select(Post::TABLE, &owned).await?)?;

    Ok(DashboardStats {
        projects: projects.len(),
        posts: posts.len(),
        published_posts: posts.iter().filter(|p| p.published).count(),
    })
}

/// Distinct technologies across `projects`, in first-seen order.
pub fn technologies(projects: &[Project]) -> Vec<String> {
    let mut seen = Vec::new();
    for tech in projects.iter().flat_map(|p| &p.technologies) {
        if !seen.contains(tech) {
            seen.push(tech.clone());
        }
    }
    seen
}

/// Projects using `tech`, or all of them when no technology is selected.
pub fn filter_by_technology<'a>(projects: &'a [Project], tech: Option<&str>) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| tech.map_or(true, |t| p.technologies.iter().any(|pt| pt == t)))
        .collect()
}

/// Skills under one heading on the skills page. `category` is `None` for the
/// trailing group of skills that were entered without one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillGroup {
    pub category: Option<String>,
    pub skills: Vec<String>,
}

/// Group profile skills written as `Category: Skill`, keeping categories in
/// first-seen order. Uncategorised skills form a final group.
pub fn skill_groups(skills: &[String]) -> Vec<SkillGroup> {
    let mut groups: Vec<SkillGroup> = Vec::new();
    let mut loose = Vec::new();

    for entry in skills {
        let parsed = entry
            .split_once(':')
            .map(|(category, skill)| (category.trim(), skill.trim()))
            .filter(|(category, skill)| !category.is_empty() && !skill.is_empty());
        let Some((category, skill)) = parsed else {
            loose.push(entry.trim().to_string());
            continue;
        };
        match groups
            .iter_mut()
            .find(|g| g.category.as_deref() == Some(category))
        {
            Some(group) => group.skills.push(skill.to_string()),
            None => groups.push(SkillGroup {
                category: Some(category.to_string()),
                skills: vec![skill.to_string()],
            }),
        }
    }

    if !loose.is_empty() {
        groups.push(SkillGroup {
            category: None,
            skills: loose,
        });
    }
    groups
}
