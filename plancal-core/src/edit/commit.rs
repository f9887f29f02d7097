//! Turning editor output into store writes.
//!
//! A cell backed by a post patches that one field. A placeholder cell with
//! text creates a post with the configured defaults. Everything else is a
//! no-op.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{CommitRequest, PlatformCommit};
use crate::error::{PlanCalError, PlanCalResult};
use crate::model::{ContentType, Platform, Post, PostField, PostStatus, PostTarget};

const UNTITLED: &str = "Untitled post";

/// Values given to posts created from an empty sheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDefaults {
    pub company_id: String,
    pub platform: Platform,
    pub status: PostStatus,
    pub content_type: ContentType,
    pub created_by: Option<String>,
}

impl Default for PostDefaults {
    fn default() -> Self {
        PostDefaults {
            company_id: "default".to_string(),
            platform: Platform::default(),
            status: PostStatus::default(),
            content_type: ContentType::default(),
            created_by: None,
        }
    }
}

impl PostDefaults {
    fn new_post(&self, date: chrono::NaiveDate) -> Post {
        let mut post = Post::new(&self.company_id, "", date);
        post.status = self.status;
        post.content_type = self.content_type;
        post.created_by = self.created_by.clone();
        post
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommitPlan {
    /// Nothing to write.
    Skip,
    /// Set `field` of the stored post `id` to `value`, leaving its other
    /// columns as the store has them.
    Patch {
        id: String,
        field: PostField,
        value: String,
    },
    /// Insert `post`, then one planned target per platform.
    Create { post: Post, platforms: Vec<Platform> },
}

/// Decide what a text commit writes. `existing` is the post the cell
/// addresses, if any.
pub fn plan_commit(
    request: &CommitRequest,
    existing: Option<&Post>,
    defaults: &PostDefaults,
) -> PlanCalResult<CommitPlan> {
    let field = request.cell.field;

    if let Some(post) = existing {
        if request.is_unchanged() {
            log::debug!("{} of post {} unchanged", field, post.id);
            return Ok(CommitPlan::Skip);
        }
        // Rejects bad values before anything is sent to the store
        post.clone().set_field(field, &request.draft)?;
        return Ok(CommitPlan::Patch {
            id: post.id.clone(),
            field,
            value: request.draft.clone(),
        });
    }

    if request.draft.trim().is_empty() {
        return Ok(CommitPlan::Skip);
    }

    let mut post = defaults.new_post(request.cell.date);
    post.set_field(field, &request.draft)?;
    if post.title.is_empty() {
        post.title = UNTITLED.to_string();
    }

    Ok(CommitPlan::Create {
        post,
        platforms: vec![defaults.platform],
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlatformPlan {
    Skip,
    /// Bring an existing post's targets in line with the selection.
    /// Targets that stay selected are kept untouched.
    Replace {
        post_id: String,
        remove: Vec<String>,
        add: Vec<PostTarget>,
    },
    Create { post: Post, platforms: Vec<Platform> },
}

/// Decide what a platform commit writes. `targets` are the current targets
/// of `existing`.
pub fn plan_platforms(
    commit: &PlatformCommit,
    existing: Option<&Post>,
    targets: &[PostTarget],
    defaults: &PostDefaults,
) -> PlanCalResult<PlatformPlan> {
    let Some(post) = existing else {
        if commit.platforms.is_empty() {
            return Ok(PlatformPlan::Skip);
        }
        let mut post = defaults.new_post(commit.row.date);
        post.title = UNTITLED.to_string();
        return Ok(PlatformPlan::Create {
            post,
            platforms: commit.platforms.iter().copied().collect(),
        });
    };

    if commit.platforms.is_empty() {
        return Err(PlanCalError::Validation(format!(
            "Post '{}' needs at least one platform",
            post.title
        )));
    }

    let current: BTreeSet<Platform> = targets.iter().map(|t| t.platform).collect();
    if current == commit.platforms {
        return Ok(PlatformPlan::Skip);
    }

    let remove = targets
        .iter()
        .filter(|t| !commit.platforms.contains(&t.platform))
        .map(|t| t.id.clone())
        .collect();
    let add = commit
        .platforms
        .difference(&current)
        .map(|p| PostTarget::planned(&post.id, *p))
        .collect();

    Ok(PlatformPlan::Replace {
        post_id: post.id.clone(),
        remove,
        add,
    })
}
