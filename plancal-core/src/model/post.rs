//! Content calendar posts and their per-platform targets.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{Priority, non_empty};
use crate::bucket::Dated;
use crate::error::{PlanCalError, PlanCalResult};
use crate::local_date::{date_key, format_local_date, parse_local_date};
use crate::store::Record;

string_enum!(
    /// Workflow stage of a post.
    PostStatus {
        Idea => "idea",
        Draft => "draft",
        Design => "design",
        Review => "review",
        Approved => "approved",
        Scheduled => "scheduled",
        Published => "published",
        Reported => "reported",
    }
);

impl Default for PostStatus {
    fn default() -> Self {
        PostStatus::Draft
    }
}

string_enum!(
    ContentType {
        Static => "static",
        Image => "image",
        Video => "video",
        Carousel => "carousel",
        Story => "story",
        Reel => "reel",
        Article => "article",
        Poll => "poll",
    }
);

impl Default for ContentType {
    fn default() -> Self {
        ContentType::Static
    }
}

string_enum!(
    /// Social network a post is published to.
    Platform {
        Facebook => "facebook",
        Instagram => "instagram",
        Twitter => "twitter",
        Linkedin => "linkedin",
        Tiktok => "tiktok",
        Youtube => "youtube",
        Pinterest => "pinterest",
    }
);

impl Default for Platform {
    fn default() -> Self {
        Platform::Facebook
    }
}

string_enum!(
    /// Publishing state of one platform target.
    PlatformStatus {
        Planned => "planned",
        Scheduled => "scheduled",
        Publishing => "publishing",
        Published => "published",
        Failed => "failed",
    }
);

impl Default for PlatformStatus {
    fn default() -> Self {
        PlatformStatus::Planned
    }
}

string_enum!(
    /// Columns of the sheet view that can be edited in place.
    PostField {
        Title => "title",
        Date => "date",
        Description => "description",
        ContentType => "content_type",
        Category => "category",
        Status => "status",
        Time => "time",
        ContentDeadline => "content_deadline",
        GraphicDeadline => "graphic_deadline",
        Owner => "owner",
        Designer => "designer",
        Hashtags => "hashtags",
        VisualConcept => "visual_concept",
        KeyPoints => "key_points",
        MediaBuyingNotes => "media_buying_notes",
        MediaBudget => "media_budget",
        Priority => "priority",
    }
);

/// A planned piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub company_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
    /// Day the post goes out, `YYYY-MM-DD`
    pub planned_date: String,
    /// `HH:MM`
    #[serde(default)]
    pub planned_time: Option<String>,
    #[serde(default)]
    pub content_deadline: Option<String>,
    #[serde(default)]
    pub graphic_deadline: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub designer_name: Option<String>,
    #[serde(default)]
    pub hashtags: Option<String>,
    #[serde(default)]
    pub visual_concept: Option<String>,
    #[serde(default)]
    pub key_points: Option<String>,
    #[serde(default)]
    pub media_buying_notes: Option<String>,
    #[serde(default)]
    pub media_budget: f64,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl Post {
    /// A new, not yet stored post. The store assigns the id.
    pub fn new(company_id: &str, title: &str, planned_date: NaiveDate) -> Self {
        Post {
            id: String::new(),
            company_id: company_id.to_string(),
            title: title.trim().to_string(),
            description: None,
            content_type: ContentType::default(),
            category: None,
            status: PostStatus::default(),
            planned_date: format_local_date(planned_date),
            planned_time: None,
            content_deadline: None,
            graphic_deadline: None,
            owner_name: None,
            designer_name: None,
            hashtags: None,
            visual_concept: None,
            key_points: None,
            media_buying_notes: None,
            media_budget: 0.0,
            priority: Priority::default(),
            created_by: None,
        }
    }

    /// Current display value of a sheet column.
    pub fn field_value(&self, field: PostField) -> String {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        match field {
            PostField::Title => self.title.clone(),
            PostField::Date => self.planned_date.clone(),
            PostField::Description => opt(&self.description),
            PostField::ContentType => self.content_type.to_string(),
            PostField::Category => opt(&self.category),
            PostField::Status => self.status.to_string(),
            PostField::Time => opt(&self.planned_time),
            PostField::ContentDeadline => opt(&self.content_deadline),
            PostField::GraphicDeadline => opt(&self.graphic_deadline),
            PostField::Owner => opt(&self.owner_name),
            PostField::Designer => opt(&self.designer_name),
            PostField::Hashtags => opt(&self.hashtags),
            PostField::VisualConcept => opt(&self.visual_concept),
            PostField::KeyPoints => opt(&self.key_points),
            PostField::MediaBuyingNotes => opt(&self.media_buying_notes),
            PostField::MediaBudget => {
                if self.media_budget == 0.0 {
                    String::new()
                } else {
                    self.media_budget.to_string()
                }
            }
            PostField::Priority => self.priority.to_string(),
        }
    }

    /// Set one column from its text form. Only that column changes.
    ///
    /// The title and the planned date can't be cleared.
    pub fn set_field(&mut self, field: PostField, value: &str) -> PlanCalResult<()> {
        match field {
            PostField::Title => match non_empty(value) {
                Some(title) => self.title = title,
                None => return Err(PlanCalError::Validation("A post needs a title".into())),
            },
            PostField::Date => self.planned_date = format_local_date(parse_local_date(value.trim())?),
            PostField::Description => self.description = non_empty(value),
            PostField::ContentType => self.content_type = value.parse()?,
            PostField::Category => self.category = non_empty(value),
            PostField::Status => self.status = value.parse()?,
            PostField::Time => self.planned_time = parse_time(value)?,
            PostField::ContentDeadline => self.content_deadline = parse_deadline(value)?,
            PostField::GraphicDeadline => self.graphic_deadline = parse_deadline(value)?,
            PostField::Owner => self.owner_name = non_empty(value),
            PostField::Designer => self.designer_name = non_empty(value),
            PostField::Hashtags => self.hashtags = non_empty(value),
            PostField::VisualConcept => self.visual_concept = non_empty(value),
            PostField::KeyPoints => self.key_points = non_empty(value),
            PostField::MediaBuyingNotes => self.media_buying_notes = non_empty(value),
            PostField::MediaBudget => {
                self.media_budget = match non_empty(value) {
                    Some(v) => v.parse().map_err(|_| {
                        PlanCalError::Serialization(format!("Invalid budget '{}'", v))
                    })?,
                    None => 0.0,
                }
            }
            PostField::Priority => self.priority = value.parse()?,
        }
        Ok(())
    }
}

fn parse_deadline(value: &str) -> PlanCalResult<Option<String>> {
    match non_empty(value) {
        Some(v) => Ok(Some(format_local_date(parse_local_date(&v)?))),
        None => Ok(None),
    }
}

fn parse_time(value: &str) -> PlanCalResult<Option<String>> {
    match non_empty(value) {
        Some(v) => {
            let time = NaiveTime::parse_from_str(&v, "%H:%M")
                .map_err(|_| PlanCalError::Serialization(format!("Invalid time '{}'. Expected HH:MM", v)))?;
            Ok(Some(time.format("%H:%M").to_string()))
        }
        None => Ok(None),
    }
}

impl Record for Post {
    const TABLE: &'static str = "posts";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn date(&self) -> Option<&str> {
        Some(&self.planned_date)
    }

    fn label(&self) -> &str {
        &self.title
    }
}

impl Dated for Post {
    fn date_key(&self) -> Option<NaiveDate> {
        date_key(&self.planned_date)
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn is_important(&self) -> bool {
        self.priority.is_important()
    }
}

/// Per-platform sub-state of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostTarget {
    pub id: String,
    pub post_id: String,
    pub platform: Platform,
    #[serde(default)]
    pub platform_status: PlatformStatus,
    #[serde(default)]
    pub publish_at: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub manual_posted_by: Option<String>,
    #[serde(default)]
    pub manual_posted_by_name: Option<String>,
    #[serde(default)]
    pub manual_posted_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PostTarget {
    pub fn planned(post_id: &str, platform: Platform) -> Self {
        PostTarget {
            id: String::new(),
            post_id: post_id.to_string(),
            platform,
            platform_status: PlatformStatus::Planned,
            publish_at: None,
            permalink: None,
            manual_posted_by: None,
            manual_posted_by_name: None,
            manual_posted_at: None,
            notes: None,
        }
    }
}

impl Record for PostTarget {
    const TABLE: &'static str = "post_targets";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn parent_id(&self) -> Option<&str> {
        Some(&self.post_id)
    }

    fn label(&self) -> &str {
        self.platform.as_str()
    }
}
