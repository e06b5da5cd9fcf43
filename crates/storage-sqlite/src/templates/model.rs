//! Database models for prompt templates.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use quill_ai::Template;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, StorageError};
use crate::schema::prompt_templates;

/// Maximum template name length, in characters.
pub const MAX_TEMPLATE_NAME_CHARS: usize = 120;

/// Database model for prompt templates.
#[derive(
    Debug, Clone, Queryable, Identifiable, Insertable, AsChangeset, Selectable, Serialize, Deserialize,
)]
#[diesel(table_name = prompt_templates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PromptTemplateDB {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub template_content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PromptTemplateDB> for Template {
    fn from(db: PromptTemplateDB) -> Self {
        Template {
            id: db.id,
            owner_id: db.owner_id,
            name: db.name,
            content: db.template_content,
        }
    }
}

/// Template with its timestamps, as listed to the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplateRecord {
    pub id: String,
    pub name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PromptTemplateDB> for PromptTemplateRecord {
    fn from(db: PromptTemplateDB) -> Self {
        PromptTemplateRecord {
            created_at: parse_timestamp(&db.created_at),
            updated_at: parse_timestamp(&db.updated_at),
            id: db.id,
            name: db.name,
            content: db.template_content,
        }
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Input for creating a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPromptTemplate {
    pub name: String,
    /// May be empty.
    #[serde(default)]
    pub content: String,
}

impl NewPromptTemplate {
    pub fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(StorageError::InvalidInput(
                "Template name must not be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_TEMPLATE_NAME_CHARS {
            return Err(StorageError::InvalidInput(format!(
                "Template name must be at most {} characters",
                MAX_TEMPLATE_NAME_CHARS
            )));
        }
        Ok(())
    }

    pub(crate) fn into_db(self, id: String, owner_id: &str, now: DateTime<Utc>) -> PromptTemplateDB {
        let timestamp = now.to_rfc3339();
        PromptTemplateDB {
            id,
            owner_id: owner_id.to_string(),
            name: self.name.trim().to_string(),
            template_content: self.content,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        }
    }
}
