//! Repository for prompt templates.
//!
//! Every query is scoped by owner. A template owned by someone else behaves
//! exactly like one that does not exist.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use quill_ai::{AiError, Template, TemplateStore};

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::Result;
use crate::schema::prompt_templates;

use super::model::{NewPromptTemplate, PromptTemplateDB, PromptTemplateRecord};

/// SQLite implementation of the template store.
pub struct PromptTemplateRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PromptTemplateRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Create a template owned by `owner_id`.
    pub async fn create(
        &self,
        owner_id: &str,
        input: NewPromptTemplate,
    ) -> Result<PromptTemplateRecord> {
        input.validate()?;
        let row = input.into_db(Uuid::now_v7().to_string(), owner_id, Utc::now());

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PromptTemplateRecord> {
                diesel::insert_into(prompt_templates::table)
                    .values(&row)
                    .execute(conn)?;
                debug!("Created prompt template {}", row.id);
                Ok(row.into())
            })
            .await
    }

    /// All templates of one owner, newest first.
    pub fn list_for_owner(&self, owner_id: &str) -> Result<Vec<PromptTemplateRecord>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = prompt_templates::table
            .filter(prompt_templates::owner_id.eq(owner_id))
            .order((
                prompt_templates::created_at.desc(),
                prompt_templates::id.desc(),
            ))
            .load::<PromptTemplateDB>(&mut conn)?;

        Ok(rows.into_iter().map(PromptTemplateRecord::from).collect())
    }

    /// Look up a template by id, visible only to its owner.
    pub fn get_for_owner(&self, template_id: &str, owner_id: &str) -> Result<Option<Template>> {
        let mut conn = get_connection(&self.pool)?;

        let row = prompt_templates::table
            .filter(prompt_templates::id.eq(template_id))
            .filter(prompt_templates::owner_id.eq(owner_id))
            .first::<PromptTemplateDB>(&mut conn)
            .optional()?;

        Ok(row.map(Template::from))
    }

    /// Delete a template. Returns false when the owner has no such template.
    pub async fn delete(&self, template_id: &str, owner_id: &str) -> Result<bool> {
        let template_id = template_id.to_string();
        let owner_id = owner_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                let deleted = diesel::delete(
                    prompt_templates::table
                        .filter(prompt_templates::id.eq(&template_id))
                        .filter(prompt_templates::owner_id.eq(&owner_id)),
                )
                .execute(conn)?;
                Ok(deleted > 0)
            })
            .await
    }
}

impl TemplateStore for PromptTemplateRepository {
    fn get_template(
        &self,
        template_id: &str,
        owner_id: &str,
    ) -> std::result::Result<Option<Template>, AiError> {
        self.get_for_owner(template_id, owner_id).map_err(AiError::from)
    }
}
