//! Template lookup scoped to the requesting user.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::AiError;
use crate::types::Template;

/// Read access to stored templates.
///
/// Implementations must only return a template whose owner matches
/// `owner_id`. A template owned by someone else is reported as `None`.
pub trait TemplateStore: Send + Sync {
    fn get_template(&self, template_id: &str, owner_id: &str)
        -> Result<Option<Template>, AiError>;
}

/// Resolves an optional template id for a user.
#[derive(Clone)]
pub struct TemplateResolver {
    store: Arc<dyn TemplateStore>,
}

impl TemplateResolver {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Resolve a template.
    ///
    /// Absent or blank ids short-circuit without touching the store. A
    /// missing template and one owned by another user are indistinguishable.
    pub fn resolve(
        &self,
        template_id: Option<&str>,
        user_id: &str,
    ) -> Result<Option<Template>, AiError> {
        let Some(id) = template_id.map(str::trim).filter(|id| !id.is_empty()) else {
            return Ok(None);
        };

        let template = self.store.get_template(id, user_id)?;
        Ok(template.filter(|t| t.owner_id == user_id))
    }
}

/// Template store kept in memory. Used by tests and the no-database setup.
#[derive(Default)]
pub struct InMemoryTemplateStore {
    templates: RwLock<HashMap<String, Template>>,
    lookups: AtomicUsize,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, template: Template) {
        if let Ok(mut templates) = self.templates.write() {
            templates.insert(template.id.clone(), template);
        }
    }

    /// Number of `get_template` calls so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl TemplateStore for InMemoryTemplateStore {
    fn get_template(
        &self,
        template_id: &str,
        owner_id: &str,
    ) -> Result<Option<Template>, AiError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let templates = self
            .templates
            .read()
            .map_err(|_| AiError::template_store("template store lock poisoned"))?;
        Ok(templates
            .get(template_id)
            .filter(|t| t.owner_id == owner_id)
            .cloned())
    }
}
