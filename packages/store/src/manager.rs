//! # Record manager — the dashboard's CRUD state machine
//!
//! Every dashboard screen follows the same shape: load the owner's records, edit a
//! draft, submit it as a create or an update, delete after a confirmation, and
//! re-read the store after each write. [`RecordManager`] holds that state for one
//! record type and drives it against any [`RemoteStore`].
//!
//! ## Cardinality
//!
//! Collections and singletons share the flow but fetch and persist differently, so
//! the difference lives in a policy type named by [`Record::Cardinality`]:
//!
//! | Policy | Cache | Fetch | Persist |
//! |--------|-------|-------|---------|
//! | [`Many`] | `Vec<R>` | rows where `user_id = owner`, newest first | update by `id` when the draft has one, else insert with `user_id` |
//! | [`One`] | `Option<R>` | row where `id = owner`; absence is an empty state | upsert with `id = owner` |
//!
//! Deleting only exists for [`Many`] records, and toggling publication only for
//! [`Post`].
//!
//! ## Owner guard
//!
//! Operations take the owner's id as `Option<&str>`. Without one they return
//! [`Outcome::Skipped`] and touch nothing: the dashboard is only reachable while
//! signed in, so a missing owner means the session ended mid-action.
//!
//! ## After a write
//!
//! The cache is always reloaded from the store. Failures come back as
//! [`ManagerError`] and leave the draft and edit mode in place so the form can be
//! resubmitted.
//!
//! ## Operations in flight
//!
//! A UI cannot hold its state borrowed across an await, so it runs an operation on
//! the copy returned by [`start`](RecordManager::start) and hands the result back to
//! [`finish`](RecordManager::finish). While the copy is out the live manager reports
//! [`is_busy`](RecordManager::is_busy). `finish` always takes the reloaded cache,
//! but takes the copy's form state (edit mode, draft, pending delete) only if the
//! live form was not touched in the meantime.

use std::fmt::Debug;
use std::future::Future;

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ManagerError, StoreError};
use crate::models::Post;
use crate::remote::{decode_rows, encode_row, Filter, Query, RemoteStore, Row, OWNER_COLUMN};

/// A row type the dashboard manages.
pub trait Record: Clone + Debug + PartialEq + Serialize + DeserializeOwned + 'static {
    const TABLE: &'static str;
    /// Column stamped with the write time on every create/update, if the table has one.
    const UPDATED_AT: Option<&'static str> = None;
    type Draft: Draft;
    type Cardinality: Cardinality;

    fn id(&self) -> &str;

    /// A draft holding a full copy of this record.
    fn to_draft(&self) -> Self::Draft;
}

/// Editable form state for a record.
pub trait Draft: Clone + Debug + Default + PartialEq + Serialize + 'static {
    /// Id of the record being edited; `None` for a new record.
    fn id(&self) -> Option<&str>;

    /// Check required fields.
    fn validate(&self) -> Result<(), ManagerError>;
}

/// How a record type is fetched and persisted for its owner.
pub trait Cardinality: Debug + 'static {
    type Cache<R: Record>: Clone + Debug + Default + PartialEq;

    fn fetch<R: Record, S: RemoteStore>(
        store: &S,
        owner: &str,
    ) -> impl Future<Output = Result<Self::Cache<R>, StoreError>>;

    fn persist<R: Record, S: RemoteStore>(
        store: &S,
        owner: &str,
        draft: &R::Draft,
    ) -> impl Future<Output = Result<(), StoreError>>;

    /// Draft to present after a load, for screens that are always a form.
    fn seed<R: Record>(cache: &Self::Cache<R>) -> Option<R::Draft>;
}

/// Owned collection, newest first.
#[derive(Clone, Copy, Debug)]
pub struct Many;

/// One record per owner, keyed by the owner's id.
#[derive(Clone, Copy, Debug)]
pub struct One;

fn payload<R: Record>(draft: &R::Draft) -> Result<Row, StoreError> {
    let mut row = encode_row(R::TABLE, draft)?;
    if let Some(column) = R::UPDATED_AT {
        row.insert(
            column.to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
    }
    Ok(row)
}

impl Cardinality for Many {
    type Cache<R: Record> = Vec<R>;

    async fn fetch<R: Record, S: RemoteStore>(store: &S, owner: &str) -> Result<Vec<R>, StoreError> {
        let query = Query::new().eq(OWNER_COLUMN, owner).newest_first();
        let rows = store.select(R::TABLE, &query).await?;
        decode_rows(R::TABLE, rows)
    }

    async fn persist<R: Record, S: RemoteStore>(
        store: &S,
        owner: &str,
        draft: &R::Draft,
    ) -> Result<(), StoreError> {
        let mut row = payload::<R>(draft)?;
        row.insert(OWNER_COLUMN.to_string(), Value::from(owner));
        match draft.id() {
            Some(id) => store.update(R::TABLE, row, &[Filter::eq("id", id)]).await,
            None => store.insert(R::TABLE, row).await.map(|_| ()),
        }
    }

    fn seed<R: Record>(_cache: &Vec<R>) -> Option<R::Draft> {
        None
    }
}

impl Cardinality for One {
    type Cache<R: Record> = Option<R>;

    async fn fetch<R: Record, S: RemoteStore>(store: &S, owner: &str) -> Result<Option<R>, StoreError> {
        let query = Query::new().eq("id", owner).limit(1);
        let rows = store.select(R::TABLE, &query).await?;
        Ok(decode_rows(R::TABLE, rows)?.into_iter().next())
    }

    async fn persist<R: Record, S: RemoteStore>(
        store: &S,
        owner: &str,
        draft: &R::Draft,
    ) -> Result<(), StoreError> {
        let mut row = payload::<R>(draft)?;
        row.insert("id".to_string(), Value::from(owner));
        store.upsert(R::TABLE, row).await.map(|_| ())
    }

    fn seed<R: Record>(cache: &Option<R>) -> Option<R::Draft> {
        cache.as_ref().map(Record::to_draft)
    }
}

/// Whether an operation reached the store.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Nothing to do: no owner, or no pending confirmation.
    Skipped,
}

type CacheOf<R> = <<R as Record>::Cardinality as Cardinality>::Cache<R>;

/// Dashboard state for one record type.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordManager<R: Record> {
    records: CacheOf<R>,
    editing: bool,
    draft: R::Draft,
    pending_delete: Option<String>,
    /// Bumped by every form mutation made through the public API.
    revision: u64,
    busy: bool,
}

impl<R: Record> Default for RecordManager<R> {
    fn default() -> Self {
        Self {
            records: Default::default(),
            editing: false,
            draft: Default::default(),
            pending_delete: None,
            revision: 0,
            busy: false,
        }
    }
}

impl<R: Record> RecordManager<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached records as last loaded from the store.
    pub fn records(&self) -> &CacheOf<R> {
        &self.records
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    /// Mutable access for form bindings.
    pub fn draft_mut(&mut self) -> &mut R::Draft {
        self.touch();
        &mut self.draft
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Whether an operation started with [`start`](Self::start) has not finished yet.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Mark an operation in flight and return the copy to run it on.
    pub fn start(&mut self) -> Self {
        self.busy = true;
        self.clone()
    }

    /// Take back the copy an operation ran on.
    pub fn finish(&mut self, done: Self) {
        let form_untouched = self.revision == done.revision;
        self.records = done.records;
        if form_untouched {
            self.editing = done.editing;
            self.draft = done.draft;
            self.pending_delete = done.pending_delete;
        }
        self.busy = false;
    }

    /// Fetch the owner's records into the cache.
    pub async fn load<S: RemoteStore>(
        &mut self,
        store: &S,
        owner: Option<&str>,
    ) -> Result<Outcome, ManagerError> {
        let Some(owner) = owner else {
            return Ok(Outcome::Skipped);
        };
        let records = R::Cardinality::fetch::<R, S>(store, owner).await?;
        if !self.editing {
            if let Some(draft) = R::Cardinality::seed::<R>(&records) {
                self.draft = draft;
            }
        }
        self.records = records;
        Ok(Outcome::Applied)
    }

    /// Start a new record from an empty draft.
    pub fn begin_create(&mut self) {
        self.touch();
        self.draft = R::Draft::default();
        self.editing = true;
    }

    /// Start editing a copy of `record`.
    pub fn begin_edit(&mut self, record: &R) {
        self.touch();
        self.draft = record.to_draft();
        self.editing = true;
    }

    /// Leave edit mode, discarding the draft.
    pub fn cancel(&mut self) {
        self.touch();
        self.draft = R::Draft::default();
        self.editing = false;
    }

    /// Create or update from the draft, then reload.
    pub async fn submit<S: RemoteStore>(
        &mut self,
        store: &S,
        owner: Option<&str>,
    ) -> Result<Outcome, ManagerError> {
        self.draft.validate()?;
        let Some(owner) = owner else {
            return Ok(Outcome::Skipped);
        };

        tracing::debug!(table = R::TABLE, id = ?self.draft.id(), "submitting draft");
        R::Cardinality::persist::<R, S>(store, owner, &self.draft).await?;

        self.editing = false;
        self.draft = R::Draft::default();
        self.load(store, Some(owner)).await
    }
}

impl<R: Record<Cardinality = Many>> RecordManager<R> {
    /// Stage a delete. Nothing is written until [`confirm_delete`](Self::confirm_delete).
    pub fn request_delete(&mut self, id: &str) {
        self.touch();
        self.pending_delete = Some(id.to_string());
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn cancel_delete(&mut self) {
        self.touch();
        self.pending_delete = None;
    }

    /// Delete the staged record, then reload.
    pub async fn confirm_delete<S: RemoteStore>(
        &mut self,
        store: &S,
        owner: Option<&str>,
    ) -> Result<Outcome, ManagerError> {
        let (Some(owner), Some(id)) = (owner, self.pending_delete.clone()) else {
            return Ok(Outcome::Skipped);
        };

        tracing::debug!(table = R::TABLE, %id, "deleting record");
        store.delete(R::TABLE, &[Filter::eq("id", id.as_str())]).await?;
        self.pending_delete = None;
        self.load(store, Some(owner)).await
    }
}

impl RecordManager<Post> {
    /// Flip a post's `published` flag, then reload.
    pub async fn toggle_published<S: RemoteStore>(
        &mut self,
        store: &S,
        owner: Option<&str>,
        post: &Post,
    ) -> Result<Outcome, ManagerError> {
        let Some(owner) = owner else {
            return Ok(Outcome::Skipped);
        };

        let mut patch = Row::new();
        patch.insert("published".to_string(), Value::Bool(!post.published));
        patch.insert(OWNER_COLUMN.to_string(), Value::from(owner));
        store
            .update(Post::TABLE, patch, &[Filter::eq("id", post.id.as_str())])
            .await?;
        self.load(store, Some(owner)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PostDraft, Profile, Project};
    use crate::MemoryStore;
    use serde_json::json;

    const OWNER: Option<&str> = Some("user-1");

    async fn seed_post(store: &MemoryStore, owner: &str, title: &str, created_at: &str) -> String {
        let row = json!({
            "user_id": owner,
            "title": title,
            "content": "body",
            "excerpt": "",
            "published": false,
            "created_at": created_at,
        });
        let Value::Object(row) = row else { unreachable!() };
        let stored = store.insert("posts", row).await.unwrap();
        stored["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_adds_one_owned_record() {
        let store = MemoryStore::new();
        let mut projects = RecordManager::<Project>::new();

        projects.begin_create();
        assert!(projects.is_editing());
        let draft = projects.draft_mut();
        draft.title = "Folio".into();
        draft.description = "Portfolio site".into();
        draft.set_technologies("Rust, Dioxus, ");

        let outcome = projects.submit(&store, OWNER).await.unwrap();
        assert_eq!(outcome, Outcome::Applied);
        assert!(!projects.is_editing());
        assert_eq!(projects.draft(), &Default::default());

        assert_eq!(store.len("projects"), 1);
        let listed = projects.records();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Folio");
        assert_eq!(listed[0].user_id, "user-1");
        assert_eq!(listed[0].technologies, vec!["Rust", "Dioxus"]);
        assert!(!listed[0].id.is_empty());
    }

    #[tokio::test]
    async fn test_edit_updates_in_place() {
        let store = MemoryStore::new();
        let mut projects = RecordManager::<Project>::new();
        for title in ["First", "Second"] {
            projects.begin_create();
            projects.draft_mut().title = title.into();
            projects.draft_mut().description = "d".into();
            let _ = projects.submit(&store, OWNER).await.unwrap();
        }

        let second = projects.records()[0].clone();
        assert_eq!(second.title, "Second");
        projects.begin_edit(&second);
        assert_eq!(projects.draft().id.as_deref(), Some(second.id.as_str()));
        projects.draft_mut().title = "Second, revised".into();
        let _ = projects.submit(&store, OWNER).await.unwrap();

        assert_eq!(projects.records().len(), 2);
        let updated = &projects.records()[0];
        assert_eq!(updated.id, second.id);
        assert_eq!(updated.title, "Second, revised");
        assert_eq!(updated.created_at, second.created_at);
    }

    #[tokio::test]
    async fn test_submit_requires_fields_and_owner() {
        let store = MemoryStore::new();
        let mut posts = RecordManager::<Post>::new();

        posts.begin_create();
        posts.draft_mut().title = "Only a title".into();
        let err = posts.submit(&store, OWNER).await.unwrap_err();
        assert!(matches!(err, ManagerError::Missing { field: "content" }));
        assert!(posts.is_editing());

        posts.draft_mut().content = "Body".into();
        let outcome = posts.submit(&store, None).await.unwrap();
        assert_eq!(outcome, Outcome::Skipped);
        assert_eq!(store.len("posts"), 0);
        assert!(posts.is_editing());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_draft_for_retry() {
        let store = MemoryStore::new();
        let mut posts = RecordManager::<Post>::new();
        posts.begin_create();
        posts.draft_mut().title = "Draft".into();
        posts.draft_mut().content = "Body".into();

        store.fail_writes(true);
        let err = posts.submit(&store, OWNER).await.unwrap_err();
        assert!(matches!(err, ManagerError::Store(StoreError::Unavailable(_))));
        assert!(posts.is_editing());
        assert_eq!(posts.draft().title, "Draft");

        store.fail_writes(false);
        assert_eq!(posts.submit(&store, OWNER).await.unwrap(), Outcome::Applied);
        assert_eq!(posts.records().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let store = MemoryStore::new();
        let keep = seed_post(&store, "user-1", "keep", "2024-01-01T00:00:00Z").await;
        let doomed = seed_post(&store, "user-1", "doomed", "2024-02-01T00:00:00Z").await;

        let mut posts = RecordManager::<Post>::new();
        let _ = posts.load(&store, OWNER).await.unwrap();

        posts.request_delete(&doomed);
        assert_eq!(posts.pending_delete(), Some(doomed.as_str()));
        posts.cancel_delete();
        assert_eq!(posts.confirm_delete(&store, OWNER).await.unwrap(), Outcome::Skipped);
        assert_eq!(store.len("posts"), 2);

        posts.request_delete(&doomed);
        assert_eq!(store.len("posts"), 2);
        assert_eq!(posts.confirm_delete(&store, OWNER).await.unwrap(), Outcome::Applied);

        assert_eq!(store.len("posts"), 1);
        assert!(posts.pending_delete().is_none());
        let ids: Vec<_> = posts.records().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![keep]);
    }

    #[tokio::test]
    async fn test_load_is_owner_scoped_and_newest_first() {
        let store = MemoryStore::new();
        seed_post(&store, "user-1", "older", "2024-01-01T00:00:00Z").await;
        seed_post(&store, "user-2", "someone else", "2024-03-01T00:00:00Z").await;
        seed_post(&store, "user-1", "newer", "2024-02-01T00:00:00Z").await;

        let mut posts = RecordManager::<Post>::new();
        assert_eq!(posts.load(&store, None).await.unwrap(), Outcome::Skipped);
        assert!(posts.records().is_empty());

        let _ = posts.load(&store, OWNER).await.unwrap();
        let titles: Vec<_> = posts.records().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn test_post_scenario_create_then_toggle() {
        let store = MemoryStore::new();
        let mut posts = RecordManager::<Post>::new();

        posts.begin_create();
        let draft = posts.draft_mut();
        draft.title = "A".into();
        draft.content = "B".into();
        draft.published = false;
        let _ = posts.submit(&store, OWNER).await.unwrap();

        assert_eq!(store.len("posts"), 1);
        let created = posts.records()[0].clone();
        assert!(!created.published);

        let _ = posts.toggle_published(&store, OWNER, &created).await.unwrap();
        let toggled = posts.records()[0].clone();
        assert!(toggled.published);
        assert_eq!(toggled.id, created.id);
        assert_eq!(toggled.title, "A");
        assert_eq!(toggled.content, "B");
        assert_eq!(toggled.updated_at, created.updated_at);
        assert_eq!(toggled.created_at, created.created_at);

        let _ = posts.toggle_published(&store, OWNER, &toggled).await.unwrap();
        assert!(!posts.records()[0].published);
    }

    #[tokio::test]
    async fn test_profile_is_a_singleton() {
        let store = MemoryStore::new();
        let mut profile = RecordManager::<Profile>::new();

        // No profile yet is an empty state, not an error.
        assert_eq!(profile.load(&store, OWNER).await.unwrap(), Outcome::Applied);
        assert!(profile.records().is_none());

        profile.draft_mut().full_name = "Ada Lovelace".into();
        profile.draft_mut().set_skills("Rust, , Analysis");
        let _ = profile.submit(&store, OWNER).await.unwrap();

        let saved = profile.records().clone().unwrap();
        assert_eq!(saved.id, "user-1");
        assert_eq!(saved.skills, vec!["Rust", "Analysis"]);
        assert!(saved.updated_at.is_some());
        // The form is re-seeded from the stored profile.
        assert_eq!(profile.draft().full_name, "Ada Lovelace");

        profile.draft_mut().bio = "First programmer".into();
        let _ = profile.submit(&store, OWNER).await.unwrap();
        assert_eq!(store.len("profiles"), 1);
        assert_eq!(profile.records().as_ref().unwrap().bio, "First programmer");
    }

    #[tokio::test]
    async fn test_edits_made_while_loading_survive_finish() {
        let store = MemoryStore::new();
        seed_post(&store, "user-1", "existing", "2024-01-01T00:00:00Z").await;

        let mut live = RecordManager::<Post>::new();
        let mut copy = live.start();
        assert!(live.is_busy());

        live.begin_create();
        live.draft_mut().title = "typed while loading".into();

        let _ = copy.load(&store, OWNER).await.unwrap();
        live.finish(copy);

        assert!(!live.is_busy());
        assert!(live.is_editing());
        assert_eq!(live.draft().title, "typed while loading");
        assert_eq!(live.records().len(), 1);
    }

    #[tokio::test]
    async fn test_finish_applies_form_state_when_untouched() {
        let store = MemoryStore::new();
        let mut live = RecordManager::<Post>::new();
        live.begin_create();
        live.draft_mut().title = "A".into();
        live.draft_mut().content = "B".into();

        let mut copy = live.start();
        let _ = copy.submit(&store, OWNER).await.unwrap();
        live.finish(copy);

        assert!(!live.is_editing());
        assert_eq!(live.draft(), &PostDraft::default());
        assert_eq!(live.records().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_staged_during_toggle_is_kept() {
        let store = MemoryStore::new();
        let first = seed_post(&store, "user-1", "first", "2024-01-01T00:00:00Z").await;
        let mut live = RecordManager::<Post>::new();
        let _ = live.load(&store, OWNER).await.unwrap();
        let post = live.records()[0].clone();

        let mut copy = live.start();
        live.request_delete(&first);
        let _ = copy.toggle_published(&store, OWNER, &post).await.unwrap();
        live.finish(copy);

        assert_eq!(live.pending_delete(), Some(first.as_str()));
        assert!(live.records()[0].published);
    }
}
