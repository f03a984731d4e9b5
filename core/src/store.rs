//! The todo synchronization store.
//!
//! # Design
//! `TodoStore` owns the combined filter/sort/pagination state plus two
//! independently fetched views: `items` (the current server-ordered page)
//! and `all_items` (an unfiltered, bounded snapshot feeding the metrics
//! view). The four mutations (create/update/toggle/delete) apply their
//! change to both views optimistically, then either swap in the server's
//! authoritative record or restore an exact pre-mutation snapshot when the
//! call fails.
//!
//! Every operation takes `&mut self` for the full round-trip, so two
//! fetches can never be in flight at once and a stale response can never
//! overwrite a newer one; no request-generation bookkeeping is required.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::api::{PageQuery, TodoApi};
use crate::client::LIST_ALL_MAX;
use crate::error::ApiError;
use crate::metrics::CompletionMetrics;
use crate::types::{
    CreateTodo, Priority, SortDir, SortKey, Sorting, Todo, TodoFilters, TodoId, UpdateTodo,
};

/// Page sizes the store accepts; other values are ignored.
pub const PAGE_SIZES: [u32; 5] = [5, 10, 20, 50, 100];

/// Client-side state for the todo listing, synchronized against a remote
/// `TodoApi`.
///
/// Construct with [`TodoStore::new`], then call [`refresh`](Self::refresh)
/// for the initial load. Setters re-fetch both views, mirroring the
/// dependency-triggered reloads of the UI layer.
pub struct TodoStore<A> {
    api: A,
    page: u32,
    page_size: u32,
    total_pages: u32,
    filters: TodoFilters,
    sorting: Sorting,
    items: Vec<Todo>,
    all_items: Vec<Todo>,
    loading: bool,
    error: Option<String>,
}

impl<A: TodoApi> TodoStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            page: 1,
            page_size: PAGE_SIZES[0],
            total_pages: 1,
            filters: TodoFilters::default(),
            sorting: Sorting::default(),
            items: Vec::new(),
            all_items: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Server-reported page count, clamped to at least 1.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn filters(&self) -> &TodoFilters {
        &self.filters
    }

    pub fn sorting(&self) -> Sorting {
        self.sorting
    }

    /// The current page, server-ordered and server-filtered.
    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    /// The bounded unfiltered snapshot backing the metrics view.
    pub fn all_items(&self) -> &[Todo] {
        &self.all_items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed page fetch, cleared on the next attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Completion-time metrics over the unfiltered snapshot.
    pub fn metrics(&self) -> CompletionMetrics {
        CompletionMetrics::compute(&self.all_items)
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
        self.refresh();
    }

    /// Ignores sizes outside [`PAGE_SIZES`].
    pub fn set_page_size(&mut self, size: u32) {
        if !PAGE_SIZES.contains(&size) {
            return;
        }
        self.page_size = size;
        self.refresh();
    }

    pub fn set_filters(&mut self, filters: TodoFilters) {
        self.filters = filters;
        self.refresh();
    }

    pub fn set_sorting(&mut self, sorting: Sorting) {
        self.sorting = sorting;
        self.refresh();
    }

    /// Reload both the current page and the metrics snapshot.
    pub fn refresh(&mut self) {
        self.fetch_page();
        self.fetch_all();
    }

    /// Fetch the current page. Failures are captured into [`error`](Self::error)
    /// rather than returned; `items` keeps its previous content so the UI can
    /// render stale rows next to the error state.
    pub fn fetch_page(&mut self) {
        self.loading = true;
        self.error = None;
        if let Err(e) = self.fetch_page_converging() {
            warn!(error = %e, "page fetch failed");
            self.error = Some(e.to_string());
        }
        self.loading = false;
    }

    /// Fetch until the page index is valid for the server-reported total.
    ///
    /// When the dataset shrank under us the requested page may exceed the
    /// total; stale rows are cleared immediately and the page is clamped to
    /// the last valid one before refetching. The loop terminates because the
    /// page index strictly decreases on every retry — with a stable total
    /// that is at most one extra round-trip.
    fn fetch_page_converging(&mut self) -> Result<(), ApiError> {
        loop {
            let query = self.page_query();
            debug!(page = query.page, size = query.size, "fetching todo page");
            let response = self.api.list_page(&query)?;
            let total = response.total_pages.map_or(1, |tp| tp.max(1));
            self.total_pages = total;
            if self.page > total {
                self.items.clear();
                self.page = total;
                continue;
            }
            self.items = response.content;
            return Ok(());
        }
    }

    /// Refetch the metrics snapshot. Best-effort: failures are logged and
    /// swallowed, leaving the previous (possibly stale) data in place.
    pub fn fetch_all(&mut self) {
        match self.api.list_all(LIST_ALL_MAX) {
            Ok(todos) => self.all_items = todos,
            Err(e) => warn!(error = %e, "metrics fetch failed, keeping stale data"),
        }
    }

    /// Create a todo optimistically.
    ///
    /// A `tmp-`-prefixed placeholder appears in both views immediately and is
    /// swapped for the server's record on success, or removed again on
    /// failure before the error is re-raised.
    pub fn create_todo(&mut self, payload: CreateTodo) -> Result<Todo, ApiError> {
        let now = Utc::now();
        let temp_id = TodoId::Text(format!("tmp-{}", now.timestamp_millis()));
        let optimistic = Todo {
            id: temp_id.clone(),
            title: payload.title.clone(),
            description: None,
            priority: payload.priority.unwrap_or(Priority::Medium),
            done: false,
            done_date: None,
            created_at: now,
            updated_at: now,
            due_date: payload.due_date,
        };

        // Newest-first creation order is the only sort the client can
        // reproduce locally; for any other sort the row lands at the end
        // until the next fetch.
        let newest_first = self.sorting.key == SortKey::CreatedAt && self.sorting.dir == SortDir::Desc;
        if newest_first {
            self.items.insert(0, optimistic.clone());
        } else {
            self.items.push(optimistic.clone());
        }
        self.all_items.insert(0, optimistic);

        match self.api.create_todo(&payload) {
            Ok(saved) => {
                replace_by_id(&mut self.items, &temp_id, &saved);
                replace_by_id(&mut self.all_items, &temp_id, &saved);
                Ok(saved)
            }
            Err(e) => {
                self.items.retain(|t| t.id != temp_id);
                self.all_items.retain(|t| t.id != temp_id);
                Err(e)
            }
        }
    }

    /// Apply `patch` optimistically to the matching record in both views,
    /// then reconcile with the server: its record replaces the merge on
    /// success, the pre-call snapshots come back on failure.
    pub fn update_todo(&mut self, id: &TodoId, patch: UpdateTodo) -> Result<Todo, ApiError> {
        let snapshot_items = self.items.clone();
        let snapshot_all = self.all_items.clone();

        let now = Utc::now();
        apply_patch(&mut self.items, id, &patch, now);
        apply_patch(&mut self.all_items, id, &patch, now);

        match self.api.update_todo(id, &patch) {
            Ok(saved) => {
                replace_by_id(&mut self.items, id, &saved);
                replace_by_id(&mut self.all_items, id, &saved);
                Ok(saved)
            }
            Err(e) => {
                self.items = snapshot_items;
                self.all_items = snapshot_all;
                Err(e)
            }
        }
    }

    /// Flip completion state with the same snapshot/rollback discipline as
    /// [`update_todo`](Self::update_todo). `done_date` is set alongside
    /// `done` so the invariant holds even before the server answers.
    pub fn toggle_done(&mut self, id: &TodoId, done: bool) -> Result<Todo, ApiError> {
        let snapshot_items = self.items.clone();
        let snapshot_all = self.all_items.clone();

        let now = Utc::now();
        let done_date = done.then_some(now);
        for list in [&mut self.items, &mut self.all_items] {
            for item in list.iter_mut().filter(|t| t.id == *id) {
                item.done = done;
                item.done_date = done_date;
                item.updated_at = now;
            }
        }

        match self.api.toggle_done(id, done) {
            Ok(saved) => {
                replace_by_id(&mut self.items, id, &saved);
                replace_by_id(&mut self.all_items, id, &saved);
                Ok(saved)
            }
            Err(e) => {
                self.items = snapshot_items;
                self.all_items = snapshot_all;
                Err(e)
            }
        }
    }

    /// Delete a todo optimistically. Removing the sole row of a page past
    /// the first steps back one page and reloads, so the user is not left
    /// staring at an empty page.
    pub fn remove_todo(&mut self, id: &TodoId) -> Result<(), ApiError> {
        let snapshot_items = self.items.clone();
        let snapshot_all = self.all_items.clone();
        let sole_item_on_page = self.items.len() == 1;

        self.items.retain(|t| t.id != *id);
        self.all_items.retain(|t| t.id != *id);

        match self.api.delete_todo(id) {
            Ok(()) => {
                if sole_item_on_page && self.page > 1 {
                    self.page -= 1;
                    self.refresh();
                }
                Ok(())
            }
            Err(e) => {
                self.items = snapshot_items;
                self.all_items = snapshot_all;
                Err(e)
            }
        }
    }

    fn page_query(&self) -> PageQuery {
        let filters = self.filters.normalized();
        PageQuery {
            page: self.page,
            size: self.page_size,
            sorting: self.sorting,
            text: filters.text,
            priority: filters.priority,
            done: filters.done,
        }
    }
}

fn replace_by_id(list: &mut [Todo], id: &TodoId, replacement: &Todo) {
    for item in list {
        if item.id == *id {
            *item = replacement.clone();
        }
    }
}

fn apply_patch(list: &mut [Todo], id: &TodoId, patch: &UpdateTodo, now: DateTime<Utc>) {
    for item in list {
        if item.id == *id {
            if let Some(title) = &patch.title {
                item.title = title.clone();
            }
            if let Some(priority) = patch.priority {
                item.priority = priority;
            }
            if let Some(due_date) = patch.due_date {
                item.due_date = Some(due_date);
            }
            item.updated_at = now;
        }
    }
}
