use client_core::ClientError;
use pagination::{Page, PageRequest, SortDirection, DEFAULT_PAGE_SIZE};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{CreatePart, Part, PartType, PartsApi, UpdatePart};

/// Mutable store state. Locked only across synchronous sections; every
/// network await happens with the lock released.
#[derive(Debug)]
struct PartsState {
    page: Page<Part>,
    search_results: Vec<Part>,
    type_results: Vec<Part>,
    is_loading: bool,
    error: Option<String>,
    selected_type: Option<PartType>,
    search_query: String,
    page_size: u32,
    sort_field: Option<String>,
    sort_direction: SortDirection,
}

impl Default for PartsState {
    fn default() -> Self {
        Self {
            page: Page::empty(DEFAULT_PAGE_SIZE),
            search_results: Vec::new(),
            type_results: Vec::new(),
            is_loading: false,
            error: None,
            selected_type: None,
            search_query: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            sort_field: None,
            sort_direction: SortDirection::Asc,
        }
    }
}

/// Stateful view over the parts collection.
///
/// Holds the current server page, the search/type-filter side buffers and
/// the derived visible list. Three query modes exist: plain pagination
/// (the only mode that maintains the pagination counters), a type filter
/// and a free-text search; search wins over filter, filter over pagination.
///
/// Overlapping fetches are serialized by outcome, not by waiting: every
/// fetch takes a generation ticket and a completion whose ticket is no
/// longer current is discarded, so a slow earlier response can never
/// overwrite a newer one.
pub struct PartsStore {
    api: PartsApi,
    state: RwLock<PartsState>,
    fetch_generation: AtomicU64,
}

impl PartsStore {
    pub fn new(api: PartsApi) -> Self {
        Self {
            api,
            state: RwLock::new(PartsState::default()),
            fetch_generation: AtomicU64::new(0),
        }
    }

    // ---- fetching ----

    /// Load one server page with the current sort settings.
    ///
    /// This is the canonical load: it replaces the held page and is the only
    /// path that updates the pagination counters.
    pub async fn fetch_all(&self, page: u32) {
        let generation = self.begin_fetch();
        let request = {
            let mut state = self.state.write();
            state.is_loading = true;
            state.error = None;
            let mut request = PageRequest::new(page, state.page_size);
            if let Some(field) = &state.sort_field {
                request = request.sorted_by(field.clone(), state.sort_direction);
            }
            request
        };

        let result = self.api.list(&request).await;

        let mut state = self.state.write();
        if !self.is_current(generation) {
            return;
        }
        state.is_loading = false;
        match result {
            Ok(page) => state.page = page,
            Err(e) => state.error = Some(fetch_message("Failed to load parts", &e)),
        }
    }

    /// Load the type-filter side buffer.
    pub async fn fetch_by_type(&self, part_type: PartType) {
        let generation = self.begin_fetch();
        {
            let mut state = self.state.write();
            state.is_loading = true;
            state.error = None;
        }

        let result = self.api.by_type(part_type).await;

        let mut state = self.state.write();
        if !self.is_current(generation) {
            return;
        }
        state.is_loading = false;
        match result {
            Ok(items) => state.type_results = items,
            Err(e) => state.error = Some(fetch_message("Failed to load parts", &e)),
        }
    }

    /// Run a server-side search and make it the active query mode.
    pub async fn search(&self, query: &str) {
        let generation = self.begin_fetch();
        {
            let mut state = self.state.write();
            state.search_query = query.to_string();
            state.is_loading = true;
            state.error = None;
        }

        let result = self.api.search(query).await;

        let mut state = self.state.write();
        if !self.is_current(generation) {
            return;
        }
        state.is_loading = false;
        match result {
            Ok(items) => state.search_results = items,
            Err(e) => state.error = Some(fetch_message("Search failed", &e)),
        }
    }

    /// Leave search mode; falls back to the type filter when one is set,
    /// else to the first plain page.
    pub async fn clear_search(&self) {
        let selected = {
            let mut state = self.state.write();
            state.search_query.clear();
            state.search_results.clear();
            state.selected_type
        };
        match selected {
            Some(part_type) => self.fetch_by_type(part_type).await,
            None => self.fetch_all(0).await,
        }
    }

    /// Set or clear the type filter. While a search is active only the
    /// narrowing changes; the filter fetch is deferred until search ends.
    pub async fn set_type_filter(&self, part_type: Option<PartType>) {
        let search_active = {
            let mut state = self.state.write();
            state.selected_type = part_type;
            !state.search_query.is_empty()
        };
        if search_active {
            return;
        }
        match part_type {
            Some(part_type) => self.fetch_by_type(part_type).await,
            None => self.fetch_all(0).await,
        }
    }

    pub async fn next_page(&self) {
        let next = {
            let state = self.state.read();
            state.page.has_next().then(|| state.page.page_number + 1)
        };
        if let Some(page) = next {
            self.fetch_all(page).await;
        }
    }

    pub async fn previous_page(&self) {
        let previous = {
            let state = self.state.read();
            state
                .page
                .has_previous()
                .then(|| state.page.page_number - 1)
        };
        if let Some(page) = previous {
            self.fetch_all(page).await;
        }
    }

    /// Cycle the sort state for `field`: unsorted → ascending → descending →
    /// unsorted. A different field restarts at ascending. Every transition
    /// refetches from page 0.
    pub async fn toggle_sort(&self, field: &str) {
        {
            let mut state = self.state.write();
            if state.sort_field.as_deref() == Some(field) {
                match state.sort_direction {
                    SortDirection::Asc => state.sort_direction = SortDirection::Desc,
                    SortDirection::Desc => {
                        state.sort_field = None;
                        state.sort_direction = SortDirection::Asc;
                    }
                }
            } else {
                state.sort_field = Some(field.to_string());
                state.sort_direction = SortDirection::Asc;
            }
        }
        self.fetch_all(0).await;
    }

    // ---- mutations ----

    /// Create a part, then refetch the active query mode so the visible list
    /// reflects server state (never a local append; the server fills in
    /// identity and timestamps).
    pub async fn create(&self, part: &CreatePart) -> Result<Part, ClientError> {
        match self.api.create(part).await {
            Ok(created) => {
                tracing::debug!(id = created.id, "part created");
                self.refetch_active().await;
                Ok(created)
            }
            Err(e) => {
                self.store_mutation_error("Failed to create part", &e);
                Err(e)
            }
        }
    }

    /// Update a part and patch the held page in place by identity.
    pub async fn update(&self, id: i64, patch: &UpdatePart) -> Result<Part, ClientError> {
        match self.api.update(id, patch).await {
            Ok(updated) => {
                let mut state = self.state.write();
                if let Some(existing) = state.page.content.iter_mut().find(|p| p.id == id) {
                    *existing = updated.clone();
                }
                Ok(updated)
            }
            Err(e) => {
                self.store_mutation_error("Failed to update part", &e);
                Err(e)
            }
        }
    }

    /// Delete a part, then re-run whichever fetch mode is currently active.
    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        match self.api.delete(id).await {
            Ok(()) => {
                tracing::debug!(id, "part deleted");
                self.refetch_active().await;
                Ok(())
            }
            Err(e) => {
                self.store_mutation_error("Failed to delete part", &e);
                Err(e)
            }
        }
    }

    // ---- derived views & accessors ----

    /// The collection a view should render right now: search results
    /// (narrowed by the type filter when both are set), else the type-filter
    /// buffer, else the current page.
    pub fn visible(&self) -> Vec<Part> {
        let state = self.state.read();
        if !state.search_query.is_empty() {
            if let Some(part_type) = state.selected_type {
                return state
                    .search_results
                    .iter()
                    .filter(|p| p.part_type == part_type)
                    .cloned()
                    .collect();
            }
            return state.search_results.clone();
        }
        if state.selected_type.is_some() {
            return state.type_results.clone();
        }
        state.page.content.clone()
    }

    pub fn get_by_id(&self, id: i64) -> Option<Part> {
        self.state
            .read()
            .page
            .content
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    /// True when neither search nor type filter is active, i.e. the visible
    /// list is the server page and the cursor below is meaningful.
    pub fn is_paginated(&self) -> bool {
        let state = self.state.read();
        state.search_query.is_empty() && state.selected_type.is_none()
    }

    pub fn current_page(&self) -> u32 {
        self.state.read().page.page_number
    }

    pub fn total_pages(&self) -> u32 {
        self.state.read().page.total_pages
    }

    pub fn total_elements(&self) -> u64 {
        self.state.read().page.total_elements
    }

    pub fn has_next_page(&self) -> bool {
        self.state.read().page.has_next()
    }

    pub fn has_previous_page(&self) -> bool {
        self.state.read().page.has_previous()
    }

    pub fn page_size(&self) -> u32 {
        self.state.read().page_size
    }

    pub fn set_page_size(&self, size: u32) {
        self.state.write().page_size = size.max(1);
    }

    /// Set the sort state directly (front ends with explicit sort inputs);
    /// takes effect on the next fetch.
    pub fn set_sort(&self, field: Option<String>, direction: SortDirection) {
        let mut state = self.state.write();
        state.sort_field = field;
        state.sort_direction = direction;
    }

    pub fn sort_field(&self) -> Option<String> {
        self.state.read().sort_field.clone()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.state.read().sort_direction
    }

    pub fn selected_type(&self) -> Option<PartType> {
        self.state.read().selected_type
    }

    pub fn search_query(&self) -> String {
        self.state.read().search_query.clone()
    }

    // ---- internals ----

    async fn refetch_active(&self) {
        let (query, selected, current_page) = {
            let state = self.state.read();
            (
                state.search_query.clone(),
                state.selected_type,
                state.page.page_number,
            )
        };
        if !query.is_empty() {
            self.search(&query).await;
        } else if let Some(part_type) = selected {
            self.fetch_by_type(part_type).await;
        } else {
            self.fetch_all(current_page).await;
        }
    }

    fn store_mutation_error(&self, context: &str, e: &ClientError) {
        self.state.write().error = Some(fetch_message(context, e));
    }

    fn begin_fetch(&self) -> u64 {
        self.fetch_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.fetch_generation.load(Ordering::SeqCst) == generation
    }
}

/// Translate a request failure into the stored display string: typed API
/// errors use their status-specific wording, transport failures get the
/// context prefix.
fn fetch_message(context: &str, e: &ClientError) -> String {
    match e {
        ClientError::Api(api) => api.user_message(),
        other => format!("{context}: {other}"),
    }
}
