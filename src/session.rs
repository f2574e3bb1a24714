//! Views that outlive a single fetch: a search result list and a discovery page.

use tracing::info;

use crate::catalog::{Catalog, DetailData, LandingData, ResultsPage};
use crate::error::ApiResult;
use crate::filter::SortKey;
use crate::models::{FacetKind, FacetOption};
use crate::query::{self, Category, FacetSelection, Intent, SearchFilters};
use crate::view::{Ticket, View, ViewState};

pub async fn load_landing(catalog: &Catalog) -> View<LandingData> {
    let mut view = View::new("movies");
    let ticket = view.begin();
    view.complete(ticket, catalog.landing().await);
    view
}

pub async fn load_category(catalog: &Catalog, category: Category, page: u32) -> View<ResultsPage> {
    let mut view = View::new(category.label());
    let ticket = view.begin();
    view.complete(ticket, catalog.category(category, page).await);
    view
}

pub async fn load_detail(catalog: &Catalog, id: u64) -> View<DetailData> {
    let mut view = View::new("movie details");
    let ticket = view.begin();
    view.complete_lookup(ticket, catalog.detail(id).await);
    view
}

/// Query text, filters and sort for one search results view.
#[derive(Debug)]
pub struct SearchSession {
    text: String,
    filters: SearchFilters,
    sort: SortKey,
    page: u32,
    view: View<ResultsPage>,
}

impl SearchSession {
    pub fn new(text: &str, filters: SearchFilters) -> Self {
        Self {
            text: text.trim().to_string(),
            filters,
            sort: SortKey::Relevance,
            page: 1,
            view: View::new("search results"),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Page of the latest request.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// New text or filters start over at page 1.
    pub fn set_query(&mut self, text: &str, filters: SearchFilters) {
        self.text = text.trim().to_string();
        self.filters = filters;
        self.page = 1;
        self.view.reset();
    }

    /// Re-sort what is already held; never refetches.
    pub fn set_sort(&mut self, key: SortKey) {
        self.sort = key;
        self.view.update(|results| results.apply_sort(key));
    }

    /// Locally filtered searches always start from provider page 1.
    pub fn begin(&mut self, page: u32) -> (Ticket, Intent) {
        let mut intent = Intent::Search {
            text: self.text.clone(),
            page,
            filters: self.filters.clone(),
        };
        if query::needs_local_filter(&intent) {
            intent = intent.with_page(1);
        }
        self.page = intent.page();
        (self.view.begin(), intent)
    }

    pub fn finish(&mut self, ticket: Ticket, result: ApiResult<ResultsPage>) -> bool {
        let sort = self.sort;
        let applied = self.view.complete(
            ticket,
            result.map(|mut results| {
                results.apply_sort(sort);
                results
            }),
        );
        if applied {
            if let Some(results) = self.view.data() {
                info!(
                    query = %self.text,
                    page = results.pagination.page,
                    total_results = results.pagination.total_results,
                    "Search results ready"
                );
            }
        }
        applied
    }

    pub async fn load(&mut self, catalog: &Catalog, page: u32) {
        let (ticket, intent) = self.begin(page);
        let result = catalog.results(&intent).await;
        self.finish(ticket, result);
    }

    /// Fetch another page if pagination allows it. Synthesized pages never refetch.
    pub async fn go_to(&mut self, catalog: &Catalog, page: u32) -> bool {
        let target = self
            .view
            .data()
            .and_then(|results| results.pagination.target(page));
        match target {
            Some(target) => {
                self.load(catalog, target).await;
                true
            }
            None => false,
        }
    }

    /// Message for a ready view with zero hits.
    pub fn empty_message(&self) -> Option<String> {
        match self.view.data() {
            Some(results) if results.empty => Some(format!(
                "We couldn't find any movies matching \"{}\". Try different keywords or browse trending movies.",
                self.text
            )),
            _ => None,
        }
    }

    pub fn state(&self) -> &ViewState<ResultsPage> {
        self.view.state()
    }

    pub fn into_state(self) -> ViewState<ResultsPage> {
        self.view.into_state()
    }
}

/// A discovery page: pick a facet type, load its options, then pick an option.
#[derive(Debug)]
pub struct DiscoverSession {
    kind: FacetKind,
    options: View<Vec<FacetOption>>,
    selected: Option<FacetSelection>,
    movies: View<ResultsPage>,
}

impl DiscoverSession {
    pub fn new(kind: FacetKind) -> Self {
        Self {
            kind,
            options: View::new(format!("{} options", kind.as_str())),
            selected: None,
            movies: View::new("movies"),
        }
    }

    pub fn kind(&self) -> FacetKind {
        self.kind
    }

    /// Switching facet type drops options, selection and movies.
    pub fn set_kind(&mut self, kind: FacetKind) {
        if kind == self.kind {
            return;
        }
        *self = Self::new(kind);
    }

    pub async fn load_options(&mut self, catalog: &Catalog) {
        let ticket = self.options.begin();
        let result = catalog.facet_options(self.kind).await;
        self.options.complete(ticket, result);
    }

    /// Select an option and fetch its movies. The selection must match the current facet.
    pub async fn select(&mut self, catalog: &Catalog, selection: FacetSelection, page: u32) {
        if selection.kind != self.kind {
            self.set_kind(selection.kind);
        }
        let intent = Intent::Discover {
            selection: selection.clone(),
            page,
        };
        self.selected = Some(selection);
        let ticket = self.movies.begin();
        let result = catalog.results(&intent).await;
        self.movies.complete(ticket, result);
    }

    pub fn selected(&self) -> Option<&FacetSelection> {
        self.selected.as_ref()
    }

    pub fn options(&self) -> &ViewState<Vec<FacetOption>> {
        self.options.state()
    }

    pub fn movies(&self) -> &ViewState<ResultsPage> {
        self.movies.state()
    }

    pub fn into_parts(self) -> (ViewState<Vec<FacetOption>>, ViewState<ResultsPage>) {
        (self.options.into_state(), self.movies.into_state())
    }
}
