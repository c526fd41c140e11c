//! Search orchestration

use crate::{
    config::SearchConfig,
    engine::{
        spec_keyword_field, Aggregation, DocumentStore, Query, SearchSource, Sort, SourceFilter,
        FIELD_ALL, FIELD_BRAND, FIELD_CATEGORY, PROJECTED_FIELDS,
    },
    error::Result,
    lookup::{BrandLookup, CategoryLookup, SpecSchemaSource},
    search::{assemble, bounded, FacetResolver, PageSlice, SpecFacetEngine},
    spec::SpecMetadataResolver,
    types::{SearchRequest, SearchResult, SpecFacet},
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Name of the category terms aggregation
pub const CATEGORY_AGGREGATION: &str = "category";
/// Name of the brand terms aggregation
pub const BRAND_AGGREGATION: &str = "brand";

/// Product search with category, brand and specification facets
#[derive(Clone)]
pub struct SearchService {
    store: Arc<dyn DocumentStore>,
    facets: FacetResolver,
    spec_facets: SpecFacetEngine,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        categories: Arc<dyn CategoryLookup>,
        brands: Arc<dyn BrandLookup>,
        specs: Arc<dyn SpecSchemaSource>,
        config: SearchConfig,
    ) -> Self {
        let lookup_timeout = config.lookup_timeout();
        let metadata = SpecMetadataResolver::new(specs, lookup_timeout);
        Self {
            facets: FacetResolver::new(categories, brands, lookup_timeout),
            spec_facets: SpecFacetEngine::new(store.clone(), metadata, config.store_timeout()),
            store,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run a search
    ///
    /// A blank key returns `Ok(None)` without touching the store: browsing
    /// the whole catalog is not supported. Only a failure of the primary
    /// query is an error; facet failures leave the affected facet empty.
    pub async fn search(&self, request: &SearchRequest) -> Result<Option<SearchResult>> {
        if request.is_blank() {
            debug!("Blank search key, skipping search");
            return Ok(None);
        }

        info!(
            "Search request: key='{}', page={}, sort={:?}",
            request.key(),
            request.page(),
            request.sort_by()
        );

        let base_query = Self::base_query(request);
        let source = self.primary_source(request, base_query.clone());

        let response = bounded(
            "primary search",
            self.config.store_timeout(),
            self.store.search(&source),
        )
        .await
        .map_err(|e| {
            error!("Primary search failed for key '{}': {}", request.key(), e);
            e
        })?;

        let category_buckets = response
            .aggregations
            .terms(CATEGORY_AGGREGATION)
            .unwrap_or_default();
        let brand_buckets = response
            .aggregations
            .terms(BRAND_AGGREGATION)
            .unwrap_or_default();

        let (categories, brands) = tokio::join!(
            self.facets.resolve_categories(category_buckets),
            self.facets.resolve_brands(brand_buckets),
        );

        let specs = match categories.as_slice() {
            [only] => self.spec_facets_for(only.id, &base_query).await,
            _ => Vec::new(),
        };

        let page = PageSlice::new(response.total, self.config.page_size, response.items);

        info!(
            "Search completed: key='{}', total={}, categories={}, brands={}, specs={}",
            request.key(),
            page.total,
            categories.len(),
            brands.len(),
            specs.len()
        );

        Ok(Some(assemble(page, categories, brands, specs)))
    }

    async fn spec_facets_for(&self, category_id: i64, base_query: &Query) -> Vec<SpecFacet> {
        match self.spec_facets.compute(category_id, base_query).await {
            Ok(specs) => specs,
            Err(e) => {
                warn!(
                    "Specification facets for category {} unavailable: {}",
                    category_id, e
                );
                Vec::new()
            }
        }
    }

    /// Full-text match on the composite field plus the request's filters
    pub fn base_query(request: &SearchRequest) -> Query {
        let matched = Query::match_all_terms(FIELD_ALL, request.key().trim());

        let filter: Vec<Query> = request
            .filter()
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(field, value)| Query::term(filter_field(field), value.trim()))
            .collect();

        if filter.is_empty() {
            matched
        } else {
            Query::Bool {
                must: vec![matched],
                filter,
            }
        }
    }

    /// The primary round trip: projected page, sort and both id aggregations
    pub fn primary_source(&self, request: &SearchRequest, query: Query) -> SearchSource {
        let page_index = (request.page() - 1) as usize;

        let mut source = SearchSource::new(query)
            .with_page(page_index, self.config.page_size)
            .with_source(SourceFilter::Includes(
                PROJECTED_FIELDS.iter().map(|f| f.to_string()).collect(),
            ))
            .with_aggregation(CATEGORY_AGGREGATION, Aggregation::terms(FIELD_CATEGORY))
            .with_aggregation(BRAND_AGGREGATION, Aggregation::terms(FIELD_BRAND));

        if let Some(field) = request.sort_by() {
            source = source.with_sort(Sort::new(field, request.descending()));
        }

        source
    }
}

/// Index field a filter key constrains
fn filter_field(key: &str) -> String {
    match key {
        FIELD_CATEGORY | FIELD_BRAND => key.to_string(),
        other => spec_keyword_field(other),
    }
}
