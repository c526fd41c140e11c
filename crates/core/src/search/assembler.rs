//! Final composition of a search result

use crate::types::{Brand, CategoryFacet, Goods, SearchResult, SpecFacet};

/// The paged slice of hits produced by the primary query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSlice {
    pub total: u64,
    pub total_pages: u64,
    pub items: Vec<Goods>,
}

impl PageSlice {
    /// Slice for `total` hits split into pages of `page_size`
    pub fn new(total: u64, page_size: usize, items: Vec<Goods>) -> Self {
        let page_size = page_size.max(1) as u64;
        Self {
            total,
            total_pages: total.div_ceil(page_size),
            items,
        }
    }
}

/// Merge the page and every facet into the result; no recomputation happens here
pub fn assemble(
    page: PageSlice,
    categories: Vec<CategoryFacet>,
    brands: Vec<Brand>,
    specs: Vec<SpecFacet>,
) -> SearchResult {
    SearchResult {
        total: page.total,
        total_pages: page.total_pages,
        items: page.items,
        categories,
        brands,
        specs,
    }
}
