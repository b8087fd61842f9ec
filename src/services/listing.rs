//! Client-side filtering and pagination.
//!
//! Lists are small enough that the backend returns them whole; narrowing and
//! paging happen over the already-fetched copy, never as extra requests.

use crate::cli::PageArgs;
use crate::domain::models::Page;
use serde::Serialize;

pub fn filter_rows<T>(rows: Vec<T>, needle: Option<&str>, hay: impl Fn(&T) -> String) -> Vec<T> {
    match needle {
        None => rows,
        Some(q) => {
            let q = q.to_lowercase();
            rows.into_iter()
                .filter(|r| hay(r).to_lowercase().contains(&q))
                .collect()
        }
    }
}

/// Fixed-size pagination; `page` is 1-based and clamps to the last page so a
/// stale page number still shows something rather than an empty screen.
pub fn paginate<T: Serialize>(rows: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = rows.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);
    let items: Vec<T> = rows
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();
    Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    }
}

pub fn select_page<T: Serialize>(
    rows: Vec<T>,
    args: &PageArgs,
    hay: impl Fn(&T) -> String,
) -> Page<T> {
    let filtered = filter_rows(rows, args.filter.as_deref(), hay);
    paginate(filtered, args.page, args.page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<String> {
        vec!["Almacén", "Dirección", "Sistemas", "Archivo"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let out = filter_rows(rows(), Some("si"), |r| r.clone());
        assert_eq!(out, vec!["Sistemas".to_string()]);
    }

    #[test]
    fn no_filter_keeps_everything() {
        assert_eq!(filter_rows(rows(), None, |r| r.clone()).len(), 4);
    }

    #[test]
    fn pagination_slices_and_reports_totals() {
        let page = paginate(rows(), 2, 3);
        assert_eq!(page.items, vec!["Archivo".to_string()]);
        assert_eq!(page.total_items, 4);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn out_of_range_page_clamps_to_last() {
        let page = paginate(rows(), 99, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn empty_list_yields_one_empty_page() {
        let page = paginate(Vec::<String>::new(), 1, 20);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }
}
