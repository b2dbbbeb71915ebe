//! Partitioning of the item collection into pages.

/// A group of consecutive items turned as one unit in page mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_index: usize,
}

/// Number of pages for the given collection size.
pub fn pages_quantity(
    item_count: usize,
    items_on_display: usize,
    is_singly_cycle: bool,
) -> usize {
    if is_singly_cycle {
        item_count
    } else {
        item_count.div_ceil(items_on_display.max(1))
    }
}

/// Split `items` into pages. In singly-cycle mode every item is its own page.
pub fn build_pages<T: Clone>(
    items: &[T],
    items_on_display: usize,
    is_singly_cycle: bool,
) -> Vec<Page<T>> {
    let chunk = if is_singly_cycle {
        1
    } else {
        items_on_display.max(1)
    };

    items
        .chunks(chunk)
        .enumerate()
        .map(|(page_index, chunk)| Page {
            items: chunk.to_vec(),
            page_index,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_mode_truncates_last_page() {
        let items = ["a", "b", "c", "d", "e"];
        let pages = build_pages(&items, 3, false);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].items, vec!["a", "b", "c"]);
        assert_eq!(pages[1].items, vec!["d", "e"]);
        assert_eq!(pages[1].page_index, 1);
        assert_eq!(pages_quantity(items.len(), 3, false), 2);
    }

    #[test]
    fn singly_cycle_has_one_page_per_item() {
        let items = [1, 2, 3, 4, 5];
        let pages = build_pages(&items, 3, true);

        assert_eq!(pages.len(), 5);
        assert!(pages.iter().all(|page| page.items.len() == 1));
        assert_eq!(pages_quantity(items.len(), 3, true), 5);
    }

    #[test]
    fn exact_multiple_has_no_partial_page() {
        let items: Vec<u32> = (0..6).collect();
        assert_eq!(build_pages(&items, 3, false).len(), 2);
        assert_eq!(pages_quantity(6, 3, false), 2);
    }

    #[test]
    fn empty_collection_has_no_pages() {
        let items: [u8; 0] = [];
        assert!(build_pages(&items, 3, false).is_empty());
        assert_eq!(pages_quantity(0, 3, false), 0);
    }
}
