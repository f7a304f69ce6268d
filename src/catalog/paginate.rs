//! Paginator.
//!
//! Pure slicing arithmetic over a filtered list. Pages are 1-based; the display
//! range is 1-based and inclusive, so page 3 of 23 records at size 10 reads
//! "21 to 23 of 23".

use std::fmt;

/// Allowed rows-per-page values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    /// Every size, smallest first.
    pub const ALL: [Self; 4] = [Self::Ten, Self::TwentyFive, Self::Fifty, Self::Hundred];

    /// Number of rows on a page.
    #[must_use]
    pub const fn rows(self) -> usize {
        match self {
            Self::Ten => 10,
            Self::TwentyFive => 25,
            Self::Fifty => 50,
            Self::Hundred => 100,
        }
    }

    /// Parses a row count, accepting only the fixed sizes.
    #[must_use]
    pub fn from_rows(rows: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.rows() == rows)
    }

    /// The next larger size, wrapping back to the smallest.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Ten => Self::TwentyFive,
            Self::TwentyFive => Self::Fifty,
            Self::Fifty => Self::Hundred,
            Self::Hundred => Self::Ten,
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rows())
    }
}

/// One page of a list plus the metadata the footer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Visible rows.
    pub items: &'a [T],
    /// 1-based page number this slice was taken for.
    pub number: usize,
    /// `ceil(total / size)`, never less than 1.
    pub total_pages: usize,
    /// 1-based index of the first visible row, 0 when nothing is visible.
    pub start: usize,
    /// 1-based index of the last visible row, 0 when nothing is visible.
    pub end: usize,
    /// Length of the whole list.
    pub total: usize,
}

impl<T> Page<'_, T> {
    /// The "Showing X to Y of Z entries" label.
    #[must_use]
    pub fn range_label(&self) -> String {
        format!("{} to {} of {}", self.start, self.end, self.total)
    }
}

/// Number of pages needed for `len` rows, minimum 1.
#[must_use]
pub const fn total_pages(len: usize, size: PageSize) -> usize {
    let pages = len.div_ceil(size.rows());
    if pages == 0 {
        1
    } else {
        pages
    }
}

/// Returns page `page` (1-based; 0 is read as 1) of `items`.
///
/// The slice is `[(page-1)*size, page*size)` clamped to the list bounds, so a page
/// past the end is empty rather than an error.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, size: PageSize) -> Page<'_, T> {
    let number = page.max(1);
    let total = items.len();
    let lower = ((number - 1) * size.rows()).min(total);
    let upper = (number * size.rows()).min(total);
    let visible = &items[lower..upper];

    let (start, end) = if visible.is_empty() {
        (0, 0)
    } else {
        (lower + 1, upper)
    };

    Page {
        items: visible,
        number,
        total_pages: total_pages(total, size),
        start,
        end,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_three_rows_at_ten_per_page() {
        let rows: Vec<usize> = (1..=23).collect();
        let page = paginate(&rows, 3, PageSize::Ten);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items, &[21, 22, 23]);
        assert_eq!(page.range_label(), "21 to 23 of 23");
    }

    #[test]
    fn empty_list_has_one_page_and_no_range() {
        let rows: Vec<usize> = vec![];
        let page = paginate(&rows, 1, PageSize::TwentyFive);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.range_label(), "0 to 0 of 0");
    }

    #[test]
    fn page_zero_reads_as_first_page() {
        let rows: Vec<usize> = (1..=5).collect();
        assert_eq!(paginate(&rows, 0, PageSize::Ten).items, &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let rows: Vec<usize> = (1..=5).collect();
        let page = paginate(&rows, 4, PageSize::Ten);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn sizes_cycle_and_parse() {
        assert_eq!(PageSize::from_rows(50), Some(PageSize::Fifty));
        assert_eq!(PageSize::from_rows(20), None);
        assert_eq!(PageSize::Hundred.next(), PageSize::Ten);
        assert_eq!(PageSize::default().rows(), 10);
    }
}
