//! Group dated rows by calendar day.

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Something that lands on a calendar day.
pub trait Dated {
    /// Local day this row belongs to, or `None` if its date is missing or malformed.
    fn date_key(&self) -> Option<NaiveDate>;

    fn title(&self) -> &str;

    /// Starred / high priority rows sort first within a day.
    fn is_important(&self) -> bool {
        false
    }
}

impl<T: Dated> Dated for &T {
    fn date_key(&self) -> Option<NaiveDate> {
        (**self).date_key()
    }

    fn title(&self) -> &str {
        (**self).title()
    }

    fn is_important(&self) -> bool {
        (**self).is_important()
    }
}

/// Ordering applied inside each day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayOrder {
    /// Important rows first, then by title (case-insensitive), ties in input order
    #[default]
    ImportantFirst,
    /// Input order
    Insertion,
}

/// Rows grouped by day, plus the ones that could not be placed.
#[derive(Debug, Clone)]
pub struct DayBuckets<T> {
    days: BTreeMap<NaiveDate, Vec<T>>,
    pub undated: Vec<T>,
}

impl<T> Default for DayBuckets<T> {
    fn default() -> Self {
        DayBuckets {
            days: BTreeMap::new(),
            undated: Vec::new(),
        }
    }
}

impl<T> DayBuckets<T> {
    /// Rows on `date`, in bucket order.
    pub fn on(&self, date: NaiveDate) -> &[T] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<T>)> {
        self.days.iter()
    }

    /// Total rows held, including undated ones.
    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum::<usize>() + self.undated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Group `items` by their local day.
pub fn bucket_by_day<T, I>(items: I, order: DayOrder) -> DayBuckets<T>
where
    T: Dated,
    I: IntoIterator<Item = T>,
{
    let mut buckets = DayBuckets::default();

    for item in items {
        match item.date_key() {
            Some(day) => buckets.days.entry(day).or_insert_with(Vec::new).push(item),
            None => {
                log::warn!("Row '{}' has no usable date; keeping it undated", item.title());
                buckets.undated.push(item);
            }
        }
    }

    if order == DayOrder::ImportantFirst {
        for rows in buckets.days.values_mut() {
            rows.sort_by(|a, b| {
                b.is_important()
                    .cmp(&a.is_important())
                    .then_with(|| a.title().to_lowercase().cmp(&b.title().to_lowercase()))
            });
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_date::date_key;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        date: &'static str,
        title: &'static str,
        important: bool,
    }

    impl Dated for Row {
        fn date_key(&self) -> Option<NaiveDate> {
            date_key(self.date)
        }

        fn title(&self) -> &str {
            self.title
        }

        fn is_important(&self) -> bool {
            self.important
        }
    }

    fn row(date: &'static str, title: &'static str, important: bool) -> Row {
        Row {
            date,
            title,
            important,
        }
    }

    fn day(s: &str) -> NaiveDate {
        date_key(s).unwrap()
    }

    #[test]
    fn nothing_dropped_or_duplicated() {
        let rows = vec![
            row("2024-02-01", "b", false),
            row("2024-02-01", "a", false),
            row("2024-02-02T10:00:00Z", "c", true),
            row("not a date", "d", false),
            row("", "e", false),
        ];
        let buckets = bucket_by_day(rows.clone(), DayOrder::ImportantFirst);

        assert_eq!(buckets.len(), rows.len());
        assert_eq!(buckets.on(day("2024-02-01")).len(), 2);
        assert_eq!(buckets.on(day("2024-02-02")).len(), 1);
        assert_eq!(buckets.undated.len(), 2);
        assert!(buckets.on(day("2024-02-03")).is_empty());
    }

    #[test]
    fn important_first_then_title() {
        let rows = vec![
            row("2024-02-01", "zebra", false),
            row("2024-02-01", "Apple", false),
            row("2024-02-01", "mango", true),
            row("2024-02-01", "banana", false),
        ];
        let buckets = bucket_by_day(rows, DayOrder::ImportantFirst);
        let titles: Vec<_> = buckets.on(day("2024-02-01")).iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["mango", "Apple", "banana", "zebra"]);
    }

    #[test]
    fn insertion_order_is_kept() {
        let rows = vec![
            row("2024-02-01", "zebra", false),
            row("2024-02-01", "apple", true),
        ];
        let buckets = bucket_by_day(rows, DayOrder::Insertion);
        let titles: Vec<_> = buckets.on(day("2024-02-01")).iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["zebra", "apple"]);
    }

    #[test]
    fn borrowed_rows_bucket_too() {
        let rows = vec![row("2024-02-01", "a", false), row("2024-02-05", "b", false)];
        let buckets = bucket_by_day(rows.iter(), DayOrder::Insertion);
        assert_eq!(buckets.days().count(), 2);
        assert_eq!(buckets.on(day("2024-02-05"))[0].title, "b");
    }
}
