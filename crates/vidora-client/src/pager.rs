//! Lazy paginated iteration over list commands.
//!
//! An [`ItemResultSet`] is the value every finder returns: a restartable,
//! lazily-fetched sequence of entities. Nothing touches the network until
//! iteration begins, each page costs one blocking round-trip, and iterating
//! the set again replays the query from its starting page.

use std::cell::Cell;
use std::collections::VecDeque;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use vidora_core::error::{Error, Result};

use crate::connection::Connection;
use crate::page::Page;

const DEFAULT_PAGE_SIZE: u64 = 100;

/// A fully-specified list command: name, paging window, sort, and filters.
#[derive(Debug, Clone)]
pub struct ItemQuery {
    command: String,
    page_size: u64,
    starting_page: u64,
    sort_by: vidora_core::enums::SortBy,
    sort_order: vidora_core::enums::SortOrder,
    filters: Vec<(String, String)>,
}

impl ItemQuery {
    pub fn new(command: impl Into<String>) -> Self {
        ItemQuery {
            command: command.into(),
            page_size: DEFAULT_PAGE_SIZE,
            starting_page: 0,
            sort_by: Default::default(),
            sort_order: Default::default(),
            filters: Vec::new(),
        }
    }

    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn starting_page(mut self, page: u64) -> Self {
        self.starting_page = page;
        self
    }

    pub fn sort_by(mut self, sort_by: vidora_core::enums::SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn sort_order(mut self, sort_order: vidora_core::enums::SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Adds a command-specific parameter, e.g. `and_tags` or `player_id`.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Adds a comma-joined list parameter, the service's convention for
    /// multi-value filters.
    pub fn filter_list<T: ToString>(self, key: impl Into<String>, values: &[T]) -> Self {
        let joined = values
            .iter()
            .map(T::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.filter(key, joined)
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Query-string parameters for one page fetch, paging window included.
    pub fn params(&self, page_number: u64) -> Vec<(String, String)> {
        let mut params = vec![
            ("page_size".to_string(), self.page_size.to_string()),
            ("page_number".to_string(), page_number.to_string()),
            ("sort_by".to_string(), self.sort_by.to_string()),
            ("sort_order".to_string(), self.sort_order.to_string()),
        ];
        params.extend(self.filters.iter().cloned());
        params
    }
}

/// A lazy, restartable sequence of entities behind a list command.
///
/// Iterate it by reference; each pass replays the query from the starting
/// page. After any page has been fetched, [`total_count`](Self::total_count)
/// and friends expose the most recently seen envelope counters.
pub struct ItemResultSet<'c, T> {
    connection: &'c dyn Connection,
    query: ItemQuery,
    total_count: Cell<Option<i64>>,
    page_number: Cell<Option<u64>>,
    page_size: Cell<Option<u64>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for ItemResultSet<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemResultSet")
            .field("query", &self.query)
            .field("total_count", &self.total_count)
            .field("page_number", &self.page_number)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl<'c, T: DeserializeOwned> ItemResultSet<'c, T> {
    pub fn new(connection: &'c dyn Connection, query: ItemQuery) -> Self {
        ItemResultSet {
            connection,
            query,
            total_count: Cell::new(None),
            page_number: Cell::new(None),
            page_size: Cell::new(None),
            _entity: PhantomData,
        }
    }

    /// Total matching items as reported by the most recently fetched page.
    /// `None` until a page has been fetched.
    pub fn total_count(&self) -> Option<i64> {
        self.total_count.get()
    }

    /// Page number of the most recently fetched page.
    pub fn page_number(&self) -> Option<u64> {
        self.page_number.get()
    }

    /// Page size echoed by the most recently fetched page.
    pub fn page_size(&self) -> Option<u64> {
        self.page_size.get()
    }

    pub fn iter(&self) -> ItemIter<'_, 'c, T> {
        ItemIter {
            set: self,
            next_page: self.query.starting_page,
            buffer: VecDeque::new(),
            stop_after_buffer: false,
            done: false,
        }
    }

    fn fetch(&self, page_number: u64) -> Result<Page> {
        debug!(command = self.query.command(), page_number, "fetching page");
        let raw = self.connection.get_list(&self.query, page_number)?;
        let page = Page::from_value(raw)?;
        self.total_count.set(Some(page.total_count));
        self.page_number.set(Some(page.page_number));
        self.page_size.set(Some(page.page_size));
        Ok(page)
    }
}

impl<'a, 'c, T: DeserializeOwned> IntoIterator for &'a ItemResultSet<'c, T> {
    type Item = Result<T>;
    type IntoIter = ItemIter<'a, 'c, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One pass over an [`ItemResultSet`].
///
/// Pages are fetched on demand. Iteration ends on the first empty page, or
/// right after draining a page whose envelope says no further page can
/// exist (a negative total count or a zero page size). A transport or
/// decode failure of a page fetch is yielded once as `Err` and ends the
/// pass; a single undecodable item is yielded as `Err` at its position and
/// iteration continues.
pub struct ItemIter<'a, 'c, T> {
    set: &'a ItemResultSet<'c, T>,
    next_page: u64,
    buffer: VecDeque<Value>,
    stop_after_buffer: bool,
    done: bool,
}

impl<T: DeserializeOwned> Iterator for ItemIter<'_, '_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            if let Some(raw) = self.buffer.pop_front() {
                return Some(
                    serde_json::from_value(raw)
                        .map_err(|e| Error::deserialization(format!("undecodable item: {e}"))),
                );
            }
            if self.stop_after_buffer {
                self.done = true;
                return None;
            }
            let page = match self.set.fetch(self.next_page) {
                Ok(page) => page,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };
            self.next_page += 1;
            if page.is_empty() {
                self.done = true;
                return None;
            }
            // A page that cannot be followed: the envelope reports an
            // unavailable total or a zero page size. Drain it, then stop
            // without asking for a page that cannot exist.
            self.stop_after_buffer = page.total_count < 0 || page.page_size == 0;
            self.buffer = page.items.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    use vidora_core::models::Video;
    use vidora_core::Error;

    /// Serves a fixed run of pages, counting fetches. Pages are indexed by
    /// requested page number relative to page zero.
    struct FixedPages {
        pages: Vec<Result<Value>>,
        fetches: RefCell<u64>,
    }

    impl FixedPages {
        fn new(pages: Vec<Result<Value>>) -> Self {
            FixedPages {
                pages,
                fetches: RefCell::new(0),
            }
        }

        fn fetches(&self) -> u64 {
            *self.fetches.borrow()
        }
    }

    impl Connection for FixedPages {
        fn get_list(&self, _query: &ItemQuery, page_number: u64) -> Result<Value> {
            *self.fetches.borrow_mut() += 1;
            match self.pages.get(page_number as usize) {
                Some(Ok(v)) => Ok(v.clone()),
                Some(Err(e)) => Err(Error::Transport(e.to_string())),
                None => panic!("fetched past the fixture: page {page_number}"),
            }
        }

        fn get_item(&self, _command: &str, _params: &[(String, String)]) -> Result<Value> {
            unreachable!("list fixtures never serve single items")
        }

        fn post(
            &self,
            _method: &str,
            _params: serde_json::Map<String, Value>,
            _file: Option<&std::path::Path>,
        ) -> Result<Value> {
            unreachable!("list fixtures never serve posts")
        }
    }

    fn video(n: u64) -> Value {
        json!({"name": format!("video-{n}"), "shortDescription": "d"})
    }

    fn page(total: i64, number: u64, size: u64, count: u64) -> Value {
        let items: Vec<Value> = (0..count).map(|i| video(number * 100 + i)).collect();
        json!({
            "total_count": total,
            "page_number": number,
            "page_size": size,
            "items": items,
        })
    }

    fn names(set: &ItemResultSet<'_, Video>) -> Vec<String> {
        set.iter()
            .map(|v| v.unwrap().name().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_drains_pages_until_an_empty_one() {
        let conn = FixedPages::new(vec![
            Ok(page(5, 0, 2, 2)),
            Ok(page(5, 1, 2, 2)),
            Ok(page(5, 2, 2, 1)),
            Ok(page(5, 3, 2, 0)),
        ]);
        let set: ItemResultSet<'_, Video> = ItemResultSet::new(&conn, ItemQuery::new("find_all_videos"));
        assert_eq!(names(&set).len(), 5);
        assert_eq!(conn.fetches(), 4);
        assert_eq!(set.total_count(), Some(5));
        assert_eq!(set.page_number(), Some(3));
    }

    #[test]
    fn test_nothing_is_fetched_before_iteration() {
        let conn = FixedPages::new(vec![Ok(page(0, 0, 100, 0))]);
        let set: ItemResultSet<'_, Video> = ItemResultSet::new(&conn, ItemQuery::new("find_all_videos"));
        assert_eq!(conn.fetches(), 0);
        assert_eq!(set.total_count(), None);
        assert_eq!(names(&set).len(), 0);
        assert_eq!(conn.fetches(), 1);
    }

    #[test]
    fn test_negative_total_count_stops_after_one_page() {
        let conn = FixedPages::new(vec![Ok(page(-1, 0, 100, 2))]);
        let set: ItemResultSet<'_, Video> = ItemResultSet::new(&conn, ItemQuery::new("find_all_videos"));
        assert_eq!(names(&set).len(), 2);
        assert_eq!(conn.fetches(), 1);
        assert_eq!(set.total_count(), Some(-1));
    }

    #[test]
    fn test_zero_page_size_stops_after_one_page() {
        let conn = FixedPages::new(vec![Ok(page(2, 0, 0, 2))]);
        let set: ItemResultSet<'_, Video> = ItemResultSet::new(&conn, ItemQuery::new("find_all_videos"));
        assert_eq!(names(&set).len(), 2);
        assert_eq!(conn.fetches(), 1);
    }

    #[test]
    fn test_second_pass_replays_from_the_start() {
        let conn = FixedPages::new(vec![Ok(page(2, 0, 2, 2)), Ok(page(2, 1, 2, 0))]);
        let set: ItemResultSet<'_, Video> = ItemResultSet::new(&conn, ItemQuery::new("find_all_videos"));
        assert_eq!(names(&set), vec!["video-0", "video-1"]);
        assert_eq!(names(&set), vec!["video-0", "video-1"]);
        assert_eq!(conn.fetches(), 4);
    }

    #[test]
    fn test_transport_error_is_yielded_then_iteration_ends() {
        let conn = FixedPages::new(vec![
            Ok(page(4, 0, 2, 2)),
            Err(Error::Transport("connection reset".into())),
        ]);
        let set: ItemResultSet<'_, Video> = ItemResultSet::new(&conn, ItemQuery::new("find_all_videos"));
        let mut iter = set.iter();
        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().unwrap().is_ok());
        let err = iter.next().unwrap().unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_malformed_envelope_is_yielded_as_error() {
        let conn = FixedPages::new(vec![Ok(json!({"page_number": 0, "items": []}))]);
        let set: ItemResultSet<'_, Video> = ItemResultSet::new(&conn, ItemQuery::new("find_all_videos"));
        let mut iter = set.iter();
        assert!(matches!(
            iter.next().unwrap().unwrap_err(),
            Error::Deserialization(_)
        ));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_query_params_include_paging_window_and_filters() {
        let query = ItemQuery::new("find_videos_by_tags")
            .page_size(25)
            .sort_order(vidora_core::enums::SortOrder::Desc)
            .filter_list("and_tags", &["a", "b"]);
        let params = query.params(3);
        assert!(params.contains(&("page_size".into(), "25".into())));
        assert!(params.contains(&("page_number".into(), "3".into())));
        assert!(params.contains(&("sort_by".into(), "CREATION_DATE".into())));
        assert!(params.contains(&("sort_order".into(), "DESC".into())));
        assert!(params.contains(&("and_tags".into(), "a,b".into())));
    }
}
