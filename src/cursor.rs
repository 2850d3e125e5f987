//! Lazy, forward-only iteration over paginated collection endpoints.
//!
//! Collections are served in pages of at most [`MAX_PAGE_SIZE`] records. Each page
//! carries `truncated` and an opaque `next_marker`; [`ApiCursor`] hides that protocol
//! behind [`ApiCursor::next`], fetching one page at a time and only when the
//! current one is used up.

use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;

use crate::client::{TelerivetClient, TelerivetError};
use crate::domain::Params;
use crate::entity::FromRecord;
use crate::transport::Page;

/// Largest page the server returns.
pub const MAX_PAGE_SIZE: usize = 200;

const COUNT_PARAM: &str = "count";
const MARKER_PARAM: &str = "marker";
const PAGE_SIZE_PARAM: &str = "page_size";

/// Position of a cursor in its page-fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorState {
    /// No page fetched yet.
    Unstarted,
    /// The current page still holds unconsumed records.
    InPage,
    /// The current page is consumed and the server reported more.
    PageExhaustedMoreAvailable,
    /// Nothing more will be yielded; no further requests are made.
    Done,
}

/// Cursor over a filtered remote collection.
///
/// Records are yielded in server order, one page buffered at a time. `next` takes
/// `&mut self`, so a cursor never has more than one page fetch in flight. A fetch
/// only touches the cursor once it has fully succeeded: a failed or cancelled
/// fetch leaves buffer, position and marker as they were.
pub struct ApiCursor<E> {
    client: TelerivetClient,
    path: String,
    params: Params,
    limit: Option<usize>,
    buffer: Option<Vec<Params>>,
    pos: usize,
    yielded: usize,
    truncated: bool,
    next_marker: Option<String>,
    done: bool,
    _item: PhantomData<fn() -> E>,
}

impl<E: FromRecord> fmt::Debug for ApiCursor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCursor")
            .field("path", &self.path)
            .field("params", &self.params)
            .field("limit", &self.limit)
            .field("pos", &self.pos)
            .field("yielded", &self.yielded)
            .field("truncated", &self.truncated)
            .field("next_marker", &self.next_marker)
            .field("state", &self.state())
            .finish()
    }
}

impl<E: FromRecord> ApiCursor<E> {
    pub(crate) fn new(
        client: TelerivetClient,
        path: String,
        params: Params,
    ) -> Result<Self, TelerivetError> {
        if params.get(COUNT_PARAM).is_some_and(|it| !it.is_null()) {
            return Err(TelerivetError::Construction {
                reason: "the `count` parameter is reserved; call count() instead",
            });
        }

        Ok(Self {
            client,
            path,
            params,
            limit: None,
            buffer: None,
            pos: 0,
            yielded: 0,
            truncated: false,
            next_marker: None,
            done: false,
            _item: PhantomData,
        })
    }

    /// Cap the number of items this cursor ever yields.
    ///
    /// Set this before iterating; pages are requested no larger than the limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Total number of records matching the filter, in a single request.
    pub async fn count(&self) -> Result<u64, TelerivetError> {
        let mut params = self.params.clone();
        params.insert(COUNT_PARAM.to_owned(), Value::from(1));
        self.client.request_count(&self.path, &params).await
    }

    /// Number of items yielded so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> CursorState {
        if self.limit_reached() || self.done {
            return CursorState::Done;
        }
        match &self.buffer {
            None => CursorState::Unstarted,
            Some(buffer) if self.pos < buffer.len() => CursorState::InPage,
            Some(_) if self.truncated && self.next_marker.is_some() => {
                CursorState::PageExhaustedMoreAvailable
            }
            Some(_) => CursorState::Done,
        }
    }

    /// Yield the next item, fetching the next page when the current one is used up.
    ///
    /// Returns `Ok(None)` once the collection (or the limit) is exhausted; further
    /// calls keep returning `Ok(None)` without any request.
    pub async fn next(&mut self) -> Result<Option<E>, TelerivetError> {
        if self.limit_reached() {
            return Ok(None);
        }

        loop {
            if let Some(data) = self.take_buffered() {
                self.yielded += 1;
                return Ok(Some(E::from_record(self.client.clone(), data, true)));
            }
            if !self.should_fetch() {
                return Ok(None);
            }
            let page = self.client.request_page(&self.path, &self.page_params()).await?;
            self.apply_page(page);
        }
    }

    /// Drain the cursor into a vector, failing on the first failed fetch.
    pub async fn all(&mut self) -> Result<Vec<E>, TelerivetError> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Call `visitor` with each item in order, then once more with `None` when the
    /// sequence ended without error.
    pub async fn each<F>(&mut self, mut visitor: F) -> Result<(), TelerivetError>
    where
        F: FnMut(Option<E>),
    {
        while let Some(item) = self.next().await? {
            visitor(Some(item));
        }
        visitor(None);
        Ok(())
    }

    fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.yielded >= limit)
    }

    fn take_buffered(&mut self) -> Option<Params> {
        let buffer = self.buffer.as_mut()?;
        let data = buffer.get_mut(self.pos)?;
        self.pos += 1;
        Some(std::mem::take(data))
    }

    fn should_fetch(&mut self) -> bool {
        if self.done {
            return false;
        }
        if self.buffer.is_none() {
            return true;
        }
        if !self.truncated {
            self.done = true;
            return false;
        }
        if self.next_marker.is_none() {
            tracing::warn!(path = %self.path, "page reported truncation without a next marker");
            self.done = true;
            return false;
        }
        true
    }

    fn page_params(&self) -> Params {
        let mut params = self.params.clone();
        if let Some(marker) = &self.next_marker {
            params.insert(MARKER_PARAM.to_owned(), Value::String(marker.clone()));
        }
        if let Some(limit) = self.limit {
            if !params.contains_key(PAGE_SIZE_PARAM) {
                params.insert(
                    PAGE_SIZE_PARAM.to_owned(),
                    Value::from(limit.min(MAX_PAGE_SIZE)),
                );
            }
        }
        params
    }

    fn apply_page(&mut self, page: Page) {
        tracing::trace!(
            path = %self.path,
            items = page.data.len(),
            truncated = page.truncated,
            "fetched page"
        );
        if page.data.is_empty() {
            self.done = true;
        }
        self.buffer = Some(page.data);
        self.pos = 0;
        self.truncated = page.truncated;
        self.next_marker = page.next_marker;
    }
}
