//! Cursor-following traversal shared by every paginated IAM call.
//!
//! [`paginate`] turns a page fetcher into a lazy stream of items. A page is
//! only requested once the consumer has drained the previous one, so dropping
//! the stream stops all further requests.

use futures::stream::{self, Stream, StreamExt};
use log::trace;
use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::error::{PolicySimError, PolicySimResult};
use crate::types::Page;

/// Lazily walk every page produced by `fetch_page`.
///
/// The first request is made with `None`; each following request receives the
/// cursor of the previous page. A failed request yields exactly one error and
/// ends the stream. Cancellation is checked before every request.
pub fn paginate<T, C, F, Fut>(
    cancel: CancellationToken,
    fetch_page: F,
) -> impl Stream<Item = PolicySimResult<T>>
where
    F: FnMut(Option<C>) -> Fut,
    Fut: Future<Output = PolicySimResult<Page<T, C>>>,
{
    let initial = Some(Cursor {
        fetch_page,
        position: None,
        cancel,
        page_number: 1,
    });

    stream::unfold(initial, |state| async move {
        let Cursor {
            mut fetch_page,
            position,
            cancel,
            page_number,
        } = state?;

        if cancel.is_cancelled() {
            return Some((vec![Err(PolicySimError::Cancelled)], None));
        }

        trace!("Requesting page {page_number}");
        match fetch_page(position).await {
            Ok(page) => {
                trace!("Page {page_number}: {} items", page.items.len());
                let next = page.next_cursor.map(|cursor| Cursor {
                    fetch_page,
                    position: Some(cursor),
                    cancel,
                    page_number: page_number + 1,
                });
                let items: Vec<PolicySimResult<T>> = page.items.into_iter().map(Ok).collect();
                Some((items, next))
            }
            Err(e) => Some((vec![Err(e)], None)),
        }
    })
    .flat_map(stream::iter)
}

/// End `items` right after its first error without polling it again.
pub(crate) fn stop_after_error<T, S>(items: S) -> impl Stream<Item = PolicySimResult<T>>
where
    S: Stream<Item = PolicySimResult<T>>,
{
    stream::unfold(Some(Box::pin(items)), |state| async move {
        let mut items = state?;
        let item = items.next().await?;
        let next = if item.is_ok() { Some(items) } else { None };
        Some((item, next))
    })
}

/// Fail with [`PolicySimError::Cancelled`] once cancellation was requested.
pub(crate) fn ensure_active(cancel: &CancellationToken) -> PolicySimResult<()> {
    if cancel.is_cancelled() {
        Err(PolicySimError::Cancelled)
    } else {
        Ok(())
    }
}

struct Cursor<F, C> {
    fetch_page: F,
    position: Option<C>,
    cancel: CancellationToken,
    page_number: usize,
}
