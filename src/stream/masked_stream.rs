//! Masking adapter for async row streams

use super::cursor::Value;
use super::masking_reader::mask_values;
use crate::masking::MaskingRule;
use crate::Result;
use futures::Stream;
use std::collections::{HashMap, HashSet};
use std::pin::Pin;
use std::task::{ready, Context, Poll};

/// Stream of rows with the configured columns masked.
///
/// Same per-row semantics as `MaskingRowReader`: masked positions become
/// `Value::Text`, errors from the inner stream are yielded unchanged.
pub struct MaskedRowStream<S> {
    inner: S,
    masked: HashSet<usize>,
    rules: HashMap<usize, MaskingRule>,
}

impl<S> MaskedRowStream<S>
where
    S: Stream<Item = Result<Vec<Value>>> + Unpin,
{
    /// Mask every column that has a rule
    pub fn new(inner: S, rules: HashMap<usize, MaskingRule>) -> Self {
        Self {
            inner,
            masked: rules.keys().copied().collect(),
            rules,
        }
    }

    /// Unwrap, returning the inner stream
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S> Stream for MaskedRowStream<S>
where
    S: Stream<Item = Result<Vec<Value>>> + Unpin,
{
    type Item = Result<Vec<Value>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
            Some(Ok(mut row)) => {
                Poll::Ready(Some(mask_values(&this.masked, &this.rules, &mut row).map(|()| row)))
            }
            other => Poll::Ready(other),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
