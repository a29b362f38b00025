use smallvec::SmallVec;

use crate::server::{Request, Response};

/// Argument slots kept inline before spilling to the heap.
/// Handler methods rarely declare more than a handful of parameters.
pub const MAX_INLINE_ARGS: usize = 8;

/// A bound argument value.
#[derive(Debug)]
pub enum Arg<'a> {
    /// No binding reached this slot.
    Unset,
    Text(String),
    Int32(i32),
    Double(f64),
    Request(&'a Request),
    Response(&'a mut Response),
}

/// Positional arguments for one handler invocation.
///
/// Built per request by the dispatcher and consumed by [`Component::invoke`](super::Component::invoke).
#[derive(Debug)]
pub struct Args<'a> {
    slots: SmallVec<[Arg<'a>; MAX_INLINE_ARGS]>,
}

impl<'a> Args<'a> {
    /// `arity` unset slots.
    #[must_use]
    pub fn with_arity(arity: usize) -> Self {
        let mut slots = SmallVec::with_capacity(arity);
        slots.extend((0..arity).map(|_| Arg::Unset));
        Self { slots }
    }

    /// Place `arg` at `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, arg: Arg<'a>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = arg;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Arg<'a>> {
        self.slots.get(index)
    }

    #[must_use]
    pub fn is_unset(&self, index: usize) -> bool {
        matches!(self.slots.get(index), None | Some(Arg::Unset))
    }

    /// Text at `index`. Values passed through unconverted also land here.
    #[must_use]
    pub fn text(&self, index: usize) -> Option<&str> {
        match self.slots.get(index) {
            Some(Arg::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn int32(&self, index: usize) -> Option<i32> {
        match self.slots.get(index) {
            Some(Arg::Int32(value)) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn double(&self, index: usize) -> Option<f64> {
        match self.slots.get(index) {
            Some(Arg::Double(value)) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn request(&self, index: usize) -> Option<&Request> {
        match self.slots.get(index) {
            Some(Arg::Request(req)) => Some(*req),
            _ => None,
        }
    }

    pub fn response(&mut self, index: usize) -> Option<&mut Response> {
        match self.slots.get_mut(index) {
            Some(Arg::Response(resp)) => Some(&mut **resp),
            _ => None,
        }
    }
}
