/// Script-side record of `on` registrations so `off` can find them again by
/// event name and callback identity.
///
/// Any event name is accepted. Names the mascot never emits get no core
/// listener (`id` is `None`) and simply never fire.
pub struct Registrations<C, I> {
    entries: Vec<Registration<C, I>>,
}

struct Registration<C, I> {
    event: String,
    callback: C,
    id: Option<I>,
}

impl<C, I> Default for Registrations<C, I> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C: PartialEq, I> Registrations<C, I> {
    pub fn add(&mut self, event: &str, callback: C, id: Option<I>) {
        self.entries.push(Registration {
            event: event.to_string(),
            callback,
            id,
        });
    }

    /// Drops the earliest registration of `callback` for `event`. `None` when
    /// there was none; otherwise the core listener it owned, if any.
    pub fn remove_first(&mut self, event: &str, callback: &C) -> Option<Option<I>> {
        let idx = self
            .entries
            .iter()
            .position(|r| r.event == event && r.callback == *callback)?;
        Some(self.entries.remove(idx).id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
