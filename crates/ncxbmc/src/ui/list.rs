//! Selection and scroll state over an ordered sequence of rows.

/// Selection + first-visible-row over a list whose items live elsewhere.
///
/// After every draw `selected - scroll` stays within `0..viewport_height`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ScrollableList {
    selected: usize,
    scroll: usize,
    viewport_height: usize,
}

impl ScrollableList {
    #[cfg(test)]
    pub(crate) fn new(viewport_height: usize) -> Self {
        Self {
            selected: 0,
            scroll: 0,
            viewport_height,
        }
    }

    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    pub(crate) fn scroll(&self) -> usize {
        self.scroll
    }

    /// A new height re-anchors the scroll so the selection stays on screen.
    pub(crate) fn set_viewport(&mut self, height: usize) {
        if height != self.viewport_height {
            self.viewport_height = height;
            self.anchor();
        }
    }

    /// Clamp scroll into `selected - (viewport_height - 1)..=selected`.
    pub(crate) fn anchor(&mut self) {
        if self.viewport_height == 0 {
            return;
        }
        let lowest = self.selected.saturating_sub(self.viewport_height - 1);
        self.scroll = self.scroll.clamp(lowest, self.selected);
    }

    /// Move the selection by `delta`, clamped to `0..count`. Scroll is left to
    /// [`Self::reconcile_scroll`].
    pub(crate) fn move_selection(&mut self, delta: isize, count: usize) {
        if count == 0 {
            return;
        }
        let target = self.selected.saturating_add_signed(delta);
        self.selected = target.min(count - 1);
    }

    /// Single-step scroll correction, run once per draw.
    pub(crate) fn reconcile_scroll(&mut self) {
        let last_row = self.viewport_height.saturating_sub(1);
        if self.selected.saturating_sub(self.scroll) > last_row {
            self.scroll += 1;
        }
        if self.selected < self.scroll {
            self.scroll -= 1;
        }
    }

    /// Rows in the viewport, paired with their absolute index.
    pub(crate) fn visible_slice<'a, T>(&self, items: &'a [T]) -> Vec<(usize, &'a T)> {
        items
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(self.viewport_height)
            .collect()
    }

    /// Force the selection to `index` and scroll just enough to show it.
    pub(crate) fn reset_to(&mut self, index: usize, count: usize) {
        self.selected = if count == 0 { 0 } else { index.min(count - 1) };
        let last_row = self.viewport_height.saturating_sub(1);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected - self.scroll > last_row {
            self.scroll = self.selected - last_row;
        }
    }

    /// Put back a selection and scroll saved in a history frame.
    pub(crate) fn restore(&mut self, selected: usize, scroll: usize) {
        self.selected = selected;
        self.scroll = scroll;
    }

    /// Pull the selection back inside a list that just shrank.
    pub(crate) fn clamp_to(&mut self, count: usize) {
        if count == 0 {
            self.selected = 0;
            self.scroll = 0;
            return;
        }
        if self.selected >= count {
            self.selected = count - 1;
        }
        if self.scroll > self.selected {
            self.scroll = self.selected;
        }
    }
}
