//! Selection movement and the worktree list's display pipeline.

use super::*;

/// Next position in a list of `len` rows, wrapping to the top.
pub fn next_index(selected: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (selected + 1) % len
    }
}

/// Previous position in a list of `len` rows, wrapping to the bottom.
pub fn prev_index(selected: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if selected == 0 {
        len - 1
    } else {
        selected - 1
    }
}

/// Keep `selected` inside a list of `len` rows.
pub fn clamp_index(selected: usize, len: usize) -> usize {
    selected.min(len.saturating_sub(1))
}

impl App {
    /// Recompute the displayed worktrees: sort, then fuzzy filter on the
    /// branch name, then clamp the selection.
    pub fn refresh_display(&mut self) {
        let sorted = sort_indices(&self.worktrees, self.list.sort);
        let worktrees = &self.worktrees;
        let matched = filter_indices(&sorted, &self.list.filter, |&i| {
            worktrees[i].display_branch()
        });
        self.list.display = matched.into_iter().map(|pos| sorted[pos]).collect();
        self.list.selected = clamp_index(self.list.selected, self.list.display.len());
    }

    /// Worktrees in display order
    pub fn displayed_worktrees(&self) -> impl Iterator<Item = &Worktree> {
        self.list.display.iter().map(|&i| &self.worktrees[i])
    }

    pub fn selected_worktree(&self) -> Option<&Worktree> {
        self.list
            .display
            .get(self.list.selected)
            .map(|&i| &self.worktrees[i])
    }

    pub fn select_next(&mut self) {
        self.list.selected = next_index(self.list.selected, self.list.display.len());
    }

    /// Move up; at the first row focus moves to the filter line instead.
    pub fn select_prev(&mut self) {
        if self.list.selected == 0 {
            self.list.mode = InputMode::Insert;
        } else {
            self.list.selected -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.list.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.list.selected = self.list.display.len().saturating_sub(1);
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.list.filter.push(c);
        self.list.selected = 0;
        self.refresh_display();
    }

    pub fn pop_filter_char(&mut self) {
        self.list.filter.pop();
        self.list.selected = 0;
        self.refresh_display();
    }

    pub fn clear_filter(&mut self) {
        self.list.filter.clear();
        self.list.selected = 0;
        self.refresh_display();
    }

    pub fn cycle_sort(&mut self) {
        self.list.sort = self.list.sort.next();
        self.refresh_display();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_wrap_and_clamp() {
        assert_eq!(next_index(2, 3), 0);
        assert_eq!(next_index(0, 3), 1);
        assert_eq!(prev_index(0, 3), 2);
        assert_eq!(prev_index(0, 0), 0);
        assert_eq!(next_index(5, 0), 0);
        assert_eq!(clamp_index(7, 3), 2);
        assert_eq!(clamp_index(7, 0), 0);
    }
}
