/// Cursor over several stacked sections of rows.
///
/// Row moves spill into the nearest non-empty neighbouring section; section
/// jumps land on the first row and may land on an empty section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionCursor {
    lens: Vec<usize>,
    section: usize,
    row: usize,
}

impl SectionCursor {
    pub fn new(lens: Vec<usize>) -> Self {
        let mut cursor = Self {
            lens,
            section: 0,
            row: 0,
        };
        cursor.first();
        cursor
    }

    pub const fn section(&self) -> usize {
        self.section
    }

    pub const fn row(&self) -> usize {
        self.row
    }

    /// `(section, row)` when the focused section has rows.
    pub fn selected(&self) -> Option<(usize, usize)> {
        (self.len_of(self.section) > 0).then_some((self.section, self.row))
    }

    fn len_of(&self, section: usize) -> usize {
        self.lens.get(section).copied().unwrap_or(0)
    }

    pub fn down(&mut self) {
        if self.row + 1 < self.len_of(self.section) {
            self.row += 1;
            return;
        }
        if let Some(next) = (self.section + 1..self.lens.len()).find(|&s| self.len_of(s) > 0) {
            self.section = next;
            self.row = 0;
        }
    }

    pub fn up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            return;
        }
        if let Some(prev) = (0..self.section).rev().find(|&s| self.len_of(s) > 0) {
            self.section = prev;
            self.row = self.len_of(prev) - 1;
        }
    }

    pub fn by(&mut self, steps: usize, forward: bool) {
        for _ in 0..steps {
            if forward {
                self.down();
            } else {
                self.up();
            }
        }
    }

    pub const fn next_section(&mut self) {
        if self.section + 1 < self.lens.len() {
            self.section += 1;
            self.row = 0;
        }
    }

    pub const fn prev_section(&mut self) {
        if self.section > 0 {
            self.section -= 1;
            self.row = 0;
        }
    }

    pub fn first(&mut self) {
        self.section = (0..self.lens.len()).find(|&s| self.len_of(s) > 0).unwrap_or(0);
        self.row = 0;
    }

    pub fn last(&mut self) {
        if let Some(last) = (0..self.lens.len()).rev().find(|&s| self.len_of(s) > 0) {
            self.section = last;
            self.row = self.len_of(last) - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_down_spills_over_empty_sections() {
        let mut cursor = SectionCursor::new(vec![2, 0, 1]);
        cursor.down();
        assert_eq!(cursor.selected(), Some((0, 1)));
        cursor.down();
        assert_eq!(cursor.selected(), Some((2, 0)));
        cursor.down();
        assert_eq!(cursor.selected(), Some((2, 0)));
    }

    #[test]
    fn test_up_lands_on_last_row_of_previous_section() {
        let mut cursor = SectionCursor::new(vec![3, 0, 1]);
        cursor.last();
        assert_eq!(cursor.selected(), Some((2, 0)));
        cursor.up();
        assert_eq!(cursor.selected(), Some((0, 2)));
    }

    #[test]
    fn test_section_jumps_reset_row() {
        let mut cursor = SectionCursor::new(vec![3, 0, 2]);
        cursor.down();
        cursor.next_section();
        assert_eq!((cursor.section(), cursor.row()), (1, 0));
        assert_eq!(cursor.selected(), None);
        cursor.next_section();
        cursor.next_section();
        assert_eq!(cursor.section(), 2);
        cursor.prev_section();
        cursor.prev_section();
        cursor.prev_section();
        assert_eq!(cursor.selected(), Some((0, 0)));
    }

    #[test]
    fn test_first_skips_leading_empty_sections() {
        let cursor = SectionCursor::new(vec![0, 0, 4]);
        assert_eq!(cursor.selected(), Some((2, 0)));
        let empty = SectionCursor::new(vec![0, 0]);
        assert_eq!(empty.selected(), None);
    }
}
