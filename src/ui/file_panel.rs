//! The list of discovered videos.

use crate::discovery::VideoRecord;

/// Scan results with a selection cursor
#[derive(Debug, Default)]
pub struct FilePanel {
    records: Vec<VideoRecord>,
    selected: Option<usize>,
    title: String,
}

impl FilePanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list wholesale with a new scan result
    pub fn set_records(&mut self, title: impl Into<String>, records: Vec<VideoRecord>) {
        self.selected = if records.is_empty() { None } else { Some(0) };
        self.records = records;
        self.title = title.into();
    }

    pub fn records(&self) -> &[VideoRecord] {
        &self.records
    }

    /// Where the current list came from
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&VideoRecord> {
        self.selected.and_then(|i| self.records.get(i))
    }

    pub fn select(&mut self, index: usize) {
        if index < self.records.len() {
            self.selected = Some(index);
        }
    }

    pub fn select_next(&mut self) {
        if self.records.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < self.records.len() => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        if self.records.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(names: &[&str]) -> Vec<VideoRecord> {
        names
            .iter()
            .filter_map(|n| VideoRecord::new(*n, format!("file:///v/{}", n), "1.0 KB"))
            .collect()
    }

    #[test]
    fn test_set_records_replaces_and_selects_first() {
        let mut panel = FilePanel::new();
        panel.set_records("/v", records(&["a.mp4", "b.mkv"]));
        assert_eq!(panel.selected().map(|r| r.name.as_str()), Some("a.mp4"));

        panel.set_records("http://host/", records(&["c.webm"]));
        assert_eq!(panel.records().len(), 1);
        assert_eq!(panel.title(), "http://host/");
        assert_eq!(panel.selected_index(), Some(0));

        panel.set_records("empty", Vec::new());
        assert!(panel.selected().is_none());
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut panel = FilePanel::new();
        panel.select_next();
        assert!(panel.selected().is_none());

        panel.set_records("/v", records(&["a.mp4", "b.mkv"]));
        panel.select_previous();
        assert_eq!(panel.selected_index(), Some(0));
        panel.select_next();
        panel.select_next();
        assert_eq!(panel.selected_index(), Some(1));

        panel.select(5);
        assert_eq!(panel.selected_index(), Some(1));
    }
}
