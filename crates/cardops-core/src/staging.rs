//! In-memory table of accepted entries and its edit state machine.

use thiserror::Error;
use tracing::debug;

use cardops_validate::StagedEntry;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StagingError {
    #[error("index {index} out of range for table of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingState {
    Idle,
    Populated,
    Editing { index: usize },
}

/// Ordered staged entries. Nothing here is persisted.
#[derive(Debug, Clone, Default)]
pub struct StagingTable {
    entries: Vec<StagedEntry>,
    editing: Option<usize>,
}

impl StagingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StagingState {
        match (self.editing, self.entries.is_empty()) {
            (Some(index), _) => StagingState::Editing { index },
            (None, true) => StagingState::Idle,
            (None, false) => StagingState::Populated,
        }
    }

    pub fn entries(&self) -> &[StagedEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&StagedEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    pub fn append(&mut self, entry: StagedEntry) {
        self.entries.push(entry);
    }

    /// Append entries after the existing ones, keeping their order.
    pub fn append_all(&mut self, entries: impl IntoIterator<Item = StagedEntry>) -> usize {
        let before = self.entries.len();
        self.entries.extend(entries);
        self.entries.len() - before
    }

    /// Enter edit mode for `index` and return the entry to load into the form.
    pub fn begin_edit(&mut self, index: usize) -> Result<&StagedEntry, StagingError> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get(index)
            .ok_or(StagingError::IndexOutOfRange { index, len })?;
        self.editing = Some(index);
        Ok(entry)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Replace the edited entry, or append when not editing. Returns the
    /// index written and leaves edit mode.
    pub fn save(&mut self, entry: StagedEntry) -> usize {
        match self.editing.take() {
            Some(index) => {
                self.entries[index] = entry;
                debug!(index, "staged entry replaced");
                index
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        }
    }

    pub fn remove_at(&mut self, index: usize) -> Result<StagedEntry, StagingError> {
        let len = self.entries.len();
        if index >= len {
            return Err(StagingError::IndexOutOfRange { index, len });
        }
        let removed = self.entries.remove(index);
        self.editing = match self.editing {
            Some(editing) if editing == index => None,
            Some(editing) if editing > index => Some(editing - 1),
            other => other,
        };
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.editing = None;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use cardops_model::{CompanySpec, FieldSpec, ValidatedRecord};
    use cardops_validate::{CONTRACT_FIELD, CompanySchema};

    use super::*;

    fn entry(name: &str) -> StagedEntry {
        let company = CompanySchema::compile(&CompanySpec {
            fields: vec![FieldSpec::new(CONTRACT_FIELD, "N° do Contrato")],
        })
        .expect("compile")
        .validate(&BTreeMap::from([(
            CONTRACT_FIELD.to_string(),
            "12345678000190".to_string(),
        )]))
        .expect("company");
        let record = ValidatedRecord::new(BTreeMap::from([("nome".to_string(), name.to_string())]));
        StagedEntry::new(company, record)
    }

    fn names(table: &StagingTable) -> Vec<&str> {
        table
            .entries()
            .iter()
            .filter_map(|entry| entry.get("nome"))
            .collect()
    }

    #[test]
    fn append_and_remove_walk_between_idle_and_populated() {
        let mut table = StagingTable::new();
        assert_eq!(table.state(), StagingState::Idle);
        table.append(entry("Ana Souza"));
        assert_eq!(table.state(), StagingState::Populated);
        table.remove_at(0).expect("remove");
        assert_eq!(table.state(), StagingState::Idle);
    }

    #[test]
    fn save_replaces_while_editing_and_appends_otherwise() {
        let mut table = StagingTable::new();
        table.append_all([entry("Ana Souza"), entry("Bruno Lima")]);

        let loaded = table.begin_edit(1).expect("edit");
        assert_eq!(loaded.get("nome"), Some("Bruno Lima"));
        assert_eq!(table.state(), StagingState::Editing { index: 1 });

        assert_eq!(table.save(entry("Bruno Costa")), 1);
        assert_eq!(table.state(), StagingState::Populated);
        assert_eq!(names(&table), vec!["Ana Souza", "Bruno Costa"]);

        assert_eq!(table.save(entry("Carla Dias")), 2);
        assert_eq!(names(&table), vec!["Ana Souza", "Bruno Costa", "Carla Dias"]);
    }

    #[test]
    fn cancel_edit_leaves_entries_untouched() {
        let mut table = StagingTable::new();
        table.append(entry("Ana Souza"));
        table.begin_edit(0).expect("edit");
        table.cancel_edit();
        assert_eq!(table.state(), StagingState::Populated);
        assert_eq!(names(&table), vec!["Ana Souza"]);
    }

    #[test]
    fn removal_adjusts_the_edited_index() {
        let mut table = StagingTable::new();
        table.append_all([entry("Ana Souza"), entry("Bruno Lima"), entry("Carla Dias")]);

        table.begin_edit(2).expect("edit");
        table.remove_at(0).expect("remove before");
        assert_eq!(table.state(), StagingState::Editing { index: 1 });

        table.remove_at(1).expect("remove edited");
        assert_eq!(table.state(), StagingState::Populated);
        assert_eq!(names(&table), vec!["Bruno Lima"]);
    }

    #[test]
    fn out_of_range_indices_fail() {
        let mut table = StagingTable::new();
        assert_eq!(
            table.begin_edit(0).map(|_| ()),
            Err(StagingError::IndexOutOfRange { index: 0, len: 0 })
        );
        assert!(table.remove_at(3).is_err());
        assert_eq!(table.state(), StagingState::Idle);
    }
}
