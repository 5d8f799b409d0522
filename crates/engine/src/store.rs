//! The row store: the ordered list of entries edited during a session.
//!
//! The store always holds at least one entry. Edits never validate across
//! fields; the split totals are checked by [`RowStore::validate`] and enforced
//! only when [`RowStore::calculate`] is called.
use crate::{
    AllocationSchema, EngineError, ResultEngine,
    entry::{Entry, EntryId, Field},
    summary::{self, Summary},
};

/// Result of [`RowStore::remove_row`].
#[derive(Clone, Debug, PartialEq)]
pub enum RemoveOutcome {
    Removed(Entry),
    /// The store held a single entry; nothing was removed.
    KeptLastRow,
}

/// Result of the validation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validation {
    Valid,
    /// First entry (in store order) whose splits do not total 100%.
    Invalid { index: usize, id: EntryId, sum: u32 },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

#[derive(Clone, Debug)]
pub struct RowStore {
    schema: AllocationSchema,
    entries: Vec<Entry>,
}

impl RowStore {
    /// New store holding one default entry.
    pub fn new(schema: AllocationSchema) -> Self {
        let entries = vec![Entry::new(schema.default_splits())];
        Self { schema, entries }
    }

    pub fn schema(&self) -> &AllocationSchema {
        &self.schema
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: the store never drops below one entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Current position of an entry.
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// Appends a default entry and returns its id.
    pub fn add_row(&mut self) -> EntryId {
        let entry = Entry::new(self.schema.default_splits());
        let id = entry.id;
        self.entries.push(entry);
        tracing::debug!(%id, rows = self.entries.len(), "row added");
        id
    }

    /// Removes the entry at `index`, unless it is the only one left.
    ///
    /// Entries after `index` shift down by one position.
    pub fn remove_row(&mut self, index: usize) -> ResultEngine<RemoveOutcome> {
        if index >= self.entries.len() {
            return Err(EngineError::RowNotFound(index));
        }
        if self.entries.len() == 1 {
            tracing::debug!("refusing to remove the last row");
            return Ok(RemoveOutcome::KeptLastRow);
        }
        let entry = self.entries.remove(index);
        tracing::debug!(id = %entry.id, index, rows = self.entries.len(), "row removed");
        Ok(RemoveOutcome::Removed(entry))
    }

    /// Sets one field of the entry at `index`.
    pub fn update_field(&mut self, index: usize, field: Field) -> ResultEngine<()> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(EngineError::RowNotFound(index))?;
        tracing::debug!(id = %entry.id, index, ?field, "field updated");
        entry.apply(field)
    }

    /// Checks every entry's splits total 100%, stopping at the first failure.
    pub fn validate(&self) -> Validation {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, entry)| !entry.is_balanced())
            .map_or(Validation::Valid, |(index, entry)| Validation::Invalid {
                index,
                id: entry.id,
                sum: entry.split_sum(),
            })
    }

    /// Positions of every entry whose splits do not total 100%.
    pub fn invalid_rows(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.is_balanced())
            .map(|(index, _)| index)
            .collect()
    }

    /// Validates the store and, if every row is balanced, computes the
    /// summary. A single unbalanced row blocks the whole calculation.
    pub fn calculate(&self) -> ResultEngine<Summary> {
        if let Validation::Invalid { index, sum, .. } = self.validate() {
            tracing::debug!(row = index, sum, "calculation blocked");
            return Err(EngineError::InvalidSplits { row: index, sum });
        }
        Ok(summary::calculate(&self.schema, &self.entries))
    }
}

impl Default for RowStore {
    fn default() -> Self {
        Self::new(AllocationSchema::default())
    }
}
