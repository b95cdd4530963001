//! The record store: an ordered, in-memory collection of records mirrored to one storage slot.
//!
//! Every mutation rewrites the whole collection to the slot before it returns. If that write
//! fails the error is reported but the in-memory change is kept; there is no rollback.

use crate::error::{typed, ErrorType, IntoResult};
use crate::model::{Record, RecordId};
use crate::slot::Slots;
use crate::Result;
use anyhow::Context;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Holds the records of one list, in storage order.
pub struct RecordStore<R: Record> {
    slots: Arc<dyn Slots>,
    records: Vec<R>,
}

impl<R: Record> RecordStore<R> {
    /// Creates an empty store backed by `slots`. Call `load` to read what was stored before.
    pub fn new(slots: Arc<dyn Slots>) -> Self {
        Self {
            slots,
            records: Vec::new(),
        }
    }

    /// Replaces the in-memory collection with the stored one.
    ///
    /// A missing slot gives an empty collection. A slot that cannot be read or parsed also leaves
    /// the collection empty and returns a `Persistence` error; a malformed blob is first handed to
    /// `Slots::quarantine` so it survives the next save.
    ///
    /// Records stored without an id are given one, and the collection is saved again so the ids
    /// stay stable across loads.
    pub async fn load(&mut self) -> Result<()> {
        self.records.clear();
        let blob = match self
            .slots
            .read(R::SLOT)
            .await
            .with_context(|| format!("Unable to read the stored {} list", R::NOUN))
            .pub_result(ErrorType::Persistence)?
        {
            Some(blob) => blob,
            None => {
                debug!("Nothing stored under '{}' yet", R::SLOT);
                return Ok(());
            }
        };

        let (records, missing_ids) = match parse::<R>(&blob) {
            Ok(parsed) => parsed,
            Err(e) => {
                let kept = match self.slots.quarantine(R::SLOT, &blob).await {
                    Ok(Some(path)) => format!("; a copy was saved to {}", path.display()),
                    Ok(None) => String::new(),
                    Err(qe) => {
                        warn!("Unable to keep a copy of the malformed '{}' data: {qe:#}", R::SLOT);
                        String::new()
                    }
                };
                return Err(e)
                    .with_context(|| {
                        format!(
                            "The stored {} list is malformed and was not loaded{kept}",
                            R::NOUN
                        )
                    })
                    .pub_result(ErrorType::Persistence);
            }
        };

        debug!("Loaded {} records from '{}'", records.len(), R::SLOT);
        self.records = records;
        if missing_ids {
            if let Err(e) = self.save().await {
                warn!("Unable to save the ids assigned to stored records: {e:#}");
            }
        }
        Ok(())
    }

    /// Writes the whole collection to the slot, replacing whatever was there.
    pub async fn save(&self) -> Result<()> {
        let blob = serde_json::to_string(&self.records)
            .with_context(|| format!("Unable to serialize the {} list", R::NOUN))
            .pub_result(ErrorType::Persistence)?;
        self.slots
            .write(R::SLOT, &blob)
            .await
            .with_context(|| format!("Unable to save the {} list", R::NOUN))
            .pub_result(ErrorType::Persistence)?;
        debug!("Saved {} records to '{}'", self.records.len(), R::SLOT);
        Ok(())
    }

    /// A read-only view of the records in storage order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// The storage position of the record with `id`.
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// The storage position `selector` refers to, or an `Index` error.
    pub fn resolve(&self, selector: Selector) -> Result<usize> {
        match selector {
            Selector::Position(index) => {
                self.check_index(index)?;
                Ok(index)
            }
            Selector::Id(id) => self.position(id).ok_or_else(|| {
                typed(ErrorType::Index, format!("No {} has the id {id}", R::NOUN))
            }),
        }
    }

    /// Validates `input`, appends the new record and saves. Returns the new record's id.
    ///
    /// Nothing changes if validation fails.
    pub async fn add(&mut self, input: &R::Input) -> Result<RecordId> {
        let record = R::create(input)?;
        let id = record.id();
        self.records.push(record);
        self.save().await?;
        Ok(id)
    }

    /// Removes the record at storage position `index` and saves. Returns the removed record.
    pub async fn delete_at(&mut self, index: usize) -> Result<R> {
        self.check_index(index)?;
        let removed = self.records.remove(index);
        self.save().await?;
        Ok(removed)
    }

    /// Removes the record with `id` and saves. Returns the removed record.
    pub async fn delete(&mut self, id: RecordId) -> Result<R> {
        let index = self.resolve(Selector::Id(id))?;
        self.delete_at(index).await
    }

    /// Removes the record at `index` right away and hands back its field values.
    ///
    /// The record is gone even if the values are never added back. Prefer `begin_edit`, which
    /// leaves the collection alone until the edit is committed.
    pub async fn take_at(&mut self, index: usize) -> Result<R::Input> {
        let removed = self.delete_at(index).await?;
        Ok(removed.to_input())
    }

    /// Like `take_at`, addressing the record by id.
    pub async fn take(&mut self, id: RecordId) -> Result<R::Input> {
        let index = self.resolve(Selector::Id(id))?;
        self.take_at(index).await
    }

    /// Starts editing the record `selector` refers to. The collection is not changed.
    pub fn begin_edit(&self, selector: Selector) -> Result<EditDraft<R>> {
        let index = self.resolve(selector)?;
        let record = &self.records[index];
        Ok(EditDraft {
            id: record.id(),
            input: record.to_input(),
        })
    }

    /// Validates the draft and replaces the original record in place, keeping its id and
    /// position, then saves.
    ///
    /// Returns an `Index` error if the original was deleted after the draft was made, and a
    /// `Validation` error if the draft's fields are invalid. Nothing changes in either case.
    pub async fn commit_edit(&mut self, draft: EditDraft<R>) -> Result<RecordId> {
        let index = self.resolve(Selector::Id(draft.id))?;
        let revised = self.records[index].revise(&draft.input)?;
        self.records[index] = revised;
        self.save().await?;
        Ok(draft.id)
    }

    /// Abandons a draft. The original record is untouched.
    pub fn cancel_edit(&self, draft: EditDraft<R>) {
        debug!("Edit of {} {} cancelled", R::NOUN, draft.id);
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.records.len() {
            return Err(typed(
                ErrorType::Index,
                format!(
                    "No {} at position {index}, the list has {} record{}",
                    R::NOUN,
                    self.records.len(),
                    if self.records.len() == 1 { "" } else { "s" }
                ),
            ));
        }
        Ok(())
    }
}

/// Parses a stored blob. The flag is true if any stored record had no id, or a null one.
fn parse<R: Record>(blob: &[u8]) -> Result<(Vec<R>, bool)> {
    let values: Vec<serde_json::Value> =
        serde_json::from_slice(blob).context("The stored data is not a JSON array")?;
    let mut missing_ids = false;
    let records = values
        .into_iter()
        .enumerate()
        .map(|(ix, mut value)| {
            if let Some(object) = value.as_object_mut() {
                if object.get("id").map_or(true, serde_json::Value::is_null) {
                    object.remove("id");
                    missing_ids = true;
                }
            }
            serde_json::from_value(value).with_context(|| format!("Record {ix} is malformed"))
        })
        .collect::<Result<Vec<R>>>()?;
    Ok((records, missing_ids))
}

/// The field values of a record being edited. Change `input`, then pass the draft to
/// `RecordStore::commit_edit` or `RecordStore::cancel_edit`.
#[derive(Debug, Clone)]
pub struct EditDraft<R: Record> {
    id: RecordId,
    pub input: R::Input,
}

impl<R: Record> EditDraft<R> {
    /// The id of the record being edited.
    pub fn id(&self) -> RecordId {
        self.id
    }
}

/// Picks out one record: by storage position (a plain number) or by id.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Selector {
    Position(usize),
    Id(RecordId),
}

impl FromStr for Selector {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Ok(Selector::Position(index));
        }
        RecordId::from_str(s)
            .map(Selector::Id)
            .map_err(|_| format!("'{s}' is neither a list position nor a record id"))
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Position(index) => write!(f, "position {index}"),
            Selector::Id(id) => write!(f, "id {id}"),
        }
    }
}

impl From<RecordId> for Selector {
    fn from(id: RecordId) -> Self {
        Selector::Id(id)
    }
}
