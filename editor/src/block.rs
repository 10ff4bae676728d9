//! Block edits. An edit produces a new block value; the original is never
//! modified, and the id and type always carry over.

use folio_model::{Block, BlockType, Document, Lang, LocalizedText, Record};
use serde_json::Value;

use crate::error::EditError;
use crate::fields::{fields_for, find, FieldSpec, InputKind, TUNING_KEYS};
use crate::order::{swap_neighbor, Direction};

/// One change to a block's fields.
///
/// `field` names a field of the block type's surface (see
/// [`fields_for`]); `key` names a field of a sub-item.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockEdit {
    /// Sets a text, URL or choice field.
    SetText {
        /// Field name.
        field: String,
        /// New value.
        value: String,
    },
    /// Sets one language of a localized field. An empty value clears it.
    SetLocalized {
        /// Base field name.
        field: String,
        /// Language edited.
        lang: Lang,
        /// New value.
        value: String,
    },
    /// Sets a toggle.
    SetFlag {
        /// Field name.
        field: String,
        /// New value.
        value: bool,
    },
    /// Sets a number field.
    SetNumber {
        /// Field name.
        field: String,
        /// New value.
        value: u64,
    },
    /// Sets or clears one animated background tuning key.
    SetTuning {
        /// Tuning key, such as `mouseForce`.
        key: String,
        /// New value; `None` restores the built-in value.
        value: Option<Value>,
    },
    /// Appends an empty entry to a list field.
    AddEntry {
        /// List field.
        field: String,
    },
    /// Removes an entry from a list field.
    RemoveEntry {
        /// List field.
        field: String,
        /// Entry position.
        index: usize,
    },
    /// Swaps an entry with its neighbor. At the edge this does nothing.
    MoveEntry {
        /// List field.
        field: String,
        /// Entry position.
        index: usize,
        /// Neighbor to swap with.
        direction: Direction,
    },
    /// Sets one entry of a string list.
    SetEntry {
        /// List field.
        field: String,
        /// Entry position.
        index: usize,
        /// New value.
        value: String,
    },
    /// Sets a text field of one sub-item.
    SetItemText {
        /// Item list field.
        field: String,
        /// Item position.
        index: usize,
        /// Item field.
        key: String,
        /// New value.
        value: String,
    },
    /// Sets one language of a localized field of one sub-item.
    SetItemLocalized {
        /// Item list field.
        field: String,
        /// Item position.
        index: usize,
        /// Item field.
        key: String,
        /// Language edited.
        lang: Lang,
        /// New value.
        value: String,
    },
}

impl BlockEdit {
    /// The surface field the edit touches (`liquid_settings` for tuning).
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            BlockEdit::SetTuning { .. } => "liquid_settings",
            BlockEdit::SetText { field, .. }
            | BlockEdit::SetLocalized { field, .. }
            | BlockEdit::SetFlag { field, .. }
            | BlockEdit::SetNumber { field, .. }
            | BlockEdit::AddEntry { field }
            | BlockEdit::RemoveEntry { field, .. }
            | BlockEdit::MoveEntry { field, .. }
            | BlockEdit::SetEntry { field, .. }
            | BlockEdit::SetItemText { field, .. }
            | BlockEdit::SetItemLocalized { field, .. } => field,
        }
    }
}

fn not_editable(owner: &str, field: &str, input: &'static str) -> EditError {
    EditError::NotEditable {
        owner: owner.to_string(),
        field: field.to_string(),
        input,
    }
}

/// Applies an edit, returning the edited block.
///
/// # Errors
///
/// Returns an [`EditError`] when the block's type is unknown, the field is
/// not on its surface, the edit does not fit the field, an index is out of
/// range, or the result no longer decodes (for example an unknown
/// collection). The input block is unaffected either way.
pub fn apply_edit(block: &Block, edit: &BlockEdit) -> Result<Block, EditError> {
    let block_type = block
        .block_type()
        .ok_or_else(|| EditError::UnknownType(block.type_name().to_string()))?;
    let owner = block_type.as_str();
    let spec = find(fields_for(block_type), edit.field())
        .ok_or_else(|| not_editable(owner, edit.field(), "surface"))?;
    let mut record = block.to_record();
    edit_record(&mut record, owner, spec, edit)?;
    let edited = Block::from_record(&record)?;
    // The wire form carries id and type through unchanged.
    block.with_body(edited.body().clone()).map_err(EditError::from)
}

fn edit_record(
    record: &mut Record,
    owner: &str,
    spec: &FieldSpec,
    edit: &BlockEdit,
) -> Result<(), EditError> {
    let name = spec.name;
    match (edit, spec.input) {
        (BlockEdit::SetText { value, .. }, input) if input.is_plain_text() => {
            if let InputKind::Choice(choices) = input {
                if !choices.contains(&value.as_str()) {
                    return Err(EditError::InvalidChoice {
                        field: name.to_string(),
                        value: value.clone(),
                    });
                }
            }
            record.set(name, value.as_str());
        }
        (BlockEdit::SetLocalized { lang, value, .. }, input) if input.is_localized() => {
            let mut text = record.localized(name);
            text.set(*lang, value.as_str());
            record.put_localized(name, &text);
        }
        (BlockEdit::SetFlag { value, .. }, InputKind::Toggle) => record.set(name, *value),
        (BlockEdit::SetNumber { value, .. }, InputKind::Number) => record.set(name, *value),
        (BlockEdit::SetTuning { key, value }, InputKind::Tuning) => {
            set_tuning(record, key, value.as_ref())?;
        }
        (BlockEdit::AddEntry { .. }, InputKind::StringList) => {
            let mut entries = record.strings(name);
            entries.push(String::new());
            record.put_strings(name, &entries);
        }
        (BlockEdit::AddEntry { .. }, InputKind::Items(item_fields)) => {
            let mut items = record.records(name);
            items.push(empty_item(item_fields));
            record.put_records(name, items);
        }
        (BlockEdit::RemoveEntry { index, .. }, InputKind::StringList) => {
            let mut entries = record.strings(name);
            check_index(name, *index, entries.len())?;
            entries.remove(*index);
            record.put_strings(name, &entries);
        }
        (BlockEdit::RemoveEntry { index, .. }, InputKind::Items(_)) => {
            let mut items = record.records(name);
            check_index(name, *index, items.len())?;
            items.remove(*index);
            record.put_records(name, items);
        }
        (BlockEdit::MoveEntry { index, direction, .. }, InputKind::StringList) => {
            let mut entries = record.strings(name);
            check_index(name, *index, entries.len())?;
            swap_neighbor(&mut entries, *index, *direction);
            record.put_strings(name, &entries);
        }
        (BlockEdit::MoveEntry { index, direction, .. }, InputKind::Items(_)) => {
            let mut items = record.records(name);
            check_index(name, *index, items.len())?;
            swap_neighbor(&mut items, *index, *direction);
            record.put_records(name, items);
        }
        (BlockEdit::SetEntry { index, value, .. }, InputKind::StringList) => {
            let mut entries = record.strings(name);
            check_index(name, *index, entries.len())?;
            entries[*index] = value.clone();
            record.put_strings(name, &entries);
        }
        (BlockEdit::SetItemText { index, key, value, .. }, InputKind::Items(item_fields)) => {
            let item_spec = find(item_fields, key)
                .filter(|f| f.input.is_plain_text())
                .ok_or_else(|| not_editable(name, key, "text"))?;
            let mut items = record.records(name);
            check_index(name, *index, items.len())?;
            items[*index].set(item_spec.name, value.as_str());
            record.put_records(name, items);
        }
        (
            BlockEdit::SetItemLocalized {
                index,
                key,
                lang,
                value,
                ..
            },
            InputKind::Items(item_fields),
        ) => {
            let item_spec = find(item_fields, key)
                .filter(|f| f.input.is_localized())
                .ok_or_else(|| not_editable(name, key, "localized"))?;
            let mut items = record.records(name);
            check_index(name, *index, items.len())?;
            let item = &mut items[*index];
            let mut text: LocalizedText = item.localized(item_spec.name);
            text.set(*lang, value.as_str());
            item.put_localized(item_spec.name, &text);
            record.put_records(name, items);
        }
        (_, input) => return Err(not_editable(owner, name, input.name())),
    }
    Ok(())
}

fn check_index(field: &str, index: usize, len: usize) -> Result<(), EditError> {
    if index < len {
        Ok(())
    } else {
        Err(EditError::NoEntry {
            field: field.to_string(),
            index,
            len,
        })
    }
}

/// A new sub-item with every field empty.
fn empty_item(item_fields: &[FieldSpec]) -> Record {
    let mut item = Record::new();
    for spec in item_fields {
        if spec.input.is_localized() {
            item.put_localized(spec.name, &LocalizedText::default());
        } else {
            item.set(spec.name, "");
        }
    }
    item
}

fn set_tuning(record: &mut Record, key: &str, value: Option<&Value>) -> Result<(), EditError> {
    let is_flag = TUNING_KEYS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, flag)| *flag)
        .ok_or_else(|| not_editable("liquid_settings", key, "tuning"))?;
    let mut settings = record.record("liquid_settings").unwrap_or_default();
    match value {
        None => {
            settings.remove(key);
        }
        Some(v) if (is_flag && v.is_boolean()) || (!is_flag && v.is_number()) => {
            settings.set(key, v.clone());
        }
        Some(_) => {
            let expected = if is_flag { "flag" } else { "number" };
            return Err(not_editable("liquid_settings", key, expected));
        }
    }
    record.set("liquid_settings", settings.into_value());
    Ok(())
}

/// The current value of one surface field, for display in an editor.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text, URL or choice.
    Text(String),
    /// Localized text.
    Localized(LocalizedText),
    /// Toggle.
    Flag(bool),
    /// Number.
    Number(u64),
    /// String list.
    List(Vec<String>),
    /// Sub-items.
    Items(Vec<Record>),
    /// Tuning keys that are set.
    Tuning(Record),
}

/// The editing surface of a block populated with its current values, in
/// surface order.
///
/// # Errors
///
/// Returns [`EditError::UnknownType`] for blocks of an unknown type.
pub fn describe(block: &Block) -> Result<Vec<(FieldSpec, FieldValue)>, EditError> {
    let block_type: BlockType = block
        .block_type()
        .ok_or_else(|| EditError::UnknownType(block.type_name().to_string()))?;
    let record = block.to_record();
    Ok(fields_for(block_type)
        .iter()
        .map(|spec| {
            let value = match spec.input {
                InputKind::Text | InputKind::Url | InputKind::Choice(_) => {
                    FieldValue::Text(record.text(spec.name))
                }
                InputKind::Localized | InputKind::LocalizedMultiline => {
                    FieldValue::Localized(record.localized(spec.name))
                }
                InputKind::Toggle => FieldValue::Flag(record.flag(spec.name)),
                InputKind::Number => FieldValue::Number(
                    record
                        .number(spec.name)
                        .filter(|n| n.is_finite() && *n >= 0.0)
                        .map_or(0, |n| n.trunc() as u64),
                ),
                InputKind::StringList => FieldValue::List(record.strings(spec.name)),
                InputKind::Items(_) => FieldValue::Items(record.records(spec.name)),
                InputKind::Tuning => {
                    FieldValue::Tuning(record.record(spec.name).unwrap_or_default())
                }
            };
            (*spec, value)
        })
        .collect())
}
