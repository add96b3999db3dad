use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::models::action::Action;
use crate::models::card::Card;
use crate::models::widget::{SelectionInputType, Widget};

/// Current value of one input field. Checkbox groups, multi-selects and
/// switches sharing a name carry several values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    pub values: Vec<String>,
    #[serde(default)]
    pub user_edited: bool,
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| v.trim().is_empty())
    }
}

/// Switches and checkboxes that are off submit nothing, which is a valid answer.
fn is_toggle(widget: &Widget) -> bool {
    match widget {
        Widget::SelectionInput(s) => matches!(
            s.selection_type,
            SelectionInputType::CheckBox | SelectionInputType::Switch
        ),
        _ => widget.as_switch().is_some(),
    }
}

/// Per-frame form values keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    fields: FxHashMap<String, FieldValue>,
}

impl FormState {
    /// Seeds every input of `card` with the default the card declares.
    pub fn from_card(card: &Card) -> Self {
        let mut fields: FxHashMap<String, FieldValue> = FxHashMap::default();
        for widget in card.widgets() {
            let Some(name) = widget.field_name() else {
                continue;
            };
            let entry = fields.entry(name.to_string()).or_default();
            match widget {
                Widget::TextInput(w) => {
                    if let Some(v) = w.default_value() {
                        entry.values.push(v.to_string());
                    }
                }
                Widget::SelectionInput(w) => entry.values.extend(
                    w.items()
                        .iter()
                        .filter(|i| i.selected)
                        .map(|i| i.value.clone()),
                ),
                Widget::DateTimePicker(w) => {
                    if let Some(ms) = w.value_ms_epoch {
                        entry.values.push(ms.to_string());
                    }
                }
                _ => {
                    if let Some(s) = widget.as_switch() {
                        if s.selected {
                            entry.values.push(s.value.clone());
                        }
                    }
                }
            }
        }
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.fields.get(name).map(|f| f.values.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Records a user edit. Returns `None` when the card has no such field,
    /// otherwise whether the stored value changed.
    pub fn set(&mut self, name: &str, values: Vec<String>) -> Option<bool> {
        let field = self.fields.get_mut(name)?;
        let changed = field.values != values;
        field.values = values;
        field.user_edited = true;
        Some(changed)
    }

    /// Names the action needs that currently hold no value, in a stable order.
    pub fn missing_required(&self, card: &Card, action: &Action) -> Vec<String> {
        let is_missing = |name: &str| self.fields.get(name).map_or(true, FieldValue::is_empty);
        if action.requires_all_widgets() {
            let toggles: Vec<&str> = card
                .widgets()
                .filter(|w| is_toggle(w))
                .filter_map(Widget::field_name)
                .collect();
            card.field_names()
                .into_iter()
                .filter(|n| !toggles.contains(n) && is_missing(n))
                .map(str::to_string)
                .collect()
        } else {
            action
                .required_widgets()
                .iter()
                .filter(|n| is_missing(n))
                .cloned()
                .collect()
        }
    }

    /// Carries user edits from `edits` over the defaults of this form, field by
    /// field. Fields the new card no longer declares are dropped.
    pub fn keep_user_edits(&mut self, edits: &FormState) -> usize {
        let mut kept = 0;
        for (name, edit) in &edits.fields {
            if !edit.user_edited {
                continue;
            }
            if let Some(field) = self.fields.get_mut(name) {
                *field = edit.clone();
                kept += 1;
            }
        }
        kept
    }

    /// Deterministic view for event payloads and snapshots.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<String>> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.values.clone()))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/form.rs"]
mod tests;
