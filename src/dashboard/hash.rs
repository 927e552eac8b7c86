// This file is part of the terraform-provider-newrelic project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Identity of the dashboard widgets.
//!
//! Widgets have no natural order: two widgets are the same member of the
//! set when every field matches. The key is the CRC-32 (IEEE) checksum of
//! `row-column-width-height-nrql-title-visualization-notes`, unset fields
//! being rendered as `0` or the empty string.

use std::collections::btree_map::{self, BTreeMap};

use super::state::WidgetState;

pub(crate) fn widget_hash(widget: &WidgetState) -> u32 {
    let key = format!(
        "{}-{}-{}-{}-{}-{}-{}-{}",
        widget.row.unwrap_or_default(),
        widget.column.unwrap_or_default(),
        widget.width.unwrap_or_default(),
        widget.height.unwrap_or_default(),
        widget.nrql.as_str(),
        widget.title.as_str(),
        widget.visualization.as_str(),
        widget.notes.as_str(),
    );
    crc32fast::hash(key.as_bytes())
}

/// Widgets keyed by their hash, iterated in hash order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct WidgetSet<'a> {
    widgets: BTreeMap<u32, WidgetState<'a>>,
}

impl<'a> WidgetSet<'a> {
    /// Add a widget, returns false when an identical widget is already present
    pub fn insert(&mut self, widget: WidgetState<'a>) -> bool {
        match self.widgets.entry(widget_hash(&widget)) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(widget);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    #[cfg(test)]
    pub fn contains(&self, widget: &WidgetState) -> bool {
        self.widgets.contains_key(&widget_hash(widget))
    }

    pub fn iter(&self) -> impl Iterator<Item = &WidgetState<'a>> {
        self.widgets.values()
    }
}

impl<'a> FromIterator<WidgetState<'a>> for WidgetSet<'a> {
    fn from_iter<I: IntoIterator<Item = WidgetState<'a>>>(iter: I) -> Self {
        let mut set = Self::default();
        for widget in iter {
            set.insert(widget);
        }
        set
    }
}

impl<'a> IntoIterator for WidgetSet<'a> {
    type Item = WidgetState<'a>;
    type IntoIter = btree_map::IntoValues<u32, WidgetState<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.widgets.into_values()
    }
}
