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

use std::borrow::Cow;

use tf_provider::value::Value;

use crate::client::{
    Dashboard, DashboardMetadata, DashboardWidget, DashboardWidgetData, DashboardWidgetLayout,
    DashboardWidgetPresentation,
};
use crate::utils::optional_string;

use super::hash::WidgetSet;
use super::state::{DashboardState, WidgetState};

impl<'a> DashboardState<'a> {
    /// Widgets of the configuration, deduplicated by hash
    pub(super) fn widget_set(&self) -> WidgetSet<'a> {
        self.widget
            .iter()
            .flatten()
            .filter_map(|widget| widget.as_ref_option().cloned())
            .collect()
    }

    /// Build the API request. The id is left to 0, the caller sets it on update.
    pub(super) fn expand(&self) -> Dashboard {
        Dashboard {
            title: self.title.as_str().to_string(),
            icon: self.icon.as_str().to_string(),
            visibility: self.visibility.as_str().to_string(),
            editable: self.editable.as_str().to_string(),
            metadata: DashboardMetadata { version: 1 },
            widgets: self.widget_set().iter().map(WidgetState::expand).collect(),
            ..Default::default()
        }
    }

    /// Build the state from the API response.
    pub(super) fn flatten(dashboard: &Dashboard) -> Self {
        let widgets: WidgetSet = dashboard.widgets.iter().map(WidgetState::flatten).collect();
        Self {
            id: Value::Value(Cow::Owned(dashboard.id.to_string())),
            title: Value::Value(Cow::Owned(dashboard.title.clone())),
            icon: optional_string(dashboard.icon.clone()),
            visibility: optional_string(dashboard.visibility.clone()),
            editable: optional_string(dashboard.editable.clone()),
            dashboard_url: optional_string(dashboard.ui_url.clone()),
            widget: Value::Value(widgets.into_iter().map(Value::Value).collect()),
        }
    }
}

impl<'a> WidgetState<'a> {
    fn expand(&self) -> DashboardWidget {
        DashboardWidget {
            visualization: self.visualization.as_str().to_string(),
            widget_id: None,
            data: vec![DashboardWidgetData {
                nrql: self.nrql.as_str().to_string(),
            }],
            presentation: DashboardWidgetPresentation {
                title: self.title.as_str().to_string(),
                notes: self.notes.as_str().to_string(),
            },
            layout: DashboardWidgetLayout {
                row: self.row.unwrap_or_default(),
                column: self.column.unwrap_or_default(),
                width: self.width.unwrap_or(1),
                height: self.height.unwrap_or(1),
            },
        }
    }

    fn flatten(widget: &DashboardWidget) -> Self {
        Self {
            title: Value::Value(Cow::Owned(widget.presentation.title.clone())),
            visualization: Value::Value(Cow::Owned(widget.visualization.clone())),
            width: Value::Value(widget.layout.width),
            height: Value::Value(widget.layout.height),
            row: Value::Value(widget.layout.row),
            column: Value::Value(widget.layout.column),
            notes: optional_string(widget.presentation.notes.clone()),
            nrql: optional_string(widget.data.first().map(|data| data.nrql.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::hash::widget_hash;

    fn config() -> DashboardState<'static> {
        let widget = |title: &'static str, row, column, nrql: Option<&'static str>| WidgetState {
            title: Value::Value(Cow::Borrowed(title)),
            visualization: Value::Value(Cow::Borrowed("billboard")),
            width: Value::Value(1),
            height: Value::Value(2),
            row: Value::Value(row),
            column: Value::Value(column),
            notes: Value::Null,
            nrql: nrql.map(Cow::Borrowed).into(),
        };
        DashboardState {
            id: Value::Unknown,
            title: Value::Value(Cow::Borrowed("Service health")),
            icon: Value::Value(Cow::Borrowed("bar-chart")),
            visibility: Value::Value(Cow::Borrowed("all")),
            editable: Value::Value(Cow::Borrowed("editable_by_all")),
            dashboard_url: Value::Unknown,
            widget: Value::Value(
                [
                    widget("Throughput", 1, 1, Some("SELECT rate(count(*), 1 minute) FROM Transaction")),
                    widget("Errors", 1, 2, Some("SELECT count(*) FROM TransactionError")),
                    widget("Empty", 2, 1, None),
                ]
                .into_iter()
                .map(Value::Value)
                .collect(),
            ),
        }
    }

    #[test]
    fn expand_dashboard() {
        let dashboard = config().expand();

        assert_eq!(dashboard.id, 0);
        assert_eq!(dashboard.title, "Service health");
        assert_eq!(dashboard.metadata.version, 1);
        assert_eq!(dashboard.widgets.len(), 3);
        for widget in &dashboard.widgets {
            assert_eq!(widget.data.len(), 1);
            assert_eq!(widget.layout.height, 2);
        }

        // Widgets are sent in hash order
        let hashes: Vec<u32> = dashboard
            .widgets
            .iter()
            .map(|widget| widget_hash(&WidgetState::flatten(widget)))
            .collect();
        let mut sorted = hashes.clone();
        sorted.sort();
        assert_eq!(hashes, sorted);
    }

    #[test]
    fn flatten_reproduces_the_set() {
        let config = config();
        let mut dashboard = config.expand();
        dashboard.id = 129507;
        dashboard.ui_url = "https://insights.newrelic.com/accounts/1/dashboards/129507".into();
        for (i, widget) in dashboard.widgets.iter_mut().enumerate() {
            widget.widget_id = Some(i as i64);
        }
        dashboard.widgets.reverse();

        let state = DashboardState::flatten(&dashboard);

        assert_eq!(state.id.as_str(), "129507");
        assert_eq!(state.widget, config.widget);
        assert_eq!(state.widget_set(), config.widget_set());
        assert_eq!(state.title, config.title);
        assert!(!state.dashboard_url.is_null());
    }

    #[test]
    fn flatten_without_data() {
        let widget = DashboardWidget {
            visualization: "markdown".into(),
            ..Default::default()
        };
        let state = WidgetState::flatten(&widget);
        assert!(state.nrql.is_null());
        assert!(state.notes.is_null());
    }
}
