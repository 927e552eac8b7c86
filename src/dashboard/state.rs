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

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tf_provider::schema::{
    AttributeConstraint, AttributeType, Block, Description, NestedBlock, Schema,
};
use tf_provider::value::{Value, ValueNumber, ValueSet, ValueString};

use crate::utils::{attribute, WithSchema};

pub(super) const MAX_WIDGETS: usize = 60;
pub(super) const DEFAULT_ICON: &str = "bar-chart";
pub(super) const DEFAULT_VISIBILITY: &str = "all";
pub(super) const DEFAULT_EDITABLE: &str = "editable_by_all";
pub(super) const VISIBILITIES: [&str; 2] = ["owner", "all"];
pub(super) const EDITABLES: [&str; 4] = ["read_only", "editable_by_owner", "editable_by_all", "all"];

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState<'a> {
    pub id: ValueString<'a>,
    pub title: ValueString<'a>,
    pub icon: ValueString<'a>,
    pub visibility: ValueString<'a>,
    pub editable: ValueString<'a>,
    pub dashboard_url: ValueString<'a>,
    pub widget: ValueSet<Value<WidgetState<'a>>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WidgetState<'a> {
    pub title: ValueString<'a>,
    pub visualization: ValueString<'a>,
    pub width: ValueNumber,
    pub height: ValueNumber,
    pub row: ValueNumber,
    pub column: ValueNumber,
    pub notes: ValueString<'a>,
    pub nrql: ValueString<'a>,
}

impl WithSchema for DashboardState<'_> {
    fn schema() -> Schema {
        use AttributeConstraint::*;
        use AttributeType::*;

        let widget = Block {
            description: Description::plain("NRQL widget displayed on the dashboard"),
            attributes: HashMap::from([
                ("title".into(), attribute(String, Required, "Widget title")),
                (
                    "visualization".into(),
                    attribute(String, Required, "How the data is drawn (billboard, line_chart...)"),
                ),
                (
                    "width".into(),
                    attribute(Number, OptionalComputed, "Width in grid columns (default 1)"),
                ),
                (
                    "height".into(),
                    attribute(Number, OptionalComputed, "Height in grid rows (default 1)"),
                ),
                ("row".into(), attribute(Number, Required, "Grid row, starting at 1")),
                ("column".into(), attribute(Number, Required, "Grid column, starting at 1")),
                ("notes".into(), attribute(String, Optional, "Free text shown under the widget")),
                ("nrql".into(), attribute(String, Optional, "NRQL query of the widget")),
            ]),
            ..Default::default()
        };

        Schema {
            version: 1,
            block: Block {
                description: Description::plain("New Relic Insights dashboard"),
                attributes: HashMap::from([
                    ("id".into(), attribute(String, Computed, "Numeric ID of the dashboard")),
                    ("title".into(), attribute(String, Required, "Title of the dashboard")),
                    (
                        "icon".into(),
                        attribute(String, OptionalComputed, "Icon of the dashboard (default bar-chart)"),
                    ),
                    (
                        "visibility".into(),
                        attribute(String, OptionalComputed, "Who can see the dashboard: owner or all"),
                    ),
                    (
                        "editable".into(),
                        attribute(
                            String,
                            OptionalComputed,
                            "Who can edit the dashboard: read_only, editable_by_owner, editable_by_all or all",
                        ),
                    ),
                    (
                        "dashboard_url".into(),
                        attribute(String, Computed, "URL of the dashboard in the New Relic UI"),
                    ),
                ]),
                blocks: HashMap::from([("widget".into(), NestedBlock::Set(widget))]),
                ..Default::default()
            },
        }
    }
}
