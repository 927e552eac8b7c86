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

use tf_provider::{value::Value, Diagnostics};

use crate::utils::{default_if_null, WithNormalize};

use super::state::{DashboardState, DEFAULT_EDITABLE, DEFAULT_ICON, DEFAULT_VISIBILITY};

impl<'a> WithNormalize for DashboardState<'a> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        default_if_null(&mut self.icon, Cow::Borrowed(DEFAULT_ICON));
        default_if_null(&mut self.visibility, Cow::Borrowed(DEFAULT_VISIBILITY));
        default_if_null(&mut self.editable, Cow::Borrowed(DEFAULT_EDITABLE));

        self.widget = match self.widget.take() {
            Value::Value(widgets) => Value::Value(
                widgets
                    .into_iter()
                    .map(|widget| {
                        widget.map(|mut widget| {
                            default_if_null(&mut widget.width, 1);
                            default_if_null(&mut widget.height, 1);
                            widget
                        })
                    })
                    .collect(),
            ),
            Value::Null => Value::Value(Default::default()),
            Value::Unknown => Value::Unknown,
        };
    }
}
