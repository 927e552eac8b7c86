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

use tf_provider::{AttributePath, Diagnostics};

use crate::utils::WithValidate;
use crate::validate::string_in_slice;

use super::state::{DashboardState, EDITABLES, MAX_WIDGETS, VISIBILITIES};

impl<'a> WithValidate for DashboardState<'a> {
    fn validate(&self, diags: &mut Diagnostics) {
        string_in_slice(
            diags,
            &self.visibility,
            &VISIBILITIES,
            false,
            AttributePath::new("visibility"),
        );
        string_in_slice(
            diags,
            &self.editable,
            &EDITABLES,
            false,
            AttributePath::new("editable"),
        );

        if let Some(widgets) = self.widget.as_ref_option() {
            if widgets.len() > MAX_WIDGETS {
                diags.error(
                    "Too many widgets",
                    format!(
                        "a dashboard holds at most {MAX_WIDGETS} widgets, {} are declared",
                        widgets.len()
                    ),
                    AttributePath::new("widget"),
                );
            }
        }
    }
}
