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

use async_trait::async_trait;
use tracing::debug;

use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{schema::Schema, AttributePath, DataSource, Diagnostics};

use crate::client::{Api, ClientSlot};
use crate::utils::{ReportDiagnostics, WithSchema};

use super::state::SyntheticsMonitorLookup;

const PAGE_SIZE: i64 = 100;

#[derive(Debug)]
pub struct SyntheticsMonitorDataSource<T: Api> {
    pub(super) client: ClientSlot<T>,
}

impl<T: Api> SyntheticsMonitorDataSource<T> {
    pub fn new(client: ClientSlot<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: Api> DataSource for SyntheticsMonitorDataSource<T> {
    type State<'a> = SyntheticsMonitorLookup<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(SyntheticsMonitorLookup::schema())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let client = self.client.get(diags)?;
        let name = config.name.as_str();

        let mut offset = 0;
        loop {
            let page = client
                .list_monitors(offset, PAGE_SIZE)
                .await
                .report(diags, "Failed to list synthetics monitors")?;
            debug!(
                "Searching monitor `{name}` among {} of {} monitors",
                page.monitors.len(),
                page.count
            );

            if let Some(monitor) = page.monitors.iter().find(|monitor| monitor.name == name) {
                let id = Value::Value(Cow::Owned(monitor.id.clone()));
                return Some(SyntheticsMonitorLookup {
                    id: id.clone(),
                    name: Value::Value(Cow::Owned(monitor.name.clone())),
                    monitor_id: id,
                });
            }

            offset += page.monitors.len() as i64;
            if page.monitors.is_empty() || offset >= page.count {
                break;
            }
        }

        diags.error(
            "Synthetics monitor not found",
            format!("the name '{name}' does not match any monitor"),
            AttributePath::new("name"),
        );
        None
    }
}
