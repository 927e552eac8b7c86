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

use async_trait::async_trait;
use tracing::debug;

use tf_provider::value::ValueEmpty;
use tf_provider::{schema::Schema, AttributePath, DataSource, Diagnostics};

use crate::client::{resolve_account_id, Api, ClientSlot};
use crate::utils::ReportDiagnostics;

use super::state::AlertPolicyState;

#[derive(Debug)]
pub struct AlertPolicyDataSource<T: Api> {
    pub(super) client: ClientSlot<T>,
}

impl<T: Api> AlertPolicyDataSource<T> {
    pub fn new(client: ClientSlot<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: Api> DataSource for AlertPolicyDataSource<T> {
    type State<'a> = AlertPolicyState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(AlertPolicyState::data_source_schema())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let client = self.client.get(diags)?;
        let account_id = resolve_account_id(diags, client.as_ref(), &config.account_id)?;
        let name = config.name.as_str();

        let mut cursor = None;
        loop {
            let page = client
                .search_policies(account_id, cursor)
                .await
                .report(diags, "Failed to search alert policies")?;
            debug!(
                "Searching policy `{name}` among {} policies",
                page.policies.len()
            );

            if let Some(policy) = page.policies.iter().find(|policy| policy.name == name) {
                return Some(AlertPolicyState::flatten(policy));
            }

            match page.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        diags.error(
            "Alert policy not found",
            format!("the name '{name}' does not match any New Relic alert policy"),
            AttributePath::new("name"),
        );
        None
    }
}
