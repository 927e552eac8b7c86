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

use async_trait::async_trait;
use tracing::info;

use tf_provider::schema::Schema;
use tf_provider::value::ValueEmpty;
use tf_provider::{map, Diagnostics, DynamicDataSource, DynamicResource, Provider};

use crate::alert_policy::{AlertPolicyDataSource, AlertPolicyResource};
use crate::client::{ClientSlot, NewRelicClient};
use crate::config::{ClientConfig, ProviderConfig};
use crate::dashboard::DashboardResource;
use crate::nrql_condition::NrqlConditionResource;
use crate::synthetics_monitor::{SyntheticsMonitorDataSource, SyntheticsMonitorResource};
use crate::utils::{ReportDiagnostics, WithSchema};

#[derive(Debug, Default, Clone)]
pub struct NewRelicProvider {
    client: ClientSlot<NewRelicClient>,
}

#[async_trait]
impl Provider for NewRelicProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ProviderConfig::schema())
    }

    async fn validate<'a>(&self, _diags: &mut Diagnostics, _config: Self::Config<'a>) -> Option<()> {
        Some(())
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        let config = ClientConfig::resolve(diags, &config, &terraform_version, |name| {
            std::env::var(name).ok()
        })?;
        let client = NewRelicClient::new(&config).report(diags, "Failed to create New Relic client")?;

        info!(
            api_url = %config.api_url,
            nerdgraph_api_url = %config.nerdgraph_api_url,
            synthetics_api_url = %config.synthetics_api_url,
            "New Relic provider configured"
        );
        self.client.set(diags, client)
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicResource>>> {
        Some(map! {
            "dashboard"            => DashboardResource::new(self.client.clone()),
            "alert_policy"         => AlertPolicyResource::new(self.client.clone()),
            "nrql_alert_condition" => NrqlConditionResource::new(self.client.clone()),
            "synthetics_monitor"   => SyntheticsMonitorResource::new(self.client.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicDataSource>>> {
        Some(map! {
            "alert_policy"       => AlertPolicyDataSource::new(self.client.clone()),
            "synthetics_monitor" => SyntheticsMonitorDataSource::new(self.client.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_types() {
        let provider = NewRelicProvider::default();
        let mut diags = Diagnostics::default();

        let mut resources: Vec<_> = provider
            .get_resources(&mut diags)
            .unwrap()
            .into_keys()
            .collect();
        resources.sort();
        assert_eq!(
            resources,
            ["alert_policy", "dashboard", "nrql_alert_condition", "synthetics_monitor"]
        );

        let mut data_sources: Vec<_> = provider
            .get_data_sources(&mut diags)
            .unwrap()
            .into_keys()
            .collect();
        data_sources.sort();
        assert_eq!(data_sources, ["alert_policy", "synthetics_monitor"]);
        assert!(diags.errors.is_empty());
    }
}
