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

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as Json};
use tracing::{debug, info};

use crate::config::ClientConfig;

use super::nerdgraph::{self, GraphQlResponse};
use super::{
    AlertsPoliciesSearchResultSet, AlertsPolicy, AlertsPolicyInput, Api, ApiError, ApiResult,
    Dashboard, NrqlCondition, NrqlConditionInput, NrqlConditionType, SyntheticsMonitor,
    SyntheticsMonitorList,
};

#[derive(Debug, Serialize, Deserialize)]
struct DashboardEnvelope {
    dashboard: Dashboard,
}

#[derive(Debug, Clone)]
pub struct NewRelicClient {
    http: Client,
    api_key: String,
    account_id: Option<i64>,
    api_url: String,
    nerdgraph_api_url: String,
    synthetics_api_url: String,
}

impl NewRelicClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(60))
            .danger_accept_invalid_certs(config.insecure_skip_verify);

        if let Some(path) = &config.cacert_file {
            let pem = std::fs::read(path)
                .with_context(|| format!("could not read CA bundle `{path}`"))?;
            for cert in reqwest::Certificate::from_pem_bundle(&pem)
                .with_context(|| format!("could not parse CA bundle `{path}`"))?
            {
                builder = builder.add_root_certificate(cert);
            }
        }

        Ok(Self {
            http: builder.build().context("could not create HTTP client")?,
            api_key: config.api_key.clone(),
            account_id: config.account_id,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            nerdgraph_api_url: config.nerdgraph_api_url.clone(),
            synthetics_api_url: config.synthetics_api_url.trim_end_matches('/').to_string(),
        })
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn synthetics_url(&self, path: &str) -> String {
        format!("{}{}", self.synthetics_api_url, path)
    }

    /// REST call authenticated with `X-Api-Key`, returns the headers and body of
    /// a successful response
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Json>,
    ) -> ApiResult<(HeaderMap, String)> {
        debug!("{method} {url}");

        let mut request = self
            .http
            .request(method, url)
            .header("X-Api-Key", &self.api_key);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        let headers = response.headers().clone();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok((headers, text))
    }

    async fn rest<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<Json>,
    ) -> ApiResult<T> {
        let (_, text) = self.send(method, url, body).await?;
        // DELETE and PUT may answer with an empty body
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(text)?)
    }

    async fn dashboard_call(
        &self,
        method: Method,
        path: &str,
        body: Option<Json>,
    ) -> ApiResult<Dashboard> {
        let envelope: DashboardEnvelope = self.rest(method, &self.rest_url(path), body).await?;
        Ok(envelope.dashboard)
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Json,
        path: &[&str],
    ) -> ApiResult<T> {
        debug!("NerdGraph {}", path.last().copied().unwrap_or_default());

        let response = self
            .http
            .post(&self.nerdgraph_api_url)
            .header("Api-Key", &self.api_key)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let response: GraphQlResponse = serde_json::from_str(&text)?;
        nerdgraph::extract(response.into_data()?, path)
    }
}

#[async_trait]
impl Api for NewRelicClient {
    fn account_id(&self) -> Option<i64> {
        self.account_id
    }

    async fn create_dashboard(&self, dashboard: &Dashboard) -> ApiResult<Dashboard> {
        info!("Creating dashboard `{}`", dashboard.title);
        let body = serde_json::to_value(DashboardEnvelope {
            dashboard: dashboard.clone(),
        })?;
        self.dashboard_call(Method::POST, "/dashboards.json", Some(body))
            .await
    }

    async fn get_dashboard(&self, id: i64) -> ApiResult<Dashboard> {
        info!("Reading dashboard {id}");
        self.dashboard_call(Method::GET, &format!("/dashboards/{id}.json"), None)
            .await
    }

    async fn update_dashboard(&self, dashboard: &Dashboard) -> ApiResult<Dashboard> {
        info!("Updating dashboard {}", dashboard.id);
        let body = serde_json::to_value(DashboardEnvelope {
            dashboard: dashboard.clone(),
        })?;
        self.dashboard_call(
            Method::PUT,
            &format!("/dashboards/{}.json", dashboard.id),
            Some(body),
        )
        .await
    }

    async fn delete_dashboard(&self, id: i64) -> ApiResult<()> {
        info!("Deleting dashboard {id}");
        self.rest::<Json>(
            Method::DELETE,
            &self.rest_url(&format!("/dashboards/{id}.json")),
            None,
        )
        .await?;
        Ok(())
    }

    async fn create_policy(
        &self,
        account_id: i64,
        policy: &AlertsPolicyInput,
    ) -> ApiResult<AlertsPolicy> {
        info!("Creating alert policy `{}` in account {account_id}", policy.name);
        self.graphql(
            nerdgraph::POLICY_CREATE,
            json!({ "accountId": account_id, "policy": policy }),
            &["alertsPolicyCreate"],
        )
        .await
    }

    async fn get_policy(&self, account_id: i64, id: i64) -> ApiResult<AlertsPolicy> {
        info!("Reading alert policy {id} in account {account_id}");
        self.graphql(
            &nerdgraph::policy_get(),
            json!({ "accountId": account_id, "id": id.to_string() }),
            &["actor", "account", "alerts", "policy"],
        )
        .await
    }

    async fn update_policy(
        &self,
        account_id: i64,
        id: i64,
        policy: &AlertsPolicyInput,
    ) -> ApiResult<AlertsPolicy> {
        info!("Updating alert policy {id} in account {account_id}");
        self.graphql(
            nerdgraph::POLICY_UPDATE,
            json!({ "accountId": account_id, "id": id.to_string(), "policy": policy }),
            &["alertsPolicyUpdate"],
        )
        .await
    }

    async fn delete_policy(&self, account_id: i64, id: i64) -> ApiResult<()> {
        info!("Deleting alert policy {id} in account {account_id}");
        self.graphql::<Json>(
            nerdgraph::POLICY_DELETE,
            json!({ "accountId": account_id, "id": id.to_string() }),
            &["alertsPolicyDelete"],
        )
        .await?;
        Ok(())
    }

    async fn search_policies(
        &self,
        account_id: i64,
        cursor: Option<String>,
    ) -> ApiResult<AlertsPoliciesSearchResultSet> {
        debug!("Searching alert policies in account {account_id}");
        self.graphql(
            &nerdgraph::policies_search(),
            json!({ "accountId": account_id, "cursor": cursor }),
            &["actor", "account", "alerts", "policiesSearch"],
        )
        .await
    }

    async fn create_nrql_condition(
        &self,
        account_id: i64,
        policy_id: i64,
        condition_type: NrqlConditionType,
        condition: &NrqlConditionInput,
    ) -> ApiResult<NrqlCondition> {
        info!(
            "Creating {} NRQL condition `{}` in policy {policy_id}",
            condition_type.as_str(),
            condition.name
        );
        let (query, mutation) = nerdgraph::condition_create(condition_type);
        self.graphql(
            &query,
            json!({
                "accountId": account_id,
                "policyId": policy_id.to_string(),
                "condition": condition,
            }),
            &[mutation.as_str()],
        )
        .await
    }

    async fn get_nrql_condition(&self, account_id: i64, id: i64) -> ApiResult<NrqlCondition> {
        info!("Reading NRQL condition {id} in account {account_id}");
        self.graphql(
            &nerdgraph::condition_get(),
            json!({ "accountId": account_id, "id": id.to_string() }),
            &["actor", "account", "alerts", "nrqlCondition"],
        )
        .await
    }

    async fn update_nrql_condition(
        &self,
        account_id: i64,
        id: i64,
        condition_type: NrqlConditionType,
        condition: &NrqlConditionInput,
    ) -> ApiResult<NrqlCondition> {
        info!("Updating NRQL condition {id} in account {account_id}");
        let (query, mutation) = nerdgraph::condition_update(condition_type);
        self.graphql(
            &query,
            json!({
                "accountId": account_id,
                "id": id.to_string(),
                "condition": condition,
            }),
            &[mutation.as_str()],
        )
        .await
    }

    async fn delete_condition(&self, account_id: i64, id: i64) -> ApiResult<()> {
        info!("Deleting condition {id} in account {account_id}");
        self.graphql::<Json>(
            nerdgraph::CONDITION_DELETE,
            json!({ "accountId": account_id, "id": id.to_string() }),
            &["alertsConditionDelete"],
        )
        .await?;
        Ok(())
    }

    async fn create_monitor(&self, monitor: &SyntheticsMonitor) -> ApiResult<SyntheticsMonitor> {
        info!("Creating synthetics monitor `{}`", monitor.name);
        let body = serde_json::to_value(monitor)?;
        let (headers, _) = self
            .send(Method::POST, &self.synthetics_url("/monitors"), Some(body))
            .await?;

        // The new monitor is only known by the URL in `Location`
        let location = headers
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let id = location
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        if id.is_empty() {
            return Err(ApiError::MissingLocation);
        }
        self.get_monitor(id).await
    }

    async fn get_monitor(&self, id: &str) -> ApiResult<SyntheticsMonitor> {
        info!("Reading synthetics monitor {id}");
        self.rest(Method::GET, &self.synthetics_url(&format!("/monitors/{id}")), None)
            .await
    }

    async fn update_monitor(&self, monitor: &SyntheticsMonitor) -> ApiResult<SyntheticsMonitor> {
        info!("Updating synthetics monitor {}", monitor.id);
        let body = serde_json::to_value(monitor)?;
        self.send(
            Method::PUT,
            &self.synthetics_url(&format!("/monitors/{}", monitor.id)),
            Some(body),
        )
        .await?;
        self.get_monitor(&monitor.id).await
    }

    async fn delete_monitor(&self, id: &str) -> ApiResult<()> {
        info!("Deleting synthetics monitor {id}");
        self.rest::<Json>(
            Method::DELETE,
            &self.synthetics_url(&format!("/monitors/{id}")),
            None,
        )
        .await?;
        Ok(())
    }

    async fn list_monitors(&self, offset: i64, limit: i64) -> ApiResult<SyntheticsMonitorList> {
        debug!("Listing synthetics monitors from {offset}");
        self.rest(
            Method::GET,
            &self.synthetics_url(&format!("/monitors?offset={offset}&limit={limit}")),
            None,
        )
        .await
    }
}
