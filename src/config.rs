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
    Attribute, AttributeConstraint, AttributeType, Block, Description, Schema,
};
use tf_provider::value::{Value, ValueBool, ValueNumber, ValueString};
use tf_provider::{AttributePath, Diagnostics};

use crate::utils::WithSchema;

pub const DEFAULT_API_URL: &str = "https://api.newrelic.com/v2";
pub const DEFAULT_NERDGRAPH_API_URL: &str = "https://api.newrelic.com/graphql";
pub const DEFAULT_SYNTHETICS_API_URL: &str = "https://synthetics.newrelic.com/synthetics/api/v3";

/// Content of the `provider "newrelic"` block
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig<'a> {
    pub api_key: ValueString<'a>,
    pub account_id: ValueNumber,
    pub api_url: ValueString<'a>,
    pub nerdgraph_api_url: ValueString<'a>,
    pub synthetics_api_url: ValueString<'a>,
    pub insecure_skip_verify: ValueBool,
    pub cacert_file: ValueString<'a>,
}

impl WithSchema for ProviderConfig<'_> {
    fn schema() -> Schema {
        let optional = |attr_type, description: &str, sensitive| Attribute {
            attr_type,
            description: Description::plain(description),
            constraint: AttributeConstraint::Optional,
            sensitive,
            ..Default::default()
        };
        Schema {
            version: 1,
            block: Block {
                description: Description::plain("newrelic"),
                attributes: HashMap::from([
                    (
                        "api_key".into(),
                        optional(
                            AttributeType::String,
                            "New Relic user API key (env NEWRELIC_API_KEY)",
                            true,
                        ),
                    ),
                    (
                        "account_id".into(),
                        optional(
                            AttributeType::Number,
                            "Default account for NerdGraph resources (env NEWRELIC_ACCOUNT_ID)",
                            true,
                        ),
                    ),
                    (
                        "api_url".into(),
                        optional(
                            AttributeType::String,
                            "Base URL of the REST v2 API (env NEWRELIC_API_URL)",
                            false,
                        ),
                    ),
                    (
                        "nerdgraph_api_url".into(),
                        optional(
                            AttributeType::String,
                            "URL of the NerdGraph endpoint (env NEWRELIC_NERDGRAPH_API_URL)",
                            false,
                        ),
                    ),
                    (
                        "synthetics_api_url".into(),
                        optional(
                            AttributeType::String,
                            "Base URL of the Synthetics v3 API (env NEWRELIC_SYNTHETICS_API_URL)",
                            false,
                        ),
                    ),
                    (
                        "insecure_skip_verify".into(),
                        optional(
                            AttributeType::Bool,
                            "Skip TLS certificate verification (env NEWRELIC_API_SKIP_VERIFY)",
                            false,
                        ),
                    ),
                    (
                        "cacert_file".into(),
                        optional(
                            AttributeType::String,
                            "PEM bundle of extra trusted CAs (env NEWRELIC_API_CACERT)",
                            false,
                        ),
                    ),
                ]),
                ..Default::default()
            },
        }
    }
}

/// Settings used to build the API client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub account_id: Option<i64>,
    pub api_url: String,
    pub nerdgraph_api_url: String,
    pub synthetics_api_url: String,
    pub insecure_skip_verify: bool,
    pub cacert_file: Option<String>,
    pub user_agent: String,
}

fn lookup<'a>(
    config: &ValueString<'a>,
    env: &impl Fn(&str) -> Option<String>,
    var: &str,
) -> Option<String> {
    match config {
        Value::Value(value) => Some(value.to_string()),
        _ => env(var).filter(|value| !value.is_empty()),
    }
}

impl ClientConfig {
    /// Resolve every setting from the provider block first, then from the
    /// environment, then from the built-in default.
    pub fn resolve(
        diags: &mut Diagnostics,
        config: &ProviderConfig,
        terraform_version: &str,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<Self> {
        let api_key = lookup(&config.api_key, &env, "NEWRELIC_API_KEY");
        if api_key.is_none() {
            diags.error(
                "Missing New Relic API key",
                "Set `api_key` in the provider block or the NEWRELIC_API_KEY environment variable.",
                AttributePath::new("api_key"),
            );
        }

        let account_id = match config.account_id {
            Value::Value(id) => Some(id),
            _ => match env("NEWRELIC_ACCOUNT_ID").filter(|value| !value.is_empty()) {
                Some(raw) => match raw.trim().parse::<i64>() {
                    Ok(id) => Some(id),
                    Err(err) => {
                        diags.error(
                            "Invalid New Relic account ID",
                            format!("NEWRELIC_ACCOUNT_ID `{raw}` is not an integer: {err}"),
                            AttributePath::new("account_id"),
                        );
                        None
                    }
                },
                None => None,
            },
        };

        let insecure_skip_verify = match config.insecure_skip_verify {
            Value::Value(skip) => skip,
            _ => match env("NEWRELIC_API_SKIP_VERIFY") {
                Some(raw) => matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true"),
                None => false,
            },
        };

        if !diags.errors.is_empty() {
            return None;
        }

        Some(Self {
            api_key: api_key.unwrap_or_default(),
            account_id,
            api_url: lookup(&config.api_url, &env, "NEWRELIC_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            nerdgraph_api_url: lookup(
                &config.nerdgraph_api_url,
                &env,
                "NEWRELIC_NERDGRAPH_API_URL",
            )
            .unwrap_or_else(|| DEFAULT_NERDGRAPH_API_URL.to_string()),
            synthetics_api_url: lookup(
                &config.synthetics_api_url,
                &env,
                "NEWRELIC_SYNTHETICS_API_URL",
            )
            .unwrap_or_else(|| DEFAULT_SYNTHETICS_API_URL.to_string()),
            insecure_skip_verify,
            cacert_file: lookup(&config.cacert_file, &env, "NEWRELIC_API_CACERT"),
            user_agent: format!(
                "Terraform/{terraform_version} terraform-provider-newrelic/{}",
                env!("CARGO_PKG_VERSION")
            ),
        })
    }
}
