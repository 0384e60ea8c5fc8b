//! JSON shape of `LanguageServerService/GetUserStatus` (Connect protocol).
//!
//! proto3 JSON omits zero values and may encode 64-bit integers as strings,
//! so every field is optional and integers accept both forms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::types::{CreditBalance, StatusRecord, SubQuota};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserStatusResponse {
    #[serde(default)]
    user_status: Option<UserStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserStatus {
    #[serde(default)]
    cascade_model_config_data: Option<CascadeModelConfigData>,
    #[serde(default)]
    plan_status: Option<PlanStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CascadeModelConfigData {
    #[serde(default)]
    client_model_configs: Vec<ClientModelConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientModelConfig {
    #[serde(default)]
    label: String,
    #[serde(default)]
    quota_info: Option<QuotaInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuotaInfo {
    #[serde(default)]
    remaining_fraction: Option<f64>,
    #[serde(default)]
    reset_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanStatus {
    #[serde(default)]
    plan_info: Option<PlanInfo>,
    #[serde(default, deserialize_with = "lenient_i64")]
    available_prompt_credits: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanInfo {
    #[serde(default, deserialize_with = "lenient_i64")]
    monthly_prompt_credits: i64,
}

/// Accept `42`, `"42"` and `null`
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        Float(f64),
        String(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(0),
        Some(NumberOrString::Number(n)) => Ok(n),
        Some(NumberOrString::Float(f)) => Ok(f as i64),
        Some(NumberOrString::String(s)) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn parse_reset_time(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            debug!("Ignoring unparseable reset time {:?}: {}", raw, e);
            None
        }
    }
}

impl From<UserStatusResponse> for StatusRecord {
    fn from(response: UserStatusResponse) -> Self {
        let status = response.user_status.unwrap_or_default();

        let credits = status.plan_status.map(|plan| CreditBalance {
            available: plan.available_prompt_credits,
            total: plan.plan_info.map(|i| i.monthly_prompt_credits).unwrap_or(0),
        });

        // Entries without quota info are not rate limited; skip them
        let quotas = status
            .cascade_model_config_data
            .map(|d| d.client_model_configs)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|config| {
                let info = config.quota_info?;
                let fraction = info.remaining_fraction.unwrap_or(0.0);
                Some(SubQuota {
                    label: config.label,
                    remaining_fraction: if fraction.is_finite() {
                        fraction.clamp(0.0, 1.0)
                    } else {
                        0.0
                    },
                    reset_time: info.reset_time.as_deref().and_then(parse_reset_time),
                })
            })
            .collect();

        StatusRecord { credits, quotas }
    }
}

impl StatusRecord {
    /// Interpret a decoded JSON body
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value::<UserStatusResponse>(value).map(StatusRecord::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_plan_status_only() {
        let record = StatusRecord::from_json(json!({
            "userStatus": {
                "planStatus": {
                    "availablePromptCredits": 80,
                    "planInfo": { "monthlyPromptCredits": 100 }
                }
            }
        }))
        .unwrap();

        assert_eq!(
            record.credits,
            Some(CreditBalance {
                available: 80,
                total: 100
            })
        );
        assert!(record.quotas.is_empty());
    }

    #[test]
    fn test_model_quotas() {
        let record = StatusRecord::from_json(json!({
            "userStatus": {
                "cascadeModelConfigData": {
                    "clientModelConfigs": [
                        {
                            "label": "Gemini 3 Pro (High)",
                            "quotaInfo": { "remainingFraction": 0.75, "resetTime": "2026-10-18T12:00:00Z" }
                        },
                        { "label": "Unlimited Model" },
                        { "label": "Exhausted", "quotaInfo": { "resetTime": "not a date" } },
                        { "label": "Weird", "quotaInfo": { "remainingFraction": 1.7 } }
                    ]
                }
            }
        }))
        .unwrap();

        assert!(record.credits.is_none());
        assert_eq!(record.quotas.len(), 3);
        assert_eq!(record.quotas[0].label, "Gemini 3 Pro (High)");
        assert_eq!(record.quotas[0].remaining_fraction, 0.75);
        assert_eq!(
            record.quotas[0].reset_time,
            Some(Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap())
        );
        // Omitted fraction means fully consumed
        assert_eq!(record.quotas[1].remaining_fraction, 0.0);
        assert!(record.quotas[1].reset_time.is_none());
        assert_eq!(record.quotas[2].remaining_fraction, 1.0);
    }

    #[test]
    fn test_string_encoded_credits() {
        let record = StatusRecord::from_json(json!({
            "userStatus": {
                "planStatus": {
                    "availablePromptCredits": "12500",
                    "planInfo": { "monthlyPromptCredits": "50000" }
                }
            }
        }))
        .unwrap();
        assert_eq!(
            record.credits,
            Some(CreditBalance {
                available: 12500,
                total: 50000
            })
        );
    }

    #[test]
    fn test_missing_plan_info_means_zero_total() {
        let record = StatusRecord::from_json(json!({
            "userStatus": { "planStatus": { "availablePromptCredits": 10 } }
        }))
        .unwrap();
        let credits = record.credits.unwrap();
        assert_eq!(credits.total, 0);
        assert_eq!(credits.percent(), 0.0);
    }

    #[test]
    fn test_empty_object() {
        let record = StatusRecord::from_json(json!({})).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_wrong_shape_is_error() {
        assert!(StatusRecord::from_json(json!({ "userStatus": "nope" })).is_err());
    }
}
