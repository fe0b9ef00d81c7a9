use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::agents::{Priority, RecommendationInput, ShoppingAssistant};
use crate::config::{Config, DisplayConfig};
use crate::types::{AppError, AppResult};
use crate::utils::{clamp, text::exceeds};

pub const MIN_BUDGET: u32 = 500;
pub const MAX_BUDGET: u32 = 500_000;
pub const DEFAULT_BUDGET: u32 = 15_000;

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<ShoppingAssistant>,
    pub config: Config,
}

/// Currency and region chosen in the sidebar. Echoed back, never sent to an agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayPrefs {
    pub currency: Option<String>,
    pub region: Option<String>,
}

impl DisplayPrefs {
    fn resolve(&self, defaults: &DisplayConfig) -> (String, String) {
        let pick = |value: &Option<String>, default: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        (
            pick(&self.currency, &defaults.currency),
            pick(&self.region, &defaults.region),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub shopping_list: String,
    #[serde(default = "default_budget")]
    pub budget: i64,
    /// Priority label, parsed in [`RecommendationRequest::validate`]
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(flatten)]
    pub display: DisplayPrefs,
}

fn default_budget() -> i64 {
    DEFAULT_BUDGET as i64
}

impl RecommendationRequest {
    pub fn validate(&self) -> AppResult<RecommendationInput> {
        let shopping_list = required(&self.shopping_list, "Please enter your shopping list")?;
        let budget = u32::try_from(self.budget)
            .ok()
            .filter(|b| (MIN_BUDGET..=MAX_BUDGET).contains(b))
            .ok_or_else(|| {
                AppError::InvalidRequest(format!(
                    "Please enter a budget between ₹{} and ₹{}",
                    MIN_BUDGET, MAX_BUDGET
                ))
            })?;
        let priority = match self.priority.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(label) => label.parse::<Priority>()?,
            None => Priority::default(),
        };
        Ok(RecommendationInput {
            shopping_list,
            budget,
            priority,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewsRequest {
    #[serde(default)]
    pub product_url: String,
    #[serde(flatten)]
    pub display: DisplayPrefs,
}

impl ReviewsRequest {
    pub fn validate(&self) -> AppResult<String> {
        required(&self.product_url, "Please enter a valid product URL")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyingGuideRequest {
    #[serde(default)]
    pub product_type: String,
    #[serde(flatten)]
    pub display: DisplayPrefs,
}

impl BuyingGuideRequest {
    pub fn validate(&self) -> AppResult<String> {
        required(&self.product_type, "Please enter a product type")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub product_name: String,
    #[serde(flatten)]
    pub display: DisplayPrefs,
}

impl CompareRequest {
    pub fn validate(&self) -> AppResult<String> {
        required(&self.product_name, "Please enter a product name")
    }
}

fn required(value: &str, message: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(AppError::InvalidRequest(message.to_string()))
    } else {
        Ok(value.to_string())
    }
}

/// One rendered action result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub title: String,
    pub content: String,
    pub truncated: bool,
    pub currency: String,
    pub region: String,
}

impl ActionResponse {
    /// Clamp `content` to the display bound and attach the display preferences
    pub fn render(title: impl Into<String>, content: &str, prefs: &DisplayPrefs, display: &DisplayConfig) -> Self {
        let (currency, region) = prefs.resolve(display);
        Self {
            title: title.into(),
            content: clamp(Some(content), display.max_chars),
            truncated: exceeds(content, display.max_chars),
            currency,
            region,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub provider: String,
    pub model: String,
}
