//! Buyer Educator
//!
//! Explains what to look for in a product category. Pure generation, no web
//! access.

use tracing::info;

use crate::generation::{GenerationRequest, Generator};
use crate::types::AppResult;

pub const AGENT_NAME: &str = "Buyer Educator";

pub struct BuyingGuideAgent;

impl BuyingGuideAgent {
    pub async fn run(generator: &dyn Generator, product_type: &str) -> AppResult<String> {
        info!(product_type = %product_type, "Writing buying guide");
        let generation = generator.generate(&Self::build_request(product_type)).await?;
        Ok(generation.content)
    }

    pub fn build_request(product_type: &str) -> GenerationRequest {
        GenerationRequest::new(
            AGENT_NAME,
            vec![
                "Explain what to look for in the product type.".to_string(),
                "Use short sections: Key Specs, Nice-to-Haves, Budget Tiers, Mistakes to Avoid, Quick Checklist."
                    .to_string(),
                "Keep it concise and practical. No fluff.".to_string(),
            ],
            format!(
                "Buying a {}: provide the sections requested, keep bullets short.",
                product_type.trim()
            ),
        )
    }
}
