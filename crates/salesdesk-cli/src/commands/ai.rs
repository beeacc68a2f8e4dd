//! Completion backend command implementations

use anyhow::Result;
use salesdesk_core::{decode_descriptor, AIBackend, Assistant};

use super::truncate;

const SAMPLE_QUESTION: &str = "Show last 7 days sales for Mumbai store";

/// Check the backend and run one intent extraction
pub async fn cmd_ai_test(assistant: &Assistant, question: Option<&str>) -> Result<()> {
    let client = assistant.ai();
    let info = client.info();

    println!("🔍 Testing AI backend...\n");
    println!("  Backend: {}", info.backend);
    println!("  Host:    {}", info.host);
    println!("  Model:   {}\n", info.model);

    print!("Checking availability... ");
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach the completion service at {}", info.host);
        println!("\nCheck that:");
        println!("  1. OPENAI_API_KEY holds a valid key");
        println!("  2. OPENAI_BASE_URL points at an OpenAI-compatible server");
        println!("  3. OPENAI_MODEL names a model the server offers");
        return Ok(());
    }

    let question = question.unwrap_or(SAMPLE_QUESTION);
    println!("\n📋 Extracting intent for \"{}\"...\n", question);

    match assistant.extract_intent(question).await {
        Ok(raw) => {
            println!("  Raw:     {}", truncate(raw.trim(), 200));
            match decode_descriptor(&raw) {
                Ok(descriptor) => {
                    println!("  Intent:  {}", descriptor.intent);
                    println!(
                        "  Store:   {}",
                        descriptor.store.map(|s| s.as_str()).unwrap_or("(all)")
                    );
                    println!(
                        "  Category: {}",
                        descriptor.category.map(|c| c.as_str()).unwrap_or("(all)")
                    );
                    println!("  Days:    {}", descriptor.date_range_days);
                }
                Err(e) => println!("  ❌ Could not decode: {}", e),
            }
        }
        Err(e) => println!("  ❌ Error: {}", e),
    }

    Ok(())
}
