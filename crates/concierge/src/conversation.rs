use crate::models::message::Message;
use crate::toolbox::ToolReport;

/// System preamble for every conversation. Kept short; the tool catalog does
/// the heavy lifting of telling the model what it can look up.
pub const SYSTEM_PROMPT: &str = "You are a friendly shop assistant. You can search the product \
catalog and look up weather, city populations and currency conversions when that helps answer \
the shopper. Prefer a tool when the question needs current data; otherwise answer directly. \
Keep answers short and concrete.";

/// Start a conversation for a single prompt. Together with `SYSTEM_PROMPT`
/// (prepended by the provider) this forms the seed context; the conversation
/// lives for one request and is discarded afterwards.
pub fn seed(prompt: &str) -> Vec<Message> {
    vec![Message::user().with_text(prompt)]
}

/// Fold a tool outcome back into the conversation: first the assistant reply
/// that requested the tool, then a tool-role message carrying the synthesized
/// summary tied to the request id.
pub fn append_tool_result(
    conversation: &mut Vec<Message>,
    reply: Message,
    id: &str,
    tool_name: &str,
    summary: String,
) {
    conversation.push(reply);
    conversation.push(Message::tool().with_tool_result(id, tool_name, summary));
}

/// Render a tool outcome as prose the model can work with, ending with a
/// steering instruction for the follow-up reply. Raw payloads are never
/// handed to the model untransformed.
pub fn summarize(report: &ToolReport) -> String {
    match report {
        ToolReport::Products(records) => {
            if records.is_empty() {
                return "No catalog items matched the shopper's query. Tell them nothing \
                        matched and invite them to rephrase."
                    .to_string();
            }
            let mut lines: Vec<String> = records
                .iter()
                .map(|record| {
                    format!(
                        "- {}: price {}, discount {}, {}",
                        record.title, record.price, record.discount, record.url
                    )
                })
                .collect();
            lines.push(
                "Recommend exactly one item from this list, mentioning its price and link."
                    .to_string(),
            );
            lines.join("\n")
        }
        ToolReport::Weather(weather) => format!(
            "Weather in {}: {}, temperature: {}°C, humidity: {}%, wind: {} m/s. \
             Answer the question using these figures.",
            weather.city,
            weather.description,
            weather.temperature_c,
            weather.humidity_pct,
            weather.wind_speed_ms
        ),
        ToolReport::Population(count) => format!(
            "{} has a population of {}. Use this figure in your answer.",
            count.city, count.population
        ),
        ToolReport::Currency(conversion) => format!(
            "{} {} is {} {} at an exchange rate of {}. State the converted amount in your answer.",
            conversion.value, conversion.base, conversion.converted, conversion.target,
            conversion.rate
        ),
        ToolReport::Failed { tool, reason } => format!(
            "The {} tool could not complete: {}. Apologize briefly and answer as well as you \
             can without it.",
            tool, reason
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::Role;
    use crate::sources::{PopulationCount, ProductRecord, WeatherReport};
    use crate::toolbox::Conversion;
    use chrono::TimeZone;

    fn record(title: &str, price: &str, secs: i64) -> ProductRecord {
        ProductRecord {
            title: title.to_string(),
            embedding_text: String::new(),
            url: format!("https://shop.example/{}", secs),
            image_url: String::new(),
            category: String::new(),
            discount: "10%".to_string(),
            price: price.to_string(),
            variants: Vec::new(),
            created_at: chrono::Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_seed_is_single_user_message() {
        let conversation = seed("hello");
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation[0].role, Role::User);
        assert_eq!(conversation[0].text(), "hello");
    }

    #[test]
    fn test_append_tool_result_keeps_order() {
        let mut conversation = seed("any shirts?");
        let reply = Message::assistant();
        append_tool_result(
            &mut conversation,
            reply,
            "call_1",
            "search_products",
            "summary".to_string(),
        );

        assert_eq!(conversation.len(), 3);
        assert_eq!(conversation[1].role, Role::Assistant);
        assert_eq!(conversation[2].role, Role::Tool);
        let result = conversation[2].content[0].as_tool_result().unwrap();
        assert_eq!(result.id, "call_1");
        assert_eq!(result.tool_name, "search_products");
    }

    #[test]
    fn test_summarize_products_lists_each_record_and_steers() {
        let report = ToolReport::Products(vec![
            record("Shirt Deluxe", "49.00", 300),
            record("Blue Shirt", "29.00", 100),
        ]);

        let summary = summarize(&report);
        assert!(summary.contains("Shirt Deluxe: price 49.00"));
        assert!(summary.contains("Blue Shirt: price 29.00"));
        assert!(summary.contains("Recommend exactly one item"));
    }

    #[test]
    fn test_summarize_empty_products() {
        let summary = summarize(&ToolReport::Products(vec![]));
        assert!(summary.contains("nothing"));
        assert!(summary.contains("rephrase"));
    }

    #[test]
    fn test_summarize_weather() {
        let summary = summarize(&ToolReport::Weather(WeatherReport {
            city: "Oslo".to_string(),
            description: "light rain".to_string(),
            temperature_c: 12.3,
            humidity_pct: 81,
            wind_speed_ms: 4.6,
        }));
        assert!(summary.contains("temperature: 12.3°C"));
        assert!(summary.contains("humidity: 81%"));
    }

    #[test]
    fn test_summarize_population() {
        let summary = summarize(&ToolReport::Population(PopulationCount {
            city: "Oslo".to_string(),
            population: 693_494,
        }));
        assert!(summary.contains("Oslo has a population of 693494"));
    }

    #[test]
    fn test_summarize_currency_is_unrounded() {
        let summary = summarize(&ToolReport::Currency(Conversion {
            value: 100.0,
            base: "USD".to_string(),
            target: "EUR".to_string(),
            rate: 0.9,
            converted: 90.0,
        }));
        assert!(summary.contains("100 USD is 90 EUR"));
    }

    #[test]
    fn test_summarize_failure_is_explanatory() {
        let summary = summarize(&ToolReport::Failed {
            tool: "get_weather".to_string(),
            reason: "upstream error: 503".to_string(),
        });
        assert!(summary.contains("get_weather"));
        assert!(summary.contains("Apologize"));
    }
}
