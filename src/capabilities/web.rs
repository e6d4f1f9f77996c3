use super::paths::{optional_str, require_str};
use super::SessionContext;
use serde_json::Value;

/// Query-string encoding for the search-URL builders; spaces render as `+`.
pub fn encode_query(input: &str) -> String {
    urlencoding::encode(input).replace("%20", "+")
}

pub fn handle_web_search(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let query = require_str(args, "query")?;
    let engine = optional_str(args, "search_engine").unwrap_or("google");

    let template = match engine {
        "google" => "https://www.google.com/search?q={}",
        "bing" => "https://www.bing.com/search?q={}",
        "baidu" => "https://www.baidu.com/s?wd={}",
        "duckduckgo" => "https://duckduckgo.com/?q={}",
        other => {
            return Err(format!(
                "unsupported search engine '{}', available: google, bing, baidu, duckduckgo",
                other
            ))
        }
    };

    let url = template.replace("{}", &encode_query(query));
    Ok(format!("Search URL for '{}' ({}): {}", query, engine, url))
}

pub fn handle_open_url(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let raw = require_str(args, "url")?;
    let url = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };
    Ok(format!("URL to open: {}", url))
}

pub fn handle_get_weather(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let url = match optional_str(args, "city") {
        Some(city) if !city.is_empty() => format!(
            "https://www.google.com/search?q=weather+{}",
            encode_query(city)
        ),
        _ => "https://www.google.com/search?q=weather".to_string(),
    };
    Ok(format!("Weather lookup URL: {}", url))
}

pub fn handle_translate_text(args: &Value, _ctx: &SessionContext) -> Result<String, String> {
    let text = require_str(args, "text")?;
    let target_lang = optional_str(args, "target_lang").unwrap_or("en");
    let url = format!(
        "https://translate.google.com/?sl=auto&tl={}&text={}",
        target_lang,
        encode_query(text)
    );
    Ok(format!("Translation URL ({} -> {}): {}", text, target_lang, url))
}
