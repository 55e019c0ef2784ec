//! web_search tool - web search via SearxNG or Tavily

use async_trait::async_trait;
use serde_json::Value;

use crate::config::SearchConfig;
use crate::tools::{Tool, ToolContext, ToolResult};

/// Search the web for information
pub struct WebSearchTool;

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &'static str {
        "web_search"
    }

    fn description(&self) -> &'static str {
        "Search the web for information"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum results to return"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let query = match input["query"].as_str() {
            Some(q) => q,
            None => return ToolResult::error("query is required"),
        };

        let max_results = input["max_results"]
            .as_u64()
            .map(|n| n as usize)
            .unwrap_or(ctx.search.max_results);

        match ctx.search.provider.as_str() {
            "searxng" => search_searxng(query, max_results, &ctx.search).await,
            "tavily" => search_tavily(query, max_results, &ctx.search).await,
            other => ToolResult::error(format!("Unknown search provider: {}", other)),
        }
    }
}

/// Search using a SearxNG instance's JSON API
async fn search_searxng(query: &str, max_results: usize, config: &SearchConfig) -> ToolResult {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .unwrap_or_default();

    let url = format!("{}/search", config.searxng_url.trim_end_matches('/'));
    let response = match client
        .get(&url)
        .query(&[("q", query), ("format", "json")])
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => return ToolResult::error(format!("Search request failed: {}", e)),
    };

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return ToolResult::error(format!("SearxNG error {}: {}", status, error_text));
    }

    let result: Value = match response.json().await {
        Ok(r) => r,
        Err(e) => return ToolResult::error(format!("Failed to parse response: {}", e)),
    };

    let results = result["results"].as_array();
    if results.is_none() || results.unwrap().is_empty() {
        return ToolResult::success("No results found");
    }

    let output: Vec<String> = results
        .unwrap()
        .iter()
        .take(max_results)
        .enumerate()
        .map(|(i, r)| {
            let title = r["title"].as_str().unwrap_or("(no title)");
            let url = r["url"].as_str().unwrap_or("");
            let content = r["content"].as_str().unwrap_or("");
            format!("{}. {}\n   {}\n   {}\n", i + 1, title, url, truncate(content, 200))
        })
        .collect();

    ToolResult::success(output.join("\n"))
}

/// Search using the Tavily API
async fn search_tavily(query: &str, max_results: usize, config: &SearchConfig) -> ToolResult {
    let api_key = match std::env::var(&config.api_key_env) {
        Ok(k) => k,
        Err(_) => {
            return ToolResult::error(format!(
                "No search API key configured. Set the {} environment variable.",
                config.api_key_env
            ));
        }
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .unwrap_or_default();

    let body = serde_json::json!({
        "api_key": api_key,
        "query": query,
        "max_results": max_results,
        "search_depth": "basic"
    });

    let response = match client.post("https://api.tavily.com/search").json(&body).send().await {
        Ok(r) => r,
        Err(e) => return ToolResult::error(format!("Search request failed: {}", e)),
    };

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return ToolResult::error(format!("Tavily API error {}: {}", status, error_text));
    }

    let result: Value = match response.json().await {
        Ok(r) => r,
        Err(e) => return ToolResult::error(format!("Failed to parse response: {}", e)),
    };

    let results = result["results"].as_array();
    if results.is_none() || results.unwrap().is_empty() {
        return ToolResult::success("No results found");
    }

    let output: Vec<String> = results
        .unwrap()
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let title = r["title"].as_str().unwrap_or("(no title)");
            let url = r["url"].as_str().unwrap_or("");
            let content = r["content"].as_str().unwrap_or("");
            format!("{}. {}\n   {}\n   {}\n", i + 1, title, url, truncate(content, 200))
        })
        .collect();

    ToolResult::success(output.join("\n"))
}

/// Truncate string to max length
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len])
    }
}
