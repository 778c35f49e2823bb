//! Ollama HTTP client
//!
//! Every request goes through one `ureq::Agent` configured with a global
//! timeout, so no call to the server can block longer than
//! `llm.timeout_secs`. Failures are returned as [`LlmError`] values and are
//! never retried.

use serde::{Deserialize, Serialize};
use ureq::Agent;

use super::prompt::{self, Locale};
use super::{LlmError, TextGenerator};
use crate::ability::extract::{extract_ability, extract_summary};
use crate::ability::{Ability, AbilityText, ParameterSet};
use crate::config::LlmConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    role: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct ChatOptions {
    num_predict: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    name: String,
}

/// Client for a locally hosted Ollama server
pub struct OllamaClient {
    agent: Agent,
    base_url: String,
    config: LlmConfig,
    locale: Locale,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig, locale: Locale) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: config.base_url(),
            config: config.clone(),
            locale,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn sampling_options(&self) -> ChatOptions {
        ChatOptions {
            num_predict: self.config.num_predict,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        }
    }

    /// Send a single-message chat and return the answer text
    fn chat(&self, model: &str, prompt: String, options: Option<ChatOptions>) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            stream: false,
            options,
        };

        let request_body = serde_json::to_string(&request).map_err(|e| LlmError::Decode(e.to_string()))?;

        log::debug!("POST {} model={}", url, model);
        let mut response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send(request_body.as_bytes())
            .map_err(|e| LlmError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(LlmError::Status { code: status });
        }

        let response_body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| LlmError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;
        let response: ChatResponse =
            serde_json::from_str(&response_body).map_err(|e| LlmError::Decode(e.to_string()))?;

        Ok(response.message.map(|m| m.content).unwrap_or_default())
    }

    fn tags(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.base_url);

        let mut response = self.agent.get(&url).call().map_err(|e| LlmError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(LlmError::Status { code: status });
        }

        let response_body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| LlmError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;
        let tags: TagsResponse = serde_json::from_str(&response_body).map_err(|e| LlmError::Decode(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

impl TextGenerator for OllamaClient {
    fn generate_ability_text(&self, concept: &str, parameters: &ParameterSet) -> Result<AbilityText, LlmError> {
        let prompt = prompt::ability_prompt(self.locale, concept, parameters);
        let content = self.chat(&self.config.ability_model, prompt, Some(self.sampling_options()))?;

        extract_ability(&content, self.locale).ok_or_else(|| {
            log::warn!("Could not parse ability answer: {:?}", content);
            LlmError::Unparseable
        })
    }

    fn generate_summary_text(&self, concept: &str, abilities: &[Ability]) -> Result<String, LlmError> {
        let prompt = prompt::summary_prompt(self.locale, concept, abilities);
        let content = self.chat(&self.config.summary_model, prompt, None)?;
        if content.trim().is_empty() {
            log::warn!("Summary model returned an empty answer");
            return Err(LlmError::Unparseable);
        }

        Ok(extract_summary(&content, self.locale))
    }

    fn list_available_backends(&self) -> Result<Vec<String>, LlmError> {
        self.tags()
    }

    fn probe_connectivity(&self) -> bool {
        match self.tags() {
            Ok(_) => true,
            Err(e) => {
                log::error!("Failed to connect to Ollama at {}: {}", self.base_url, e);
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ability::{GeneratedParameter, ParameterConfig};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serve a single canned HTTP response and hand back the raw request
    fn serve_once(status: u16, body: &str) -> (LlmConfig, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let body = body.to_string();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });

        let config = LlmConfig {
            host: "127.0.0.1".to_string(),
            port,
            timeout_secs: 5,
            ..LlmConfig::default()
        };
        (config, handle)
    }

    /// Serve the same canned response to `times` consecutive requests
    pub(crate) fn serve_times(status: u16, body: &str, times: usize) -> (LlmConfig, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let body = body.to_string();

        let handle = thread::spawn(move || {
            for _ in 0..times {
                let (mut stream, _) = listener.accept().unwrap();
                read_request(&mut stream);
                let response = format!(
                    "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).unwrap();
            }
        });

        let config = LlmConfig {
            host: "127.0.0.1".to_string(),
            port,
            timeout_secs: 5,
            ..LlmConfig::default()
        };
        (config, handle)
    }

    fn read_request(stream: &mut std::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length").then(|| v.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    fn parameters() -> ParameterSet {
        let mut params = ParameterSet::new();
        params.insert(
            "power".to_string(),
            GeneratedParameter {
                value: 7,
                description: "strong".to_string(),
                raw_config: ParameterConfig::new(0, Some(5), 10),
            },
        );
        params
    }

    #[test]
    fn test_generate_ability_text_parses_template() {
        let body = r#"{"message":{"role":"assistant","content":"(name:'Fireball';description:'Deals damage')"}}"#;
        let (config, server) = serve_once(200, body);
        let client = OllamaClient::new(&config, Locale::En);

        let text = client.generate_ability_text("a pyromancer", &parameters()).unwrap();
        assert_eq!(text.name, "Fireball");
        assert_eq!(text.description, "Deals damage");

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /api/chat"));
        assert!(request.contains("\"model\":\"gpt-oss:latest\""));
        assert!(request.contains("\"stream\":false"));
        assert!(request.contains("\"num_predict\":2000"));
        assert!(request.contains("a pyromancer"));
    }

    #[test]
    fn test_generate_ability_text_unparseable() {
        let body = r#"{"message":{"role":"assistant","content":"no template here"}}"#;
        let (config, server) = serve_once(200, body);
        let client = OllamaClient::new(&config, Locale::En);

        let result = client.generate_ability_text("a pyromancer", &parameters());
        assert!(matches!(result, Err(LlmError::Unparseable)));
        server.join().unwrap();
    }

    #[test]
    fn test_generate_summary_text_sends_no_options() {
        let body = r#"{"message":{"content":"(summary:'A fiery soul.')"}}"#;
        let (config, server) = serve_once(200, body);
        let client = OllamaClient::new(&config, Locale::En);

        let summary = client.generate_summary_text("a pyromancer", &[]).unwrap();
        assert_eq!(summary, "A fiery soul.");

        let request = server.join().unwrap();
        assert!(request.contains("\"model\":\"llama3.1:latest\""));
        assert!(!request.contains("\"options\""));
    }

    #[test]
    fn test_empty_summary_answer_is_unparseable() {
        let (config, server) = serve_once(200, r#"{"message":{"role":"assistant","content":"  \n"}}"#);
        let client = OllamaClient::new(&config, Locale::En);

        let result = client.generate_summary_text("a pyromancer", &[]);
        assert!(matches!(result, Err(LlmError::Unparseable)));
        server.join().unwrap();
    }

    #[test]
    fn test_missing_message_is_unparseable() {
        let (config, server) = serve_once(200, r#"{"done":true}"#);
        let client = OllamaClient::new(&config, Locale::En);

        let result = client.generate_summary_text("a pyromancer", &[]);
        assert!(matches!(result, Err(LlmError::Unparseable)));
        server.join().unwrap();
    }

    #[test]
    fn test_error_status_is_reported() {
        let (config, server) = serve_once(500, "{}");
        let client = OllamaClient::new(&config, Locale::En);

        let result = client.generate_summary_text("a pyromancer", &[]);
        assert!(matches!(result, Err(LlmError::Status { code: 500 })));
        server.join().unwrap();
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let (config, server) = serve_once(200, "not json");
        let client = OllamaClient::new(&config, Locale::En);

        let result = client.generate_ability_text("a pyromancer", &parameters());
        assert!(matches!(result, Err(LlmError::Decode(_))));
        server.join().unwrap();
    }

    #[test]
    fn test_list_available_backends() {
        let body = r#"{"models":[{"name":"llama3.1:latest"},{"name":"gpt-oss:latest"}]}"#;
        let (config, server) = serve_once(200, body);
        let client = OllamaClient::new(&config, Locale::En);

        let models = client.list_available_backends().unwrap();
        assert_eq!(models, vec!["llama3.1:latest", "gpt-oss:latest"]);

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /api/tags"));
    }

    #[test]
    fn test_probe_unreachable_server() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = LlmConfig {
            host: "127.0.0.1".to_string(),
            port,
            timeout_secs: 2,
            ..LlmConfig::default()
        };
        let client = OllamaClient::new(&config, Locale::En);

        assert!(!client.probe_connectivity());
        assert!(matches!(
            client.generate_ability_text("a pyromancer", &parameters()),
            Err(LlmError::Transport { .. })
        ));
    }

    #[test]
    fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(std::time::Duration::from_secs(3));
            drop(stream);
        });

        let config = LlmConfig {
            host: "127.0.0.1".to_string(),
            port,
            timeout_secs: 1,
            ..LlmConfig::default()
        };
        let client = OllamaClient::new(&config, Locale::En);

        let result = client.generate_summary_text("a pyromancer", &[]);
        assert!(matches!(result, Err(LlmError::Transport { .. })));
        server.join().unwrap();
    }
}
