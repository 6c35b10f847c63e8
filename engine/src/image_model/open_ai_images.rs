use base64::{Engine, engine::general_purpose::STANDARD};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    ImgModBox,
    config::{Credentials, ImageModelConfig},
    image_model::{GenerateError, Image, ImageFuture, ImageModel, Resolution, ResponseFormat},
};

#[derive(Debug, Clone)]
pub struct OpenAIImages {
    client: Client,
    credentials: Credentials,
    url: String,
    resolution: Resolution,
    model: Option<String>,
}

impl OpenAIImages {
    pub fn new(config: &ImageModelConfig) -> Self {
        Self {
            client: Client::new(),
            credentials: config.credentials.clone(),
            url: format!(
                "{}/images/generations",
                config.base_url.trim_end_matches('/')
            ),
            resolution: config.resolution,
            model: config.model.clone(),
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> GenerationRequest<'a> {
        GenerationRequest {
            model: self.model.as_deref(),
            prompt,
            n: 1,
            size: self.resolution.as_size(),
            response_format: ResponseFormat::Base64Json,
        }
    }
}

impl ImageModel for OpenAIImages {
    fn get_image<'a>(&'a self, prompt: &'a str) -> ImageFuture<'a> {
        Box::pin(async move {
            let mut req = self
                .client
                .post(&self.url)
                .bearer_auth(&self.credentials.api_key)
                .json(&self.request_body(prompt));
            if let Some(org) = self.credentials.organization() {
                req = req.header("OpenAI-Organization", org);
            }

            let resp = req.send().await?;
            let status = resp.status();
            let text = resp.text().await?;

            if !status.is_success() {
                return Err(api_error(status.as_u16(), &text));
            }

            let image = decode_response(&text)?;
            debug!("Received {image:?}");
            Ok(image)
        })
    }

    fn clone(&self) -> ImgModBox {
        Box::new(Clone::clone(self))
    }
}

/// Takes the first result of a generation response and decodes its base64 payload.
fn decode_response(body: &str) -> Result<Image, GenerateError> {
    let response: GenerationResponse =
        serde_json::from_str(body).map_err(|e| GenerateError::InvalidResponse(e.to_string()))?;
    let first = response
        .data
        .into_iter()
        .next()
        .ok_or(GenerateError::EmptyResponse)?;
    let encoded = first.b64_json.ok_or_else(|| {
        GenerateError::InvalidResponse("result carries no b64_json payload".into())
    })?;
    Ok(Image::new(STANDARD.decode(encoded.trim())?))
}

fn api_error(status: u16, body: &str) -> GenerateError {
    let message = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse { error }) => match error.kind {
            Some(kind) => format!("{} ({kind})", error.message),
            None => error.message,
        },
        Err(_) => body.to_string(),
    };
    GenerateError::Api { status, message }
}

//
// ===== OpenAI wire types =====
//

#[derive(Serialize)]
struct GenerationRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    prompt: &'a str,
    n: u8,
    size: &'static str,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    #[serde(default)]
    b64_json: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[cfg(test)]
mod test {
    use expect_test::expect;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn client_for(base_url: &str, organization: Option<&str>) -> OpenAIImages {
        let mut config = ImageModelConfig::with_api_key("sk-test");
        config.credentials.organization = organization.map(Into::into);
        config.base_url = base_url.into();
        OpenAIImages::new(&config)
    }

    #[test]
    fn request_serialization() {
        let client = client_for("https://api.openai.com/v1", None);
        let expect = expect![[
            r#"{"prompt":"A red fox in the snow","n":1,"size":"512x512","response_format":"b64_json"}"#
        ]];
        expect.assert_eq(&serde_json::to_string(&client.request_body("A red fox in the snow")).unwrap());
    }

    #[test]
    fn request_serialization_with_model() {
        let mut config = ImageModelConfig::with_api_key("sk-test");
        config.model = Some("dall-e-2".into());
        config.resolution = Resolution::Large;
        let client = OpenAIImages::new(&config);
        let expect = expect![[
            r#"{"model":"dall-e-2","prompt":"fox","n":1,"size":"1024x1024","response_format":"b64_json"}"#
        ]];
        expect.assert_eq(&serde_json::to_string(&client.request_body("fox")).unwrap());
    }

    #[test]
    fn trailing_slash_in_base_url() {
        let client = client_for("http://localhost:1234/v1/", None);
        assert_eq!(client.url, "http://localhost:1234/v1/images/generations");
    }

    #[test]
    fn decodes_first_result() {
        let body = json!({
            "created": 1700000000,
            "data": [
                { "b64_json": "iVBORw0KGgo=" },
                { "b64_json": "AAAA" },
            ]
        });
        let image = decode_response(&body.to_string()).unwrap();
        assert_eq!(&image.data[..], PNG_HEADER);
        assert_eq!(image.extension(), "png");
    }

    #[test]
    fn empty_result_list() {
        let err = decode_response(r#"{"created":1,"data":[]}"#).unwrap_err();
        assert_eq!(err, GenerateError::EmptyResponse);
    }

    #[test]
    fn url_only_result_is_rejected() {
        let err = decode_response(r#"{"data":[{"url":"https://example.com/x.png"}]}"#).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidResponse(_)));
    }

    #[test]
    fn bad_base64_is_a_decode_error() {
        let err = decode_response(r#"{"data":[{"b64_json":"not base64!"}]}"#).unwrap_err();
        assert!(matches!(err, GenerateError::Decode(_)));
    }

    #[test]
    fn garbage_body_is_invalid_response() {
        let err = decode_response("<html>oops</html>").unwrap_err();
        assert!(matches!(err, GenerateError::InvalidResponse(_)));
    }

    #[test]
    fn api_error_message() {
        let body = json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "code": "invalid_api_key",
            }
        });
        let expect = expect![[
            r#"API error (401): Incorrect API key provided (invalid_request_error)"#
        ]];
        expect.assert_eq(&api_error(401, &body.to_string()).to_string());

        let err = api_error(502, "Bad Gateway");
        assert_eq!(
            err,
            GenerateError::Api {
                status: 502,
                message: "Bad Gateway".into()
            }
        );
    }

    #[tokio::test]
    async fn sends_one_request_and_decodes_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .and(header("authorization", "Bearer sk-test"))
            .and(header("openai-organization", "Personal"))
            .and(body_json(json!({
                "prompt": "A lighthouse at dusk",
                "n": 1,
                "size": "512x512",
                "response_format": "b64_json",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "created": 1700000000,
                "data": [{ "b64_json": STANDARD.encode(PNG_HEADER) }],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), Some("Personal"));
        let image = client.get_image("A lighthouse at dusk").await.unwrap();
        assert_eq!(&image.data[..], PNG_HEADER);
    }

    #[tokio::test]
    async fn error_status_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "message": "Your request was rejected by the safety system.",
                    "type": "invalid_request_error",
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), None);
        let err = client.get_image("something forbidden").await.unwrap_err();
        assert!(matches!(err, GenerateError::Api { status: 400, .. }));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        // nothing listens on port 1
        let client = client_for("http://127.0.0.1:1", None);
        let err = client.get_image("anything").await.unwrap_err();
        assert!(matches!(err, GenerateError::Network(_)));
        assert!(err.is_transient());
    }
}
