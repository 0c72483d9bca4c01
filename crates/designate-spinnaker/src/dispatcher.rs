//! Spinnaker trigger
//!
//! One dispatcher serves both addressing modes; only the URL differs:
//!
//! | Mode | URL |
//! |---|---|
//! | pipeline | `{base}/pipelines/{app}/{pipeline}` |
//! | webhook | `{base}/webhooks/webhook/app.{app}.{pipeline}` |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use designate_core::{Deployment, DeploymentArgs, Environment};

use crate::error::{Result, SpinnakerError};
use crate::payload::TriggerPayload;

/// Upper bound for a trigger call
pub const TRIGGER_TIMEOUT: Duration = Duration::from_secs(5);

/// How the trigger endpoint is addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Spinnaker gate pipeline invocation
    #[default]
    Pipeline,
    /// Spinnaker webhook trigger
    Webhook,
}

impl DispatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchMode::Pipeline => "pipeline",
            DispatchMode::Webhook => "webhook",
        }
    }

    /// Trigger URL for `app`'s `pipeline` below `endpoint_base`
    pub fn trigger_url(&self, endpoint_base: &str, app: &str, pipeline: &str) -> String {
        let base = endpoint_base.strip_suffix('/').unwrap_or(endpoint_base);
        match self {
            DispatchMode::Pipeline => format!("{}/pipelines/{}/{}", base, app, pipeline),
            DispatchMode::Webhook => format!("{}/webhooks/webhook/app.{}.{}", base, app, pipeline),
        }
    }
}

impl FromStr for DispatchMode {
    type Err = SpinnakerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pipeline" => Ok(DispatchMode::Pipeline),
            "webhook" => Ok(DispatchMode::Webhook),
            _ => Err(SpinnakerError::InvalidMode {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sends rendered values to Spinnaker
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    mode: DispatchMode,
}

impl Dispatcher {
    pub fn new(mode: DispatchMode) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(TRIGGER_TIMEOUT)
            .build()
            .map_err(|e| SpinnakerError::Client {
                message: e.to_string(),
            })?;

        Ok(Self { client, mode })
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Trigger a resolved deployment
    pub async fn start(&self, deployment: &Deployment<'_>) -> Result<u16> {
        self.trigger(
            deployment.environment,
            &deployment.app.name,
            &deployment.args.pipeline,
            &deployment.values,
            deployment.args,
        )
        .await
    }

    /// POST the values artifact and parameters. Exactly one request is made;
    /// returns the response status.
    pub async fn trigger(
        &self,
        environment: &Environment,
        app_name: &str,
        pipeline: &str,
        values: &str,
        parameters: &DeploymentArgs,
    ) -> Result<u16> {
        let url = self
            .mode
            .trigger_url(&environment.endpoint_base, app_name, pipeline);
        let payload = TriggerPayload::new(values, parameters);

        tracing::info!(mode = %self.mode, %url, "triggering spinnaker");

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(e, &url))?;

        let status = response.status();
        tracing::info!(%url, status = status.as_u16(), "spinnaker responded");

        if !status.is_success() {
            return Err(SpinnakerError::Http {
                status: status.as_u16(),
                url,
            });
        }

        Ok(status.as_u16())
    }
}

fn transport_error(err: reqwest::Error, url: &str) -> SpinnakerError {
    if err.is_timeout() {
        SpinnakerError::Timeout {
            url: url.to_string(),
            seconds: TRIGGER_TIMEOUT.as_secs(),
        }
    } else {
        SpinnakerError::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use designate_core::{Application, Tags};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn environment(base: &str) -> Environment {
        Environment {
            name: "e1".to_string(),
            environment_name: "prod".to_string(),
            tags: Tags::new(),
            domain: "example.com".to_string(),
            endpoint_base: base.to_string(),
        }
    }

    fn args() -> DeploymentArgs {
        DeploymentArgs::new("1.2.3", "prod", "deploy", "web")
    }

    #[test]
    fn test_pipeline_url() {
        assert_eq!(
            DispatchMode::Pipeline.trigger_url("https://sk", "svc", "deploy"),
            "https://sk/pipelines/svc/deploy"
        );
        assert_eq!(
            DispatchMode::Pipeline.trigger_url("https://sk/", "my.app", "v2.deploy"),
            "https://sk/pipelines/my.app/v2.deploy"
        );
    }

    #[test]
    fn test_webhook_url() {
        assert_eq!(
            DispatchMode::Webhook.trigger_url("https://sk", "svc", "deploy"),
            "https://sk/webhooks/webhook/app.svc.deploy"
        );
        assert_eq!(
            DispatchMode::Webhook.trigger_url("https://sk/gate", "my.app", "blue.green"),
            "https://sk/gate/webhooks/webhook/app.my.app.blue.green"
        );
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("pipeline".parse::<DispatchMode>().unwrap(), DispatchMode::Pipeline);
        assert_eq!("Webhook".parse::<DispatchMode>().unwrap(), DispatchMode::Webhook);
        assert!(matches!(
            "lambda".parse::<DispatchMode>(),
            Err(SpinnakerError::InvalidMode { .. })
        ));
        assert_eq!(DispatchMode::default(), DispatchMode::Pipeline);
    }

    #[tokio::test]
    async fn test_pipeline_trigger_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pipelines/svc/deploy"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(DispatchMode::Pipeline).unwrap();
        let status = dispatcher
            .trigger(&environment(&server.uri()), "svc", "deploy", "a: 1\n", &args())
            .await
            .unwrap();
        assert_eq!(status, 202);

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["artifacts"][0]["name"], "registry-values");
        assert_eq!(body["artifacts"][0]["type"], "embedded/base64");
        assert_eq!(body["parameters"]["version"], "1.2.3");

        let reference = body["artifacts"][0]["reference"].as_str().unwrap();
        let decoded = base64::engine::general_purpose::STANDARD.decode(reference).unwrap();
        assert_eq!(decoded, b"a: 1\n");
    }

    #[tokio::test]
    async fn test_webhook_trigger() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhooks/webhook/app.svc.deploy"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(DispatchMode::Webhook).unwrap();
        dispatcher
            .trigger(&environment(&server.uri()), "svc", "deploy", "", &args())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unavailable_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(DispatchMode::Pipeline).unwrap();
        let err = dispatcher
            .trigger(&environment(&server.uri()), "svc", "deploy", "", &args())
            .await
            .unwrap_err();

        match err {
            SpinnakerError::Http { status, ref url } => {
                assert_eq!(status, 503);
                assert!(url.ends_with("/pipelines/svc/deploy"));
            }
            other => panic!("Expected HTTP error, got {:?}", other),
        }
        assert!(err.to_string().contains("503"));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(8)))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(DispatchMode::Pipeline).unwrap();
        let err = dispatcher
            .trigger(&environment(&server.uri()), "svc", "deploy", "", &args())
            .await
            .unwrap_err();
        assert!(matches!(err, SpinnakerError::Timeout { seconds: 5, .. }));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let dispatcher = Dispatcher::new(DispatchMode::Pipeline).unwrap();
        let err = dispatcher
            .trigger(&environment("http://127.0.0.1:1"), "svc", "deploy", "", &args())
            .await
            .unwrap_err();
        assert!(matches!(err, SpinnakerError::Network { .. }));
    }

    #[tokio::test]
    async fn test_start_uses_deployment_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pipelines/svc/canary"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let app = Application {
            name: "svc".to_string(),
            template_ref: "t1".to_string(),
            tags: Tags::new(),
        };
        let args = DeploymentArgs::new("2.0.0", "prod", "canary", "web");
        let env = environment(&server.uri());
        let deployment = Deployment::new(&app, &args, &env, "image: svc:2.0.0".to_string());

        let dispatcher = Dispatcher::new(DispatchMode::Pipeline).unwrap();
        assert_eq!(dispatcher.start(&deployment).await.unwrap(), 200);

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["parameters"]["pipeline"], "canary");
    }
}
