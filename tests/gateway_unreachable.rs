use std::sync::Arc;
use std::time::Duration;

use metacog::gateway::openai::OpenAiAdapter;
use metacog::gateway::{Attribution, ChatModel, ChatRequest, Message, NoopUsageSink, ProviderGateway};
use metacog::pipeline::{self, PipelineConfig, PipelineError};

fn unreachable_gateway() -> ProviderGateway<NoopUsageSink> {
    let adapter = OpenAiAdapter::with_config(
        "sk-test",
        "http://127.0.0.1:9",
        Duration::from_secs(1),
    )
    .unwrap();
    ProviderGateway::with_adapter(adapter, Arc::new(NoopUsageSink))
}

#[tokio::test]
async fn unreachable_endpoint_yields_provider_error() {
    let gateway = unreachable_gateway();

    let req = ChatRequest::new(
        ChatModel::openai("gpt-3.5-turbo"),
        vec![Message::system("role"), Message::user("prompt")],
        Attribution::new("test"),
    );

    let err = gateway.chat(req).await.unwrap_err();
    assert_eq!(err.code(), "http_error");
}

#[tokio::test]
async fn pipeline_aborts_at_first_stage_when_provider_is_unreachable() {
    let gateway = unreachable_gateway();
    let cfg = PipelineConfig::default();

    let result = pipeline::run_pipeline(&gateway, &cfg, "input".to_string()).await;
    assert!(matches!(result, Err(PipelineError::Analysis(_))));
}
