mod support;

use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_test::traced_test;

use llm_vendors::TransportFailure;
use llm_vendors::prelude::*;
use support::{StubTransport, test_api_key};

fn vendor_with(transport: Arc<StubTransport>, caps: Arc<BackendCapabilities>) -> ModelVendorOpenAi {
    ModelVendorOpenAi::new(transport).with_capabilities(caps)
}

fn enabled_caps() -> Arc<BackendCapabilities> {
    Arc::new(BackendCapabilities::new(true))
}

#[tokio::test]
async fn generation_applies_defaults_end_to_end() {
    let transport = Arc::new(StubTransport::replying(ChatGenerateOutput::assistant(
        "Hello!",
        Some("stop".into()),
    )));
    let vendor = vendor_with(transport.clone(), enabled_caps());

    let key = test_api_key();
    assert!(is_valid_openai_api_key(&key));
    let access = vendor.get_transport_access(&OpenAiSetup::new().with_api_key(key.clone()));

    let out = vendor
        .chat_generate_or_throw(
            &access,
            &OpenAiLlmOptions::new("gpt-x"),
            vec![ChatMessage::user("hi")],
            None,
            None,
            None,
        )
        .await
        .expect("generation succeeds");
    assert_eq!(out.text(), Some("Hello!"));

    assert_eq!(transport.generate_calls(), 1);
    let request = transport.last_request().unwrap();
    assert_eq!(request.access.api_key, key);
    assert_eq!(request.access.dialect, Dialect::OpenAi);
    assert_eq!(request.model.id, "gpt-x");
    assert_eq!(request.model.temperature, 0.5);
    assert_eq!(request.model.max_tokens, 1024);
    assert_eq!(request.history, vec![ChatMessage::user("hi")]);
}

#[tokio::test]
async fn token_budget_override_beats_options() {
    let transport = Arc::new(StubTransport::replying(ChatGenerateOutput::assistant(
        "ok", None,
    )));
    let vendor = vendor_with(transport.clone(), enabled_caps());
    let options = OpenAiLlmOptions::new("gpt-x")
        .with_temperature(1.2)
        .with_response_tokens(512);

    vendor
        .chat_generate_or_throw(
            &OpenAiAccess::default(),
            &options,
            vec![],
            None,
            None,
            Some(256),
        )
        .await
        .unwrap();
    vendor
        .chat_generate_or_throw(&OpenAiAccess::default(), &options, vec![], None, None, None)
        .await
        .unwrap();

    let requests = transport.requests.lock().unwrap();
    assert_eq!(requests[0].model.max_tokens, 256);
    assert_eq!(requests[1].model.max_tokens, 512);
    assert_eq!(requests[1].model.temperature, 1.2);
}

#[tokio::test]
async fn zero_token_override_falls_back_to_options() {
    let transport = Arc::new(StubTransport::replying(ChatGenerateOutput::assistant(
        "ok", None,
    )));
    let vendor = vendor_with(transport.clone(), enabled_caps());
    let options = OpenAiLlmOptions::new("gpt-x").with_response_tokens(512);

    vendor
        .chat_generate_or_throw(
            &OpenAiAccess::default(),
            &options,
            vec![],
            None,
            None,
            Some(0),
        )
        .await
        .unwrap();

    assert_eq!(transport.last_request().unwrap().model.max_tokens, 512);
}

#[tokio::test]
async fn non_finite_temperature_is_rejected_before_dispatch() {
    let transport = Arc::new(StubTransport::replying(ChatGenerateOutput::assistant(
        "ok", None,
    )));
    let vendor = vendor_with(transport.clone(), enabled_caps());
    let options = OpenAiLlmOptions::new("gpt-x").with_temperature(f32::NAN);

    let err = vendor
        .chat_generate_or_throw(&OpenAiAccess::default(), &options, vec![], None, None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::ConfigurationError(_)));
    assert_eq!(transport.generate_calls(), 0);
}

#[tokio::test]
async fn function_call_result_passes_through() {
    let transport = Arc::new(StubTransport::replying(ChatGenerateOutput::FunctionCall {
        function_name: "get_weather".into(),
        function_arguments: json!({ "city": "Oslo" }),
    }));
    let vendor = vendor_with(transport.clone(), enabled_caps());
    let functions = vec![FunctionSpec::new(
        "get_weather",
        json!({ "type": "object" }),
    )];

    let out = vendor
        .chat_generate_or_throw(
            &OpenAiAccess::default(),
            &OpenAiLlmOptions::new("gpt-x"),
            vec![ChatMessage::user("weather?")],
            Some(functions),
            Some("get_weather".into()),
            None,
        )
        .await
        .unwrap();
    assert!(out.is_function_call());
    let request = transport.last_request().unwrap();
    assert_eq!(request.force_function_name.as_deref(), Some("get_weather"));
}

#[tokio::test]
#[traced_test]
async fn failure_message_is_surfaced_and_logged() {
    let transport = Arc::new(StubTransport::failing(|| {
        TransportFailure::Payload(json!({ "message": "rate limited" }))
    }));
    let vendor = vendor_with(transport.clone(), enabled_caps());

    let err = vendor
        .chat_generate_or_throw(
            &OpenAiAccess::default(),
            &OpenAiLlmOptions::new("gpt-x"),
            vec![ChatMessage::user("hi")],
            None,
            None,
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "rate limited");
    assert!(matches!(err, LlmError::GenerationError(_)));
    // no retries
    assert_eq!(transport.generate_calls(), 1);
    assert!(logs_contain("rate limited"));
}

#[tokio::test]
#[traced_test]
async fn shapeless_failure_uses_fallback_message() {
    let transport = Arc::new(StubTransport::failing(|| {
        TransportFailure::Payload(json!(42))
    }));
    let vendor = vendor_with(transport, enabled_caps());

    let err = vendor
        .chat_generate_or_throw(
            &OpenAiAccess::default(),
            &OpenAiLlmOptions::new("gpt-x"),
            vec![ChatMessage::user("hi")],
            None,
            None,
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "generation error");
    assert!(logs_contain("generation error"));
}

#[tokio::test]
async fn typed_failure_keeps_provider_message() {
    let transport = Arc::new(StubTransport::failing(|| {
        TransportFailure::Error(LlmError::AuthenticationError(
            "Incorrect API key provided".into(),
        ))
    }));
    let vendor = vendor_with(transport, enabled_caps());

    let err = vendor
        .chat_generate_or_throw(
            &OpenAiAccess::default(),
            &OpenAiLlmOptions::new("gpt-x"),
            vec![ChatMessage::user("hi")],
            None,
            None,
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Incorrect API key provided");
}

#[test]
fn backend_capability_is_read_live() {
    let caps = Arc::new(BackendCapabilities::new(false));
    let vendor = vendor_with(
        Arc::new(StubTransport::replying(ChatGenerateOutput::assistant(
            "", None,
        ))),
        caps.clone(),
    );
    let mut registry = VendorRegistry::new();
    registry.register(Arc::new(vendor.clone()));

    assert!(!vendor.has_backend_cap());
    assert!(registry.visible().is_empty());

    caps.set_has_llm_openai(true);
    assert!(vendor.has_backend_cap());
    assert_eq!(registry.visible().len(), 1);

    caps.set_has_llm_openai(false);
    assert!(!vendor.has_backend_cap());
}

#[test]
fn partial_setup_fills_every_field() {
    let vendor = vendor_with(
        Arc::new(StubTransport::replying(ChatGenerateOutput::assistant(
            "", None,
        ))),
        enabled_caps(),
    );
    let access = vendor.get_transport_access(&OpenAiSetup::new().with_host("llm.local"));
    assert_eq!(access.host, "llm.local");
    assert_eq!(access.api_key, "");
    assert_eq!(access.organization_id, "");
    assert_eq!(access.proxy_key, "");
    assert!(!access.moderation_check);

    let empty = vendor.get_transport_access(&OpenAiSetup::new());
    assert_eq!(empty, OpenAiAccess::default());
}

#[tokio::test]
async fn models_query_fetches_only_when_enabled() {
    let transport = Arc::new(StubTransport::replying(ChatGenerateOutput::assistant(
        "", None,
    )));
    let vendor = vendor_with(transport.clone(), enabled_caps());
    let access = OpenAiAccess::default();

    let successes = Arc::new(AtomicUsize::new(0));
    let counter = successes.clone();
    let mut query = vendor.update_models_query(
        &access,
        false,
        Box::new(move |_: &ModelList| {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );

    assert!(query.fetch().await.unwrap().is_none());
    assert_eq!(transport.list_calls.load(Ordering::SeqCst), 0);

    query.set_enabled(true);
    let list = query.fetch().await.unwrap().expect("models");
    assert_eq!(list.ids(), vec!["gpt-4o", "gpt-x"]);
    assert_eq!(successes.load(Ordering::SeqCst), 1);

    // focus never refetches, fresh data is served from cache
    query.window_focused().await.unwrap();
    query.fetch().await.unwrap();
    assert_eq!(transport.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(successes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn models_query_errors_bypass_success_callback() {
    let transport = Arc::new(
        StubTransport::replying(ChatGenerateOutput::assistant("", None))
            .with_models(Err(LlmError::AuthenticationError("bad key".into()))),
    );
    let vendor = vendor_with(transport, enabled_caps());

    let successes = Arc::new(AtomicUsize::new(0));
    let counter = successes.clone();
    let mut query = vendor.update_models_query(
        &OpenAiAccess::default(),
        true,
        Box::new(move |_: &ModelList| {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );

    let err = query.fetch().await.unwrap_err();
    assert!(matches!(err, LlmError::AuthenticationError(_)));
    assert!(matches!(query.state(), QueryState::Error(_)));
    assert_eq!(successes.load(Ordering::SeqCst), 0);
}
