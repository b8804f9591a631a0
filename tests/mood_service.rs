//! Mood classifier and predictor clients against a mock service.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moodlist::mood::{MoodClassifier, MoodPredictor};
use moodlist::{ApiClient, AppError, Mood, MoodServiceClient};

fn service(server: &MockServer, with_predictor: bool) -> MoodServiceClient {
    let api = ApiClient::new(Duration::from_secs(5)).unwrap();
    let classify = format!("{}/classify", server.uri());
    let predict = format!("{}/predict", server.uri());
    MoodServiceClient::new(api, &classify, with_predictor.then_some(predict.as_str()))
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_classify_sends_ids_and_mood() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify"))
        .and(body_json(json!({ "trackIds": ["1", "2", "3"], "mood": "happy" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "moodPartitions": {
                "happy": [{ "trackId": "1" }, { "trackId": "3" }],
                "sad": [{ "trackId": "2" }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let partition = service(&server, false)
        .classify(&ids(&["1", "2", "3"]), Some(Mood::Happy))
        .await
        .unwrap();

    assert_eq!(partition["happy"], ids(&["1", "3"]));
    assert_eq!(partition["sad"], ids(&["2"]));
}

#[tokio::test]
async fn test_classify_without_mood_omits_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify"))
        .and(body_json(json!({ "trackIds": ["1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "moodPartitions": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let partition = service(&server, false)
        .classify(&ids(&["1"]), None)
        .await
        .unwrap();

    assert!(partition.is_empty());
}

#[tokio::test]
async fn test_malformed_classifier_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let err = service(&server, false)
        .classify(&ids(&["1"]), Some(Mood::Sad))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Classifier(_)));
}

#[tokio::test]
async fn test_classifier_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify"))
        .respond_with(ResponseTemplate::new(503).set_body_string("warming up"))
        .mount(&server)
        .await;

    let err = service(&server, false)
        .classify(&ids(&["1"]), Some(Mood::Sad))
        .await
        .unwrap_err();

    match err {
        AppError::Classifier(message) => assert!(message.contains("503")),
        other => panic!("Expected Classifier error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_predict_sends_base64_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({ "image": "aW1n" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "mood": "surprise" })))
        .expect(1)
        .mount(&server)
        .await;

    let label = service(&server, true).predict(b"img").await.unwrap();

    assert_eq!(label, "surprise");
    assert_eq!(label.parse::<Mood>().unwrap(), Mood::Energetic);
}

#[tokio::test]
async fn test_predict_without_endpoint_is_config_error() {
    let server = MockServer::start().await;

    let err = service(&server, false).predict(b"img").await.unwrap_err();

    assert!(matches!(err, AppError::Config(_)));
}
