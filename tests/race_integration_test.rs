use cep_race::{
    render_outcome, Address, AddressBrasilApi, AddressViaCep, CliConfig, LookupEngine,
    LookupError, RaceOutcome, RacePolicy,
};
use httpmock::prelude::*;
use std::time::{Duration, Instant};

const CEP: &str = "69304350";

// 沒有服務在監聽的位址，連線會立即被拒絕
const UNREACHABLE_URL: &str = "http://127.0.0.1:1/unreachable/";

fn cli_config(brasilapi_url: String, viacep_url: String, timeout_ms: u64, policy: RacePolicy) -> CliConfig {
    CliConfig {
        cep: CEP.to_string(),
        timeout_ms,
        policy,
        brasilapi_url,
        viacep_url,
        config: None,
        verbose: false,
        json_logs: false,
    }
}

fn brasilapi_body() -> serde_json::Value {
    serde_json::json!({
        "cep": "69304350",
        "state": "RR",
        "city": "Boa Vista",
        "neighborhood": "Caranã",
        "street": "Rua Capitão Bessa",
        "service": "open-cep"
    })
}

fn viacep_body() -> serde_json::Value {
    serde_json::json!({
        "cep": "69304-350",
        "logradouro": "Rua Capitão Bessa",
        "complemento": "",
        "bairro": "Caranã",
        "localidade": "Boa Vista",
        "uf": "RR",
        "ibge": "1400100",
        "gia": "",
        "ddd": "95",
        "siafi": "0301"
    })
}

#[tokio::test]
async fn test_fast_brasilapi_wins_over_slow_viacep() {
    let server = MockServer::start_async().await;

    let brasilapi_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/cep/v1/69304350");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(brasilapi_body());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/69304350/json/");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(viacep_body());
        })
        .await;

    let config = cli_config(
        server.url("/api/cep/v1/"),
        server.url("/ws/"),
        5_000,
        RacePolicy::FirstSuccess,
    );

    let started = Instant::now();
    let outcome = LookupEngine::new(config).run().await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    brasilapi_mock.assert_async().await;
    assert_eq!(
        outcome,
        RaceOutcome::Resolved {
            service: "BrasilAPI".to_string(),
            address: Address::BrasilApi(AddressBrasilApi {
                cep: "69304350".to_string(),
                state: "RR".to_string(),
                city: "Boa Vista".to_string(),
                neighborhood: "Caranã".to_string(),
                street: "Rua Capitão Bessa".to_string(),
                service: "open-cep".to_string(),
            }),
        }
    );
    assert_eq!(
        render_outcome(&outcome).unwrap(),
        "Response from BrasilAPI:\n{Cep:69304350 State:RR City:Boa Vista Neighborhood:Caranã Street:Rua Capitão Bessa Service:open-cep}"
    );
}

#[tokio::test]
async fn test_viacep_body_decodes_every_field() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/69304350/json/");
            then.status(200).json_body(viacep_body());
        })
        .await;

    let config = cli_config(
        UNREACHABLE_URL.to_string(),
        server.url("/ws/"),
        2_000,
        RacePolicy::FirstSuccess,
    );
    let outcome = LookupEngine::new(config).run().await.unwrap();

    assert_eq!(
        outcome,
        RaceOutcome::Resolved {
            service: "ViaCEP".to_string(),
            address: Address::ViaCep(AddressViaCep {
                cep: "69304-350".to_string(),
                logradouro: "Rua Capitão Bessa".to_string(),
                complemento: String::new(),
                bairro: "Caranã".to_string(),
                localidade: "Boa Vista".to_string(),
                uf: "RR".to_string(),
                ibge: "1400100".to_string(),
                gia: String::new(),
                ddd: "95".to_string(),
                siafi: "0301".to_string(),
            }),
        }
    );
}

#[tokio::test]
async fn test_both_services_slower_than_deadline() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/cep/v1/69304350");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(brasilapi_body());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/69304350/json/");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(viacep_body());
        })
        .await;

    let config = cli_config(
        server.url("/api/cep/v1/"),
        server.url("/ws/"),
        300,
        RacePolicy::FirstSuccess,
    );

    let started = Instant::now();
    let outcome = LookupEngine::new(config).run().await.unwrap();

    assert!(started.elapsed() < Duration::from_millis(1_500));
    assert_eq!(outcome, RaceOutcome::TimedOut);
    assert_eq!(render_outcome(&outcome).unwrap(), "Request timeout");
}

#[tokio::test]
async fn test_malformed_body_from_winner_prints_empty_record() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/69304350/json/");
            then.status(200).body("{\"cep\": \"69304-");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/cep/v1/69304350");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(brasilapi_body());
        })
        .await;

    let config = cli_config(
        server.url("/api/cep/v1/"),
        server.url("/ws/"),
        5_000,
        RacePolicy::FirstSuccess,
    );
    let outcome = LookupEngine::new(config).run().await.unwrap();

    assert_eq!(
        outcome,
        RaceOutcome::Resolved {
            service: "ViaCEP".to_string(),
            address: Address::ViaCep(AddressViaCep::default()),
        }
    );
    assert_eq!(
        render_outcome(&outcome).unwrap(),
        "Response from ViaCEP:\n{Cep: Logradouro: Complemento: Bairro: Localidade: Uf: Ibge: Gia: Ddd: Siafi:}"
    );
}

#[tokio::test]
async fn test_array_body_from_winner_prints_empty_record() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/cep/v1/69304350");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(r#"["69304350", "RR", "Boa Vista"]"#);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/69304350/json/");
            then.status(200).body("[]");
        })
        .await;

    let config = cli_config(
        server.url("/api/cep/v1/"),
        UNREACHABLE_URL.to_string(),
        2_000,
        RacePolicy::FirstSuccess,
    );
    let outcome = LookupEngine::new(config).run().await.unwrap();

    assert_eq!(
        outcome,
        RaceOutcome::Resolved {
            service: "BrasilAPI".to_string(),
            address: Address::BrasilApi(AddressBrasilApi::default()),
        }
    );
    assert_eq!(
        render_outcome(&outcome).unwrap(),
        "Response from BrasilAPI:\n{Cep: State: City: Neighborhood: Street: Service:}"
    );

    let config = cli_config(
        UNREACHABLE_URL.to_string(),
        server.url("/ws/"),
        2_000,
        RacePolicy::FirstSuccess,
    );
    let outcome = LookupEngine::new(config).run().await.unwrap();

    assert_eq!(
        render_outcome(&outcome).unwrap(),
        "Response from ViaCEP:\n{Cep: Logradouro: Complemento: Bairro: Localidade: Uf: Ibge: Gia: Ddd: Siafi:}"
    );
}

#[tokio::test]
async fn test_error_status_body_is_still_decoded() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/cep/v1/69304350");
            then.status(404).json_body(serde_json::json!({
                "name": "CepPromiseError",
                "message": "Todos os serviços de CEP retornaram erro.",
                "type": "service_error"
            }));
        })
        .await;

    let config = cli_config(
        server.url("/api/cep/v1/"),
        UNREACHABLE_URL.to_string(),
        2_000,
        RacePolicy::FirstSuccess,
    );
    let outcome = LookupEngine::new(config).run().await.unwrap();

    assert_eq!(
        outcome,
        RaceOutcome::Resolved {
            service: "BrasilAPI".to_string(),
            address: Address::BrasilApi(AddressBrasilApi::default()),
        }
    );
}

#[tokio::test]
async fn test_failed_service_falls_through_to_the_other() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/69304350/json/");
            then.status(200)
                .delay(Duration::from_millis(300))
                .json_body(viacep_body());
        })
        .await;

    let config = cli_config(
        UNREACHABLE_URL.to_string(),
        server.url("/ws/"),
        3_000,
        RacePolicy::FirstSuccess,
    );
    let outcome = LookupEngine::new(config).run().await.unwrap();

    match &outcome {
        RaceOutcome::Resolved {
            service,
            address: Address::ViaCep(address),
        } => {
            assert_eq!(service, "ViaCEP");
            assert_eq!(address.uf, "RR");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_first_event_policy_prints_nothing_on_failure() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/69304350/json/");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(viacep_body());
        })
        .await;

    let config = cli_config(
        UNREACHABLE_URL.to_string(),
        server.url("/ws/"),
        3_000,
        RacePolicy::FirstEvent,
    );
    let outcome = LookupEngine::new(config).run().await.unwrap();

    assert_eq!(
        outcome,
        RaceOutcome::Failed {
            service: "BrasilAPI".to_string()
        }
    );
    assert_eq!(render_outcome(&outcome), None);
}

#[tokio::test]
async fn test_all_services_unreachable() {
    let config = cli_config(
        UNREACHABLE_URL.to_string(),
        UNREACHABLE_URL.to_string(),
        3_000,
        RacePolicy::FirstSuccess,
    );

    let started = Instant::now();
    let outcome = LookupEngine::new(config).run().await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    match &outcome {
        RaceOutcome::Exhausted { failures } => {
            assert_eq!(failures.len(), 2);
            assert!(failures.contains(&"BrasilAPI".to_string()));
            assert!(failures.contains(&"ViaCEP".to_string()));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(
        render_outcome(&outcome).unwrap(),
        "No response from any service"
    );
}

#[tokio::test]
async fn test_invalid_cep_is_rejected_before_any_request() {
    let server = MockServer::start_async().await;

    let any_mock = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(brasilapi_body());
        })
        .await;

    let mut config = cli_config(
        server.url("/api/cep/v1/"),
        server.url("/ws/"),
        1_000,
        RacePolicy::FirstSuccess,
    );
    config.cep = "6930-4350".to_string();

    let result = LookupEngine::new(config).run().await;

    assert!(matches!(result, Err(LookupError::InvalidCep { .. })));
    any_mock.assert_hits_async(0).await;
}
