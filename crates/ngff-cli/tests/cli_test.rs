//! Subcommand handlers against a wiremock origin.

use std::collections::BTreeMap;

use ngff_cli::array::{run_array, ArrayArgs};
use ngff_cli::validate::{run_validate, ValidateArgs};
use ngff_cli::Settings;
use ngff_schema::LocatorConfig;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(server: &MockServer, at: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn settings(server: &MockServer) -> Settings {
    let mut settings = Settings::default();
    settings.fetch.timeout_secs = 5;
    settings.locator = LocatorConfig {
        legacy_template: format!("{}/schemas/{{version}}/{{kind}}.schema", server.uri()),
        dev_template: format!("{}/schemas/dev/{{kind}}.schema", server.uri()),
        overrides: BTreeMap::new(),
    };
    settings
}

fn validate_args(url: String) -> ValidateArgs {
    ValidateArgs {
        url,
        images_per_well: None,
        max_concurrency: None,
        inspect_arrays: false,
        no_labels: false,
        json: false,
    }
}

async fn image_server(image: Value) -> MockServer {
    let server = MockServer::start().await;
    serve(
        &server,
        "/schemas/0.4/image.schema",
        json!({
            "type": "object",
            "required": ["multiscales"],
            "properties": {
                "multiscales": {"type": "array", "items": {"required": ["datasets"]}}
            }
        }),
    )
    .await;
    serve(&server, "/img.zarr/.zattrs", image).await;
    server
}

#[tokio::test]
async fn clean_image_exits_zero() {
    let server = image_server(json!({
        "multiscales": [{"version": "0.4", "datasets": [{"path": "0"}]}]
    }))
    .await;
    let args = validate_args(format!("{}/img.zarr", server.uri()));
    let code = run_validate(&args, settings(&server)).await.unwrap();
    assert_eq!(code, 0);
}

#[tokio::test]
async fn image_with_issues_exits_two() {
    let server = image_server(json!({"multiscales": [{"version": "0.4"}]})).await;
    let mut args = validate_args(format!("{}/img.zarr", server.uri()));
    args.json = true;
    let code = run_validate(&args, settings(&server)).await.unwrap();
    assert_eq!(code, 2);
}

#[tokio::test]
async fn missing_root_exits_two() {
    let server = MockServer::start().await;
    let args = validate_args(format!("{}/nothing.zarr", server.uri()));
    let code = run_validate(&args, settings(&server)).await.unwrap();
    assert_eq!(code, 2);
}

#[tokio::test]
async fn zero_concurrency_flag_is_rejected() {
    let server = MockServer::start().await;
    let mut args = validate_args(format!("{}/img.zarr", server.uri()));
    args.max_concurrency = Some(0);
    assert!(run_validate(&args, settings(&server)).await.is_err());
}

#[tokio::test]
async fn array_reads_v3_metadata() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/img.zarr/0/zarr.json",
        json!({
            "zarr_format": 3,
            "node_type": "array",
            "shape": [2, 64, 64],
            "data_type": "uint8",
            "chunk_grid": {"name": "regular", "configuration": {"chunk_shape": [1, 32, 32]}}
        }),
    )
    .await;
    let args = ArrayArgs {
        url: format!("{}/img.zarr/0", server.uri()),
        v2: false,
        json: true,
    };
    assert_eq!(run_array(&args, settings(&server)).await.unwrap(), 0);
}

#[tokio::test]
async fn array_without_metadata_is_an_error() {
    let server = MockServer::start().await;
    let args = ArrayArgs {
        url: format!("{}/img.zarr/0", server.uri()),
        v2: true,
        json: false,
    };
    let err = run_array(&args, settings(&server)).await.unwrap_err();
    assert!(format!("{err:#}").contains("failed to read array metadata"));
}
