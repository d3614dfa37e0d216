//! Unit tests for definitions, the catalog and prompt documents.
mod common;
use common::*;
use comfyforge::prelude::*;
use serde_json::json;
use std::fs;

#[test]
fn test_definition_rejects_duplicate_output_index() {
    let result = NodeDefinition::builder("CheckpointLoaderSimple")
        .output("model", "MODEL", 0)
        .output("clip", "CLIP", 0)
        .build();
    assert_eq!(
        result.unwrap_err(),
        DefinitionError::DuplicateOutputIndex {
            type_name: "CheckpointLoaderSimple".to_string(),
            index: 0,
            first: "model".to_string(),
            second: "clip".to_string(),
        }
    );
}

#[test]
fn test_definition_rejects_duplicate_names() {
    let inputs = NodeDefinition::builder("CLIPTextEncode")
        .input("text", InputSpec::scalar())
        .input("text", InputSpec::scalar().required())
        .build();
    assert!(matches!(
        inputs,
        Err(DefinitionError::DuplicateInput { .. })
    ));

    let outputs = SubgraphDefinition::builder("Pair", |_ctx, _args| Ok(SubgraphOutputs::new()))
        .output("latent", "LATENT")
        .output("latent", "LATENT")
        .build();
    assert!(matches!(
        outputs,
        Err(DefinitionError::DuplicateOutput { .. })
    ));
}

#[test]
fn test_definition_rejects_empty_type_name() {
    let result = NodeDefinition::builder("  ").build();
    assert_eq!(result.unwrap_err(), DefinitionError::EmptyTypeName);
}

#[test]
fn test_definition_lookups() {
    let loader = loader_def();
    assert_eq!(loader.type_name(), "CheckpointLoaderSimple");
    assert_eq!(loader.output("clip").unwrap().index, 1);
    assert_eq!(loader.output_at(2).unwrap().0, "vae");
    assert!(loader.output_at(3).is_none());

    let ckpt = loader.input("ckpt_name").unwrap();
    assert!(ckpt.required);
    assert!(!ckpt.accepts_connection());
    assert!(ckpt.allows(&json!("sd15.safetensors")));
    assert!(!ckpt.allows(&json!("missing.ckpt")));
}

#[test]
fn test_catalog_lookup_by_variant() {
    let catalog = Catalog::new()
        .with(loader_def())
        .unwrap()
        .with(sample_subgraph_def())
        .unwrap();

    assert_eq!(catalog.len(), 2);
    assert!(catalog.node("CheckpointLoaderSimple").is_ok());
    assert!(catalog.subgraph("SampleFromScratch").is_ok());

    match catalog.node("SampleFromScratch") {
        Err(BuildError::WrongDefinitionKind {
            expected, found, ..
        }) => {
            assert_eq!(expected, "node");
            assert_eq!(found, "subgraph");
        }
        other => panic!("Expected WrongDefinitionKind, got {:?}", other),
    }
    assert_eq!(
        catalog.get("Upscale").unwrap_err(),
        BuildError::UnknownDefinition("Upscale".to_string())
    );
}

#[test]
fn test_catalog_rejects_duplicate_names() {
    let mut catalog = Catalog::new();
    catalog.register(loader_def()).unwrap();
    assert_eq!(
        catalog.register(loader_def()).unwrap_err(),
        DefinitionError::DuplicateDefinition("CheckpointLoaderSimple".to_string())
    );
}

#[test]
fn test_catalog_from_json() {
    let catalog = Catalog::from_json(
        r#"{
            "VAEDecode": {
                "inputs": {
                    "vae": { "required": true, "kind": "VAE" },
                    "samples": { "required": true, "kind": "LATENT" }
                },
                "outputs": { "image": { "kind": "IMAGE", "index": 0 } }
            },
            "CheckpointLoaderSimple": {
                "inputs": { "ckpt_name": { "required": true, "enum": ["a.safetensors"] } },
                "outputs": {
                    "vae": { "kind": "VAE", "index": 2 },
                    "model": { "kind": "MODEL", "index": 0 },
                    "clip": { "kind": "CLIP", "index": 1 }
                }
            }
        }"#,
    )
    .unwrap();

    let loader = catalog.node("CheckpointLoaderSimple").unwrap();
    let outputs: Vec<&str> = loader.outputs().map(|(name, _)| name).collect();
    assert_eq!(outputs, vec!["model", "clip", "vae"]);
    assert_eq!(
        loader.input("ckpt_name").unwrap().choices,
        Some(vec![json!("a.safetensors")])
    );

    let decode = catalog.node("VAEDecode").unwrap();
    assert_eq!(decode.input("vae").unwrap().kind, Some(Kind::new("VAE")));
}

#[test]
fn test_catalog_from_json_reports_bad_documents() {
    assert!(matches!(
        Catalog::from_json("[1, 2]"),
        Err(DefinitionError::CatalogParseError(_))
    ));
    assert!(matches!(
        Catalog::from_json(
            r#"{ "Bad": { "outputs": { "a": { "kind": "X", "index": 0 }, "b": { "kind": "Y", "index": 0 } } } }"#
        ),
        Err(DefinitionError::DuplicateOutputIndex { .. })
    ));
}

#[test]
fn test_prompt_from_json_sorts_by_numeric_id() {
    let prompt = Prompt::from_json(
        r#"{
            "10": { "class_type": "SaveImage", "inputs": { "images": ["9", 0] } },
            "9": { "class_type": "VAEDecode", "inputs": {}, "_meta": { "title": "decode" } }
        }"#,
    )
    .unwrap();

    let ids: Vec<u64> = prompt.ids().map(NodeId::get).collect();
    assert_eq!(ids, vec![9, 10]);
    assert_eq!(prompt.get(NodeId::new(9)).unwrap().title(), Some("decode"));
}

#[test]
fn test_prompt_from_json_rejects_non_numeric_keys() {
    let err = Prompt::from_json(r#"{ "loader": { "class_type": "X", "inputs": {} } }"#)
        .unwrap_err();
    assert!(matches!(err, PromptError::Json(_)));
    assert!(err.to_string().contains("loader"));
}

#[test]
fn test_prompt_request_envelope() {
    let mut graph = GraphBuilder::new();
    build_chain(&mut graph);
    let prompt = graph.compile().unwrap();

    let body = serde_json::to_value(prompt.clone().into_request(None)).unwrap();
    assert_eq!(body, json!({ "prompt": prompt.to_value().unwrap() }));

    let body = serde_json::to_value(prompt.into_request(Some("abc".to_string()))).unwrap();
    assert_eq!(body["client_id"], json!("abc"));
}

#[test]
fn test_prompt_save_and_load() {
    let mut graph = GraphBuilder::new();
    build_chain(&mut graph);
    let prompt = graph.compile().unwrap();

    let dir = std::env::temp_dir().join(format!("comfyforge-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("prompt.json");
    let path = path.to_str().unwrap();

    prompt.save(path).unwrap();
    let loaded = Prompt::from_file(path).unwrap();
    assert_eq!(loaded, prompt);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_prompt_from_missing_file() {
    let err = Prompt::from_file("definitely/not/here.json").unwrap_err();
    assert!(matches!(err, PromptError::Io { .. }));
    assert!(err.to_string().contains("definitely/not/here.json"));
}

#[test]
fn test_error_display() {
    let err = CompileError::KindMismatch {
        node_id: NodeId::new(4),
        input: "latent_image".to_string(),
        expected: Kind::new("LATENT"),
        found: Kind::new("IMAGE"),
    };
    let message = err.to_string();
    assert!(message.contains("latent_image"));
    assert!(message.contains("LATENT"));
    assert!(message.contains("IMAGE"));
    assert!(message.contains('4'));

    let err = BuildError::from(DefinitionError::EmptyTypeName);
    assert_eq!(err.to_string(), "Definition type name must not be empty");
}
