use std::sync::Arc;

use cpn_core::{ArtifactApplySpec, ArtifactCategory, ArtifactDescriptor, ArtifactRegistry, BindError, Binder, BoundValue,
               ComponentDescriptor, InMemoryStorage, JsonHandler, ParameterDescriptor, ParameterType, Role, Stage, TaskConfig,
               WriterCursor};
use serde_json::json;

fn registry(storage: &InMemoryStorage) -> ArtifactRegistry {
    ArtifactRegistry::with_defaults().with_storage(Arc::new(storage.clone()))
}

fn hetero() -> ComponentDescriptor {
    ComponentDescriptor::builder("hetero_lr").roles([Role::Guest, Role::Host, Role::Arbiter])
                                             .parameter(ParameterDescriptor::new("epochs", ParameterType::Int).default_value(json!(10)))
                                             .parameter(ParameterDescriptor::new("learning_rate", ParameterType::Float))
                                             .input(ArtifactDescriptor::data_input("train_data").roles([Role::Guest, Role::Host]))
                                             .input(ArtifactDescriptor::data_input("validate_data").optional()
                                                                                                  .roles([Role::Guest, Role::Host]))
                                             .input(ArtifactDescriptor::model_input("warm_start_model").optional())
                                             .output(ArtifactDescriptor::model_output("output_model").roles([Role::Guest, Role::Host])
                                                                                                      .stages([Stage::Train]))
                                             .output(ArtifactDescriptor::data_output("output_data").roles([Role::Guest, Role::Host]))
                                             .build()
                                             .expect("descriptor")
}

fn guest_train() -> TaskConfig {
    TaskConfig::new("hetero_lr", Role::Guest, Stage::Train).with_parameter("learning_rate", json!(0.1))
                                                           .with_input("train_data", ArtifactApplySpec::new("mem://train"))
                                                           .with_output("output_model", ArtifactApplySpec::new("mem://model"))
                                                           .with_output("output_data", ArtifactApplySpec::new("mem://pred"))
}

#[test]
fn required_input_without_apply_spec_fails() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = hetero();
    let mut cfg = guest_train();
    cfg.input_artifacts.shift_remove("train_data");

    let err = Binder::new(&d, &reg).bind(&cfg).unwrap_err();
    assert_eq!(err,
               BindError::MissingRequiredArtifact { name: "train_data".into(),
                                                    descriptor: "input:data".into() });
}

#[test]
fn optional_input_without_apply_spec_is_absent() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = hetero();
    let mut io = Binder::new(&d, &reg).bind(&guest_train()).expect("bind");
    let mut args = io.take_arguments().unwrap();

    assert_eq!(args.kind_of("validate_data"), Some("absent"));
    assert!(args.take_optional_reader("validate_data").unwrap().is_none());
    assert!(args.take_optional_reader("warm_start_model").unwrap().is_none());
    assert!(!io.input_names().any(|n| n == "validate_data"));
}

#[test]
fn parameters_take_defaults_and_coerce() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = hetero();
    let cfg = guest_train().with_parameter("learning_rate", json!(1));
    let io = Binder::new(&d, &reg).bind(&cfg).expect("bind");
    assert_eq!(io.parameters()["epochs"], json!(10));
    assert_eq!(io.parameters()["learning_rate"].as_f64(), Some(1.0));
}

#[test]
fn parameter_type_mismatch_and_missing_required() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = hetero();

    let cfg = guest_train().with_parameter("epochs", json!("many"));
    let err = Binder::new(&d, &reg).bind(&cfg).unwrap_err();
    assert!(matches!(err, BindError::ParameterError { ref name, .. } if name == "epochs"), "{err:?}");

    let mut cfg = guest_train();
    cfg.parameters.shift_remove("learning_rate");
    let err = Binder::new(&d, &reg).bind(&cfg).unwrap_err();
    assert_eq!(err.argument(), Some("learning_rate"));
}

#[test]
fn inactive_artifact_is_skipped_even_if_configured() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = hetero();
    // arbiter: sin train_data ni salidas; el apply spec sobrante se ignora
    let cfg = TaskConfig::new("hetero_lr", Role::Arbiter, Stage::Train).with_parameter("learning_rate", json!(0.1))
                                                                       .with_input("train_data", ArtifactApplySpec::new("mem://train"));
    let mut io = Binder::new(&d, &reg).bind(&cfg).expect("bind");
    let args = io.take_arguments().unwrap();
    let names: Vec<&str> = args.names().collect();
    assert_eq!(names, vec!["epochs", "learning_rate", "warm_start_model"]);

    // predict: output_model está limitado a train
    let cfg = TaskConfig::new("hetero_lr", Role::Guest, Stage::Predict).with_parameter("learning_rate", json!(0.1))
                                                                       .with_input("train_data", ArtifactApplySpec::new("mem://train"))
                                                                       .with_output("output_data", ArtifactApplySpec::new("mem://pred"));
    let io = Binder::new(&d, &reg).bind(&cfg).expect("bind");
    assert_eq!(io.output_names().collect::<Vec<_>>(), vec!["output_data"]);
}

#[test]
fn explicit_signature_rejects_inactive_and_undeclared() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = hetero();
    let cfg = TaskConfig::new("hetero_lr", Role::Arbiter, Stage::Train).with_parameter("learning_rate", json!(0.1));
    let binder = Binder::new(&d, &reg);

    let err = binder.bind_arguments(&cfg, &["ctx", "role", "learning_rate", "train_data"]).unwrap_err();
    assert_eq!(err, BindError::UnresolvedArgument { name: "train_data".into() });

    let err = binder.bind_arguments(&cfg, &["ctx", "nonexistent"]).unwrap_err();
    assert_eq!(err, BindError::UnresolvedArgument { name: "nonexistent".into() });

    let mut io = binder.bind_arguments(&cfg, &["ctx", "role", "learning_rate"]).expect("bind");
    assert_eq!(io.take_arguments().unwrap().len(), 1);
}

#[test]
fn explicit_signature_rejects_repeated_names() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = hetero();
    let err = Binder::new(&d, &reg).bind_arguments(&guest_train(), &["ctx", "role", "train_data", "epochs", "train_data"])
                                   .unwrap_err();
    assert_eq!(err, BindError::apply("train_data", "signature", "argument listed more than once"));
}

#[test]
fn reserved_names_only_skipped_as_prefix() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = hetero();
    let cfg = guest_train();
    let err = Binder::new(&d, &reg).bind_arguments(&cfg, &["learning_rate", "ctx"]).unwrap_err();
    assert_eq!(err, BindError::UnresolvedArgument { name: "ctx".into() });
}

#[test]
fn unsupported_role_is_rejected_before_binding() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = hetero();
    let cfg = TaskConfig::new("hetero_lr", Role::Local, Stage::Train);
    let err = Binder::new(&d, &reg).bind(&cfg).unwrap_err();
    assert_eq!(err,
               BindError::UnsupportedRole { component: "hetero_lr".into(),
                                            role: "local".into() });
}

fn union_like() -> ComponentDescriptor {
    ComponentDescriptor::builder("union").roles([Role::Local])
                                         .input(ArtifactDescriptor::data_input("inputs").multi())
                                         .output(ArtifactDescriptor::data_output("parts").multi())
                                         .output(ArtifactDescriptor::metric_output("summary").optional())
                                         .build()
                                         .expect("descriptor")
}

#[test]
fn multi_input_keeps_length_and_order() {
    let storage = InMemoryStorage::new();
    for key in ["c", "a", "b"] {
        storage.put(key, serde_json::to_vec(&json!({"from": key})).unwrap());
    }
    let reg = registry(&storage);
    let d = union_like();
    let cfg = TaskConfig::new("union", Role::Local, Stage::Default).with_inputs("inputs",
                                                                                vec![ArtifactApplySpec::new("mem://c"),
                                                                                     ArtifactApplySpec::new("mem://a"),
                                                                                     ArtifactApplySpec::new("mem://b")])
                                                                   .with_output("parts", ArtifactApplySpec::new("mem://p-{index}"));
    let mut io = Binder::new(&d, &reg).bind(&cfg).expect("bind");
    let readers = io.take_arguments().unwrap().take_readers("inputs").unwrap();
    let seen: Vec<String> = readers.iter()
                                   .map(|r| r.read().unwrap()["from"].as_str().unwrap().to_string())
                                   .collect();
    assert_eq!(seen, vec!["c", "a", "b"]);
}

#[test]
fn cardinality_mismatch_is_an_apply_error() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = union_like();
    let cfg = TaskConfig::new("union", Role::Local, Stage::Default).with_input("inputs", ArtifactApplySpec::new("mem://x"))
                                                                   .with_output("parts", ArtifactApplySpec::new("mem://p-{index}"));
    let err = Binder::new(&d, &reg).bind(&cfg).unwrap_err();
    assert!(matches!(err, BindError::ArtifactApplyError { ref name, .. } if name == "inputs"), "{err:?}");
}

#[test]
fn multi_output_requires_template() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = union_like();
    let cfg = TaskConfig::new("union", Role::Local, Stage::Default).with_inputs("inputs", vec![])
                                                                   .with_output("parts", ArtifactApplySpec::new("mem://parts"));
    let err = Binder::new(&d, &reg).bind(&cfg).unwrap_err();
    assert_eq!(err,
               BindError::ArtifactApplyError { name: "parts".into(),
                                               descriptor: "output:data".into(),
                                               cause: "template uri required for multi output".into() });
}

#[test]
fn single_output_rejects_template() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = hetero();
    let cfg = guest_train().with_output("output_data", ArtifactApplySpec::new("mem://pred-{index}"));
    let err = Binder::new(&d, &reg).bind(&cfg).unwrap_err();
    assert_eq!(err,
               BindError::ArtifactApplyError { name: "output_data".into(),
                                               descriptor: "output:data".into(),
                                               cause: "template uri not supported for single output".into() });
}

#[test]
fn templated_output_advances_from_zero() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = union_like();
    let cfg = TaskConfig::new("union", Role::Local, Stage::Default).with_inputs("inputs", vec![])
                                                                   .with_output("parts", ArtifactApplySpec::new("mem://out-{index}"));
    let mut io = Binder::new(&d, &reg).bind(&cfg).expect("bind");
    let gen = io.take_arguments().unwrap().take_writers("parts").unwrap();

    let mut cursor = WriterCursor::start();
    let mut uris = Vec::new();
    for _ in 0..3 {
        let (writer, next) = gen.next(cursor).unwrap();
        uris.push(writer.uri().to_string());
        cursor = next;
    }
    assert_eq!(uris, vec!["mem://out-0", "mem://out-1", "mem://out-2"]);
    assert_eq!(cursor.index(), 3);
}

#[test]
fn unknown_scheme_and_unknown_type_are_apply_errors() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = hetero();

    let cfg = guest_train().with_input("train_data", ArtifactApplySpec::new("s3://bucket/train"));
    let err = Binder::new(&d, &reg).bind(&cfg).unwrap_err();
    match err {
        BindError::ArtifactApplyError { name, cause, .. } => {
            assert_eq!(name, "train_data");
            assert_eq!(cause, "unsupported uri scheme `s3`");
        }
        other => panic!("unexpected {other:?}"),
    }

    let cfg = guest_train().with_input("train_data", ArtifactApplySpec::new("mem://train").with_type("parquet"));
    let err = Binder::new(&d, &reg).bind(&cfg).unwrap_err();
    assert!(matches!(err, BindError::ArtifactApplyError { ref cause, .. } if cause.contains("parquet")), "{err:?}");
}

#[test]
fn requested_type_selects_handler() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage).with_handler(ArtifactCategory::Data, Arc::new(JsonHandler::new("table")));
    let d = hetero();
    let cfg = guest_train().with_input("train_data", ArtifactApplySpec::new("mem://train").with_type("table"));
    let mut io = Binder::new(&d, &reg).bind(&cfg).expect("bind");
    let reader = io.take_arguments().unwrap().take_reader("train_data").unwrap();
    assert_eq!(reader.type_name(), "table");
}

#[test]
fn default_type_falls_back_to_first_registered_accepted() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = ComponentDescriptor::builder("reader").roles([Role::Local])
                                                  .input(ArtifactDescriptor::data_input("rows").types(["parquet", "json"]))
                                                  .build()
                                                  .expect("descriptor");
    let cfg = TaskConfig::new("reader", Role::Local, Stage::Default).with_input("rows", ArtifactApplySpec::new("mem://rows"));
    let mut io = Binder::new(&d, &reg).bind(&cfg).expect("bind");
    let reader = io.take_arguments().unwrap().take_reader("rows").unwrap();
    assert_eq!(reader.type_name(), "json");
}

#[test]
fn strict_mode_rejects_unused_apply_specs() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = hetero();
    let cfg = guest_train().with_input("leftover", ArtifactApplySpec::new("mem://left"));

    assert!(Binder::new(&d, &reg).bind(&cfg).is_ok());
    let err = Binder::new(&d, &reg).strict_config(true).bind(&cfg).unwrap_err();
    assert!(matches!(err, BindError::ArtifactApplyError { ref name, .. } if name == "leftover"), "{err:?}");
}

#[test]
fn strict_mode_tolerates_specs_for_inactive_artifacts() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = hetero();
    let cfg = TaskConfig::new("hetero_lr", Role::Guest, Stage::Predict).with_parameter("learning_rate", json!(0.1))
                                                                         .with_input("train_data", ArtifactApplySpec::new("mem://train"))
                                                                         .with_output("output_model", ArtifactApplySpec::new("mem://model"))
                                                                         .with_output("output_data", ArtifactApplySpec::new("mem://pred"));

    let io = Binder::new(&d, &reg).strict_config(true).bind(&cfg).expect("bind");
    assert!(!io.output_names().any(|n| n == "output_model"));
}

#[test]
fn bound_values_have_expected_kinds() {
    let storage = InMemoryStorage::new();
    let reg = registry(&storage);
    let d = hetero();
    let mut io = Binder::new(&d, &reg).bind(&guest_train()).expect("bind");
    let args = io.take_arguments().unwrap();
    let kinds: Vec<(&str, &str)> = args.names().map(|n| (n, args.kind_of(n).unwrap())).collect();
    assert_eq!(kinds,
               vec![("epochs", "parameter"),
                    ("learning_rate", "parameter"),
                    ("train_data", "reader"),
                    ("validate_data", "absent"),
                    ("warm_start_model", "absent"),
                    ("output_model", "writer"),
                    ("output_data", "writer")]);
    assert_eq!(BoundValue::Absent.kind(), "absent");
}
