use std::sync::Arc;
use std::thread;

use cpn_core::{ArtifactApplySpec, ArtifactDescriptor, ArtifactRegistry, BindError, Binder, ComponentDescriptor, InMemoryStorage,
               Role, Stage, StorageError, TaskConfig};
use serde_json::{json, Map};

fn copy_component() -> ComponentDescriptor {
    ComponentDescriptor::builder("copy").roles([Role::Local])
                                        .input(ArtifactDescriptor::model_input("source").optional())
                                        .output(ArtifactDescriptor::model_output("target"))
                                        .build()
                                        .expect("descriptor")
}

fn bind_copy(reg: &ArtifactRegistry, source: Option<&str>, target: &str) -> cpn_core::ExecutionIo {
    let d = copy_component();
    let mut cfg = TaskConfig::new("copy", Role::Local, Stage::Default).with_output("target",
                                                                                   ArtifactApplySpec::new(target).with_metadata("owner", json!("spec"))
                                                                                                                 .with_metadata("kept", json!(true)));
    if let Some(src) = source {
        cfg = cfg.with_input("source", ArtifactApplySpec::new(src));
    }
    Binder::new(&d, reg).bind(&cfg).expect("bind")
}

#[test]
fn write_then_read_through_fresh_reader_round_trips() {
    let storage = InMemoryStorage::new();
    let reg = ArtifactRegistry::with_defaults().with_storage(Arc::new(storage.clone()));
    let payload = json!({"coef": [0.25, -1.0], "intercept": 3});

    let mut io = bind_copy(&reg, None, "mem://models/m1");
    let writer = io.take_arguments().unwrap().take_writer("target").unwrap();
    let mut meta = Map::new();
    meta.insert("owner".into(), json!("writer"));
    meta.insert("epochs".into(), json!(5));
    writer.write(&payload, Some(meta)).unwrap();

    let record = writer.record();
    assert!(record.consumed);
    assert_eq!(record.metadata.metadata["owner"], "writer");
    assert_eq!(record.metadata.metadata["kept"], true);
    assert_eq!(record.metadata.metadata["epochs"], 5);
    assert_eq!(record.metadata.writes.len(), 1);
    assert_eq!(record.metadata.writes[0].file_format, "json");
    assert_eq!(record.metadata.writes[0].content_hash.len(), 64);

    let mut io = bind_copy(&reg, Some("mem://models/m1"), "mem://models/m2");
    let reader = io.take_arguments().unwrap().take_optional_reader("source").unwrap().expect("bound");
    assert_eq!(reader.read().unwrap(), payload);
}

#[test]
fn second_write_fails_and_keeps_first_effect() {
    let storage = InMemoryStorage::new();
    let reg = ArtifactRegistry::with_defaults().with_storage(Arc::new(storage.clone()));
    let mut io = bind_copy(&reg, None, "mem://t");
    let writer = io.take_arguments().unwrap().take_writer("target").unwrap();

    writer.write(&json!("first"), None).unwrap();
    let err = writer.write(&json!("second"), None).unwrap_err();
    assert_eq!(err, BindError::UseAfterConsumed { uri: "mem://t".into() });
    assert_eq!(storage.get("t").unwrap(), serde_json::to_vec(&json!("first")).unwrap());
    assert_eq!(writer.record().metadata.writes.len(), 1);
}

#[test]
fn failed_read_still_consumes() {
    let storage = InMemoryStorage::new();
    let reg = ArtifactRegistry::with_defaults().with_storage(Arc::new(storage.clone()));
    let mut io = bind_copy(&reg, Some("mem://missing"), "mem://t");
    let reader = io.take_arguments().unwrap().take_optional_reader("source").unwrap().unwrap();

    let err = reader.read().unwrap_err();
    assert_eq!(err,
               BindError::ResourceReadError { uri: "mem://missing".into(),
                                              source: StorageError::NotFound("mem://missing".into()) });
    assert!(reader.is_consumed());
    assert_eq!(reader.read().unwrap_err(), BindError::UseAfterConsumed { uri: "mem://missing".into() });
}

#[test]
fn undecodable_bytes_are_a_read_error() {
    let storage = InMemoryStorage::new();
    storage.put("bad", "not json at all");
    let reg = ArtifactRegistry::with_defaults().with_storage(Arc::new(storage.clone()));
    let mut io = bind_copy(&reg, Some("mem://bad"), "mem://t");
    let reader = io.take_arguments().unwrap().take_optional_reader("source").unwrap().unwrap();
    assert!(matches!(reader.read(), Err(BindError::ResourceReadError { source: StorageError::Codec(_), .. })));
}

#[test]
fn concurrent_writers_only_one_wins() {
    let storage = InMemoryStorage::new();
    let reg = ArtifactRegistry::with_defaults().with_storage(Arc::new(storage.clone()));
    let mut io = bind_copy(&reg, None, "mem://race");
    let writer = Arc::new(io.take_arguments().unwrap().take_writer("target").unwrap());

    let handles: Vec<_> = (0..8).map(|i| {
                                    let w = Arc::clone(&writer);
                                    thread::spawn(move || w.write(&json!(i), None).is_ok())
                                })
                                .collect();
    let wins = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();
    assert_eq!(wins, 1);
    assert_eq!(writer.record().metadata.writes.len(), 1);
}
