use todo_core::{Todo, TodoStatus, TodoValidationError};

#[test]
fn todo_serialization_uses_expected_wire_fields() {
    let todo = Todo {
        id: 7,
        task: "pay rent".to_string(),
        description: String::new(),
        status: TodoStatus::InProgress,
        created_at: 1_700_000_000_000,
        updated_at: 1_700_000_360_000,
    };

    let json = serde_json::to_value(&todo).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["task"], "pay rent");
    assert_eq!(json["description"], "");
    assert_eq!(json["status"], "IN_PROGRESS");
    assert_eq!(json["created_at"], 1_700_000_000_000_i64);

    let decoded: Todo = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, todo);
}

#[test]
fn status_wire_names_match_display() {
    for status in TodoStatus::ALL {
        let json = serde_json::to_value(status).unwrap();
        assert_eq!(json, status.to_string());
    }
}

#[test]
fn unknown_status_is_rejected_on_decode_and_parse() {
    let raw = r#"{"id":1,"task":"t","description":"","status":"BOGUS","created_at":0,"updated_at":0}"#;
    assert!(serde_json::from_str::<Todo>(raw).is_err());

    let err = "BOGUS".parse::<TodoStatus>().unwrap_err();
    assert_eq!(err, TodoValidationError::UnknownStatus("BOGUS".to_string()));
    assert!(err.to_string().contains("BOGUS"));
}

#[test]
fn default_status_is_init() {
    assert_eq!(TodoStatus::default(), TodoStatus::Init);
}
